use std::fmt;
use std::sync::Arc;

use log::trace;
use primestark_field::{FieldElement, PrimeField};

use crate::challenger::Challenger;
use crate::error::ProofError;
use crate::trace::ExecutionTrace;

/// A transition function `C(field, current_row, next_row)`, which must vanish on every pair of
/// adjacent rows of a valid trace.
///
/// The prover also evaluates it on points of the low-degree extension, so it must be a polynomial
/// expression in the row values, of total degree at most the degree declared with it.
pub type TransitionFn =
    dyn Fn(&PrimeField, &[FieldElement], &[FieldElement]) -> FieldElement + Send + Sync;

/// Asserts that `trace[row][column] == value`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryConstraint {
    pub row: usize,
    pub column: usize,
    pub value: FieldElement,
}

#[derive(Clone)]
pub struct TransitionConstraint {
    degree: usize,
    eval: Arc<TransitionFn>,
}

impl TransitionConstraint {
    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn eval(
        &self,
        field: &PrimeField,
        current: &[FieldElement],
        next: &[FieldElement],
    ) -> FieldElement {
        (self.eval)(field, current, next)
    }
}

impl fmt::Debug for TransitionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionConstraint")
            .field("degree", &self.degree)
            .finish_non_exhaustive()
    }
}

/// An algebraic intermediate representation over traces of a fixed width: boundary constraints
/// pinning individual cells, and transition constraints relating each row to the next.
#[derive(Clone, Debug)]
pub struct Air {
    field: PrimeField,
    width: usize,
    boundary_constraints: Vec<BoundaryConstraint>,
    transition_constraints: Vec<TransitionConstraint>,
}

impl Air {
    /// An AIR with no constraints yet, over traces with `width` columns.
    pub fn new(field: PrimeField, width: usize) -> Self {
        Self {
            field,
            width,
            boundary_constraints: Vec::new(),
            transition_constraints: Vec::new(),
        }
    }

    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    /// The number of trace columns. Transition constraints may read any column below it.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn add_boundary_constraint(&mut self, row: usize, column: usize, value: FieldElement) {
        let value = self.field.element_from_biguint(value.to_biguint());
        self.boundary_constraints
            .push(BoundaryConstraint { row, column, value });
    }

    /// Adds a transition constraint of degree 1.
    pub fn add_transition_constraint<C>(&mut self, constraint: C)
    where
        C: Fn(&PrimeField, &[FieldElement], &[FieldElement]) -> FieldElement
            + Send
            + Sync
            + 'static,
    {
        self.add_transition_constraint_with_degree(1, constraint);
    }

    pub fn add_transition_constraint_with_degree<C>(&mut self, degree: usize, constraint: C)
    where
        C: Fn(&PrimeField, &[FieldElement], &[FieldElement]) -> FieldElement
            + Send
            + Sync
            + 'static,
    {
        self.transition_constraints.push(TransitionConstraint {
            degree: degree.max(1),
            eval: Arc::new(constraint),
        });
    }

    pub fn boundary_constraints(&self) -> &[BoundaryConstraint] {
        &self.boundary_constraints
    }

    pub fn transition_constraints(&self) -> &[TransitionConstraint] {
        &self.transition_constraints
    }

    pub fn num_constraints(&self) -> usize {
        self.boundary_constraints.len() + self.transition_constraints.len()
    }

    /// The maximum degree of any constraint. Boundary constraints have degree 1.
    pub fn constraint_degree(&self) -> usize {
        self.transition_constraints
            .iter()
            .map(TransitionConstraint::degree)
            .max()
            .unwrap_or(1)
    }

    /// Evaluates every transition constraint on a pair of rows.
    pub fn eval_transitions(
        &self,
        current: &[FieldElement],
        next: &[FieldElement],
    ) -> Vec<FieldElement> {
        self.transition_constraints
            .iter()
            .map(|c| c.eval(&self.field, current, next))
            .collect()
    }

    pub fn check_constraints(&self, trace: &ExecutionTrace) -> bool {
        self.find_violation(trace).is_none()
    }

    /// Returns the first constraint `trace` violates, if any.
    pub fn find_violation(&self, trace: &ExecutionTrace) -> Option<ProofError> {
        if trace.width() != self.width {
            return Some(ProofError::ConstraintViolated(format!(
                "trace has {} columns, the AIR expects {}",
                trace.width(),
                self.width
            )));
        }
        for (i, bc) in self.boundary_constraints.iter().enumerate() {
            match trace.get(bc.row, bc.column) {
                Ok(actual) if *actual == bc.value => {}
                Ok(actual) => {
                    return Some(ProofError::ConstraintViolated(format!(
                        "boundary constraint {} expects {} at ({}, {}), found {}",
                        i, bc.value, bc.row, bc.column, actual
                    )))
                }
                Err(e) => {
                    return Some(ProofError::ConstraintViolated(format!(
                        "boundary constraint {} cannot be satisfied: {}",
                        i, e
                    )))
                }
            }
        }

        for (row, pair) in trace.rows().windows(2).enumerate() {
            for (i, value) in self.eval_transitions(&pair[0], &pair[1]).iter().enumerate() {
                if value.is_nonzero() {
                    trace!("Transition constraint {} evaluates to {}", i, value);
                    return Some(ProofError::ConstraintViolated(format!(
                        "transition constraint {} fails between rows {} and {}",
                        i,
                        row,
                        row + 1
                    )));
                }
            }
        }
        None
    }

    /// Binds the public statement (the boundary constraints and the constraint shape) to a
    /// transcript.
    pub fn observe(&self, challenger: &mut Challenger) {
        challenger.observe_usize(self.width);
        challenger.observe_usize(self.boundary_constraints.len());
        for bc in &self.boundary_constraints {
            challenger.observe_usize(bc.row);
            challenger.observe_usize(bc.column);
            challenger.observe_element(&bc.value);
        }
        challenger.observe_usize(self.transition_constraints.len());
        for tc in &self.transition_constraints {
            challenger.observe_usize(tc.degree);
        }
    }
}
