use primestark_field::{FieldElement, MathError, PrimeField};

use crate::air::Air;
use crate::vanishing_poly::{eval_boundary_zerofier, eval_transition_zerofier};

/// Accumulates `sum_i alpha_i * C_i(x) / Z_i(x)` at a single point `x`, where `Z_i` is the zerofier
/// of constraint `i`. Constraints are consumed in order, each taking the next weight.
pub struct ConstraintConsumer<'a> {
    field: &'a PrimeField,

    /// Random values used to combine multiple constraints into one.
    alphas: &'a [FieldElement],

    /// Number of constraints consumed so far.
    consumed: usize,

    /// Running sum of the constraints emitted so far, scaled by their weights.
    constraint_acc: FieldElement,

    /// The inverse of the transition zerofier at `x`.
    inv_transition_zerofier: FieldElement,
}

impl<'a> ConstraintConsumer<'a> {
    pub fn new(
        field: &'a PrimeField,
        alphas: &'a [FieldElement],
        inv_transition_zerofier: FieldElement,
    ) -> Self {
        Self {
            field,
            alphas,
            consumed: 0,
            constraint_acc: FieldElement::zero(),
            inv_transition_zerofier,
        }
    }

    pub fn accumulator(self) -> FieldElement {
        self.constraint_acc
    }

    fn next_alpha(&mut self) -> &'a FieldElement {
        let alphas: &'a [FieldElement] = self.alphas;
        self.consumed += 1;
        &alphas[self.consumed - 1]
    }

    /// Add one constraint valid on all rows except the last.
    pub fn constraint_transition(&mut self, constraint: &FieldElement) {
        let quotient = self.field.mul(constraint, &self.inv_transition_zerofier);
        self.emit(&quotient);
    }

    /// Add one constraint valid at the single row where `zerofier` vanishes.
    pub fn constraint_boundary(
        &mut self,
        constraint: &FieldElement,
        zerofier: &FieldElement,
    ) -> Result<(), MathError> {
        let quotient = self.field.div(constraint, zerofier)?;
        self.emit(&quotient);
        Ok(())
    }

    fn emit(&mut self, quotient: &FieldElement) {
        let alpha = self.next_alpha();
        let term = self.field.mul(alpha, quotient);
        self.constraint_acc = self.field.add(&self.constraint_acc, &term);
    }
}

/// Evaluates the composition `sum_i alpha_i * C_i(x) / Z_i(x)` of every constraint of `air` at `x`,
/// given the trace values at `x` and at `omega * x`.
pub fn eval_composition(
    air: &Air,
    alphas: &[FieldElement],
    x: &FieldElement,
    current: &[FieldElement],
    next: &[FieldElement],
    trace_generator: &FieldElement,
    trace_len: usize,
) -> Result<FieldElement, MathError> {
    let field = air.field();
    assert_eq!(alphas.len(), air.num_constraints(), "one weight per constraint");

    let transition_zerofier = eval_transition_zerofier(field, x, trace_generator, trace_len)?;
    let mut consumer = ConstraintConsumer::new(field, alphas, field.inv(&transition_zerofier)?);

    for bc in air.boundary_constraints() {
        let constraint = field.sub(&current[bc.column], &bc.value);
        let zerofier = eval_boundary_zerofier(field, x, trace_generator, bc.row);
        consumer.constraint_boundary(&constraint, &zerofier)?;
    }
    for constraint in air.eval_transitions(current, next) {
        consumer.constraint_transition(&constraint);
    }

    Ok(consumer.accumulator())
}
