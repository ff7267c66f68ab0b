use std::time::{Instant, SystemTime, UNIX_EPOCH};

use itertools::Itertools;
use log::{debug, Level};
use primestark_field::interpolation::interpolate_on_domain;
use primestark_field::{ConfigError, Domain, FieldElement, Polynomial, PrimeField, ValidationError};
use primestark_util::transpose;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::air::Air;
use crate::challenger::Challenger;
use crate::config::StarkConfig;
use crate::constraint_consumer::eval_composition;
use crate::error::{ProofError, StarkError};
use crate::fri::Fri;
use crate::hash::merkle_tree::MerkleTree;
use crate::proof::{ProofMetadata, StarkOpeningSet, StarkProof, StarkQueryOpening};
use crate::timed;
use crate::timing::TimingTree;
use crate::trace::ExecutionTrace;

/// Degree bound of the composition and DEEP polynomials for a trace of `trace_len` rows and
/// constraints of degree at most `constraint_degree`, or `None` on overflow.
pub(crate) fn composition_degree_bound(trace_len: usize, constraint_degree: usize) -> Option<usize> {
    trace_len
        .checked_mul(constraint_degree.saturating_sub(1).max(1))?
        .checked_next_power_of_two()
}

/// Returns `(max_degree, lde_size)` for the given trace length, provided the LDE domain fits in
/// the field's two-adic subgroup.
pub(crate) fn lde_shape(
    field: &PrimeField,
    config: &StarkConfig,
    trace_len: usize,
    constraint_degree: usize,
) -> Result<(usize, usize), StarkError> {
    let shape = composition_degree_bound(trace_len, constraint_degree).and_then(|max_degree| {
        let lde_size = max_degree.checked_mul(config.blowup_factor)?;
        let fits = field.two_adicity() >= usize::BITS as usize
            || lde_size <= 1 << field.two_adicity();
        fits.then_some((max_degree, lde_size))
    });
    shape.ok_or_else(|| {
        ValidationError::Malformed(format!(
            "a trace of {} rows has no low-degree extension with blowup {} in this field",
            trace_len, config.blowup_factor
        ))
        .into()
    })
}

/// Checks that a trace of `trace_len` rows and `trace_width` columns can be proven.
pub(crate) fn check_trace_shape(trace_len: usize, trace_width: usize) -> Result<(), StarkError> {
    if trace_len < 2 || trace_width == 0 {
        return Err(ValidationError::Malformed(format!(
            "a {}x{} trace needs at least two rows and one column",
            trace_len, trace_width
        ))
        .into());
    }
    if !trace_len.is_power_of_two() {
        return Err(ConfigError::NotPowerOfTwo {
            name: "trace length",
            value: trace_len,
        }
        .into());
    }
    Ok(())
}

/// Checks the trace shape and returns the trace domain.
pub(crate) fn trace_domain(
    field: &PrimeField,
    trace_len: usize,
    trace_width: usize,
) -> Result<Domain, StarkError> {
    check_trace_shape(trace_len, trace_width)?;
    Ok(Domain::subgroup(field, trace_len)?)
}

/// Starts the transcript shared by prover and verifier: the configuration, the public statement
/// and the trace shape.
pub(crate) fn initial_challenger(
    config: &StarkConfig,
    air: &Air,
    trace_len: usize,
    trace_width: usize,
) -> Challenger {
    let mut challenger = Challenger::with_domain_separator(b"primestark-stark");
    config.observe(&mut challenger);
    air.observe(&mut challenger);
    challenger.observe_usize(trace_len);
    challenger.observe_usize(trace_width);
    challenger
}

/// The DEEP quotients' weights: one per trace column at `z`, one per trace column at `omega * z`,
/// and one for the composition polynomial.
pub(crate) struct DeepWeights {
    pub local: Vec<FieldElement>,
    pub next: Vec<FieldElement>,
    pub composition: FieldElement,
}

impl DeepWeights {
    pub(crate) fn draw(challenger: &mut Challenger, field: &PrimeField, width: usize) -> Self {
        let local = challenger.get_n_challenges(field, width);
        let next = challenger.get_n_challenges(field, width);
        let composition = challenger.get_challenge(field);
        Self {
            local,
            next,
            composition,
        }
    }
}

pub fn prove(
    config: &StarkConfig,
    trace: &ExecutionTrace,
    air: &Air,
    timing: &mut TimingTree,
) -> Result<StarkProof, StarkError> {
    let start = Instant::now();
    let field = air.field();
    config.check_config()?;

    if trace.width() != air.width() {
        return Err(ValidationError::LengthMismatch {
            expected: air.width(),
            actual: trace.width(),
        }
        .into());
    }
    if let Some(violation) = air.find_violation(trace) {
        return Err(violation.into());
    }

    let trace_len = trace.length();
    let width = trace.width();
    let trace_domain = trace_domain(field, trace_len, width)?;
    let trace_generator = trace_domain.generator().clone();

    let trace_polys = timed!(
        timing,
        "compute trace polynomials",
        interpolate_columns(field, &trace_domain, trace.columns())?
    );

    let (max_degree, lde_size) = lde_shape(field, config, trace_len, air.constraint_degree())?;
    let lde_domain = Domain::coset(field, lde_size, field.generator().clone())?;
    debug!(
        "Proving a {}x{} trace over an LDE of size {} (composition degree < {})",
        trace_len, width, lde_size, max_degree
    );

    let lde_rows = timed!(
        timing,
        "compute trace LDE",
        transpose(
            &trace_polys
                .iter()
                .map(|p| p.evaluate_on_domain(field, &lde_domain))
                .collect::<Vec<_>>()
        )
    );
    let trace_tree = timed!(timing, "commit to trace LDE", MerkleTree::new(lde_rows.clone()));
    let trace_root = trace_tree.root();

    let mut challenger = initial_challenger(config, air, trace_len, width);
    challenger.observe_digest(&trace_root);
    let alphas = challenger.get_n_challenges(field, air.num_constraints());

    // The trace generator is `lde_generator^(lde_size / trace_len)`, so the next row's value at a
    // point sits this many positions further along the LDE domain.
    let next_step = lde_size / trace_len;
    let composition_values = timed!(
        timing,
        "evaluate composition on LDE",
        (0..lde_size)
            .map(|i| {
                eval_composition(
                    air,
                    &alphas,
                    lde_domain.point(i),
                    &lde_rows[i],
                    &lde_rows[(i + next_step) % lde_size],
                    &trace_generator,
                    trace_len,
                )
            })
            .collect::<Result<Vec<_>, _>>()?
    );
    let composition_poly = timed!(
        timing,
        "interpolate composition polynomial",
        interpolate_on_domain(field, &lde_domain, &composition_values)?
    );
    if composition_poly.degree() >= max_degree {
        return Err(ProofError::ConstraintViolated(format!(
            "composition polynomial has degree {}, expected below {}",
            composition_poly.degree(),
            max_degree
        ))
        .into());
    }
    let composition_tree = MerkleTree::from_codeword(&composition_values);
    let composition_root = composition_tree.root();
    challenger.observe_digest(&composition_root);

    let z = challenger.get_challenge(field);
    let z_next = field.mul(&z, &trace_generator);
    let openings = StarkOpeningSet {
        local_values: trace_polys.iter().map(|p| p.evaluate(field, &z)).collect(),
        next_values: trace_polys.iter().map(|p| p.evaluate(field, &z_next)).collect(),
        composition_value: composition_poly.evaluate(field, &z),
    };
    challenger.observe_elements(&openings.to_elements());

    let weights = DeepWeights::draw(&mut challenger, field, width);
    let deep_poly = timed!(
        timing,
        "compute DEEP composition polynomial",
        deep_composition(field, &trace_polys, &composition_poly, &z, &z_next, &weights)
    );

    let fri = Fri::new(
        field.clone(),
        config.fri_config(max_degree, field.generator().clone()),
    )?;
    let fri_commitment = timed!(timing, "commit to DEEP polynomial", fri.commit(&deep_poly)?);
    let fri_proof = timed!(
        timing,
        Level::Debug,
        "compute FRI proof",
        fri.prove_with_challenger(&fri_commitment, &mut challenger)?
    );

    let half = lde_size / 2;
    let query_openings = fri_proof
        .query_round_proofs
        .iter()
        .flat_map(|query| [query.index, query.index + half])
        .map(|index| StarkQueryOpening {
            index,
            trace_row: lde_rows[index].clone(),
            trace_proof: trace_tree.prove(index),
            composition_value: composition_values[index].clone(),
            composition_proof: composition_tree.prove(index),
        })
        .collect_vec();

    let mut proof = StarkProof {
        trace_root,
        composition_root,
        openings,
        fri_commitment,
        fri_proof,
        query_openings,
        metadata: ProofMetadata {
            trace_length: trace_len,
            trace_width: width,
            num_constraints: air.num_constraints(),
            generated_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_secs()),
            proving_time_ms: start.elapsed().as_millis() as u64,
            proof_size_bytes: 0,
        },
    };
    proof.record_size()?;
    Ok(proof)
}

fn interpolate_columns(
    field: &PrimeField,
    domain: &Domain,
    columns: Vec<Vec<FieldElement>>,
) -> Result<Vec<Polynomial>, StarkError> {
    #[cfg(feature = "parallel")]
    let iter = columns.into_par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = columns.into_iter();

    iter.map(|column| interpolate_on_domain(field, domain, &column).map_err(StarkError::from))
        .collect()
}

/// `sum_j beta_j (T_j(x) - T_j(z)) / (x - z) + sum_j gamma_j (T_j(x) - T_j(omega z)) / (x - omega z)
///  + delta (CP(x) - CP(z)) / (x - z)`.
fn deep_composition(
    field: &PrimeField,
    trace_polys: &[Polynomial],
    composition_poly: &Polynomial,
    z: &FieldElement,
    z_next: &FieldElement,
    weights: &DeepWeights,
) -> Polynomial {
    let mut deep = composition_poly
        .divide_by_linear(field, z)
        .scale(field, &weights.composition);
    for ((poly, beta), gamma) in trace_polys.iter().zip(&weights.local).zip(&weights.next) {
        let local = poly.divide_by_linear(field, z).scale(field, beta);
        let next = poly.divide_by_linear(field, z_next).scale(field, gamma);
        deep = deep.add(field, &local).add(field, &next);
    }
    deep
}
