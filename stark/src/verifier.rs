use log::debug;
use primestark_field::{Domain, FieldElement, PrimeField, ValidationError};
use primestark_util::log2_ceil;

use crate::air::Air;
use crate::config::StarkConfig;
use crate::constraint_consumer::eval_composition;
use crate::ensure_proof;
use crate::error::StarkError;
use crate::fri::Fri;
use crate::hash::merkle_proofs::verify_merkle_proof;
use crate::proof::{StarkOpeningSet, StarkProof, StarkQueryOpening};
use crate::prover::{check_trace_shape, initial_challenger, lde_shape, trace_domain, DeepWeights};

pub fn verify_proof(config: &StarkConfig, proof: &StarkProof, air: &Air) -> bool {
    match try_verify_proof(config, proof, air) {
        Ok(()) => true,
        Err(e) => {
            debug!("STARK proof rejected: {}", e);
            false
        }
    }
}

pub fn try_verify_proof(
    config: &StarkConfig,
    proof: &StarkProof,
    air: &Air,
) -> Result<(), StarkError> {
    let field = air.field();
    config.check_config()?;
    // Ties the trace and LDE sizes to the evaluations the proof carries.
    let (max_degree, lde_size) = validate_proof_shape(field, config, proof, air)?;

    let StarkProof {
        trace_root,
        composition_root,
        openings,
        fri_commitment,
        fri_proof,
        query_openings,
        metadata,
    } = proof;
    let trace_len = metadata.trace_length;
    let width = metadata.trace_width;
    let trace_domain = trace_domain(field, trace_len, width)?;
    let trace_generator = trace_domain.generator();
    let lde_domain = Domain::coset(field, lde_size, field.generator().clone())?;

    let mut challenger = initial_challenger(config, air, trace_len, width);
    challenger.observe_digest(trace_root);
    let alphas = challenger.get_n_challenges(field, air.num_constraints());
    challenger.observe_digest(composition_root);
    let z = challenger.get_challenge(field);
    let z_next = field.mul(&z, trace_generator);
    challenger.observe_elements(&openings.to_elements());
    let weights = DeepWeights::draw(&mut challenger, field, width);

    // The composition polynomial must agree with the constraints at `z`.
    let composition_at_z = eval_composition(
        air,
        &alphas,
        &z,
        &openings.local_values,
        &openings.next_values,
        trace_generator,
        trace_len,
    )?;
    ensure_proof!(
        composition_at_z == openings.composition_value,
        ConstraintViolated,
        "composition polynomial disagrees with the constraints at the out-of-domain point"
    );

    let fri = Fri::new(
        field.clone(),
        config.fri_config(max_degree, field.generator().clone()),
    )?;
    fri.verify_with_challenger(fri_commitment, fri_proof, &mut challenger)?;

    let half = lde_domain.size() / 2;
    let expected_indices = fri_proof
        .query_round_proofs
        .iter()
        .flat_map(|query| [query.index, query.index + half]);
    for (opening, index) in query_openings.iter().zip(expected_indices) {
        ensure_proof!(
            opening.index == index,
            CommitmentMismatch,
            "opening at {} does not match FRI query position {}",
            opening.index,
            index
        );
        verify_query_opening(proof, opening)?;

        let x = lde_domain.point(index);
        let deep_value = eval_deep_composition(field, opening, openings, x, &z, &z_next, &weights)?;
        ensure_proof!(
            deep_value == fri_commitment.evaluations[index],
            FriVerificationFailed,
            "DEEP composition at position {} does not match the FRI commitment",
            index
        );
    }

    Ok(())
}

/// Checks sizes, canonical encodings and metadata before anything is evaluated, and returns the
/// composition degree bound and LDE size.
fn validate_proof_shape(
    field: &PrimeField,
    config: &StarkConfig,
    proof: &StarkProof,
    air: &Air,
) -> Result<(usize, usize), StarkError> {
    let metadata = &proof.metadata;
    let (trace_len, width) = (metadata.trace_length, metadata.trace_width);
    let malformed = |msg: String| -> StarkError { ValidationError::Malformed(msg).into() };

    if width != air.width() {
        return Err(malformed(format!(
            "proof covers a trace of width {}, the AIR has {} columns",
            width,
            air.width()
        )));
    }
    check_trace_shape(trace_len, width)?;
    let (max_degree, lde_size) = lde_shape(field, config, trace_len, air.constraint_degree())?;
    if proof.fri_commitment.evaluations.len() != lde_size {
        return Err(malformed(format!(
            "FRI commitment has {} evaluations, expected {}",
            proof.fri_commitment.evaluations.len(),
            lde_size
        )));
    }

    if metadata.num_constraints != air.num_constraints() {
        return Err(malformed(format!(
            "proof covers {} constraints, the AIR has {}",
            metadata.num_constraints,
            air.num_constraints()
        )));
    }
    if let Some(bc) = air
        .boundary_constraints()
        .iter()
        .find(|bc| bc.row >= trace_len || bc.column >= width)
    {
        return Err(malformed(format!(
            "boundary constraint at ({}, {}) lies outside the {}x{} trace",
            bc.row, bc.column, trace_len, width
        )));
    }

    let StarkOpeningSet {
        local_values,
        next_values,
        composition_value,
    } = &proof.openings;
    if local_values.len() != width || next_values.len() != width {
        return Err(malformed(format!(
            "out-of-domain frame has {} and {} values for {} columns",
            local_values.len(),
            next_values.len(),
            width
        )));
    }
    if !local_values
        .iter()
        .chain(next_values)
        .chain(Some(composition_value))
        .all(|x| field.is_canonical(x))
    {
        return Err(malformed("non-canonical out-of-domain value".to_string()));
    }

    let path_len = log2_ceil(lde_size);
    if proof.query_openings.len() != 2 * config.num_queries
        || proof.fri_proof.query_round_proofs.len() != config.num_queries
    {
        return Err(malformed(format!(
            "expected {} query openings, got {}",
            2 * config.num_queries,
            proof.query_openings.len()
        )));
    }
    for opening in &proof.query_openings {
        if opening.index >= lde_size
            || opening.trace_row.len() != width
            || opening.trace_proof.len() != path_len
            || opening.composition_proof.len() != path_len
        {
            return Err(malformed(format!(
                "query opening at {} has the wrong shape",
                opening.index
            )));
        }
        if !opening
            .trace_row
            .iter()
            .chain(Some(&opening.composition_value))
            .all(|x| field.is_canonical(x))
        {
            return Err(malformed(format!(
                "non-canonical value in query opening at {}",
                opening.index
            )));
        }
    }
    Ok((max_degree, lde_size))
}

fn verify_query_opening(proof: &StarkProof, opening: &StarkQueryOpening) -> Result<(), StarkError> {
    verify_merkle_proof(
        &opening.trace_row,
        opening.index,
        &proof.trace_root,
        &opening.trace_proof,
    )?;
    verify_merkle_proof(
        std::slice::from_ref(&opening.composition_value),
        opening.index,
        &proof.composition_root,
        &opening.composition_proof,
    )?;
    Ok(())
}

/// The DEEP composition polynomial at `x`, recombined from the opened trace row and composition
/// value.
fn eval_deep_composition(
    field: &PrimeField,
    opening: &StarkQueryOpening,
    openings: &StarkOpeningSet,
    x: &FieldElement,
    z: &FieldElement,
    z_next: &FieldElement,
    weights: &DeepWeights,
) -> Result<FieldElement, StarkError> {
    let inv_x_minus_z = field.inv(&field.sub(x, z))?;
    let inv_x_minus_z_next = field.inv(&field.sub(x, z_next))?;

    let mut sum = field.mul(
        &weights.composition,
        &field.mul(
            &field.sub(&opening.composition_value, &openings.composition_value),
            &inv_x_minus_z,
        ),
    );
    for (j, value) in opening.trace_row.iter().enumerate() {
        let local = field.mul(
            &weights.local[j],
            &field.mul(&field.sub(value, &openings.local_values[j]), &inv_x_minus_z),
        );
        let next = field.mul(
            &weights.next[j],
            &field.mul(
                &field.sub(value, &openings.next_values[j]),
                &inv_x_minus_z_next,
            ),
        );
        sum = field.add(&sum, &field.add(&local, &next));
    }
    Ok(sum)
}
