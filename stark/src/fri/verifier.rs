use log::debug;
use primestark_field::interpolation::interpolate2;
use primestark_field::{Codeword, Domain, FieldElement, Polynomial, PrimeField};

use crate::challenger::Challenger;
use crate::ensure_proof;
use crate::error::StarkError;
use crate::fri::proof::{FriCommitment, FriProof, FriQueryRound};
use crate::fri::Fri;
use crate::hash::merkle_proofs::verify_merkle_proof;
use crate::hash::merkle_tree::codeword_root;
use crate::hash::Digest;

impl Fri {
    /// Verifies a FRI proof with a fresh transcript.
    pub fn verify(&self, commitment: &FriCommitment, proof: &FriProof) -> bool {
        let mut challenger = Challenger::new();
        match self.verify_with_challenger(commitment, proof, &mut challenger) {
            Ok(()) => true,
            Err(e) => {
                debug!("FRI proof rejected: {}", e);
                false
            }
        }
    }

    /// Verifies a FRI proof, continuing the given transcript exactly as the prover did.
    pub fn verify_with_challenger(
        &self,
        commitment: &FriCommitment,
        proof: &FriProof,
        challenger: &mut Challenger,
    ) -> Result<(), StarkError> {
        let field = self.field();
        let config = self.config();
        let num_rounds = proof.rounds.len();
        ensure_proof!(
            num_rounds <= config.num_rounds(),
            FriVerificationFailed,
            "{} rounds exceed the maximum of {}",
            num_rounds,
            config.num_rounds()
        );
        let domains = self.layer_domains(num_rounds + 1)?;

        let mut bound = config.max_degree - 1;
        verify_layer(
            field,
            &domains[0],
            &commitment.root,
            &commitment.evaluations,
            &commitment.polynomial,
            bound,
            0,
        )?;
        challenger.observe_digest(&commitment.root);

        let mut previous_degree = commitment.polynomial.degree();
        for (i, round) in proof.rounds.iter().enumerate() {
            ensure_proof!(
                previous_degree > 1,
                FriVerificationFailed,
                "round {} folds a polynomial that already has degree {}",
                i,
                previous_degree
            );
            let challenge = challenger.get_challenge(field);
            ensure_proof!(
                round.challenge == challenge,
                FriVerificationFailed,
                "round {} challenge does not match the transcript",
                i
            );

            bound /= 2;
            verify_layer(
                field,
                &domains[i + 1],
                &round.root,
                &round.evaluations,
                &round.polynomial,
                bound,
                i + 1,
            )?;
            ensure_proof!(
                round.polynomial.degree() < previous_degree,
                FriVerificationFailed,
                "round {} does not reduce the degree",
                i
            );
            challenger.observe_digest(&round.root);
            previous_degree = round.polynomial.degree();
        }
        ensure_proof!(
            num_rounds == config.num_rounds() || previous_degree <= 1,
            FriVerificationFailed,
            "terminal polynomial has degree {} after {} rounds",
            previous_degree,
            num_rounds
        );

        let half = domains[0].size() / 2;
        let indices = challenger.get_n_indices(half, config.num_queries);
        ensure_proof!(
            proof.query_round_proofs.len() == indices.len(),
            FriVerificationFailed,
            "expected {} query rounds, got {}",
            indices.len(),
            proof.query_round_proofs.len()
        );

        let mut roots = vec![commitment.root];
        roots.extend(proof.rounds.iter().map(|round| round.root));
        for (query, &index) in proof.query_round_proofs.iter().zip(&indices) {
            fri_verifier_query_round(field, proof, query, index, &domains, &roots)?;
        }

        Ok(())
    }
}

/// Checks a layer against its root, its stated polynomial and its degree bound.
fn verify_layer(
    field: &PrimeField,
    domain: &Domain,
    root: &Digest,
    evaluations: &Codeword,
    polynomial: &Polynomial,
    degree_bound: usize,
    layer: usize,
) -> Result<(), StarkError> {
    ensure_proof!(
        evaluations.len() == domain.size(),
        FriVerificationFailed,
        "layer {} has {} evaluations, expected {}",
        layer,
        evaluations.len(),
        domain.size()
    );
    ensure_proof!(
        evaluations.iter().all(|x| field.is_canonical(x))
            && polynomial.coeffs().iter().all(|x| field.is_canonical(x)),
        FriVerificationFailed,
        "layer {} contains non-canonical field elements",
        layer
    );
    ensure_proof!(
        codeword_root(evaluations) == *root,
        CommitmentMismatch,
        "layer {} root does not match its evaluations",
        layer
    );
    ensure_proof!(
        polynomial.degree() <= degree_bound,
        FriVerificationFailed,
        "layer {} has degree {} above the bound {}",
        layer,
        polynomial.degree(),
        degree_bound
    );
    ensure_proof!(
        polynomial.evaluate_on_domain(field, domain) == *evaluations,
        FriVerificationFailed,
        "layer {} evaluations disagree with its polynomial",
        layer
    );
    Ok(())
}

/// Checks the openings of one query and that each layer folds into the next.
fn fri_verifier_query_round(
    field: &PrimeField,
    proof: &FriProof,
    query: &FriQueryRound,
    index: usize,
    domains: &[Domain],
    roots: &[Digest],
) -> Result<(), StarkError> {
    ensure_proof!(
        query.index == index,
        FriVerificationFailed,
        "query index {} does not match the transcript index {}",
        query.index,
        index
    );
    ensure_proof!(
        query.steps.len() == proof.rounds.len(),
        FriVerificationFailed,
        "query {} opens {} layers, expected {}",
        index,
        query.steps.len(),
        proof.rounds.len()
    );

    for (i, step) in query.steps.iter().enumerate() {
        let half = domains[i].size() / 2;
        let x_index = index % half;
        let neg_x_index = x_index + half;
        let (f_x, f_neg_x) = &step.evals;
        verify_merkle_proof(
            std::slice::from_ref(f_x),
            x_index,
            &roots[i],
            &step.merkle_proofs.0,
        )?;
        verify_merkle_proof(
            std::slice::from_ref(f_neg_x),
            neg_x_index,
            &roots[i],
            &step.merkle_proofs.1,
        )?;

        // (f(x) + f(-x)) / 2 + alpha * (f(x) - f(-x)) / (2x), which is the line through
        // (x, f(x)) and (-x, f(-x)) evaluated at alpha.
        let x = domains[i].point(x_index);
        let neg_x = domains[i].point(neg_x_index);
        let alpha = &proof.rounds[i].challenge;
        let folded = interpolate2(field, [(x, f_x), (neg_x, f_neg_x)], alpha)?;

        let expected = next_layer_value(proof, query, i, x_index);
        ensure_proof!(
            folded == *expected,
            FriVerificationFailed,
            "query {} is inconsistent between layers {} and {}",
            index,
            i,
            i + 1
        );
    }
    Ok(())
}

/// The value of layer `i + 1` at `x^2`, which sits at index `x_index` of that layer.
fn next_layer_value<'a>(
    proof: &'a FriProof,
    query: &'a FriQueryRound,
    i: usize,
    x_index: usize,
) -> &'a FieldElement {
    match query.steps.get(i + 1) {
        Some(next_step) => {
            let next_half = proof.rounds[i].evaluations.len() / 2;
            if x_index < next_half {
                &next_step.evals.0
            } else {
                &next_step.evals.1
            }
        }
        None => &proof.rounds[i].evaluations[x_index],
    }
}
