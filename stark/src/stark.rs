//! The user-facing proof system: a field, a [`StarkConfig`], and the prover and verifier that
//! tie the two together.

use log::{debug, Level};
use primestark_field::{ConfigError, PrimeField, ValidationError};

use crate::air::Air;
use crate::config::StarkConfig;
use crate::error::StarkError;
use crate::proof::StarkProof;
use crate::timing::TimingTree;
use crate::trace::ExecutionTrace;
use crate::{prover, verifier};

#[derive(Clone, Debug)]
pub struct StarkSystem {
    field: PrimeField,
    config: StarkConfig,
}

impl StarkSystem {
    pub fn new(field: PrimeField, config: StarkConfig) -> Result<Self, ConfigError> {
        config.check_config()?;
        Ok(Self { field, config })
    }

    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    pub fn config(&self) -> &StarkConfig {
        &self.config
    }

    /// Proves that `trace` satisfies `air`.
    pub fn generate_proof(
        &self,
        trace: &ExecutionTrace,
        air: &Air,
    ) -> Result<StarkProof, StarkError> {
        self.check_air(air)?;
        let mut timing = TimingTree::new("prove", Level::Debug);
        let proof = prover::prove(&self.config, trace, air, &mut timing)?;
        timing.print();
        debug!(
            "Generated a {} byte proof in {} ms",
            proof.metadata.proof_size_bytes, proof.metadata.proving_time_ms
        );
        Ok(proof)
    }

    /// Whether `proof` shows that some trace satisfies `air`. Never panics on malformed proofs.
    pub fn verify_proof(&self, proof: &StarkProof, air: &Air) -> bool {
        self.check_air(air).is_ok() && verifier::verify_proof(&self.config, proof, air)
    }

    /// Like [`Self::verify_proof`], but reports why a proof was rejected.
    pub fn try_verify_proof(&self, proof: &StarkProof, air: &Air) -> Result<(), StarkError> {
        self.check_air(air)?;
        verifier::try_verify_proof(&self.config, proof, air)
    }

    fn check_air(&self, air: &Air) -> Result<(), StarkError> {
        if air.field() != &self.field {
            return Err(ValidationError::Malformed(
                "the AIR is defined over a different field".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use num::BigUint;
    use primestark_field::MathError;

    use super::*;
    use crate::error::ProofError;
    use crate::fibonacci::{fibonacci_air, fibonacci_result, fibonacci_trace};
    use crate::test_utils::init_logger;

    const NUM_ROWS: usize = 8;

    fn fibonacci_setup(field: &PrimeField) -> (ExecutionTrace, Air) {
        let trace = fibonacci_trace(field, NUM_ROWS);
        let air = fibonacci_air(field, NUM_ROWS, &fibonacci_result(field, NUM_ROWS));
        (trace, air)
    }

    fn fibonacci_proof() -> Result<(StarkSystem, StarkProof, Air)> {
        let field = PrimeField::stark252();
        let system = StarkSystem::new(field.clone(), StarkConfig::standard_fast_config())?;
        let (trace, air) = fibonacci_setup(&field);
        let proof = system.generate_proof(&trace, &air)?;
        Ok((system, proof, air))
    }

    #[test]
    fn fibonacci_proof_verifies() -> Result<()> {
        init_logger();
        let (system, proof, air) = fibonacci_proof()?;
        system.try_verify_proof(&proof, &air)?;
        assert!(system.verify_proof(&proof, &air));
        // Verification is pure.
        assert!(system.verify_proof(&proof, &air));

        assert_eq!(proof.metadata.trace_length, NUM_ROWS);
        assert_eq!(proof.metadata.trace_width, 2);
        assert_eq!(proof.metadata.num_constraints, 5);
        assert!(proof.metadata.proof_size_bytes > 0);
        assert_eq!(
            proof.query_openings.len(),
            2 * system.config().num_queries
        );
        Ok(())
    }

    #[test]
    fn fibonacci_proof_over_goldilocks() -> Result<()> {
        init_logger();
        let field = PrimeField::goldilocks();
        let system = StarkSystem::new(field.clone(), StarkConfig::new(8, 12, 32))?;
        let (trace, air) = fibonacci_setup(&field);
        let proof = system.generate_proof(&trace, &air)?;
        system.try_verify_proof(&proof, &air)?;
        Ok(())
    }

    #[test]
    fn proof_survives_json() -> Result<()> {
        let (system, proof, air) = fibonacci_proof()?;
        let json = proof.to_json()?;
        let parsed = StarkProof::from_json(&json)?;
        assert_eq!(parsed, proof);
        assert!(system.verify_proof(&parsed, &air));
        assert!(StarkProof::from_json("{\"trace_root\": 3}").is_err());
        Ok(())
    }

    #[test]
    fn wrong_public_output_rejected() -> Result<()> {
        let (system, proof, _) = fibonacci_proof()?;
        let field = system.field().clone();
        let wrong = fibonacci_air(&field, NUM_ROWS, &field.element(35));
        assert!(!system.verify_proof(&proof, &wrong));
        Ok(())
    }

    #[test]
    fn tampered_roots_rejected() -> Result<()> {
        let (system, proof, air) = fibonacci_proof()?;

        let mut bad = proof.clone();
        bad.trace_root.0[0] ^= 1;
        assert!(!system.verify_proof(&bad, &air));

        let mut bad = proof;
        bad.composition_root.0[31] ^= 1;
        assert!(!system.verify_proof(&bad, &air));
        Ok(())
    }

    #[test]
    fn tampered_out_of_domain_values_rejected() -> Result<()> {
        let (system, proof, air) = fibonacci_proof()?;
        let field = system.field().clone();

        let mut bad = proof.clone();
        bad.openings.composition_value = field.add(&bad.openings.composition_value, &field.one());
        assert!(!system.verify_proof(&bad, &air));

        let mut bad = proof.clone();
        bad.openings.next_values[1] = field.add(&bad.openings.next_values[1], &field.one());
        assert!(!system.verify_proof(&bad, &air));

        let mut bad = proof;
        bad.openings.local_values.pop();
        assert!(matches!(
            system.try_verify_proof(&bad, &air),
            Err(StarkError::Validation(ValidationError::Malformed(_)))
        ));
        Ok(())
    }

    #[test]
    fn tampered_query_openings_rejected() -> Result<()> {
        let (system, proof, air) = fibonacci_proof()?;
        let field = system.field().clone();

        let mut bad = proof.clone();
        let row = &mut bad.query_openings[3].trace_row;
        row[0] = field.add(&row[0], &field.one());
        assert!(matches!(
            system.try_verify_proof(&bad, &air),
            Err(StarkError::Proof(ProofError::CommitmentMismatch(_)))
        ));

        let mut bad = proof.clone();
        bad.query_openings[0].composition_value = field.zero();
        assert!(!system.verify_proof(&bad, &air));

        let mut bad = proof.clone();
        bad.query_openings.swap(0, 1);
        assert!(!system.verify_proof(&bad, &air));

        let mut bad = proof;
        bad.query_openings.truncate(4);
        assert!(!system.verify_proof(&bad, &air));
        Ok(())
    }

    #[test]
    fn tampered_fri_data_rejected() -> Result<()> {
        let (system, proof, air) = fibonacci_proof()?;
        let field = system.field().clone();

        let mut bad = proof.clone();
        let evals = &mut bad.fri_commitment.evaluations;
        evals[5] = field.add(&evals[5], &field.one());
        assert!(!system.verify_proof(&bad, &air));

        let mut bad = proof.clone();
        bad.fri_proof.query_round_proofs[0].index += 1;
        assert!(!system.verify_proof(&bad, &air));

        let mut bad = proof;
        let unreduced = field.modulus() + BigUint::from(1u32);
        bad.fri_commitment.evaluations[0] = serde_json::from_value(serde_json::to_value(unreduced)?)?;
        assert!(!system.verify_proof(&bad, &air));
        Ok(())
    }

    fn assert_malformed(system: &StarkSystem, proof: &StarkProof, air: &Air) {
        assert!(!system.verify_proof(proof, air));
        assert!(matches!(
            system.try_verify_proof(proof, air),
            Err(StarkError::Validation(ValidationError::Malformed(_)))
        ));
    }

    #[test]
    fn tampered_metadata_rejected() -> Result<()> {
        let (system, proof, air) = fibonacci_proof()?;

        let mut bad = proof.clone();
        bad.metadata.trace_length = 16;
        assert_malformed(&system, &bad, &air);

        let mut bad = proof.clone();
        bad.metadata.trace_length = 6;
        assert!(!system.verify_proof(&bad, &air));

        let mut bad = proof.clone();
        bad.metadata.trace_length = 0;
        assert_malformed(&system, &bad, &air);

        let mut bad = proof;
        bad.metadata.num_constraints = 4;
        assert_malformed(&system, &bad, &air);
        Ok(())
    }

    #[test]
    fn oversized_trace_length_rejected() -> Result<()> {
        let (system, proof, air) = fibonacci_proof()?;

        // The LDE size overflows `usize`.
        let mut bad = proof.clone();
        bad.metadata.trace_length = 1 << 62;
        assert_malformed(&system, &bad, &air);

        // Fits in the two-adic subgroup of the field, but not in the proof.
        let mut bad = proof.clone();
        bad.metadata.trace_length = 1 << 40;
        assert_malformed(&system, &bad, &air);

        let mut bad = proof;
        bad.metadata.trace_length = usize::MAX;
        assert!(!system.verify_proof(&bad, &air));

        // Beyond the two-adic subgroup of Goldilocks.
        let field = PrimeField::goldilocks();
        let system = StarkSystem::new(field.clone(), StarkConfig::standard_fast_config())?;
        let (trace, air) = fibonacci_setup(&field);
        let mut bad = system.generate_proof(&trace, &air)?;
        bad.metadata.trace_length = 1 << 31;
        assert_malformed(&system, &bad, &air);
        Ok(())
    }

    /// Two columns where only the first is pinned by a boundary constraint: `a' = b`.
    fn shift_proof() -> Result<(StarkSystem, StarkProof, Air)> {
        let field = PrimeField::stark252();
        let rows = (0..NUM_ROWS as u64)
            .map(|i| {
                let a = if i == 0 { 7 } else { i + 9 };
                vec![field.element(a), field.element(i + 10)]
            })
            .collect();
        let trace = ExecutionTrace::from_rows(rows)?;
        let mut air = Air::new(field.clone(), 2);
        air.add_boundary_constraint(0, 0, field.element(7));
        air.add_transition_constraint(|f, cur, next| f.sub(&next[0], &cur[1]));

        let system = StarkSystem::new(field, StarkConfig::standard_fast_config())?;
        let proof = system.generate_proof(&trace, &air)?;
        Ok((system, proof, air))
    }

    #[test]
    fn narrowed_trace_width_rejected() -> Result<()> {
        let (system, proof, air) = shift_proof()?;
        system.try_verify_proof(&proof, &air)?;

        let mut bad = proof.clone();
        bad.metadata.trace_width = 1;
        bad.openings.local_values.truncate(1);
        bad.openings.next_values.truncate(1);
        for opening in &mut bad.query_openings {
            opening.trace_row.truncate(1);
        }
        assert_malformed(&system, &bad, &air);

        let mut bad = proof;
        bad.metadata.trace_width = 3;
        assert_malformed(&system, &bad, &air);
        Ok(())
    }

    #[test]
    fn trace_width_must_match_air() -> Result<()> {
        let field = PrimeField::stark252();
        let system = StarkSystem::new(field.clone(), StarkConfig::standard_fast_config())?;
        let trace = fibonacci_trace(&field, NUM_ROWS);
        let mut air = Air::new(field.clone(), 3);
        air.add_boundary_constraint(0, 0, field.one());
        assert!(matches!(
            system.generate_proof(&trace, &air),
            Err(StarkError::Validation(ValidationError::LengthMismatch {
                expected: 3,
                actual: 2
            }))
        ));
        Ok(())
    }

    #[test]
    fn invalid_trace_is_not_proven() -> Result<()> {
        let field = PrimeField::stark252();
        let system = StarkSystem::new(field.clone(), StarkConfig::standard_fast_config())?;
        let (mut trace, air) = fibonacci_setup(&field);
        trace.set(2, 1, field.element(4))?;
        assert!(matches!(
            system.generate_proof(&trace, &air),
            Err(StarkError::Proof(ProofError::ConstraintViolated(_)))
        ));
        Ok(())
    }

    #[test]
    fn trace_length_must_be_a_power_of_two() -> Result<()> {
        let field = PrimeField::stark252();
        let system = StarkSystem::new(field.clone(), StarkConfig::standard_fast_config())?;
        let trace = fibonacci_trace(&field, 6);
        let air = fibonacci_air(&field, 6, &fibonacci_result(&field, 6));
        assert!(matches!(
            system.generate_proof(&trace, &air),
            Err(StarkError::Config(ConfigError::NotPowerOfTwo { .. }))
        ));
        Ok(())
    }

    #[test]
    fn air_over_another_field_rejected() -> Result<()> {
        let system = StarkSystem::new(PrimeField::stark252(), StarkConfig::standard_fast_config())?;
        let (trace, air) = fibonacci_setup(&PrimeField::goldilocks());
        assert!(matches!(
            system.generate_proof(&trace, &air),
            Err(StarkError::Validation(ValidationError::Malformed(_)))
        ));
        Ok(())
    }

    #[test]
    fn insecure_config_rejected() {
        let field = PrimeField::stark252();
        assert!(StarkSystem::new(field.clone(), StarkConfig::new(4, 2, 32)).is_err());
        assert!(StarkSystem::new(field, StarkConfig::new(3, 40, 32)).is_err());
    }

    #[test]
    fn degree_two_constraint() -> Result<()> {
        init_logger();
        // x' = x^2, starting from 3.
        let field = PrimeField::stark252();
        let mut rows = Vec::with_capacity(NUM_ROWS);
        let mut x = field.element(3);
        for _ in 0..NUM_ROWS {
            rows.push(vec![x.clone()]);
            x = field.square(&x);
        }
        let last = rows[NUM_ROWS - 1][0].clone();
        let trace = ExecutionTrace::from_rows(rows)?;

        let mut air = Air::new(field.clone(), 1);
        air.add_boundary_constraint(0, 0, field.element(3));
        air.add_boundary_constraint(NUM_ROWS - 1, 0, last);
        air.add_transition_constraint_with_degree(2, |f, cur, next| {
            f.sub(&next[0], &f.square(&cur[0]))
        });

        let system = StarkSystem::new(field, StarkConfig::standard_fast_config())?;
        let proof = system.generate_proof(&trace, &air)?;
        system.try_verify_proof(&proof, &air)?;
        Ok(())
    }

    #[test]
    fn understated_constraint_degree_is_caught() -> Result<()> {
        // x' = x^3 declared as degree 1: the composition polynomial overflows its bound.
        let field = PrimeField::stark252();
        let mut rows = Vec::with_capacity(NUM_ROWS);
        let mut x = field.element(2);
        for _ in 0..NUM_ROWS {
            rows.push(vec![x.clone()]);
            x = field.pow(&x, 3);
        }
        let trace = ExecutionTrace::from_rows(rows)?;
        let mut air = Air::new(field.clone(), 1);
        air.add_boundary_constraint(0, 0, field.element(2));
        air.add_transition_constraint(|f, cur, next| f.sub(&next[0], &f.pow(&cur[0], 3)));

        let system = StarkSystem::new(field, StarkConfig::standard_fast_config())?;
        let result = system.generate_proof(&trace, &air);
        assert!(matches!(
            result,
            Err(StarkError::Proof(ProofError::ConstraintViolated(_)))
                | Err(StarkError::Math(MathError::NoInverse))
        ));
        Ok(())
    }
}
