//! FRI, the low-degree proximity protocol: a polynomial's evaluations are committed, then folded
//! in half repeatedly with verifier challenges until a polynomial of degree at most one remains.

use log::debug;
use primestark_field::{
    ConfigError, Domain, FieldElement, Polynomial, PrimeField, ValidationError,
};
use primestark_util::log2_ceil;
use serde::{Deserialize, Serialize};

use crate::error::StarkError;
use crate::hash::merkle_tree::MerkleTree;

pub mod proof;
pub mod prover;
pub mod verifier;

pub use proof::{FriCommitment, FriProof, FriQueryRound, FriQueryStep, FriRound};

/// A configuration for the FRI protocol.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FriConfig {
    /// Committed polynomials must have degree strictly below this. A power of two.
    pub max_degree: usize,

    /// The ratio of the evaluation domain size to `max_degree`. A power of two, at least 2.
    pub blowup_factor: usize,

    /// Number of query rounds to perform.
    pub num_queries: usize,

    /// The evaluation domain is the coset `domain_offset * H`.
    pub domain_offset: FieldElement,
}

impl FriConfig {
    /// A configuration with 8 queries over the plain subgroup.
    pub fn new(max_degree: usize, blowup_factor: usize) -> Self {
        Self {
            max_degree,
            blowup_factor,
            num_queries: 8,
            domain_offset: FieldElement::one(),
        }
    }

    /// The number of folding rounds, at most.
    pub fn num_rounds(&self) -> usize {
        log2_ceil(self.max_degree)
    }

    pub fn domain_size(&self) -> usize {
        self.max_degree * self.blowup_factor
    }
}

/// A FRI instance over a fixed field and evaluation domain.
#[derive(Clone, Debug)]
pub struct Fri {
    field: PrimeField,
    config: FriConfig,
    domain: Domain,
}

impl Fri {
    pub fn new(field: PrimeField, config: FriConfig) -> Result<Self, StarkError> {
        if !config.max_degree.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                name: "max_degree",
                value: config.max_degree,
            }
            .into());
        }
        if !config.blowup_factor.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                name: "blowup_factor",
                value: config.blowup_factor,
            }
            .into());
        }
        if config.blowup_factor < 2 {
            return Err(ConfigError::InvalidRate {
                k: config.max_degree,
                n: config.domain_size(),
            }
            .into());
        }
        if config.domain_offset.is_zero() || !field.is_canonical(&config.domain_offset) {
            return Err(ValidationError::Malformed(
                "the domain offset must be a non-zero field element".to_string(),
            )
            .into());
        }

        let domain = Domain::coset(&field, config.domain_size(), config.domain_offset.clone())?;
        debug!(
            "FRI over a domain of size {} with up to {} rounds and {} queries",
            domain.size(),
            config.num_rounds(),
            config.num_queries
        );
        Ok(Self {
            field,
            config,
            domain,
        })
    }

    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    pub fn config(&self) -> &FriConfig {
        &self.config
    }

    /// The evaluation domain of the committed codeword.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Evaluates `polynomial` over the domain and commits to the evaluations.
    pub fn commit(&self, polynomial: &Polynomial) -> Result<FriCommitment, StarkError> {
        if polynomial.degree() >= self.config.max_degree {
            return Err(ValidationError::DegreeTooLarge {
                degree: polynomial.degree(),
                max_degree: self.config.max_degree,
            }
            .into());
        }
        let evaluations = polynomial.evaluate_on_domain(&self.field, &self.domain);
        let root = MerkleTree::from_codeword(&evaluations).root();
        Ok(FriCommitment {
            root,
            evaluations,
            polynomial: polynomial.clone(),
        })
    }

    /// The domains of every layer, starting with the committed one and squaring once per round.
    pub(crate) fn layer_domains(&self, num_layers: usize) -> Result<Vec<Domain>, ConfigError> {
        let mut domains = vec![self.domain.clone()];
        for _ in 1..num_layers {
            let next = domains[domains.len() - 1].squared(&self.field)?;
            domains.push(next);
        }
        Ok(domains)
    }
}
