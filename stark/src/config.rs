//! A [`StarkConfig`] defines all the parameters to be used when proving a statement with the
//! [`StarkSystem`](crate::stark::StarkSystem).
//!
//! The default configuration is aimed at speed, yielding fast proofs with a modest targeted
//! security level.

use primestark_field::{ConfigError, FieldElement};
use primestark_util::log2_strict;
use serde::{Deserialize, Serialize};

use crate::challenger::Challenger;
use crate::fri::FriConfig;

/// A configuration containing the different parameters used by the STARK prover.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StarkConfig {
    /// The ratio of the low-degree extension domain size to the maximum composition degree.
    pub blowup_factor: usize,

    /// The number of FRI query rounds.
    pub num_queries: usize,

    /// The targeted security level for the proofs generated with this configuration.
    pub security_bits: usize,
}

impl Default for StarkConfig {
    fn default() -> Self {
        Self::standard_fast_config()
    }
}

impl StarkConfig {
    /// Returns a custom STARK configuration.
    pub const fn new(blowup_factor: usize, num_queries: usize, security_bits: usize) -> Self {
        Self {
            blowup_factor,
            num_queries,
            security_bits,
        }
    }

    /// A blowup of 4 with 16 queries, reaching 32 bits of conjectured security.
    pub const fn standard_fast_config() -> Self {
        Self {
            blowup_factor: 4,
            num_queries: 16,
            security_bits: 32,
        }
    }

    /// Conjectured FRI security: each query contributes `log2(blowup_factor)` bits.
    pub fn conjectured_security_bits(&self) -> usize {
        if self.blowup_factor.is_power_of_two() {
            self.num_queries * log2_strict(self.blowup_factor)
        } else {
            0
        }
    }

    /// Checks that this STARK configuration is consistent, i.e. that the different
    /// parameters meet the targeted security level.
    pub fn check_config(&self) -> Result<(), ConfigError> {
        if !self.blowup_factor.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                name: "blowup_factor",
                value: self.blowup_factor,
            });
        }
        if self.blowup_factor < 2 {
            return Err(ConfigError::InvalidRate {
                k: 1,
                n: self.blowup_factor,
            });
        }

        let actual = self.conjectured_security_bits();
        if actual < self.security_bits {
            Err(ConfigError::InsufficientSecurity {
                target: self.security_bits,
                actual,
            })
        } else {
            Ok(())
        }
    }

    /// The FRI configuration for a low-degree extension of polynomials below `max_degree`.
    pub fn fri_config(&self, max_degree: usize, domain_offset: FieldElement) -> FriConfig {
        FriConfig {
            max_degree,
            blowup_factor: self.blowup_factor,
            num_queries: self.num_queries,
            domain_offset,
        }
    }

    /// Observes this [`StarkConfig`] for the given [`Challenger`].
    pub fn observe(&self, challenger: &mut Challenger) {
        challenger.observe_usize(self.blowup_factor);
        challenger.observe_usize(self.num_queries);
        challenger.observe_usize(self.security_bits);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = StarkConfig::standard_fast_config();
        assert!(config.check_config().is_ok());
        assert_eq!(config.conjectured_security_bits(), 32);

        let high_rate_config = StarkConfig::new(16, 25, 100);
        assert!(high_rate_config.check_config().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        // 2 * 30 = 60 bits of conjectured security falls short of the 100 bit target.
        let too_few_queries_config = StarkConfig::new(4, 30, 100);
        assert_eq!(
            too_few_queries_config.check_config(),
            Err(ConfigError::InsufficientSecurity {
                target: 100,
                actual: 60
            })
        );

        assert!(matches!(
            StarkConfig::new(3, 100, 10).check_config(),
            Err(ConfigError::NotPowerOfTwo { .. })
        ));
        assert!(matches!(
            StarkConfig::new(1, 100, 0).check_config(),
            Err(ConfigError::InvalidRate { .. })
        ));
    }
}
