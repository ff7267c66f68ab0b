use primestark_field::{ConfigError, MathError, ValidationError};
use thiserror::Error;

/// A proof was rejected, or a proof could not be produced for the given witness.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ProofError {
    #[error("FRI verification failed: {0}")]
    FriVerificationFailed(String),
    #[error("constraint violated: {0}")]
    ConstraintViolated(String),
    #[error("commitment mismatch: {0}")]
    CommitmentMismatch(String),
}

/// Every error the prover and verifier can return.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum StarkError {
    #[error(transparent)]
    Math(#[from] MathError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Proof(#[from] ProofError),
}

/// Returns early with a [`ProofError`] built from a format string when a condition fails.
#[macro_export]
macro_rules! ensure_proof {
    ($cond:expr, $variant:ident, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::ProofError::$variant(format!($($arg)+)).into());
        }
    };
}
