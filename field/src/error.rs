use thiserror::Error;

/// An arithmetic precondition was violated. Never recovered from silently: a wrong arithmetic
/// result would make every downstream proof unsound.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum MathError {
    #[error("zero has no multiplicative inverse")]
    NoInverse,
    #[error("interpolation points must have distinct x-coordinates")]
    DuplicatePoint,
}

/// The caller configured a component with parameters it cannot work with.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("codeword length {n} must exceed message length {k} (and k must be non-zero)")]
    InvalidRate { k: usize, n: usize },
    #[error("no multiplicative subgroup of size {size}: it must be non-zero and divide p - 1")]
    DomainSizeInvalid { size: usize },
    #[error("modulus {0} is not an odd prime")]
    NotPrime(String),
    #[error("{name} must be a power of two, got {value}")]
    NotPowerOfTwo { name: &'static str, value: usize },
    #[error("configuration falls short of target security {target} bits, reaching only {actual}")]
    InsufficientSecurity { target: usize, actual: usize },
}

/// A caller-supplied input is malformed.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ValidationError {
    #[error("expected length {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("cell ({row}, {col}) is outside a {length}x{width} trace")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        length: usize,
        width: usize,
    },
    #[error("polynomial of degree {degree} exceeds the bound {max_degree}")]
    DegreeTooLarge { degree: usize, max_degree: usize },
    #[error("malformed input: {0}")]
    Malformed(String),
}
