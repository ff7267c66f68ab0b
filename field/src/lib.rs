#![allow(clippy::new_without_default)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::return_self_not_must_use)]

pub mod domain;
pub mod error;
pub mod factor;
pub mod interpolation;
pub mod polynomial;
pub mod prime_field;
pub mod types;

pub use domain::Domain;
pub use error::{ConfigError, MathError, ValidationError};
pub use polynomial::{Codeword, Polynomial};
pub use prime_field::PrimeField;
pub use types::FieldElement;
