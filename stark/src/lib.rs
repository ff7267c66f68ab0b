#![allow(clippy::new_without_default)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![allow(clippy::len_without_is_empty)]

pub mod air;
pub mod challenger;
pub mod config;
pub mod constraint_consumer;
pub mod error;
pub mod fibonacci;
pub mod fri;
pub mod hash;
pub mod proof;
pub mod prover;
pub mod reed_solomon;
pub mod stark;
pub mod timing;
pub mod trace;
pub mod vanishing_poly;
pub mod verifier;

pub use air::Air;
pub use config::StarkConfig;
pub use error::{ProofError, StarkError};
pub use primestark_field as field;
pub use proof::StarkProof;
pub use stark::StarkSystem;
pub use trace::ExecutionTrace;
