use primestark_field::{FieldElement, ValidationError};
use serde::{Deserialize, Serialize};

use crate::error::StarkError;
use crate::fri::proof::{FriCommitment, FriProof};
use crate::hash::merkle_proofs::MerkleProof;
use crate::hash::Digest;

/// Purported values of each polynomial at the out-of-domain challenge point `z`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StarkOpeningSet {
    /// Every trace polynomial at `z`.
    pub local_values: Vec<FieldElement>,
    /// Every trace polynomial at `omega * z`.
    pub next_values: Vec<FieldElement>,
    /// The composition polynomial at `z`.
    pub composition_value: FieldElement,
}

impl StarkOpeningSet {
    pub(crate) fn to_elements(&self) -> Vec<FieldElement> {
        self.local_values
            .iter()
            .chain(&self.next_values)
            .chain(Some(&self.composition_value))
            .cloned()
            .collect()
    }
}

/// An LDE row of the trace and the composition value at one queried position, with their
/// authentication paths.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StarkQueryOpening {
    pub index: usize,
    pub trace_row: Vec<FieldElement>,
    pub trace_proof: MerkleProof,
    pub composition_value: FieldElement,
    pub composition_proof: MerkleProof,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProofMetadata {
    pub trace_length: usize,
    pub trace_width: usize,
    pub num_constraints: usize,
    /// Seconds since the Unix epoch.
    pub generated_at: u64,
    pub proving_time_ms: u64,
    /// Length of the JSON encoding of the whole proof.
    pub proof_size_bytes: usize,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StarkProof {
    /// Merkle root of the trace LDE, one leaf per row.
    pub trace_root: Digest,
    /// Merkle root of the composition polynomial's evaluations.
    pub composition_root: Digest,
    pub openings: StarkOpeningSet,
    /// FRI commitment to the DEEP composition polynomial, over the LDE domain.
    pub fri_commitment: FriCommitment,
    pub fri_proof: FriProof,
    /// Two openings per FRI query, at `x` and `-x`.
    pub query_openings: Vec<StarkQueryOpening>,
    pub metadata: ProofMetadata,
}

impl StarkProof {
    pub fn to_json(&self) -> Result<String, StarkError> {
        serde_json::to_string(self)
            .map_err(|e| ValidationError::Malformed(format!("cannot serialize proof: {}", e)).into())
    }

    pub fn from_json(json: &str) -> Result<Self, StarkError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::Malformed(format!("cannot parse proof: {}", e)).into())
    }

    /// Records the JSON size of the proof in its metadata.
    pub(crate) fn record_size(&mut self) -> Result<(), StarkError> {
        // The size field is part of the encoding, so iterate until its digit count settles.
        loop {
            let size = self.to_json()?.len();
            if size == self.metadata.proof_size_bytes {
                return Ok(());
            }
            self.metadata.proof_size_bytes = size;
        }
    }
}
