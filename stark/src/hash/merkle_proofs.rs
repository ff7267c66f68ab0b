use primestark_field::FieldElement;
use serde::{Deserialize, Serialize};

use crate::ensure_proof;
use crate::error::ProofError;
use crate::hash::{hash_elements, two_to_one, Digest};

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct MerkleProof {
    /// The Merkle digest of each sibling subtree, staying from the bottommost layer.
    pub siblings: Vec<Digest>,
}

impl MerkleProof {
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }
}

/// Verifies that the given leaf data is present at the given index in the Merkle tree with the
/// given root.
pub fn verify_merkle_proof(
    leaf_data: &[FieldElement],
    leaf_index: usize,
    merkle_root: &Digest,
    proof: &MerkleProof,
) -> Result<(), ProofError> {
    let mut index = leaf_index;
    let mut current_digest = hash_elements(leaf_data);
    for sibling_digest in proof.siblings.iter() {
        let bit = index & 1;
        index >>= 1;
        current_digest = if bit == 1 {
            two_to_one(sibling_digest, &current_digest)
        } else {
            two_to_one(&current_digest, sibling_digest)
        }
    }
    ensure_proof!(
        index == 0 && current_digest == *merkle_root,
        CommitmentMismatch,
        "invalid Merkle proof for leaf {}",
        leaf_index
    );

    Ok(())
}
