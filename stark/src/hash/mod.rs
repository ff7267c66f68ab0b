pub mod merkle_proofs;
pub mod merkle_tree;

use std::fmt;

use keccak_hash::keccak;
use primestark_field::types::elements_to_bytes;
use primestark_field::FieldElement;
use serde::{Deserialize, Serialize};

pub const DIGEST_BYTES: usize = 32;

/// Prefixes keeping leaf and internal-node preimages disjoint.
const LEAF_TAG: u8 = 0;
const NODE_TAG: u8 = 1;

/// A 256-bit Keccak digest.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Digest(pub [u8; DIGEST_BYTES]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub fn hash_bytes(bytes: &[u8]) -> Digest {
    Digest(keccak(bytes).0)
}

/// Hashes a leaf of field elements, using their length-prefixed encoding.
pub fn hash_elements(elements: &[FieldElement]) -> Digest {
    let mut buffer = vec![LEAF_TAG];
    buffer.extend_from_slice(&elements_to_bytes(elements));
    hash_bytes(&buffer)
}

/// Compresses two child digests into their parent.
pub fn two_to_one(left: &Digest, right: &Digest) -> Digest {
    let mut buffer = [0u8; 1 + 2 * DIGEST_BYTES];
    buffer[0] = NODE_TAG;
    buffer[1..=DIGEST_BYTES].copy_from_slice(&left.0);
    buffer[1 + DIGEST_BYTES..].copy_from_slice(&right.0);
    hash_bytes(&buffer)
}
