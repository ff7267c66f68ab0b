use keccak_hash::keccak;
use num::BigUint;
use primestark_field::{FieldElement, PrimeField};

use crate::hash::{Digest, DIGEST_BYTES};

/// Observes prover messages, and generates challenges by hashing the transcript, a la Fiat-Shamir.
///
/// The state is a single Keccak digest. Observing a message replaces it with
/// `keccak(state || message)`; squeezing a challenge hashes the state with two distinct suffixes to
/// get 512 bits, reduces them modulo `p`, then ratchets the state forward. Since 512 bits is more
/// than twice the size of any supported modulus, the bias of the reduction is negligible.
#[derive(Clone, Debug)]
pub struct Challenger {
    state: [u8; DIGEST_BYTES],
}

impl Default for Challenger {
    fn default() -> Self {
        Self::new()
    }
}

impl Challenger {
    pub fn new() -> Self {
        Self::with_domain_separator(b"primestark")
    }

    /// Starts a transcript bound to a protocol label.
    pub fn with_domain_separator(label: &[u8]) -> Self {
        Self {
            state: keccak(label).0,
        }
    }

    pub fn observe_bytes(&mut self, bytes: &[u8]) {
        let mut buffer = Vec::with_capacity(DIGEST_BYTES + bytes.len());
        buffer.extend_from_slice(&self.state);
        buffer.extend_from_slice(bytes);
        self.state = keccak(&buffer).0;
    }

    pub fn observe_element(&mut self, element: &FieldElement) {
        self.observe_bytes(&element.to_bytes());
    }

    pub fn observe_elements(&mut self, elements: &[FieldElement]) {
        for element in elements {
            self.observe_element(element);
        }
    }

    pub fn observe_digest(&mut self, digest: &Digest) {
        self.observe_bytes(digest.as_bytes());
    }

    pub fn observe_usize(&mut self, n: usize) {
        self.observe_bytes(&(n as u64).to_le_bytes());
    }

    fn squeeze(&mut self) -> [u8; 2 * DIGEST_BYTES] {
        let mut output = [0u8; 2 * DIGEST_BYTES];
        for (i, chunk) in output.chunks_mut(DIGEST_BYTES).enumerate() {
            chunk.copy_from_slice(&self.suffixed(i as u8));
        }
        self.state = self.suffixed(2);
        output
    }

    fn suffixed(&self, suffix: u8) -> [u8; DIGEST_BYTES] {
        let mut buffer = [0u8; DIGEST_BYTES + 1];
        buffer[..DIGEST_BYTES].copy_from_slice(&self.state);
        buffer[DIGEST_BYTES] = suffix;
        keccak(buffer).0
    }

    pub fn get_challenge(&mut self, field: &PrimeField) -> FieldElement {
        let bytes = self.squeeze();
        field.element_from_bytes_le(&bytes)
    }

    pub fn get_n_challenges(&mut self, field: &PrimeField, n: usize) -> Vec<FieldElement> {
        (0..n).map(|_| self.get_challenge(field)).collect()
    }

    /// Draws an index uniformly (up to negligible bias) from `[0, n)`.
    pub fn get_index(&mut self, n: usize) -> usize {
        assert!(n > 0, "cannot sample from an empty range");
        let bytes = self.squeeze();
        let reduced = BigUint::from_bytes_le(&bytes) % BigUint::from(n);
        reduced.iter_u64_digits().next().unwrap_or(0) as usize
    }

    pub fn get_n_indices(&mut self, n: usize, count: usize) -> Vec<usize> {
        (0..count).map(|_| self.get_index(n)).collect()
    }
}
