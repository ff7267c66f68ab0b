use primestark_field::{Codeword, FieldElement, Polynomial};
use serde::{Deserialize, Serialize};

use crate::hash::merkle_proofs::MerkleProof;
use crate::hash::Digest;

/// A Merkle commitment to the evaluations of a polynomial over the FRI domain.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FriCommitment {
    pub root: Digest,
    pub evaluations: Codeword,
    pub polynomial: Polynomial,
}

/// One folding round: the challenge it used, and the folded polynomial committed over the squared
/// domain.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FriRound {
    pub challenge: FieldElement,
    pub polynomial: Polynomial,
    pub evaluations: Codeword,
    pub root: Digest,
}

/// Evaluations and Merkle proofs of a layer at the symmetric positions `x` and `-x`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FriQueryStep {
    pub evals: (FieldElement, FieldElement),
    pub merkle_proofs: (MerkleProof, MerkleProof),
}

/// The openings of every folded layer for one query, starting from the committed layer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FriQueryRound {
    /// Index into the first half of the committed domain.
    pub index: usize,
    pub steps: Vec<FriQueryStep>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FriProof {
    /// Folding rounds, in order. The last one holds the terminal polynomial.
    pub rounds: Vec<FriRound>,
    /// Query round proofs
    pub query_round_proofs: Vec<FriQueryRound>,
}

impl FriProof {
    /// The terminal polynomial, if any round was performed.
    pub fn final_poly(&self) -> Option<&Polynomial> {
        self.rounds.last().map(|round| &round.polynomial)
    }
}
