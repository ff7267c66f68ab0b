use log::{debug, trace};
use primestark_field::{Domain, Polynomial};

use crate::challenger::Challenger;
use crate::error::StarkError;
use crate::fri::proof::{FriCommitment, FriProof, FriQueryRound, FriQueryStep, FriRound};
use crate::fri::Fri;
use crate::hash::merkle_tree::MerkleTree;

impl Fri {
    /// Builds a FRI proof for `commitment` with a fresh transcript.
    pub fn prove(&self, commitment: &FriCommitment) -> Result<FriProof, StarkError> {
        let mut challenger = Challenger::new();
        self.prove_with_challenger(commitment, &mut challenger)
    }

    /// Builds a FRI proof, continuing the given transcript. The commitment root is observed first.
    pub fn prove_with_challenger(
        &self,
        commitment: &FriCommitment,
        challenger: &mut Challenger,
    ) -> Result<FriProof, StarkError> {
        challenger.observe_digest(&commitment.root);

        // Commit phase
        let (rounds, trees) = self.fri_committed_trees(commitment, challenger)?;

        // Query phase
        let query_round_proofs = self.fri_prover_query_rounds(&trees, challenger);

        Ok(FriProof {
            rounds,
            query_round_proofs,
        })
    }

    fn fri_committed_trees(
        &self,
        commitment: &FriCommitment,
        challenger: &mut Challenger,
    ) -> Result<(Vec<FriRound>, Vec<MerkleTree>), StarkError> {
        let field = self.field();
        let mut trees = vec![MerkleTree::from_codeword(&commitment.evaluations)];
        let mut rounds = Vec::new();

        let mut polynomial: Polynomial = commitment.polynomial.clone();
        let mut domain: Domain = self.domain().clone();
        while rounds.len() < self.config().num_rounds() && polynomial.degree() > 1 {
            let challenge = challenger.get_challenge(field);
            polynomial = polynomial.fold(field, &challenge);
            domain = domain.squared(field)?;

            let evaluations = polynomial.evaluate_on_domain(field, &domain);
            let tree = MerkleTree::from_codeword(&evaluations);
            let root = tree.root();
            challenger.observe_digest(&root);
            trace!(
                "FRI round {}: degree {} over {} points, root {}",
                rounds.len(),
                polynomial.degree(),
                domain.size(),
                root
            );

            rounds.push(FriRound {
                challenge,
                polynomial: polynomial.clone(),
                evaluations,
                root,
            });
            trees.push(tree);
        }

        debug!(
            "FRI folded to degree {} in {} rounds",
            polynomial.degree(),
            rounds.len()
        );
        Ok((rounds, trees))
    }

    fn fri_prover_query_rounds(
        &self,
        trees: &[MerkleTree],
        challenger: &mut Challenger,
    ) -> Vec<FriQueryRound> {
        let half = self.domain().size() / 2;
        challenger
            .get_n_indices(half, self.config().num_queries)
            .into_iter()
            .map(|index| fri_prover_query_round(trees, index))
            .collect()
    }
}

/// Opens every layer except the terminal one at `x` and `-x`.
fn fri_prover_query_round(trees: &[MerkleTree], index: usize) -> FriQueryRound {
    let folded_layers = &trees[..trees.len() - 1];
    let steps = folded_layers
        .iter()
        .map(|tree| {
            let half = tree.num_leaves() / 2;
            let x_index = index % half;
            let neg_x_index = x_index + half;
            FriQueryStep {
                evals: (
                    tree.get(x_index)[0].clone(),
                    tree.get(neg_x_index)[0].clone(),
                ),
                merkle_proofs: (tree.prove(x_index), tree.prove(neg_x_index)),
            }
        })
        .collect();
    FriQueryRound { index, steps }
}
