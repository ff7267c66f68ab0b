use primestark_field::FieldElement;

use crate::hash::merkle_proofs::MerkleProof;
use crate::hash::{hash_bytes, hash_elements, two_to_one, Digest};

/// A binary Merkle tree over leaves of field elements, keyed by leaf index.
///
/// A level with an odd number of nodes pairs its last node with itself.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    /// The data in the leaves of the Merkle tree.
    pub leaves: Vec<Vec<FieldElement>>,

    /// `layers[0]` holds the leaf digests and the last layer holds the root alone.
    layers: Vec<Vec<Digest>>,
}

impl MerkleTree {
    pub fn new(leaves: Vec<Vec<FieldElement>>) -> Self {
        if leaves.is_empty() {
            return Self {
                leaves,
                layers: vec![vec![hash_bytes(&[])]],
            };
        }

        let mut layers = vec![leaves.iter().map(|leaf| hash_elements(leaf)).collect::<Vec<_>>()];
        while layers[layers.len() - 1].len() > 1 {
            let below = &layers[layers.len() - 1];
            let above = below
                .chunks(2)
                .map(|pair| two_to_one(&pair[0], pair.get(1).unwrap_or(&pair[0])))
                .collect();
            layers.push(above);
        }

        Self { leaves, layers }
    }

    /// Commits to a codeword, one element per leaf.
    pub fn from_codeword(codeword: &[FieldElement]) -> Self {
        Self::new(codeword.iter().map(|x| vec![x.clone()]).collect())
    }

    pub fn root(&self) -> Digest {
        self.layers[self.layers.len() - 1][0]
    }

    pub fn num_leaves(&self) -> usize {
        self.leaves.len()
    }

    /// The number of siblings in every authentication path.
    pub fn height(&self) -> usize {
        self.layers.len() - 1
    }

    pub fn get(&self, i: usize) -> &[FieldElement] {
        &self.leaves[i]
    }

    /// Create a Merkle proof from a leaf index.
    pub fn prove(&self, leaf_index: usize) -> MerkleProof {
        assert!(leaf_index < self.leaves.len(), "leaf index out of range");
        let mut index = leaf_index;
        let siblings = self.layers[..self.height()]
            .iter()
            .map(|layer| {
                let sibling = layer.get(index ^ 1).unwrap_or(&layer[index]);
                index >>= 1;
                *sibling
            })
            .collect();
        MerkleProof { siblings }
    }
}

/// The Merkle root of a codeword, as [`MerkleTree::from_codeword`] would compute it.
pub fn codeword_root(codeword: &[FieldElement]) -> Digest {
    MerkleTree::from_codeword(codeword).root()
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use primestark_field::PrimeField;
    use rand::thread_rng;

    use super::*;
    use crate::hash::merkle_proofs::verify_merkle_proof;

    fn random_data(field: &PrimeField, n: usize, k: usize) -> Vec<Vec<FieldElement>> {
        let mut rng = thread_rng();
        (0..n).map(|_| field.sample_vec(&mut rng, k)).collect()
    }

    fn verify_all_leaves(leaves: Vec<Vec<FieldElement>>) -> Result<()> {
        let tree = MerkleTree::new(leaves.clone());
        for (i, leaf) in leaves.into_iter().enumerate() {
            let proof = tree.prove(i);
            assert_eq!(proof.len(), tree.height());
            verify_merkle_proof(&leaf, i, &tree.root(), &proof)?;
        }
        Ok(())
    }

    #[test]
    fn test_merkle_trees() -> Result<()> {
        let field = PrimeField::goldilocks();
        for log_n in 0..5 {
            verify_all_leaves(random_data(&field, 1 << log_n, 3))?;
        }
        Ok(())
    }

    #[test]
    fn test_odd_sized_trees() -> Result<()> {
        let field = PrimeField::stark252();
        for n in [3, 5, 6, 7] {
            verify_all_leaves(random_data(&field, n, 2))?;
        }
        Ok(())
    }

    #[test]
    fn root_depends_on_every_leaf() {
        let field = PrimeField::goldilocks();
        let leaves = random_data(&field, 8, 1);
        let root = MerkleTree::new(leaves.clone()).root();
        for i in 0..8 {
            let mut tampered = leaves.clone();
            tampered[i][0] = field.add(&tampered[i][0], &field.one());
            assert_ne!(MerkleTree::new(tampered).root(), root);
        }
    }

    #[test]
    fn codeword_leaves() {
        let field = PrimeField::goldilocks();
        let codeword: Vec<_> = (0..4).map(|i| field.element(i)).collect();
        let tree = MerkleTree::from_codeword(&codeword);
        assert_eq!(tree.num_leaves(), 4);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.get(2), &[field.element(2)]);
        assert_eq!(codeword_root(&codeword), tree.root());
    }
}
