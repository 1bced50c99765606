use core::fmt::Display;

use super::proof::BatchMerkleProof;
use super::utils::*;
use crate::hash::{Commitment, HashFunction};

const ROOT: NodePos = 0;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    OutOfBounds,
    EmptyTree,
    InvalidProof,
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::OutOfBounds => write!(f, "accessed node was out of bounds"),
            Error::EmptyTree => write!(f, "cannot build a Merkle tree without leaves"),
            Error::InvalidProof => write!(f, "batch proof does not match the positions"),
        }
    }
}

impl std::error::Error for Error {}

/// A binary Merkle tree over byte-serialized leaves.
///
/// Nodes live in a heap layout: the root at position 0, children of `i` at
/// `2i + 1` and `2i + 2`, hashed leaves in the second half. The raw leaf
/// rows are retained so openings can reveal them; verifiers re-hash them.
#[derive(Clone)]
pub struct MerkleTree {
    pub root: Commitment,
    nodes: Vec<Commitment>,
    leaves: Vec<Vec<u8>>,
    hash: HashFunction,
}

impl MerkleTree {
    pub fn build(unhashed_leaves: &[Vec<u8>], hash: HashFunction) -> Result<Self, Error> {
        if unhashed_leaves.is_empty() {
            return Err(Error::EmptyTree);
        }
        let mut leaves = unhashed_leaves.to_vec();
        complete_until_power_of_two(&mut leaves);

        let hashed_leaves = hash.digest_values(&leaves);
        let leaves_len = hashed_leaves.len();

        // The first `leaves_len - 1` entries are overwritten below.
        let mut nodes = vec![hashed_leaves[0]; leaves_len - 1];
        nodes.extend(hashed_leaves);

        for pos in (0..leaves_len - 1).rev() {
            nodes[pos] = hash.digest_pair(&nodes[2 * pos + 1], &nodes[2 * pos + 2]);
        }

        Ok(MerkleTree {
            root: nodes[ROOT],
            nodes,
            leaves,
            hash,
        })
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn depth(&self) -> u8 {
        self.leaf_count().trailing_zeros() as u8
    }

    /// Returns the raw (unhashed) leaf at the given index.
    pub fn get_leaf(&self, leaf_index: usize) -> &[u8] {
        &self.leaves[leaf_index]
    }

    /// Builds a batch opening for the given leaf positions.
    ///
    /// Positions are deduplicated and sorted; the proof carries the raw leaf
    /// rows in that order plus, per position, a column with exactly the
    /// sibling data that cannot be derived from the opened leaves. A
    /// column's first entry is a raw sibling leaf when that sibling was not
    /// itself opened; every other entry is an inner-node digest.
    pub fn prove_batch(&self, positions: &[usize]) -> Result<BatchMerkleProof, Error> {
        let leaf_count = self.leaf_count();
        let offset = leaf_count - 1;

        let mut index = positions.to_vec();
        index.sort_unstable();
        index.dedup();
        if index.is_empty() || *index.last().unwrap() >= leaf_count {
            return Err(Error::OutOfBounds);
        }

        let values: Vec<Vec<u8>> = index.iter().map(|p| self.leaves[*p].clone()).collect();
        let mut nodes: Vec<Vec<Vec<u8>>> = vec![Vec::new(); index.len()];

        // Walk the levels bottom-up. Every entry is tagged with the column
        // (original position) that owns the sibling data it may need.
        let mut level: Vec<(NodePos, usize)> = index
            .iter()
            .enumerate()
            .map(|(column, p)| (p + offset, column))
            .collect();
        let mut at_leaf_level = true;

        while level[0].0 != ROOT {
            let mut next = Vec::with_capacity(level.len());
            let mut i = 0;
            while i < level.len() {
                let (pos, column) = level[i];
                let sibling = get_sibling_pos(pos);
                if i + 1 < level.len() && level[i + 1].0 == sibling {
                    // Both children are known; the parent is derivable.
                    next.push((get_parent_pos(pos), column));
                    i += 2;
                } else {
                    if at_leaf_level {
                        nodes[column].push(self.leaves[sibling - offset].clone());
                    } else {
                        nodes[column].push(self.nodes[sibling].to_vec());
                    }
                    next.push((get_parent_pos(pos), column));
                    i += 1;
                }
            }
            level = next;
            at_leaf_level = false;
        }

        Ok(BatchMerkleProof {
            values,
            nodes,
            depth: self.depth(),
        })
    }
}
