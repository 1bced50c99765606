use super::merkle::Error;
use super::utils::*;
use crate::hash::{Commitment, HashFunction};

/// A batched Merkle opening.
///
/// `values[i]` is the raw leaf at the i-th of the sorted, deduplicated
/// positions; `nodes[i]` carries the sibling data needed on the path of that
/// position which is not derivable from the other opened leaves. The
/// traversal order is fixed (ascending positions, bottom-up), so the proof
/// bytes are deterministic for a given tree and position set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchMerkleProof {
    pub values: Vec<Vec<u8>>,
    pub nodes: Vec<Vec<Vec<u8>>>,
    pub depth: u8,
}

/// Recomputes the root from a batch opening and compares it against the
/// committed one. Mirrors `MerkleTree::prove_batch` step by step.
pub fn verify_batch(
    root: &Commitment,
    positions: &[usize],
    proof: &BatchMerkleProof,
    hash: HashFunction,
) -> Result<(), Error> {
    let leaf_count = 1usize << proof.depth;
    let offset = leaf_count - 1;

    let mut index = positions.to_vec();
    index.sort_unstable();
    index.dedup();
    if index.is_empty() || *index.last().unwrap() >= leaf_count {
        return Err(Error::OutOfBounds);
    }
    if index.len() != proof.values.len() || index.len() != proof.nodes.len() {
        return Err(Error::InvalidProof);
    }

    let mut cursors = vec![0usize; index.len()];
    let mut level: Vec<(NodePos, usize, Commitment)> = index
        .iter()
        .enumerate()
        .map(|(column, p)| (p + offset, column, hash.digest(&proof.values[column])))
        .collect();
    let mut at_leaf_level = true;

    while level[0].0 != 0 {
        let mut next = Vec::with_capacity(level.len());
        let mut i = 0;
        while i < level.len() {
            let (pos, column, node) = level[i].clone();
            let sibling = get_sibling_pos(pos);
            if i + 1 < level.len() && level[i + 1].0 == sibling {
                let parent = hash.digest_pair(&node, &level[i + 1].2);
                next.push((get_parent_pos(pos), column, parent));
                i += 2;
            } else {
                let datum = proof.nodes[column]
                    .get(cursors[column])
                    .ok_or(Error::InvalidProof)?;
                cursors[column] += 1;

                let sibling_node: Commitment = if at_leaf_level {
                    hash.digest(datum)
                } else {
                    datum
                        .as_slice()
                        .try_into()
                        .map_err(|_| Error::InvalidProof)?
                };

                let parent = if is_left_child(pos) {
                    hash.digest_pair(&node, &sibling_node)
                } else {
                    hash.digest_pair(&sibling_node, &node)
                };
                next.push((get_parent_pos(pos), column, parent));
                i += 1;
            }
        }
        level = next;
        at_leaf_level = false;
    }

    // Every supplied sibling must have been consumed.
    for (column, cursor) in cursors.iter().enumerate() {
        if *cursor != proof.nodes[column].len() {
            return Err(Error::InvalidProof);
        }
    }

    if &level[0].2 == root {
        Ok(())
    } else {
        Err(Error::InvalidProof)
    }
}
