use quartz_crypto::hash::{Commitment, DIGEST_SIZE};
use quartz_crypto::merkle_tree::proof::BatchMerkleProof;
use quartz_math::field::traits::{IsFFTField, IsPrimeField};

use crate::fri::proof::FriProof;

/// A complete STARK proof.
///
/// `ev_root`/`ev_proof` commit and open the merged trace and secret-input
/// evaluations; `ld_proof` carries the full FRI argument for the linear
/// combination; `input_shapes` are application-defined counts the AIR uses
/// to reconstruct its context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarkProof<F: IsFFTField> {
    pub ev_root: Commitment,
    pub ev_proof: BatchMerkleProof,
    pub ld_proof: FriProof<F>,
    pub input_shapes: Vec<u32>,
}

fn batch_proof_size(proof: &BatchMerkleProof) -> usize {
    let values: usize = proof.values.iter().map(|v| v.len()).sum();
    let node_headers = proof.nodes.len();
    let node_entries: usize = proof
        .nodes
        .iter()
        .flat_map(|column| column.iter().map(|entry| entry.len()))
        .sum();
    // array count byte + values, matrix count byte + per-column headers +
    // entries, depth byte
    1 + values + 1 + node_headers + node_entries + 1
}

impl<F: IsFFTField + IsPrimeField> StarkProof<F> {
    /// Exact length of the canonical serialization, computed structurally.
    pub fn size_in_bytes(&self) -> usize {
        let element_size = F::ELEMENT_SIZE;

        let ld = DIGEST_SIZE
            + batch_proof_size(&self.ld_proof.lc_proof)
            + 1
            + self
                .ld_proof
                .components
                .iter()
                .map(|component| {
                    DIGEST_SIZE
                        + batch_proof_size(&component.column_proof)
                        + batch_proof_size(&component.poly_proof)
                })
                .sum::<usize>()
            + 1
            + self.ld_proof.remainder.len() * element_size;

        DIGEST_SIZE
            + batch_proof_size(&self.ev_proof)
            + ld
            + 1
            + self.input_shapes.len() * 4
    }
}
