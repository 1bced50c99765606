use quartz_crypto::hash::Commitment;
use quartz_crypto::merkle_tree::proof::BatchMerkleProof;
use quartz_math::field::element::FieldElement;
use quartz_math::field::traits::{IsFFTField, IsPrimeField};
use quartz_math::traits::ByteConversion;

use crate::errors::SerializationError;

/// One folding layer of the low-degree proof: the commitment to the new
/// column, the opening of that column at the derived query positions, and
/// the opening of the folded layer's fibers at the same positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriComponent {
    pub column_root: Commitment,
    pub column_proof: BatchMerkleProof,
    pub poly_proof: BatchMerkleProof,
}

/// The complete FRI proof: the commitment to `L(x)` over the evaluation
/// domain (whose tree doubles as the first folding layer), its opening at
/// the execution query positions, one component per folding layer, and the
/// final values in the clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriProof<F: IsFFTField> {
    pub lc_root: Commitment,
    pub lc_proof: BatchMerkleProof,
    pub components: Vec<FriComponent>,
    pub remainder: Vec<FieldElement<F>>,
}

/// Groups evaluations into quartic-fiber leaves: leaf `i` serializes
/// `[values[i], values[i + q], values[i + 2q], values[i + 3q]]` with
/// `q = values.len() / 4`.
pub fn fiber_leaves<F: IsFFTField>(values: &[FieldElement<F>]) -> Vec<Vec<u8>>
where
    FieldElement<F>: ByteConversion,
{
    let quarter = values.len() / 4;
    debug_assert_eq!(values.len() % 4, 0);
    (0..quarter)
        .map(|i| {
            let mut leaf = Vec::new();
            for j in 0..4 {
                leaf.extend_from_slice(&values[i + j * quarter].to_bytes_le());
            }
            leaf
        })
        .collect()
}

/// Splits a leaf back into its field elements, validating size and
/// canonicity.
pub fn leaf_to_elements<F: IsFFTField + IsPrimeField>(
    bytes: &[u8],
    count: usize,
) -> Result<Vec<FieldElement<F>>, SerializationError> {
    let element_size = F::ELEMENT_SIZE;
    if bytes.len() != count * element_size {
        return Err(SerializationError::InvalidLeafSize {
            expected: count * element_size,
            got: bytes.len(),
        });
    }
    bytes
        .chunks(element_size)
        .map(|chunk| {
            FieldElement::from_bytes_le(chunk).map_err(|_| SerializationError::InvalidElement)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quartz_math::field::fields::fft_friendly::stark_32_prime_field::Stark32PrimeField;

    type F = Stark32PrimeField;
    type FE = FieldElement<F>;

    #[test]
    fn fiber_leaves_roundtrip_through_leaf_to_elements() {
        let values: Vec<FE> = (0..16u64).map(FE::from).collect();
        let leaves = fiber_leaves(&values);
        assert_eq!(leaves.len(), 4);
        for (i, leaf) in leaves.iter().enumerate() {
            let elements = leaf_to_elements::<F>(leaf, 4).unwrap();
            assert_eq!(
                elements,
                vec![
                    values[i].clone(),
                    values[i + 4].clone(),
                    values[i + 8].clone(),
                    values[i + 12].clone()
                ]
            );
        }
    }

    #[test]
    fn oversized_leaves_are_rejected() {
        let leaf = vec![0u8; 17];
        assert_eq!(
            leaf_to_elements::<F>(&leaf, 4),
            Err(SerializationError::InvalidLeafSize {
                expected: 16,
                got: 17
            })
        );
    }
}
