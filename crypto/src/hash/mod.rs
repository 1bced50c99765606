use blake2::Blake2s256;
use sha2::{Digest, Sha256};

use quartz_math::field::element::FieldElement;
use quartz_math::field::traits::IsField;
use quartz_math::traits::ByteConversion;

/// Digest size shared by every supported algorithm.
pub const DIGEST_SIZE: usize = 32;

pub type Commitment = [u8; DIGEST_SIZE];

/// A runtime-selectable hash function.
///
/// The algorithm is part of the proof options, so it is a value rather than
/// a type parameter; both variants go through the RustCrypto `Digest` trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashFunction {
    Sha256,
    Blake2s256,
}

fn hash_parts<D: Digest>(parts: &[&[u8]]) -> Commitment {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; DIGEST_SIZE];
    out.copy_from_slice(&hasher.finalize());
    out
}

impl HashFunction {
    pub fn digest(&self, bytes: &[u8]) -> Commitment {
        match self {
            HashFunction::Sha256 => hash_parts::<Sha256>(&[bytes]),
            HashFunction::Blake2s256 => hash_parts::<Blake2s256>(&[bytes]),
        }
    }

    /// Hashes the concatenation of two inner nodes.
    pub fn digest_pair(&self, left: &Commitment, right: &Commitment) -> Commitment {
        match self {
            HashFunction::Sha256 => hash_parts::<Sha256>(&[left, right]),
            HashFunction::Blake2s256 => hash_parts::<Blake2s256>(&[left, right]),
        }
    }

    /// Hashes a seed together with a big-endian counter, the expansion step
    /// behind every pseudorandom derivation in the protocol.
    pub fn digest_with_counter(&self, seed: &[u8], counter: u64) -> Commitment {
        let counter_bytes = counter.to_be_bytes();
        match self {
            HashFunction::Sha256 => hash_parts::<Sha256>(&[seed, &counter_bytes]),
            HashFunction::Blake2s256 => hash_parts::<Blake2s256>(&[seed, &counter_bytes]),
        }
    }

    /// Hashes each byte row into a leaf digest.
    pub fn digest_values(&self, rows: &[Vec<u8>]) -> Vec<Commitment> {
        rows.iter().map(|row| self.digest(row)).collect()
    }
}

/// Interleaves column vectors of field elements into per-row byte strings:
/// row `i` is the concatenation of `vectors[k][i]` over all `k`.
pub fn merge_vector_rows<F: IsField>(vectors: &[Vec<FieldElement<F>>]) -> Vec<Vec<u8>>
where
    FieldElement<F>: ByteConversion,
{
    let row_count = vectors.first().map(|v| v.len()).unwrap_or(0);
    debug_assert!(vectors.iter().all(|v| v.len() == row_count));
    (0..row_count)
        .map(|i| {
            let mut row = Vec::new();
            for vector in vectors {
                row.extend_from_slice(&vector[i].to_bytes_le());
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quartz_math::field::fields::u64_prime_field::FE17;

    #[test]
    fn sha256_digest_of_empty_input() {
        let digest = HashFunction::Sha256.digest(b"");
        // Well-known SHA-256 of the empty string.
        assert_eq!(
            digest[..4],
            [0xe3, 0xb0, 0xc4, 0x42],
        );
    }

    #[test]
    fn algorithms_disagree() {
        let data = b"quartz";
        assert_ne!(
            HashFunction::Sha256.digest(data),
            HashFunction::Blake2s256.digest(data)
        );
    }

    #[test]
    fn counter_changes_the_digest() {
        let h = HashFunction::Sha256;
        assert_ne!(
            h.digest_with_counter(b"seed", 0),
            h.digest_with_counter(b"seed", 1)
        );
    }

    #[test]
    fn merge_interleaves_columns_row_major() {
        let a = vec![FE17::from(1), FE17::from(2)];
        let b = vec![FE17::from(3), FE17::from(4)];
        let rows = merge_vector_rows(&[a, b]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 16);
        assert_eq!(rows[0][0], 1);
        assert_eq!(rows[0][8], 3);
        assert_eq!(rows[1][0], 2);
        assert_eq!(rows[1][8], 4);
    }
}
