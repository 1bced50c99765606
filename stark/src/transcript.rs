use quartz_crypto::hash::HashFunction;
use quartz_math::field::element::FieldElement;
use quartz_math::field::traits::IsPrimeField;

/// Deterministic expansion of a commitment root into field elements.
///
/// Element `i` is the first eight bytes, big-endian, of
/// `H(seed || i_be64)`, reduced modulo the field prime. Prover and verifier
/// share this single implementation, so the derived challenge sequences
/// agree byte for byte.
#[derive(Debug, Clone, Copy)]
pub struct RandomCoin {
    hash: HashFunction,
}

impl RandomCoin {
    pub fn new(hash: HashFunction) -> Self {
        Self { hash }
    }

    /// Draws the element at counter position `index`.
    pub fn field_element<F: IsPrimeField>(&self, seed: &[u8], index: usize) -> FieldElement<F> {
        let digest = self.hash.digest_with_counter(seed, index as u64);
        let word = u64::from_be_bytes(digest[..8].try_into().unwrap());
        FieldElement::from(word % F::modulus())
    }

    /// Draws `count` elements starting at counter position `skip`, so later
    /// consumers can continue a seed's sequence without repeating prefixes.
    pub fn field_elements<F: IsPrimeField>(
        &self,
        seed: &[u8],
        skip: usize,
        count: usize,
    ) -> Vec<FieldElement<F>> {
        (skip..skip + count)
            .map(|i| self.field_element(seed, i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quartz_math::field::fields::fft_friendly::stark_32_prime_field::Stark32PrimeField;

    type F = Stark32PrimeField;

    #[test]
    fn expansion_is_deterministic() {
        let coin = RandomCoin::new(HashFunction::Sha256);
        let a = coin.field_elements::<F>(b"seed", 0, 8);
        let b = coin.field_elements::<F>(b"seed", 0, 8);
        assert_eq!(a, b);
    }

    #[test]
    fn skip_continues_the_sequence() {
        let coin = RandomCoin::new(HashFunction::Sha256);
        let all = coin.field_elements::<F>(b"seed", 0, 8);
        let tail = coin.field_elements::<F>(b"seed", 5, 3);
        assert_eq!(&all[5..], &tail[..]);
    }

    #[test]
    fn different_seeds_diverge() {
        let coin = RandomCoin::new(HashFunction::Sha256);
        assert_ne!(
            coin.field_elements::<F>(b"seed-a", 0, 4),
            coin.field_elements::<F>(b"seed-b", 0, 4)
        );
    }
}
