use std::collections::BTreeSet;

use quartz_crypto::hash::HashFunction;

use crate::errors::InsufficientEntropy;

const REJECTION_CAP_FACTOR: usize = 1000;

/// Pseudorandom sampling of query positions from a commitment root.
///
/// Candidates are `H(H(seed) || counter) mod domain_size`; multiples of the
/// extension factor are rejected so queries never land on execution-domain
/// points, and duplicates are rejected until the requested count is reached.
#[derive(Debug, Clone, Copy)]
pub struct QueryIndexGenerator {
    hash: HashFunction,
    extension_factor: usize,
    exe_query_count: usize,
    fri_query_count: usize,
}

impl QueryIndexGenerator {
    pub fn new(
        hash: HashFunction,
        extension_factor: usize,
        exe_query_count: usize,
        fri_query_count: usize,
    ) -> Self {
        Self {
            hash,
            extension_factor,
            exe_query_count,
            fri_query_count,
        }
    }

    /// Positions at which the execution trace is opened.
    pub fn exe_indexes(
        &self,
        seed: &[u8],
        domain_size: usize,
    ) -> Result<Vec<usize>, InsufficientEntropy> {
        self.draw(seed, domain_size, self.exe_query_count)
    }

    /// Positions at which a FRI column is opened.
    pub fn fri_indexes(
        &self,
        seed: &[u8],
        column_length: usize,
    ) -> Result<Vec<usize>, InsufficientEntropy> {
        self.draw(seed, column_length, self.fri_query_count)
    }

    fn draw(
        &self,
        seed: &[u8],
        domain_size: usize,
        requested: usize,
    ) -> Result<Vec<usize>, InsufficientEntropy> {
        // The exclusion rule removes one position in `extension_factor`.
        let available = domain_size - domain_size / self.extension_factor;
        let requested = requested.min(available);

        let state = self.hash.digest(seed);
        let mut chosen = BTreeSet::new();
        let mut counter = 0u64;
        let cap = (REJECTION_CAP_FACTOR * requested) as u64;

        while chosen.len() < requested {
            if counter >= cap {
                return Err(InsufficientEntropy { requested });
            }
            let digest = self.hash.digest_with_counter(&state, counter);
            counter += 1;

            let candidate =
                (u64::from_be_bytes(digest[..8].try_into().unwrap()) % domain_size as u64) as usize;
            if candidate % self.extension_factor == 0 {
                continue;
            }
            chosen.insert(candidate);
        }

        Ok(chosen.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> QueryIndexGenerator {
        QueryIndexGenerator::new(HashFunction::Sha256, 4, 80, 40)
    }

    #[test]
    fn indexes_are_distinct_in_range_and_exclude_trace_positions() {
        let positions = generator().exe_indexes(&[7u8; 32], 1024).unwrap();
        assert_eq!(positions.len(), 80);
        let mut seen = std::collections::HashSet::new();
        for p in &positions {
            assert!(*p < 1024);
            assert_ne!(p % 4, 0);
            assert!(seen.insert(*p));
        }
    }

    #[test]
    fn indexes_are_sorted_and_deterministic() {
        let a = generator().exe_indexes(&[1u8; 32], 512).unwrap();
        let b = generator().exe_indexes(&[1u8; 32], 512).unwrap();
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(a, sorted);
    }

    #[test]
    fn count_is_capped_by_the_available_positions() {
        // 32 positions minus 8 excluded leaves 24.
        let positions = generator().exe_indexes(&[3u8; 32], 32).unwrap();
        assert_eq!(positions.len(), 24);
    }

    #[test]
    fn fri_indexes_use_their_own_budget() {
        let positions = generator().fri_indexes(&[9u8; 32], 256).unwrap();
        assert_eq!(positions.len(), 40);
    }

    #[test]
    fn different_seeds_give_different_positions() {
        let a = generator().exe_indexes(&[1u8; 32], 512).unwrap();
        let b = generator().exe_indexes(&[2u8; 32], 512).unwrap();
        assert_ne!(a, b);
    }
}
