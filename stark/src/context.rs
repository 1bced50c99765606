use quartz_crypto::hash::DIGEST_SIZE;

use crate::errors::ConfigurationError;
use crate::proof::options::ProofOptions;

pub const MIN_TRACE_LENGTH: usize = 8;

/// Static description of an AIR instance: trace shape, constraint degrees
/// and the validated proof options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirContext {
    pub trace_length: usize,
    pub trace_columns: usize,
    pub num_secret_inputs: usize,
    pub transition_degrees: Vec<usize>,
    pub options: ProofOptions,
    extension_factor: usize,
}

impl AirContext {
    pub fn new(
        trace_length: usize,
        trace_columns: usize,
        num_secret_inputs: usize,
        transition_degrees: Vec<usize>,
        options: ProofOptions,
    ) -> Result<Self, ConfigurationError> {
        options.validate()?;
        if !trace_length.is_power_of_two() || trace_length < MIN_TRACE_LENGTH {
            return Err(ConfigurationError::InvalidTraceLength(trace_length));
        }
        if trace_columns == 0 {
            return Err(ConfigurationError::NoRegisters);
        }
        // Degree bounds below 2 would let a constraint's quotient reach the
        // composition degree exactly, which FRI cannot attest to.
        if let Some(i) = transition_degrees.iter().position(|d| *d < 2) {
            return Err(ConfigurationError::DegreeTooLow(i));
        }
        let max_degree = transition_degrees.iter().copied().max().unwrap_or(0);
        let extension_factor = options.resolve_extension_factor(max_degree)?;
        if (trace_length as u64) * (extension_factor as u64) > 1u64 << 32 {
            return Err(ConfigurationError::DomainTooLarge(
                trace_length * extension_factor,
            ));
        }

        Ok(Self {
            trace_length,
            trace_columns,
            num_secret_inputs,
            transition_degrees,
            options,
            extension_factor,
        })
    }

    pub fn extension_factor(&self) -> usize {
        self.extension_factor
    }

    pub fn num_transition_constraints(&self) -> usize {
        self.transition_degrees.len()
    }

    pub fn max_constraint_degree(&self) -> usize {
        self.transition_degrees.iter().copied().max().unwrap_or(0)
    }

    /// Estimated security, in bits, of a proof under these parameters.
    /// Reported for information; correctness never relies on it.
    pub fn security_level(&self) -> usize {
        let extension_factor = self.extension_factor as f64;
        let max_degree = self.max_constraint_degree() as f64;
        let exe_bits = (extension_factor / max_degree).log2() * self.options.exe_query_count as f64;
        let fri_bits = extension_factor.log2() * self.options.fri_query_count as f64;
        let hash_bits = (4 * DIGEST_SIZE) as f64;
        exe_bits.min(fri_bits).min(hash_bits).max(0.0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(trace_length: usize, degrees: Vec<usize>) -> Result<AirContext, ConfigurationError> {
        AirContext::new(trace_length, 1, 0, degrees, ProofOptions::default())
    }

    #[test]
    fn accepts_a_basic_configuration() {
        let ctx = context(64, vec![2]).unwrap();
        assert_eq!(ctx.extension_factor(), 4);
        assert_eq!(ctx.max_constraint_degree(), 2);
    }

    #[test]
    fn rejects_non_power_of_two_trace_lengths() {
        assert_eq!(
            context(48, vec![2]),
            Err(ConfigurationError::InvalidTraceLength(48))
        );
    }

    #[test]
    fn rejects_degree_one_systems() {
        assert_eq!(
            context(64, vec![1]),
            Err(ConfigurationError::DegreeTooLow(0))
        );
    }

    #[test]
    fn rejects_low_degree_bounds_anywhere_in_the_table() {
        assert_eq!(
            context(64, vec![2, 1]),
            Err(ConfigurationError::DegreeTooLow(1))
        );
    }

    #[test]
    fn security_level_for_default_fibonacci_like_parameters() {
        let ctx = context(64, vec![2]).unwrap();
        // min(log2(4/2) * 80, log2(4) * 40, 128) = min(80, 80, 128)
        assert_eq!(ctx.security_level(), 80);
    }
}
