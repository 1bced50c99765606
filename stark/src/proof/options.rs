use quartz_crypto::hash::HashFunction;

use crate::errors::ConfigurationError;

pub const MAX_EXTENSION_FACTOR: usize = 32;
pub const MAX_EXE_QUERY_COUNT: usize = 128;
pub const MAX_FRI_QUERY_COUNT: usize = 64;

pub const DEFAULT_EXE_QUERY_COUNT: usize = 80;
pub const DEFAULT_FRI_QUERY_COUNT: usize = 40;

/// Parameters of the proof system.
///
/// `extension_factor` of `None` resolves to the smallest power of two that is
/// at least twice the maximum transition constraint degree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofOptions {
    pub extension_factor: Option<usize>,
    pub exe_query_count: usize,
    pub fri_query_count: usize,
    pub hash: HashFunction,
}

impl Default for ProofOptions {
    fn default() -> Self {
        Self {
            extension_factor: None,
            exe_query_count: DEFAULT_EXE_QUERY_COUNT,
            fri_query_count: DEFAULT_FRI_QUERY_COUNT,
            hash: HashFunction::Sha256,
        }
    }
}

impl ProofOptions {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let Some(factor) = self.extension_factor {
            if !factor.is_power_of_two() || factor < 2 || factor > MAX_EXTENSION_FACTOR {
                return Err(ConfigurationError::InvalidExtensionFactor(factor));
            }
        }
        if self.exe_query_count == 0 || self.exe_query_count > MAX_EXE_QUERY_COUNT {
            return Err(ConfigurationError::InvalidExeQueryCount(self.exe_query_count));
        }
        if self.fri_query_count == 0 || self.fri_query_count > MAX_FRI_QUERY_COUNT {
            return Err(ConfigurationError::InvalidFriQueryCount(self.fri_query_count));
        }
        Ok(())
    }

    /// Resolves the extension factor against the AIR's maximum constraint
    /// degree, applying the default when none was requested.
    pub fn resolve_extension_factor(
        &self,
        max_constraint_degree: usize,
    ) -> Result<usize, ConfigurationError> {
        let minimum = 2 * max_constraint_degree;
        if minimum > MAX_EXTENSION_FACTOR {
            return Err(ConfigurationError::DegreeTooHigh(max_constraint_degree));
        }
        match self.extension_factor {
            Some(factor) => {
                if factor < minimum {
                    Err(ConfigurationError::ExtensionFactorTooSmall(
                        factor,
                        max_constraint_degree,
                    ))
                } else {
                    Ok(factor)
                }
            }
            None => Ok(minimum.next_power_of_two()),
        }
    }
}
