use core::fmt::Display;

#[derive(Debug, PartialEq, Eq)]
pub enum FFTError {
    /// The field has no primitive root of unity of order `2^n`.
    RootOfUnityError(u64),
    /// The input length is not a power of two.
    InputError(usize),
}

impl Display for FFTError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FFTError::RootOfUnityError(order) => {
                write!(f, "no primitive root of unity of order 2^{order}")
            }
            FFTError::InputError(len) => {
                write!(f, "input length {len} is not a power of two")
            }
        }
    }
}

impl std::error::Error for FFTError {}
