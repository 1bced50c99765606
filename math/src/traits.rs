use core::fmt::Display;

#[derive(Debug, PartialEq, Eq)]
pub enum ByteConversionError {
    InvalidLength { expected: usize, got: usize },
    NonCanonical,
}

impl Display for ByteConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ByteConversionError::InvalidLength { expected, got } => {
                write!(f, "expected {expected} bytes, got {got}")
            }
            ByteConversionError::NonCanonical => {
                write!(f, "bytes encode a value outside the field")
            }
        }
    }
}

impl std::error::Error for ByteConversionError {}

/// Fixed-width little-endian byte serialization of field elements.
pub trait ByteConversion: Sized {
    fn to_bytes_le(&self) -> Vec<u8>;
    fn from_bytes_le(bytes: &[u8]) -> Result<Self, ByteConversionError>;
}
