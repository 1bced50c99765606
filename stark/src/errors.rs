use quartz_math::fft::errors::FFTError;
use thiserror::Error;

/// Invalid proof options or AIR parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("extension factor {0} must be a power of two between 2 and 32")]
    InvalidExtensionFactor(usize),
    #[error("extension factor {0} is smaller than twice the maximum constraint degree {1}")]
    ExtensionFactorTooSmall(usize, usize),
    #[error("execution query count {0} is outside 1..=128")]
    InvalidExeQueryCount(usize),
    #[error("FRI query count {0} is outside 1..=64")]
    InvalidFriQueryCount(usize),
    #[error("trace length {0} must be a power of two of at least 8")]
    InvalidTraceLength(usize),
    #[error("the trace must have at least one register")]
    NoRegisters,
    #[error("transition constraint {0} must carry a degree bound of at least 2")]
    DegreeTooLow(usize),
    #[error("maximum constraint degree {0} is not supported")]
    DegreeTooHigh(usize),
    #[error("evaluation domain of size {0} is not available in this field")]
    DomainTooLarge(usize),
}

/// A boundary assertion that is malformed or unsatisfied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssertionError {
    #[error("assertion references register {register} at step {step}, outside the trace")]
    OutOfRange { register: usize, step: usize },
    #[error("duplicate assertion for register {register} at step {step}")]
    Duplicate { register: usize, step: usize },
    #[error("trace does not satisfy the assertion for register {register} at step {step}")]
    Unsatisfied { register: usize, step: usize },
}

/// The AIR could not produce an execution trace.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("trace generation failed: {0}")]
pub struct TraceGenerationError(pub String);

/// The pseudorandom index sampler exhausted its iteration budget.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("could not sample {requested} distinct query indexes")]
pub struct InsufficientEntropy {
    pub requested: usize,
}

#[derive(Debug, Error)]
pub enum ProvingError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Assertion(#[from] AssertionError),
    #[error(transparent)]
    TraceGeneration(#[from] TraceGenerationError),
    #[error("trace has {rows} rows and {columns} columns, expected {expected_rows}x{expected_columns}")]
    TraceShape {
        rows: usize,
        columns: usize,
        expected_rows: usize,
        expected_columns: usize,
    },
    #[error("transition constraint {constraint} does not evaluate to zero at step {step}")]
    ConstraintViolation { constraint: usize, step: usize },
    #[error(transparent)]
    InsufficientEntropy(#[from] InsufficientEntropy),
    #[error("commitment failed")]
    Commitment(#[from] quartz_crypto::merkle_tree::merkle::Error),
    #[error("polynomial arithmetic failed")]
    Fft(#[from] FFTError),
}

/// A single FRI layer failed one of its checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FriLayerError {
    #[error("proof has {got} folding layers, expected {expected}")]
    LayerCount { expected: usize, got: usize },
    #[error("column opening of layer {layer} failed")]
    ColumnOpening { layer: usize },
    #[error("polynomial opening of layer {layer} failed")]
    PolyOpening { layer: usize },
    #[error("degree-4 consistency check failed at layer {layer}, position {position}")]
    Consistency { layer: usize, position: usize },
    #[error("remainder does not match the final column commitment")]
    RemainderCommitment,
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Assertion(#[from] AssertionError),
    #[error("Merkle opening verification failed")]
    Merkle(#[from] quartz_crypto::merkle_tree::merkle::Error),
    #[error(transparent)]
    FriLayer(#[from] FriLayerError),
    #[error("remainder is not a polynomial of degree less than {max_degree}")]
    RemainderDegree { max_degree: usize },
    #[error(transparent)]
    InsufficientEntropy(#[from] InsufficientEntropy),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    #[error("proof input shapes do not match the AIR")]
    ShapeMismatch,
    #[error("composition value mismatch at position {position}")]
    InconsistentComposition { position: usize },
    #[error(transparent)]
    Fft(#[from] FFTError),
}

/// Malformed proof bytes or encoding-size overflow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SerializationError {
    #[error("unexpected end of proof bytes")]
    UnexpectedEnd,
    #[error("array of length {0} cannot be encoded")]
    ArrayTooLong(usize),
    #[error("matrix column of length {0} cannot be encoded")]
    ColumnTooLong(usize),
    #[error("matrix with {0} columns cannot be encoded")]
    TooManyColumns(usize),
    #[error("invalid field element bytes")]
    InvalidElement,
    #[error("leaf has {got} bytes, expected {expected}")]
    InvalidLeafSize { expected: usize, got: usize },
    #[error("trailing bytes after the end of the proof")]
    TrailingBytes,
}
