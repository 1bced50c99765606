pub mod combination;
pub mod constraints;
pub mod context;
pub mod domain;
pub mod errors;
pub mod examples;
pub mod frame;
pub mod fri;
pub mod proof;
pub mod prover;
pub mod queries;
pub mod trace;
pub mod traits;
pub mod transcript;
pub mod verifier;

pub use constraints::boundary::Assertion;
pub use context::AirContext;
pub use errors::{ProvingError, VerificationError};
pub use proof::options::ProofOptions;
pub use proof::serialization::{deserialize_proof, serialize_proof};
pub use proof::stark::StarkProof;
pub use prover::prove;
pub use traits::Air;
pub use verifier::verify;
