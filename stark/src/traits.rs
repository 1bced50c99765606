use quartz_math::field::element::FieldElement;
use quartz_math::field::traits::{IsFFTField, IsPrimeField};

use crate::context::AirContext;
use crate::errors::{ConfigurationError, TraceGenerationError};
use crate::frame::EvaluationFrame;
use crate::proof::options::ProofOptions;
use crate::trace::TraceTable;

/// An algebraic intermediate representation: a way to generate an execution
/// trace plus the transition constraints that trace must satisfy.
///
/// Boundary assertions are not part of the AIR; they are public inputs
/// passed to `prove` and `verify` alongside it.
pub trait Air {
    type Field: IsFFTField + IsPrimeField;
    type PublicInputs;

    fn new(
        trace_length: usize,
        pub_inputs: &Self::PublicInputs,
        options: &ProofOptions,
    ) -> Result<Self, ConfigurationError>
    where
        Self: Sized;

    fn context(&self) -> &AirContext;

    fn pub_inputs(&self) -> &Self::PublicInputs;

    /// Runs the computation and lays its register history out as a table
    /// with one row per step.
    fn generate_trace(&self) -> Result<TraceTable<Self::Field>, TraceGenerationError>;

    /// Histories of the secret input registers, one vector per register,
    /// each of trace length. These are committed alongside the trace but
    /// never revealed beyond the queried positions.
    fn secret_register_traces(&self) -> Vec<Vec<FieldElement<Self::Field>>> {
        Vec::new()
    }

    /// Evaluates every transition constraint at one point. The result must
    /// be zero at each execution-domain point except the last whenever the
    /// frame holds consecutive rows of a valid trace.
    fn evaluate_transition(
        &self,
        frame: &EvaluationFrame<'_, Self::Field>,
    ) -> Vec<FieldElement<Self::Field>>;

    /// Application-defined input shape counts carried inside the proof.
    fn input_shapes(&self) -> Vec<u32> {
        vec![
            self.context().trace_columns as u32,
            self.context().num_secret_inputs as u32,
        ]
    }

    fn trace_length(&self) -> usize {
        self.context().trace_length
    }

    fn options(&self) -> &ProofOptions {
        &self.context().options
    }
}
