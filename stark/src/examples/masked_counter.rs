use quartz_math::field::element::FieldElement;
use quartz_math::field::fields::fft_friendly::stark_32_prime_field::Stark32PrimeField;

use crate::context::AirContext;
use crate::errors::{ConfigurationError, TraceGenerationError};
use crate::frame::EvaluationFrame;
use crate::proof::options::ProofOptions;
use crate::trace::TraceTable;
use crate::traits::Air;

type F = Stark32PrimeField;
type FE = FieldElement<F>;

/// An accumulator fed by a secret input register: `r_{i+1} = r_i + s_i`.
///
/// The addends are committed alongside the trace but never published; the
/// verifier builds this AIR without them and checks the relation through
/// the opened secret-register values only.
#[derive(Clone)]
pub struct MaskedCounterAir {
    context: AirContext,
    pub_inputs: MaskedCounterPublicInputs,
    addends: Vec<FE>,
}

#[derive(Clone, Debug)]
pub struct MaskedCounterPublicInputs {
    pub start: FE,
}

impl MaskedCounterAir {
    /// Prover-side constructor carrying the secret addends.
    pub fn with_secret(
        trace_length: usize,
        pub_inputs: &MaskedCounterPublicInputs,
        options: &ProofOptions,
        addends: Vec<FE>,
    ) -> Result<Self, ConfigurationError> {
        let mut air = <Self as Air>::new(trace_length, pub_inputs, options)?;
        air.addends = addends;
        Ok(air)
    }
}

impl Air for MaskedCounterAir {
    type Field = F;
    type PublicInputs = MaskedCounterPublicInputs;

    fn new(
        trace_length: usize,
        pub_inputs: &Self::PublicInputs,
        options: &ProofOptions,
    ) -> Result<Self, ConfigurationError> {
        let context = AirContext::new(trace_length, 1, 1, vec![2], options.clone())?;
        Ok(Self {
            context,
            pub_inputs: pub_inputs.clone(),
            addends: Vec::new(),
        })
    }

    fn context(&self) -> &AirContext {
        &self.context
    }

    fn pub_inputs(&self) -> &Self::PublicInputs {
        &self.pub_inputs
    }

    fn generate_trace(&self) -> Result<TraceTable<F>, TraceGenerationError> {
        if self.addends.len() != self.context.trace_length {
            return Err(TraceGenerationError(
                "secret addends are missing or mis-sized".to_string(),
            ));
        }
        let mut column = Vec::with_capacity(self.context.trace_length);
        let mut value = self.pub_inputs.start.clone();
        for addend in self.addends.iter() {
            column.push(value.clone());
            value = value + addend;
        }
        Ok(TraceTable::from_columns(vec![column]))
    }

    fn secret_register_traces(&self) -> Vec<Vec<FE>> {
        vec![self.addends.clone()]
    }

    fn evaluate_transition(&self, frame: &EvaluationFrame<'_, F>) -> Vec<FE> {
        vec![&frame.next[0] - &frame.current[0] - &frame.secret[0]]
    }
}
