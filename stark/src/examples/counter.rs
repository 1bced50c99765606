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

/// The simplest possible computation: one register counting up by one.
#[derive(Clone)]
pub struct CounterAir {
    context: AirContext,
    pub_inputs: CounterPublicInputs,
}

#[derive(Clone, Debug)]
pub struct CounterPublicInputs {
    pub start: FE,
}

impl Air for CounterAir {
    type Field = F;
    type PublicInputs = CounterPublicInputs;

    fn new(
        trace_length: usize,
        pub_inputs: &Self::PublicInputs,
        options: &ProofOptions,
    ) -> Result<Self, ConfigurationError> {
        let context = AirContext::new(trace_length, 1, 0, vec![2], options.clone())?;
        Ok(Self {
            context,
            pub_inputs: pub_inputs.clone(),
        })
    }

    fn context(&self) -> &AirContext {
        &self.context
    }

    fn pub_inputs(&self) -> &Self::PublicInputs {
        &self.pub_inputs
    }

    fn generate_trace(&self) -> Result<TraceTable<F>, TraceGenerationError> {
        let mut column = Vec::with_capacity(self.context.trace_length);
        let mut value = self.pub_inputs.start.clone();
        for _ in 0..self.context.trace_length {
            column.push(value.clone());
            value = value + FE::one();
        }
        Ok(TraceTable::from_columns(vec![column]))
    }

    fn evaluate_transition(&self, frame: &EvaluationFrame<'_, F>) -> Vec<FE> {
        vec![&frame.next[0] - &frame.current[0] - FE::one()]
    }
}
