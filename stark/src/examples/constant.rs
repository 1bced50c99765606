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

/// A register that never changes: a no-op transition with boundary
/// assertions doing all the work. Useful as the smallest end-to-end
/// sanity check.
#[derive(Clone)]
pub struct ConstantAir {
    context: AirContext,
    pub_inputs: ConstantPublicInputs,
}

#[derive(Clone, Debug)]
pub struct ConstantPublicInputs {
    pub value: FE,
}

impl Air for ConstantAir {
    type Field = F;
    type PublicInputs = ConstantPublicInputs;

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
        let column = vec![self.pub_inputs.value.clone(); self.context.trace_length];
        Ok(TraceTable::from_columns(vec![column]))
    }

    fn evaluate_transition(&self, frame: &EvaluationFrame<'_, F>) -> Vec<FE> {
        vec![&frame.next[0] - &frame.current[0]]
    }
}
