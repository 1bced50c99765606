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

/// A MiMC-style cubic permutation: `v_{i+1} = v_i^3 + k` with a fixed
/// round constant. The cube makes this the only degree-3 example.
#[derive(Clone)]
pub struct MimcAir {
    context: AirContext,
    pub_inputs: MimcPublicInputs,
}

#[derive(Clone, Debug)]
pub struct MimcPublicInputs {
    pub seed: FE,
    pub round_constant: FE,
}

pub fn mimc_trace(pub_inputs: &MimcPublicInputs, trace_length: usize) -> Vec<FE> {
    let mut column = Vec::with_capacity(trace_length);
    let mut value = pub_inputs.seed.clone();
    for _ in 0..trace_length {
        column.push(value.clone());
        value = value.pow(3) + &pub_inputs.round_constant;
    }
    column
}

impl Air for MimcAir {
    type Field = F;
    type PublicInputs = MimcPublicInputs;

    fn new(
        trace_length: usize,
        pub_inputs: &Self::PublicInputs,
        options: &ProofOptions,
    ) -> Result<Self, ConfigurationError> {
        let context = AirContext::new(trace_length, 1, 0, vec![3], options.clone())?;
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
        Ok(TraceTable::from_columns(vec![mimc_trace(
            &self.pub_inputs,
            self.context.trace_length,
        )]))
    }

    fn evaluate_transition(&self, frame: &EvaluationFrame<'_, F>) -> Vec<FE> {
        let v = &frame.current[0];
        vec![&frame.next[0] - v.pow(3) - &self.pub_inputs.round_constant]
    }
}
