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

/// Two-register Fibonacci pairs: each step holds `(f_2i, f_2i+1)` and the
/// transition is `(a, b) -> (a + b, a + 2b)`.
#[derive(Clone)]
pub struct FibonacciAir {
    context: AirContext,
    pub_inputs: FibonacciPublicInputs,
}

#[derive(Clone, Debug)]
pub struct FibonacciPublicInputs {
    pub a0: FE,
    pub a1: FE,
}

pub fn fibonacci_trace(initial: [FE; 2], trace_length: usize) -> TraceTable<F> {
    let mut col_0 = Vec::with_capacity(trace_length);
    let mut col_1 = Vec::with_capacity(trace_length);
    let (mut a, mut b) = (initial[0].clone(), initial[1].clone());
    for _ in 0..trace_length {
        col_0.push(a.clone());
        col_1.push(b.clone());
        let next_a = &a + &b;
        let next_b = &a + &b + &b;
        a = next_a;
        b = next_b;
    }
    TraceTable::from_columns(vec![col_0, col_1])
}

impl Air for FibonacciAir {
    type Field = F;
    type PublicInputs = FibonacciPublicInputs;

    fn new(
        trace_length: usize,
        pub_inputs: &Self::PublicInputs,
        options: &ProofOptions,
    ) -> Result<Self, ConfigurationError> {
        // The transitions are linear; degree 2 is the smallest bound the
        // composition accepts.
        let context = AirContext::new(trace_length, 2, 0, vec![2, 2], options.clone())?;
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
        Ok(fibonacci_trace(
            [self.pub_inputs.a0.clone(), self.pub_inputs.a1.clone()],
            self.context.trace_length,
        ))
    }

    fn evaluate_transition(&self, frame: &EvaluationFrame<'_, F>) -> Vec<FE> {
        let a = &frame.current[0];
        let b = &frame.current[1];
        vec![
            &frame.next[0] - a - b,
            &frame.next[1] - a - b - b,
        ]
    }
}
