use quartz_math::field::element::FieldElement;
use quartz_math::field::traits::IsField;

/// The values a transition constraint can read at one domain point: the
/// current trace row, the next trace row, the secret-input row and the
/// point itself.
#[derive(Debug)]
pub struct EvaluationFrame<'a, F: IsField> {
    pub x: &'a FieldElement<F>,
    pub current: &'a [FieldElement<F>],
    pub next: &'a [FieldElement<F>],
    pub secret: &'a [FieldElement<F>],
}

impl<'a, F: IsField> EvaluationFrame<'a, F> {
    pub fn new(
        x: &'a FieldElement<F>,
        current: &'a [FieldElement<F>],
        next: &'a [FieldElement<F>],
        secret: &'a [FieldElement<F>],
    ) -> Self {
        Self {
            x,
            current,
            next,
            secret,
        }
    }
}
