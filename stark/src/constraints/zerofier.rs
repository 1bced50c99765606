use quartz_math::field::element::FieldElement;
use quartz_math::field::traits::IsFFTField;

use crate::domain::Domain;

/// The transition zerofier `Z(x) = (x^n - 1) / (x - x_last)`: it vanishes
/// on every execution-domain point except the last step, where transition
/// constraints are exempt.
#[derive(Debug, Clone)]
pub struct TransitionZerofier<F: IsFFTField> {
    trace_length: usize,
    x_last: FieldElement<F>,
}

impl<F: IsFFTField> TransitionZerofier<F> {
    pub fn new(domain: &Domain<F>) -> Self {
        Self {
            trace_length: domain.trace_length,
            x_last: domain.x_last.clone(),
        }
    }

    /// Evaluates `Z` at a point outside the execution domain.
    pub fn evaluate_at(&self, x: &FieldElement<F>) -> FieldElement<F> {
        let numerator = x.pow(self.trace_length as u128) - FieldElement::one();
        let denominator = x - &self.x_last;
        numerator * denominator.inv()
    }

    /// Evaluates numerator and denominator separately over the whole
    /// evaluation domain, so callers can batch-invert.
    ///
    /// `x^n` cycles with period `extension_factor` over the evaluation
    /// domain, so the numerators repeat a short pattern.
    pub fn evaluate_all(
        &self,
        domain: &Domain<F>,
    ) -> (Vec<FieldElement<F>>, Vec<FieldElement<F>>) {
        let period = domain.extension_factor;
        let cycle_root = domain.lde_primitive_root.pow(self.trace_length as u128);

        let mut cycle = Vec::with_capacity(period);
        let mut current = FieldElement::<F>::one();
        for _ in 0..period {
            cycle.push(&current - &FieldElement::one());
            current = &current * &cycle_root;
        }

        let numerators: Vec<_> = (0..domain.lde_domain_size)
            .map(|i| cycle[i % period].clone())
            .collect();
        let denominators: Vec<_> = domain
            .lde_domain
            .iter()
            .map(|x| x - &self.x_last)
            .collect();
        (numerators, denominators)
    }
}
