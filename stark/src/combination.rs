use quartz_math::field::element::FieldElement;
use quartz_math::field::traits::{IsFFTField, IsPrimeField};

use crate::constraints::evaluator::geometric_series;
use crate::domain::Domain;
use crate::transcript::RandomCoin;

/// The final random linear combination `L(x)` handed to FRI: the
/// composition polynomial plus coefficient-weighted trace and secret-input
/// polynomials, degree-adjusted up to `composition_degree`.
///
/// Coefficients come from the same seed as the composition coefficients,
/// starting after the prefix that machinery consumed.
pub struct LinearCombination<F: IsFFTField> {
    base: Vec<FieldElement<F>>,
    adjusted: Vec<FieldElement<F>>,
    increment: usize,
}

impl<F: IsFFTField + IsPrimeField> LinearCombination<F> {
    pub fn new(
        seed: &[u8],
        skip: usize,
        register_count: usize,
        domain: &Domain<F>,
        coin: &RandomCoin,
    ) -> Self {
        let increment = domain.composition_degree - domain.trace_length;
        let total = if increment > 0 {
            2 * register_count
        } else {
            register_count
        };
        let mut coefficients = coin.field_elements::<F>(seed, skip, total);
        let base: Vec<_> = coefficients.drain(..register_count).collect();

        Self {
            base,
            adjusted: coefficients,
            increment,
        }
    }

    /// Prover path: combines full evaluation vectors over the evaluation
    /// domain, consuming the composition evaluations as the accumulator.
    pub fn combine(
        &self,
        c_evaluations: Vec<FieldElement<F>>,
        p_evaluations: &[Vec<FieldElement<F>>],
        s_evaluations: &[Vec<FieldElement<F>>],
        domain: &Domain<F>,
    ) -> Vec<FieldElement<F>> {
        let mut result = c_evaluations;
        let powers = if self.increment > 0 {
            geometric_series(
                &domain.lde_primitive_root.pow(self.increment as u128),
                domain.lde_domain_size,
            )
        } else {
            Vec::new()
        };

        let columns = p_evaluations.iter().chain(s_evaluations.iter());
        for (r, column) in columns.enumerate() {
            for (i, value) in column.iter().enumerate() {
                let mut coefficient = self.base[r].clone();
                if self.increment > 0 {
                    coefficient = coefficient + &self.adjusted[r] * &powers[i];
                }
                result[i] = &result[i] + value * &coefficient;
            }
        }
        result
    }

    /// Verifier mirror: produces `L(x)` at one point from the opened trace
    /// values and the recomputed composition value.
    pub fn compute_one(
        &self,
        x: &FieldElement<F>,
        c_value: &FieldElement<F>,
        p_values: &[FieldElement<F>],
        s_values: &[FieldElement<F>],
    ) -> FieldElement<F> {
        let x_adjustment = if self.increment > 0 {
            Some(x.pow(self.increment as u128))
        } else {
            None
        };

        let mut result = c_value.clone();
        let values = p_values.iter().chain(s_values.iter());
        for (r, value) in values.enumerate() {
            let mut coefficient = self.base[r].clone();
            if let Some(x_pow) = &x_adjustment {
                coefficient = coefficient + &self.adjusted[r] * x_pow;
            }
            result = result + value * &coefficient;
        }
        result
    }
}
