use std::collections::BTreeMap;

use quartz_math::fft::cpu::roots_of_unity::get_powers_of_primitive_root;
use quartz_math::fft::polynomial::FFTPoly;
use quartz_math::field::element::FieldElement;
use quartz_math::field::traits::IsFFTField;
use quartz_math::polynomial::Polynomial;

use crate::constraints::boundary::{Assertion, BoundaryConstraints};
use crate::constraints::zerofier::TransitionZerofier;
use crate::domain::Domain;
use crate::errors::{AssertionError, ProvingError};
use crate::frame::EvaluationFrame;
use crate::traits::Air;
use crate::transcript::RandomCoin;

/// Fuses transition and boundary constraints into the single composition
/// polynomial `C(x)` with degree below `composition_degree`.
///
/// Constraint `i` of degree `d_i` natively reaches degree `d_i * n`; when
/// that falls short of `combination_degree`, a copy scaled by
/// `x^(combination_degree - d_i * n)` joins the combination so every term
/// saturates the same bound. Boundary quotients get the analogous
/// `x^(composition_degree - n)` treatment. All coefficients are drawn from
/// the evaluation-tree root, originals first, adjusted copies after, then
/// the boundary groups.
pub struct ConstraintEvaluator<'a, A: Air> {
    air: &'a A,
    zerofier: TransitionZerofier<A::Field>,
    boundary: BoundaryConstraints<A::Field>,
    transition_base: Vec<FieldElement<A::Field>>,
    transition_adjusted: Vec<FieldElement<A::Field>>,
    transition_increments: Vec<usize>,
    boundary_base: Vec<FieldElement<A::Field>>,
    boundary_adjusted: Vec<FieldElement<A::Field>>,
    boundary_increment: usize,
    coefficients_used: usize,
}

impl<'a, A: Air> ConstraintEvaluator<'a, A> {
    pub fn new(
        air: &'a A,
        assertions: &[Assertion<A::Field>],
        seed: &[u8],
        domain: &Domain<A::Field>,
        coin: &RandomCoin,
    ) -> Result<Self, AssertionError> {
        let context = air.context();
        let boundary =
            BoundaryConstraints::from_assertions(assertions, context.trace_columns, domain)?;

        let n = domain.trace_length;
        let transition_increments: Vec<usize> = context
            .transition_degrees
            .iter()
            .map(|degree| domain.combination_degree - degree * n)
            .collect();
        let adjusted_count = transition_increments.iter().filter(|i| **i > 0).count();

        let boundary_increment = domain.composition_degree - n;
        let boundary_adjusted_count = if boundary_increment > 0 {
            boundary.len()
        } else {
            0
        };

        let constraint_count = context.num_transition_constraints();
        let total =
            constraint_count + adjusted_count + boundary.len() + boundary_adjusted_count;
        let mut coefficients = coin.field_elements::<A::Field>(seed, 0, total);

        let transition_base: Vec<_> = coefficients.drain(..constraint_count).collect();
        let adjusted_drawn: Vec<_> = coefficients.drain(..adjusted_count).collect();
        let boundary_base: Vec<_> = coefficients.drain(..boundary.len()).collect();
        let boundary_adjusted = coefficients;

        // Spread the adjusted draws back over the constraints that need one;
        // constraints already at full degree keep a zero placeholder.
        let mut transition_adjusted = Vec::with_capacity(constraint_count);
        let mut drawn = adjusted_drawn.into_iter();
        for increment in transition_increments.iter() {
            if *increment > 0 {
                transition_adjusted.push(drawn.next().unwrap());
            } else {
                transition_adjusted.push(FieldElement::zero());
            }
        }

        Ok(Self {
            air,
            zerofier: TransitionZerofier::new(domain),
            boundary,
            transition_base,
            transition_adjusted,
            transition_increments,
            boundary_base,
            boundary_adjusted,
            boundary_increment,
            coefficients_used: total,
        })
    }

    /// How many PRNG positions this evaluator consumed from the seed.
    pub fn coefficients_used(&self) -> usize {
        self.coefficients_used
    }

    /// Prover path: evaluates `C(x)` over the whole evaluation domain.
    pub fn evaluate(
        &self,
        trace_polys: &[Polynomial<FieldElement<A::Field>>],
        secret_polys: &[Polynomial<FieldElement<A::Field>>],
        p_evaluations: &[Vec<FieldElement<A::Field>>],
        domain: &Domain<A::Field>,
    ) -> Result<Vec<FieldElement<A::Field>>, ProvingError> {
        let cd_size = domain.composition_domain_size();
        let step = domain.composition_step();
        let cd_order = cd_size.trailing_zeros() as u64;
        let cd_domain = get_powers_of_primitive_root::<A::Field>(cd_order, cd_size)?;
        let cd_root = domain.composition_primitive_root();

        let p_composition: Vec<Vec<FieldElement<A::Field>>> = trace_polys
            .iter()
            .map(|poly| poly.evaluate_fft(1, Some(cd_size)))
            .collect::<Result<_, _>>()?;
        let s_composition: Vec<Vec<FieldElement<A::Field>>> = secret_polys
            .iter()
            .map(|poly| poly.evaluate_fft(1, Some(cd_size)))
            .collect::<Result<_, _>>()?;

        // Power tables for each distinct degree adjustment over the
        // composition domain.
        let mut adjustment_powers: BTreeMap<usize, Vec<FieldElement<A::Field>>> = BTreeMap::new();
        for increment in self.transition_increments.iter().filter(|i| **i > 0) {
            adjustment_powers.entry(*increment).or_insert_with(|| {
                geometric_series(&cd_root.pow(*increment as u128), cd_size)
            });
        }

        let mut combined = vec![FieldElement::<A::Field>::zero(); cd_size];
        for j in 0..cd_size {
            let next_j = (j + step) % cd_size;
            let current: Vec<_> = p_composition.iter().map(|c| c[j].clone()).collect();
            let next: Vec<_> = p_composition.iter().map(|c| c[next_j].clone()).collect();
            let secret: Vec<_> = s_composition.iter().map(|c| c[j].clone()).collect();

            let frame = EvaluationFrame::new(&cd_domain[j], &current, &next, &secret);
            let evaluations = self.air.evaluate_transition(&frame);
            debug_assert_eq!(evaluations.len(), self.transition_base.len());

            let mut accumulator = FieldElement::zero();
            for (i, q) in evaluations.iter().enumerate() {
                accumulator = accumulator + q * &self.transition_base[i];
                let increment = self.transition_increments[i];
                if increment > 0 {
                    accumulator = accumulator
                        + q * &self.transition_adjusted[i] * &adjustment_powers[&increment][j];
                }
            }
            combined[j] = accumulator;
        }

        // Single polynomial over the composition domain, extended to the
        // evaluation domain and divided by the transition zerofier.
        let combined_poly = Polynomial::interpolate_fft(&combined)?;
        let extended =
            combined_poly.evaluate_fft(domain.lde_domain_size / cd_size, Some(cd_size))?;

        let (mut numerator_inverses, denominators) = self.zerofier.evaluate_all(domain);
        FieldElement::inplace_batch_inverse(&mut numerator_inverses);

        let mut result: Vec<FieldElement<A::Field>> = extended
            .iter()
            .zip(numerator_inverses.iter())
            .zip(denominators.iter())
            .map(|((t, num_inv), den)| t * num_inv * den)
            .collect();

        // Fold the boundary quotients in.
        let boundary_evaluations = self.boundary.evaluate_all(p_evaluations, domain);
        let boundary_powers = if self.boundary_increment > 0 {
            geometric_series(
                &domain.lde_primitive_root.pow(self.boundary_increment as u128),
                domain.lde_domain_size,
            )
        } else {
            Vec::new()
        };

        for (g, group_evaluations) in boundary_evaluations.iter().enumerate() {
            for (i, value) in group_evaluations.iter().enumerate() {
                let mut coefficient = self.boundary_base[g].clone();
                if self.boundary_increment > 0 {
                    coefficient =
                        coefficient + &self.boundary_adjusted[g] * &boundary_powers[i];
                }
                result[i] = &result[i] + value * &coefficient;
            }
        }

        Ok(result)
    }

    /// Verifier mirror: evaluates `C` at one queried point from the opened
    /// trace values.
    pub fn evaluate_at(
        &self,
        x: &FieldElement<A::Field>,
        p_values: &[FieldElement<A::Field>],
        n_values: &[FieldElement<A::Field>],
        s_values: &[FieldElement<A::Field>],
    ) -> FieldElement<A::Field> {
        let frame = EvaluationFrame::new(x, p_values, n_values, s_values);
        let evaluations = self.air.evaluate_transition(&frame);

        let mut accumulator = FieldElement::zero();
        for (i, q) in evaluations.iter().enumerate() {
            accumulator = accumulator + q * &self.transition_base[i];
            let increment = self.transition_increments[i];
            if increment > 0 {
                accumulator = accumulator
                    + q * &self.transition_adjusted[i] * &x.pow(increment as u128);
            }
        }

        let mut result = accumulator * self.zerofier.evaluate_at(x).inv();

        let boundary_values = self.boundary.evaluate_at(x, p_values);
        let x_adjustment = if self.boundary_increment > 0 {
            Some(x.pow(self.boundary_increment as u128))
        } else {
            None
        };
        for (g, value) in boundary_values.iter().enumerate() {
            let mut coefficient = self.boundary_base[g].clone();
            if let Some(x_pow) = &x_adjustment {
                coefficient = coefficient + &self.boundary_adjusted[g] * x_pow;
            }
            result = result + value * &coefficient;
        }
        result
    }
}

/// `[1, r, r^2, ..., r^(count-1)]`.
pub(crate) fn geometric_series<F: IsFFTField>(
    ratio: &FieldElement<F>,
    count: usize,
) -> Vec<FieldElement<F>> {
    let mut series = Vec::with_capacity(count);
    let mut current = FieldElement::one();
    for _ in 0..count {
        series.push(current.clone());
        current = &current * ratio;
    }
    series
}
