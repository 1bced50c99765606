use std::collections::BTreeMap;

use quartz_math::field::element::FieldElement;
use quartz_math::field::traits::IsFFTField;
use quartz_math::polynomial::Polynomial;

use crate::domain::Domain;
use crate::errors::AssertionError;

/// A boundary assertion `(register, step, value)`: it constrains the trace
/// polynomial of `register` to take `value` at the execution-domain point
/// of `step`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion<F: IsFFTField> {
    pub register: usize,
    pub step: usize,
    pub value: FieldElement<F>,
}

impl<F: IsFFTField> Assertion<F> {
    pub fn new(register: usize, step: usize, value: FieldElement<F>) -> Self {
        Self {
            register,
            step,
            value,
        }
    }
}

/// The boundary machinery for one constrained register: the interpolant
/// `I_r` through that register's asserted points and the zerofier
/// `Z_r(x) = prod (x - x_j)` over the same points.
///
/// `B_r(x) = (P_r(x) - I_r(x)) / Z_r(x)` is a polynomial exactly when all
/// the register's assertions hold.
#[derive(Debug, Clone)]
pub struct BoundaryConstraintGroup<F: IsFFTField> {
    pub register: usize,
    pub interpolant: Polynomial<FieldElement<F>>,
    pub zerofier: Polynomial<FieldElement<F>>,
}

/// All boundary constraints of one proof, grouped per register in register
/// order.
#[derive(Debug, Clone)]
pub struct BoundaryConstraints<F: IsFFTField> {
    pub groups: Vec<BoundaryConstraintGroup<F>>,
}

impl<F: IsFFTField> BoundaryConstraints<F> {
    pub fn from_assertions(
        assertions: &[Assertion<F>],
        trace_columns: usize,
        domain: &Domain<F>,
    ) -> Result<Self, AssertionError> {
        let mut per_register: BTreeMap<usize, Vec<(usize, &FieldElement<F>)>> = BTreeMap::new();
        for assertion in assertions {
            if assertion.register >= trace_columns || assertion.step >= domain.trace_length {
                return Err(AssertionError::OutOfRange {
                    register: assertion.register,
                    step: assertion.step,
                });
            }
            let entries = per_register.entry(assertion.register).or_default();
            if entries.iter().any(|(step, _)| *step == assertion.step) {
                return Err(AssertionError::Duplicate {
                    register: assertion.register,
                    step: assertion.step,
                });
            }
            entries.push((assertion.step, &assertion.value));
        }

        let groups = per_register
            .into_iter()
            .map(|(register, entries)| {
                let xs: Vec<_> = entries
                    .iter()
                    .map(|(step, _)| domain.lde_domain[step * domain.extension_factor].clone())
                    .collect();
                let ys: Vec<_> = entries.iter().map(|(_, value)| (*value).clone()).collect();

                let interpolant = Polynomial::interpolate(&xs, &ys);
                let zerofier = xs.iter().fold(
                    Polynomial::new(&[FieldElement::one()]),
                    |accumulator, x| {
                        accumulator * Polynomial::new(&[-x, FieldElement::one()])
                    },
                );

                BoundaryConstraintGroup {
                    register,
                    interpolant,
                    zerofier,
                }
            })
            .collect();

        Ok(Self { groups })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Evaluates every `B_r` at one out-of-trace point, given the values of
    /// the trace polynomials there.
    pub fn evaluate_at(
        &self,
        x: &FieldElement<F>,
        p_values: &[FieldElement<F>],
    ) -> Vec<FieldElement<F>> {
        self.groups
            .iter()
            .map(|group| {
                let numerator = &p_values[group.register] - group.interpolant.evaluate(x);
                numerator * group.zerofier.evaluate(x).inv()
            })
            .collect()
    }

    /// Evaluates every `B_r` over the whole evaluation domain, one vector
    /// per group, batch-inverting the zerofier evaluations.
    pub fn evaluate_all(
        &self,
        p_evaluations: &[Vec<FieldElement<F>>],
        domain: &Domain<F>,
    ) -> Vec<Vec<FieldElement<F>>> {
        self.groups
            .iter()
            .map(|group| {
                let mut zerofier_inverses = group.zerofier.evaluate_slice(&domain.lde_domain);
                FieldElement::inplace_batch_inverse(&mut zerofier_inverses);
                let interpolant_values = group.interpolant.evaluate_slice(&domain.lde_domain);

                p_evaluations[group.register]
                    .iter()
                    .zip(interpolant_values.iter())
                    .zip(zerofier_inverses.iter())
                    .map(|((p, i), z_inv)| (p - i) * z_inv)
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AirContext;
    use crate::proof::options::ProofOptions;
    use quartz_math::field::fields::fft_friendly::stark_32_prime_field::Stark32PrimeField;

    type F = Stark32PrimeField;
    type FE = FieldElement<F>;

    fn domain() -> Domain<F> {
        let context = AirContext::new(8, 2, 0, vec![2], ProofOptions::default()).unwrap();
        Domain::new(&context).unwrap()
    }

    #[test]
    fn groups_assertions_per_register_in_order() {
        let domain = domain();
        let assertions = vec![
            Assertion::new(1, 0, FE::from(9)),
            Assertion::new(0, 0, FE::from(1)),
            Assertion::new(0, 7, FE::from(3)),
        ];
        let boundary = BoundaryConstraints::from_assertions(&assertions, 2, &domain).unwrap();
        assert_eq!(boundary.len(), 2);
        assert_eq!(boundary.groups[0].register, 0);
        assert_eq!(boundary.groups[1].register, 1);
        assert_eq!(boundary.groups[0].zerofier.degree(), 2);
        assert_eq!(boundary.groups[1].zerofier.degree(), 1);
    }

    #[test]
    fn interpolant_passes_through_the_asserted_points() {
        let domain = domain();
        let assertions = vec![
            Assertion::new(0, 0, FE::from(1)),
            Assertion::new(0, 3, FE::from(42)),
        ];
        let boundary = BoundaryConstraints::from_assertions(&assertions, 2, &domain).unwrap();
        let group = &boundary.groups[0];

        let x0 = &domain.lde_domain[0];
        let x3 = &domain.lde_domain[3 * domain.extension_factor];
        assert_eq!(group.interpolant.evaluate(x0), FE::from(1));
        assert_eq!(group.interpolant.evaluate(x3), FE::from(42));
        assert_eq!(group.zerofier.evaluate(x0), FE::zero());
        assert_eq!(group.zerofier.evaluate(x3), FE::zero());
    }

    #[test]
    fn rejects_duplicates_and_out_of_range() {
        let domain = domain();
        let duplicated = vec![
            Assertion::new(0, 0, FE::from(1)),
            Assertion::new(0, 0, FE::from(2)),
        ];
        assert_eq!(
            BoundaryConstraints::from_assertions(&duplicated, 2, &domain)
                .err()
                .unwrap(),
            AssertionError::Duplicate {
                register: 0,
                step: 0
            }
        );

        let out_of_range = vec![Assertion::new(2, 0, FE::from(1))];
        assert_eq!(
            BoundaryConstraints::from_assertions(&out_of_range, 2, &domain)
                .err()
                .unwrap(),
            AssertionError::OutOfRange {
                register: 2,
                step: 0
            }
        );
    }

    #[test]
    fn evaluate_all_matches_evaluate_at() {
        let domain = domain();
        let assertions = vec![
            Assertion::new(0, 0, FE::from(5)),
            Assertion::new(1, 2, FE::from(7)),
        ];
        let boundary = BoundaryConstraints::from_assertions(&assertions, 2, &domain).unwrap();

        // Arbitrary trace-polynomial evaluations over the domain.
        let p_evaluations: Vec<Vec<FE>> = (0..2u64)
            .map(|r| {
                (0..domain.lde_domain_size as u64)
                    .map(|i| FE::from(3 * i + 11 * r + 1))
                    .collect()
            })
            .collect();

        let all = boundary.evaluate_all(&p_evaluations, &domain);
        for position in [1usize, 5, 13, 27] {
            let x = &domain.lde_domain[position];
            let p_values = vec![
                p_evaluations[0][position].clone(),
                p_evaluations[1][position].clone(),
            ];
            let pointwise = boundary.evaluate_at(x, &p_values);
            for (group_idx, value) in pointwise.iter().enumerate() {
                assert_eq!(value, &all[group_idx][position]);
            }
        }
    }
}
