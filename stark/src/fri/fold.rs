use quartz_math::field::element::FieldElement;
use quartz_math::field::traits::IsFFTField;

/// Evaluates at `z` the degree-<4 polynomial through `(xs[j], ys[j])`,
/// given precomputed inverses of the Lagrange denominators
/// `d_j = prod_{l != j} (xs[j] - xs[l])`.
fn quartic_eval_with_inverses<F: IsFFTField>(
    xs: &[FieldElement<F>; 4],
    ys: &[FieldElement<F>; 4],
    z: &FieldElement<F>,
    denominator_inverses: &[FieldElement<F>],
) -> FieldElement<F> {
    let mut result = FieldElement::zero();
    for j in 0..4 {
        let mut numerator = FieldElement::one();
        for (l, x) in xs.iter().enumerate() {
            if l != j {
                numerator = numerator * (z - x);
            }
        }
        result = result + &ys[j] * &numerator * &denominator_inverses[j];
    }
    result
}

fn lagrange_denominators<F: IsFFTField>(xs: &[FieldElement<F>; 4]) -> [FieldElement<F>; 4] {
    std::array::from_fn(|j| {
        let mut denominator = FieldElement::one();
        for (l, x) in xs.iter().enumerate() {
            if l != j {
                denominator = denominator * (&xs[j] - x);
            }
        }
        denominator
    })
}

/// Interpolates one revealed quartic fiber and evaluates it at `z`.
/// Used per query by the verifier.
pub fn quartic_eval<F: IsFFTField>(
    xs: &[FieldElement<F>; 4],
    ys: &[FieldElement<F>; 4],
    z: &FieldElement<F>,
) -> FieldElement<F> {
    let denominators = lagrange_denominators(xs);
    let inverses: Vec<_> = denominators.iter().map(|d| d.inv()).collect();
    quartic_eval_with_inverses(xs, ys, z, &inverses)
}

/// One 4-to-1 folding step.
///
/// Row `i` of the layer is the quartic fiber
/// `[values[i], values[i + q], values[i + 2q], values[i + 3q]]` with
/// `q = values.len() / 4`, living over the x-coordinates
/// `layer_root^i * quartic_roots`. Each row is interpolated as a degree-<4
/// polynomial and evaluated at `special_x`; the results form the next
/// layer's column. All Lagrange denominators across the layer are inverted
/// in one batch.
pub fn fold_layer<F: IsFFTField>(
    values: &[FieldElement<F>],
    special_x: &FieldElement<F>,
    layer_root: &FieldElement<F>,
    quartic_roots: &[FieldElement<F>; 4],
) -> Vec<FieldElement<F>> {
    let quarter = values.len() / 4;
    debug_assert_eq!(values.len() % 4, 0);

    let mut xs_rows = Vec::with_capacity(quarter);
    let mut denominators = Vec::with_capacity(4 * quarter);
    let mut t = FieldElement::<F>::one();
    for _ in 0..quarter {
        let xs: [FieldElement<F>; 4] = std::array::from_fn(|j| &t * &quartic_roots[j]);
        denominators.extend_from_slice(&lagrange_denominators(&xs));
        xs_rows.push(xs);
        t = &t * layer_root;
    }
    FieldElement::inplace_batch_inverse(&mut denominators);

    (0..quarter)
        .map(|i| {
            let ys: [FieldElement<F>; 4] =
                std::array::from_fn(|j| values[i + j * quarter].clone());
            quartic_eval_with_inverses(
                &xs_rows[i],
                &ys,
                special_x,
                &denominators[4 * i..4 * i + 4],
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quartz_math::fft::cpu::roots_of_unity::get_powers_of_primitive_root;
    use quartz_math::fft::polynomial::FFTPoly;
    use quartz_math::field::fields::fft_friendly::stark_32_prime_field::Stark32PrimeField;
    use quartz_math::polynomial::Polynomial;

    type F = Stark32PrimeField;
    type FE = FieldElement<F>;

    #[test]
    fn quartic_eval_recovers_a_cubic() {
        // p(x) = 2 + 3x + 5x^2 + 7x^3
        let poly = Polynomial::new(&[FE::from(2), FE::from(3), FE::from(5), FE::from(7)]);
        let xs: [FE; 4] = [FE::from(1), FE::from(2), FE::from(3), FE::from(4)];
        let ys: [FE; 4] = std::array::from_fn(|i| poly.evaluate(&xs[i]));
        let z = FE::from(12345);
        assert_eq!(quartic_eval(&xs, &ys, &z), poly.evaluate(&z));
    }

    #[test]
    fn fold_layer_agrees_with_per_row_interpolation() {
        let domain_size = 16usize;
        let order = domain_size.trailing_zeros() as u64;
        let domain = get_powers_of_primitive_root::<F>(order, domain_size).unwrap();
        let root = domain[1].clone();

        let poly = Polynomial::new_monomial(FE::one(), 3);
        let values = poly.evaluate_fft(1, Some(domain_size)).unwrap();

        let quarter = domain_size / 4;
        let j = root.pow(quarter as u128);
        let quartic_roots: [FE; 4] = std::array::from_fn(|k| j.pow(k as u128));

        let z = FE::from(987_654_321);
        let column = fold_layer(&values, &z, &root, &quartic_roots);
        assert_eq!(column.len(), quarter);

        for i in 0..quarter {
            let xs: [FE; 4] = std::array::from_fn(|k| &domain[i] * &quartic_roots[k]);
            let ys: [FE; 4] = std::array::from_fn(|k| values[i + k * quarter].clone());
            assert_eq!(column[i], quartic_eval(&xs, &ys, &z));
        }
    }

    #[test]
    fn fiber_coordinates_are_the_fourth_root_orbit() {
        // x and x * j^k map to the same x^4, so each row really is one
        // fiber of the degree-4 map.
        let domain = get_powers_of_primitive_root::<F>(4, 16).unwrap();
        let j = domain[4].clone(); // order-4 root: 16 / 4 positions apart
        for i in [1usize, 2, 7] {
            let x = &domain[i];
            let x4 = x.pow(4u128);
            for k in 1..4u128 {
                assert_eq!((x * j.pow(k)).pow(4u128), x4);
            }
        }
    }
}
