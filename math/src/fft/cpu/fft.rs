use super::bit_reversing::in_place_bit_reverse_permute;
use crate::field::element::FieldElement;
use crate::field::traits::IsField;

/// In-place radix-2 decimation-in-time FFT.
///
/// `twiddles` must hold the first `n / 2` powers, in natural order, of a
/// primitive root of unity of order `n = values.len()`.
pub fn in_place_radix2_dit_fft<F: IsField>(
    values: &mut [FieldElement<F>],
    twiddles: &[FieldElement<F>],
) {
    let n = values.len();
    debug_assert!(n.is_power_of_two());
    debug_assert!(n <= 1 || twiddles.len() >= n / 2);

    in_place_bit_reverse_permute(values);

    let mut len = 2;
    while len <= n {
        let stride = n / len;
        let half = len / 2;
        for chunk in values.chunks_mut(len) {
            for i in 0..half {
                let odd = &chunk[i + half] * &twiddles[i * stride];
                let even = chunk[i].clone();
                chunk[i] = &even + &odd;
                chunk[i + half] = &even - &odd;
            }
        }
        len <<= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::cpu::roots_of_unity::{get_powers_of_primitive_root, get_twiddles};
    use crate::field::fields::u64_prime_field::{F17, FE17};

    #[test]
    fn matches_naive_evaluation() {
        // p(x) = 1 + 2x + 3x^2 + 4x^3 over the order-4 subgroup of F17.
        let coeffs: Vec<FE17> = [1u64, 2, 3, 4].iter().map(|x| FE17::from(*x)).collect();
        let domain = get_powers_of_primitive_root::<F17>(2, 4).unwrap();

        let mut values = coeffs.clone();
        let twiddles = get_twiddles::<F17>(2).unwrap();
        in_place_radix2_dit_fft(&mut values, &twiddles);

        for (x, fft_value) in domain.iter().zip(values.iter()) {
            let naive = coeffs
                .iter()
                .rev()
                .fold(FE17::zero(), |acc, c| acc * x + c);
            assert_eq!(&naive, fft_value);
        }
    }
}
