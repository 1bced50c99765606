use crate::fft::cpu::fft::in_place_radix2_dit_fft;
use crate::fft::cpu::roots_of_unity::{get_inverse_twiddles, get_twiddles};
use crate::fft::errors::FFTError;
use crate::field::element::FieldElement;
use crate::field::traits::IsFFTField;
use crate::polynomial::Polynomial;

pub trait FFTPoly<F: IsFFTField> {
    fn evaluate_fft(
        &self,
        blowup_factor: usize,
        domain_size: Option<usize>,
    ) -> Result<Vec<FieldElement<F>>, FFTError>;

    fn interpolate_fft(fft_evals: &[FieldElement<F>])
        -> Result<Polynomial<FieldElement<F>>, FFTError>;
}

impl<F: IsFFTField> FFTPoly<F> for Polynomial<FieldElement<F>> {
    /// Returns `N` evaluations of this polynomial at the `N`-th roots of
    /// unity, with `N = max(self.coeff_len(), domain_size).next_power_of_two()
    /// * blowup_factor`. Padding the coefficients with zeros makes the FFT
    /// return more evaluations of the same polynomial.
    fn evaluate_fft(
        &self,
        blowup_factor: usize,
        domain_size: Option<usize>,
    ) -> Result<Vec<FieldElement<F>>, FFTError> {
        let domain_size = domain_size.unwrap_or(0);
        let len = std::cmp::max(self.coeff_len(), domain_size).next_power_of_two()
            * blowup_factor;
        if !len.is_power_of_two() {
            return Err(FFTError::InputError(len));
        }

        if self.coefficients().is_empty() {
            return Ok(vec![FieldElement::zero(); len]);
        }

        let mut coeffs = self.coefficients().to_vec();
        coeffs.resize(len, FieldElement::zero());

        let order = len.trailing_zeros() as u64;
        let twiddles = get_twiddles::<F>(order)?;
        in_place_radix2_dit_fft(&mut coeffs, &twiddles);
        Ok(coeffs)
    }

    /// Returns the polynomial interpolating `(w^i, fft_evals[i])`, with `w` a
    /// primitive root of unity of order `fft_evals.len()`. Inverse of
    /// [`Self::evaluate_fft`].
    fn interpolate_fft(
        fft_evals: &[FieldElement<F>],
    ) -> Result<Polynomial<FieldElement<F>>, FFTError> {
        let len = fft_evals.len();
        if !len.is_power_of_two() {
            return Err(FFTError::InputError(len));
        }
        if len == 1 {
            return Ok(Polynomial::new(fft_evals));
        }

        let order = len.trailing_zeros() as u64;
        let twiddles = get_inverse_twiddles::<F>(order)?;
        let mut coeffs = fft_evals.to_vec();
        in_place_radix2_dit_fft(&mut coeffs, &twiddles);

        let scale = FieldElement::<F>::from(len as u64).inv();
        for coeff in coeffs.iter_mut() {
            *coeff = &*coeff * &scale;
        }
        Ok(Polynomial::new(&coeffs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::cpu::roots_of_unity::get_powers_of_primitive_root;
    use crate::field::fields::u64_prime_field::{F17, FE17};

    fn polynomial() -> Polynomial<FE17> {
        Polynomial::new(&[FE17::from(5), FE17::from(3), FE17::from(2), FE17::from(7)])
    }

    #[test]
    fn fft_evaluations_match_pointwise_evaluation() {
        let poly = polynomial();
        let domain = get_powers_of_primitive_root::<F17>(3, 8).unwrap();
        let evals = poly.evaluate_fft(2, None).unwrap();
        assert_eq!(evals.len(), 8);
        for (x, eval) in domain.iter().zip(evals.iter()) {
            assert_eq!(&poly.evaluate(x), eval);
        }
    }

    #[test]
    fn interpolation_inverts_evaluation() {
        let poly = polynomial();
        let evals = poly.evaluate_fft(1, None).unwrap();
        let recovered = Polynomial::interpolate_fft(&evals).unwrap();
        assert_eq!(poly, recovered);
    }

    #[test]
    fn rejects_non_power_of_two_input() {
        let evals = vec![FE17::one(); 6];
        assert_eq!(
            Polynomial::interpolate_fft(&evals),
            Err(FFTError::InputError(6))
        );
    }
}
