use std::ops;

use super::field::element::FieldElement;
use crate::field::traits::IsField;

/// Represents the polynomial c_0 + c_1 * X + c_2 * X^2 + ... + c_n * X^n
/// as a vector of coefficients `[c_0, c_1, ... , c_n]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial<FE> {
    coefficients: Vec<FE>,
}

impl<F: IsField> Polynomial<FieldElement<F>> {
    /// Creates a new polynomial with the given coefficients
    pub fn new(coefficients: &[FieldElement<F>]) -> Self {
        // Removes trailing zero coefficients at the end
        let mut unpadded_coefficients = coefficients
            .iter()
            .rev()
            .skip_while(|x| **x == FieldElement::zero())
            .cloned()
            .collect::<Vec<FieldElement<F>>>();
        unpadded_coefficients.reverse();
        Polynomial {
            coefficients: unpadded_coefficients,
        }
    }

    pub fn new_monomial(coefficient: FieldElement<F>, degree: usize) -> Self {
        let mut coefficients = vec![FieldElement::zero(); degree];
        coefficients.push(coefficient);
        Self::new(&coefficients)
    }

    pub fn zero() -> Self {
        Self::new(&[])
    }

    pub fn degree(&self) -> usize {
        if self.coefficients.is_empty() {
            0
        } else {
            self.coefficients.len() - 1
        }
    }

    /// Returns coefficients of the polynomial as an array
    /// \[c_0, c_1, c_2, ..., c_n\]
    pub fn coefficients(&self) -> &[FieldElement<F>] {
        &self.coefficients
    }

    pub fn coeff_len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn evaluate(&self, x: &FieldElement<F>) -> FieldElement<F> {
        self.coefficients
            .iter()
            .rev()
            .fold(FieldElement::zero(), |acc, coeff| acc * x + coeff)
    }

    pub fn evaluate_slice(&self, input: &[FieldElement<F>]) -> Vec<FieldElement<F>> {
        input.iter().map(|x| self.evaluate(x)).collect()
    }

    /// Lagrange interpolation over distinct `xs`.
    pub fn interpolate(xs: &[FieldElement<F>], ys: &[FieldElement<F>]) -> Self {
        debug_assert_eq!(xs.len(), ys.len());
        let mut result = Polynomial::zero();

        for (i, y) in ys.iter().enumerate() {
            let mut y_term = Polynomial::new(&[y.clone()]);
            for (j, x) in xs.iter().enumerate() {
                if i != j {
                    let denominator = Polynomial::new(&[FieldElement::one() / (&xs[i] - x)]);
                    let numerator = Polynomial::new(&[-x, FieldElement::one()]);
                    y_term = y_term.mul_with_ref(&(numerator * denominator));
                }
            }
            result = result + y_term;
        }
        result
    }

    pub fn mul_with_ref(&self, factor: &Self) -> Self {
        let degree = self.degree() + factor.degree();
        let mut coefficients = vec![FieldElement::zero(); degree + 1];

        if self.coefficients.is_empty() || factor.coefficients.is_empty() {
            Polynomial::new(&[FieldElement::zero()])
        } else {
            for i in 0..=factor.degree() {
                for j in 0..=self.degree() {
                    coefficients[i + j] =
                        &coefficients[i + j] + &(&factor.coefficients[i] * &self.coefficients[j]);
                }
            }
            Polynomial::new(&coefficients)
        }
    }
}

impl<F: IsField> ops::Add<&Polynomial<FieldElement<F>>> for &Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn add(self, a_polynomial: &Polynomial<FieldElement<F>>) -> Self::Output {
        let (longest, shortest) = if self.coeff_len() >= a_polynomial.coeff_len() {
            (self, a_polynomial)
        } else {
            (a_polynomial, self)
        };
        let mut coefficients = longest.coefficients.clone();
        for (c, s) in coefficients.iter_mut().zip(shortest.coefficients.iter()) {
            *c = &*c + s;
        }
        Polynomial::new(&coefficients)
    }
}

impl<F: IsField> ops::Add<Polynomial<FieldElement<F>>> for Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn add(self, a_polynomial: Polynomial<FieldElement<F>>) -> Self::Output {
        &self + &a_polynomial
    }
}

impl<F: IsField> ops::Neg for &Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn neg(self) -> Self::Output {
        let coefficients: Vec<_> = self.coefficients.iter().map(|c| -c).collect();
        Polynomial::new(&coefficients)
    }
}

impl<F: IsField> ops::Sub<&Polynomial<FieldElement<F>>> for &Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn sub(self, other: &Polynomial<FieldElement<F>>) -> Self::Output {
        self + &(-other)
    }
}

impl<F: IsField> ops::Sub<Polynomial<FieldElement<F>>> for Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn sub(self, other: Polynomial<FieldElement<F>>) -> Self::Output {
        &self - &other
    }
}

impl<F: IsField> ops::Mul<Polynomial<FieldElement<F>>> for Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn mul(self, factor: Polynomial<FieldElement<F>>) -> Self::Output {
        self.mul_with_ref(&factor)
    }
}

impl<F: IsField> ops::Mul<&Polynomial<FieldElement<F>>> for &Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn mul(self, factor: &Polynomial<FieldElement<F>>) -> Self::Output {
        self.mul_with_ref(factor)
    }
}

impl<F: IsField> ops::Mul<&FieldElement<F>> for &Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn mul(self, scalar: &FieldElement<F>) -> Self::Output {
        let coefficients: Vec<_> = self.coefficients.iter().map(|c| c * scalar).collect();
        Polynomial::new(&coefficients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::fields::u64_prime_field::FE17;

    fn fe(x: u64) -> FE17 {
        FE17::from(x)
    }

    #[test]
    fn adding_x_plus_one_and_two_gives_x_plus_three() {
        let p = Polynomial::new(&[fe(1), fe(1)]);
        let q = Polynomial::new(&[fe(2)]);
        assert_eq!(p + q, Polynomial::new(&[fe(3), fe(1)]));
    }

    #[test]
    fn evaluate_quadratic() {
        // 2 + 3x + x^2 at x = 2 is 12
        let p = Polynomial::new(&[fe(2), fe(3), fe(1)]);
        assert_eq!(p.evaluate(&fe(2)), fe(12));
    }

    #[test]
    fn trailing_zeros_are_trimmed() {
        let p = Polynomial::new(&[fe(4), fe(0), fe(0)]);
        assert_eq!(p.degree(), 0);
        assert_eq!(p.coeff_len(), 1);
    }

    #[test]
    fn interpolation_recovers_points() {
        let xs = [fe(1), fe(2), fe(5), fe(7)];
        let ys = [fe(3), fe(8), fe(1), fe(16)];
        let p = Polynomial::interpolate(&xs, &ys);
        assert!(p.degree() < 4);
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_eq!(&p.evaluate(x), y);
        }
    }

    #[test]
    fn product_of_linear_factors() {
        // (x - 2)(x - 3) = 6 - 5x + x^2
        let p = Polynomial::new(&[-fe(2), fe(1)]);
        let q = Polynomial::new(&[-fe(3), fe(1)]);
        assert_eq!(p * q, Polynomial::new(&[fe(6), -fe(5), fe(1)]));
    }
}
