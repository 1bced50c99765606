use std::ops::{Add, Div, Mul, Neg, Sub};

use super::traits::{IsField, IsPrimeField};
use crate::traits::{ByteConversion, ByteConversionError};

/// An element of the field `F`, wrapping the field's base representation.
#[derive(Debug, Clone)]
pub struct FieldElement<F: IsField> {
    value: F::BaseType,
}

impl<F: IsField> FieldElement<F> {
    pub fn new(value: F::BaseType) -> Self {
        Self {
            value: F::from_base_type(value),
        }
    }

    pub fn zero() -> Self {
        Self { value: F::zero() }
    }

    pub fn one() -> Self {
        Self { value: F::one() }
    }

    pub fn value(&self) -> &F::BaseType {
        &self.value
    }

    pub fn pow(&self, exponent: u128) -> Self {
        Self {
            value: F::pow(&self.value, exponent),
        }
    }

    pub fn square(&self) -> Self {
        Self {
            value: F::mul(&self.value, &self.value),
        }
    }

    /// Multiplicative inverse. Panics on the zero element.
    pub fn inv(&self) -> Self {
        Self {
            value: F::inv(&self.value),
        }
    }

    /// Inverts a slice of elements in place with a single field inversion.
    ///
    /// Zero entries are left as zero: callers divide by vanishing-polynomial
    /// evaluations whose zeros fall only on positions the protocol excludes
    /// from querying.
    pub fn inplace_batch_inverse(numbers: &mut [Self]) {
        let count = numbers.len();
        let mut prefix = Vec::with_capacity(count);
        let mut acc = Self::one();
        for x in numbers.iter() {
            if *x != Self::zero() {
                acc = &acc * x;
            }
            prefix.push(acc.clone());
        }

        let mut inv = acc.inv();
        for i in (0..count).rev() {
            if numbers[i] == Self::zero() {
                continue;
            }
            let before = if i == 0 {
                Self::one()
            } else {
                prefix[i - 1].clone()
            };
            let skipped = &inv * &numbers[i];
            numbers[i] = &inv * &before;
            inv = skipped;
        }
    }
}

impl<F: IsField> Copy for FieldElement<F> where F::BaseType: Copy {}

impl<F: IsField> PartialEq for FieldElement<F> {
    fn eq(&self, other: &Self) -> bool {
        F::eq(&self.value, &other.value)
    }
}

impl<F: IsField> Eq for FieldElement<F> {}

impl<F: IsField> From<u64> for FieldElement<F> {
    fn from(value: u64) -> Self {
        Self {
            value: F::from_u64(value),
        }
    }
}

impl<F: IsField> Add<&FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn add(self, rhs: &FieldElement<F>) -> Self::Output {
        FieldElement {
            value: F::add(&self.value, &rhs.value),
        }
    }
}

impl<F: IsField> Add<FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn add(self, rhs: FieldElement<F>) -> Self::Output {
        &self + &rhs
    }
}

impl<F: IsField> Add<&FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn add(self, rhs: &FieldElement<F>) -> Self::Output {
        &self + rhs
    }
}

impl<F: IsField> Add<FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn add(self, rhs: FieldElement<F>) -> Self::Output {
        self + &rhs
    }
}

impl<F: IsField> Sub<&FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn sub(self, rhs: &FieldElement<F>) -> Self::Output {
        FieldElement {
            value: F::sub(&self.value, &rhs.value),
        }
    }
}

impl<F: IsField> Sub<FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn sub(self, rhs: FieldElement<F>) -> Self::Output {
        &self - &rhs
    }
}

impl<F: IsField> Sub<&FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn sub(self, rhs: &FieldElement<F>) -> Self::Output {
        &self - rhs
    }
}

impl<F: IsField> Sub<FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn sub(self, rhs: FieldElement<F>) -> Self::Output {
        self - &rhs
    }
}

impl<F: IsField> Mul<&FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn mul(self, rhs: &FieldElement<F>) -> Self::Output {
        FieldElement {
            value: F::mul(&self.value, &rhs.value),
        }
    }
}

impl<F: IsField> Mul<FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn mul(self, rhs: FieldElement<F>) -> Self::Output {
        &self * &rhs
    }
}

impl<F: IsField> Mul<&FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn mul(self, rhs: &FieldElement<F>) -> Self::Output {
        &self * rhs
    }
}

impl<F: IsField> Mul<FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn mul(self, rhs: FieldElement<F>) -> Self::Output {
        self * &rhs
    }
}

impl<F: IsField> Div<&FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn div(self, rhs: &FieldElement<F>) -> Self::Output {
        FieldElement {
            value: F::div(&self.value, &rhs.value),
        }
    }
}

impl<F: IsField> Div<FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn div(self, rhs: FieldElement<F>) -> Self::Output {
        &self / &rhs
    }
}

impl<F: IsField> Div<&FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn div(self, rhs: &FieldElement<F>) -> Self::Output {
        &self / rhs
    }
}

impl<F: IsField> Div<FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn div(self, rhs: FieldElement<F>) -> Self::Output {
        self / &rhs
    }
}

impl<F: IsField> Neg for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn neg(self) -> Self::Output {
        FieldElement {
            value: F::neg(&self.value),
        }
    }
}

impl<F: IsField> Neg for FieldElement<F> {
    type Output = FieldElement<F>;

    fn neg(self) -> Self::Output {
        -&self
    }
}

impl<F: IsPrimeField> FieldElement<F> {
    /// Canonical representative in `[0, p)`.
    pub fn representative(&self) -> u64 {
        F::representative(&self.value)
    }
}

impl<F: IsPrimeField> ByteConversion for FieldElement<F> {
    fn to_bytes_le(&self) -> Vec<u8> {
        self.representative().to_le_bytes()[..F::ELEMENT_SIZE].to_vec()
    }

    fn from_bytes_le(bytes: &[u8]) -> Result<Self, ByteConversionError> {
        if bytes.len() != F::ELEMENT_SIZE {
            return Err(ByteConversionError::InvalidLength {
                expected: F::ELEMENT_SIZE,
                got: bytes.len(),
            });
        }
        let mut word = [0u8; 8];
        word[..bytes.len()].copy_from_slice(bytes);
        let value = u64::from_le_bytes(word);
        if value >= F::modulus() {
            return Err(ByteConversionError::NonCanonical);
        }
        Ok(Self {
            value: F::from_u64(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::fields::u64_prime_field::{F17, FE17};

    #[test]
    fn batch_inverse_matches_individual_inverses() {
        let mut values: Vec<FE17> = (1..17).map(FE17::from).collect();
        let expected: Vec<FE17> = values.iter().map(|x| x.inv()).collect();
        FieldElement::inplace_batch_inverse(&mut values);
        assert_eq!(values, expected);
    }

    #[test]
    fn batch_inverse_skips_zeros() {
        let mut values = vec![FE17::from(3), FE17::zero(), FE17::from(5), FE17::zero()];
        FieldElement::inplace_batch_inverse(&mut values);
        assert_eq!(
            values,
            vec![
                FE17::from(3).inv(),
                FE17::zero(),
                FE17::from(5).inv(),
                FE17::zero()
            ]
        );
    }

    #[test]
    fn byte_roundtrip() {
        let x = FieldElement::<F17>::from(11);
        let bytes = x.to_bytes_le();
        assert_eq!(bytes.len(), F17::ELEMENT_SIZE);
        assert_eq!(FieldElement::<F17>::from_bytes_le(&bytes).unwrap(), x);
    }

    #[test]
    fn non_canonical_bytes_are_rejected() {
        let bytes = 17u64.to_le_bytes();
        assert_eq!(
            FieldElement::<F17>::from_bytes_le(&bytes),
            Err(ByteConversionError::NonCanonical)
        );
    }
}
