use std::fmt::Debug;

use super::element::FieldElement;
use crate::fft::errors::FFTError;

/// Trait to add field behaviour to a struct.
pub trait IsField: Debug + Clone {
    /// The underlying base type for representing elements from the field.
    type BaseType: Clone + Debug + PartialEq + Eq;

    /// Returns the sum of `a` and `b`.
    fn add(a: &Self::BaseType, b: &Self::BaseType) -> Self::BaseType;

    /// Returns the subtraction of `a` and `b`.
    fn sub(a: &Self::BaseType, b: &Self::BaseType) -> Self::BaseType;

    /// Returns the additive inverse of `a`.
    fn neg(a: &Self::BaseType) -> Self::BaseType;

    /// Returns the multiplication of `a` and `b`.
    fn mul(a: &Self::BaseType, b: &Self::BaseType) -> Self::BaseType;

    /// Returns the division of `a` and `b`.
    fn div(a: &Self::BaseType, b: &Self::BaseType) -> Self::BaseType {
        Self::mul(a, &Self::inv(b))
    }

    /// Returns the multiplicative inverse of `a`.
    fn inv(a: &Self::BaseType) -> Self::BaseType;

    /// Returns `a` raised to the power of `exponent`.
    fn pow(a: &Self::BaseType, mut exponent: u128) -> Self::BaseType {
        let mut result = Self::one();
        let mut base = a.clone();

        while exponent > 0 {
            if exponent & 1 == 1 {
                result = Self::mul(&result, &base);
            }
            exponent >>= 1;
            base = Self::mul(&base, &base);
        }
        result
    }

    /// Returns a boolean indicating whether `a` and `b` are equal or not.
    fn eq(a: &Self::BaseType, b: &Self::BaseType) -> bool {
        a == b
    }

    /// Returns the additive neutral element.
    fn zero() -> Self::BaseType;

    /// Returns the multiplicative neutral element.
    fn one() -> Self::BaseType;

    /// Returns the element `x * 1` where 1 is the multiplicative neutral element.
    fn from_u64(x: u64) -> Self::BaseType;

    /// Takes as input an element of BaseType and returns the internal
    /// representation of that element in the field.
    fn from_base_type(x: Self::BaseType) -> Self::BaseType;
}

/// Prime fields whose elements fit a machine word and serialize to a fixed
/// number of little-endian bytes.
pub trait IsPrimeField: IsField {
    /// Size of a serialized field element in bytes.
    const ELEMENT_SIZE: usize;

    /// The prime modulus.
    fn modulus() -> u64;

    /// Canonical representative of `a` in `[0, p)`.
    fn representative(a: &Self::BaseType) -> u64;
}

/// Fields with a large multiplicative subgroup of power-of-two order.
pub trait IsFFTField: IsField {
    const TWO_ADICITY: u64;

    /// Generator of the subgroup of order `2^TWO_ADICITY`.
    const TWO_ADIC_PRIMITVE_ROOT_OF_UNITY: Self::BaseType;

    /// Returns a primitive root of unity of order `2^order`.
    fn get_primitive_root_of_unity(order: u64) -> Result<FieldElement<Self>, FFTError>
    where
        Self: Sized,
    {
        if order > Self::TWO_ADICITY {
            return Err(FFTError::RootOfUnityError(order));
        }
        let root = FieldElement::<Self>::new(Self::TWO_ADIC_PRIMITVE_ROOT_OF_UNITY);
        Ok(root.pow(1u128 << (Self::TWO_ADICITY - order)))
    }
}
