use crate::field::element::FieldElement;
use crate::field::traits::{IsFFTField, IsField, IsPrimeField};

/// A generic prime field over a modulus small enough that products fit in
/// a `u128`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct U64PrimeField<const MODULUS: u64>;

pub type U64FieldElement<const MODULUS: u64> = FieldElement<U64PrimeField<MODULUS>>;

/// The field of order 17, used by unit tests across the workspace.
pub type F17 = U64PrimeField<17>;
pub type FE17 = U64FieldElement<17>;

impl<const MODULUS: u64> IsField for U64PrimeField<MODULUS> {
    type BaseType = u64;

    fn add(a: &u64, b: &u64) -> u64 {
        ((*a as u128 + *b as u128) % MODULUS as u128) as u64
    }

    fn sub(a: &u64, b: &u64) -> u64 {
        (((*a as u128 + MODULUS as u128) - *b as u128) % MODULUS as u128) as u64
    }

    fn neg(a: &u64) -> u64 {
        (MODULUS - a) % MODULUS
    }

    fn mul(a: &u64, b: &u64) -> u64 {
        ((*a as u128 * *b as u128) % MODULUS as u128) as u64
    }

    fn inv(a: &u64) -> u64 {
        assert_ne!(*a, 0, "cannot invert the zero element");
        Self::pow(a, (MODULUS - 2) as u128)
    }

    fn zero() -> u64 {
        0
    }

    fn one() -> u64 {
        1
    }

    fn from_u64(x: u64) -> u64 {
        x % MODULUS
    }

    fn from_base_type(x: u64) -> u64 {
        x % MODULUS
    }
}

impl<const MODULUS: u64> IsPrimeField for U64PrimeField<MODULUS> {
    const ELEMENT_SIZE: usize = 8;

    fn modulus() -> u64 {
        MODULUS
    }

    fn representative(a: &u64) -> u64 {
        *a
    }
}

// 17 - 1 = 2^4, and 3 generates the full multiplicative group.
impl IsFFTField for F17 {
    const TWO_ADICITY: u64 = 4;
    const TWO_ADIC_PRIMITVE_ROOT_OF_UNITY: u64 = 3;
}
