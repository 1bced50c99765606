use crate::field::element::FieldElement;
use crate::field::traits::{IsFFTField, IsField, IsPrimeField};

/// The 32-bit STARK-friendly prime `p = 2^32 - 3 * 2^25 + 1`.
///
/// `p - 1 = 2^25 * 125`, so the field supports radix-2 FFTs over domains of
/// up to `2^25` points. Elements serialize as 4-byte little-endian values.
pub const STARK_32_MODULUS: u64 = 4_194_304_001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stark32PrimeField;

impl IsField for Stark32PrimeField {
    type BaseType = u64;

    fn add(a: &u64, b: &u64) -> u64 {
        (a + b) % STARK_32_MODULUS
    }

    fn sub(a: &u64, b: &u64) -> u64 {
        (a + STARK_32_MODULUS - b) % STARK_32_MODULUS
    }

    fn neg(a: &u64) -> u64 {
        (STARK_32_MODULUS - a) % STARK_32_MODULUS
    }

    fn mul(a: &u64, b: &u64) -> u64 {
        ((*a as u128 * *b as u128) % STARK_32_MODULUS as u128) as u64
    }

    fn inv(a: &u64) -> u64 {
        assert_ne!(*a, 0, "cannot invert the zero element");
        Self::pow(a, (STARK_32_MODULUS - 2) as u128)
    }

    fn zero() -> u64 {
        0
    }

    fn one() -> u64 {
        1
    }

    fn from_u64(x: u64) -> u64 {
        x % STARK_32_MODULUS
    }

    fn from_base_type(x: u64) -> u64 {
        x % STARK_32_MODULUS
    }
}

impl IsPrimeField for Stark32PrimeField {
    const ELEMENT_SIZE: usize = 4;

    fn modulus() -> u64 {
        STARK_32_MODULUS
    }

    fn representative(a: &u64) -> u64 {
        *a
    }
}

impl IsFFTField for Stark32PrimeField {
    const TWO_ADICITY: u64 = 25;
    // 3^((p - 1) / 2^25) mod p, with 3 the smallest generator of the field.
    const TWO_ADIC_PRIMITVE_ROOT_OF_UNITY: u64 = 1_177_770_062;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ByteConversion;

    type FE = FieldElement<Stark32PrimeField>;

    #[test]
    fn two_adic_root_has_order_two_to_the_25() {
        let root = FE::new(Stark32PrimeField::TWO_ADIC_PRIMITVE_ROOT_OF_UNITY);
        assert_eq!(root.pow(1 << 25), FE::one());
        assert_ne!(root.pow(1 << 24), FE::one());
    }

    #[test]
    fn primitive_root_of_unity_orders() {
        for order in [1u64, 3, 6, 10] {
            let root = Stark32PrimeField::get_primitive_root_of_unity(order).unwrap();
            assert_eq!(root.pow(1 << order), FE::one());
            assert_ne!(root.pow(1 << (order - 1)), FE::one());
        }
    }

    #[test]
    fn element_serializes_to_four_bytes() {
        let x = FE::from(0xDEAD_BEEF);
        let bytes = x.to_bytes_le();
        assert_eq!(bytes.len(), 4);
        assert_eq!(FE::from_bytes_le(&bytes).unwrap(), x);
    }

    #[test]
    fn wraparound_addition() {
        let x = FE::from(STARK_32_MODULUS - 1);
        assert_eq!(x + FE::one(), FE::zero());
    }

    proptest::proptest! {
        #[test]
        fn mul_is_commutative(a in 0u64..STARK_32_MODULUS, b in 0u64..STARK_32_MODULUS) {
            proptest::prop_assert_eq!(FE::from(a) * FE::from(b), FE::from(b) * FE::from(a));
        }

        #[test]
        fn addition_has_inverses(a in 0u64..STARK_32_MODULUS) {
            proptest::prop_assert_eq!(FE::from(a) + (-FE::from(a)), FE::zero());
        }

        #[test]
        fn nonzero_elements_invert(a in 1u64..STARK_32_MODULUS) {
            let x = FE::from(a);
            proptest::prop_assert_eq!(x * x.inv(), FE::one());
        }
    }
}
