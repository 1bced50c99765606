use crate::fft::errors::FFTError;
use crate::field::element::FieldElement;
use crate::field::traits::IsFFTField;

/// Returns the first `count` powers of the primitive root of unity of order
/// `2^order`.
pub fn get_powers_of_primitive_root<F: IsFFTField>(
    order: u64,
    count: usize,
) -> Result<Vec<FieldElement<F>>, FFTError> {
    let root = F::get_primitive_root_of_unity(order)?;
    let mut powers = Vec::with_capacity(count);
    let mut current = FieldElement::one();
    for _ in 0..count {
        powers.push(current.clone());
        current = &current * &root;
    }
    Ok(powers)
}

/// Twiddle factors for a size-`2^order` FFT: the first half of the powers of
/// the domain's primitive root, in natural order.
pub fn get_twiddles<F: IsFFTField>(order: u64) -> Result<Vec<FieldElement<F>>, FFTError> {
    if order == 0 {
        return Ok(Vec::new());
    }
    get_powers_of_primitive_root(order, 1 << (order - 1))
}

/// Twiddle factors of the inverse root, for interpolation.
pub fn get_inverse_twiddles<F: IsFFTField>(order: u64) -> Result<Vec<FieldElement<F>>, FFTError> {
    if order == 0 {
        return Ok(Vec::new());
    }
    let root = F::get_primitive_root_of_unity(order)?.inv();
    let count = 1 << (order - 1);
    let mut powers = Vec::with_capacity(count);
    let mut current = FieldElement::one();
    for _ in 0..count {
        powers.push(current.clone());
        current = &current * &root;
    }
    Ok(powers)
}
