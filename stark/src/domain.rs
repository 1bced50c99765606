use quartz_math::fft::cpu::roots_of_unity::get_powers_of_primitive_root;
use quartz_math::field::element::FieldElement;
use quartz_math::field::traits::IsFFTField;

use crate::context::AirContext;
use crate::errors::ConfigurationError;

/// The evaluation domains of one proof, together with the degree bounds
/// derived from the AIR.
///
/// With `n` the trace length, `E` the extension factor and `d` the maximum
/// constraint degree:
///   - the evaluation domain has `N = n * E` points generated by `G2`,
///   - the execution domain is generated by `G1 = G2^E`,
///   - `combination_degree = 2^ceil(log2(d)) * n` is also the size of the
///     composition domain, a subgroup of the evaluation domain,
///   - `composition_degree = combination_degree - n` bounds the degree of
///     the composition polynomial.
#[derive(Debug, Clone)]
pub struct Domain<F: IsFFTField> {
    pub trace_length: usize,
    pub extension_factor: usize,
    pub lde_domain_size: usize,
    pub combination_degree: usize,
    pub composition_degree: usize,
    pub trace_primitive_root: FieldElement<F>,
    pub lde_primitive_root: FieldElement<F>,
    pub lde_domain: Vec<FieldElement<F>>,
    pub x_last: FieldElement<F>,
}

impl<F: IsFFTField> Domain<F> {
    pub fn new(context: &AirContext) -> Result<Self, ConfigurationError> {
        let trace_length = context.trace_length;
        let extension_factor = context.extension_factor();
        let lde_domain_size = trace_length * extension_factor;

        let lde_root_order = lde_domain_size.trailing_zeros() as u64;
        if lde_root_order > F::TWO_ADICITY {
            return Err(ConfigurationError::DomainTooLarge(lde_domain_size));
        }

        let lde_primitive_root = F::get_primitive_root_of_unity(lde_root_order)
            .map_err(|_| ConfigurationError::DomainTooLarge(lde_domain_size))?;
        let trace_primitive_root = lde_primitive_root.pow(extension_factor as u128);
        let lde_domain = get_powers_of_primitive_root(lde_root_order, lde_domain_size)
            .map_err(|_| ConfigurationError::DomainTooLarge(lde_domain_size))?;

        let max_degree = context.max_constraint_degree();
        let combination_degree = max_degree.next_power_of_two() * trace_length;
        let composition_degree = combination_degree - trace_length;

        let x_last = trace_primitive_root.pow((trace_length - 1) as u128);

        Ok(Self {
            trace_length,
            extension_factor,
            lde_domain_size,
            combination_degree,
            composition_degree,
            trace_primitive_root,
            lde_primitive_root,
            lde_domain,
            x_last,
        })
    }

    /// Size of the composition domain (equals `combination_degree`).
    pub fn composition_domain_size(&self) -> usize {
        self.combination_degree
    }

    /// Generator of the composition domain, a subgroup of the evaluation
    /// domain.
    pub fn composition_primitive_root(&self) -> FieldElement<F> {
        self.lde_primitive_root
            .pow((self.lde_domain_size / self.composition_domain_size()) as u128)
    }

    /// Offset between consecutive execution steps inside the composition
    /// domain.
    pub fn composition_step(&self) -> usize {
        self.composition_domain_size() / self.trace_length
    }
}
