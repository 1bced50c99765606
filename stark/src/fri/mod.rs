pub mod fold;
pub mod proof;

use std::collections::BTreeMap;

use log::debug;
use quartz_crypto::hash::HashFunction;
use quartz_crypto::merkle_tree::merkle::MerkleTree;
use quartz_crypto::merkle_tree::proof::verify_batch;
use quartz_math::field::element::FieldElement;
use quartz_math::field::traits::{IsFFTField, IsPrimeField};
use quartz_math::polynomial::Polynomial;
use quartz_math::traits::ByteConversion;

use crate::constraints::evaluator::geometric_series;
use crate::domain::Domain;
use crate::errors::{FriLayerError, ProvingError, VerificationError};
use crate::queries::QueryIndexGenerator;
use crate::transcript::RandomCoin;

use fold::{fold_layer, quartic_eval};
use proof::{fiber_leaves, leaf_to_elements, FriComponent, FriProof};

/// Folding stops once a layer has this many values or fewer; what remains
/// is emitted in the clear.
pub const MAX_REMAINDER_LENGTH: usize = 64;

/// The four roots of `x^4 = 1` in evaluation-domain terms: every folding
/// layer shares them, since the order-4 subgroup never changes.
fn quartic_roots_of_unity<F: IsFFTField>(domain: &Domain<F>) -> [FieldElement<F>; 4] {
    let j = domain
        .lde_primitive_root
        .pow((domain.lde_domain_size / 4) as u128);
    std::array::from_fn(|k| j.pow(k as u128))
}

/// Runs the commit-and-query side of FRI over the committed evaluations of
/// `L(x)`. `l_tree` is the Merkle tree over the quartic fibers of
/// `l_evaluations`; it doubles as the first folding layer.
///
/// Returns one component per folding layer plus the final remainder.
pub fn fri_prove<F: IsFFTField + IsPrimeField>(
    l_tree: &MerkleTree,
    l_evaluations: &[FieldElement<F>],
    domain: &Domain<F>,
    hash: HashFunction,
    coin: &RandomCoin,
    index_generator: &QueryIndexGenerator,
) -> Result<(Vec<FriComponent>, Vec<FieldElement<F>>), ProvingError>
where
    FieldElement<F>: ByteConversion,
{
    let quartic_roots = quartic_roots_of_unity(domain);
    let mut components = Vec::new();
    let mut values = l_evaluations.to_vec();
    let mut layer_root = domain.lde_primitive_root.clone();
    let mut current_tree: Option<MerkleTree> = None;

    while values.len() > MAX_REMAINDER_LENGTH {
        let tree = current_tree.as_ref().unwrap_or(l_tree);

        // The challenge for this fold is bound to the commitment being
        // folded; the query positions to the commitment produced by it.
        let special_x = coin.field_element::<F>(&tree.root, 0);
        let column = fold_layer(&values, &special_x, &layer_root, &quartic_roots);
        let column_length = column.len();

        let column_tree = MerkleTree::build(&fiber_leaves(&column), hash)?;
        let positions = index_generator.fri_indexes(&column_tree.root, column_length)?;
        let leaf_positions: Vec<usize> = positions
            .iter()
            .map(|p| p % (column_length / 4))
            .collect();

        debug!(
            "FRI layer {}: {} values folded to {}",
            components.len(),
            values.len(),
            column_length
        );

        components.push(FriComponent {
            column_root: column_tree.root,
            column_proof: column_tree.prove_batch(&leaf_positions)?,
            poly_proof: tree.prove_batch(&positions)?,
        });

        current_tree = Some(column_tree);
        values = column;
        layer_root = layer_root.pow(4);
    }

    Ok((components, values))
}

pub(crate) fn open_fiber_leaves<F: IsFFTField + IsPrimeField>(
    positions: &[usize],
    leaf_values: &[Vec<u8>],
) -> Result<BTreeMap<usize, Vec<FieldElement<F>>>, VerificationError> {
    let mut sorted = positions.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != leaf_values.len() {
        return Err(VerificationError::Merkle(
            quartz_crypto::merkle_tree::merkle::Error::InvalidProof,
        ));
    }
    sorted
        .into_iter()
        .zip(leaf_values.iter())
        .map(|(position, leaf)| Ok((position, leaf_to_elements::<F>(leaf, 4)?)))
        .collect()
}

/// Verifies the layer chain and the remainder of a FRI proof against
/// `max_degree` (exclusive degree bound of `L(x)`).
pub fn fri_verify<F: IsFFTField + IsPrimeField>(
    proof: &FriProof<F>,
    domain: &Domain<F>,
    max_degree: usize,
    hash: HashFunction,
    coin: &RandomCoin,
    index_generator: &QueryIndexGenerator,
) -> Result<(), VerificationError>
where
    FieldElement<F>: ByteConversion,
{
    let quartic_roots = quartic_roots_of_unity(domain);

    let mut expected_layers = 0;
    let mut length = domain.lde_domain_size;
    while length > MAX_REMAINDER_LENGTH {
        length /= 4;
        expected_layers += 1;
    }
    if proof.components.len() != expected_layers {
        return Err(FriLayerError::LayerCount {
            expected: expected_layers,
            got: proof.components.len(),
        }
        .into());
    }

    let mut previous_root = proof.lc_root;
    let mut layer_root = domain.lde_primitive_root.clone();
    let mut current_length = domain.lde_domain_size;

    for (layer, component) in proof.components.iter().enumerate() {
        let column_length = current_length / 4;
        if component.poly_proof.depth as u32 != column_length.trailing_zeros() {
            return Err(FriLayerError::PolyOpening { layer }.into());
        }
        if component.column_proof.depth as u32 != (column_length / 4).trailing_zeros() {
            return Err(FriLayerError::ColumnOpening { layer }.into());
        }
        let special_x = coin.field_element::<F>(&previous_root, 0);

        let positions = index_generator.fri_indexes(&component.column_root, column_length)?;
        let leaf_positions: Vec<usize> = positions
            .iter()
            .map(|p| p % (column_length / 4))
            .collect();

        verify_batch(&previous_root, &positions, &component.poly_proof, hash)
            .map_err(|_| FriLayerError::PolyOpening { layer })?;
        verify_batch(
            &component.column_root,
            &leaf_positions,
            &component.column_proof,
            hash,
        )
        .map_err(|_| FriLayerError::ColumnOpening { layer })?;

        let poly_rows = open_fiber_leaves::<F>(&positions, &component.poly_proof.values)?;
        let column_rows = open_fiber_leaves::<F>(&leaf_positions, &component.column_proof.values)?;

        for position in positions.iter() {
            let t = layer_root.pow(*position as u128);
            let xs: [FieldElement<F>; 4] = std::array::from_fn(|k| &t * &quartic_roots[k]);
            let row = &poly_rows[position];
            let ys: [FieldElement<F>; 4] = std::array::from_fn(|k| row[k].clone());

            let folded = quartic_eval(&xs, &ys, &special_x);
            let quarter = column_length / 4;
            let opened = &column_rows[&(position % quarter)][position / quarter];
            if &folded != opened {
                return Err(FriLayerError::Consistency {
                    layer,
                    position: *position,
                }
                .into());
            }
        }

        previous_root = component.column_root;
        layer_root = layer_root.pow(4);
        current_length = column_length;
    }

    verify_remainder(proof, domain, max_degree, hash, &layer_root, current_length)
}

fn verify_remainder<F: IsFFTField + IsPrimeField>(
    proof: &FriProof<F>,
    domain: &Domain<F>,
    max_degree: usize,
    hash: HashFunction,
    remainder_root: &FieldElement<F>,
    expected_length: usize,
) -> Result<(), VerificationError>
where
    FieldElement<F>: ByteConversion,
{
    let remainder = &proof.remainder;
    if remainder.len() != expected_length {
        return Err(FriLayerError::RemainderCommitment.into());
    }

    // The remainder must hash back to the last commitment in the chain.
    let last_root = proof
        .components
        .last()
        .map(|component| component.column_root)
        .unwrap_or(proof.lc_root);
    let remainder_tree = MerkleTree::build(&fiber_leaves(remainder), hash)
        .map_err(|_| VerificationError::from(FriLayerError::RemainderCommitment))?;
    if remainder_tree.root != last_root {
        return Err(FriLayerError::RemainderCommitment.into());
    }

    // Degree check: interpolate over the first admissible positions and
    // confirm the rest agree. Positions on the execution lattice are
    // excluded; the committed values there are not bound to the polynomial.
    let remainder_degree = max_degree >> (2 * proof.components.len());
    let points = geometric_series(remainder_root, remainder.len());
    let admissible: Vec<usize> = (0..remainder.len())
        .filter(|p| p % domain.extension_factor != 0)
        .collect();

    if remainder_degree == 0 {
        if admissible.iter().any(|p| remainder[*p] != FieldElement::zero()) {
            return Err(VerificationError::RemainderDegree {
                max_degree: remainder_degree,
            });
        }
        return Ok(());
    }

    if remainder_degree >= admissible.len() {
        return Err(VerificationError::RemainderDegree {
            max_degree: remainder_degree,
        });
    }

    let (sample, check) = admissible.split_at(remainder_degree);
    let xs: Vec<_> = sample.iter().map(|p| points[*p].clone()).collect();
    let ys: Vec<_> = sample.iter().map(|p| remainder[*p].clone()).collect();
    let interpolant = Polynomial::interpolate(&xs, &ys);

    for p in check {
        if interpolant.evaluate(&points[*p]) != remainder[*p] {
            return Err(VerificationError::RemainderDegree {
                max_degree: remainder_degree,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AirContext;
    use crate::proof::options::ProofOptions;
    use quartz_math::fft::polynomial::FFTPoly;
    use quartz_math::field::fields::fft_friendly::stark_32_prime_field::Stark32PrimeField;

    type F = Stark32PrimeField;
    type FE = FieldElement<F>;

    fn setup() -> (
        Domain<F>,
        HashFunction,
        RandomCoin,
        QueryIndexGenerator,
    ) {
        let context = AirContext::new(64, 1, 0, vec![2], ProofOptions::default()).unwrap();
        let domain = Domain::new(&context).unwrap();
        let hash = HashFunction::Sha256;
        (
            domain,
            hash,
            RandomCoin::new(hash),
            QueryIndexGenerator::new(hash, context.extension_factor(), 80, 40),
        )
    }

    fn prove_polynomial(
        poly: &Polynomial<FE>,
        domain: &Domain<F>,
        hash: HashFunction,
        coin: &RandomCoin,
        index_generator: &QueryIndexGenerator,
    ) -> FriProof<F> {
        let evaluations = poly
            .evaluate_fft(domain.lde_domain_size / poly.coeff_len().next_power_of_two(), None)
            .unwrap();
        assert_eq!(evaluations.len(), domain.lde_domain_size);
        let l_tree = MerkleTree::build(&fiber_leaves(&evaluations), hash).unwrap();
        let lc_root = l_tree.root;
        let (components, remainder) =
            fri_prove(&l_tree, &evaluations, domain, hash, coin, index_generator).unwrap();
        // No execution queries in this unit test; an empty-but-valid lc
        // opening at position 1 keeps the structure complete.
        let lc_proof = l_tree.prove_batch(&[1]).unwrap();
        FriProof {
            lc_root,
            lc_proof,
            components,
            remainder,
        }
    }

    #[test]
    fn accepts_a_low_degree_polynomial() {
        let (domain, hash, coin, index_generator) = setup();
        // Degree below composition_degree = 64.
        let coefficients: Vec<FE> = (1..=60u64).map(FE::from).collect();
        let poly = Polynomial::new(&coefficients);
        let proof = prove_polynomial(&poly, &domain, hash, &coin, &index_generator);
        fri_verify(
            &proof,
            &domain,
            domain.composition_degree,
            hash,
            &coin,
            &index_generator,
        )
        .unwrap();
    }

    #[test]
    fn rejects_a_high_degree_polynomial() {
        let (domain, hash, coin, index_generator) = setup();
        // x^64 has exactly the first disallowed degree.
        let poly = Polynomial::new_monomial(FE::one(), domain.composition_degree);
        let proof = prove_polynomial(&poly, &domain, hash, &coin, &index_generator);
        let result = fri_verify(
            &proof,
            &domain,
            domain.composition_degree,
            hash,
            &coin,
            &index_generator,
        );
        assert!(matches!(
            result,
            Err(VerificationError::RemainderDegree { .. })
        ));
    }

    #[test]
    fn rejects_a_tampered_remainder() {
        let (domain, hash, coin, index_generator) = setup();
        let poly = Polynomial::new(&[FE::from(3), FE::from(1), FE::from(4)]);
        let mut proof = prove_polynomial(&poly, &domain, hash, &coin, &index_generator);
        proof.remainder[0] = &proof.remainder[0] + FE::one();
        let result = fri_verify(
            &proof,
            &domain,
            domain.composition_degree,
            hash,
            &coin,
            &index_generator,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_a_wrong_layer_count() {
        let (domain, hash, coin, index_generator) = setup();
        let poly = Polynomial::new(&[FE::from(3), FE::from(1), FE::from(4)]);
        let mut proof = prove_polynomial(&poly, &domain, hash, &coin, &index_generator);
        proof.components.clear();
        let result = fri_verify(
            &proof,
            &domain,
            domain.composition_degree,
            hash,
            &coin,
            &index_generator,
        );
        assert!(matches!(
            result,
            Err(VerificationError::FriLayer(FriLayerError::LayerCount { .. }))
        ));
    }
}
