use std::collections::BTreeMap;

use itertools::Itertools;
use log::{error, info};
use quartz_crypto::merkle_tree::merkle::Error as MerkleError;
use quartz_crypto::merkle_tree::proof::verify_batch;
use quartz_math::field::element::FieldElement;
use quartz_math::traits::ByteConversion;

use crate::combination::LinearCombination;
use crate::constraints::boundary::Assertion;
use crate::constraints::evaluator::ConstraintEvaluator;
use crate::domain::Domain;
use crate::errors::VerificationError;
use crate::fri::proof::leaf_to_elements;
use crate::fri::{fri_verify, open_fiber_leaves};
use crate::proof::stark::StarkProof;
use crate::queries::QueryIndexGenerator;
use crate::traits::Air;
use crate::transcript::RandomCoin;

/// Verifies a STARK proof against the AIR and the public boundary
/// assertions. Succeeds only if every commitment opens, FRI accepts the
/// linear combination, and the composition value recomputed from the
/// opened trace rows matches the committed one at every query position.
pub fn verify<A: Air>(
    air: &A,
    assertions: &[Assertion<A::Field>],
    proof: &StarkProof<A::Field>,
) -> Result<(), VerificationError>
where
    FieldElement<A::Field>: ByteConversion + Send + Sync,
{
    let context = air.context();
    let domain = Domain::new(context)?;
    let trace_columns = context.trace_columns;
    let register_count = trace_columns + context.num_secret_inputs;
    let extension_factor = domain.extension_factor;
    let lde_domain_size = domain.lde_domain_size;
    let hash = context.options.hash;

    if proof.input_shapes != air.input_shapes() {
        error!("proof input shapes do not match the AIR");
        return Err(VerificationError::ShapeMismatch);
    }
    if proof.ev_proof.depth as u32 != lde_domain_size.trailing_zeros()
        || proof.ld_proof.lc_proof.depth as u32 != (lde_domain_size / 4).trailing_zeros()
    {
        error!("proof commitment depths do not match the evaluation domain");
        return Err(VerificationError::Merkle(MerkleError::InvalidProof));
    }

    // Reconstruct the challenge chain: composition and combination
    // coefficients from the evaluation root, query positions from the FRI
    // commitment.
    let coin = RandomCoin::new(hash);
    let evaluator = ConstraintEvaluator::new(air, assertions, &proof.ev_root, &domain, &coin)?;
    let combination = LinearCombination::new(
        &proof.ev_root,
        evaluator.coefficients_used(),
        register_count,
        &domain,
        &coin,
    );
    let index_generator = QueryIndexGenerator::new(
        hash,
        extension_factor,
        context.options.exe_query_count,
        context.options.fri_query_count,
    );

    let positions = index_generator.exe_indexes(&proof.ld_proof.lc_root, lde_domain_size)?;
    let augmented: Vec<usize> = positions
        .iter()
        .flat_map(|p| [*p, (p + extension_factor) % lde_domain_size])
        .sorted()
        .dedup()
        .collect();

    // Trace openings.
    verify_batch(&proof.ev_root, &augmented, &proof.ev_proof, hash)?;
    let trace_rows: BTreeMap<usize, Vec<FieldElement<A::Field>>> = augmented
        .iter()
        .zip(proof.ev_proof.values.iter())
        .map(|(position, leaf)| {
            Ok((*position, leaf_to_elements::<A::Field>(leaf, register_count)?))
        })
        .collect::<Result<_, VerificationError>>()?;

    // The low-degree argument for the linear combination.
    fri_verify(
        &proof.ld_proof,
        &domain,
        domain.composition_degree,
        hash,
        &coin,
        &index_generator,
    )?;

    // Openings of L(x) at the execution query positions.
    let quarter = lde_domain_size / 4;
    let lc_positions: Vec<usize> = positions.iter().map(|p| p % quarter).collect();
    verify_batch(
        &proof.ld_proof.lc_root,
        &lc_positions,
        &proof.ld_proof.lc_proof,
        hash,
    )?;
    let lc_rows = open_fiber_leaves::<A::Field>(&lc_positions, &proof.ld_proof.lc_proof.values)?;

    // Recompute the composition and linear combination pointwise and pin
    // them against the committed L(x) values.
    for position in positions.iter() {
        let x = &domain.lde_domain[*position];
        let row = &trace_rows[position];
        let next_row = &trace_rows[&((position + extension_factor) % lde_domain_size)];

        let p_values = &row[..trace_columns];
        let s_values = &row[trace_columns..];
        let n_values = &next_row[..trace_columns];

        let c_value = evaluator.evaluate_at(x, p_values, n_values, s_values);
        let l_value = combination.compute_one(x, &c_value, p_values, s_values);

        let opened = &lc_rows[&(position % quarter)][position / quarter];
        if &l_value != opened {
            error!("linear combination mismatch at position {position}");
            return Err(VerificationError::InconsistentComposition {
                position: *position,
            });
        }
    }

    info!("Verified proof with {} trace openings", positions.len());
    Ok(())
}
