use itertools::Itertools;
use log::info;
use quartz_crypto::hash::merge_vector_rows;
use quartz_crypto::merkle_tree::merkle::MerkleTree;
use quartz_math::fft::polynomial::FFTPoly;
use quartz_math::field::element::FieldElement;
use quartz_math::polynomial::Polynomial;
use quartz_math::traits::ByteConversion;

#[cfg(feature = "parallel")]
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

use crate::combination::LinearCombination;
use crate::constraints::boundary::Assertion;
use crate::constraints::evaluator::{geometric_series, ConstraintEvaluator};
use crate::domain::Domain;
use crate::errors::{AssertionError, ProvingError};
use crate::frame::EvaluationFrame;
use crate::fri::proof::{fiber_leaves, FriProof};
use crate::fri::fri_prove;
use crate::proof::stark::StarkProof;
use crate::queries::QueryIndexGenerator;
use crate::traits::Air;
use crate::transcript::RandomCoin;

/// Generates a STARK proof that the AIR's execution trace satisfies its
/// transition constraints and the given boundary assertions.
pub fn prove<A: Air>(
    air: &A,
    assertions: &[Assertion<A::Field>],
) -> Result<StarkProof<A::Field>, ProvingError>
where
    FieldElement<A::Field>: ByteConversion + Send + Sync,
{
    let context = air.context();
    let domain = Domain::new(context)?;
    let trace_length = domain.trace_length;
    let trace_columns = context.trace_columns;
    let extension_factor = domain.extension_factor;
    let lde_domain_size = domain.lde_domain_size;
    let hash = context.options.hash;

    info!("Started proof generation...");

    // Build and validate the execution trace before committing to
    // anything.
    let trace = air.generate_trace()?;
    if trace.n_rows() != trace_length || trace.n_cols() != trace_columns {
        return Err(ProvingError::TraceShape {
            rows: trace.n_rows(),
            columns: trace.n_cols(),
            expected_rows: trace_length,
            expected_columns: trace_columns,
        });
    }
    let secret_traces = air.secret_register_traces();
    if secret_traces.len() != context.num_secret_inputs
        || secret_traces.iter().any(|t| t.len() != trace_length)
    {
        return Err(ProvingError::TraceShape {
            rows: secret_traces.first().map(|t| t.len()).unwrap_or(0),
            columns: secret_traces.len(),
            expected_rows: trace_length,
            expected_columns: context.num_secret_inputs,
        });
    }

    for assertion in assertions {
        if assertion.register >= trace_columns || assertion.step >= trace_length {
            return Err(AssertionError::OutOfRange {
                register: assertion.register,
                step: assertion.step,
            }
            .into());
        }
        if trace.get(assertion.step, assertion.register) != &assertion.value {
            return Err(AssertionError::Unsatisfied {
                register: assertion.register,
                step: assertion.step,
            }
            .into());
        }
    }

    // Transition constraints must hold on every execution step but the
    // last.
    let trace_domain = geometric_series(&domain.trace_primitive_root, trace_length);
    let secret_rows: Vec<Vec<FieldElement<A::Field>>> = (0..trace_length)
        .map(|step| secret_traces.iter().map(|t| t[step].clone()).collect())
        .collect();
    for step in 0..trace_length - 1 {
        let frame = EvaluationFrame::new(
            &trace_domain[step],
            trace.get_row(step),
            trace.get_row(step + 1),
            &secret_rows[step],
        );
        let evaluations = air.evaluate_transition(&frame);
        if let Some(constraint) = evaluations
            .iter()
            .position(|value| value != &FieldElement::zero())
        {
            return Err(ProvingError::ConstraintViolation { constraint, step });
        }
    }

    // Interpolate the registers and extend everything to the evaluation
    // domain.
    let trace_polys = trace.compute_trace_polys()?;
    let secret_polys: Vec<Polynomial<FieldElement<A::Field>>> = secret_traces
        .iter()
        .map(|column| Polynomial::interpolate_fft(column))
        .collect::<Result<_, _>>()?;

    #[cfg(feature = "parallel")]
    let poly_iter = trace_polys.par_iter().chain(secret_polys.par_iter());
    #[cfg(not(feature = "parallel"))]
    let poly_iter = trace_polys.iter().chain(secret_polys.iter());

    let columns: Vec<Vec<FieldElement<A::Field>>> = poly_iter
        .map(|poly| poly.evaluate_fft(extension_factor, Some(trace_length)))
        .collect::<Result<_, _>>()?;

    // One Merkle tree over the merged rows of every extended register.
    let ev_leaves = merge_vector_rows(&columns);
    let ev_tree = MerkleTree::build(&ev_leaves, hash)?;
    let ev_root = ev_tree.root;
    info!("Committed to the extended execution trace");

    // All later randomness is rooted in that commitment.
    let coin = RandomCoin::new(hash);
    let evaluator = ConstraintEvaluator::new(air, assertions, &ev_root, &domain, &coin)?;
    let c_evaluations = evaluator.evaluate(
        &trace_polys,
        &secret_polys,
        &columns[..trace_columns],
        &domain,
    )?;

    let combination = LinearCombination::new(
        &ev_root,
        evaluator.coefficients_used(),
        trace_columns + context.num_secret_inputs,
        &domain,
        &coin,
    );
    let l_evaluations = combination.combine(
        c_evaluations,
        &columns[..trace_columns],
        &columns[trace_columns..],
        &domain,
    );
    info!("Computed the composition polynomial and its linear combination");

    // FRI over the linear combination.
    let l_tree = MerkleTree::build(&fiber_leaves(&l_evaluations), hash)?;
    let index_generator = QueryIndexGenerator::new(
        hash,
        extension_factor,
        context.options.exe_query_count,
        context.options.fri_query_count,
    );
    let (components, remainder) = fri_prove(
        &l_tree,
        &l_evaluations,
        &domain,
        hash,
        &coin,
        &index_generator,
    )?;

    // Trace openings at positions bound to the FRI commitment, plus the
    // next-row positions the transition constraints need.
    let positions = index_generator.exe_indexes(&l_tree.root, lde_domain_size)?;
    let augmented: Vec<usize> = positions
        .iter()
        .flat_map(|p| [*p, (p + extension_factor) % lde_domain_size])
        .sorted()
        .dedup()
        .collect();
    let ev_proof = ev_tree.prove_batch(&augmented)?;

    let quarter = lde_domain_size / 4;
    let lc_positions: Vec<usize> = positions.iter().map(|p| p % quarter).collect();
    let lc_proof = l_tree.prove_batch(&lc_positions)?;

    info!("End proof generation");

    Ok(StarkProof {
        ev_root,
        ev_proof,
        ld_proof: FriProof {
            lc_root: l_tree.root,
            lc_proof,
            components,
            remainder,
        },
        input_shapes: air.input_shapes(),
    })
}
