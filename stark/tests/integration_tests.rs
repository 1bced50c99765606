use quartz_crypto::hash::HashFunction;
use quartz_math::field::element::FieldElement;
use quartz_math::field::fields::fft_friendly::stark_32_prime_field::Stark32PrimeField;

use quartz_stark::examples::constant::{ConstantAir, ConstantPublicInputs};
use quartz_stark::examples::counter::{CounterAir, CounterPublicInputs};
use quartz_stark::examples::fibonacci::{FibonacciAir, FibonacciPublicInputs};
use quartz_stark::examples::masked_counter::{MaskedCounterAir, MaskedCounterPublicInputs};
use quartz_stark::examples::mimc::{mimc_trace, MimcAir, MimcPublicInputs};
use quartz_stark::{
    deserialize_proof, prove, serialize_proof, verify, Air, Assertion, ProofOptions, ProvingError,
    StarkProof, VerificationError,
};

type F = Stark32PrimeField;
type FE = FieldElement<F>;

fn fe(value: u64) -> FE {
    FE::from(value)
}

fn fibonacci_setup() -> (FibonacciAir, Vec<Assertion<F>>) {
    let pub_inputs = FibonacciPublicInputs {
        a0: fe(1),
        a1: fe(1),
    };
    let air = FibonacciAir::new(64, &pub_inputs, &ProofOptions::default()).unwrap();
    // Register 1 at step 63 holds the 128th Fibonacci-pair value of the
    // (a, b) -> (a + b, a + 2b) recurrence started from (1, 1).
    let assertions = vec![
        Assertion::new(0, 0, fe(1)),
        Assertion::new(1, 0, fe(1)),
        Assertion::new(1, 63, fe(1_783_540_607)),
    ];
    (air, assertions)
}

#[test]
fn fibonacci_proof_verifies() {
    let (air, assertions) = fibonacci_setup();
    let proof = prove(&air, &assertions).unwrap();
    verify(&air, &assertions, &proof).unwrap();
}

#[test]
fn counter_proof_verifies() {
    let air = CounterAir::new(64, &CounterPublicInputs { start: fe(1) }, &ProofOptions::default())
        .unwrap();
    let assertions = vec![Assertion::new(0, 0, fe(1)), Assertion::new(0, 63, fe(64))];
    let proof = prove(&air, &assertions).unwrap();
    verify(&air, &assertions, &proof).unwrap();
}

#[test]
fn mimc_proof_verifies_and_detects_a_wrong_output() {
    let steps = 1 << 13;
    let pub_inputs = MimcPublicInputs {
        seed: fe(3),
        round_constant: fe(42),
    };
    let air = MimcAir::new(steps, &pub_inputs, &ProofOptions::default()).unwrap();
    let output = mimc_trace(&pub_inputs, steps).pop().unwrap();
    let assertions = vec![
        Assertion::new(0, 0, fe(3)),
        Assertion::new(0, steps - 1, output.clone()),
    ];
    let proof = prove(&air, &assertions).unwrap();
    verify(&air, &assertions, &proof).unwrap();

    // Verifying against a different claimed output must fail.
    let tampered = vec![
        Assertion::new(0, 0, fe(3)),
        Assertion::new(0, steps - 1, output + FE::one()),
    ];
    assert!(verify(&air, &tampered, &proof).is_err());
}

#[test]
fn boundary_only_computation_verifies() {
    let air = ConstantAir::new(8, &ConstantPublicInputs { value: fe(5) }, &ProofOptions::default())
        .unwrap();
    let assertions = vec![Assertion::new(0, 0, fe(5))];
    let proof = prove(&air, &assertions).unwrap();
    verify(&air, &assertions, &proof).unwrap();
}

#[test]
fn secret_registers_flow_through_the_whole_pipeline() {
    use rand::{Rng, SeedableRng};

    let pub_inputs = MaskedCounterPublicInputs { start: fe(7) };
    let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    let addends: Vec<FE> = (0..64).map(|_| fe(rng.gen_range(0..1_000_000))).collect();
    let output = addends[..63]
        .iter()
        .fold(fe(7), |accumulator, addend| accumulator + addend);

    let prover_air =
        MaskedCounterAir::with_secret(64, &pub_inputs, &ProofOptions::default(), addends).unwrap();
    let assertions = vec![Assertion::new(0, 0, fe(7)), Assertion::new(0, 63, output)];
    let proof = prove(&prover_air, &assertions).unwrap();

    // The verifier never sees the addends.
    let verifier_air = MaskedCounterAir::new(64, &pub_inputs, &ProofOptions::default()).unwrap();
    verify(&verifier_air, &assertions, &proof).unwrap();
}

#[test]
fn prover_rejects_assertions_the_trace_does_not_satisfy() {
    let (air, mut assertions) = fibonacci_setup();
    assertions[2] = Assertion::new(1, 63, fe(1_783_540_608));
    match prove(&air, &assertions) {
        Err(ProvingError::Assertion(_)) => {}
        other => panic!("expected an assertion error, got {other:?}"),
    }
}

#[test]
fn proofs_are_deterministic() {
    let (air, assertions) = fibonacci_setup();
    let first = prove(&air, &assertions).unwrap();
    let second = prove(&air, &assertions).unwrap();
    assert_eq!(
        serialize_proof(&first, 2).unwrap(),
        serialize_proof(&second, 2).unwrap()
    );
}

#[test]
fn serialization_roundtrips_and_reports_its_size() {
    let (air, assertions) = fibonacci_setup();
    let proof = prove(&air, &assertions).unwrap();
    let bytes = serialize_proof(&proof, 2).unwrap();
    assert_eq!(proof.size_in_bytes(), bytes.len());

    let parsed: StarkProof<F> = deserialize_proof(&bytes, 2).unwrap();
    assert_eq!(parsed, proof);
    verify(&air, &assertions, &parsed).unwrap();
}

#[test]
fn tampering_with_the_remainder_is_detected() {
    let (air, assertions) = fibonacci_setup();
    let mut proof = prove(&air, &assertions).unwrap();
    proof.ld_proof.remainder[0] = &proof.ld_proof.remainder[0] + FE::one();
    assert!(verify(&air, &assertions, &proof).is_err());
}

#[test]
fn flipping_any_sampled_proof_byte_is_detected() {
    let (air, assertions) = fibonacci_setup();
    let proof = prove(&air, &assertions).unwrap();
    let bytes = serialize_proof(&proof, 2).unwrap();

    for offset in (0..bytes.len()).step_by(97) {
        let mut corrupted = bytes.clone();
        corrupted[offset] ^= 0x20;
        match deserialize_proof::<F>(&corrupted, 2) {
            Err(_) => {}
            Ok(parsed) => {
                assert!(
                    verify(&air, &assertions, &parsed).is_err(),
                    "flip at offset {offset} went unnoticed"
                );
            }
        }
    }
}

#[test]
fn verification_is_bound_to_the_public_inputs() {
    let air = CounterAir::new(64, &CounterPublicInputs { start: fe(1) }, &ProofOptions::default())
        .unwrap();
    let assertions = vec![Assertion::new(0, 0, fe(1)), Assertion::new(0, 63, fe(64))];
    let proof = prove(&air, &assertions).unwrap();

    // A verifier expecting a different starting value must reject.
    let other_air =
        CounterAir::new(64, &CounterPublicInputs { start: fe(2) }, &ProofOptions::default())
            .unwrap();
    let other_assertions = vec![Assertion::new(0, 0, fe(2)), Assertion::new(0, 63, fe(65))];
    assert!(verify(&other_air, &other_assertions, &proof).is_err());
}

#[test]
fn hash_choice_is_part_of_the_protocol() {
    let (air, assertions) = fibonacci_setup();
    let proof = prove(&air, &assertions).unwrap();

    let blake_options = ProofOptions {
        hash: HashFunction::Blake2s256,
        ..Default::default()
    };
    let blake_air = FibonacciAir::new(
        64,
        &FibonacciPublicInputs {
            a0: fe(1),
            a1: fe(1),
        },
        &blake_options,
    )
    .unwrap();
    assert!(verify(&blake_air, &assertions, &proof).is_err());

    // And a blake2s-based proof verifies under its own parameters.
    let blake_proof = prove(&blake_air, &assertions).unwrap();
    verify(&blake_air, &assertions, &blake_proof).unwrap();
}

#[test]
fn verification_errors_name_the_failing_layer() {
    let (air, assertions) = fibonacci_setup();
    let mut proof = prove(&air, &assertions).unwrap();
    proof.ld_proof.components.clear();
    match verify(&air, &assertions, &proof) {
        Err(VerificationError::FriLayer(_)) => {}
        other => panic!("expected a FRI layer error, got {other:?}"),
    }
}
