//! Shared test helpers: a scoped tracing subscriber, a companion prover that
//! manufactures records the verifier accepts, and an unchecked witness
//! projection for feeding deliberately broken records into the circuit.

use crate::config::poseidon_config;
use crate::curve_absorb::CurveAbsorb;
use crate::params::{ProtocolParams, RANGE_MAX_BITS};
use crate::proof::{derive_challenge, RangeProof};
use crate::witness::{PointWitness, RangeProofWitness};
use ark_crypto_primitives::sponge::Absorb;
use ark_ec::twisted_edwards::{Projective as TEProjective, TECurveConfig};
use ark_ec::{CurveGroup, PrimeGroup};
use ark_ff::{AdditiveGroup, BigInteger, PrimeField, UniformRand};
use ark_std::rand::Rng;
use ark_std::{One, Zero};
use tracing_subscriber::{filter, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a tracing subscriber scoped to the current test.
pub fn setup_test_tracing() -> tracing::subscriber::DefaultGuard {
    let filter = filter::Targets::new().with_target("ctrange", tracing::Level::DEBUG);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
                .with_test_writer(),
        )
        .with(filter)
        .set_default()
}

/// Produces a record that both verification modes accept.
///
/// The verification equation fixes every slot's ladder weight: an accepting
/// `As[i]` is always `2^i·H + r_i·G`, whatever the committed value's bits
/// are. The `value` argument is therefore only range-checked; the record's
/// contents do not depend on it.
///
/// Per slot `i` the prover commits `As[i] = 2^i·H + r_i·G` with a fresh
/// blinding, runs the Schnorr commit phase (`com_i = w_i·G`), and derives the
/// per-slot challenge from a fresh transcript over `com_i` - the same
/// transcript discipline the verifier uses. The rebindings `c_i·As[i]` are
/// hashed into the aggregate challenge, after which each response closes its
/// slot's relation: `Zs[i] = w_i + challenge·r_i` over the scalar field,
/// re-embedded into the circuit field.
pub fn prove_range<C, R>(value: u64, params: &ProtocolParams<C>, rng: &mut R) -> RangeProof<C>
where
    C: CurveGroup + CurveAbsorb<C::BaseField>,
    C::BaseField: PrimeField + Absorb,
    R: Rng,
{
    assert!(
        RANGE_MAX_BITS >= 64 || value < 1u64 << RANGE_MAX_BITS,
        "value outside [0, 2^{})",
        RANGE_MAX_BITS
    );

    let sponge_config = poseidon_config::<C::BaseField>();

    let mut weighted_h = params.base_h; // 2^i·H
    let mut blindings = Vec::with_capacity(RANGE_MAX_BITS);
    let mut nonces = Vec::with_capacity(RANGE_MAX_BITS);
    let mut bit_commitments = Vec::with_capacity(RANGE_MAX_BITS);
    let mut rebinds = Vec::with_capacity(RANGE_MAX_BITS);
    for _ in 0..RANGE_MAX_BITS {
        let blinding = C::ScalarField::rand(rng);
        let nonce = C::ScalarField::rand(rng);
        let commitment = weighted_h + params.generator * blinding;
        let com = params.generator * nonce;
        let bit_challenge = derive_challenge(&sponge_config, &[com]);
        rebinds.push(commitment.mul_bigint(bit_challenge.into_bigint()));
        blindings.push(blinding);
        nonces.push(nonce);
        bit_commitments.push(commitment);
        weighted_h.double_in_place();
    }

    let challenge = derive_challenge(&sponge_config, &rebinds);
    let challenge_scalar = scalar_from_base::<C>(challenge);
    let responses = nonces
        .iter()
        .zip(&blindings)
        .map(|(nonce, blinding)| base_from_scalar::<C>(*nonce + challenge_scalar * blinding))
        .collect();
    let aggregate_commitment = bit_commitments
        .iter()
        .fold(C::zero(), |acc, commitment| acc + commitment);

    RangeProof {
        challenge,
        bit_commitments,
        responses,
        aggregate_commitment,
        base_h: params.base_h,
        enabled: true,
    }
}

/// Witness projection without the validity gate, for tests that need to push
/// a rejecting record through the circuit.
pub fn project_unchecked<P>(
    proof: &RangeProof<TEProjective<P>>,
    enabled: bool,
) -> RangeProofWitness<P::BaseField>
where
    P: TECurveConfig,
    P::BaseField: PrimeField,
{
    let coords = |point: &TEProjective<P>| {
        let affine = point.into_affine();
        PointWitness {
            x: affine.x,
            y: affine.y,
        }
    };
    RangeProofWitness {
        challenge: proof.challenge,
        bit_commitments: proof.bit_commitments.iter().map(coords).collect(),
        responses: proof.responses.clone(),
        aggregate_commitment: coords(&proof.aggregate_commitment),
        base_h: coords(&proof.base_h),
        is_enabled: if enabled {
            P::BaseField::one()
        } else {
            P::BaseField::zero()
        },
    }
}

/// Reduces a circuit-field element to the scalar field through its canonical
/// integer representative.
fn scalar_from_base<C: CurveGroup>(element: C::BaseField) -> C::ScalarField
where
    C::BaseField: PrimeField,
{
    C::ScalarField::from_le_bytes_mod_order(&element.into_bigint().to_bytes_le())
}

/// Embeds a scalar into the circuit field; the scalar field is smaller, so
/// the representative is unchanged.
fn base_from_scalar<C: CurveGroup>(element: C::ScalarField) -> C::BaseField
where
    C::BaseField: PrimeField,
{
    C::BaseField::from_le_bytes_mod_order(&element.into_bigint().to_bytes_le())
}
