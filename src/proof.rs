//! The range-proof record and its native (concrete-value) verification.

use crate::config::poseidon_config;
use crate::curve_absorb::CurveAbsorb;
use crate::error::RangeProofError;
use crate::params::{ProtocolParams, RANGE_MAX_BITS};
use ark_crypto_primitives::sponge::{
    poseidon::{PoseidonConfig, PoseidonSponge},
    Absorb, CryptographicSponge,
};
use ark_ec::{CurveGroup, PrimeGroup};
use ark_ff::{AdditiveGroup, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::Zero;

const LOG_TARGET: &str = "ctrange::proof";

/// A range proof for a value committed with `base_h` as value generator.
///
/// The challenge and responses live in the curve's base field - the field the
/// Poseidon transcript squeezes and the field the circuit verifier computes
/// in. Scalar multiplication by them always means multiplication by their
/// canonical integer representative, so the two verification modes agree on
/// every group operation.
///
/// Records are immutable once constructed; verification never mutates them
/// and is idempotent.
#[derive(Clone, Debug, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct RangeProof<C: CurveGroup> {
    /// Claimed aggregate Fiat-Shamir challenge.
    pub challenge: C::BaseField,
    /// One commitment per bit position, index 0 = least significant bit.
    pub bit_commitments: Vec<C>,
    /// Schnorr responses, positionally paired with `bit_commitments`.
    pub responses: Vec<C::BaseField>,
    /// Claimed homomorphic sum of all bit commitments.
    pub aggregate_commitment: C,
    /// Claimed value generator; must equal the protocol-wide constant.
    pub base_h: C,
    /// When false the record is an unused batch slot and every check is
    /// vacuously satisfied.
    pub enabled: bool,
}

impl<C> RangeProof<C>
where
    C: CurveGroup + CurveAbsorb<C::BaseField>,
    C::BaseField: PrimeField + Absorb,
{
    /// Decides ACCEPT/REJECT for this record.
    ///
    /// For each bit `i` the accumulator tracks `-(2^i)·H`, so
    /// `delta_i = As[i] + acc` strips the bit's ladder weight. The claimed
    /// challenge then homomorphically cancels the commitment's contribution:
    /// `com_i = Zs[i]·G - challenge·delta_i`, and a fresh transcript over
    /// `com_i` yields the per-bit challenge binding `As[i]` to it. The
    /// per-bit rebindings `c_i·As[i]` are hashed (in bit order, one fresh
    /// transcript) into the recomputed aggregate challenge.
    ///
    /// Accepts iff the recomputed challenge matches the claimed one, the
    /// aggregate commitment equals the sum of the bit commitments, and
    /// `base_h` is the protocol constant. All three conjuncts are evaluated
    /// unconditionally - there is no early exit on a failed check, so the
    /// work done depends only on `RANGE_MAX_BITS`.
    pub fn verify(&self, params: &ProtocolParams<C>) -> Result<bool, RangeProofError> {
        if !self.enabled {
            return Ok(true);
        }
        if self.bit_commitments.len() != RANGE_MAX_BITS {
            return Err(RangeProofError::MalformedInput {
                expected: RANGE_MAX_BITS,
                actual: self.bit_commitments.len(),
            });
        }
        if self.responses.len() != RANGE_MAX_BITS {
            return Err(RangeProofError::MalformedInput {
                expected: RANGE_MAX_BITS,
                actual: self.responses.len(),
            });
        }

        let sponge_config = poseidon_config::<C::BaseField>();
        let challenge_repr = self.challenge.into_bigint();

        // Tracks -(2^i)·H; doubled after every bit.
        let mut accumulator = -self.base_h;
        let mut rebinds = Vec::with_capacity(RANGE_MAX_BITS);
        for (commitment, response) in self.bit_commitments.iter().zip(&self.responses) {
            let delta = *commitment + accumulator;
            let term = (-delta).mul_bigint(challenge_repr);
            let com = params.generator.mul_bigint(response.into_bigint()) + term;
            let bit_challenge = derive_challenge(&sponge_config, &[com]);
            rebinds.push(commitment.mul_bigint(bit_challenge.into_bigint()));
            accumulator.double_in_place();
        }

        let recomputed = derive_challenge(&sponge_config, &rebinds);
        let aggregate = self
            .bit_commitments
            .iter()
            .fold(C::zero(), |acc, commitment| acc + commitment);

        let challenge_ok = recomputed == self.challenge;
        let aggregate_ok = aggregate == self.aggregate_commitment;
        let base_h_ok = self.base_h == params.base_h;
        tracing::debug!(
            target: LOG_TARGET,
            challenge_ok,
            aggregate_ok,
            base_h_ok,
            "native range-proof verification finished"
        );
        Ok(challenge_ok && aggregate_ok && base_h_ok)
    }
}

/// One transcript computation: a fresh sponge absorbs the given points and
/// squeezes a single challenge. The sponge never outlives the call, so state
/// cannot leak between the per-bit and aggregate derivations.
pub(crate) fn derive_challenge<C>(
    config: &PoseidonConfig<C::BaseField>,
    points: &[C],
) -> C::BaseField
where
    C: CurveGroup + CurveAbsorb<C::BaseField>,
    C::BaseField: PrimeField + Absorb,
{
    let mut sponge = PoseidonSponge::new(config);
    for point in points {
        point.curve_absorb(&mut sponge);
    }
    let squeezed: Vec<C::BaseField> = sponge.squeeze_field_elements(1);
    squeezed[0]
}
