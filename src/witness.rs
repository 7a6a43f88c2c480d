//! Projection of a verified proof record into the circuit's input form.
//!
//! Every point becomes its two affine coordinates, every scalar its field
//! representation, and the enable flag a single-bit field element. The
//! projection re-runs native verification first: an invalid record never
//! reaches a constraint system.

use crate::error::RangeProofError;
use crate::params::{ProtocolParams, RANGE_MAX_BITS};
use crate::proof::RangeProof;
use ark_crypto_primitives::sponge::Absorb;
use ark_ec::twisted_edwards::{Projective as TEProjective, TECurveConfig};
use ark_ec::CurveGroup;
use ark_ff::PrimeField;
use ark_std::{One, Zero};

const LOG_TARGET: &str = "ctrange::witness";

/// A curve point as raw coordinates, the way the circuit consumes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointWitness<F: PrimeField> {
    pub x: F,
    pub y: F,
}

impl<F: PrimeField> PointWitness<F> {
    /// The twisted Edwards identity `(0, 1)`. Unlike `(0, 0)` it is a curve
    /// point, so the addition and doubling denominators evaluated while
    /// assigning the circuit's intermediate witnesses stay nonzero.
    pub fn identity() -> Self {
        Self {
            x: F::zero(),
            y: F::one(),
        }
    }
}

/// Field-element form of a [`RangeProof`], ready for allocation inside a
/// constraint system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeProofWitness<F: PrimeField> {
    pub challenge: F,
    pub bit_commitments: Vec<PointWitness<F>>,
    pub responses: Vec<F>,
    pub aggregate_commitment: PointWitness<F>,
    pub base_h: PointWitness<F>,
    /// 0 or 1; multiplies into every asserted equality in the circuit.
    pub is_enabled: F,
}

impl<F: PrimeField> Default for RangeProofWitness<F> {
    /// The witness for an intentionally unused batch slot. It keeps the full
    /// `RANGE_MAX_BITS` width - a fixed-size circuit allocates the slot
    /// whether or not it is in use - and its gating bit is 0, so every
    /// constraint it feeds is trivially satisfiable. Points sit at the curve
    /// identity: the gated arithmetic still runs on the assignment, and its
    /// Edwards denominators must not vanish.
    fn default() -> Self {
        Self {
            challenge: F::zero(),
            bit_commitments: vec![PointWitness::identity(); RANGE_MAX_BITS],
            responses: vec![F::zero(); RANGE_MAX_BITS],
            aggregate_commitment: PointWitness::identity(),
            base_h: PointWitness::identity(),
            is_enabled: F::zero(),
        }
    }
}

impl<F: PrimeField + Absorb> RangeProofWitness<F> {
    /// Builds the circuit input for a proof slot.
    ///
    /// `None` is the non-error "nothing to project" case and yields the
    /// default witness. A present proof is natively re-verified; a proof
    /// that does not verify is rejected with [`RangeProofError::InvalidProof`]
    /// and produces no partial witness.
    pub fn from_proof<P>(
        proof: Option<&RangeProof<TEProjective<P>>>,
        enabled: bool,
        params: &ProtocolParams<TEProjective<P>>,
    ) -> Result<Self, RangeProofError>
    where
        P: TECurveConfig<BaseField = F>,
    {
        let Some(proof) = proof else {
            return Ok(Self::default());
        };
        if !proof.verify(params)? {
            tracing::warn!(target: LOG_TARGET, "refusing to project an invalid range proof");
            return Err(RangeProofError::InvalidProof);
        }
        Ok(Self {
            challenge: proof.challenge,
            bit_commitments: proof.bit_commitments.iter().map(point_witness).collect(),
            responses: proof.responses.clone(),
            aggregate_commitment: point_witness(&proof.aggregate_commitment),
            base_h: point_witness(&proof.base_h),
            is_enabled: if enabled { F::one() } else { F::zero() },
        })
    }
}

fn point_witness<P>(point: &TEProjective<P>) -> PointWitness<P::BaseField>
where
    P: TECurveConfig,
    P::BaseField: PrimeField,
{
    let affine = point.into_affine();
    PointWitness {
        x: affine.x,
        y: affine.y,
    }
}
