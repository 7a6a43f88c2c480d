//! In-circuit verification of a range proof.
//!
//! The algorithm is the one [`crate::proof::RangeProof::verify`] runs
//! natively, expressed over R1CS gadgets. Branching is replaced by gating:
//! each asserted equality is multiplied by the enable bit via
//! `conditional_enforce_equal`, so a disabled slot's constraints reduce to
//! `0 == 0` instead of disappearing, and the constraint sequence for a given
//! record is always the same.

use crate::config::poseidon_config;
use crate::curve_absorb::CurveAbsorbGadget;
use crate::error::RangeProofError;
use crate::params::{ProtocolParams, RANGE_MAX_BITS};
use crate::proof::RangeProof;
use crate::witness::{PointWitness, RangeProofWitness};
use ark_crypto_primitives::sponge::constraints::CryptographicSpongeVar;
use ark_crypto_primitives::sponge::Absorb;
use ark_crypto_primitives::sponge::poseidon::constraints::PoseidonSpongeVar;
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_ec::twisted_edwards::{Projective as TEProjective, TECurveConfig};
use ark_ec::CurveConfig;
use ark_ff::PrimeField;
use ark_r1cs_std::{
    alloc::{AllocVar, AllocationMode},
    boolean::Boolean,
    eq::EqGadget,
    fields::fp::FpVar,
    groups::curves::twisted_edwards::AffineVar,
    groups::CurveVar,
    prelude::*,
};
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystemRef, Namespace, SynthesisError,
};
use ark_std::borrow::Borrow;
use ark_std::One;
use tracing::instrument;

const LOG_TARGET: &str = "ctrange::proof_gadget";

/// Twisted Edwards point variable over the circuit field.
pub type PointVar<P> = AffineVar<P, FpVar<<P as CurveConfig>::BaseField>>;

/// Circuit representation of a range proof slot.
pub struct RangeProofVar<P>
where
    P: TECurveConfig,
    P::BaseField: PrimeField,
{
    pub challenge: FpVar<P::BaseField>,
    pub bit_commitments: Vec<PointVar<P>>,
    pub responses: Vec<FpVar<P::BaseField>>,
    pub aggregate_commitment: PointVar<P>,
    pub base_h: PointVar<P>,
    pub enabled: Boolean<P::BaseField>,
}

impl<P> Clone for RangeProofVar<P>
where
    P: TECurveConfig,
    P::BaseField: PrimeField,
{
    fn clone(&self) -> Self {
        Self {
            challenge: self.challenge.clone(),
            bit_commitments: self.bit_commitments.clone(),
            responses: self.responses.clone(),
            aggregate_commitment: self.aggregate_commitment.clone(),
            base_h: self.base_h.clone(),
            enabled: self.enabled.clone(),
        }
    }
}

impl<P> AllocVar<RangeProofWitness<P::BaseField>, P::BaseField> for RangeProofVar<P>
where
    P: TECurveConfig,
    P::BaseField: PrimeField,
{
    /// Points are allocated as two raw coordinate variables. No on-curve
    /// check is emitted: an off-curve assignment can only make the gated
    /// equalities harder to satisfy, never easier.
    fn new_variable<T: Borrow<RangeProofWitness<P::BaseField>>>(
        cs: impl Into<Namespace<P::BaseField>>,
        f: impl FnOnce() -> Result<T, SynthesisError>,
        mode: AllocationMode,
    ) -> Result<Self, SynthesisError> {
        let ns = cs.into();
        let cs = ns.cs();
        let witness = f()?.borrow().clone();

        if witness.bit_commitments.len() != RANGE_MAX_BITS
            || witness.responses.len() != RANGE_MAX_BITS
        {
            return Err(SynthesisError::Unsatisfiable);
        }

        let alloc_point = |coords: &PointWitness<P::BaseField>| -> Result<PointVar<P>, SynthesisError> {
            let x = FpVar::new_variable(cs.clone(), || Ok(coords.x), mode)?;
            let y = FpVar::new_variable(cs.clone(), || Ok(coords.y), mode)?;
            Ok(AffineVar::new(x, y))
        };

        let challenge = FpVar::new_variable(cs.clone(), || Ok(witness.challenge), mode)?;
        let bit_commitments = witness
            .bit_commitments
            .iter()
            .map(|coords| alloc_point(coords))
            .collect::<Result<Vec<_>, _>>()?;
        let responses = witness
            .responses
            .iter()
            .map(|response| FpVar::new_variable(cs.clone(), || Ok(*response), mode))
            .collect::<Result<Vec<_>, _>>()?;
        let aggregate_commitment = alloc_point(&witness.aggregate_commitment)?;
        let base_h = alloc_point(&witness.base_h)?;
        let enabled = Boolean::new_variable(cs.clone(), || Ok(witness.is_enabled.is_one()), mode)?;

        Ok(Self {
            challenge,
            bit_commitments,
            responses,
            aggregate_commitment,
            base_h,
            enabled,
        })
    }
}

impl<P> RangeProofVar<P>
where
    P: TECurveConfig,
    P::BaseField: PrimeField,
{
    /// Emits the verification constraints for this slot.
    ///
    /// Identical step sequence to the native verifier: ladder accumulator at
    /// `-(2^i)·H`, per-bit transcript over `com_i`, rebinding of each bit
    /// commitment by its bit challenge, one aggregate transcript over the
    /// rebindings. The three acceptance equalities are gated by `enabled`.
    #[instrument(target = LOG_TARGET, level = "debug", skip_all)]
    pub fn verify_gadget(
        &self,
        cs: ConstraintSystemRef<P::BaseField>,
        params: &ProtocolParams<TEProjective<P>>,
    ) -> Result<(), SynthesisError> {
        let sponge_config = poseidon_config::<P::BaseField>();
        let generator: PointVar<P> = AffineVar::new_constant(cs.clone(), params.generator)?;
        let base_h: PointVar<P> = AffineVar::new_constant(cs.clone(), params.base_h)?;

        self.base_h.conditional_enforce_equal(&base_h, &self.enabled)?;

        let challenge_bits = self.challenge.to_bits_le()?;
        let mut accumulator = self.base_h.negate()?;
        let mut rebinds = Vec::with_capacity(RANGE_MAX_BITS);
        for (commitment, response) in self.bit_commitments.iter().zip(&self.responses) {
            let delta = commitment + &accumulator;
            let term = delta.negate()?.scalar_mul_le(challenge_bits.iter())?;
            let com = generator.scalar_mul_le(response.to_bits_le()?.iter())? + term;
            let bit_challenge =
                derive_challenge_gadget(cs.clone(), &sponge_config, &[com])?;
            let rebind = commitment.scalar_mul_le(bit_challenge.to_bits_le()?.iter())?;
            rebinds.push(rebind);
            accumulator = accumulator.double()?;
        }

        let recomputed = derive_challenge_gadget(cs.clone(), &sponge_config, &rebinds)?;
        recomputed.conditional_enforce_equal(&self.challenge, &self.enabled)?;

        let mut aggregate = PointVar::<P>::zero();
        for commitment in &self.bit_commitments {
            aggregate = aggregate + commitment;
        }
        aggregate.conditional_enforce_equal(&self.aggregate_commitment, &self.enabled)?;

        tracing::debug!(
            target: LOG_TARGET,
            constraints = cs.num_constraints(),
            "range-proof constraints emitted"
        );
        Ok(())
    }
}

/// Circuit twin of [`crate::proof::derive_challenge`]: a fresh sponge per
/// computation, absorbing the same coordinates in the same order.
fn derive_challenge_gadget<P>(
    cs: ConstraintSystemRef<P::BaseField>,
    config: &PoseidonConfig<P::BaseField>,
    points: &[PointVar<P>],
) -> Result<FpVar<P::BaseField>, SynthesisError>
where
    P: TECurveConfig,
    P::BaseField: PrimeField,
{
    let mut sponge = PoseidonSpongeVar::new(cs, config);
    for point in points {
        point.curve_absorb_gadget(&mut sponge)?;
    }
    let mut squeezed = sponge.squeeze_field_elements(1)?;
    Ok(squeezed.remove(0))
}

/// Standalone circuit verifying one proof slot; the entry point an outer
/// batching circuit would inline.
pub struct RangeProofCircuit<P>
where
    P: TECurveConfig,
    P::BaseField: PrimeField,
{
    pub witness: RangeProofWitness<P::BaseField>,
    pub params: ProtocolParams<TEProjective<P>>,
}

impl<P> RangeProofCircuit<P>
where
    P: TECurveConfig,
    P::BaseField: PrimeField + Absorb,
{
    /// Projects an optional proof slot and emits its constraints in one step.
    ///
    /// `None` constrains the default (disabled) witness, a record that fails
    /// native verification is refused before a single constraint is emitted,
    /// and synthesis failures surface as [`RangeProofError::Synthesis`].
    pub fn constrain_slot(
        proof: Option<&RangeProof<TEProjective<P>>>,
        enabled: bool,
        params: &ProtocolParams<TEProjective<P>>,
        cs: ConstraintSystemRef<P::BaseField>,
    ) -> Result<(), RangeProofError> {
        let witness = RangeProofWitness::from_proof(proof, enabled, params)?;
        let circuit = Self {
            witness,
            params: params.clone(),
        };
        circuit.generate_constraints(cs)?;
        Ok(())
    }
}

impl<P> ConstraintSynthesizer<P::BaseField> for RangeProofCircuit<P>
where
    P: TECurveConfig,
    P::BaseField: PrimeField,
{
    fn generate_constraints(
        self,
        cs: ConstraintSystemRef<P::BaseField>,
    ) -> Result<(), SynthesisError> {
        let proof = RangeProofVar::<P>::new_witness(cs.clone(), || Ok(self.witness))?;
        proof.verify_gadget(cs, &self.params)
    }
}
