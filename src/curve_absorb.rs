//! Absorption traits for elliptic-curve points in both execution modes.
//!
//! The transcript encoding of a point - affine `x` then `y` - is fixed here
//! and nowhere else, so the native and circuit verifiers cannot drift apart
//! in what they feed the Fiat-Shamir sponge.

use ark_crypto_primitives::sponge::{
    constraints::CryptographicSpongeVar,
    poseidon::{constraints::PoseidonSpongeVar, PoseidonSponge},
    Absorb, CryptographicSponge,
};
use ark_ec::twisted_edwards::{Projective as TEProjective, TECurveConfig};
use ark_ec::CurveGroup;
use ark_ff::PrimeField;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::groups::curves::twisted_edwards::AffineVar;
use ark_relations::r1cs::SynthesisError;

/// Absorb a native curve point into a Poseidon sponge.
pub trait CurveAbsorb<F: PrimeField> {
    fn curve_absorb(&self, sponge: &mut PoseidonSponge<F>);
}

/// Absorb a circuit curve variable into a Poseidon sponge variable.
pub trait CurveAbsorbGadget<F: PrimeField> {
    fn curve_absorb_gadget(&self, sponge: &mut PoseidonSpongeVar<F>)
        -> Result<(), SynthesisError>;
}

impl<P> CurveAbsorb<P::BaseField> for TEProjective<P>
where
    P: TECurveConfig,
    P::BaseField: PrimeField + Absorb,
{
    fn curve_absorb(&self, sponge: &mut PoseidonSponge<P::BaseField>) {
        let affine = self.into_affine();
        sponge.absorb(&affine.x);
        sponge.absorb(&affine.y);
    }
}

impl<P> CurveAbsorbGadget<P::BaseField> for AffineVar<P, FpVar<P::BaseField>>
where
    P: TECurveConfig,
    P::BaseField: PrimeField,
{
    fn curve_absorb_gadget(
        &self,
        sponge: &mut PoseidonSpongeVar<P::BaseField>,
    ) -> Result<(), SynthesisError> {
        sponge.absorb(&self.x)?;
        sponge.absorb(&self.y)?;
        Ok(())
    }
}
