//! Protocol-wide constants: the fixed bit width, the commitment generators,
//! and the curve-identifier lookup that selects the embedded Edwards curve.

use crate::error::RangeProofError;
use ark_ec::{CurveGroup, PrimeGroup};
use ark_ed_on_bn254::{EdwardsProjective, Fr};
use ark_ff::PrimeField;
use ark_std::fmt;
use once_cell::sync::Lazy;

/// Number of bits covered by a range proof: the hidden value lies in
/// `[0, 2^RANGE_MAX_BITS)`. Both verification modes use this one constant; a
/// mismatch between them would be a protocol-breaking bug, so there is no
/// runtime knob for it.
pub const RANGE_MAX_BITS: usize = 32;

/// Domain-separation tag the value generator `H` is derived from.
const BASE_H_DOMAIN_TAG: &[u8] = b"ctrange/base-point-h/v1";

/// Outer curves an embedded Edwards curve could live on. Only BN254 (whose
/// embedded curve is Baby Jubjub) is wired up; the rest exist so that callers
/// configured for an unsupported pairing curve fail loudly at lookup time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveId {
    Bn254,
    Bls12_377,
    Bls12_381,
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveId::Bn254 => write!(f, "bn254"),
            CurveId::Bls12_377 => write!(f, "bls12-377"),
            CurveId::Bls12_381 => write!(f, "bls12-381"),
        }
    }
}

/// Generators shared by the prover and both verifiers.
///
/// `generator` is the canonical fixed-base point of the embedded curve's
/// prime-order subgroup; `base_h` is the protocol-wide value generator that
/// every bit commitment is weighted against. Both sides of the protocol must
/// consume the same instance - the struct is read-only after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtocolParams<C: CurveGroup> {
    pub generator: C,
    pub base_h: C,
}

/// The fixed value generator for Baby Jubjub, initialized once per process.
static BABY_JUBJUB_BASE_H: Lazy<EdwardsProjective> = Lazy::new(|| {
    let exponent = Fr::from_be_bytes_mod_order(BASE_H_DOMAIN_TAG);
    EdwardsProjective::generator() * exponent
});

impl ProtocolParams<EdwardsProjective> {
    /// Looks up the embedded-curve parameters for an outer curve identifier.
    ///
    /// Unsupported identifiers are a configuration error: they are reported
    /// to the caller before any verification work begins and are never
    /// retried.
    pub fn for_curve(id: CurveId) -> Result<Self, RangeProofError> {
        match id {
            CurveId::Bn254 => Ok(Self {
                generator: EdwardsProjective::generator(),
                base_h: *BABY_JUBJUB_BASE_H,
            }),
            other => Err(RangeProofError::UnsupportedCurve(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bn254_lookup_succeeds() {
        let params = ProtocolParams::for_curve(CurveId::Bn254).unwrap();
        assert_ne!(
            params.base_h, params.generator,
            "value generator must be independent of the base generator"
        );
    }

    #[test]
    fn base_h_is_stable_across_lookups() {
        let first = ProtocolParams::for_curve(CurveId::Bn254).unwrap();
        let second = ProtocolParams::for_curve(CurveId::Bn254).unwrap();
        assert_eq!(first.base_h, second.base_h);
    }

    #[test]
    fn unsupported_curves_are_rejected() {
        for id in [CurveId::Bls12_377, CurveId::Bls12_381] {
            let err = ProtocolParams::for_curve(id).unwrap_err();
            assert!(matches!(err, RangeProofError::UnsupportedCurve(got) if got == id));
        }
    }
}
