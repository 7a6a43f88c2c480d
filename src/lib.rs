//! Zero-knowledge range-proof verification over an embedded twisted Edwards
//! curve, in two execution modes that accept and reject exactly the same
//! inputs:
//!
//! - a native verifier operating on concrete curve and field elements
//!   ([`proof::RangeProof::verify`]), and
//! - an R1CS verifier whose every operation becomes a constraint for an
//!   external proving engine ([`proof_gadget::RangeProofVar::verify_gadget`]).
//!
//! A proof attests that the value hidden in a homomorphic commitment lies in
//! `[0, 2^RANGE_MAX_BITS)`. The Fiat-Shamir transcript is a Poseidon sponge;
//! point absorption goes through the [`curve_absorb`] traits so both modes
//! feed the transcript identical field elements.

pub mod config;
pub mod curve_absorb;
pub mod error;
pub mod params;
pub mod proof;
pub mod proof_gadget;
pub mod witness;

#[cfg(test)]
pub mod test_utils;

pub use config::poseidon_config;
pub use error::RangeProofError;
pub use params::{CurveId, ProtocolParams, RANGE_MAX_BITS};
pub use proof::RangeProof;
pub use proof_gadget::{RangeProofCircuit, RangeProofVar};
pub use witness::{PointWitness, RangeProofWitness};
