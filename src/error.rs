use crate::params::CurveId;
use ark_relations::r1cs::SynthesisError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RangeProofError {
    /// No embedded Edwards curve parameters exist for the requested outer
    /// curve. Fatal configuration error, surfaced before any verification.
    #[error("no embedded curve parameters for {0}")]
    UnsupportedCurve(CurveId),

    /// Native verification rejected the proof. Deterministic; never retried.
    #[error("range proof failed verification")]
    InvalidProof,

    /// A proof vector does not have `RANGE_MAX_BITS` entries. Rejected before
    /// any curve arithmetic.
    #[error("malformed range proof: expected {expected} elements, got {actual}")]
    MalformedInput { expected: usize, actual: usize },

    #[error("constraint synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),
}
