//! Error taxonomy for the comparison pipeline.
//!
//! Two tiers: unit-local errors (`AlignmentError`, `EstimationError`) cause a
//! single candidate or random sample to be skipped; run-terminal errors
//! (`ConfigurationError`, the fatal `SearchError` variants) abort the batch.

use thiserror::Error;

/// Malformed scoring model or run parameters. Fatal to the whole run and
/// surfaced before any candidate work begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("scoring matrix must have {expected}x{expected} entries, got {actual}")]
    MatrixShape { expected: usize, actual: usize },

    #[error("scoring matrix is not symmetric at codes ({a}, {b})")]
    AsymmetricMatrix { a: usize, b: usize },

    #[error("gap penalties must be non-negative magnitudes (open={open}, extend={extend})")]
    NegativeGapPenalty { open: i32, extend: i32 },

    #[error("sample count must be at least {min}, got {got}")]
    SampleCountTooLow { min: usize, got: usize },
}

/// A single alignment could not be computed. Local to one candidate or one
/// random sample; that unit is skipped, never the batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("residue code {code} is outside the scoring alphabet")]
    UnknownSymbol { code: u8 },

    #[error("cannot align an empty sequence")]
    EmptySequence,
}

/// A candidate's significance estimate could not complete its full sample
/// set. Partial-sample estimates are never reported, so the candidate's
/// record is dropped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimationError {
    #[error("sample count must be positive")]
    NoSamples,

    #[error("random sample alignment failed: {0}")]
    SampleAlignment(#[from] AlignmentError),

    #[error("significance sampling cancelled")]
    Cancelled,
}

/// Terminal failure of a comparison run.
///
/// The variants distinguish "configuration is broken" from "no input was
/// usable"; the remediation differs, so the distinction is user-visible.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("query sequence is empty after normalization")]
    InvalidQuery,

    #[error("no candidate produced a valid alignment ({skipped} of {total} skipped)")]
    NoValidAlignments { skipped: usize, total: usize },

    #[error("run cancelled")]
    Cancelled,
}
