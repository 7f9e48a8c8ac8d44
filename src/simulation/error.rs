//! Typed errors surfaced to callers.
//!
//! Malformed genome *values* are never errors — they are clamped by the
//! validation pass. Only structurally corrupt input (unparseable genome or
//! brain text) is reported, so a caller can skip the bad entry and backfill.

use thiserror::Error;

/// Errors produced when decoding persisted genomes or brains.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The text was not a valid genome encoding.
    #[error("failed to decode genome: {0}")]
    Genome(#[source] serde_json::Error),
    /// The text was not a valid brain encoding.
    #[error("failed to decode brain: {0}")]
    Brain(#[source] serde_json::Error),
}
