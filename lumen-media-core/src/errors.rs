//! Error types for lumen-media-core.
//!
//! The subsystem's public contract has almost no error surface: load
//! failures are state values (`LoadPhase::Failed`), a missing platform
//! facility is a silent default, and stale callbacks are discarded.
//! `MediaError` exists only for construction-time misuse that no amount
//! of degradation can paper over.

/// Unified error type for lumen-media-core operations.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The logical source URL is empty or whitespace-only. A chain
    /// cannot be built from nothing.
    #[error("Invalid source URL: {0:?}")]
    InvalidSource(String),
}

/// Runtime failure taxonomy — diagnostics vocabulary, never an `Err`.
///
/// Every failure the subsystem can observe at runtime falls into one of
/// these kinds. Only `ChainExhausted` escapes its owning component, and
/// then only as the terminal `Failed` phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A platform facility is missing; documented defaults apply.
    CapabilityUnavailable,
    /// One candidate URL failed; the cursor advances.
    CandidateLoadFailure,
    /// Every candidate failed; the instance is terminally `Failed`.
    ChainExhausted,
    /// A load event from a superseded generation; discarded silently.
    StaleCallback,
}

impl FailureKind {
    /// Whether this kind is recovered inside its owning component and
    /// never observable to the caller.
    pub fn recovered_locally(self) -> bool {
        !matches!(self, FailureKind::ChainExhausted)
    }
}
