//! Lumen Media Core — adaptive network-aware image loading.
//!
//! This crate is the platform-agnostic half of the media loading
//! subsystem used by the Lumen clinic front end. It owns every decision:
//! how a connection is classified, which loading strategy applies, what
//! the candidate URL chain looks like, and how a single image instance
//! moves through its load lifecycle. It performs no IO, touches no DOM,
//! and reads no clocks — the browser adapters live in `lumen-media-wasm`.
//!
//! # Module Map
//!
//! | Module | Owns |
//! |--------|------|
//! | [`constants`] | Shared numeric contract (quality scale, margins, thresholds) |
//! | [`errors`] | `MediaError` and the runtime failure taxonomy |
//! | [`connection`] | Connection classification + monitor fan-out |
//! | [`strategy`] | `LoadingStrategy` and the pure `decide()` policy |
//! | [`resolver`] | Optimized-URL construction and `CandidateChain` |
//! | [`controller`] | Per-image state machine emitting [`Directive`]s |
//!
//! # Adapter Contract
//!
//! The controller never loads anything itself. Every event method returns
//! a [`Directive`] that the platform adapter executes (observe an element,
//! start a request, detach observers). Load outcomes come back stamped
//! with the generation the adapter received in `StartRequest`; stale
//! generations are discarded silently. This keeps the whole lifecycle
//! testable without a browser.

/// Shared numeric contract of the subsystem.
pub mod constants;

/// Error types and the runtime failure taxonomy.
pub mod errors;

/// Connection classification and the change-notification monitor.
pub mod connection;

/// Loading strategy types and the pure policy decision.
pub mod strategy;

/// Candidate-chain construction from a logical source URL.
pub mod resolver;

/// The per-image load state machine.
pub mod controller;

pub use connection::{
    ConnectionClassification, ConnectionKind, ConnectionMonitor, ConnectionSubscription,
    EffectiveType,
};
pub use controller::{Directive, LoadPhase, MediaLoadController, MediaRequest};
pub use errors::{FailureKind, MediaError};
pub use resolver::{build_chain, CandidateChain};
pub use strategy::{decide, ImageFormat, LoadingStrategy, PlaceholderKind, Quality, StrategyOverrides};
