//! Conformance Harness — Media Loading Invariant Tests
//!
//! Enforces the subsystem's MUST-level invariants end to end, driving
//! the pure state machine the way the platform adapter would.
//!
//! Invariant coverage:
//! - Candidate chain shape (length bounds, ordering, dedupe, URL joining)
//! - Lazy gating (no request before the visibility signal)
//! - Fallback progression (Failed only after full chain exhaustion)
//! - Generation supersession (stale callbacks discarded, connection
//!   changes supersede in-flight requests)
//! - End-to-end strategy/chain scenarios
//!
//! Adapter-owned invariants (NOT tested here — see lumen-media-wasm):
//! - Single platform `change` listener
//! - IntersectionObserver auto-disconnect after first fire
//! - Capability probe memoization

mod end_to_end;
mod lifecycle;
mod supersession;
