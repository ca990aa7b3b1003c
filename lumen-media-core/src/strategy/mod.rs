//! Loading strategy — pure, deterministic per-image policy.
//!
//! The policy core makes loading decisions without IO, clocks, or global
//! state: the platform adapters feed it a connection classification and a
//! probed capability, and it returns a [`LoadingStrategy`] value. The
//! wasm build exposes `decide()` to the view layer indirectly through the
//! load controller.

pub mod policy;
pub mod types;

// Re-export the canonical entrypoint and core types.
pub use policy::decide;
pub use types::{ImageFormat, LoadingStrategy, PlaceholderKind, Quality, StrategyOverrides};
