//! Strategy policy implementation — deterministic loading decisions.
//!
//! The policy function is pure: identical inputs produce identical
//! outputs. No IO, no clocks, no global state.

use super::types::{ImageFormat, LoadingStrategy, PlaceholderKind, Quality, StrategyOverrides};
use crate::connection::{ConnectionClassification, EffectiveType};

/// Compute a loading strategy from the given observations.
///
/// # Contract
///
/// - **Deterministic**: identical inputs always produce identical output.
/// - **Axis independence**: `preferred_format` is always `capability`,
///   regardless of any network field; the remaining fields never read
///   `capability`.
/// - **Slowness dominates**: if `connection.is_slow()`, the low-quality
///   row applies whatever the effective type says.
/// - **Field-level overrides**: a present override field replaces that
///   field only; absent fields keep the table-derived value.
///
/// # Policy table
///
/// | connection | quality | lazy | placeholder | progressive |
/// |------------|---------|------|-------------|-------------|
/// | slow (derived) | low | true | blur | true |
/// | `slow-2g` / `2g` | low | true | blur | true |
/// | `3g` | medium | true | skeleton | true |
/// | `4g` (default) | high | false | skeleton | false |
pub fn decide(
    connection: &ConnectionClassification,
    capability: ImageFormat,
    overrides: &StrategyOverrides,
) -> LoadingStrategy {
    let base = if connection.is_slow() {
        LoadingStrategy {
            quality: Quality::Low,
            lazy: true,
            placeholder: PlaceholderKind::Blur,
            progressive: true,
            preferred_format: capability,
        }
    } else {
        match connection.effective_type {
            // Unreachable in practice (slow-2g/2g imply is_slow), kept so
            // the match stays total over the table.
            EffectiveType::Slow2g | EffectiveType::TwoG => LoadingStrategy {
                quality: Quality::Low,
                lazy: true,
                placeholder: PlaceholderKind::Blur,
                progressive: true,
                preferred_format: capability,
            },
            EffectiveType::ThreeG => LoadingStrategy {
                quality: Quality::Medium,
                lazy: true,
                placeholder: PlaceholderKind::Skeleton,
                progressive: true,
                preferred_format: capability,
            },
            EffectiveType::FourG => LoadingStrategy {
                quality: Quality::High,
                lazy: false,
                placeholder: PlaceholderKind::Skeleton,
                progressive: false,
                preferred_format: capability,
            },
        }
    };

    LoadingStrategy {
        quality: overrides.quality.unwrap_or(base.quality),
        lazy: overrides.lazy.unwrap_or(base.lazy),
        placeholder: overrides.placeholder.unwrap_or(base.placeholder),
        progressive: overrides.progressive.unwrap_or(base.progressive),
        preferred_format: overrides.preferred_format.unwrap_or(base.preferred_format),
    }
}
