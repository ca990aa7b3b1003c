//! Shared numeric contract of the media loading subsystem.
//!
//! These values are observable in produced URLs and observer options, so
//! the view layer and any CDN-side tooling depend on them staying fixed.

/// Quality query value for `Quality::Low` (percent, 0–100 scale).
pub const QUALITY_PERCENT_LOW: u8 = 60;

/// Quality query value for `Quality::Medium`.
pub const QUALITY_PERCENT_MEDIUM: u8 = 80;

/// Quality query value for `Quality::High`.
pub const QUALITY_PERCENT_HIGH: u8 = 95;

/// Intersection root margin (px) when the connection is slow.
/// Slow connections get the wider margin so the cheap low-quality
/// request starts well before the element is on screen.
pub const ROOT_MARGIN_SLOW_PX: u32 = 100;

/// Intersection root margin (px) for the default (fast) case.
pub const ROOT_MARGIN_DEFAULT_PX: u32 = 50;

/// Intersection threshold used for every visibility observation.
pub const INTERSECTION_THRESHOLD: f64 = 0.1;

/// Downlink estimate (Mbps) below which a connection counts as slow.
pub const SLOW_DOWNLINK_MBPS: f64 = 1.5;
