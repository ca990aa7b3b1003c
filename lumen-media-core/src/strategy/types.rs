//! Strategy types — the decided per-image loading policy.
//!
//! Two independent axes compose into one [`LoadingStrategy`]:
//! `preferred_format` depends only on what the runtime can decode;
//! everything else depends only on the connection classification. The
//! composition must never special-case one axis on the other.

use crate::constants::{QUALITY_PERCENT_HIGH, QUALITY_PERCENT_LOW, QUALITY_PERCENT_MEDIUM};

/// Requested image quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Low,
    Medium,
    High,
}

impl Quality {
    /// The 0–100 scale value carried in the `quality` query parameter.
    pub fn percent(self) -> u8 {
        match self {
            Quality::Low => QUALITY_PERCENT_LOW,
            Quality::Medium => QUALITY_PERCENT_MEDIUM,
            Quality::High => QUALITY_PERCENT_HIGH,
        }
    }

    /// Map a caller-supplied tier name. Unrecognized values return
    /// `None` so adapters can ignore bad input instead of guessing.
    pub fn parse(raw: &str) -> Option<Quality> {
        match raw {
            "low" => Some(Quality::Low),
            "medium" => Some(Quality::Medium),
            "high" => Some(Quality::High),
            _ => None,
        }
    }
}

/// What the view shows while the image has not loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Blur,
    Skeleton,
    None,
}

impl PlaceholderKind {
    pub fn parse(raw: &str) -> Option<PlaceholderKind> {
        match raw {
            "blur" => Some(PlaceholderKind::Blur),
            "skeleton" => Some(PlaceholderKind::Skeleton),
            "none" => Some(PlaceholderKind::None),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlaceholderKind::Blur => "blur",
            PlaceholderKind::Skeleton => "skeleton",
            PlaceholderKind::None => "none",
        }
    }
}

/// Best image encoding the runtime can decode. Determined by attempted
/// decode at startup, never by user-agent sniffing, and never by
/// connection speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Avif,
    Webp,
    /// Universal fallback; also the value reported before the async
    /// probe has resolved.
    Jpeg,
}

impl ImageFormat {
    /// The value carried in the `format` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Avif => "avif",
            ImageFormat::Webp => "webp",
            ImageFormat::Jpeg => "jpeg",
        }
    }

    pub fn parse(raw: &str) -> Option<ImageFormat> {
        match raw {
            "avif" => Some(ImageFormat::Avif),
            "webp" => Some(ImageFormat::Webp),
            "jpeg" | "jpg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }
}

/// The decided loading policy for one image. Produced fresh per
/// decision, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingStrategy {
    /// Quality tier requested from the server/CDN.
    pub quality: Quality,
    /// Whether activation must wait for viewport visibility.
    pub lazy: bool,
    /// Placeholder shown until the load settles.
    pub placeholder: PlaceholderKind,
    /// Request progressive encoding where supported.
    pub progressive: bool,
    /// Best format the runtime can render. Capability axis only.
    pub preferred_format: ImageFormat,
}

/// Field-level strategy overrides, merged after the policy table.
///
/// A present field replaces the table-derived value for that field only.
/// This is what lets a caller force `quality: High` for a clinically
/// important radiograph on a slow connection while still inheriting the
/// lazy/placeholder policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrategyOverrides {
    pub quality: Option<Quality>,
    pub lazy: Option<bool>,
    pub placeholder: Option<PlaceholderKind>,
    pub progressive: Option<bool>,
    pub preferred_format: Option<ImageFormat>,
}

impl StrategyOverrides {
    pub fn is_empty(&self) -> bool {
        *self == StrategyOverrides::default()
    }
}
