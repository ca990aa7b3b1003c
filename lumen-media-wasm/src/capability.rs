//! Decodable-format probe, memoized per process.
//!
//! Feature detection by attempted decode: the browser is asked to decode
//! a 1×1 probe image in each candidate format, best first. Whatever it
//! actually decodes is what it supports — correct even for user agents
//! nobody enumerated. Never user-agent sniffing.
//!
//! Format support cannot change within a session, so the first result is
//! memoized for the process lifetime.

use std::cell::Cell;

use tracing::debug;
use wasm_bindgen_futures::JsFuture;

use lumen_media_core::ImageFormat;

thread_local! {
    static PREFERRED: Cell<Option<ImageFormat>> = const { Cell::new(None) };
}

/// Smallest valid AVIF (1×1, single gray pixel).
const AVIF_PROBE: &str = "data:image/avif;base64,AAAAIGZ0eXBhdmlmAAAAAGF2aWZtaWYxbWlhZk1BMUIAAADybWV0YQAAAAAAAAAoaGRscgAAAAAAAAAAcGljdAAAAAAAAAAAAAAAAGxpYmF2aWYAAAAADnBpdG0AAAAAAAEAAAAeaWxvYwAAAABEAAABAAEAAAABAAABGgAAAB0AAAAoaWluZgAAAAAAAQAAABppbmZlAgAAAAABAABhdjAxQ29sb3IAAAAAamlwcnAAAABLaXBjbwAAABRpc3BlAAAAAAAAAAEAAAABAAAAEHBpeGkAAAAAAwgICAAAAAxhdjFDgQ0MAAAAABNjb2xybmNseAACAAIAAYAAAAAXaXBtYQAAAAAAAAABAAEEAQKDBAAAACVtZGF0EgAKCBgANogQEAwgMg8f8D///8WfhwB8+ErK42A=";

/// Smallest valid lossy WebP (1×1).
const WEBP_PROBE: &str =
    "data:image/webp;base64,UklGRiIAAABXRUJQVlA4IBYAAAAwAQCdASoBAAEADsD+JaQAA3AAAAAA";

/// The memoized probe result; `Jpeg` until the probe resolves.
pub fn preferred_format() -> ImageFormat {
    PREFERRED
        .with(Cell::get)
        .unwrap_or(ImageFormat::Jpeg)
}

/// Run the probe (once). Determination order: AVIF → WebP → JPEG.
///
/// Idempotent: subsequent calls return the memoized result without
/// touching the platform.
pub async fn detect_preferred_format() -> ImageFormat {
    if let Some(format) = PREFERRED.with(Cell::get) {
        return format;
    }
    let format = if can_decode(AVIF_PROBE).await {
        ImageFormat::Avif
    } else if can_decode(WEBP_PROBE).await {
        ImageFormat::Webp
    } else {
        ImageFormat::Jpeg
    };
    debug!(format = format.as_str(), "capability probe resolved");
    PREFERRED.with(|cell| cell.set(Some(format)));
    format
}

async fn can_decode(data_url: &str) -> bool {
    // No rendering surface needed: decode() settles without layout.
    let Ok(element) = web_sys::HtmlImageElement::new() else {
        return false;
    };
    element.set_src(data_url);
    JsFuture::from(element.decode()).await.is_ok()
}
