//! Candidate-chain construction from a logical source URL.
//!
//! One logical image request becomes an ordered fallback chain:
//! `[optimized, raw original, explicit fallback?]`. Order encodes
//! preference. The optimized candidate carries the strategy as query
//! parameters; the server/CDN honors them opportunistically, so a server
//! that ignores them costs quality, never correctness.

use crate::errors::MediaError;
use crate::strategy::LoadingStrategy;

/// Ordered, non-empty sequence of candidate URLs with a monotonic
/// cursor. Owned by exactly one load controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateChain {
    candidates: Vec<String>,
    cursor: usize,
}

impl CandidateChain {
    /// The candidate the cursor points at.
    pub fn current(&self) -> &str {
        &self.candidates[self.cursor]
    }

    /// Advance to the next candidate. Returns `false` when the chain is
    /// exhausted; the cursor never wraps and never decreases.
    pub fn advance(&mut self) -> bool {
        if self.cursor + 1 < self.candidates.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Always `false`; construction guarantees at least one candidate.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
}

/// Reject a source URL that a chain cannot be built from.
pub fn validate_source(source_url: &str) -> Result<(), MediaError> {
    if source_url.trim().is_empty() {
        return Err(MediaError::InvalidSource(source_url.to_string()));
    }
    Ok(())
}

/// Build the fallback chain for one logical request under `strategy`.
///
/// The optimized candidate appends `quality` (0–100 scale), `format`,
/// and `progressive` to `source_url`, joining with `&` when the URL
/// already has a query string. The explicit fallback is appended only
/// when distinct from both prior entries. Guarantee: `1 <= len <= 3`.
///
/// # Errors
/// [`MediaError::InvalidSource`] when `source_url` is blank. Load-time
/// failures are not errors; they advance the cursor.
pub fn build_chain(
    source_url: &str,
    strategy: &LoadingStrategy,
    explicit_fallback: Option<&str>,
) -> Result<CandidateChain, MediaError> {
    validate_source(source_url)?;

    let mut candidates = vec![optimized_url(source_url, strategy)];
    if candidates[0] != source_url {
        candidates.push(source_url.to_string());
    }
    if let Some(fallback) = explicit_fallback {
        if !fallback.trim().is_empty() && !candidates.iter().any(|c| c == fallback) {
            candidates.push(fallback.to_string());
        }
    }

    Ok(CandidateChain {
        candidates,
        cursor: 0,
    })
}

fn optimized_url(source_url: &str, strategy: &LoadingStrategy) -> String {
    let separator = if source_url.contains('?') { '&' } else { '?' };
    format!(
        "{source_url}{separator}quality={}&format={}&progressive={}",
        strategy.quality.percent(),
        strategy.preferred_format.as_str(),
        strategy.progressive,
    )
}
