//! The per-image load state machine.
//!
//! One controller owns one image instance's lifecycle:
//!
//! ```text
//! Idle ─(start, lazy)──────▶ AwaitingVisibility ─(visible)─▶ Loading
//! Idle ─(start, eager)─────────────────────────────────────▶ Loading
//! Loading ─(success)─▶ Loaded        Loading ─(failure)─▶ Loading (next candidate)
//! Loading ─(failure, chain exhausted)─▶ Failed
//! Loaded/Failed/Loading ─(connection change, activated)─▶ Loading (fresh strategy)
//! any ─(dispose)─▶ Disposed
//! ```
//!
//! The controller performs no IO. Every event method returns a
//! [`Directive`] for the platform adapter to execute, and load outcomes
//! come back stamped with the generation issued in
//! [`Directive::StartRequest`]. The generation increments on every
//! strategy recomputation, so a callback from a superseded request is
//! recognizable and discarded — expected steady-state behavior, never
//! logged as an error.

use tracing::{debug, trace, warn};

use crate::connection::ConnectionClassification;
use crate::constants::{ROOT_MARGIN_DEFAULT_PX, ROOT_MARGIN_SLOW_PX};
use crate::errors::MediaError;
use crate::resolver::{build_chain, validate_source, CandidateChain};
use crate::strategy::{decide, ImageFormat, LoadingStrategy, PlaceholderKind, StrategyOverrides};

/// Lifecycle phase of one image instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Created, `start()` not yet called.
    Idle,
    /// Gated on viewport visibility; no request issued yet.
    AwaitingVisibility,
    /// A request for the current candidate is in flight.
    Loading,
    /// Terminal success; `current_source()` is the final source.
    Loaded,
    /// Terminal failure; the whole chain was exhausted.
    Failed,
    /// Disposed; every event is a no-op.
    Disposed,
}

impl LoadPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadPhase::Idle => "idle",
            LoadPhase::AwaitingVisibility => "awaiting-visibility",
            LoadPhase::Loading => "loading",
            LoadPhase::Loaded => "loaded",
            LoadPhase::Failed => "failed",
            LoadPhase::Disposed => "disposed",
        }
    }
}

/// Instruction for the platform adapter. The controller decides; the
/// adapter touches the DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Nothing to do.
    None,
    /// Register the element with the visibility scheduler.
    ObserveVisibility { root_margin_px: u32 },
    /// Begin loading `url`; report the outcome back with `generation`.
    StartRequest { url: String, generation: u64 },
    /// Detach every observer and listener. Emitted only from `dispose`.
    DetachObservers,
}

/// Caller-supplied description of one logical image request.
#[derive(Debug, Clone, Default)]
pub struct MediaRequest {
    /// Logical source URL. Required.
    pub source_url: String,
    /// Optional last-resort fallback URL.
    pub fallback_url: Option<String>,
    /// Optional field-level strategy overrides.
    pub overrides: StrategyOverrides,
}

impl MediaRequest {
    pub fn new(source_url: impl Into<String>) -> Self {
        MediaRequest {
            source_url: source_url.into(),
            fallback_url: None,
            overrides: StrategyOverrides::default(),
        }
    }

    pub fn with_fallback(mut self, fallback_url: impl Into<String>) -> Self {
        self.fallback_url = Some(fallback_url.into());
        self
    }

    pub fn with_overrides(mut self, overrides: StrategyOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// State machine for one image instance.
///
/// Single-threaded; events are processed strictly sequentially. At most
/// one request is in flight at any instant — a strategy recomputation
/// supersedes (not races) the previous request via the generation
/// counter.
pub struct MediaLoadController {
    request: MediaRequest,
    capability: ImageFormat,
    connection: ConnectionClassification,
    strategy: LoadingStrategy,
    chain: Option<CandidateChain>,
    phase: LoadPhase,
    generation: u64,
    /// Set once the instance is allowed to load (eager start or first
    /// visibility signal). Connection changes only reload activated
    /// instances; a never-visible one picks up the current strategy
    /// whenever it does activate.
    activated: bool,
}

impl MediaLoadController {
    /// Create a controller for `request` under the given capability and
    /// connection observations. The initial strategy is decided here so
    /// lazy gating is known before `start()`.
    ///
    /// # Errors
    /// [`MediaError::InvalidSource`] when the source URL is blank.
    pub fn new(
        request: MediaRequest,
        capability: ImageFormat,
        connection: ConnectionClassification,
    ) -> Result<Self, MediaError> {
        validate_source(&request.source_url)?;
        let strategy = decide(&connection, capability, &request.overrides);
        Ok(MediaLoadController {
            request,
            capability,
            connection,
            strategy,
            chain: None,
            phase: LoadPhase::Idle,
            generation: 0,
            activated: false,
        })
    }

    // ─── Event methods ─────────────────────────────────────────────────

    /// Mount entry point. Lazy strategies gate on visibility; eager
    /// strategies begin loading immediately.
    pub fn start(&mut self) -> Directive {
        if self.phase != LoadPhase::Idle {
            trace!(phase = self.phase.as_str(), "start ignored outside Idle");
            return Directive::None;
        }
        if self.strategy.lazy {
            self.set_phase(LoadPhase::AwaitingVisibility);
            Directive::ObserveVisibility {
                root_margin_px: self.root_margin_px(),
            }
        } else {
            self.activated = true;
            self.begin_load()
        }
    }

    /// Visibility signal from the scheduler. Meaningful only while
    /// awaiting visibility; a late signal after dispose or reload is a
    /// no-op.
    pub fn on_visible(&mut self) -> Directive {
        if self.phase != LoadPhase::AwaitingVisibility {
            trace!(phase = self.phase.as_str(), "visibility signal ignored");
            return Directive::None;
        }
        self.activated = true;
        self.begin_load()
    }

    /// The candidate issued with `generation` loaded successfully.
    pub fn on_load_success(&mut self, generation: u64) -> Directive {
        if !self.accepts_load_event(generation) {
            return Directive::None;
        }
        self.set_phase(LoadPhase::Loaded);
        Directive::None
    }

    /// The candidate issued with `generation` failed to load. Advances
    /// the fallback cursor, or fails terminally when the chain is
    /// exhausted.
    pub fn on_load_failure(&mut self, generation: u64) -> Directive {
        if !self.accepts_load_event(generation) {
            return Directive::None;
        }
        // Loading phase implies a chain exists.
        let advanced = match self.chain.as_mut() {
            Some(chain) => chain.advance(),
            None => false,
        };
        if advanced {
            let url = self.current_candidate();
            debug!(%url, "advancing to next candidate");
            Directive::StartRequest {
                url,
                generation: self.generation,
            }
        } else {
            warn!(source = %self.request.source_url, "all candidates failed");
            self.set_phase(LoadPhase::Failed);
            Directive::None
        }
    }

    /// Fresh classification from the connection monitor. Activated
    /// instances re-strategize from scratch (superseding any in-flight
    /// request); non-activated ones just remember the classification.
    pub fn on_connection_change(&mut self, connection: ConnectionClassification) -> Directive {
        self.connection = connection;
        match self.phase {
            LoadPhase::Loading | LoadPhase::Loaded | LoadPhase::Failed if self.activated => {
                debug!(?connection, "connection change — recomputing strategy");
                self.begin_load()
            }
            _ => Directive::None,
        }
    }

    /// Unmount entry point. Terminal from any phase; bumps the
    /// generation so every queued callback becomes a no-op.
    pub fn dispose(&mut self) -> Directive {
        self.generation += 1;
        self.set_phase(LoadPhase::Disposed);
        Directive::DetachObservers
    }

    // ─── Accessors ─────────────────────────────────────────────────────

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    /// The strategy currently in force.
    pub fn strategy(&self) -> LoadingStrategy {
        self.strategy
    }

    /// Placeholder the view should render until the load settles.
    pub fn placeholder(&self) -> PlaceholderKind {
        self.strategy.placeholder
    }

    /// The final source, once loaded.
    pub fn current_source(&self) -> Option<&str> {
        match self.phase {
            LoadPhase::Loaded => self.chain.as_ref().map(|c| c.current()),
            _ => None,
        }
    }

    /// Generation of the most recent strategy computation. Adapters
    /// stamp load events with the value from `StartRequest`; this
    /// accessor exists for diagnostics.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ─── Internals ─────────────────────────────────────────────────────

    /// Recompute strategy and chain from current observations, supersede
    /// any in-flight request, and request the first candidate.
    fn begin_load(&mut self) -> Directive {
        self.generation += 1;
        self.strategy = decide(&self.connection, self.capability, &self.request.overrides);
        match build_chain(
            &self.request.source_url,
            &self.strategy,
            self.request.fallback_url.as_deref(),
        ) {
            Ok(chain) => {
                self.chain = Some(chain);
                self.set_phase(LoadPhase::Loading);
                Directive::StartRequest {
                    url: self.current_candidate(),
                    generation: self.generation,
                }
            }
            // Unreachable after the `new()` validation; fail closed.
            Err(_) => {
                self.set_phase(LoadPhase::Failed);
                Directive::None
            }
        }
    }

    fn accepts_load_event(&self, generation: u64) -> bool {
        if self.phase != LoadPhase::Loading || generation != self.generation {
            trace!(
                event_generation = generation,
                current_generation = self.generation,
                phase = self.phase.as_str(),
                "stale load callback discarded"
            );
            return false;
        }
        true
    }

    fn current_candidate(&self) -> String {
        self.chain
            .as_ref()
            .map(|c| c.current().to_string())
            .unwrap_or_default()
    }

    fn root_margin_px(&self) -> u32 {
        if self.connection.is_slow() {
            ROOT_MARGIN_SLOW_PX
        } else {
            ROOT_MARGIN_DEFAULT_PX
        }
    }

    fn set_phase(&mut self, phase: LoadPhase) {
        debug!(
            from = self.phase.as_str(),
            to = phase.as_str(),
            generation = self.generation,
            "phase transition"
        );
        self.phase = phase;
    }
}
