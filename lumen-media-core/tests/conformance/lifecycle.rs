//! Conformance: state machine lifecycle.
//!
//! Drives `MediaLoadController` the way the platform adapter would and
//! asserts the transition table: lazy gating, eager start, terminal
//! phases, and dispose-at-any-phase.

use lumen_media_core::{
    ConnectionClassification, Directive, EffectiveType, ImageFormat, LoadPhase,
    MediaLoadController, MediaRequest,
};

fn slow() -> ConnectionClassification {
    ConnectionClassification {
        effective_type: EffectiveType::TwoG,
        ..Default::default()
    }
}

fn fast() -> ConnectionClassification {
    ConnectionClassification::default()
}

fn controller(connection: ConnectionClassification) -> MediaLoadController {
    MediaLoadController::new(
        MediaRequest::new("https://x/img.jpg"),
        ImageFormat::Jpeg,
        connection,
    )
    .unwrap()
}

fn request_generation(directive: Directive) -> u64 {
    match directive {
        Directive::StartRequest { generation, .. } => generation,
        other => panic!("expected StartRequest, got {other:?}"),
    }
}

#[test]
fn conformance_lazy_issues_no_request_until_visible() {
    let mut c = controller(slow());
    let directive = c.start();
    assert!(
        matches!(directive, Directive::ObserveVisibility { .. }),
        "lazy start must observe, got {directive:?}"
    );
    assert_eq!(c.phase(), LoadPhase::AwaitingVisibility);
    // The visibility callback never fires: no request may ever be issued.
    assert_eq!(c.generation(), 0, "no strategy recomputation before activation");
    assert_eq!(c.current_source(), None);
}

#[test]
fn conformance_visibility_signal_starts_loading_at_cursor_zero() {
    let mut c = controller(slow());
    let _ = c.start();
    match c.on_visible() {
        Directive::StartRequest { url, generation } => {
            assert!(url.contains("quality=60"), "slow row quality, got {url}");
            assert_eq!(generation, 1);
        }
        other => panic!("expected StartRequest, got {other:?}"),
    }
    assert_eq!(c.phase(), LoadPhase::Loading);
}

#[test]
fn conformance_eager_start_skips_visibility_gate() {
    let mut c = controller(fast());
    let generation = request_generation(c.start());
    assert_eq!(c.phase(), LoadPhase::Loading);
    assert_eq!(c.on_load_success(generation), Directive::None);
    assert_eq!(c.phase(), LoadPhase::Loaded);
}

#[test]
fn conformance_root_margin_wider_on_slow_connection() {
    let mut slow_ctl = controller(slow());
    let mut fast_ctl = MediaLoadController::new(
        MediaRequest::new("https://x/img.jpg").with_overrides(lumen_media_core::StrategyOverrides {
            lazy: Some(true),
            ..Default::default()
        }),
        ImageFormat::Jpeg,
        fast(),
    )
    .unwrap();

    let slow_margin = match slow_ctl.start() {
        Directive::ObserveVisibility { root_margin_px } => root_margin_px,
        other => panic!("expected ObserveVisibility, got {other:?}"),
    };
    let fast_margin = match fast_ctl.start() {
        Directive::ObserveVisibility { root_margin_px } => root_margin_px,
        other => panic!("expected ObserveVisibility, got {other:?}"),
    };
    assert_eq!(slow_margin, 100);
    assert_eq!(fast_margin, 50);
}

#[test]
fn conformance_dispose_during_awaiting_visibility_detaches() {
    let mut c = controller(slow());
    let _ = c.start();
    assert_eq!(c.dispose(), Directive::DetachObservers);
    assert_eq!(c.phase(), LoadPhase::Disposed);
    // An already-queued visibility callback fires afterwards: no-op.
    assert_eq!(c.on_visible(), Directive::None);
    assert_eq!(c.phase(), LoadPhase::Disposed);
}

#[test]
fn conformance_dispose_from_every_phase_is_terminal() {
    // Idle.
    let mut c = controller(fast());
    assert_eq!(c.dispose(), Directive::DetachObservers);
    assert_eq!(c.start(), Directive::None);

    // Loading.
    let mut c = controller(fast());
    let generation = request_generation(c.start());
    let _ = c.dispose();
    assert_eq!(c.on_load_failure(generation), Directive::None);
    assert_eq!(c.phase(), LoadPhase::Disposed);

    // Loaded.
    let mut c = controller(fast());
    let generation = request_generation(c.start());
    let _ = c.on_load_success(generation);
    assert_eq!(c.dispose(), Directive::DetachObservers);
    assert_eq!(c.on_connection_change(slow()), Directive::None);
}

#[test]
fn conformance_loaded_is_terminal_for_load_events() {
    let mut c = controller(fast());
    let generation = request_generation(c.start());
    let _ = c.on_load_success(generation);
    // Duplicate/late events for the same generation change nothing.
    assert_eq!(c.on_load_success(generation), Directive::None);
    assert_eq!(c.on_load_failure(generation), Directive::None);
    assert_eq!(c.phase(), LoadPhase::Loaded);
}
