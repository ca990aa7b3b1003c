//! Conformance: fallback progression and generation supersession.
//!
//! Two load-bearing guarantees: Failed only after the whole chain is
//! exhausted, and a superseded request's callbacks never influence
//! state.

use lumen_media_core::{
    ConnectionClassification, Directive, EffectiveType, ImageFormat, LoadPhase,
    MediaLoadController, MediaRequest,
};

fn fast() -> ConnectionClassification {
    ConnectionClassification::default()
}

fn slow() -> ConnectionClassification {
    ConnectionClassification {
        effective_type: EffectiveType::TwoG,
        ..Default::default()
    }
}

fn three_candidate_controller() -> MediaLoadController {
    MediaLoadController::new(
        MediaRequest::new("https://x/img.jpg").with_fallback("https://cdn/fallback.jpg"),
        ImageFormat::Jpeg,
        fast(),
    )
    .unwrap()
}

fn start_request(directive: Directive) -> (String, u64) {
    match directive {
        Directive::StartRequest { url, generation } => (url, generation),
        other => panic!("expected StartRequest, got {other:?}"),
    }
}

// ─── Fallback progression ──────────────────────────────────────────────

#[test]
fn conformance_failed_only_after_third_failure() {
    let mut c = three_candidate_controller();
    let (url, generation) = start_request(c.start());
    assert!(url.contains("quality="), "first candidate is the optimized URL");

    // First failure: advance to the raw source, same generation.
    let (url, gen2) = start_request(c.on_load_failure(generation));
    assert_eq!(url, "https://x/img.jpg");
    assert_eq!(gen2, generation, "fallback advance is not a strategy recomputation");
    assert_eq!(c.phase(), LoadPhase::Loading, "not Failed after first failure");

    // Second failure: advance to the explicit fallback.
    let (url, _) = start_request(c.on_load_failure(generation));
    assert_eq!(url, "https://cdn/fallback.jpg");
    assert_eq!(c.phase(), LoadPhase::Loading, "not Failed after second failure");

    // Third failure: chain exhausted, terminal.
    assert_eq!(c.on_load_failure(generation), Directive::None);
    assert_eq!(c.phase(), LoadPhase::Failed);
}

#[test]
fn conformance_success_mid_chain_stops_progression() {
    let mut c = three_candidate_controller();
    let (_, generation) = start_request(c.start());
    let _ = c.on_load_failure(generation);
    let _ = c.on_load_success(generation);
    assert_eq!(c.phase(), LoadPhase::Loaded);
    assert_eq!(c.current_source(), Some("https://x/img.jpg"));
}

// ─── Stale-callback suppression ────────────────────────────────────────

#[test]
fn conformance_superseded_success_is_ignored() {
    let mut c = three_candidate_controller();
    let (_, old_generation) = start_request(c.start());

    // Connection changes while the request is in flight: supersede.
    let (new_url, new_generation) = start_request(c.on_connection_change(slow()));
    assert!(new_generation > old_generation);
    assert!(new_url.contains("quality=60"), "new strategy for the slow network");

    // The superseded request now resolves successfully. Must be ignored.
    assert_eq!(c.on_load_success(old_generation), Directive::None);
    assert_eq!(c.phase(), LoadPhase::Loading, "stale success must not mark Loaded");

    // Only the newer request's outcome counts.
    let _ = c.on_load_success(new_generation);
    assert_eq!(c.phase(), LoadPhase::Loaded);
    assert_eq!(
        c.current_source(),
        Some("https://x/img.jpg?quality=60&format=jpeg&progressive=true")
    );
}

#[test]
fn conformance_superseded_failure_does_not_advance_new_chain() {
    let mut c = three_candidate_controller();
    let (_, old_generation) = start_request(c.start());
    let (_, new_generation) = start_request(c.on_connection_change(slow()));

    // Stale failure must not move the fresh chain's cursor.
    assert_eq!(c.on_load_failure(old_generation), Directive::None);
    let (url, _) = start_request(c.on_load_failure(new_generation));
    assert_eq!(
        url, "https://x/img.jpg",
        "first real failure advances to the second candidate, not the third"
    );
}

// ─── Connection-change re-strategizing ─────────────────────────────────

#[test]
fn conformance_loaded_instance_reloads_on_connection_change() {
    let mut c = three_candidate_controller();
    let (_, generation) = start_request(c.start());
    let _ = c.on_load_success(generation);
    assert_eq!(c.phase(), LoadPhase::Loaded);

    let (url, _) = start_request(c.on_connection_change(slow()));
    assert!(url.contains("quality=60"));
    assert_eq!(c.phase(), LoadPhase::Loading);
}

#[test]
fn conformance_failed_instance_retries_on_connection_change() {
    let mut c = MediaLoadController::new(
        MediaRequest::new("https://x/img.jpg"),
        ImageFormat::Jpeg,
        fast(),
    )
    .unwrap();
    let (_, generation) = start_request(c.start());
    let _ = c.on_load_failure(generation);
    let _ = c.on_load_failure(generation);
    assert_eq!(c.phase(), LoadPhase::Failed);

    // A fresh network is a fresh start: cursor back to zero.
    let (url, _) = start_request(c.on_connection_change(slow()));
    assert!(url.contains("quality=60"));
    assert_eq!(c.phase(), LoadPhase::Loading);
}

#[test]
fn conformance_awaiting_visibility_never_reloads_on_connection_change() {
    let mut c = MediaLoadController::new(
        MediaRequest::new("https://x/img.jpg"),
        ImageFormat::Jpeg,
        slow(),
    )
    .unwrap();
    let _ = c.start();
    assert_eq!(c.phase(), LoadPhase::AwaitingVisibility);

    assert_eq!(c.on_connection_change(fast()), Directive::None);
    assert_eq!(c.phase(), LoadPhase::AwaitingVisibility);

    // It picks up the stored classification when it finally activates.
    let (url, _) = start_request(c.on_visible());
    assert!(url.contains("quality=95"), "activation uses the current network, got {url}");
}

#[test]
fn conformance_idle_instance_ignores_connection_change() {
    let mut c = three_candidate_controller();
    assert_eq!(c.on_connection_change(slow()), Directive::None);
    assert_eq!(c.phase(), LoadPhase::Idle);
}
