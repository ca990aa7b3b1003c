//! Conformance: end-to-end scenarios.
//!
//! Fixed input → fixed strategy → fixed chain. These pin the exact
//! values the rest of the clinic front end depends on.

use lumen_media_core::{
    build_chain, decide, ConnectionClassification, ConnectionKind, EffectiveType, ImageFormat,
    LoadPhase, MediaLoadController, MediaRequest, PlaceholderKind, Quality, StrategyOverrides,
};

#[test]
fn scenario_2g_without_save_data() {
    let connection = ConnectionClassification {
        kind: ConnectionKind::Cellular,
        effective_type: EffectiveType::TwoG,
        downlink_mbps: None,
        save_data: false,
    };
    let s = decide(&connection, ImageFormat::Jpeg, &StrategyOverrides::default());
    assert_eq!(s.quality, Quality::Low);
    assert!(s.lazy);
    assert_eq!(s.placeholder, PlaceholderKind::Blur);
    assert!(s.progressive);
}

#[test]
fn scenario_4g_avif_full_pipeline() {
    let connection = ConnectionClassification {
        effective_type: EffectiveType::FourG,
        ..Default::default()
    };
    let s = decide(&connection, ImageFormat::Avif, &StrategyOverrides::default());
    assert_eq!(s.quality, Quality::High);
    assert!(!s.lazy);
    assert_eq!(s.placeholder, PlaceholderKind::Skeleton);
    assert!(!s.progressive);
    assert_eq!(s.preferred_format, ImageFormat::Avif);

    let chain = build_chain("https://x/img.jpg", &s, None).unwrap();
    assert_eq!(
        chain.current(),
        "https://x/img.jpg?quality=95&format=avif&progressive=false"
    );
}

#[test]
fn scenario_clinically_important_image_on_slow_network() {
    // The radiograph case: force full quality, inherit lazy/blur policy.
    let connection = ConnectionClassification {
        effective_type: EffectiveType::TwoG,
        ..Default::default()
    };
    let request = MediaRequest::new("https://pacs/bitewing-17.jpg").with_overrides(
        StrategyOverrides {
            quality: Some(Quality::High),
            ..Default::default()
        },
    );
    let mut c = MediaLoadController::new(request, ImageFormat::Webp, connection).unwrap();

    assert!(matches!(
        c.start(),
        lumen_media_core::Directive::ObserveVisibility { root_margin_px: 100 }
    ));
    match c.on_visible() {
        lumen_media_core::Directive::StartRequest { url, generation } => {
            assert_eq!(
                url,
                "https://pacs/bitewing-17.jpg?quality=95&format=webp&progressive=true"
            );
            let _ = c.on_load_success(generation);
        }
        other => panic!("expected StartRequest, got {other:?}"),
    }
    assert_eq!(c.phase(), LoadPhase::Loaded);
}

#[test]
fn scenario_facility_absent_defaults_behave_like_fast_wifi() {
    // No platform facility: classification stays at the documented
    // default, and the pipeline behaves like an eager 4g load.
    let connection = ConnectionClassification::default();
    let mut c = MediaLoadController::new(
        MediaRequest::new("https://x/smile.jpg"),
        ImageFormat::Jpeg,
        connection,
    )
    .unwrap();
    match c.start() {
        lumen_media_core::Directive::StartRequest { url, .. } => {
            assert_eq!(url, "https://x/smile.jpg?quality=95&format=jpeg&progressive=false");
        }
        other => panic!("expected StartRequest, got {other:?}"),
    }
}
