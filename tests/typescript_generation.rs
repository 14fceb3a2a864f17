//! TypeScript Generation Tests
//!
//! Validates that decoded telemetry types can be exported to TypeScript
//! when the tauri feature is enabled.

#[cfg(feature = "tauri")]
#[test]
fn test_core_types_implement_specta_type() {
    use specta::Type;

    // If this compiles, all types are properly configured for TypeScript export.
    fn assert_type<T: Type>() {}

    assert_type::<poppet::TelemetryHeader>();
    assert_type::<poppet::TelemetryEvent>();
    assert_type::<poppet::UserExperienceMetrics>();
    assert_type::<poppet::EventTag>();
    assert_type::<poppet::PositionKind>();
    assert_type::<poppet::DecodeOutcome>();
    assert_type::<poppet::IngestVerdict>();
}

#[cfg(not(feature = "tauri"))]
#[test]
fn test_tauri_feature_disabled() {
    // Types still compile without specta::Type
    let _ = poppet::DecodeOutcome::Success;
}
