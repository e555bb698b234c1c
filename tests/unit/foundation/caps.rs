use super::*;

#[test]
fn desktop_profile_is_capable() {
    let p = DeviceProfile::desktop();
    assert!(!p.is_mobile());
    assert!(!p.is_low_performance());
    assert!(!p.prefers_static_theme());
}

#[test]
fn phone_profile_is_mobile_and_static() {
    let p = DeviceProfile::phone();
    assert!(p.is_mobile());
    assert!(p.is_low_performance());
    assert!(p.prefers_static_theme());
}

#[test]
fn empty_profile_uses_documented_fallbacks() {
    let p = DeviceProfile::default();
    assert!(!p.reduces_motion());
    assert!(!p.is_small_viewport());
    assert!(!p.is_mobile());
    // unknown core count is treated as two cores
    assert!(p.is_low_performance());
}

#[test]
fn low_memory_alone_marks_low_performance() {
    let p = DeviceProfile {
        device_memory_gb: Some(4.0),
        ..DeviceProfile::desktop()
    };
    assert!(p.is_low_performance());
    assert!(!p.is_mobile());
}

#[test]
fn any_single_motion_signal_prefers_static_theme() {
    let reduced = DeviceProfile {
        prefers_reduced_motion: Some(true),
        ..DeviceProfile::desktop()
    };
    let coarse = DeviceProfile {
        coarse_pointer: Some(true),
        ..DeviceProfile::desktop()
    };
    let narrow = DeviceProfile {
        viewport_width: Some(768.0),
        ..DeviceProfile::desktop()
    };
    assert!(reduced.prefers_static_theme());
    assert!(coarse.prefers_static_theme());
    assert!(narrow.prefers_static_theme());
}

#[test]
fn profile_deserializes_with_missing_fields() {
    let p: DeviceProfile = serde_json::from_str(r#"{ "viewport_width": 500 }"#).unwrap();
    assert_eq!(p.viewport_width, Some(500.0));
    assert!(p.is_small_viewport());
    assert_eq!(p.user_agent, None);
}
