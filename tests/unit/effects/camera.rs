use super::*;

fn close(a: CameraState, b: CameraState) -> bool {
    (a.y - b.y).abs() < 1e-9 && (a.scale - b.scale).abs() < 1e-9 && (a.blur - b.blur).abs() < 1e-9
}

#[test]
fn interpolation_runs_ground_to_eye_level() {
    assert!(close(interpolate_camera_state(0.0), CameraState::GROUND));
    assert!(close(interpolate_camera_state(1.0), CameraState::EYE_LEVEL));
    assert!(close(interpolate_camera_state(-3.0), CameraState::GROUND));
    assert!(close(interpolate_camera_state(7.0), CameraState::EYE_LEVEL));

    let mid = interpolate_camera_state(0.5);
    assert!((mid.y - 50.0).abs() < 1e-9);
    assert!((mid.scale - 1.1).abs() < 1e-9);
    assert!((mid.blur - 1.0).abs() < 1e-9);
}

#[test]
fn early_rise_is_slow() {
    // In-out cubic: a quarter of the way in covers 6.25% of the height.
    assert!((interpolate_camera_state(0.25).y - 6.25).abs() < 1e-9);
}

#[test]
fn shift_maps_height_to_percent() {
    assert_eq!(camera_y_to_shift_pct(0.0), 30.0);
    assert_eq!(camera_y_to_shift_pct(50.0), 15.0);
    assert_eq!(camera_y_to_shift_pct(100.0), 0.0);
}

#[test]
fn rig_rises_and_reports_completion_once() {
    let mut rig = CameraRig::new(4000.0);
    rig.set_phase(CameraPhase::InkRain, 0.0);
    assert_eq!(rig.tick(0.0), None);
    assert!(close(rig.state(), CameraState::GROUND));

    rig.set_phase(CameraPhase::CameraRise, 500.0);
    let mut events = Vec::new();
    let mut t = 500.0;
    while t <= 5000.0 {
        if let Some(e) = rig.tick(t) {
            events.push((t, e));
        }
        t += 16.0;
    }
    assert_eq!(events.len(), 1);
    assert!(events[0].0 >= 4500.0);
    assert!(close(rig.target(), CameraState::EYE_LEVEL));

    rig.tick(5200.0);
    assert!(close(rig.state(), CameraState::EYE_LEVEL));
    assert!(rig.transform().translate_y_pct.abs() < 1e-9);
}

#[test]
fn zoom_hops_to_the_zoom_keyframe_within_100ms() {
    let mut rig = CameraRig::new(4000.0);
    rig.set_phase(CameraPhase::CameraRise, 0.0);
    rig.tick(4000.0);
    rig.tick(4200.0);
    rig.set_phase(CameraPhase::SilhouetteSmoke, 4300.0);
    rig.tick(4300.0);
    assert!(close(rig.state(), CameraState::EYE_LEVEL));

    rig.set_phase(CameraPhase::SmokeZoom, 6500.0);
    rig.tick(6550.0);
    let mid = rig.state().scale;
    assert!(mid > 1.0 && mid < 2.0, "{mid}");
    rig.tick(6600.0);
    assert!((rig.state().scale - 2.0).abs() < 1e-9);
}

#[test]
fn rig_tracks_the_rise_every_frame() {
    let mut rig = CameraRig::new(4000.0);
    rig.set_phase(CameraPhase::CameraRise, 0.0);
    let mut t = 0.0;
    while t <= 2000.0 {
        rig.tick(t);
        assert!(close(rig.state(), interpolate_camera_state(t / 4000.0)), "t={t}");
        t += 16.0;
    }

    rig.tick(2500.0);
    let expected = interpolate_camera_state(2500.0 / 4000.0);
    assert!((rig.state().y - expected.y).abs() < 1e-9);
    assert!(rig.state().y > 70.0);
    assert!(rig.transform().translate_y_pct < 10.0);
    assert!(rig.transform().scale < 1.2);
}
