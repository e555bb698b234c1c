use super::*;

#[test]
fn default_timeline_is_valid_and_ten_seconds_long() {
    validate_timeline(&INTRO_TIMELINE).unwrap();
    assert_eq!(total_duration(&INTRO_TIMELINE), 10_000.0);
    assert_eq!(total_duration(&[]), 0.0);
}

#[test]
fn current_phase_picks_the_latest_started_entry() {
    assert_eq!(current_phase(0.0, &INTRO_TIMELINE), IntroPhase::InkRain);
    assert_eq!(current_phase(499.0, &INTRO_TIMELINE), IntroPhase::InkRain);
    assert_eq!(current_phase(500.0, &INTRO_TIMELINE), IntroPhase::CameraRise);
    assert_eq!(
        current_phase(4000.0, &INTRO_TIMELINE),
        IntroPhase::SilhouetteSmoke
    );
    assert_eq!(current_phase(5300.0, &INTRO_TIMELINE), IntroPhase::SmokeExhale);
    assert_eq!(current_phase(7999.0, &INTRO_TIMELINE), IntroPhase::SmokeZoom);
    let total = total_duration(&INTRO_TIMELINE);
    assert_eq!(current_phase(total, &INTRO_TIMELINE), IntroPhase::Transition);
    assert_eq!(current_phase(-5.0, &INTRO_TIMELINE), IntroPhase::InkRain);
}

#[test]
fn phase_progress_is_windowed() {
    assert_eq!(phase_progress(6500.0, &INTRO_TIMELINE, IntroPhase::SmokeZoom), 0.0);
    assert_eq!(phase_progress(7250.0, &INTRO_TIMELINE, IntroPhase::SmokeZoom), 0.5);
    assert_eq!(phase_progress(9999.0, &INTRO_TIMELINE, IntroPhase::SmokeZoom), 1.0);
    assert_eq!(phase_progress(100.0, &[], IntroPhase::SmokeZoom), 0.0);
}

#[test]
fn camera_mapping_and_rain_activity() {
    assert_eq!(IntroPhase::InkRain.camera_phase(), CameraPhase::InkRain);
    assert_eq!(IntroPhase::SmokeZoom.camera_phase(), CameraPhase::SmokeZoom);
    assert_eq!(
        IntroPhase::SmokeDisperse.camera_phase(),
        CameraPhase::SilhouetteSmoke
    );
    assert!(IntroPhase::SmokeDisperse.rain_active());
    assert!(!IntroPhase::Transition.rain_active());
    assert!(!IntroPhase::Completed.rain_active());
}

#[test]
fn phases_serialize_kebab_case() {
    let json = serde_json::to_string(&INTRO_TIMELINE[2]).unwrap();
    assert_eq!(
        json,
        r#"{"phase":"silhouette-smoke","startTime":4000.0,"duration":1500.0}"#
    );
    assert_eq!(IntroPhase::SmokeDisperse.to_string(), "smoke-disperse");
}

#[test]
fn invalid_timelines_are_rejected() {
    assert!(validate_timeline(&[]).is_err());

    let zero = [PhaseConfig::new(IntroPhase::InkRain, 0.0, 0.0)];
    let err = validate_timeline(&zero).unwrap_err();
    assert!(err.to_string().contains("duration"), "{err}");

    let terminal = [PhaseConfig::new(IntroPhase::Completed, 0.0, 10.0)];
    assert!(validate_timeline(&terminal).is_err());

    let unordered = [
        PhaseConfig::new(IntroPhase::CameraRise, 500.0, 10.0),
        PhaseConfig::new(IntroPhase::InkRain, 0.0, 10.0),
    ];
    assert!(validate_timeline(&unordered).is_err());
}

#[test]
fn every_entry_takes_over_exactly_at_its_start() {
    for (i, entry) in INTRO_TIMELINE.iter().enumerate() {
        assert_eq!(current_phase(entry.start_time, &INTRO_TIMELINE), entry.phase);
        if i > 0 && entry.start_time > INTRO_TIMELINE[i - 1].start_time {
            assert_eq!(
                current_phase(entry.start_time - 0.5, &INTRO_TIMELINE),
                INTRO_TIMELINE[i - 1].phase
            );
        }
    }
    assert_eq!(current_phase(1_000.0, &[]), IntroPhase::InkRain);
}
