use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;
use crate::effects::camera::camera_y_to_shift_pct;
use crate::effects::surface::DrawList;
use crate::foundation::caps::DeviceProfile;
use crate::foundation::clock::FrameScheduler;
use crate::foundation::storage::MemoryStore;

const FRAME_MS: Millis = 16.0;

fn viewport() -> Viewport {
    Viewport::new(800.0, 600.0).unwrap()
}

fn intro_on(device: &DeviceProfile, store: MemoryStore) -> CinematicIntro {
    CinematicIntro::new(IntroConfig::default(), viewport(), device, Box::new(store)).unwrap()
}

fn desktop_intro() -> CinematicIntro {
    intro_on(&DeviceProfile::desktop(), MemoryStore::new())
}

fn counter(intro: &mut CinematicIntro) -> Rc<Cell<u32>> {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    intro.on_complete(move || seen.set(seen.get() + 1));
    calls
}

/// Tick every frame from `from` while `now < until`; returns every frame produced.
fn run(intro: &mut CinematicIntro, from: Millis, until: Millis) -> Vec<IntroFrame> {
    let mut frames = Vec::new();
    let mut now = from;
    while now < until {
        frames.push(intro.tick(now));
        now += FRAME_MS;
    }
    frames
}

#[test]
fn natural_playthrough_visits_every_phase_in_order() {
    let mut intro = desktop_intro();
    let calls = counter(&mut intro);
    assert!(intro.mount(0.0));

    let frames = run(&mut intro, 0.0, 10_100.0);
    let mut phases: Vec<IntroPhase> = Vec::new();
    for f in &frames {
        if phases.last() != Some(&f.phase) {
            phases.push(f.phase);
        }
    }
    assert_eq!(
        phases,
        vec![
            IntroPhase::InkRain,
            IntroPhase::CameraRise,
            IntroPhase::SilhouetteSmoke,
            IntroPhase::SmokeInhale,
            IntroPhase::SmokeExhale,
            IntroPhase::SmokeZoom,
            IntroPhase::SmokeDisperse,
            IntroPhase::Transition,
            IntroPhase::Completed,
        ]
    );

    let done = frames.iter().position(|f| f.completed).unwrap();
    assert_eq!(frames[done].elapsed_ms, 10_000.0);
    assert_eq!(calls.get(), 1);
    assert!(session::has_played(intro.store()));
    assert_eq!(intro.overlay_opacity(10_100.0), 0.0);
}

#[test]
fn camera_rises_and_the_figure_appears_on_schedule() {
    let mut intro = desktop_intro();
    intro.mount(0.0);
    let frames = run(&mut intro, 0.0, 4_800.0);

    let at = |t: Millis| frames.iter().find(|f| f.elapsed_ms >= t).unwrap();
    assert_eq!(at(0.0).camera_y, 0.0);
    assert_eq!(at(496.0).camera_y, 0.0);
    let mid = at(2_500.0).camera_y;
    assert!((45.0..=55.0).contains(&mid), "{mid}");
    let camera = at(2_500.0).camera;
    assert!((camera.translate_y_pct - camera_y_to_shift_pct(mid)).abs() < 1.0, "{camera:?}");
    assert!(camera.scale > 1.05 && camera.scale < 1.15, "{camera:?}");
    assert!(camera.blur_px > 0.5 && camera.blur_px < 1.5, "{camera:?}");
    assert_eq!(at(4_512.0).camera_y, 100.0);
    assert!(at(4_512.0).camera.translate_y_pct.abs() < 1e-9);

    assert!(!at(3_984.0).silhouette_visible);
    assert!(at(4_000.0).silhouette_visible);
    assert!((intro.rain().camera_offset() - 180.0).abs() < 1e-9);
}

#[test]
fn cigarette_glow_follows_the_smoking_cycle() {
    let mut intro = desktop_intro();
    intro.mount(0.0);
    let frames = run(&mut intro, 0.0, 7_200.0);

    for f in frames.iter().filter(|f| f.elapsed_ms < 4_500.0) {
        assert_eq!(f.cigarette_glow, IDLE_GLOW);
        assert_eq!(f.smoking_phase, SmokingPhase::Idle);
    }
    let peak = frames
        .iter()
        .map(|f| f.cigarette_glow)
        .fold(0.0, f64::max);
    assert_eq!(peak, 1.0);

    let inhale = frames.iter().find(|f| f.phase == IntroPhase::SmokeInhale).unwrap();
    assert_eq!(inhale.smoking_phase, SmokingPhase::Inhale);
    let exhale = frames.iter().find(|f| f.phase == IntroPhase::SmokeExhale).unwrap();
    assert_eq!(exhale.smoking_phase, SmokingPhase::Exhale);
    assert_eq!(exhale.smoke_phase, SmokePhase::Exhale);
    assert_eq!(frames.last().unwrap().cigarette_glow, IDLE_GLOW);
}

#[test]
fn focus_dips_through_zoom_and_recovers() {
    let mut intro = desktop_intro();
    intro.mount(0.0);
    let frames = run(&mut intro, 0.0, 9_600.0);
    let at = |t: Millis| frames.iter().find(|f| f.elapsed_ms >= t).unwrap();

    assert_eq!(at(6_000.0).focus, 1.0);
    assert!((at(7_248.0).focus - (1.0 - 748.0 / 1500.0 * 0.8)).abs() < 1e-9);
    assert_eq!(at(8_000.0).focus, 0.2);
    assert!((at(8_496.0).focus - (0.2 + 0.496 * 0.8)).abs() < 1e-9);
    assert!((at(9_504.0).focus - 0.504).abs() < 1e-9);

    assert_eq!(at(7_000.0).smoke_phase, SmokePhase::Zoom);
    assert!(at(7_000.0).smoke_particles > 0);
    assert_eq!(at(8_500.0).smoke_phase, SmokePhase::Disperse);
    assert!(!intro.rain().is_active());
}

#[test]
fn skip_fades_then_completes_once() {
    let mut intro = desktop_intro();
    let calls = counter(&mut intro);
    intro.mount(0.0);
    run(&mut intro, 0.0, 1_000.0);

    assert!(intro.skip(1_000.0));
    assert!(!intro.skip(1_050.0));
    let fading = intro.tick(1_100.0);
    assert!(fading.skipping);
    assert!(!fading.completed);
    assert!((fading.overlay_opacity - (1.0 - 100.0 / 300.0)).abs() < 1e-9);
    assert_eq!(calls.get(), 0);

    let done = intro.tick(1_300.0);
    assert!(done.completed);
    assert_eq!(done.phase, IntroPhase::Completed);
    assert_eq!(calls.get(), 1);
    assert!(session::has_played(intro.store()));

    assert!(!intro.skip(1_400.0));
    intro.tick(1_400.0);
    assert_eq!(calls.get(), 1);
}

#[test]
fn click_and_keypress_both_skip() {
    let mut intro = desktop_intro();
    intro.mount(0.0);
    intro.handle_input(IntroInput::KeyDown, 200.0);
    assert!(intro.is_skipping());

    let mut intro = desktop_intro();
    intro.mount(0.0);
    intro.handle_input(IntroInput::Click, 200.0);
    assert!(intro.is_skipping());
}

#[test]
fn revisit_completes_immediately() {
    let mut store = MemoryStore::new();
    session::mark_played(&mut store);

    let mut intro = intro_on(&DeviceProfile::desktop(), store.clone());
    let calls = counter(&mut intro);
    assert!(!intro.mount(0.0));
    assert!(intro.is_complete());
    assert_eq!(calls.get(), 1);
    assert_eq!(intro.tick(16.0).phase, IntroPhase::Completed);

    let config = IntroConfig {
        skip_on_revisit: false,
        ..IntroConfig::default()
    };
    let mut replay =
        CinematicIntro::new(config, viewport(), &DeviceProfile::desktop(), Box::new(store)).unwrap();
    assert!(replay.mount(0.0));
    assert!(!replay.is_complete());
}

#[test]
fn phone_budget_scales_rain_and_ignores_the_mouse() {
    let mut intro = intro_on(&DeviceProfile::phone(), MemoryStore::new());
    assert_eq!(intro.budget(), IntroBudget::MOBILE);
    assert_eq!(intro.rain().drops().len(), 100);
    assert!(!intro.rain().config().enable_reflection);

    intro.mount(0.0);
    let frame = intro.tick(0.0);
    assert!((frame.multiplier - 0.3).abs() < 1e-12);
    assert_eq!(frame.raindrops, 30);
    assert_eq!(intro.rain().drops().len(), 30);

    intro.handle_input(IntroInput::MouseMove(Point::new(10.0, 10.0)), 16.0);
    assert_eq!(intro.mouse, None);
}

#[test]
fn desktop_tracks_the_mouse() {
    let mut intro = desktop_intro();
    intro.mount(0.0);
    intro.handle_input(IntroInput::MouseMove(Point::new(320.0, 200.0)), 16.0);
    assert_eq!(intro.mouse, Some(Point::new(320.0, 200.0)));
}

#[test]
fn render_layers_follow_visibility() {
    let mut intro = desktop_intro();
    intro.mount(0.0);
    run(&mut intro, 0.0, 200.0);

    let mut rain = DrawList::new(viewport());
    let mut figure = DrawList::new(viewport());
    let mut smoke = DrawList::new(viewport());
    intro.render(
        IntroSurfaces {
            rain: Some(&mut rain),
            figure: Some(&mut figure),
            smoke: Some(&mut smoke),
        },
        200.0,
    );
    assert!(!rain.is_empty());
    assert!(figure.is_empty());
    assert!(smoke.is_empty());

    intro.render(IntroSurfaces::default(), 200.0);

    intro.skip(200.0);
    intro.tick(600.0);
    let mut after = DrawList::new(viewport());
    intro.render(
        IntroSurfaces {
            rain: Some(&mut after),
            ..IntroSurfaces::default()
        },
        600.0,
    );
    assert!(after.is_empty());
}

#[test]
fn scheduler_drive_cancels_itself_on_completion() {
    let intro = Rc::new(RefCell::new(desktop_intro()));
    intro.borrow_mut().mount(0.0);
    let mut scheduler = FrameScheduler::new();
    CinematicIntro::drive(Rc::clone(&intro), &mut scheduler);
    assert_eq!(scheduler.active(), 1);

    let mut now = 0.0;
    while scheduler.active() > 0 && now < 20_000.0 {
        scheduler.tick(now);
        now += FRAME_MS;
    }
    assert_eq!(scheduler.active(), 0);
    assert!(intro.borrow().is_complete());
}

#[test]
fn invalid_timeline_is_rejected() {
    let config = IntroConfig {
        timeline: Vec::new(),
        ..IntroConfig::default()
    };
    let err = CinematicIntro::new(
        config,
        viewport(),
        &DeviceProfile::desktop(),
        Box::new(MemoryStore::new()),
    )
    .unwrap_err();
    assert!(err.to_string().contains("timeline"), "{err}");
}

#[test]
fn frames_serialize_for_tooling() {
    let mut intro = desktop_intro();
    intro.mount(0.0);
    let frame = intro.tick(0.0);
    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["phase"], "ink-rain");
    assert_eq!(json["smokePhase"], "idle");
    assert_eq!(json["raindrops"], 300);
}

#[test]
fn resize_rebuilds_the_rain_for_the_new_viewport() {
    let mut intro = desktop_intro();
    intro.mount(0.0);
    run(&mut intro, 0.0, 200.0);
    let drops = intro.rain().drops().len();

    intro.resize(Viewport::new(400.0, 300.0).unwrap());
    let ground = intro.rain().ground_y();
    assert!((ground - 300.0 * intro.rain().config().ground_level_pct / 100.0).abs() < 1e-9);
    assert_eq!(intro.rain().drops().len(), drops);
    for drop in intro.rain().drops() {
        assert!((0.0..=400.0).contains(&drop.x), "{drop:?}");
        assert!(drop.y <= ground, "{drop:?}");
    }
    assert!(intro.smoke().particles().is_empty());
}

#[test]
fn slow_frames_shrink_the_smoke_cap_with_the_rain() {
    let mut intro = desktop_intro();
    intro.mount(0.0);
    // Ten frames a second stays under the 30 fps floor.
    let mut now = 0.0;
    while now <= 1_200.0 {
        intro.tick(now);
        now += 100.0;
    }
    let frame = intro.tick(now);
    assert!(frame.multiplier < 1.0, "{}", frame.multiplier);
    let budget = intro.budget();
    let expected = (f64::from(budget.max_smoke_particles) * frame.multiplier).round() as usize;
    assert_eq!(intro.smoke().particles().cap(), expected);
    assert!(intro.smoke().particles().cap() < budget.max_smoke_particles as usize);
    assert_eq!(
        frame.raindrops,
        (f64::from(budget.max_raindrops) * frame.multiplier).round() as u32
    );
}
