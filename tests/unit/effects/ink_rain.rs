use super::*;
use crate::effects::surface::{DrawCmd, DrawList};

fn rain(max_drops: u32) -> InkRain {
    let config = RainConfig {
        max_drops,
        ..RainConfig::default()
    };
    InkRain::new(config, Viewport::new(800.0, 600.0).unwrap(), 7)
}

#[test]
fn initial_drops_are_spread_above_the_ground() {
    let rain = rain(120);
    assert_eq!(rain.drops().len(), 120);
    assert_eq!(rain.ground_y(), 510.0);
    for d in rain.drops() {
        assert!((0.0..510.0).contains(&d.y));
        assert!((10.0..40.0).contains(&d.length));
        assert!((8.0..20.0).contains(&d.speed));
        assert!(d.angle.abs() <= 0.05);
    }
}

#[test]
fn landing_drop_splashes_and_is_replaced_in_the_same_update() {
    let mut rain = rain(1);
    rain.drops[0].y = rain.ground_y() - 1.0;
    rain.drops[0].speed = 10.0;
    rain.drops[0].x = 400.0;
    let before = rain.drops[0].clone();

    let landed = rain.update();
    assert_eq!(landed, 1);
    assert!((6..=10).contains(&rain.splashes().len()), "{}", rain.splashes().len());
    assert!((1..=3).contains(&rain.ripples().len()), "{}", rain.ripples().len());
    assert_eq!(rain.drops().len(), 1);
    assert_ne!(rain.drops()[0], before);
    // The replacement starts above the viewport.
    assert!(rain.drops()[0].y <= 0.0);

    for p in rain.splashes() {
        assert_eq!(p.max_life, 30);
        assert_eq!(p.life, 29);
    }
}

#[test]
fn splash_velocities_lean_backward() {
    let mut rng = StdRng::seed_from_u64(3);
    for p in spawn_splash(&mut rng, Point::new(10.0, 10.0)) {
        assert!(p.vel.x <= 1e-9);
        assert!((1.0..4.0).contains(&p.size));
    }
}

#[test]
fn ripples_are_concentric_and_fade() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..20 {
        let ripples = spawn_ripples(&mut rng, Point::ORIGIN);
        for (i, r) in ripples.iter().enumerate() {
            assert_eq!(r.radius, 2.0 + i as f64 * 3.0);
            assert!((r.opacity - (0.6 - i as f64 * 0.15)).abs() < 1e-12);
            assert!((30.0..40.0).contains(&r.max_radius));
        }
    }
}

#[test]
fn splashes_die_after_their_lifetime() {
    let mut rain = rain(1);
    rain.drops[0].y = rain.ground_y();
    rain.drops[0].speed = 1.0;
    rain.update();
    for _ in 0..40 {
        // Keep the replacement drop from landing again.
        rain.drops[0].y = -1000.0;
        rain.update();
    }
    assert!(rain.splashes().is_empty());
    assert!(rain.ripples().is_empty());
}

#[test]
fn pools_keep_only_the_newest_entries() {
    let mut rain = rain(200);
    for d in rain.drops.iter_mut() {
        d.y = 10_000.0;
    }
    rain.update();
    assert!(rain.splashes().len() <= 100);
    assert!(rain.ripples().len() <= 50);
    assert_eq!(rain.splashes().len(), 100);
}

#[test]
fn camera_offset_shifts_render_not_simulation() {
    let mut rain = rain(10);
    rain.set_camera_y(100.0);
    assert_eq!(rain.camera_offset(), 180.0);
    assert_eq!(rain.ground_y(), 510.0);
    rain.set_camera_y(500.0);
    assert_eq!(rain.camera_offset(), 180.0);
}

#[test]
fn render_records_ground_drops_and_reflections() {
    let rain = rain(5);
    let mut list = DrawList::new(Viewport::new(800.0, 600.0).unwrap());
    rain.render(Some(&mut list), 0.0);

    assert_eq!(list.commands()[0], DrawCmd::Clear);
    assert_eq!(list.count(|c| matches!(c, DrawCmd::Band { .. })), 1);
    assert_eq!(list.count(|c| matches!(c, DrawCmd::Line { .. })), 10);
}

#[test]
fn ground_band_leaves_the_view_when_camera_is_high_and_reflection_can_be_off() {
    let mut rain = rain(5);
    rain.set_camera_y(100.0);
    rain.set_reflection(false);
    let mut list = DrawList::new(Viewport::new(800.0, 600.0).unwrap());
    rain.render(Some(&mut list), 0.0);
    assert_eq!(list.count(|c| matches!(c, DrawCmd::Band { .. })), 0);
    assert_eq!(list.count(|c| matches!(c, DrawCmd::Line { .. })), 5);
}

#[test]
fn missing_surface_is_a_silent_no_op() {
    let rain = rain(5);
    rain.render(None, 0.0);
}

#[test]
fn raindrop_palette_is_grayscale() {
    assert!(verify_grayscale_colors());
    assert!(is_grayscale("#404040", 10));
    assert!(!is_grayscale("#ff6b35", 10));
    assert!(!is_grayscale("404040", 10));
}

#[test]
fn changing_the_budget_rebuilds_the_drops() {
    let mut rain = rain(300);
    rain.set_max_drops(90);
    assert_eq!(rain.drops().len(), 90);
}
