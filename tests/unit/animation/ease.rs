use super::*;

const ALL: [Ease; 4] = [Ease::Linear, Ease::OutQuad, Ease::InOutCubic, Ease::CINEMATIC];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert!((ease.apply(0.0) - 0.0).abs() < 1e-6, "{ease:?}");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-6, "{ease:?}");
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease:?}");
        assert!(b < c, "{ease:?}");
    }
}

#[test]
fn in_out_cubic_is_symmetric_around_midpoint() {
    assert_eq!(ease_in_out_cubic(0.5), 0.5);
    for t in [0.1, 0.2, 0.3, 0.4] {
        let lhs = ease_in_out_cubic(t);
        let rhs = 1.0 - ease_in_out_cubic(1.0 - t);
        assert!((lhs - rhs).abs() < 1e-12);
    }
}

#[test]
fn linear_bezier_matches_identity() {
    let ease = Ease::CubicBezier {
        x1: 0.0,
        y1: 0.0,
        x2: 1.0,
        y2: 1.0,
    };
    for t in [0.1, 0.33, 0.5, 0.9] {
        assert!((ease.apply(t) - t).abs() < 1e-5);
    }
}

#[test]
fn out_of_range_input_is_clamped() {
    assert_eq!(Ease::Linear.apply(-3.0), 0.0);
    assert_eq!(Ease::InOutCubic.apply(7.0), 1.0);
}
