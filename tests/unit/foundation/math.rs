use super::*;

#[test]
fn derived_seeds_are_stable_and_label_sensitive() {
    assert_eq!(derive_seed(7, "rain"), derive_seed(7, "rain"));
    assert_ne!(derive_seed(7, "rain"), derive_seed(7, "smoke"));
    assert_ne!(derive_seed(7, "rain"), derive_seed(8, "rain"));
}

#[test]
fn window_progress_clamps_both_ends() {
    assert_eq!(window_progress(6000.0, 6500.0, 1500.0), 0.0);
    assert_eq!(window_progress(7250.0, 6500.0, 1500.0), 0.5);
    assert_eq!(window_progress(9000.0, 6500.0, 1500.0), 1.0);
    assert_eq!(window_progress(10.0, 10.0, 0.0), 1.0);
}
