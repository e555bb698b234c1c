use super::*;
use crate::foundation::caps::DeviceProfile;
use crate::foundation::storage::MemoryStore;
use crate::theme::sink::CssVariables;

#[test]
fn stored_value_wins_over_device_preference() {
    let mut store = MemoryStore::new();
    store.set(COLOR_MODE_KEY, "light").unwrap();
    let device = DeviceProfile::desktop();
    assert_eq!(ColorMode::resolve(&store, &device), ColorMode::Light);
}

#[test]
fn unknown_value_falls_back_to_device_signal() {
    let mut store = MemoryStore::new();
    store.set(COLOR_MODE_KEY, "sepia").unwrap();

    let mut device = DeviceProfile::desktop();
    assert_eq!(ColorMode::resolve(&store, &device), ColorMode::Dark);
    device.prefers_light_scheme = Some(true);
    assert_eq!(ColorMode::resolve(&store, &device), ColorMode::Light);
}

#[test]
fn toggle_persists_and_sets_root_attribute() {
    let mut store = MemoryStore::new();
    let mut css = CssVariables::new();

    let mode = ColorMode::Dark.toggle(&mut store, &mut css);
    assert_eq!(mode, ColorMode::Light);
    assert_eq!(store.get(COLOR_MODE_KEY).unwrap().as_deref(), Some("light"));
    assert_eq!(css.attribute(THEME_ATTRIBUTE), Some("light"));

    let mode = mode.toggle(&mut store, &mut css);
    assert_eq!(mode, ColorMode::Dark);
    assert_eq!(css.attribute(THEME_ATTRIBUTE), Some("dark"));
}
