//! The once-per-session "intro already played" flag.

use crate::foundation::storage::{
    KeyValueStore, read_or_none, remove_quietly, write_quietly,
};

pub const SESSION_KEY: &str = "cinematic-intro-played";

/// Unreadable storage counts as "not played".
pub fn has_played(store: &dyn KeyValueStore) -> bool {
    read_or_none(store, SESSION_KEY).as_deref() == Some("true")
}

pub fn mark_played(store: &mut dyn KeyValueStore) {
    write_quietly(store, SESSION_KEY, "true");
}

pub fn clear_played(store: &mut dyn KeyValueStore) {
    remove_quietly(store, SESSION_KEY);
}
