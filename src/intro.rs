//! The cinematic intro: a fixed phase timeline driving rain, camera, figure and
//! smoke, skippable by the viewer and played once per session.

pub mod orchestrator;
pub mod session;
pub mod timeline;
