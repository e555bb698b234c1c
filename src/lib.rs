//! Animated theming, a simulated cinematic intro and a contact-mail relay for a
//! portfolio site.
//!
//! The animation side is headless: effects draw through the [`Surface`] trait, time
//! comes from a [`Clock`] or explicit timestamps, and device signals from
//! [`Capabilities`]. The relay is an axum router in [`relay`].

#![forbid(unsafe_code)]

pub mod animation;
pub mod color;
pub mod effects;
pub mod foundation;
pub mod intro;
pub mod perf;
pub mod relay;
pub mod theme;

pub use animation::ease::Ease;
pub use animation::lerp::Lerp;
pub use color::palette::{BlendModel, ThemeColors, ThemeProperty, default_palette};
pub use color::rgb::{Rgb8, Rgba, hex_to_rgb, interpolate_color, rgb_to_hex};
pub use effects::surface::{DrawCmd, DrawList, Surface};
pub use foundation::caps::{Capabilities, DeviceProfile};
pub use foundation::clock::{Clock, FrameScheduler, ManualClock, SystemClock};
pub use foundation::core::{Millis, Point, Vec2, Viewport};
pub use foundation::error::{InkfolioError, InkfolioResult};
pub use foundation::storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use intro::orchestrator::{CinematicIntro, IntroConfig, IntroFrame, IntroInput};
pub use intro::timeline::{INTRO_TIMELINE, IntroPhase};
pub use perf::monitor::{PerformanceConfig, PerformanceMonitor};
pub use theme::controller::{CycleConfig, ThemeCycleController};
