//! Particle effects and staging for the cinematic intro.
//!
//! Each effect owns its state and a seeded RNG, advances once per frame through
//! `update`, and draws onto any [`surface::Surface`] through `render`.

pub mod camera;
pub mod ink_rain;
pub mod noise;
pub mod pool;
pub mod silhouette;
pub mod smoke;
pub mod surface;
