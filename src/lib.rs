//! Garden Siege - a lawn-defense game
//!
//! Core modules:
//! - `sim`: Deterministic particle simulation (emitters, fields, curves, collision)
//! - `ecs`: Minimal entity-component store
//! - `config`: Effect configuration (raw authored form + one-time normalization)
//! - `effects`: Named effect library / factory
//! - `context`: Per-tick shared context (seeded RNG, camera)

pub mod config;
pub mod context;
pub mod ecs;
pub mod effects;
pub mod sim;

pub use context::GameContext;
pub use ecs::{Entity, World};
pub use effects::{EffectError, EffectLibrary};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
