//! Deterministic particle simulation module
//!
//! All particle gameplay logic lives here. This module must be pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (via `GameContext`)
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod curve;
pub mod field;
pub mod particle;
pub mod system;

pub use collision::{BounceOutcome, resolve_ground_contact};
pub use curve::{Curve, CurveMode, Keyframe};
pub use field::{FIELD_UNIT_SCALE, Field, FieldKind};
pub use particle::{Emitter, GroundBounce, Particle, Position};
pub use system::{DrawTransform, draw_transform, update};
