//! Velocity force fields
//!
//! Authored field strengths use the source data's fixed-point convention of
//! units per 1/100 second; normalization multiplies by [`FIELD_UNIT_SCALE`]
//! once so the simulation works in per-second units throughout.

use glam::Vec2;

/// Conversion from authored per-centisecond units to per-second units.
pub const FIELD_UNIT_SCALE: f32 = 100.0;

/// What a field does to particle velocity each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Constant acceleration (e.g. gravity): `vel += (x, y) * dt`.
    Acceleration,
    /// Linear drag, per axis: `vel.x *= 1 - x * dt`, `vel.y *= 1 - y * dt`.
    /// A coefficient of 1.0/s zeroes that axis over one second.
    Friction,
}

/// A velocity-modifying force, already converted to per-second units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub kind: FieldKind,
    pub x: f32,
    pub y: f32,
}

impl Field {
    /// Apply one tick of this field to a velocity.
    pub fn apply(&self, vel: &mut Vec2, dt: f32) {
        match self.kind {
            FieldKind::Acceleration => {
                vel.x += self.x * dt;
                vel.y += self.y * dt;
            }
            FieldKind::Friction => {
                vel.x *= 1.0 - self.x * dt;
                vel.y *= 1.0 - self.y * dt;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acceleration_accumulates_velocity() {
        let field = Field {
            kind: FieldKind::Acceleration,
            x: 0.0,
            y: 300.0,
        };
        let mut vel = Vec2::new(5.0, 0.0);
        field.apply(&mut vel, 0.1);
        assert_eq!(vel, Vec2::new(5.0, 30.0));
        field.apply(&mut vel, 0.1);
        assert_eq!(vel, Vec2::new(5.0, 60.0));
    }

    #[test]
    fn full_friction_zeroes_over_one_second() {
        let field = Field {
            kind: FieldKind::Friction,
            x: 1.0,
            y: 1.0,
        };
        let mut vel = Vec2::new(80.0, -40.0);
        field.apply(&mut vel, 1.0);
        assert_eq!(vel, Vec2::ZERO);
    }

    #[test]
    fn friction_axes_are_independent() {
        let field = Field {
            kind: FieldKind::Friction,
            x: 0.5,
            y: 0.0,
        };
        let mut vel = Vec2::new(100.0, 100.0);
        field.apply(&mut vel, 0.5);
        assert_eq!(vel, Vec2::new(75.0, 100.0));
    }
}
