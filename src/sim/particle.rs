//! Particle and emitter components

use std::sync::Arc;

use glam::Vec2;

use super::curve::Curve;
use super::field::Field;
use crate::config::{EmitterConfig, RangeF32};
use crate::ecs::Entity;

/// World position, owned exclusively by the entity that carries it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Ground-plane collision parameters for a particle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundBounce {
    /// Screen-space Y of the ground line; 0 disables collision.
    pub ground_y: f32,
    /// Fraction of tangential (X) velocity kept on a bounce.
    pub reflect_x: f32,
    /// Fraction of normal (Y) velocity kept, sign-flipped, on a bounce.
    pub reflect_y: f32,
    /// Overrides both static coefficients when present; evaluated at the
    /// particle's normalized age.
    pub reflect_curve: Option<Curve>,
    /// Uniform random rotation-speed impulse applied on a resolved bounce.
    pub spin_impulse: Option<RangeF32>,
    /// Scales the spin impulse; evaluated at the particle's normalized age.
    pub spin_curve: Option<Curve>,
}

/// A simulated particle. Its [`Position`] lives in a separate component;
/// everything else is here.
#[derive(Debug, Clone)]
pub struct Particle {
    pub vel: Vec2,
    /// Seconds since spawn
    pub age: f32,
    /// Seconds of life; the particle is destroyed once `age >= lifetime`
    pub lifetime: f32,
    /// Degrees
    pub rotation: f32,
    /// Degrees per second
    pub spin: f32,
    pub scale: f32,
    /// RGBA, each 1.0 unless the config says otherwise
    pub color: [f32; 4],
    pub brightness: f32,
    /// Additive blending hint for the renderer
    pub additive: bool,
    pub fields: Vec<Field>,
    pub alpha_curve: Option<Curve>,
    pub scale_curve: Option<Curve>,
    pub spin_curve: Option<Curve>,
    /// Keyed to the owning emitter's age/duration, not particle age
    pub system_alpha_curve: Option<Curve>,
    pub bounce: Option<GroundBounce>,
    /// Owning emitter, for bookkeeping and system-alpha lookups. A weak
    /// back-reference; the store owns the particle.
    pub owner: Option<Entity>,
}

impl Particle {
    /// A bare particle with identity appearance and the given lifetime.
    pub fn new(lifetime: f32) -> Self {
        Self {
            vel: Vec2::ZERO,
            age: 0.0,
            lifetime,
            rotation: 0.0,
            spin: 0.0,
            scale: 1.0,
            color: [1.0; 4],
            brightness: 1.0,
            additive: false,
            fields: Vec::new(),
            alpha_curve: None,
            scale_curve: None,
            spin_curve: None,
            system_alpha_curve: None,
            bounce: None,
            owner: None,
        }
    }

    /// Normalized age in [0, 1]; a non-positive lifetime counts as fully
    /// aged.
    pub fn age_ratio(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.age / self.lifetime).min(1.0)
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }
}

/// A particle emitter. The spawn policy lives in the shared config; this
/// component holds the mutable scheduling state.
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    /// `None` means no spawn capability. The emitter still ages and
    /// auto-destroys normally.
    pub config: Option<Arc<EmitterConfig>>,
    /// Cleared once age reaches the system duration. Inactive emitters stop
    /// spawning but keep bookkeeping until their particles drain.
    pub active: bool,
    /// Seconds since creation
    pub age: f32,
    /// Seconds of emission; 0 = forever
    pub duration: f32,
    /// Continuous-mode schedule: the age at which the next spawn is due
    pub next_spawn: f32,
    /// Back-references to this emitter's live particles, re-filtered against
    /// the store every tick
    pub particles: Vec<Entity>,
    /// Total particles ever launched; monotonic
    pub launched: u32,
    /// Set after the first tick, so rate-0 (burst) emitters fire exactly once
    pub started: bool,
}

impl Emitter {
    pub fn from_config(config: Arc<EmitterConfig>) -> Self {
        let duration = config.system_duration;
        Self {
            config: Some(config),
            active: true,
            duration,
            ..Default::default()
        }
    }

    /// An emitter with no configuration: spawns nothing, ages normally.
    pub fn inert() -> Self {
        Self {
            active: true,
            ..Default::default()
        }
    }

    /// Stop emission. Live particles finish naturally, after which the
    /// simulation removes the entity.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}
