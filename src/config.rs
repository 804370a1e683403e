//! Effect configuration
//!
//! Effects arrive in the authored form: every numeric field is a string,
//! exactly as the authoring tool wrote it, with keyframe tracks as float
//! lists. [`EmitterConfig::from_raw`] parses and unit-converts the whole
//! thing once, when a config is first attached, so the per-tick path never
//! touches strings. Anything unparsable falls back to a documented default
//! and logs a warning; a bad field renders as a reduced effect, never a
//! crash.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sim::{Curve, Field, FieldKind, GroundBounce, Keyframe, FIELD_UNIT_SCALE};

/// Emitter spawn shape.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EmitterShape {
    /// All particles spawn at the emitter position.
    #[default]
    Point,
    /// Particles spawn on the rim of a circle, at a uniformly random angle.
    Circle { radius: f32 },
}

/// A fixed value or an authored `[min max]` random range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeF32 {
    pub lo: f32,
    pub hi: f32,
}

impl RangeF32 {
    pub fn fixed(value: f32) -> Self {
        Self {
            lo: value,
            hi: value,
        }
    }

    /// Uniform sample. Degenerate or inverted ranges return `lo`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.hi - self.lo <= f32::EPSILON {
            self.lo
        } else {
            rng.random_range(self.lo..self.hi)
        }
    }
}

/// One force field in authored form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawField {
    pub field_type: String,
    pub x: String,
    pub y: String,
}

/// An effect definition in authored form. Empty string means "not authored".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawEffectConfig {
    pub emitter_type: String,
    pub emitter_radius: String,
    pub spawn_rate: String,
    pub spawn_min_active: String,
    pub spawn_max_active: String,
    pub spawn_max_launched: String,
    pub particle_duration: String,
    pub system_duration: String,
    pub launch_speed: String,
    pub launch_angle: String,
    pub particle_red: String,
    pub particle_green: String,
    pub particle_blue: String,
    pub particle_brightness: String,
    pub additive: String,
    pub ground_y: String,
    pub collision_reflect_x: String,
    pub collision_reflect_y: String,
    pub collision_spin: String,
    pub fields: Vec<RawField>,
    pub particle_alpha: Vec<Keyframe>,
    pub particle_scale: Vec<Keyframe>,
    pub particle_spin: Vec<Keyframe>,
    pub system_alpha: Vec<Keyframe>,
    pub collision_reflect: Vec<Keyframe>,
    pub collision_spin_decay: Vec<Keyframe>,
}

/// Parsed, unit-converted spawn policy and particle defaults. Built once by
/// [`EmitterConfig::from_raw`] and shared immutably by every emitter that
/// uses the effect.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterConfig {
    pub shape: EmitterShape,
    /// Particles per second; 0 selects one-shot burst mode
    pub spawn_rate: f32,
    /// Burst size for rate-0 emitters
    pub spawn_min_active: u32,
    /// Cap on simultaneously active particles; 0 = unlimited
    pub spawn_max_active: u32,
    /// Hard cap on total particles ever launched; 0 = unlimited
    pub spawn_max_launched: u32,
    /// `None` when not authored; spawns fall back to `system_duration`
    pub particle_duration: Option<f32>,
    /// Emission window in seconds; 0 = infinite
    pub system_duration: f32,
    pub launch_speed: Option<RangeF32>,
    /// Degrees, counter-clockwise, screen-down Y (90 = straight up)
    pub launch_angle: Option<RangeF32>,
    pub color: [f32; 4],
    pub brightness: f32,
    pub additive: bool,
    pub fields: Vec<Field>,
    pub alpha_curve: Option<Curve>,
    pub scale_curve: Option<Curve>,
    pub spin_curve: Option<Curve>,
    pub system_alpha_curve: Option<Curve>,
    pub bounce: Option<GroundBounce>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            shape: EmitterShape::Point,
            spawn_rate: 0.0,
            spawn_min_active: 0,
            spawn_max_active: 0,
            spawn_max_launched: 0,
            particle_duration: None,
            system_duration: 0.0,
            launch_speed: None,
            launch_angle: None,
            color: [1.0; 4],
            brightness: 1.0,
            additive: false,
            fields: Vec::new(),
            alpha_curve: None,
            scale_curve: None,
            spin_curve: None,
            system_alpha_curve: None,
            bounce: None,
        }
    }
}

impl EmitterConfig {
    /// One-time parse and normalization of an authored config.
    pub fn from_raw(raw: &RawEffectConfig) -> Self {
        let shape = match raw.emitter_type.trim() {
            "" | "Point" => EmitterShape::Point,
            "Circle" => EmitterShape::Circle {
                radius: parse_or(&raw.emitter_radius, 0.0, "EmitterRadius"),
            },
            other => {
                log::warn!("unknown EmitterType {other:?}, using Point");
                EmitterShape::Point
            }
        };

        let ground_y = parse_or(&raw.ground_y, 0.0, "GroundY");
        let bounce = (ground_y > 0.0).then(|| GroundBounce {
            ground_y,
            reflect_x: parse_or(&raw.collision_reflect_x, 0.0, "CollisionReflectX"),
            reflect_y: parse_or(&raw.collision_reflect_y, 0.0, "CollisionReflectY"),
            reflect_curve: curve_from(&raw.collision_reflect),
            spin_impulse: parse_range(&raw.collision_spin, "CollisionSpin"),
            spin_curve: curve_from(&raw.collision_spin_decay),
        });

        Self {
            shape,
            spawn_rate: parse_or(&raw.spawn_rate, 0.0, "SpawnRate"),
            spawn_min_active: parse_count(&raw.spawn_min_active, "SpawnMinActive"),
            spawn_max_active: parse_count(&raw.spawn_max_active, "SpawnMaxActive"),
            spawn_max_launched: parse_count(&raw.spawn_max_launched, "SpawnMaxLaunched"),
            particle_duration: parse_opt(&raw.particle_duration, "ParticleDuration"),
            system_duration: parse_or(&raw.system_duration, 0.0, "SystemDuration"),
            launch_speed: parse_range(&raw.launch_speed, "LaunchSpeed"),
            launch_angle: parse_range(&raw.launch_angle, "LaunchAngle"),
            color: [
                parse_or(&raw.particle_red, 1.0, "ParticleRed"),
                parse_or(&raw.particle_green, 1.0, "ParticleGreen"),
                parse_or(&raw.particle_blue, 1.0, "ParticleBlue"),
                1.0,
            ],
            brightness: parse_or(&raw.particle_brightness, 1.0, "ParticleBrightness"),
            additive: parse_or(&raw.additive, 0.0, "Additive") != 0.0,
            fields: raw.fields.iter().filter_map(field_from_raw).collect(),
            alpha_curve: curve_from(&raw.particle_alpha),
            scale_curve: curve_from(&raw.particle_scale),
            spin_curve: curve_from(&raw.particle_spin),
            system_alpha_curve: curve_from(&raw.system_alpha),
            bounce,
        }
    }
}

fn curve_from(keys: &[Keyframe]) -> Option<Curve> {
    (!keys.is_empty()).then(|| Curve::new(keys.to_vec()))
}

fn field_from_raw(raw: &RawField) -> Option<Field> {
    let kind = match raw.field_type.trim() {
        "Acceleration" => FieldKind::Acceleration,
        "Friction" => FieldKind::Friction,
        other => {
            if !other.is_empty() {
                log::warn!("unknown FieldType {other:?}, ignoring field");
            }
            return None;
        }
    };
    // Authored strengths are per-centisecond; convert once, here.
    Some(Field {
        kind,
        x: parse_or(&raw.x, 0.0, "Field.X") * FIELD_UNIT_SCALE,
        y: parse_or(&raw.y, 0.0, "Field.Y") * FIELD_UNIT_SCALE,
    })
}

/// Parse a float, falling back to `default` on absent or bad input.
fn parse_or(s: &str, default: f32, name: &str) -> f32 {
    let s = s.trim();
    if s.is_empty() {
        return default;
    }
    match s.parse() {
        Ok(v) => v,
        Err(_) => {
            log::warn!("unparsable {name} {s:?}, using {default}");
            default
        }
    }
}

/// Parse a float where "absent" is meaningful (no fallback value exists).
fn parse_opt(s: &str, name: &str) -> Option<f32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    match s.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("unparsable {name} {s:?}, treating as absent");
            None
        }
    }
}

/// Parse a non-negative count.
fn parse_count(s: &str, name: &str) -> u32 {
    parse_or(s, 0.0, name).max(0.0) as u32
}

/// Parse `"v"` or `"[min max]"`. `None` when absent or unparsable.
fn parse_range(s: &str, name: &str) -> Option<RangeF32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        let parts: Vec<&str> = inner.split_whitespace().collect();
        if let [lo, hi] = parts[..] {
            if let (Ok(lo), Ok(hi)) = (lo.parse(), hi.parse()) {
                return Some(RangeF32 { lo, hi });
            }
        }
        log::warn!("unparsable {name} range {s:?}, treating as absent");
        return None;
    }
    parse_opt(s, name).map(RangeF32::fixed)
}
