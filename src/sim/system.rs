//! Particle simulation system
//!
//! One [`update`] call per frame drives the whole subsystem: emitters decide
//! what to spawn, existing particles integrate, expired entities are marked
//! for the caller's sweep. Single-threaded and pull-based. A particle
//! spawned during a tick is first integrated on the following tick; the
//! particle set is snapshotted before the emitter pass.

use glam::Vec2;
use rand::Rng;

use super::collision::resolve_ground_contact;
use super::particle::{Emitter, Particle, Position};
use crate::config::{EmitterConfig, EmitterShape};
use crate::context::GameContext;
use crate::ecs::{Entity, World};
use crate::polar_to_cartesian;

/// Advance the particle subsystem by `dt` seconds.
///
/// Never fails: malformed entities are skipped for the tick, degraded
/// configs spawn degraded effects. Destruction is deferred to the caller's
/// [`World::sweep`] cadence.
pub fn update(world: &mut World, ctx: &mut GameContext, dt: f32) {
    let existing = world.entities_with::<Particle>();

    update_emitters(world, ctx, dt);
    integrate_particles(world, ctx, &existing, dt);

    ctx.time_ticks += 1;
}

fn update_emitters(world: &mut World, ctx: &mut GameContext, dt: f32) {
    for entity in world.entities_with::<Emitter>() {
        // Take the emitter out of the store so spawning can borrow the
        // world freely.
        let Some(mut em) = world.detach::<Emitter>(entity) else {
            continue;
        };

        // Drop references the store no longer considers live. Runs on
        // inactive emitters too, so a drained emitter can auto-destroy.
        em.particles.retain(|&p| world.is_alive(p));

        em.age += dt;

        if em.active {
            if let Some(config) = em.config.clone() {
                run_spawns(world, ctx, entity, &mut em, &config);
            }
        }
        em.started = true;

        if em.duration > 0.0 && em.age >= em.duration {
            em.active = false;
        }

        let drained = !em.active && em.particles.is_empty();
        world.attach(entity, em);
        if drained {
            log::debug!("emitter {} drained, removing", entity.id());
            world.mark_for_removal(entity);
        }
    }
}

fn run_spawns(
    world: &mut World,
    ctx: &mut GameContext,
    entity: Entity,
    em: &mut Emitter,
    config: &EmitterConfig,
) {
    // The emitter's own position anchors every spawn; without one, skip
    // spawning this tick.
    let Some(origin) = world.get::<Position>(entity).map(|p| p.0) else {
        return;
    };

    if config.spawn_rate <= 0.0 {
        // Instant burst: the whole batch on the first tick, nothing after.
        if !em.started {
            for _ in 0..config.spawn_min_active {
                if launch_capped(em, config) || at_active_cap(em, config) {
                    break;
                }
                spawn_particle(world, ctx, entity, em, config, origin);
            }
        }
        return;
    }

    // Continuous: catch up on every spawn scheduled up to the current age,
    // so a large dt produces several spawns rather than dropping them. At
    // the active cap the schedule intentionally does not advance; spawning
    // resumes (and catches up) once particles expire.
    let interval = 1.0 / config.spawn_rate;
    while em.age >= em.next_spawn {
        if launch_capped(em, config) || at_active_cap(em, config) {
            break;
        }
        spawn_particle(world, ctx, entity, em, config, origin);
        em.next_spawn += interval;
    }
}

fn launch_capped(em: &Emitter, config: &EmitterConfig) -> bool {
    config.spawn_max_launched != 0 && em.launched >= config.spawn_max_launched
}

fn at_active_cap(em: &Emitter, config: &EmitterConfig) -> bool {
    config.spawn_max_active != 0 && em.particles.len() as u32 >= config.spawn_max_active
}

fn spawn_particle(
    world: &mut World,
    ctx: &mut GameContext,
    owner: Entity,
    em: &mut Emitter,
    config: &EmitterConfig,
    origin: Vec2,
) {
    let offset = match config.shape {
        EmitterShape::Point => Vec2::ZERO,
        EmitterShape::Circle { radius } => {
            let theta = ctx.rng.random_range(0.0..std::f32::consts::TAU);
            polar_to_cartesian(radius, theta)
        }
    };

    // An effect authored without a per-particle duration inherits the
    // system duration, so its particles never spawn with zero lifetime.
    let lifetime = config.particle_duration.unwrap_or(config.system_duration);

    let mut particle = Particle::new(lifetime);
    particle.vel = launch_velocity(ctx, config);
    particle.color = config.color;
    particle.brightness = config.brightness;
    particle.additive = config.additive;
    particle.fields = config.fields.clone();
    particle.alpha_curve = config.alpha_curve.clone();
    particle.scale_curve = config.scale_curve.clone();
    particle.spin_curve = config.spin_curve.clone();
    particle.system_alpha_curve = config.system_alpha_curve.clone();
    particle.bounce = config.bounce.clone();
    particle.owner = Some(owner);

    let id = world.spawn();
    world.attach(id, Position(origin + offset));
    world.attach(id, particle);

    em.particles.push(id);
    em.launched += 1;
}

fn launch_velocity(ctx: &mut GameContext, config: &EmitterConfig) -> Vec2 {
    let Some(speed) = config.launch_speed.as_ref().map(|r| r.sample(&mut ctx.rng)) else {
        return Vec2::ZERO;
    };
    let angle_deg = match &config.launch_angle {
        Some(range) => range.sample(&mut ctx.rng),
        // Speed with no authored direction sprays uniformly.
        None => ctx.rng.random_range(0.0..360.0),
    };
    let rad = angle_deg.to_radians();
    // Screen-down Y: an authored 90 degrees launches straight up.
    Vec2::new(rad.cos() * speed, -rad.sin() * speed)
}

fn integrate_particles(world: &mut World, ctx: &mut GameContext, entities: &[Entity], dt: f32) {
    for &entity in entities {
        if !world.is_alive(entity) {
            continue;
        }

        // A particle without a position is malformed; skip it this tick
        // rather than aborting the pass.
        let Some(mut pos) = world.get::<Position>(entity).map(|p| p.0) else {
            continue;
        };

        // Owner state feeding the system-alpha track, read before the
        // mutable particle borrow.
        let owner_age_dur = world
            .get::<Particle>(entity)
            .and_then(|p| p.owner)
            .and_then(|o| world.get::<Emitter>(o))
            .map(|em| (em.age, em.duration));

        let expired = {
            let Some(particle) = world.get_mut::<Particle>(entity) else {
                continue;
            };
            step_particle(particle, &mut pos, owner_age_dur, ctx, dt);
            particle.is_expired()
        };

        if let Some(p) = world.get_mut::<Position>(entity) {
            p.0 = pos;
        }
        if expired {
            world.mark_for_removal(entity);
        }
    }
}

/// One integration step, in the fixed order: fields, position, ground
/// collision, rotation, curve-driven attributes, lifecycle.
fn step_particle(
    p: &mut Particle,
    pos: &mut Vec2,
    owner_age_dur: Option<(f32, f32)>,
    ctx: &mut GameContext,
    dt: f32,
) {
    let mut vel = p.vel;
    let mut spin = p.spin;

    for field in &p.fields {
        field.apply(&mut vel, dt);
    }

    *pos += vel * dt;

    if let Some(bounce) = &p.bounce {
        if bounce.ground_y > 0.0 && vel.y > 0.0 && pos.y >= bounce.ground_y {
            pos.y = bounce.ground_y;
            resolve_ground_contact(bounce, &mut vel, &mut spin, p.age_ratio(), &mut ctx.rng);
        }
    }

    p.vel = vel;
    p.spin = spin;

    p.rotation += p.spin * dt;

    // Curves assign absolute attribute values at normalized age.
    let t = p.age_ratio();
    if let Some(v) = p.alpha_curve.as_ref().and_then(|c| c.evaluate(t)) {
        p.color[3] = v;
    }
    if let Some(v) = p.scale_curve.as_ref().and_then(|c| c.evaluate(t)) {
        p.scale = v;
    }
    if let Some(v) = p.spin_curve.as_ref().and_then(|c| c.evaluate(t)) {
        p.spin = v;
    }

    // The system track follows the emitter's life, not the particle's, and
    // takes over the alpha channel once the particle's own track is done.
    let system_alpha = p.system_alpha_curve.as_ref().and_then(|curve| {
        let (em_age, em_duration) = owner_age_dur?;
        if em_duration > 0.0 {
            curve.evaluate((em_age / em_duration).min(1.0))
        } else {
            None
        }
    });
    if let Some(v) = system_alpha {
        let own_track_done = p
            .alpha_curve
            .as_ref()
            .and_then(|c| c.last_key_time())
            .is_none_or(|last| t >= last);
        if own_track_done {
            p.color[3] = v;
        }
    }

    p.age += dt;
}

/// What a renderer needs to draw one particle, camera-relative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTransform {
    pub pos: Vec2,
    /// Degrees
    pub rotation: f32,
    pub scale: f32,
    /// RGBA with brightness premultiplied into the color channels
    pub color: [f32; 4],
    pub additive: bool,
}

/// Draw-time query for one particle entity. `None` when the entity is not a
/// live, drawable particle.
pub fn draw_transform(world: &World, ctx: &GameContext, entity: Entity) -> Option<DrawTransform> {
    if !world.is_alive(entity) {
        return None;
    }
    let pos = world.get::<Position>(entity)?.0;
    let p = world.get::<Particle>(entity)?;
    Some(DrawTransform {
        pos: pos - ctx.camera,
        rotation: p.rotation,
        scale: p.scale,
        color: [
            p.color[0] * p.brightness,
            p.color[1] * p.brightness,
            p.color[2] * p.brightness,
            p.color[3],
        ],
        additive: p.additive,
    })
}
