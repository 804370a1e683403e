//! Garden Siege entry point (headless demo)
//!
//! Runs the particle core without a renderer: loads a couple of authored
//! effects, advances the fixed-timestep loop for a few simulated seconds,
//! and logs population stats so emitter lifecycles are visible.

use garden_siege::consts::{MAX_SUBSTEPS, SIM_DT};
use garden_siege::sim::{self, Emitter, Particle};
use garden_siege::{EffectLibrary, GameContext, World};
use glam::Vec2;

/// Demo effect definitions, in the authored (string-encoded) form.
const EFFECT_DEFS: &str = r#"{
    "MulchBurst": {
        "SpawnRate": "0",
        "SpawnMinActive": "24",
        "SystemDuration": "0.5",
        "ParticleDuration": "0.9",
        "EmitterType": "Circle",
        "EmitterRadius": "6",
        "LaunchSpeed": "[90 160]",
        "LaunchAngle": "[30 150]",
        "ParticleRed": "0.55",
        "ParticleGreen": "0.35",
        "ParticleBlue": "0.2",
        "GroundY": "390",
        "CollisionReflectX": "0.6",
        "CollisionReflect": [
            {"time": 0.0, "value": 0.35},
            {"time": 0.6, "value": 0.0}
        ],
        "CollisionSpin": "[-240 240]",
        "Fields": [
            {"FieldType": "Acceleration", "X": "0", "Y": "2.8"}
        ],
        "ParticleAlpha": [
            {"time": 0.0, "value": 1.0},
            {"time": 0.7, "value": 1.0},
            {"time": 1.0, "value": 0.0}
        ]
    },
    "SporeFountain": {
        "SpawnRate": "40",
        "SpawnMaxActive": "120",
        "SystemDuration": "4",
        "ParticleDuration": "1.4",
        "LaunchSpeed": "[40 70]",
        "LaunchAngle": "[75 105]",
        "Additive": "1",
        "Fields": [
            {"FieldType": "Acceleration", "X": "0", "Y": "1.2"},
            {"FieldType": "Friction", "X": "0.004", "Y": "0"}
        ],
        "ParticleScale": [
            {"time": 0.0, "value": 0.6},
            {"time": 0.4, "value": 1.0},
            {"time": 1.0, "value": 0.2}
        ],
        "SystemAlpha": [
            {"time": 0.8, "value": 1.0},
            {"time": 1.0, "value": 0.0}
        ]
    }
}"#;

fn main() {
    env_logger::init();
    log::info!("Garden Siege (headless) starting...");

    let mut library = EffectLibrary::new();
    match library.load_json(EFFECT_DEFS) {
        Ok(n) => log::info!("loaded {n} effect definitions"),
        Err(e) => {
            log::error!("{e}");
            return;
        }
    }

    let mut world = World::new();
    let mut ctx = GameContext::new(0x5EED);

    if let Err(e) = library.spawn(&mut world, "MulchBurst", Vec2::new(320.0, 360.0)) {
        log::error!("{e}");
    }
    if let Err(e) = library.spawn(&mut world, "SporeFountain", Vec2::new(480.0, 300.0)) {
        log::error!("{e}");
    }

    // Fixed-timestep loop; frames arrive at 30 Hz so each one runs two
    // substeps, like a slow render frame would.
    let frame_dt = 1.0 / 30.0;
    let total_frames = (8.0 / frame_dt) as u32;
    let mut accumulator = 0.0_f32;

    for frame in 0..total_frames {
        accumulator += frame_dt;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            sim::update(&mut world, &mut ctx, SIM_DT);
            world.sweep();
            accumulator -= SIM_DT;
            substeps += 1;
        }

        if frame % 30 == 0 {
            let particles = world.entities_with::<Particle>();
            let emitters = world.entities_with::<Emitter>();
            log::info!(
                "t={:.1}s emitters={} particles={}",
                frame as f32 * frame_dt,
                emitters.len(),
                particles.len(),
            );
            if let Some(&sample) = particles.first() {
                if let Some(xform) = sim::draw_transform(&world, &ctx, sample) {
                    log::debug!(
                        "sample particle at ({:.1}, {:.1}) alpha {:.2}",
                        xform.pos.x,
                        xform.pos.y,
                        xform.color[3],
                    );
                }
            }
        }
    }

    log::info!(
        "done: {} ticks simulated, {} entities left",
        ctx.time_ticks,
        world.entities_with::<Emitter>().len() + world.entities_with::<Particle>().len(),
    );
}
