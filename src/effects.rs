//! Named particle-effect factory
//!
//! Game systems ask for effects by name ("PeaSplat", "MulchBurst") at a
//! world position; the library owns the normalized configurations and builds
//! the emitter entity. Unknown names are a construction-time error. Once an
//! effect exists, its per-tick simulation is infallible.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use glam::Vec2;

use crate::config::{EmitterConfig, RawEffectConfig};
use crate::ecs::{Entity, World};
use crate::sim::{Emitter, Position};

/// Errors from effect construction.
#[derive(Debug)]
pub enum EffectError {
    /// No configuration registered under the requested name.
    UnknownEffect(String),
    /// An effect definition document failed to parse.
    Parse(serde_json::Error),
}

impl fmt::Display for EffectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectError::UnknownEffect(name) => write!(f, "no particle effect named {name:?}"),
            EffectError::Parse(e) => write!(f, "failed to parse effect definitions: {e}"),
        }
    }
}

impl std::error::Error for EffectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EffectError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EffectError {
    fn from(e: serde_json::Error) -> Self {
        EffectError::Parse(e)
    }
}

/// Registry of named, normalized effect configurations.
#[derive(Default)]
pub struct EffectLibrary {
    configs: HashMap<String, Arc<EmitterConfig>>,
}

impl EffectLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pre-normalized configuration under a name.
    pub fn insert(&mut self, name: impl Into<String>, config: EmitterConfig) {
        self.configs.insert(name.into(), Arc::new(config));
    }

    /// Load a `{name: raw config}` JSON document, normalizing each entry.
    /// Returns how many effects were added.
    pub fn load_json(&mut self, json: &str) -> Result<usize, EffectError> {
        let raw: HashMap<String, RawEffectConfig> = serde_json::from_str(json)?;
        let count = raw.len();
        for (name, raw_config) in raw {
            self.insert(name, EmitterConfig::from_raw(&raw_config));
        }
        Ok(count)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<EmitterConfig>> {
        self.configs.get(name)
    }

    /// Create an emitter entity for the named effect at a world position.
    /// The emitter runs, drains, and removes itself; the caller does not
    /// have to track the returned entity.
    pub fn spawn(&self, world: &mut World, name: &str, pos: Vec2) -> Result<Entity, EffectError> {
        let config = self
            .configs
            .get(name)
            .ok_or_else(|| EffectError::UnknownEffect(name.to_string()))?;
        let entity = world.spawn();
        world.attach(entity, Position(pos));
        world.attach(entity, Emitter::from_config(config.clone()));
        log::info!("spawned effect {name:?} as entity {}", entity.id());
        Ok(entity)
    }
}
