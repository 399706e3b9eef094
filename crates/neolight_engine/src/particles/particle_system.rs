//! Registry of named emitters, ticked and drawn as one unit

use super::emitter::{ParticleEmitter, ParticleEmitterConfig};
use crate::config::ParticleConfig;
use crate::render::Surface;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Owns every particle emitter
///
/// Emitters are kept sorted by name so update and draw order is stable.
pub struct ParticleSystem {
    emitters: BTreeMap<String, ParticleEmitter>,
    rng: StdRng,
    enabled: bool,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleSystem {
    /// Create a particle system seeded from OS entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a particle system with a fixed seed for reproducible effects
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Create a particle system from configuration
    pub fn from_config(config: &ParticleConfig) -> Self {
        let mut system = config.seed.map_or_else(Self::new, Self::with_seed);
        system.enabled = config.enabled;
        system
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            emitters: BTreeMap::new(),
            rng,
            enabled: true,
        }
    }

    /// Create (or replace) the emitter registered under `name`
    pub fn create_emitter(&mut self, name: impl Into<String>, config: ParticleEmitterConfig) -> &mut ParticleEmitter {
        let name = name.into();
        let rng = StdRng::from_rng(&mut self.rng).unwrap_or_else(|_| StdRng::from_entropy());
        let emitter = ParticleEmitter::new(name.clone(), config, rng);

        match self.emitters.entry(name) {
            Entry::Occupied(mut slot) => {
                log::warn!("Replaced particle emitter: {}", slot.key());
                slot.insert(emitter);
                slot.into_mut()
            }
            Entry::Vacant(slot) => {
                log::info!("Created particle emitter: {}", slot.key());
                slot.insert(emitter)
            }
        }
    }

    /// Look up an emitter
    pub fn emitter(&self, name: &str) -> Option<&ParticleEmitter> {
        self.emitters.get(name)
    }

    /// Look up an emitter for mutation
    pub fn emitter_mut(&mut self, name: &str) -> Option<&mut ParticleEmitter> {
        self.emitters.get_mut(name)
    }

    /// Remove an emitter together with its particles
    pub fn remove_emitter(&mut self, name: &str) -> Option<ParticleEmitter> {
        let removed = self.emitters.remove(name);
        if removed.is_some() {
            log::info!("Removed particle emitter: {}", name);
        }
        removed
    }

    /// Number of registered emitters
    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    /// Live particles across every emitter
    pub fn particle_count(&self) -> usize {
        self.emitters.values().map(ParticleEmitter::particle_count).sum()
    }

    /// Remove every emitter
    pub fn clear(&mut self) {
        self.emitters.clear();
        log::info!("Cleared all particle emitters");
    }

    /// Whether the system updates and renders
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Suspend or resume the system without dropping particles
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Advance every emitter by `delta_time`
    pub fn update(&mut self, delta_time: f32) {
        if !self.enabled {
            return;
        }
        for emitter in self.emitters.values_mut() {
            emitter.update(delta_time);
        }
    }

    /// Draw every live particle
    pub fn render(&self, surface: &mut dyn Surface) {
        if !self.enabled {
            return;
        }
        for particle in self.emitters.values().flat_map(ParticleEmitter::particles) {
            particle.render(surface);
        }
    }
}
