//! Particle effects
//!
//! A [`ParticleSystem`] owns named [`ParticleEmitter`]s. Each emitter spawns
//! particles from its [`ParticleEmitterConfig`] ranges, at a fixed rate when
//! continuous or on demand through `emit`/`burst`, and the system retires
//! particles the moment their life runs out.

pub mod particle;
pub mod emitter;
pub mod particle_system;

pub use particle::Particle;
pub use emitter::{FloatRange, ParticleEmitter, ParticleEmitterConfig, VectorRange};
pub use particle_system::ParticleSystem;
