//! # NeoLight Engine
//!
//! Runtime core for 2D games: a scene manager with effect-driven
//! transitions, an axis-aligned rigid body simulation with collision
//! events, and a particle system.
//!
//! ## Features
//!
//! - **Scenes**: named scenes with lifecycle hooks, a suspension stack and
//!   transitions that decide when the swap happens
//! - **Physics**: gravity, friction, impulse resolution and start/end
//!   collision callbacks
//! - **Particles**: named emitters with randomized spawn ranges and
//!   continuous or burst emission
//! - **Headless rendering**: everything draws into a [`render::Surface`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use neolight_engine::prelude::*;
//!
//! struct MyGame;
//!
//! impl Application for MyGame {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         engine.physics.add_body(PhysicsBody::new_static(0.0, 500.0, 800.0, 100.0));
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::new(EngineConfig::default())?;
//!     let mut surface = RecordingSurface::new(800, 600);
//!     engine.run(&mut MyGame, &mut surface)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod events;
pub mod foundation;
pub mod input;
pub mod particles;
pub mod physics;
pub mod render;
pub mod scene;

mod application;
mod engine;

pub use application::{AppError, AppEvent, Application};
pub use config::EngineConfig;
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AppError, AppEvent, Application,
        Engine, EngineConfig, EngineError,
        config::Config,
        events::EventBus,
        foundation::{
            math::{Color, Rect, Vec2},
            time::{Timer, TimerManager},
        },
        input::{Axis, InputQuery, InputState, KeyCode},
        particles::{FloatRange, ParticleEmitterConfig, ParticleSystem, VectorRange},
        physics::{BodyId, CollisionListener, PhysicsBody, PhysicsSystem},
        render::{RecordingSurface, Surface},
        scene::{FadeTransition, Scene, SceneManager, TransitionEffect},
    };
}
