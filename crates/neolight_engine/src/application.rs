//! Application trait and lifecycle management

use crate::engine::{Engine, EngineError};
use crate::input::{Axis, KeyCode};
use crate::render::Surface;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive a game with [`Engine::run`].
pub trait Application {
    /// Initialize the application
    ///
    /// Called once before the first frame. Register scenes, bodies and
    /// emitters here.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame before the engine ticks its subsystems.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Render the application
    ///
    /// Called after the engine tick. The default draws the active scene,
    /// its transition overlay and every particle.
    fn render(&mut self, engine: &mut Engine, surface: &mut dyn Surface) -> Result<(), AppError> {
        engine.render(surface);
        Ok(())
    }

    /// Handle a platform event
    ///
    /// The default forwards it to the engine, which updates its input state.
    fn handle_event(&mut self, engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
        engine.handle_event(event);
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Called once after the last frame.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}

/// Events delivered by the platform layer
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Close requested
    CloseRequested,

    /// Key input event
    KeyInput {
        /// The key that was pressed/released
        key: KeyCode,
        /// Whether the key was pressed (true) or released (false)
        pressed: bool,
    },

    /// Analog axis moved
    AxisMoved {
        /// Which axis
        axis: Axis,
        /// Raw value, clamped by the input state
        value: f32,
    },
}
