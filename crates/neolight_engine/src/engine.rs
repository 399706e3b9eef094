//! Core engine implementation

use crate::{
    application::{AppEvent, Application},
    config::{ConfigError, EngineConfig},
    events::EventBus,
    foundation::time::{Timer, TimerManager},
    input::InputState,
    particles::ParticleSystem,
    physics::PhysicsSystem,
    render::Surface,
    scene::SceneManager,
};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Main engine struct
///
/// Owns every runtime subsystem and advances them in a fixed order:
/// timers and queued events, then scenes, physics and particles.
pub struct Engine {
    /// Scene registry and transitions
    pub scenes: SceneManager,

    /// Rigid body simulation
    pub physics: PhysicsSystem,

    /// Particle effects
    pub particles: ParticleSystem,

    /// Delayed and repeating tasks on simulated time
    pub timers: TimerManager,

    /// Type-keyed event bus
    pub events: EventBus,

    /// Current input snapshot
    pub input: InputState,

    config: EngineConfig,
    frame_count: u64,
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!(
            "Initializing engine '{}' ({}x{})",
            config.window.title,
            config.window.width,
            config.window.height
        );

        Ok(Self {
            scenes: SceneManager::new(),
            physics: PhysicsSystem::from_config(&config.physics),
            particles: ParticleSystem::from_config(&config.particles),
            timers: TimerManager::new(),
            events: EventBus::new(),
            input: InputState::new(),
            config,
            frame_count: 0,
            running: true,
        })
    }

    /// Advance every subsystem by one frame
    ///
    /// `delta_time` is clamped to `[0, max_delta]` so a stalled frame cannot
    /// tunnel bodies through each other.
    pub fn tick(&mut self, delta_time: f32) {
        let delta_time = if delta_time.is_finite() {
            delta_time.clamp(0.0, self.config.frame.max_delta)
        } else {
            0.0
        };

        self.timers.update(delta_time);
        self.events.dispatch();

        self.scenes.update(delta_time);
        self.physics.update(delta_time);
        self.particles.update(delta_time);

        self.input.update();
        self.frame_count += 1;
    }

    /// Draw the active scene, its transition overlay, then particles
    pub fn render(&self, surface: &mut dyn Surface) {
        self.scenes.render(surface);
        self.particles.render(surface);
    }

    /// Run the main loop until [`quit`](Self::quit) or `max_frames`
    pub fn run<T: Application>(&mut self, app: &mut T, surface: &mut dyn Surface) -> Result<(), EngineError> {
        app.initialize(self)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {}", e)))?;

        log::info!("Starting main loop...");

        let frame_time = Duration::from_secs_f32(self.config.frame.frame_time());
        let mut timer = Timer::new();

        while self.running {
            let frame_start = Instant::now();
            let delta_time = timer.update();

            // Update application
            app.update(self, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {}", e)))?;

            // Update engine systems
            self.tick(delta_time);

            // Render
            app.render(self, surface)
                .map_err(|e| EngineError::ApplicationError(format!("App render: {}", e)))?;
            surface.present();

            if self
                .config
                .frame
                .max_frames
                .is_some_and(|max| self.frame_count >= max)
            {
                log::info!("Reached frame limit ({})", self.frame_count);
                self.running = false;
            }

            if let Some(remaining) = frame_time.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(remaining);
            }
        }

        // Cleanup
        app.cleanup(self);

        log::info!(
            "Engine shutdown complete after {} frames ({:.1} fps)",
            self.frame_count,
            timer.average_fps()
        );
        Ok(())
    }

    /// Handle a platform event
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CloseRequested => self.quit(),
            AppEvent::KeyInput { key, pressed: true } => self.input.press(key),
            AppEvent::KeyInput { key, pressed: false } => self.input.release(key),
            AppEvent::AxisMoved { axis, value } => self.input.set_axis(axis, value),
        }
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop keeps going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of completed ticks
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
}
