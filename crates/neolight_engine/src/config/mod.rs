//! Configuration system
//!
//! Engine settings are plain serde structs. Any of them can be loaded from or
//! saved to TOML or RON through the [`Config`] trait; the format is picked
//! from the file extension.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Presentation surface settings
    pub window: WindowConfig,
    /// Frame loop pacing
    pub frame: FrameConfig,
    /// Rigid body simulation
    pub physics: PhysicsConfig,
    /// Particle effects
    pub particles: ParticleConfig,
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be positive, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if self.frame.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be positive".into()));
        }
        if !self.frame.max_delta.is_finite() || self.frame.max_delta <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_delta must be a positive number, got {}",
                self.frame.max_delta
            )));
        }
        if !self.physics.gravity.is_finite() {
            return Err(ConfigError::Invalid("gravity must be finite".into()));
        }
        Ok(())
    }
}

/// Window / surface configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "NeoLight".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Frame loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Frames per second the loop sleeps towards
    pub target_fps: u32,
    /// Upper bound on the elapsed time fed to one tick, in seconds
    pub max_delta: f32,
    /// Stop the loop after this many frames
    pub max_frames: Option<u64>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_delta: 0.25,
            max_frames: None,
        }
    }
}

impl FrameConfig {
    /// Target duration of one frame in seconds
    #[allow(clippy::cast_precision_loss)]
    pub fn frame_time(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }
}

/// Physics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in units per second squared
    pub gravity: f32,
    /// Horizontal damping for grounded bodies, clamped to `[0, 1]`
    pub friction: f32,
    /// Whether the physics tick runs
    pub enabled: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            friction: 0.1,
            enabled: true,
        }
    }
}

/// Particle configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Whether particles update and render
    pub enabled: bool,
    /// Fixed RNG seed for reproducible effects
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: None,
        }
    }
}
