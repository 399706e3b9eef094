//! A single simulated particle

use crate::foundation::math::{Color, Vec2};
use crate::render::Surface;

/// One particle spawned by an emitter
///
/// Particles are only created by [`ParticleEmitter`](super::ParticleEmitter)
/// and retired by the particle system as soon as their life runs out.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) acceleration: Vec2,
    pub(crate) size: f32,
    pub(crate) rotation: f32,
    pub(crate) angular_velocity: f32,
    pub(crate) color: Color,
    pub(crate) start_color: Color,
    pub(crate) end_color: Option<Color>,
    pub(crate) alpha: f32,
    pub(crate) life: f32,
    pub(crate) max_life: f32,
}

impl Particle {
    /// Position of the particle center
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Linear velocity
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Constant acceleration
    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    /// Diameter
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Rotation in degrees
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Current color, alpha excluded
    pub fn color(&self) -> Color {
        self.color
    }

    /// Current opacity in `[0, 1]`
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Remaining life in seconds
    pub fn life(&self) -> f32 {
        self.life
    }

    /// Life the particle was spawned with
    pub fn max_life(&self) -> f32 {
        self.max_life
    }

    /// A particle is dead once its life is used up
    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Fraction of life remaining, 0 for dead particles
    fn life_fraction(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Integrate motion and age the particle by `delta_time`
    pub fn update(&mut self, delta_time: f32) {
        self.velocity += self.acceleration * delta_time;
        self.position += self.velocity * delta_time;
        self.rotation += self.angular_velocity * delta_time;
        self.life -= delta_time;

        let remaining = self.life_fraction();
        self.alpha = remaining * self.start_color.alpha_f32();

        if let Some(end) = self.end_color {
            let rgb = self.start_color.lerp(end, 1.0 - remaining);
            self.color = Color::rgba(rgb.r, rgb.g, rgb.b, self.start_color.a);
        }
    }

    /// Draw the particle as a filled, rotated circle
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.fill_circle(self.position, self.size, self.rotation, self.color.with_alpha(self.alpha));
    }
}
