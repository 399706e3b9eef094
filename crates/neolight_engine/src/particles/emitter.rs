//! Particle emitters and their spawn configuration

use super::particle::Particle;
use crate::foundation::math::{Color, Vec2};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive range of scalar values sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
}

impl FloatRange {
    /// Create a range; the bounds may be given in any order
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Range containing a single value
    pub const fn constant(value: f32) -> Self {
        Self::new(value, value)
    }

    /// Draw a value from `[min, max]`
    ///
    /// Ranges with a non-finite bound or width yield the lower bound.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        if lo == hi || !lo.is_finite() || !hi.is_finite() || !(hi - lo).is_finite() {
            lo
        } else {
            rng.gen_range(lo..=hi)
        }
    }
}

/// Inclusive per-axis range of vectors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorRange {
    /// Per-axis lower bounds
    pub min: Vec2,
    /// Per-axis upper bounds
    pub max: Vec2,
}

impl VectorRange {
    /// Create a range from per-axis bounds
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Range containing a single vector
    pub fn constant(value: Vec2) -> Self {
        Self::new(value, value)
    }

    /// Draw a vector with each axis sampled independently
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            FloatRange::new(self.min.x, self.max.x).sample(rng),
            FloatRange::new(self.min.y, self.max.y).sample(rng),
        )
    }
}

/// Spawn-time settings of one emitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleEmitterConfig {
    /// Where new particles appear
    pub position: Vec2,
    /// Initial velocity
    pub velocity: VectorRange,
    /// Constant acceleration
    pub acceleration: VectorRange,
    /// Diameter
    pub size: FloatRange,
    /// Initial rotation in degrees
    pub rotation: FloatRange,
    /// Angular velocity in degrees per second
    pub angular_velocity: FloatRange,
    /// Lifetime in seconds
    pub life: FloatRange,
    /// Color at spawn; its alpha scales the fade
    pub start_color: Color,
    /// Color at the end of life, only used with `interpolate_color`
    pub end_color: Color,
    /// Blend RGB from `start_color` to `end_color` over each particle's life
    pub interpolate_color: bool,
    /// Continuous emission rate, 0 disables it
    pub particles_per_second: u32,
    /// Emit automatically on every update
    pub continuous: bool,
}

impl Default for ParticleEmitterConfig {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            velocity: VectorRange::new(Vec2::new(-50.0, -50.0), Vec2::new(50.0, 50.0)),
            acceleration: VectorRange::constant(Vec2::zeros()),
            size: FloatRange::new(2.0, 4.0),
            rotation: FloatRange::new(0.0, 360.0),
            angular_velocity: FloatRange::new(-180.0, 180.0),
            life: FloatRange::new(1.0, 2.0),
            start_color: Color::WHITE,
            end_color: Color::WHITE,
            interpolate_color: false,
            particles_per_second: 10,
            continuous: true,
        }
    }
}

/// Named particle source owning its live particles
pub struct ParticleEmitter {
    name: String,
    config: ParticleEmitterConfig,
    particles: Vec<Particle>,
    rng: StdRng,
    emitting_time: f64,
    emitted_by_rate: u64,
    emitted_total: u64,
    active: bool,
}

impl ParticleEmitter {
    pub(crate) fn new(name: String, config: ParticleEmitterConfig, rng: StdRng) -> Self {
        Self {
            name,
            config,
            particles: Vec::new(),
            rng,
            emitting_time: 0.0,
            emitted_by_rate: 0,
            emitted_total: 0,
            active: true,
        }
    }

    /// Emitter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Spawn configuration
    pub fn config(&self) -> &ParticleEmitterConfig {
        &self.config
    }

    /// Live particles
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Particles spawned over the emitter's whole life
    pub fn emitted_total(&self) -> u64 {
        self.emitted_total
    }

    /// Move the spawn point
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.config.position = Vec2::new(x, y);
    }

    /// Whether the emitter spawns particles
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start or stop spawning; existing particles keep simulating
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Spawn one particle with every attribute drawn from its configured range
    pub fn emit(&mut self) {
        if !self.active {
            return;
        }

        let config = &self.config;
        let rng = &mut self.rng;
        let life = config.life.sample(rng);
        let particle = Particle {
            position: config.position,
            velocity: config.velocity.sample(rng),
            acceleration: config.acceleration.sample(rng),
            size: config.size.sample(rng),
            rotation: config.rotation.sample(rng),
            angular_velocity: config.angular_velocity.sample(rng),
            color: config.start_color,
            start_color: config.start_color,
            end_color: config.interpolate_color.then_some(config.end_color),
            alpha: config.start_color.alpha_f32(),
            life,
            max_life: life,
        };

        self.particles.push(particle);
        self.emitted_total += 1;
    }

    /// Spawn `count` particles at once
    pub fn burst(&mut self, count: usize) {
        for _ in 0..count {
            self.emit();
        }
    }

    /// Simulate and retire live particles, then run continuous emission
    ///
    /// Particles spawned by this call start at full life on the next frame.
    pub(crate) fn update(&mut self, delta_time: f32) {
        self.particles.retain_mut(|particle| {
            particle.update(delta_time);
            !particle.is_dead()
        });

        if self.active && self.config.continuous && self.config.particles_per_second > 0 {
            self.emitting_time += f64::from(delta_time);
            let due = self.due_by_rate();
            while self.emitted_by_rate < due {
                self.emit();
                self.emitted_by_rate += 1;
            }
        }
    }

    /// Emissions owed after `emitting_time` seconds at the configured rate
    ///
    /// Counting from the running total keeps the result at
    /// `floor(time * rate)` however the time was split into frames.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn due_by_rate(&self) -> u64 {
        (self.emitting_time * f64::from(self.config.particles_per_second)).floor() as u64
    }

    /// Drop every live particle
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn emitter(config: ParticleEmitterConfig) -> ParticleEmitter {
        ParticleEmitter::new("test".into(), config, StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let range = FloatRange::new(2.0, 4.0);
        let reversed = FloatRange::new(4.0, 2.0);
        for _ in 0..500 {
            let v = range.sample(&mut rng);
            assert!((2.0..=4.0).contains(&v));
            let v = reversed.sample(&mut rng);
            assert!((2.0..=4.0).contains(&v));
        }
        assert_eq!(FloatRange::constant(3.0).sample(&mut rng), 3.0);
    }

    #[test]
    fn test_emit_uses_config() {
        let mut config = ParticleEmitterConfig::default();
        config.position = Vec2::new(10.0, 20.0);
        config.size = FloatRange::constant(6.0);
        config.life = FloatRange::constant(1.5);
        let mut emitter = emitter(config);

        emitter.emit();
        let p = &emitter.particles()[0];
        assert_eq!(p.position(), Vec2::new(10.0, 20.0));
        assert_eq!(p.size(), 6.0);
        assert_eq!(p.max_life(), 1.5);
        assert!(p.velocity().x.abs() <= 50.0);
        assert_eq!(emitter.emitted_total(), 1);
    }

    #[test]
    fn test_inactive_emitter_does_not_emit() {
        let mut emitter = emitter(ParticleEmitterConfig::default());
        emitter.set_active(false);
        emitter.emit();
        emitter.update(5.0);
        assert_eq!(emitter.particle_count(), 0);
    }

    #[test]
    fn test_burst() {
        let mut emitter = emitter(ParticleEmitterConfig::default());
        emitter.burst(25);
        assert_eq!(emitter.particle_count(), 25);
    }

    #[test]
    fn test_non_finite_ranges_do_not_panic() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(FloatRange::new(1.0, f32::INFINITY).sample(&mut rng), 1.0);
        assert_eq!(FloatRange::new(f32::MIN, f32::MAX).sample(&mut rng), f32::MIN);
        assert!(FloatRange::new(f32::NAN, 2.0).sample(&mut rng).is_finite());
        assert!(FloatRange::new(0.0, f32::NAN).sample(&mut rng).is_nan());
    }

    #[test]
    fn test_rate_emission_matches_elapsed_time() {
        for rate in [3_u32, 5, 7, 30, 60, 100] {
            for frames in [10_u32, 60, 100, 144, 1000] {
                let dt = 1.0 / frames as f32;
                let mut config = ParticleEmitterConfig::default();
                config.particles_per_second = rate;
                config.life = FloatRange::constant(10.0);
                let mut emitter = emitter(config);

                for _ in 0..frames {
                    emitter.update(dt);
                }

                let expected = (f64::from(frames) * f64::from(dt) * f64::from(rate)).floor() as u64;
                assert_eq!(emitter.emitted_total(), expected, "rate {} over {} frames", rate, frames);
            }
        }
    }

    #[test]
    fn test_zero_rate_never_emits() {
        let mut config = ParticleEmitterConfig::default();
        config.particles_per_second = 0;
        let mut emitter = emitter(config);
        emitter.update(10.0);
        assert_eq!(emitter.emitted_total(), 0);
    }

    #[test]
    fn test_non_continuous_only_emits_on_demand() {
        let mut config = ParticleEmitterConfig::default();
        config.continuous = false;
        let mut emitter = emitter(config);
        emitter.update(10.0);
        assert_eq!(emitter.emitted_total(), 0);
        emitter.emit();
        assert_eq!(emitter.emitted_total(), 1);
    }
}
