//! Collision pairs, listener contract and impulse resolution
//!
//! The bounding rectangle is the whole collision shape; there is no narrow
//! phase. A pair that overlaps is resolved with a single impulse along the
//! center-to-center normal followed by a small positional correction.

use super::body::{BodyId, PhysicsBody};

/// Fraction of the penetration removed per tick by positional correction
pub const CORRECTION_PERCENT: f32 = 0.2;

/// Penetration allowed before positional correction kicks in
pub const CORRECTION_SLOP: f32 = 0.01;

/// Unordered pair of colliding bodies
///
/// Always stores the smaller id first so `(a, b)` and `(b, a)` compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Body with the smaller id
    pub body_a: BodyId,
    /// Body with the larger id
    pub body_b: BodyId,
}

impl CollisionPair {
    /// Create a new collision pair (always stores smaller id first for consistency)
    pub fn new(body_a: BodyId, body_b: BodyId) -> Self {
        if body_a < body_b {
            Self { body_a, body_b }
        } else {
            Self { body_a: body_b, body_b: body_a }
        }
    }

    /// Whether `body` is one of the two members
    pub fn involves(&self, body: BodyId) -> bool {
        self.body_a == body || self.body_b == body
    }
}

/// Receives collision begin/end notifications
///
/// Invoked synchronously from inside `PhysicsSystem::update`. Bodies are
/// passed in the order the system scanned them.
pub trait CollisionListener: Send {
    /// Called once when two bodies start overlapping
    fn on_collision_start(&mut self, body_a: &PhysicsBody, body_b: &PhysicsBody);

    /// Called once when two previously overlapping bodies separate
    fn on_collision_end(&mut self, body_a: &PhysicsBody, body_b: &PhysicsBody);
}

/// What happened when a colliding pair was resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Impulse and correction applied
    Resolved {
        /// Impulse magnitude along the normal
        impulse: f32,
    },
    /// The bodies already move apart along the normal
    Separating,
    /// Centers coincide, the normal is undefined
    Coincident,
    /// Neither body can move
    Immovable,
}

/// Check if two bodies' bounds overlap
pub fn bodies_intersect(a: &PhysicsBody, b: &PhysicsBody) -> bool {
    a.bounds().intersects(&b.bounds())
}

/// Resolve a collision between two overlapping bodies
///
/// The correction magnitude is computed from the sum of both bounds'
/// heights whatever the normal's direction.
pub fn resolve_collision(a: &mut PhysicsBody, b: &mut PhysicsBody) -> Resolution {
    let delta = b.bounds().center() - a.bounds().center();
    let distance = delta.norm();

    if distance == 0.0 {
        return Resolution::Coincident;
    }

    let normal = delta / distance;
    let relative_velocity = b.velocity - a.velocity;
    let velocity_along_normal = relative_velocity.dot(&normal);

    // Do not resolve if objects are moving apart
    if velocity_along_normal > 0.0 {
        return Resolution::Separating;
    }

    let inv_mass_a = a.inverse_mass();
    let inv_mass_b = b.inverse_mass();
    let inv_mass_sum = inv_mass_a + inv_mass_b;
    if inv_mass_sum == 0.0 {
        return Resolution::Immovable;
    }

    let restitution = a.restitution().min(b.restitution());
    let impulse = -(1.0 + restitution) * velocity_along_normal / inv_mass_sum;
    let impulse_vec = normal * impulse;

    if !a.is_static() {
        a.velocity -= impulse_vec * inv_mass_a;
    }
    if !b.is_static() {
        b.velocity += impulse_vec * inv_mass_b;
    }

    let penetration = a.bounds().height + b.bounds().height - distance - CORRECTION_SLOP;
    let correction = normal * (penetration.max(0.0) / inv_mass_sum * CORRECTION_PERCENT);

    if !a.is_static() {
        a.translate(-correction * inv_mass_a);
    }
    if !b.is_static() {
        b.translate(correction * inv_mass_b);
    }

    Resolution::Resolved { impulse }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_pair_is_unordered() {
        let a = PhysicsBody::new(0.0, 0.0, 1.0, 1.0).id();
        let b = PhysicsBody::new(0.0, 0.0, 1.0, 1.0).id();
        assert_eq!(CollisionPair::new(a, b), CollisionPair::new(b, a));
        assert!(CollisionPair::new(b, a).involves(a));
        assert_eq!(CollisionPair::new(b, a).body_a, a);
    }

    #[test]
    fn test_inelastic_equal_masses_cancel_normal_velocity() {
        let mut a = PhysicsBody::new(0.0, 0.0, 10.0, 10.0)
            .with_restitution(0.0)
            .with_velocity(5.0, 0.0);
        let mut b = PhysicsBody::new(8.0, 0.0, 10.0, 10.0)
            .with_restitution(0.0)
            .with_velocity(-5.0, 0.0);

        let result = resolve_collision(&mut a, &mut b);
        assert!(matches!(result, Resolution::Resolved { .. }));

        let normal = (b.bounds().center() - a.bounds().center()).normalize();
        let along = (b.velocity() - a.velocity()).dot(&normal);
        assert_abs_diff_eq!(along, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_elastic_bounce_reverses_velocity() {
        let mut wall = PhysicsBody::new_static(10.0, 0.0, 10.0, 10.0).with_restitution(1.0);
        let mut ball = PhysicsBody::new(1.0, 0.0, 10.0, 10.0)
            .with_restitution(1.0)
            .with_velocity(4.0, 0.0);

        resolve_collision(&mut ball, &mut wall);
        assert_abs_diff_eq!(ball.velocity().x, -4.0, epsilon = 1e-4);
        assert_eq!(wall.velocity(), crate::foundation::math::Vec2::zeros());
    }

    #[test]
    fn test_separating_bodies_are_left_alone() {
        let mut a = PhysicsBody::new(0.0, 0.0, 10.0, 10.0).with_velocity(-1.0, 0.0);
        let mut b = PhysicsBody::new(5.0, 0.0, 10.0, 10.0).with_velocity(1.0, 0.0);
        let before = (a.position(), b.position());

        assert_eq!(resolve_collision(&mut a, &mut b), Resolution::Separating);
        assert_eq!((a.position(), b.position()), before);
    }

    #[test]
    fn test_coincident_centers_are_skipped() {
        let mut a = PhysicsBody::new(0.0, 0.0, 10.0, 10.0).with_velocity(1.0, 0.0);
        let mut b = PhysicsBody::new(0.0, 0.0, 10.0, 10.0);

        assert_eq!(resolve_collision(&mut a, &mut b), Resolution::Coincident);
        assert_eq!(a.velocity().x, 1.0);
    }

    #[test]
    fn test_correction_uses_combined_heights() {
        // Horizontal overlap of 2 units, but the correction is driven by heights.
        let mut a = PhysicsBody::new_static(0.0, 0.0, 10.0, 10.0);
        let mut b = PhysicsBody::new(8.0, 0.0, 10.0, 10.0).with_velocity(-1.0, 0.0);

        resolve_collision(&mut a, &mut b);

        let expected = (10.0 + 10.0 - 8.0 - CORRECTION_SLOP) * CORRECTION_PERCENT;
        assert_abs_diff_eq!(b.position().x, 8.0 + expected, epsilon = 1e-4);
        assert_eq!(a.position().x, 0.0);
    }
}
