//! Rigid body record simulated by the [`PhysicsSystem`](super::PhysicsSystem)

use crate::foundation::math::{Rect, Vec2};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BODY_ID: AtomicU64 = AtomicU64::new(0);

/// Unique body identifier
///
/// Ids are handed out in increasing order when a body is constructed and are
/// never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(u64);

impl BodyId {
    fn next() -> Self {
        Self(NEXT_BODY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// One simulated axis-aligned rectangle
///
/// `position` is the top-left corner of the bounds, which are the collision
/// shape. A static body always reports zero velocity, zero angular velocity
/// and zero inverse mass.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    id: BodyId,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) rotation: f32,
    pub(crate) angular_velocity: f32,
    mass: f32,
    restitution: f32,
    is_static: bool,
    affected_by_gravity: bool,
    active: bool,
    on_ground: bool,
    ignored: HashSet<BodyId>,
    bounds: Rect,
}

impl PhysicsBody {
    /// Create a dynamic body with unit mass at `(x, y)` of the given size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: BodyId::next(),
            position: Vec2::new(x, y),
            velocity: Vec2::zeros(),
            rotation: 0.0,
            angular_velocity: 0.0,
            mass: 1.0,
            restitution: 0.2,
            is_static: false,
            affected_by_gravity: true,
            active: true,
            on_ground: false,
            ignored: HashSet::new(),
            bounds: Rect::new(x, y, width, height),
        }
    }

    /// Create a static body (immovable, unaffected by gravity)
    pub fn new_static(x: f32, y: f32, width: f32, height: f32) -> Self {
        let mut body = Self::new(x, y, width, height);
        body.set_static(true);
        body
    }

    /// Builder: set the initial velocity
    #[must_use]
    pub fn with_velocity(mut self, x: f32, y: f32) -> Self {
        self.set_velocity(x, y);
        self
    }

    /// Builder: set the mass
    #[must_use]
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.set_mass(mass);
        self
    }

    /// Builder: set the restitution
    #[must_use]
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.set_restitution(restitution);
        self
    }

    /// Builder: set whether gravity applies
    #[must_use]
    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.affected_by_gravity = affected;
        self
    }

    /// Body id
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Top-left corner of the bounds
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move the body, keeping the bounds in sync
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
        self.sync_bounds();
    }

    /// Shift the body by `offset`
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
        self.sync_bounds();
    }

    /// Linear velocity
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Set the linear velocity; ignored for static bodies
    pub fn set_velocity(&mut self, x: f32, y: f32) {
        if self.is_static {
            log::trace!("ignoring velocity change on static {}", self.id);
            return;
        }
        self.velocity = Vec2::new(x, y);
    }

    /// Rotation in degrees
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Set the rotation
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    /// Angular velocity in degrees per second
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Set the angular velocity; ignored for static bodies
    pub fn set_angular_velocity(&mut self, angular_velocity: f32) {
        if self.is_static {
            return;
        }
        self.angular_velocity = angular_velocity;
    }

    /// Mass (infinite for immovable bodies)
    pub fn mass(&self) -> f32 {
        if self.is_static {
            f32::INFINITY
        } else {
            self.mass
        }
    }

    /// Set the mass; a non-positive mass makes the body immovable
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = if mass > 0.0 { mass } else { f32::INFINITY };
    }

    /// Inverse mass, 0 for static or infinitely heavy bodies
    pub fn inverse_mass(&self) -> f32 {
        if self.is_static || !self.mass.is_finite() || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Restitution in `[0, 1]`
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    /// Set the restitution, clamped to `[0, 1]`
    pub fn set_restitution(&mut self, restitution: f32) {
        self.restitution = restitution.clamp(0.0, 1.0);
    }

    /// Whether the body is static
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Make the body static (zeroing its motion) or dynamic again
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
        if is_static {
            self.velocity = Vec2::zeros();
            self.angular_velocity = 0.0;
        }
    }

    /// Whether gravity accelerates the body
    pub fn is_affected_by_gravity(&self) -> bool {
        self.affected_by_gravity
    }

    /// Enable or disable gravity for this body
    pub fn set_affected_by_gravity(&mut self, affected: bool) {
        self.affected_by_gravity = affected;
    }

    /// Whether the body takes part in simulation and collision
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate or deactivate the body
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether the body is resting on ground (enables friction)
    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    /// Mark the body as grounded; set by game logic
    pub fn set_on_ground(&mut self, on_ground: bool) {
        self.on_ground = on_ground;
    }

    /// Collision bounds
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Resize the bounds
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.bounds.width = width;
        self.bounds.height = height;
        self.sync_bounds();
    }

    /// Never collide with `other`
    pub fn ignore_collision_with(&mut self, other: BodyId) {
        self.ignored.insert(other);
    }

    /// Collide with `other` again
    pub fn unignore_collision_with(&mut self, other: BodyId) {
        self.ignored.remove(&other);
    }

    /// Whether collisions with `other` are ignored by this body
    pub fn ignores(&self, other: BodyId) -> bool {
        self.ignored.contains(&other)
    }

    pub(crate) fn sync_bounds(&mut self) {
        self.bounds.x = self.position.x;
        self.bounds.y = self.position.y;
    }
}
