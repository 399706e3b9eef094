//! Rigid body simulation: integration, collision detection and events
//!
//! Each tick integrates every active dynamic body with semi-implicit Euler,
//! then tests all active pairs exhaustively (O(n²)) for overlapping bounds,
//! resolves overlaps and diffs the overlapping set against the previous tick
//! to raise start/end events.

use super::body::{BodyId, PhysicsBody};
use super::collision::{bodies_intersect, resolve_collision, CollisionListener, CollisionPair, Resolution};
use crate::config::PhysicsConfig;
use slotmap::{new_key_type, SlotMap};
use std::collections::{HashMap, HashSet};

new_key_type! {
    /// Handle returned when registering a [`CollisionListener`]
    pub struct ListenerKey;
}

/// Owns the simulated bodies and drives them each tick
pub struct PhysicsSystem {
    /// Bodies in registration order
    bodies: Vec<PhysicsBody>,

    /// Body id → index into `bodies`
    index: HashMap<BodyId, usize>,

    listeners: SlotMap<ListenerKey, Box<dyn CollisionListener>>,

    /// Pairs that overlapped at the end of the previous tick
    previous_pairs: HashSet<CollisionPair>,

    gravity: f32,
    friction: f32,
    enabled: bool,
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsSystem {
    /// Create a physics system with default gravity (9.8) and friction (0.1)
    pub fn new() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }

    /// Create a physics system from configuration
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self {
            bodies: Vec::new(),
            index: HashMap::new(),
            listeners: SlotMap::with_key(),
            previous_pairs: HashSet::new(),
            gravity: config.gravity,
            friction: config.friction.clamp(0.0, 1.0),
            enabled: config.enabled,
        }
    }

    /// Register a body; returns its id
    ///
    /// Adding a body whose id is already registered replaces the old record.
    pub fn add_body(&mut self, body: PhysicsBody) -> BodyId {
        let id = body.id();
        if let Some(&slot) = self.index.get(&id) {
            log::warn!("Replacing already registered physics {}", id);
            self.bodies[slot] = body;
        } else {
            self.index.insert(id, self.bodies.len());
            self.bodies.push(body);
            log::info!("Added physics {}", id);
        }
        id
    }

    /// Unregister a body and forget any collision it was part of
    pub fn remove_body(&mut self, id: BodyId) -> Option<PhysicsBody> {
        let slot = self.index.remove(&id)?;
        let body = self.bodies.remove(slot);
        for (i, b) in self.bodies.iter().enumerate().skip(slot) {
            self.index.insert(b.id(), i);
        }
        self.previous_pairs.retain(|pair| !pair.involves(id));
        log::info!("Removed physics {}", id);
        Some(body)
    }

    /// Look up a body
    pub fn body(&self, id: BodyId) -> Option<&PhysicsBody> {
        self.index.get(&id).map(|&slot| &self.bodies[slot])
    }

    /// Look up a body for mutation
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut PhysicsBody> {
        let slot = *self.index.get(&id)?;
        self.bodies.get_mut(slot)
    }

    /// All bodies in registration order
    pub fn bodies(&self) -> impl Iterator<Item = &PhysicsBody> {
        self.bodies.iter()
    }

    /// Number of registered bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Register a collision listener
    pub fn add_collision_listener(&mut self, listener: Box<dyn CollisionListener>) -> ListenerKey {
        self.listeners.insert(listener)
    }

    /// Unregister a collision listener; returns false if it was not registered
    pub fn remove_collision_listener(&mut self, key: ListenerKey) -> bool {
        self.listeners.remove(key).is_some()
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Gravity along +y
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Set gravity along +y
    pub fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }

    /// Friction applied to grounded bodies
    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Set friction, clamped to `[0, 1]`
    pub fn set_friction(&mut self, friction: f32) {
        self.friction = friction.clamp(0.0, 1.0);
    }

    /// Whether the system ticks
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Suspend or resume ticking; state is kept either way
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Pairs overlapping as of the last tick
    pub fn active_collisions(&self) -> &HashSet<CollisionPair> {
        &self.previous_pairs
    }

    /// Whether two bodies overlapped as of the last tick
    pub fn is_colliding(&self, a: BodyId, b: BodyId) -> bool {
        self.previous_pairs.contains(&CollisionPair::new(a, b))
    }

    /// Drop all bodies, listeners and collision history
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.index.clear();
        self.listeners.clear();
        self.previous_pairs.clear();
        log::info!("Cleared physics system");
    }

    /// Advance the simulation by `delta_time` seconds
    pub fn update(&mut self, delta_time: f32) {
        if !self.enabled {
            return;
        }

        self.integrate(delta_time);
        let current_pairs = self.detect_and_resolve();
        self.notify_ended(&current_pairs);
        self.previous_pairs = current_pairs;
    }

    fn integrate(&mut self, delta_time: f32) {
        for body in self.bodies.iter_mut().filter(|b| b.is_active() && !b.is_static()) {
            if body.is_affected_by_gravity() {
                body.velocity.y += self.gravity * delta_time;
            }
            if body.is_on_ground() {
                body.velocity.x *= 1.0 - self.friction;
            }
            body.position += body.velocity * delta_time;
            body.rotation += body.angular_velocity * delta_time;
            body.sync_bounds();
        }
    }

    fn detect_and_resolve(&mut self) -> HashSet<CollisionPair> {
        let mut current_pairs = HashSet::new();

        // Snapshot of active slots; the scan below never adds or removes bodies.
        let active: Vec<usize> = self
            .bodies
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_active())
            .map(|(i, _)| i)
            .collect();

        for (n, &i) in active.iter().enumerate() {
            for &j in &active[n + 1..] {
                let (a, b) = pair_mut(&mut self.bodies, i, j);

                if a.is_static() && b.is_static() {
                    continue;
                }
                if a.ignores(b.id()) || b.ignores(a.id()) {
                    continue;
                }
                if !bodies_intersect(a, b) {
                    continue;
                }

                let pair = CollisionPair::new(a.id(), b.id());
                current_pairs.insert(pair);

                let resolution = resolve_collision(a, b);
                if resolution == Resolution::Coincident {
                    log::debug!("{} and {} share a center, skipping resolution", a.id(), b.id());
                }

                if !self.previous_pairs.contains(&pair) {
                    log::trace!("collision start: {} / {}", a.id(), b.id());
                    for listener in self.listeners.values_mut() {
                        listener.on_collision_start(a, b);
                    }
                }
            }
        }

        current_pairs
    }

    fn notify_ended(&mut self, current_pairs: &HashSet<CollisionPair>) {
        let mut ended: Vec<CollisionPair> = self
            .previous_pairs
            .difference(current_pairs)
            .copied()
            .collect();
        ended.sort_unstable();

        for pair in ended {
            let (Some(&slot_a), Some(&slot_b)) = (self.index.get(&pair.body_a), self.index.get(&pair.body_b)) else {
                continue;
            };
            let (a, b) = (&self.bodies[slot_a], &self.bodies[slot_b]);
            log::trace!("collision end: {} / {}", a.id(), b.id());
            for listener in self.listeners.values_mut() {
                listener.on_collision_end(a, b);
            }
        }
    }
}

/// Borrow two distinct bodies mutably, `i < j`
fn pair_mut(bodies: &mut [PhysicsBody], i: usize, j: usize) -> (&mut PhysicsBody, &mut PhysicsBody) {
    debug_assert!(i < j);
    let (head, tail) = bodies.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}
