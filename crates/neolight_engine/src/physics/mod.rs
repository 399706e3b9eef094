//! Physics module: rigid rectangles, collision detection and response
//!
//! Bodies are axis-aligned rectangles. [`PhysicsSystem`] integrates them,
//! finds overlapping pairs, resolves them with impulses and reports
//! collision begin/end to registered [`CollisionListener`]s.

pub mod body;
pub mod collision;
pub mod physics_system;

pub use body::{BodyId, PhysicsBody};
pub use collision::{
    CollisionListener,
    CollisionPair,
    Resolution,
    CORRECTION_PERCENT,
    CORRECTION_SLOP,
};
pub use physics_system::{ListenerKey, PhysicsSystem};
