//! Input queries
//!
//! Game logic polls input once per tick through [`InputQuery`]. The engine
//! ships [`InputState`], which a platform layer feeds with key and axis
//! changes.

use std::collections::{HashMap, HashSet};

/// Analog readings inside this magnitude are reported as 0
pub const AXIS_DEAD_ZONE: f32 = 0.1;

/// Read-only view of the current input
pub trait InputQuery {
    /// Whether `key` is held down
    fn is_pressed(&self, key: KeyCode) -> bool;

    /// Axis value in `[-1, 1]`
    fn axis(&self, axis: Axis) -> f32;
}

/// Input snapshot fed by the platform layer
#[derive(Debug, Default, Clone)]
pub struct InputState {
    pressed: HashSet<KeyCode>,
    just_pressed: HashSet<KeyCode>,
    axes: HashMap<Axis, f32>,
}

impl InputState {
    /// Create an input state with nothing pressed
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press
    pub fn press(&mut self, key: KeyCode) {
        if self.pressed.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    /// Record a key release
    pub fn release(&mut self, key: KeyCode) {
        self.pressed.remove(&key);
    }

    /// Set an axis, clamped to `[-1, 1]` with a small dead zone
    pub fn set_axis(&mut self, axis: Axis, value: f32) {
        let value = if value.is_nan() || value.abs() < AXIS_DEAD_ZONE {
            0.0
        } else {
            value.clamp(-1.0, 1.0)
        };
        self.axes.insert(axis, value);
    }

    /// Whether `key` went down since the last [`update`](Self::update)
    pub fn was_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed.contains(&key)
    }

    /// End the frame: forget edge-triggered presses
    pub fn update(&mut self) {
        self.just_pressed.clear();
    }

    /// Release every key and zero every axis
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.axes.clear();
    }
}

impl InputQuery for InputState {
    fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    fn axis(&self, axis: Axis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Analog axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left (-1) to right (+1)
    Horizontal,
    /// Up (-1) to down (+1)
    Vertical,
}
