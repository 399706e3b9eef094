//! Rendering abstraction
//!
//! The runtime core never talks to a graphics API. Scenes, transitions and
//! particles draw into a [`Surface`]; the presentation layer decides how
//! those calls reach the screen.

pub mod surface;

pub use surface::{DrawCommand, RecordingSurface, Surface};
