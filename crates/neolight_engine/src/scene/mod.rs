//! Scene management
//!
//! Scenes are registered by name with the [`SceneManager`], which keeps one
//! of them active and an optional stack of suspended scenes underneath.
//! Changes can be wrapped in a [`TransitionEffect`] such as
//! [`FadeTransition`]; the effect decides when the swap happens.

mod lifecycle;
mod scene_manager;
mod transition;

pub use lifecycle::Scene;
pub use scene_manager::{PopOutcome, SceneChange, SceneManager, SceneRejection};
pub use transition::{CutTransition, FadeTransition, TransitionCallback, TransitionEffect};
