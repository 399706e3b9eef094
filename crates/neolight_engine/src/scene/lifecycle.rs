//! Scene lifecycle hooks

use crate::render::Surface;

/// A screen of the game (menu, level, pause overlay, ...)
///
/// Every hook defaults to a no-op, so a scene only overrides what it needs.
/// The [`SceneManager`](super::SceneManager) drives the hooks:
///
/// ```text
/// on_create -> on_enter -> (on_pause <-> on_resume)* -> on_exit -> on_destroy
/// ```
///
/// `on_enter`/`on_exit` may repeat while the scene stays registered.
pub trait Scene: Send {
    /// Called once when the scene is registered
    fn on_create(&mut self) {}

    /// Called when the scene becomes the active scene
    fn on_enter(&mut self) {}

    /// Called when another scene is pushed on top of this one
    fn on_pause(&mut self) {}

    /// Called when the scene on top of this one is popped
    fn on_resume(&mut self) {}

    /// Called when the scene stops being the active scene
    fn on_exit(&mut self) {}

    /// Called once when the scene is unregistered
    fn on_destroy(&mut self) {}

    /// Advance the scene while it is active
    fn update(&mut self, _delta_time: f32) {}

    /// Draw the scene while it is active
    fn render(&self, _surface: &mut dyn Surface) {}
}
