//! Visual effects that hide a scene swap

use crate::foundation::math::{Color, Rect};
use crate::render::Surface;

/// One-shot notification handed to a transition
pub type TransitionCallback = Box<dyn FnOnce() + Send>;

/// Effect played while the scene manager swaps scenes
///
/// The protocol is driven by the effect itself:
/// 1. `start(on_ready)` begins the effect. The effect calls `on_ready` once
///    the old scene may be swapped out (e.g. the screen is fully covered).
/// 2. The manager swaps scenes and calls `end(on_done)`.
/// 3. The effect calls `on_done` once it has resolved.
///
/// Callbacks may fire synchronously from `start`/`end` for instant effects.
pub trait TransitionEffect: Send {
    /// Begin the effect
    fn start(&mut self, on_ready: TransitionCallback);

    /// Advance the effect
    fn update(&mut self, delta_time: f32);

    /// Draw the effect over the active scene
    fn render(&self, surface: &mut dyn Surface);

    /// Resolve the effect after the swap
    fn end(&mut self, on_done: TransitionCallback);

    /// Whether the effect has fully resolved
    fn is_finished(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FadePhase {
    Idle,
    FadingIn,
    Covered,
    FadingOut,
    Finished,
}

/// Fades the screen to a solid color, then back out
pub struct FadeTransition {
    color: Color,
    speed: f32,
    alpha: f32,
    phase: FadePhase,
    on_ready: Option<TransitionCallback>,
    on_done: Option<TransitionCallback>,
}

impl Default for FadeTransition {
    fn default() -> Self {
        Self::new()
    }
}

impl FadeTransition {
    /// Default fade speed in alpha per second
    pub const DEFAULT_SPEED: f32 = 2.0;

    /// Fade through black at the default speed
    pub fn new() -> Self {
        Self::with_speed(Self::DEFAULT_SPEED)
    }

    /// Fade through black, covering `speed` alpha per second
    ///
    /// A speed that is not a positive finite number falls back to
    /// [`Self::DEFAULT_SPEED`], since the fade would otherwise never finish.
    pub fn with_speed(speed: f32) -> Self {
        let speed = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            log::warn!("Invalid fade speed {}; using {}", speed, Self::DEFAULT_SPEED);
            Self::DEFAULT_SPEED
        };
        Self {
            color: Color::BLACK,
            speed,
            alpha: 0.0,
            phase: FadePhase::Idle,
            on_ready: None,
            on_done: None,
        }
    }

    /// Use a different overlay color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Current overlay opacity in `[0, 1]`
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl TransitionEffect for FadeTransition {
    fn start(&mut self, on_ready: TransitionCallback) {
        self.alpha = 0.0;
        self.phase = FadePhase::FadingIn;
        self.on_ready = Some(on_ready);
        self.on_done = None;
    }

    fn update(&mut self, delta_time: f32) {
        match self.phase {
            FadePhase::FadingIn => {
                self.alpha += self.speed * delta_time;
                if self.alpha >= 1.0 {
                    self.alpha = 1.0;
                    self.phase = FadePhase::Covered;
                    if let Some(on_ready) = self.on_ready.take() {
                        on_ready();
                    }
                }
            }
            FadePhase::FadingOut => {
                self.alpha -= self.speed * delta_time;
                if self.alpha <= 0.0 {
                    self.alpha = 0.0;
                    self.phase = FadePhase::Finished;
                    if let Some(on_done) = self.on_done.take() {
                        on_done();
                    }
                }
            }
            FadePhase::Idle | FadePhase::Covered | FadePhase::Finished => {}
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn render(&self, surface: &mut dyn Surface) {
        if self.alpha <= 0.0 {
            return;
        }
        let (width, height) = surface.size();
        surface.fill_rect(
            Rect::new(0.0, 0.0, width as f32, height as f32),
            self.color.with_alpha(self.alpha),
        );
    }

    fn end(&mut self, on_done: TransitionCallback) {
        self.alpha = 1.0;
        self.phase = FadePhase::FadingOut;
        self.on_done = Some(on_done);
    }

    fn is_finished(&self) -> bool {
        self.phase == FadePhase::Finished
    }
}

/// Hard cut: swaps immediately and draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct CutTransition {
    finished: bool,
}

impl CutTransition {
    /// Create a cut
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransitionEffect for CutTransition {
    fn start(&mut self, on_ready: TransitionCallback) {
        self.finished = false;
        on_ready();
    }

    fn update(&mut self, _delta_time: f32) {}

    fn render(&self, _surface: &mut dyn Surface) {}

    fn end(&mut self, on_done: TransitionCallback) {
        self.finished = true;
        on_done();
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, RecordingSurface};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, TransitionCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        let callback: TransitionCallback = Box::new(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        });
        (count, callback)
    }

    #[test]
    fn test_invalid_speed_still_completes() {
        for speed in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let mut fade = FadeTransition::with_speed(speed);
            let (ready, on_ready) = counter();
            let (done, on_done) = counter();
            fade.start(on_ready);
            fade.update(0.5);
            assert_eq!(ready.load(Ordering::SeqCst), 1, "speed {speed}");

            fade.end(on_done);
            fade.update(0.5);
            assert_eq!(done.load(Ordering::SeqCst), 1, "speed {speed}");
            assert!(fade.is_finished());
        }
    }

    #[test]
    fn test_fade_fires_ready_at_full_cover() {
        let mut fade = FadeTransition::new();
        let (ready, on_ready) = counter();
        fade.start(on_ready);

        fade.update(0.25);
        assert_eq!(fade.alpha(), 0.5);
        assert_eq!(ready.load(Ordering::SeqCst), 0);

        fade.update(0.25);
        assert_eq!(fade.alpha(), 1.0);
        assert_eq!(ready.load(Ordering::SeqCst), 1);

        // Holds at full cover until ended
        fade.update(1.0);
        assert_eq!(fade.alpha(), 1.0);
        assert_eq!(ready.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fade_out_fires_done() {
        let mut fade = FadeTransition::new();
        let (_, on_ready) = counter();
        fade.start(on_ready);
        fade.update(1.0);

        let (done, on_done) = counter();
        fade.end(on_done);
        assert!(!fade.is_finished());

        fade.update(0.25);
        assert_eq!(fade.alpha(), 0.5);
        fade.update(0.5);
        assert_eq!(fade.alpha(), 0.0);
        assert!(fade.is_finished());
        assert_eq!(done.load(Ordering::SeqCst), 1);

        fade.update(0.5);
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fade_covers_whole_surface() {
        let mut fade = FadeTransition::new();
        let (_, on_ready) = counter();
        let mut surface = RecordingSurface::new(320, 240);

        fade.render(&mut surface);
        assert!(surface.commands().is_empty());

        fade.start(on_ready);
        fade.update(0.25);
        fade.render(&mut surface);
        assert_eq!(
            surface.commands(),
            &[DrawCommand::FillRect {
                rect: Rect::new(0.0, 0.0, 320.0, 240.0),
                color: Color::BLACK.with_alpha(0.5),
            }]
        );
    }

    #[test]
    fn test_cut_fires_synchronously() {
        let mut cut = CutTransition::new();
        let (ready, on_ready) = counter();
        let (done, on_done) = counter();
        cut.start(on_ready);
        assert_eq!(ready.load(Ordering::SeqCst), 1);
        cut.end(on_done);
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert!(cut.is_finished());
    }
}
