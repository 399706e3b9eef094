//! Scene registry, suspension stack and transition state machine
//!
//! The manager owns every registered scene by name. Exactly one scene is
//! active at a time; `push_scene` suspends the active scene on a stack and
//! `pop_scene` brings it back.
//!
//! Scene changes may be wrapped in a [`TransitionEffect`]. While a transition
//! runs the manager is "transitioning" and every further switch, push or pop
//! is rejected outright. The swap itself happens when the effect reports that
//! it is ready, and the transition is over once the effect reports done.

use super::lifecycle::Scene;
use super::transition::{TransitionCallback, TransitionEffect};
use crate::render::Surface;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Why a scene change request was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneRejection {
    /// Another transition has not finished yet
    TransitionInProgress,
    /// No scene is registered under this name
    UnknownScene(String),
}

/// Result of `switch_to` and `push_scene`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneChange {
    /// The new scene is active
    Applied,
    /// The swap waits for the transition to become ready
    Deferred,
    /// Nothing happened
    Rejected(SceneRejection),
}

impl SceneChange {
    /// Whether the request was accepted
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Result of `pop_scene`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopOutcome {
    /// The named scene was resumed
    Resumed(String),
    /// The named scene will be resumed once the transition is ready
    Deferred(String),
    /// The stack was empty; nothing changed
    NothingPopped,
    /// Nothing happened
    Rejected(SceneRejection),
}

#[derive(Debug)]
enum PendingChange {
    Switch(String),
    Push(String),
    Pop(String),
}

struct ActiveTransition {
    effect: Box<dyn TransitionEffect>,
    pending: Option<PendingChange>,
    ready: Arc<AtomicBool>,
    done: Arc<AtomicBool>,
}

fn flag_callback(flag: &Arc<AtomicBool>) -> TransitionCallback {
    let flag = Arc::clone(flag);
    Box::new(move || flag.store(true, Ordering::Release))
}

/// Owns scenes and drives their lifecycle
#[derive(Default)]
pub struct SceneManager {
    scenes: HashMap<String, Box<dyn Scene>>,
    current: Option<String>,
    stack: Vec<String>,
    transition: Option<ActiveTransition>,
}

impl SceneManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene and call its `on_create`
    ///
    /// A scene already registered under `name` is replaced (and destroyed).
    pub fn add_scene(&mut self, name: impl Into<String>, mut scene: Box<dyn Scene>) {
        let name = name.into();
        scene.on_create();

        if let Some(mut old) = self.scenes.insert(name.clone(), scene) {
            log::warn!("Replacing scene '{}'", name);
            if self.current.as_deref() == Some(name.as_str()) {
                old.on_exit();
                self.current = None;
            }
            old.on_destroy();
            self.stack.retain(|stacked| *stacked != name);
        } else {
            log::info!("Added scene '{}'", name);
        }
    }

    /// Unregister a scene, calling `on_exit` then `on_destroy`
    ///
    /// If it was active the manager is left without an active scene. Returns
    /// `false` if no such scene was registered.
    pub fn remove_scene(&mut self, name: &str) -> bool {
        let Some(mut scene) = self.scenes.remove(name) else {
            log::debug!("remove_scene: '{}' is not registered", name);
            return false;
        };

        scene.on_exit();
        scene.on_destroy();

        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
        self.stack.retain(|stacked| stacked != name);

        log::info!("Removed scene '{}'", name);
        true
    }

    /// Replace the active scene, leaving the stack untouched
    pub fn switch_to(&mut self, name: &str, transition: Option<Box<dyn TransitionEffect>>) -> SceneChange {
        if let Err(rejection) = self.check_request(name) {
            log::warn!("switch_to('{}') rejected: {:?}", name, rejection);
            return SceneChange::Rejected(rejection);
        }

        self.change(PendingChange::Switch(name.to_owned()), transition)
    }

    /// Suspend the active scene on the stack and enter `name`
    pub fn push_scene(&mut self, name: &str, transition: Option<Box<dyn TransitionEffect>>) -> SceneChange {
        if let Err(rejection) = self.check_request(name) {
            log::warn!("push_scene('{}') rejected: {:?}", name, rejection);
            return SceneChange::Rejected(rejection);
        }

        self.change(PendingChange::Push(name.to_owned()), transition)
    }

    /// Exit the active scene and resume the one on top of the stack
    pub fn pop_scene(&mut self, transition: Option<Box<dyn TransitionEffect>>) -> PopOutcome {
        if self.transition.is_some() {
            log::warn!("pop_scene rejected: transition in progress");
            return PopOutcome::Rejected(SceneRejection::TransitionInProgress);
        }

        let Some(target) = self.stack.last().cloned() else {
            log::debug!("pop_scene: stack is empty");
            return PopOutcome::NothingPopped;
        };

        match self.change(PendingChange::Pop(target.clone()), transition) {
            SceneChange::Applied => PopOutcome::Resumed(target),
            SceneChange::Deferred => PopOutcome::Deferred(target),
            SceneChange::Rejected(rejection) => PopOutcome::Rejected(rejection),
        }
    }

    /// Advance the running transition, then the active scene
    pub fn update(&mut self, delta_time: f32) {
        if let Some(active) = self.transition.as_mut() {
            active.effect.update(delta_time);
        }
        self.poll_transition();

        if let Some(scene) = self.current_scene_mut() {
            scene.update(delta_time);
        }
    }

    /// Draw the active scene with the transition overlay on top
    pub fn render(&self, surface: &mut dyn Surface) {
        if let Some(scene) = self.current_scene() {
            scene.render(surface);
        }
        if let Some(active) = &self.transition {
            active.effect.render(surface);
        }
    }

    /// Name of the active scene
    pub fn current_scene_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The active scene
    pub fn current_scene(&self) -> Option<&dyn Scene> {
        let name = self.current.as_ref()?;
        self.scenes.get(name).map(|scene| &**scene)
    }

    fn current_scene_mut(&mut self) -> Option<&mut Box<dyn Scene>> {
        let name = self.current.as_ref()?;
        self.scenes.get_mut(name)
    }

    /// Number of suspended scenes
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether a transition is running
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Whether a scene is registered under `name`
    pub fn has_scene(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    /// Registered scene names, sorted
    pub fn scene_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scenes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn check_request(&self, name: &str) -> Result<(), SceneRejection> {
        if self.transition.is_some() {
            return Err(SceneRejection::TransitionInProgress);
        }
        if !self.scenes.contains_key(name) {
            return Err(SceneRejection::UnknownScene(name.to_owned()));
        }
        Ok(())
    }

    fn change(&mut self, change: PendingChange, transition: Option<Box<dyn TransitionEffect>>) -> SceneChange {
        let Some(mut effect) = transition else {
            self.apply(change);
            return SceneChange::Applied;
        };

        log::debug!("Starting transition for {:?}", change);
        let ready = Arc::new(AtomicBool::new(false));
        effect.start(flag_callback(&ready));
        self.transition = Some(ActiveTransition {
            effect,
            pending: Some(change),
            ready,
            done: Arc::new(AtomicBool::new(false)),
        });

        // Instant effects may already have signalled
        self.poll_transition();

        match &self.transition {
            Some(active) if active.pending.is_some() => SceneChange::Deferred,
            _ => SceneChange::Applied,
        }
    }

    fn poll_transition(&mut self) {
        let ready_change = match self.transition.as_mut() {
            Some(active) if active.ready.load(Ordering::Acquire) => active.pending.take(),
            _ => None,
        };

        if let Some(change) = ready_change {
            self.apply(change);
            if let Some(active) = self.transition.as_mut() {
                let on_done = flag_callback(&active.done);
                active.effect.end(on_done);
            }
        }

        let finished = self.transition.as_ref().is_some_and(|active| {
            active.pending.is_none()
                && (active.done.load(Ordering::Acquire) || active.effect.is_finished())
        });
        if finished {
            self.transition = None;
            log::debug!("Transition finished");
        }
    }

    fn apply(&mut self, change: PendingChange) {
        match change {
            PendingChange::Switch(name) => {
                if !self.scenes.contains_key(&name) {
                    log::warn!("Scene '{}' was removed before the switch; skipping", name);
                    return;
                }
                if let Some(scene) = self.current_scene_mut() {
                    scene.on_exit();
                }
                self.enter(name);
            }
            PendingChange::Push(name) => {
                if !self.scenes.contains_key(&name) {
                    log::warn!("Scene '{}' was removed before the push; skipping", name);
                    return;
                }
                if let Some(previous) = self.current.take() {
                    if let Some(scene) = self.scenes.get_mut(&previous) {
                        scene.on_pause();
                    }
                    self.stack.push(previous);
                }
                self.enter(name);
            }
            PendingChange::Pop(target) => {
                if self.stack.last() != Some(&target) {
                    log::warn!("Scene '{}' left the stack before the pop; skipping", target);
                    return;
                }
                self.stack.pop();
                if let Some(scene) = self.current_scene_mut() {
                    scene.on_exit();
                }
                if let Some(scene) = self.scenes.get_mut(&target) {
                    scene.on_resume();
                }
                log::info!("Resumed scene '{}'", target);
                self.current = Some(target);
            }
        }
    }

    fn enter(&mut self, name: String) {
        if let Some(scene) = self.scenes.get_mut(&name) {
            scene.on_enter();
        }
        log::info!("Entered scene '{}'", name);
        self.current = Some(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{CutTransition, FadeTransition};
    use std::sync::Mutex;

    type HookLog = Arc<Mutex<Vec<String>>>;

    struct Probe {
        name: &'static str,
        log: HookLog,
    }

    impl Probe {
        fn boxed(name: &'static str, log: &HookLog) -> Box<dyn Scene> {
            Box::new(Self { name, log: Arc::clone(log) })
        }

        fn record(&self, hook: &str) {
            self.log.lock().unwrap().push(format!("{}:{}", self.name, hook));
        }
    }

    impl Scene for Probe {
        fn on_create(&mut self) {
            self.record("create");
        }
        fn on_enter(&mut self) {
            self.record("enter");
        }
        fn on_pause(&mut self) {
            self.record("pause");
        }
        fn on_resume(&mut self) {
            self.record("resume");
        }
        fn on_exit(&mut self) {
            self.record("exit");
        }
        fn on_destroy(&mut self) {
            self.record("destroy");
        }
    }

    fn manager(log: &HookLog) -> SceneManager {
        let mut scenes = SceneManager::new();
        scenes.add_scene("menu", Probe::boxed("menu", log));
        scenes.add_scene("game", Probe::boxed("game", log));
        scenes.add_scene("pause", Probe::boxed("pause", log));
        log.lock().unwrap().clear();
        scenes
    }

    fn hooks(log: &HookLog) -> Vec<String> {
        std::mem::take(&mut *log.lock().unwrap())
    }

    #[test]
    fn test_add_scene_calls_create() {
        let log = HookLog::default();
        let mut scenes = SceneManager::new();
        scenes.add_scene("menu", Probe::boxed("menu", &log));
        assert_eq!(hooks(&log), ["menu:create"]);
        assert!(scenes.has_scene("menu"));
        assert_eq!(scenes.current_scene_name(), None);
    }

    #[test]
    fn test_switch_without_transition() {
        let log = HookLog::default();
        let mut scenes = manager(&log);

        assert_eq!(scenes.switch_to("menu", None), SceneChange::Applied);
        assert_eq!(hooks(&log), ["menu:enter"]);

        assert_eq!(scenes.switch_to("game", None), SceneChange::Applied);
        assert_eq!(hooks(&log), ["menu:exit", "game:enter"]);
        assert_eq!(scenes.current_scene_name(), Some("game"));
        assert_eq!(scenes.stack_depth(), 0);
    }

    #[test]
    fn test_switch_to_unknown_scene_is_rejected() {
        let log = HookLog::default();
        let mut scenes = manager(&log);
        scenes.switch_to("menu", None);
        hooks(&log);

        assert_eq!(
            scenes.switch_to("credits", None),
            SceneChange::Rejected(SceneRejection::UnknownScene("credits".into()))
        );
        assert!(hooks(&log).is_empty());
        assert_eq!(scenes.current_scene_name(), Some("menu"));
    }

    #[test]
    fn test_switch_with_fade_swaps_when_covered() {
        let log = HookLog::default();
        let mut scenes = manager(&log);
        scenes.switch_to("menu", None);
        hooks(&log);

        let change = scenes.switch_to("game", Some(Box::new(FadeTransition::new())));
        assert_eq!(change, SceneChange::Deferred);
        assert!(scenes.is_transitioning());
        assert_eq!(scenes.current_scene_name(), Some("menu"));

        scenes.update(0.25);
        assert_eq!(scenes.current_scene_name(), Some("menu"));
        assert!(hooks(&log).is_empty());

        scenes.update(0.25);
        assert_eq!(scenes.current_scene_name(), Some("game"));
        assert_eq!(hooks(&log), ["menu:exit", "game:enter"]);
        assert!(scenes.is_transitioning());

        scenes.update(0.25);
        assert!(scenes.is_transitioning());
        scenes.update(0.25);
        assert!(!scenes.is_transitioning());
        assert!(hooks(&log).is_empty());
    }

    #[test]
    fn test_requests_rejected_while_transitioning() {
        let log = HookLog::default();
        let mut scenes = manager(&log);
        scenes.switch_to("menu", None);
        scenes.push_scene("game", None);
        scenes.switch_to("pause", Some(Box::new(FadeTransition::new())));
        hooks(&log);

        let busy = SceneRejection::TransitionInProgress;
        assert_eq!(scenes.switch_to("menu", None), SceneChange::Rejected(busy.clone()));
        assert_eq!(scenes.push_scene("menu", None), SceneChange::Rejected(busy.clone()));
        assert_eq!(scenes.pop_scene(None), PopOutcome::Rejected(busy));

        assert!(hooks(&log).is_empty());
        assert_eq!(scenes.current_scene_name(), Some("game"));
        assert_eq!(scenes.stack_depth(), 1);
    }

    #[test]
    fn test_push_then_pop_restores_previous_scene() {
        let log = HookLog::default();
        let mut scenes = manager(&log);
        scenes.switch_to("game", None);
        hooks(&log);

        assert_eq!(scenes.push_scene("pause", None), SceneChange::Applied);
        assert_eq!(hooks(&log), ["game:pause", "pause:enter"]);
        assert_eq!(scenes.stack_depth(), 1);
        assert_eq!(scenes.current_scene_name(), Some("pause"));

        assert_eq!(scenes.pop_scene(None), PopOutcome::Resumed("game".into()));
        assert_eq!(hooks(&log), ["pause:exit", "game:resume"]);
        assert_eq!(scenes.stack_depth(), 0);
        assert_eq!(scenes.current_scene_name(), Some("game"));
    }

    #[test]
    fn test_pop_empty_stack_is_noop() {
        let log = HookLog::default();
        let mut scenes = manager(&log);
        scenes.switch_to("menu", None);
        hooks(&log);

        assert_eq!(scenes.pop_scene(None), PopOutcome::NothingPopped);
        assert_eq!(scenes.current_scene_name(), Some("menu"));
        assert!(hooks(&log).is_empty());
    }

    #[test]
    fn test_pop_with_fade_is_deferred() {
        let log = HookLog::default();
        let mut scenes = manager(&log);
        scenes.switch_to("game", None);
        scenes.push_scene("pause", None);
        hooks(&log);

        let outcome = scenes.pop_scene(Some(Box::new(FadeTransition::with_speed(4.0))));
        assert_eq!(outcome, PopOutcome::Deferred("game".into()));
        assert_eq!(scenes.stack_depth(), 1);

        scenes.update(0.25);
        assert_eq!(hooks(&log), ["pause:exit", "game:resume"]);
        assert_eq!(scenes.stack_depth(), 0);
        scenes.update(0.25);
        assert!(!scenes.is_transitioning());
    }

    #[test]
    fn test_instant_transition_completes_in_call() {
        let log = HookLog::default();
        let mut scenes = manager(&log);
        scenes.switch_to("menu", None);

        let change = scenes.push_scene("game", Some(Box::new(CutTransition::new())));
        assert_eq!(change, SceneChange::Applied);
        assert!(!scenes.is_transitioning());
        assert_eq!(scenes.current_scene_name(), Some("game"));
    }

    #[test]
    fn test_remove_scene() {
        let log = HookLog::default();
        let mut scenes = manager(&log);
        scenes.switch_to("menu", None);
        scenes.push_scene("game", None);
        hooks(&log);

        assert!(scenes.remove_scene("menu"));
        assert_eq!(hooks(&log), ["menu:exit", "menu:destroy"]);
        assert_eq!(scenes.stack_depth(), 0);
        assert_eq!(scenes.current_scene_name(), Some("game"));

        assert!(scenes.remove_scene("game"));
        assert_eq!(scenes.current_scene_name(), None);
        assert!(!scenes.remove_scene("game"));
        assert_eq!(scenes.scene_names(), ["pause"]);
    }

    #[test]
    fn test_removed_target_skips_deferred_swap() {
        let log = HookLog::default();
        let mut scenes = manager(&log);
        scenes.switch_to("menu", None);
        scenes.switch_to("game", Some(Box::new(FadeTransition::new())));
        scenes.remove_scene("game");
        hooks(&log);

        scenes.update(0.5);
        assert_eq!(scenes.current_scene_name(), Some("menu"));
        assert!(hooks(&log).is_empty());
        scenes.update(0.5);
        assert!(!scenes.is_transitioning());
    }

    #[test]
    fn test_removed_pop_target_skips_deferred_pop() {
        let log = HookLog::default();
        let mut scenes = manager(&log);
        scenes.switch_to("menu", None);
        scenes.push_scene("game", None);
        scenes.push_scene("pause", None);
        assert_eq!(
            scenes.pop_scene(Some(Box::new(FadeTransition::new()))),
            PopOutcome::Deferred("game".into())
        );
        scenes.remove_scene("game");
        hooks(&log);

        scenes.update(0.5);
        scenes.update(0.5);
        assert!(!scenes.is_transitioning());
        assert_eq!(scenes.current_scene_name(), Some("pause"));
        assert_eq!(scenes.stack_depth(), 1);
        assert!(hooks(&log).is_empty());
    }

    #[test]
    fn test_render_draws_overlay_after_scene() {
        use crate::foundation::math::{Color, Rect};
        use crate::render::{DrawCommand, RecordingSurface};

        struct Backdrop;
        impl Scene for Backdrop {
            fn render(&self, surface: &mut dyn Surface) {
                surface.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
            }
        }

        let mut scenes = SceneManager::new();
        scenes.add_scene("a", Box::new(Backdrop));
        scenes.add_scene("b", Box::new(Backdrop));
        scenes.switch_to("a", None);
        scenes.switch_to("b", Some(Box::new(FadeTransition::new())));
        scenes.update(0.25);

        let mut surface = RecordingSurface::new(10, 10);
        scenes.render(&mut surface);
        assert_eq!(surface.commands().len(), 2);
        assert!(matches!(
            surface.commands()[1],
            DrawCommand::FillRect { color, .. } if color == Color::BLACK.with_alpha(0.5)
        ));
    }
}
