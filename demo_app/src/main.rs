//! Bouncing boxes demo
//!
//! Runs the engine headless for a few seconds: a title scene fades into a
//! game scene where boxes fall onto a floor, sparks follow the first box and
//! a pause scene is pushed and popped through simulated key presses.

use neolight_engine::foundation::logging;
use neolight_engine::prelude::*;
use rand::Rng;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

const CONFIG_PATH: &str = "demo.toml";
const BOX_COUNT: usize = 5;

/// Posted whenever the floor reports new landings
#[derive(Debug)]
struct Landed {
    total: u32,
}

/// Counts boxes hitting the floor
struct FloorListener {
    floor: BodyId,
    landings: Arc<AtomicU32>,
}

impl CollisionListener for FloorListener {
    fn on_collision_start(&mut self, body_a: &PhysicsBody, body_b: &PhysicsBody) {
        if body_a.id() == self.floor || body_b.id() == self.floor {
            self.landings.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn on_collision_end(&mut self, body_a: &PhysicsBody, body_b: &PhysicsBody) {
        log::trace!("{} and {} separated", body_a.id(), body_b.id());
    }
}

struct TitleScene;

impl Scene for TitleScene {
    fn on_enter(&mut self) {
        log::info!("Title screen");
    }

    fn render(&self, surface: &mut dyn Surface) {
        let (width, _) = surface.size();
        #[allow(clippy::cast_precision_loss)]
        let banner = Rect::new(40.0, 40.0, width as f32 - 80.0, 60.0);
        surface.fill_rect(banner, Color::rgb(30, 60, 120));
    }
}

struct GameScene {
    elapsed: f32,
}

impl Scene for GameScene {
    fn on_enter(&mut self) {
        log::info!("Game started");
    }

    fn on_pause(&mut self) {
        log::info!("Game paused at {:.2}s", self.elapsed);
    }

    fn on_resume(&mut self) {
        log::info!("Game resumed");
    }

    fn update(&mut self, delta_time: f32) {
        self.elapsed += delta_time;
    }
}

struct PauseScene;

impl Scene for PauseScene {
    fn render(&self, surface: &mut dyn Surface) {
        let (width, height) = surface.size();
        #[allow(clippy::cast_precision_loss)]
        let overlay = Rect::new(0.0, 0.0, width as f32, height as f32);
        surface.fill_rect(overlay, Color::rgba(0, 0, 0, 128));
    }
}

struct BouncingDemo {
    title_done: Arc<AtomicBool>,
    landings: Arc<AtomicU32>,
    reported_landings: u32,
    boxes: Vec<BodyId>,
    frame: u64,
}

impl BouncingDemo {
    fn new() -> Self {
        Self {
            title_done: Arc::new(AtomicBool::new(false)),
            landings: Arc::new(AtomicU32::new(0)),
            reported_landings: 0,
            boxes: Vec::new(),
            frame: 0,
        }
    }
}

impl Application for BouncingDemo {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.scenes.add_scene("title", Box::new(TitleScene));
        engine.scenes.add_scene("game", Box::new(GameScene { elapsed: 0.0 }));
        engine.scenes.add_scene("pause", Box::new(PauseScene));
        engine.scenes.switch_to("title", None);

        let title_done = Arc::clone(&self.title_done);
        engine.timers.schedule(0.5, false, move || title_done.store(true, Ordering::Relaxed));

        #[allow(clippy::cast_precision_loss)]
        let (width, height) = (engine.config().window.width as f32, engine.config().window.height as f32);
        engine.physics.set_gravity(400.0);
        let floor = engine
            .physics
            .add_body(PhysicsBody::new_static(0.0, height - 40.0, width, 40.0));
        engine.physics.add_collision_listener(Box::new(FloorListener {
            floor,
            landings: Arc::clone(&self.landings),
        }));

        let mut rng = rand::thread_rng();
        for i in 0..BOX_COUNT {
            #[allow(clippy::cast_precision_loss)]
            let x = 60.0 + i as f32 * (width - 120.0) / BOX_COUNT as f32;
            let body = PhysicsBody::new(x, rng.gen_range(20.0..200.0), 30.0, 30.0)
                .with_restitution(rng.gen_range(0.2..0.8))
                .with_velocity(rng.gen_range(-40.0..40.0), 0.0);
            self.boxes.push(engine.physics.add_body(body));
        }

        engine.particles.create_emitter(
            "sparks",
            ParticleEmitterConfig {
                particles_per_second: 30,
                life: FloatRange::new(0.3, 0.8),
                start_color: Color::rgb(255, 200, 80),
                end_color: Color::rgb(255, 40, 0),
                interpolate_color: true,
                ..ParticleEmitterConfig::default()
            },
        );

        engine.events.subscribe(|event: &Landed| {
            log::info!("Landings so far: {}", event.total);
        });

        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        self.frame += 1;

        if self.title_done.swap(false, Ordering::Relaxed) {
            engine.scenes.switch_to("game", Some(Box::new(FadeTransition::new())));
        }

        // Simulated key presses drive the pause overlay
        match self.frame {
            120 => engine.handle_event(AppEvent::KeyInput { key: KeyCode::Escape, pressed: true }),
            121 => engine.handle_event(AppEvent::KeyInput { key: KeyCode::Escape, pressed: false }),
            150 => engine.handle_event(AppEvent::KeyInput { key: KeyCode::Enter, pressed: true }),
            151 => engine.handle_event(AppEvent::KeyInput { key: KeyCode::Enter, pressed: false }),
            _ => {}
        }
        if engine.input.was_just_pressed(KeyCode::Escape) {
            engine.scenes.push_scene("pause", None);
        }
        if engine.input.was_just_pressed(KeyCode::Enter) {
            engine.scenes.pop_scene(None);
        }

        let paused = engine.scenes.current_scene_name() == Some("pause");
        engine.physics.set_enabled(!paused);
        engine.particles.set_enabled(!paused);

        if let Some(position) = self.boxes.first().and_then(|id| engine.physics.body(*id)).map(PhysicsBody::position) {
            if let Some(sparks) = engine.particles.emitter_mut("sparks") {
                sparks.set_position(position.x + 15.0, position.y + 15.0);
            }
        }

        let landings = self.landings.load(Ordering::Relaxed);
        if landings != self.reported_landings {
            self.reported_landings = landings;
            engine.events.post(Landed { total: landings });
        }

        Ok(())
    }

    fn render(&mut self, engine: &mut Engine, surface: &mut dyn Surface) -> Result<(), AppError> {
        engine.render(surface);
        if engine.scenes.current_scene_name() != Some("title") {
            for body in engine.physics.bodies() {
                surface.stroke_rect(body.bounds(), Color::WHITE);
            }
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        log::info!(
            "Demo finished: {} frames, {} landings, {} live particles",
            engine.frame_count(),
            self.landings.load(Ordering::Relaxed),
            engine.particles.particle_count()
        );
    }
}

/// Surface that keeps only the current frame's draw calls
struct FrameSurface {
    inner: RecordingSurface,
    frames: u64,
    peak_commands: usize,
}

impl FrameSurface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            inner: RecordingSurface::new(width, height),
            frames: 0,
            peak_commands: 0,
        }
    }
}

impl Surface for FrameSurface {
    fn size(&self) -> (u32, u32) {
        self.inner.size()
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.inner.fill_rect(rect, color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.inner.stroke_rect(rect, color);
    }

    fn fill_circle(&mut self, center: Vec2, diameter: f32, rotation: f32, color: Color) {
        self.inner.fill_circle(center, diameter, rotation, color);
    }

    fn present(&mut self) {
        self.peak_commands = self.peak_commands.max(self.inner.commands().len());
        self.inner.clear();
        self.frames += 1;
    }
}

fn load_config() -> EngineConfig {
    match EngineConfig::load_from_file(CONFIG_PATH) {
        Ok(config) => {
            log::info!("Loaded {}", CONFIG_PATH);
            config
        }
        Err(e) => {
            log::info!("Using default configuration ({})", e);
            let mut config = EngineConfig::default();
            config.window.title = "NeoLight - Bouncing Boxes".to_string();
            config.frame.max_frames = Some(240);
            config
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level(logging::LevelFilter::Info);

    log::info!("Starting NeoLight bouncing demo");

    let config = load_config();
    let mut surface = FrameSurface::new(config.window.width, config.window.height);
    let mut engine = Engine::new(config)?;
    let mut app = BouncingDemo::new();

    engine.run(&mut app, &mut surface)?;

    log::info!(
        "Rendered {} frames, busiest frame issued {} draw calls",
        surface.frames,
        surface.peak_commands
    );
    Ok(())
}
