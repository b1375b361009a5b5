//! Turret demo: a spinning ship with a child turret that fires shells
//!
//! Shells are scene objects that release themselves when their fuse runs out
//! or when they hit an asteroid. Everything is released at the end and the
//! allocation counters must balance.
//!
//! Usage: `turret_demo [config.toml|config.ron]`

use game_core::foundation::logging;
use game_core::foundation::math::utils::deg_to_rad;
use game_core::prelude::*;
use rand::Rng;
use thiserror::Error;

const SPIN_DEGREES_PER_SECOND: f32 = 45.0;
const SHELL_SPEED: f32 = 12.0;
const SHELL_FUSE: f32 = 1.5;
const MIN_FIRE_INTERVAL: f32 = 0.4;
const MAX_FIRE_INTERVAL: f32 = 1.2;
const DEFAULT_FRAMES: u64 = 600;

#[derive(Error, Debug)]
enum DemoError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{alive} objects were never dropped")]
    Leaked { alive: u64 },

    #[error("{count} objects were dropped without being released")]
    Unreleased { count: u64 },
}

/// Rotates its object around Y
struct Spin {
    lifecycle: ComponentLifecycle,
    angle: f32,
}

impl GameObjectComponent for Spin {
    fn name(&self) -> &str {
        "Spin"
    }

    fn status(&self) -> LifecycleStatus {
        self.lifecycle.status()
    }

    fn initialize(&mut self, _object: &GameObject) {
        self.lifecycle.initialize_with(|| ());
    }

    fn release(&mut self, _object: &GameObject) {
        self.lifecycle.release_with(|| ());
    }

    fn update(&mut self, object: &GameObject, delta: f32) {
        self.angle += deg_to_rad(SPIN_DEGREES_PER_SECOND) * delta;
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), self.angle);
        object.with_transform_mut(|transform| transform.set_rotation(rotation));
    }
}

/// Fires shells into the scene at random intervals
struct Gunner {
    lifecycle: ComponentLifecycle,
    services: Services,
    scene: SceneRef,
    cooldown: f32,
    fired: u32,
}

impl Gunner {
    fn new(services: Services, scene: SceneRef) -> Self {
        Self {
            lifecycle: ComponentLifecycle::new(),
            services,
            scene,
            cooldown: MAX_FIRE_INTERVAL,
            fired: 0,
        }
    }

    fn fire(&mut self, object: &GameObject) {
        let origin = object
            .with_transform(Transform::world_position)
            .unwrap_or_else(Vec3::zeros);
        let heading = object
            .with_transform(|transform| transform.world_matrix().transform_vector(&Vec3::z()))
            .unwrap_or_else(Vec3::z);

        self.fired += 1;
        let shell = GameObject::new_in_scene(
            &self.services,
            Some(&self.scene),
            &format!("shell-{}", self.fired),
            "shells",
        );
        shell.with_transform_mut(|transform| transform.set_position(origin));
        shell.add_component(component_ref(Shell::new(heading * SHELL_SPEED)));
        log::debug!("{} fired shell {}", object.name(), shell.id());
    }
}

impl GameObjectComponent for Gunner {
    fn name(&self) -> &str {
        "Gunner"
    }

    fn status(&self) -> LifecycleStatus {
        self.lifecycle.status()
    }

    fn initialize(&mut self, _object: &GameObject) {
        self.lifecycle.initialize_with(|| ());
    }

    fn release(&mut self, object: &GameObject) {
        let fired = self.fired;
        self.lifecycle.release_with(|| {
            log::info!("{} fired {fired} shells", object.name());
        });
    }

    fn update(&mut self, object: &GameObject, delta: f32) {
        self.cooldown -= delta;
        if self.cooldown <= 0.0 {
            self.fire(object);
            self.cooldown = rand::thread_rng().gen_range(MIN_FIRE_INTERVAL..MAX_FIRE_INTERVAL);
        }
    }
}

/// Moves in a straight line until its fuse burns out or it hits something
struct Shell {
    lifecycle: ComponentLifecycle,
    velocity: Vec3,
    fuse: f32,
}

impl Shell {
    const fn new(velocity: Vec3) -> Self {
        Self {
            lifecycle: ComponentLifecycle::new(),
            velocity,
            fuse: SHELL_FUSE,
        }
    }
}

impl GameObjectComponent for Shell {
    fn name(&self) -> &str {
        "Shell"
    }

    fn status(&self) -> LifecycleStatus {
        self.lifecycle.status()
    }

    fn initialize(&mut self, _object: &GameObject) {
        self.lifecycle.initialize_with(|| ());
    }

    fn release(&mut self, _object: &GameObject) {
        self.lifecycle.release_with(|| ());
    }

    fn update_physics(&mut self, object: &GameObject, delta: f32) {
        let step = self.velocity * delta;
        object.with_transform_mut(|transform| transform.translate(step));
    }

    fn update(&mut self, object: &GameObject, delta: f32) {
        self.fuse -= delta;
        if self.fuse <= 0.0 {
            object.release();
        }
    }

    fn on_trigger_enter(&mut self, object: &GameObject, info: &CollisionInfo) {
        log::info!("{} hit asteroid {}", object.name(), info.other);
        object.release();
    }
}

fn load_config() -> Result<CoreConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => Ok(CoreConfig::load_from_file(&path)?),
        None => Ok(CoreConfig::default()),
    }
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    logging::init_with_filter(&config.log_filter);

    let manager = GameManager::with_defaults(config.objects.clone());
    let services = manager.services();
    let scene: SceneRef = ListScene::shared("space");

    let ship = GameObject::new_in_scene(&services, Some(&scene), "ship", "origin");
    ship.add_component(component_ref(Spin {
        lifecycle: ComponentLifecycle::new(),
        angle: 0.0,
    }));

    let turret = GameObject::new_child(&services, Some(&ship), "turret");
    turret.with_transform_mut(|transform| transform.set_position(Vec3::new(0.0, 0.5, 1.0)));
    turret.add_component(component_ref(Gunner::new(services.clone(), scene.clone())));

    let asteroid = GameObject::new_in_scene(&services, Some(&scene), "asteroid", "belt");
    drop(services);

    let max_frames = config.frame.max_frames.unwrap_or(DEFAULT_FRAMES);
    let delta = config.frame.fixed_delta;
    let mut rng = rand::thread_rng();
    let stopwatch = Stopwatch::start_new();

    for _ in 0..max_frames {
        manager.run_frame(delta);

        let shells: Vec<_> = manager
            .objects()
            .into_iter()
            .filter(|object| object.is_initialized() && object.name().starts_with("shell-"))
            .collect();
        if !shells.is_empty() && rng.gen_bool(0.02) {
            let target = &shells[rng.gen_range(0..shells.len())];
            manager.dispatch_collision(
                target.id(),
                CollisionEvent::TriggerEnter,
                &CollisionInfo::trigger(asteroid.id()),
            );
        }
    }

    log::info!(
        "{} frames in {:.1}ms, {} objects live",
        manager.frame_count(),
        stopwatch.elapsed_millis(),
        manager.object_count()
    );

    manager.release_all();
    drop((ship, turret, asteroid));

    let counters = manager.counters();
    log::info!("created {} objects, deleted {}", counters.created(), counters.deleted());
    if counters.unreleased_drops() > 0 {
        return Err(DemoError::Unreleased {
            count: counters.unreleased_drops(),
        });
    }
    if counters.alive() > 0 {
        return Err(DemoError::Leaked {
            alive: counters.alive(),
        });
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        log::error!("turret demo failed: {e}");
        eprintln!("turret demo failed: {e}");
        std::process::exit(1);
    }
}
