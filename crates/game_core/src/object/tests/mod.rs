//! Scenario tests for objects and their components
//!
//! `Recorder` components write `name:hook` lines into a shared journal and
//! can run an action from inside any hook, which is how the reentrancy
//! scenarios are staged.

mod collection;
mod dispatch;

use super::*;
use crate::registry::{GameManager, Services};
use crate::scene::{ListScene, SceneRef};
use std::cell::RefCell;
use std::rc::Rc;

pub(super) type Journal = Rc<RefCell<Vec<String>>>;

type Action = Box<dyn FnMut(&GameObject)>;

/// Test component that journals every hook it receives
pub(super) struct Recorder {
    name: String,
    lifecycle: ComponentLifecycle,
    journal: Journal,
    actions: Vec<(&'static str, Action)>,
}

impl Recorder {
    pub(super) fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            lifecycle: ComponentLifecycle::new(),
            journal: Rc::clone(journal),
            actions: Vec::new(),
        }
    }

    /// Run `action` every time `hook` fires
    pub(super) fn on(mut self, hook: &'static str, action: impl FnMut(&GameObject) + 'static) -> Self {
        self.actions.push((hook, Box::new(action)));
        self
    }

    pub(super) fn into_ref(self) -> ComponentRef {
        component_ref(self)
    }

    fn record(&mut self, hook: &'static str, object: &GameObject) {
        self.journal.borrow_mut().push(format!("{}:{hook}", self.name));
        for (name, action) in &mut self.actions {
            if *name == hook {
                action(object);
            }
        }
    }
}

impl GameObjectComponent for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> LifecycleStatus {
        self.lifecycle.status()
    }

    fn initialize(&mut self, object: &GameObject) {
        self.lifecycle.initialize_with(|| ());
        self.record("initialize", object);
    }

    fn release(&mut self, object: &GameObject) {
        if self.lifecycle.is_initialized() {
            self.lifecycle.release_with(|| ());
        }
        self.record("release", object);
    }

    fn update_physics(&mut self, object: &GameObject, _delta: f32) {
        self.record("physics", object);
    }

    fn update(&mut self, object: &GameObject, _delta: f32) {
        self.record("update", object);
    }

    fn render(&mut self, object: &GameObject) {
        self.record("render", object);
    }

    fn on_collision_enter(&mut self, object: &GameObject, _info: &CollisionInfo) {
        self.record("collision_enter", object);
    }

    fn on_collision_stay(&mut self, object: &GameObject, _info: &CollisionInfo) {
        self.record("collision_stay", object);
    }

    fn on_collision_exit(&mut self, object: &GameObject, _info: &CollisionInfo) {
        self.record("collision_exit", object);
    }

    fn on_trigger_enter(&mut self, object: &GameObject, _info: &CollisionInfo) {
        self.record("trigger_enter", object);
    }

    fn on_trigger_stay(&mut self, object: &GameObject, _info: &CollisionInfo) {
        self.record("trigger_stay", object);
    }

    fn on_trigger_exit(&mut self, object: &GameObject, _info: &CollisionInfo) {
        self.record("trigger_exit", object);
    }

    fn resolve_locked_tasks(&mut self, object: &GameObject) {
        // Late additions initialize themselves on their first resolve.
        if self.lifecycle.status() == LifecycleStatus::Uninitialized {
            self.lifecycle.initialize_with(|| ());
        }
        self.record("resolve", object);
    }
}

/// A manager, a scene and a journal
pub(super) struct Fixture {
    pub(super) manager: Rc<GameManager>,
    pub(super) services: Services,
    pub(super) scene: Rc<ListScene>,
    pub(super) journal: Journal,
}

impl Fixture {
    pub(super) fn new() -> Self {
        let manager = GameManager::new();
        let services = manager.services();
        Self {
            manager,
            services,
            scene: ListScene::shared("fixture"),
            journal: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub(super) fn scene_ref(&self) -> SceneRef {
        self.scene.clone()
    }

    pub(super) fn spawn(&self, name: &str) -> GameObjectRef {
        GameObject::new_in_scene(&self.services, Some(&self.scene_ref()), name, "")
    }

    pub(super) fn recorder(&self, name: &str) -> Recorder {
        Recorder::new(name, &self.journal)
    }

    /// Component names that received `hook`, in order
    pub(super) fn hooks(&self, hook: &str) -> Vec<String> {
        let suffix = format!(":{hook}");
        self.journal
            .borrow()
            .iter()
            .filter_map(|line| line.strip_suffix(&suffix))
            .map(str::to_string)
            .collect()
    }

    pub(super) fn clear_journal(&self) {
        self.journal.borrow_mut().clear();
    }
}
