//! Flat list scene
//!
//! Linear storage with no partitioning. Placement hints are stored and can be
//! queried but do not affect ordering.

use super::Scene;
use crate::object::{GameObject, GameObjectRef, ObjectId};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

struct SceneEntry {
    id: ObjectId,
    quad_index: String,
    object: Weak<GameObject>,
}

/// Simplest scene: one vector of weak entries
pub struct ListScene {
    name: String,
    entries: RefCell<Vec<SceneEntry>>,
}

impl ListScene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Create an empty scene behind a shared handle
    pub fn shared(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self::new(name))
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an object with this id is placed here and still alive
    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|entry| entry.id == id && entry.object.strong_count() > 0)
    }

    /// Live objects in insertion order
    pub fn objects(&self) -> Vec<GameObjectRef> {
        self.entries
            .borrow()
            .iter()
            .filter_map(|entry| entry.object.upgrade())
            .collect()
    }

    /// Live objects placed with `quad_index`
    pub fn objects_in(&self, quad_index: &str) -> Vec<GameObjectRef> {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.quad_index == quad_index)
            .filter_map(|entry| entry.object.upgrade())
            .collect()
    }

    /// Placement hint recorded for `id`
    pub fn quad_index_of(&self, id: ObjectId) -> Option<String> {
        self.entries
            .borrow()
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.quad_index.clone())
    }

    /// Number of live objects
    pub fn object_count(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.object.strong_count() > 0)
            .count()
    }

    /// Drop entries whose objects are gone; returns how many were removed
    pub fn prune(&self) -> usize {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|entry| entry.object.strong_count() > 0);
        before - entries.len()
    }

    /// Forget every object without releasing it
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl Scene for ListScene {
    fn add_game_object(&self, object: &GameObjectRef, quad_index: &str) {
        let mut entries = self.entries.borrow_mut();
        let id = object.id();
        if let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) {
            entry.quad_index = quad_index.to_string();
            entry.object = Rc::downgrade(object);
            return;
        }
        entries.push(SceneEntry {
            id,
            quad_index: quad_index.to_string(),
            object: Rc::downgrade(object),
        });
        log::trace!("scene {:?} placed object {id} at {quad_index:?}", self.name);
    }

    fn remove_game_object(&self, object: &GameObject) {
        let id = object.id();
        self.entries.borrow_mut().retain(|entry| entry.id != id);
        log::trace!("scene {:?} removed object {id}", self.name);
    }
}
