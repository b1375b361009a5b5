//! Object registry seam
//!
//! Every object is registered on construction and detached during release.
//! The registry also hands out ids. [`GameManager`] is the concrete registry
//! and doubles as the frame driver.

mod game_manager;

pub use game_manager::GameManager;

use crate::config::ObjectConfig;
use crate::object::{GameObject, GameObjectRef, ObjectCounters, ObjectId};
use std::rc::Rc;

/// Tracks every live object
pub trait Registry {
    /// Next unused object id
    fn new_id(&self) -> ObjectId;

    /// Start tracking `object`
    fn attach(&self, object: &GameObjectRef);

    /// Stop tracking `object`; unknown objects are ignored
    fn detach(&self, object: &GameObject);
}

/// Everything an object needs from its world, injected at construction
#[derive(Clone)]
pub struct Services {
    registry: Rc<dyn Registry>,
    counters: Rc<ObjectCounters>,
    defaults: ObjectConfig,
}

impl Services {
    /// Bundle a registry, counters and construction defaults
    pub fn new(registry: Rc<dyn Registry>, counters: Rc<ObjectCounters>, defaults: ObjectConfig) -> Self {
        Self {
            registry,
            counters,
            defaults,
        }
    }

    /// Registry objects attach to
    pub fn registry(&self) -> &Rc<dyn Registry> {
        &self.registry
    }

    /// Shared created / deleted counters
    pub fn counters(&self) -> &Rc<ObjectCounters> {
        &self.counters
    }

    /// Defaults applied to new objects
    pub fn defaults(&self) -> &ObjectConfig {
        &self.defaults
    }
}
