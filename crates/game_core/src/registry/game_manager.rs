//! Registry and frame driver

use super::{Registry, Services};
use crate::config::{FrameConfig, ObjectConfig};
use crate::foundation::time::FrameClock;
use crate::object::{CollisionEvent, CollisionInfo, GameObject, GameObjectRef, ObjectCounters, ObjectId};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Owns every registered object and drives their frames
///
/// Objects are kept alive by the manager until they release themselves (or
/// are discarded by [`release_all`](Self::release_all)).
pub struct GameManager {
    next_id: Cell<u64>,
    attached: RefCell<BTreeMap<ObjectId, GameObjectRef>>,
    counters: Rc<ObjectCounters>,
    defaults: ObjectConfig,
    clock: RefCell<FrameClock>,
}

impl GameManager {
    /// Create a manager with default object settings
    pub fn new() -> Rc<Self> {
        Self::with_defaults(ObjectConfig::default())
    }

    /// Create a manager whose objects start from `defaults`
    pub fn with_defaults(defaults: ObjectConfig) -> Rc<Self> {
        Rc::new(Self {
            next_id: Cell::new(0),
            attached: RefCell::new(BTreeMap::new()),
            counters: Rc::new(ObjectCounters::new()),
            defaults,
            clock: RefCell::new(FrameClock::new()),
        })
    }

    /// Construction services backed by this manager
    pub fn services(self: &Rc<Self>) -> Services {
        let registry: Rc<dyn Registry> = Rc::clone(self) as Rc<dyn Registry>;
        Services::new(registry, Rc::clone(&self.counters), self.defaults.clone())
    }

    /// Counters shared with every object this manager created
    pub fn counters(&self) -> &Rc<ObjectCounters> {
        &self.counters
    }

    /// Look up a registered object
    pub fn get(&self, id: ObjectId) -> Option<GameObjectRef> {
        self.attached.borrow().get(&id).cloned()
    }

    /// Registered objects in id order
    pub fn objects(&self) -> Vec<GameObjectRef> {
        self.attached.borrow().values().cloned().collect()
    }

    /// Registered objects named `name`
    pub fn find_by_name(&self, name: &str) -> Vec<GameObjectRef> {
        self.attached
            .borrow()
            .values()
            .filter(|object| object.name() == name)
            .cloned()
            .collect()
    }

    /// Number of registered objects
    pub fn object_count(&self) -> usize {
        self.attached.borrow().len()
    }

    /// Frames driven so far
    pub fn frame_count(&self) -> u64 {
        self.clock.borrow().frame_count()
    }

    /// Simulated seconds driven so far
    pub fn total_time(&self) -> f32 {
        self.clock.borrow().total_time()
    }

    /// Drive one frame over the objects registered when it starts
    ///
    /// Phases run across all objects before the next begins: resolve,
    /// message delivery, physics, update, render. Objects created during the
    /// frame join on the next one.
    pub fn run_frame(&self, delta: f32) {
        let objects = self.objects();
        let now = f64::from(self.total_time() + delta);

        for object in &objects {
            object.resolve_locked_tasks();
        }
        for object in &objects {
            object.dispatch_messages(now);
        }
        for object in &objects {
            object.update_physics(delta);
        }
        for object in &objects {
            object.update(delta);
        }
        for object in &objects {
            object.render();
        }

        self.clock.borrow_mut().advance(delta);
        log::trace!("frame {} done, {} objects", self.frame_count(), self.object_count());
    }

    /// Drive frames at the configured fixed step
    ///
    /// Stops after `max_frames`, or once no objects remain. Returns the
    /// number of frames run.
    pub fn run(&self, config: &FrameConfig) -> u64 {
        let mut frames = 0;
        while config.max_frames.map_or(true, |max| frames < max) && self.object_count() > 0 {
            self.run_frame(config.fixed_delta);
            frames += 1;
        }
        log::info!("ran {frames} frames ({:.2}s simulated)", self.total_time());
        frames
    }

    /// Deliver a contact event to one object; false when it is not registered
    pub fn dispatch_collision(&self, id: ObjectId, event: CollisionEvent, info: &CollisionInfo) -> bool {
        let Some(object) = self.get(id) else {
            return false;
        };
        object.dispatch_collision(event, info);
        true
    }

    /// Release every initialized object and drop the rest
    ///
    /// An object that is mid-dispatch only gets its release deferred; it stays
    /// registered until its next `resolve_locked_tasks`.
    pub fn release_all(&self) {
        let objects = self.objects();
        let count = objects.len();
        for object in objects {
            if object.is_initialized() {
                object.release();
            } else {
                self.detach(&object);
            }
        }
        log::debug!("released {count} objects");
    }
}

impl Registry for GameManager {
    fn new_id(&self) -> ObjectId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        ObjectId::new(id)
    }

    fn attach(&self, object: &GameObjectRef) {
        self.attached.borrow_mut().insert(object.id(), Rc::clone(object));
    }

    fn detach(&self, object: &GameObject) {
        let removed = self.attached.borrow_mut().remove(&object.id());
        drop(removed);
    }
}
