//! The component capability set
//!
//! A [`GameObject`] fans every lifecycle and per-frame call out to its
//! components through this trait. Concrete kinds (sprites, bodies, scripts)
//! live outside this crate; [`Transform`] is the one kind the core knows.
//!
//! Hooks receive the owning object so a component can look up siblings, post
//! messages, or request structural changes. Requests made while the object is
//! dispatching are queued until the next `resolve_locked_tasks`.

use super::collision::{CollisionEvent, CollisionInfo};
use super::game_object::GameObject;
use super::lifecycle::LifecycleStatus;
use super::transform::Transform;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Shared handle to a component; identity is the allocation
pub type ComponentRef = Rc<RefCell<dyn GameObjectComponent>>;

/// Non-owning handle to a component
pub type WeakComponentRef = Weak<RefCell<dyn GameObjectComponent>>;

/// Behaviour unit attached to a [`GameObject`]
pub trait GameObjectComponent: 'static {
    /// Lookup name; not required to be unique
    fn name(&self) -> &str;

    /// Current lifecycle status
    fn status(&self) -> LifecycleStatus;

    /// Initialized and not releasing
    fn is_initialized(&self) -> bool {
        self.status().is_initialized()
    }

    /// Called once from the owner's initialize cascade (or by the component itself)
    fn initialize(&mut self, object: &GameObject);

    /// Called once from the owner's release cascade
    fn release(&mut self, object: &GameObject);

    /// Fixed-step physics update
    fn update_physics(&mut self, _object: &GameObject, _delta: f32) {}

    /// Per-frame logic update
    fn update(&mut self, _object: &GameObject, _delta: f32) {}

    /// Per-frame draw submission
    fn render(&mut self, _object: &GameObject) {}

    /// Solid contact began
    fn on_collision_enter(&mut self, _object: &GameObject, _info: &CollisionInfo) {}

    /// Solid contact continues
    fn on_collision_stay(&mut self, _object: &GameObject, _info: &CollisionInfo) {}

    /// Solid contact ended
    fn on_collision_exit(&mut self, _object: &GameObject, _info: &CollisionInfo) {}

    /// Trigger overlap began
    fn on_trigger_enter(&mut self, _object: &GameObject, _info: &CollisionInfo) {}

    /// Trigger overlap continues
    fn on_trigger_stay(&mut self, _object: &GameObject, _info: &CollisionInfo) {}

    /// Trigger overlap ended
    fn on_trigger_exit(&mut self, _object: &GameObject, _info: &CollisionInfo) {}

    /// Apply work deferred from the previous frame
    fn resolve_locked_tasks(&mut self, _object: &GameObject) {}

    /// Downcast to the transform kind
    fn as_transform(&self) -> Option<&Transform> {
        None
    }

    /// Mutable downcast to the transform kind
    fn as_transform_mut(&mut self) -> Option<&mut Transform> {
        None
    }
}

/// Wrap a component in a shared handle
pub fn component_ref<C: GameObjectComponent>(component: C) -> ComponentRef {
    Rc::new(RefCell::new(component))
}

/// Identity comparison between two handles
pub fn same_component(a: &ComponentRef, b: &ComponentRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Whether the handle holds a [`Transform`]
///
/// A component that is mutably borrowed (running a hook) reports false.
pub fn is_transform(component: &ComponentRef) -> bool {
    component
        .try_borrow()
        .is_ok_and(|c| c.as_transform().is_some())
}

/// Route a contact event to the matching hook
pub fn fire_collision(
    component: &mut dyn GameObjectComponent,
    object: &GameObject,
    event: CollisionEvent,
    info: &CollisionInfo,
) {
    match event {
        CollisionEvent::CollisionEnter => component.on_collision_enter(object, info),
        CollisionEvent::CollisionStay => component.on_collision_stay(object, info),
        CollisionEvent::CollisionExit => component.on_collision_exit(object, info),
        CollisionEvent::TriggerEnter => component.on_trigger_enter(object, info),
        CollisionEvent::TriggerStay => component.on_trigger_stay(object, info),
        CollisionEvent::TriggerExit => component.on_trigger_exit(object, info),
    }
}
