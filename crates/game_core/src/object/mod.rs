//! GameObjects and their components
//!
//! An object is a named, identified bag of components with a five-state
//! lifecycle:
//!
//! ```text
//! Uninitialized ─▶ Initializing ─▶ Initialized ─▶ Releasing ─▶ Released
//! ```
//!
//! Every lifecycle and per-frame call on an object fans out to its components
//! in sequence order, transform first. Structural changes requested while the
//! object is fanning out are deferred to the next
//! [`GameObject::resolve_locked_tasks`].

mod collision;
mod component;
mod contract;
mod counters;
mod game_object;
mod id;
mod lifecycle;
mod lock;
mod messenger;
mod transform;

pub use collision::{CollisionEvent, CollisionInfo};
pub use component::{
    component_ref, is_transform, same_component, ComponentRef, GameObjectComponent, WeakComponentRef,
};
pub use contract::ContractViolation;
pub use counters::ObjectCounters;
pub use game_object::{GameObject, GameObjectRef, ResolveHook};
pub use id::ObjectId;
pub use lifecycle::{ComponentLifecycle, LifecycleStatus};
pub use lock::ComponentsLock;
pub use messenger::{Message, MessageArg, MessageHandler, Messenger, SubscriptionId};
pub use transform::Transform;

#[cfg(test)]
mod tests;
