//! GameObject: lifecycle state machine and component orchestration
//!
//! Objects are shared through [`GameObjectRef`] and mutate their own state
//! through `&self`, because components call back into their owner while the
//! owner is iterating them. The component sequence is protected by a
//! reentrancy flag rather than by the borrow checker: while it is set, adds,
//! removes and releases are queued and applied by the next
//! [`GameObject::resolve_locked_tasks`].

use super::collision::{CollisionEvent, CollisionInfo};
use super::component::{
    component_ref, fire_collision, is_transform, same_component, ComponentRef,
    GameObjectComponent,
};
use super::contract::{self, ContractViolation};
use super::counters::ObjectCounters;
use super::lifecycle::LifecycleStatus;
use super::lock::ComponentsLock;
use super::messenger::Messenger;
use super::transform::Transform;
use super::ObjectId;
use crate::registry::{Registry, Services};
use crate::scene::SceneRef;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Shared handle to an object
pub type GameObjectRef = Rc<GameObject>;

/// Per-object logic run from `resolve_locked_tasks` before components resolve
pub type ResolveHook = Box<dyn FnMut(&GameObject)>;

/// A component handle with its name captured when it was attached
///
/// Lookup by name reads the captured name, so it never needs to borrow a
/// component that may be running a hook. Names are treated as fixed once a
/// component is attached.
struct ComponentSlot {
    name: Option<String>,
    component: ComponentRef,
}

impl ComponentSlot {
    fn new(component: &ComponentRef) -> Self {
        let name = component.try_borrow().ok().map(|c| c.name().to_string());
        Self {
            name,
            component: Rc::clone(component),
        }
    }

    fn is_named(&self, name: &str) -> bool {
        match &self.name {
            Some(captured) => captured == name,
            None => self.component.try_borrow().is_ok_and(|c| c.name() == name),
        }
    }

    fn holds(&self, component: &ComponentRef) -> bool {
        same_component(&self.component, component)
    }
}

/// A scene entity composed of components
pub struct GameObject {
    id: ObjectId,
    name: RefCell<String>,
    parent_scene: RefCell<Option<SceneRef>>,
    registry: Weak<dyn Registry>,
    counters: Rc<ObjectCounters>,

    active: Cell<bool>,
    self_initialize: Cell<bool>,
    layer: RefCell<String>,
    status: Cell<LifecycleStatus>,

    components: RefCell<Vec<ComponentSlot>>,
    transform: RefCell<Option<ComponentRef>>,
    messenger: RefCell<Option<Messenger>>,

    components_in_lock: Cell<bool>,
    components_to_add: RefCell<Vec<ComponentRef>>,
    components_to_remove: RefCell<Vec<ComponentRef>>,
    to_release_in_next_frame: Cell<bool>,

    resolve_hook: RefCell<Option<ResolveHook>>,
}

impl GameObject {
    // ===========================================================
    // Construction
    // ===========================================================

    /// Create an object rooted in `scene` at placement hint `quad_index`
    ///
    /// A missing scene is a contract violation.
    #[track_caller]
    pub fn new_in_scene(
        services: &Services,
        scene: Option<&SceneRef>,
        name: &str,
        quad_index: &str,
    ) -> GameObjectRef {
        let Some(scene) = scene else {
            contract::fail(ContractViolation::MissingScene { name: name.to_string() });
        };

        let id = services.registry().new_id();
        let transform = component_ref(Transform::new(id, &services.defaults().transform_name));
        let object = Rc::new(Self::from_parts(services, id, name, Some(Rc::clone(scene)), transform));
        object.check_clean();

        services.registry().attach(&object);
        scene.add_game_object(&object, quad_index);
        services.counters().record_created();

        log::debug!("created object {id} {name:?} in scene at {quad_index:?}");
        object
    }

    /// Create an object whose transform is a child of `parent`'s transform
    ///
    /// The object is registered with the registry only, not with any scene.
    /// A missing parent is a contract violation.
    #[track_caller]
    pub fn new_child(services: &Services, parent: Option<&GameObject>, name: &str) -> GameObjectRef {
        let Some(parent) = parent else {
            contract::fail(ContractViolation::MissingParent { name: name.to_string() });
        };
        let Some(parent_transform) = parent.transform() else {
            contract::fail(ContractViolation::ParentWithoutTransform {
                parent: parent.id(),
                name: name.to_string(),
            });
        };

        let id = services.registry().new_id();
        let transform = component_ref(Transform::new(id, &services.defaults().transform_name));
        Transform::attach(&parent_transform, &transform);
        let object = Rc::new(Self::from_parts(services, id, name, None, transform));
        object.check_clean();

        services.registry().attach(&object);
        services.counters().record_created();

        log::debug!("created object {id} {name:?} under {}", parent.id());
        object
    }

    fn from_parts(
        services: &Services,
        id: ObjectId,
        name: &str,
        parent_scene: Option<SceneRef>,
        transform: ComponentRef,
    ) -> Self {
        let defaults = services.defaults();
        Self {
            id,
            name: RefCell::new(name.to_string()),
            parent_scene: RefCell::new(parent_scene),
            registry: Rc::downgrade(services.registry()),
            counters: Rc::clone(services.counters()),
            active: Cell::new(false),
            self_initialize: Cell::new(defaults.self_initialize),
            layer: RefCell::new(defaults.layer.clone()),
            status: Cell::new(LifecycleStatus::Uninitialized),
            components: RefCell::new(vec![ComponentSlot::new(&transform)]),
            transform: RefCell::new(Some(transform)),
            messenger: RefCell::new(Some(Messenger::new())),
            components_in_lock: Cell::new(false),
            components_to_add: RefCell::new(Vec::new()),
            components_to_remove: RefCell::new(Vec::new()),
            to_release_in_next_frame: Cell::new(false),
            resolve_hook: RefCell::new(None),
        }
    }

    #[track_caller]
    fn check_clean(&self) {
        let status = self.status();
        contract::ensure(status == LifecycleStatus::Uninitialized, || {
            ContractViolation::DirtyConstruction { id: self.id, status }
        });
    }

    // ===========================================================
    // Properties
    // ===========================================================

    /// Identifier assigned at construction
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// Current name
    pub fn name(&self) -> String {
        self.name.borrow().clone()
    }

    /// Rename the object
    pub fn set_name(&self, name: impl Into<String>) -> &Self {
        *self.name.borrow_mut() = name.into();
        self
    }

    /// Scene this object is rooted in, until it is released
    pub fn parent_scene(&self) -> Option<SceneRef> {
        self.parent_scene.borrow().clone()
    }

    /// Whether physics, update and collision dispatch run
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Enable or disable physics, update and collision dispatch
    pub fn set_active(&self, active: bool) -> &Self {
        self.active.set(active);
        self
    }

    /// Whether the first resolve pass initializes the object
    pub fn is_self_initialize(&self) -> bool {
        self.self_initialize.get()
    }

    /// Choose between lazy initialization and an explicit `initialize` call
    pub fn set_self_initialize(&self, value: bool) -> &Self {
        self.self_initialize.set(value);
        self
    }

    /// Free-form layer tag
    pub fn layer(&self) -> String {
        self.layer.borrow().clone()
    }

    /// Set the layer tag
    pub fn set_layer(&self, layer: impl Into<String>) -> &Self {
        *self.layer.borrow_mut() = layer.into();
        self
    }

    /// Current lifecycle status
    pub fn status(&self) -> LifecycleStatus {
        self.status.get()
    }

    /// Initialization finished and release not started
    pub fn is_initialized(&self) -> bool {
        self.status().is_initialized()
    }

    /// Initialization cascade in progress
    pub fn is_initializing(&self) -> bool {
        self.status() == LifecycleStatus::Initializing
    }

    /// Release cascade in progress
    pub fn is_releasing(&self) -> bool {
        self.status().is_releasing()
    }

    /// Release finished
    pub fn is_released(&self) -> bool {
        self.status().is_released()
    }

    /// The component sequence is being iterated
    pub fn is_locked(&self) -> bool {
        self.components_in_lock.get()
    }

    /// A release was requested during dispatch and waits for the next resolve
    pub fn is_release_pending(&self) -> bool {
        self.to_release_in_next_frame.get()
    }

    /// Components queued for addition
    pub fn pending_additions(&self) -> usize {
        self.components_to_add.borrow().len()
    }

    /// Components queued for removal
    pub fn pending_removals(&self) -> usize {
        self.components_to_remove.borrow().len()
    }

    #[track_caller]
    fn advance(&self, next: LifecycleStatus) {
        match self.status().transition(next) {
            Ok(status) => self.status.set(status),
            Err(violation) => contract::fail(violation),
        }
    }

    // ===========================================================
    // Lifecycle
    // ===========================================================

    /// Initialize every component that is not initialized yet, then activate
    ///
    /// Only legal from Uninitialized.
    #[track_caller]
    pub fn initialize(&self) {
        let status = self.status();
        contract::ensure(status == LifecycleStatus::Uninitialized, || {
            ContractViolation::AlreadyInitialized { id: self.id, status }
        });

        self.advance(LifecycleStatus::Initializing);

        for component in self.get_all_components() {
            let needs_init = !component.borrow().is_initialized();
            if needs_init {
                component.borrow_mut().initialize(self);
            }
        }

        self.advance(LifecycleStatus::Initialized);
        self.set_active(true);
        log::debug!("initialized object {} {:?}", self.id, self.name());
    }

    /// Release the object and everything it owns
    ///
    /// During dispatch the release is deferred to the next
    /// `resolve_locked_tasks`. Otherwise the object must be Initialized.
    #[track_caller]
    pub fn release(&self) {
        if self.is_locked() {
            self.release_in_next_frame();
            return;
        }

        let status = self.status();
        contract::ensure(status.is_initialized(), || ContractViolation::NotReleasable {
            id: self.id,
            status,
        });

        self.advance(LifecycleStatus::Releasing);

        for component in self.get_all_components() {
            component.borrow_mut().release(self);
        }

        let messenger = self.messenger.borrow_mut().take();
        if let Some(mut messenger) = messenger {
            messenger.release();
        }

        let scene = self.parent_scene.borrow_mut().take();
        if let Some(scene) = scene {
            scene.remove_game_object(self);
        }

        if let Some(registry) = self.registry.upgrade() {
            registry.detach(self);
        }

        self.advance(LifecycleStatus::Released);
        self.reclaim();
        log::debug!("released object {} {:?}", self.id, self.name());
    }

    /// Mark the object for release at the start of the next resolve pass
    #[track_caller]
    pub fn release_in_next_frame(&self) {
        let status = self.status();
        contract::ensure(status.is_initialized(), || ContractViolation::NotReleasable {
            id: self.id,
            status,
        });
        self.to_release_in_next_frame.set(true);
        log::trace!("object {} will release next frame", self.id);
    }

    /// Drop everything the object owns; runs at the end of release
    fn reclaim(&self) {
        let components = std::mem::take(&mut *self.components.borrow_mut());
        let to_add = std::mem::take(&mut *self.components_to_add.borrow_mut());
        let to_remove = std::mem::take(&mut *self.components_to_remove.borrow_mut());
        let transform = self.transform.borrow_mut().take();
        let hook = self.resolve_hook.borrow_mut().take();
        self.to_release_in_next_frame.set(false);
        self.active.set(false);
        drop((components, to_add, to_remove, transform, hook));
    }

    /// Apply work deferred from the previous frame
    ///
    /// In order: lazy initialization, pending release, queued adds, queued
    /// removes, the resolve hook, then the components' own resolve pass.
    #[track_caller]
    pub fn resolve_locked_tasks(&self) {
        if self.status().is_going_away() {
            return;
        }

        if !self.is_initialized() {
            if self.is_self_initialize() {
                self.initialize();
            } else {
                return;
            }
        }

        if self.is_release_pending() {
            self.to_release_in_next_frame.set(false);
            self.release();
            return;
        }

        self.apply_pending_components();

        self.run_resolve_hook();
        if !self.is_initialized() {
            return;
        }

        self.for_each_component_locked(|component| component.resolve_locked_tasks(self));
    }

    /// Install per-object logic for `resolve_locked_tasks`
    pub fn set_resolve_hook(&self, hook: impl FnMut(&Self) + 'static) {
        *self.resolve_hook.borrow_mut() = Some(Box::new(hook));
    }

    fn run_resolve_hook(&self) {
        let hook = self.resolve_hook.borrow_mut().take();
        if let Some(mut hook) = hook {
            hook(self);
            let mut slot = self.resolve_hook.borrow_mut();
            if slot.is_none() && self.is_initialized() {
                *slot = Some(hook);
            }
        }
    }

    fn apply_pending_components(&self) {
        let to_add = std::mem::take(&mut *self.components_to_add.borrow_mut());
        for component in &to_add {
            self.do_add_component(component);
        }

        let to_remove = std::mem::take(&mut *self.components_to_remove.borrow_mut());
        for component in &to_remove {
            self.do_remove_component(component);
        }
    }

    // ===========================================================
    // Per-frame dispatch
    // ===========================================================

    /// Fixed-step physics pass
    pub fn update_physics(&self, delta: f32) {
        self.dispatch(true, |component| component.update_physics(self, delta));
    }

    /// Per-frame logic pass
    pub fn update(&self, delta: f32) {
        self.dispatch(true, |component| component.update(self, delta));
    }

    /// Draw pass; runs for inactive objects too
    pub fn render(&self) {
        self.dispatch(false, |component| component.render(self));
    }

    /// Solid contact began
    pub fn on_collision_enter(&self, info: &CollisionInfo) {
        self.dispatch_collision(CollisionEvent::CollisionEnter, info);
    }

    /// Solid contact continues
    pub fn on_collision_stay(&self, info: &CollisionInfo) {
        self.dispatch_collision(CollisionEvent::CollisionStay, info);
    }

    /// Solid contact ended
    pub fn on_collision_exit(&self, info: &CollisionInfo) {
        self.dispatch_collision(CollisionEvent::CollisionExit, info);
    }

    /// Trigger overlap began
    pub fn on_trigger_enter(&self, info: &CollisionInfo) {
        self.dispatch_collision(CollisionEvent::TriggerEnter, info);
    }

    /// Trigger overlap continues
    pub fn on_trigger_stay(&self, info: &CollisionInfo) {
        self.dispatch_collision(CollisionEvent::TriggerStay, info);
    }

    /// Trigger overlap ended
    pub fn on_trigger_exit(&self, info: &CollisionInfo) {
        self.dispatch_collision(CollisionEvent::TriggerExit, info);
    }

    /// Route any contact event to the matching component hook
    pub fn dispatch_collision(&self, event: CollisionEvent, info: &CollisionInfo) {
        self.dispatch(true, |component| fire_collision(component, self, event, info));
    }

    fn dispatch(&self, requires_active: bool, hook: impl FnMut(&mut dyn GameObjectComponent)) {
        if !self.is_initialized() || (requires_active && !self.is_active()) {
            return;
        }
        self.for_each_component_locked(hook);
    }

    /// A component already inside one of its own hooks is skipped by nested passes
    fn for_each_component_locked(&self, mut hook: impl FnMut(&mut dyn GameObjectComponent)) {
        let _lock = ComponentsLock::acquire(&self.components_in_lock);
        for component in self.get_all_components() {
            let Ok(mut component) = component.try_borrow_mut() else {
                log::trace!("object {} skipped a busy component", self.id);
                continue;
            };
            hook(&mut *component);
        }
    }

    // ===========================================================
    // Components
    // ===========================================================

    /// Attach a component
    ///
    /// Queued while the sequence is locked. Ignored when the object is going
    /// away or the component is already attached. A transform replaces the
    /// current one, which is only legal before initialization.
    #[track_caller]
    pub fn add_component(&self, component: ComponentRef) {
        if self.is_locked() {
            self.add_component_in_next_frame(component);
            return;
        }

        if self.status().is_going_away() || self.contains_component(&component) {
            return;
        }

        self.do_add_component(&component);
    }

    fn add_component_in_next_frame(&self, component: ComponentRef) {
        if self.status().is_going_away() || self.contains_component(&component) {
            return;
        }
        log::trace!("object {} queued a component for addition", self.id);
        self.components_to_add.borrow_mut().push(component);
    }

    /// Detach a component by identity
    ///
    /// Queued while the sequence is locked. Removing the transform this way
    /// leaves the object without one in its sequence.
    pub fn remove_component(&self, component: &ComponentRef) {
        if self.is_locked() {
            self.remove_component_in_next_frame(component);
            return;
        }

        if self.status().is_going_away() {
            return;
        }

        self.do_remove_component(component);
    }

    fn remove_component_in_next_frame(&self, component: &ComponentRef) {
        if self.status().is_going_away() {
            return;
        }
        log::trace!("object {} queued a component for removal", self.id);
        self.components_to_remove.borrow_mut().push(Rc::clone(component));
    }

    #[track_caller]
    fn do_add_component(&self, component: &ComponentRef) {
        let current = self.transform();
        let replaces_transform = is_transform(component)
            && !current.as_ref().is_some_and(|t| same_component(t, component));

        if !replaces_transform {
            self.components.borrow_mut().push(ComponentSlot::new(component));
            return;
        }

        let status = self.status();
        contract::ensure(status == LifecycleStatus::Uninitialized, || {
            ContractViolation::TransformLocked { id: self.id, status }
        });

        if let Some(old) = &current {
            Transform::adopt_hierarchy(old, component);
        }
        {
            let mut components = self.components.borrow_mut();
            if let Some(old) = &current {
                components.retain(|slot| !slot.holds(old));
            }
            components.insert(0, ComponentSlot::new(component));
        }
        *self.transform.borrow_mut() = Some(Rc::clone(component));
        log::debug!("object {} replaced its transform", self.id);
    }

    fn do_remove_component(&self, component: &ComponentRef) {
        if self.is_default_component(component) {
            log::warn!("object {} removed its transform from the component sequence", self.id);
        }
        self.components.borrow_mut().retain(|slot| !slot.holds(component));
    }

    /// Whether `component` is in the live sequence
    pub fn contains_component(&self, component: &ComponentRef) -> bool {
        self.components.borrow().iter().any(|slot| slot.holds(component))
    }

    /// First component named `name`
    pub fn get_component(&self, name: &str) -> Option<ComponentRef> {
        self.components
            .borrow()
            .iter()
            .find(|slot| slot.is_named(name))
            .map(|slot| Rc::clone(&slot.component))
    }

    /// All components named `name`, in sequence order
    pub fn get_components_by_name(&self, name: &str) -> Vec<ComponentRef> {
        self.components
            .borrow()
            .iter()
            .filter(|slot| slot.is_named(name))
            .map(|slot| Rc::clone(&slot.component))
            .collect()
    }

    /// Snapshot of the live sequence
    pub fn get_all_components(&self) -> Vec<ComponentRef> {
        self.components
            .borrow()
            .iter()
            .map(|slot| Rc::clone(&slot.component))
            .collect()
    }

    /// Number of components in the live sequence
    pub fn component_count(&self) -> usize {
        self.components.borrow().len()
    }

    // ===========================================================
    // Default components
    // ===========================================================

    /// Whether `component` is the current transform
    pub fn is_default_component(&self, component: &ComponentRef) -> bool {
        self.transform.borrow().as_ref().is_some_and(|t| same_component(t, component))
    }

    /// Current transform; gone once the object is released
    pub fn transform(&self) -> Option<ComponentRef> {
        self.transform.borrow().clone()
    }

    /// Read the current transform
    pub fn with_transform<R>(&self, f: impl FnOnce(&Transform) -> R) -> Option<R> {
        let transform = self.transform()?;
        let component = transform.borrow();
        let result = component.as_transform().map(f);
        result
    }

    /// Modify the current transform
    pub fn with_transform_mut<R>(&self, f: impl FnOnce(&mut Transform) -> R) -> Option<R> {
        let transform = self.transform()?;
        let mut component = transform.borrow_mut();
        let result = component.as_transform_mut().map(f);
        result
    }

    // ===========================================================
    // Messenger
    // ===========================================================

    /// Use the messenger; gone once the object is released
    ///
    /// While messages are being delivered this reaches a staging channel:
    /// sends and subscription changes made there take effect on the next
    /// delivery.
    pub fn with_messenger<R>(&self, f: impl FnOnce(&mut Messenger) -> R) -> Option<R> {
        self.messenger.borrow_mut().as_mut().map(f)
    }

    /// Deliver pending messages up to time `now`; returns the handler count
    ///
    /// The messenger is moved out of its slot for the duration, so handlers
    /// may release the object or message it again. A messenger whose object
    /// was released during delivery is released instead of put back.
    pub fn dispatch_messages(&self, now: f64) -> usize {
        let mut messenger = {
            let mut slot = self.messenger.borrow_mut();
            let Some(current) = slot.as_mut() else {
                return 0;
            };
            current.update_time(now);
            let staging = current.staging();
            std::mem::replace(current, staging)
        };

        let delivered = messenger.dispatch();

        let staged = self.messenger.borrow_mut().take();
        match staged {
            Some(staged) if !self.status().is_going_away() => {
                messenger.absorb(staged);
                *self.messenger.borrow_mut() = Some(messenger);
            }
            _ => {
                messenger.release();
                log::trace!("object {} released its messenger after delivery", self.id);
            }
        }
        delivered
    }
}

impl fmt::Debug for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameObject")
            .field("id", &self.id)
            .field("name", &*self.name.borrow())
            .field("status", &self.status())
            .field("active", &self.is_active())
            .field("components", &self.component_count())
            .finish_non_exhaustive()
    }
}

impl Drop for GameObject {
    fn drop(&mut self) {
        let status = self.status();
        if matches!(
            status,
            LifecycleStatus::Initializing | LifecycleStatus::Initialized | LifecycleStatus::Releasing
        ) {
            log::error!("object {} dropped while {status:?}; its components were never released", self.id);
            self.counters.record_unreleased_drop();
        }
        self.counters.record_deleted();
    }
}
