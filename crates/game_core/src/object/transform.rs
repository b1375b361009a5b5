//! Transform component
//!
//! Every object carries exactly one transform at index 0 of its component
//! sequence. Transforms form a hierarchy: an object-parented object's
//! transform is a child of its parent's transform, and world matrices are
//! composed down that chain.
//!
//! Links are non-owning in both directions. A child keeps a weak handle to
//! its parent; a parent keeps `(owner id, weak handle)` pairs for its
//! children so that a child can unlink itself without borrowing its own cell.

use super::component::{ComponentRef, GameObjectComponent, WeakComponentRef};
use super::game_object::GameObject;
use super::lifecycle::{ComponentLifecycle, LifecycleStatus};
use super::ObjectId;
use crate::foundation::math::{trs_matrix, Mat4, Quat, Vec3};
use std::rc::Rc;

/// Hierarchical position, rotation and scale of an object
#[derive(Debug)]
pub struct Transform {
    name: String,
    owner: ObjectId,
    lifecycle: ComponentLifecycle,

    /// Position relative to the parent (Y-up right-handed)
    position: Vec3,
    /// Rotation relative to the parent
    rotation: Quat,
    /// Scale relative to the parent
    scale: Vec3,

    parent: Option<(ObjectId, WeakComponentRef)>,
    children: Vec<(ObjectId, WeakComponentRef)>,
}

impl Transform {
    /// Identity transform with no parent
    pub fn new(owner: ObjectId, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner,
            lifecycle: ComponentLifecycle::new(),
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Builder pattern: Set position
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set rotation
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set scale
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Object this transform was created for
    pub const fn owner(&self) -> ObjectId {
        self.owner
    }

    /// Local position
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Set local position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Move by `offset` in parent space
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Local rotation
    pub const fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Set local rotation
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    /// Local scale
    pub const fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set local scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Parent-relative matrix
    pub fn local_matrix(&self) -> Mat4 {
        trs_matrix(&self.position, &self.rotation, &self.scale)
    }

    /// Matrix from local space to world space
    pub fn world_matrix(&self) -> Mat4 {
        let local = self.local_matrix();
        match self.parent() {
            Some(parent) => {
                let parent = parent.borrow();
                parent
                    .as_transform()
                    .map_or(local, |transform| transform.world_matrix() * local)
            }
            None => local,
        }
    }

    /// World-space position of the origin
    pub fn world_position(&self) -> Vec3 {
        let m = self.world_matrix();
        Vec3::new(m.m14, m.m24, m.m34)
    }

    /// Parent transform, if it is still alive
    pub fn parent(&self) -> Option<ComponentRef> {
        self.parent.as_ref().and_then(|(_, weak)| weak.upgrade())
    }

    /// Owner of the parent transform
    pub fn parent_owner(&self) -> Option<ObjectId> {
        self.parent.as_ref().map(|(id, _)| *id)
    }

    /// No parent
    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Live child transforms in attachment order
    pub fn children(&self) -> Vec<ComponentRef> {
        self.children.iter().filter_map(|(_, weak)| weak.upgrade()).collect()
    }

    /// Owners of live child transforms
    pub fn child_owners(&self) -> Vec<ObjectId> {
        self.children
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Number of live children
    pub fn child_count(&self) -> usize {
        self.children.iter().filter(|(_, weak)| weak.strong_count() > 0).count()
    }

    /// Make `child` a child of `parent`, unlinking it from any previous parent
    ///
    /// Both handles must hold transforms; anything else is ignored.
    pub fn attach(parent: &ComponentRef, child: &ComponentRef) {
        if Rc::ptr_eq(parent, child) {
            return;
        }
        Self::detach(child);

        let Some(parent_owner) = parent.borrow().as_transform().map(Self::owner) else {
            return;
        };
        let child_owner = {
            let mut child_ref = child.borrow_mut();
            let Some(transform) = child_ref.as_transform_mut() else {
                return;
            };
            transform.parent = Some((parent_owner, Rc::downgrade(parent)));
            transform.owner
        };
        if let Some(transform) = parent.borrow_mut().as_transform_mut() {
            transform.children.push((child_owner, Rc::downgrade(child)));
        }
    }

    /// Unlink `child` from its parent
    pub fn detach(child: &ComponentRef) {
        let (owner, parent) = {
            let mut child_ref = child.borrow_mut();
            let Some(transform) = child_ref.as_transform_mut() else {
                return;
            };
            (transform.owner, transform.parent.take())
        };
        if let Some(parent) = parent.and_then(|(_, weak)| weak.upgrade()) {
            if let Some(transform) = parent.borrow_mut().as_transform_mut() {
                transform.children.retain(|(id, _)| *id != owner);
            }
        }
    }

    /// Move the parent link and all children from `old` to `new`
    ///
    /// Used when an object swaps its default transform before initialization.
    pub fn adopt_hierarchy(old: &ComponentRef, new: &ComponentRef) {
        if Rc::ptr_eq(old, new) {
            return;
        }
        let parent = old.borrow().as_transform().and_then(Self::parent);
        let children = old.borrow().as_transform().map(Self::children).unwrap_or_default();

        Self::detach(old);
        if let Some(parent) = parent {
            Self::attach(&parent, new);
        }
        for child in &children {
            Self::attach(new, child);
        }
    }
}

impl GameObjectComponent for Transform {
    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> LifecycleStatus {
        self.lifecycle.status()
    }

    fn initialize(&mut self, _object: &GameObject) {
        self.lifecycle.initialize_with(|| ());
    }

    fn release(&mut self, _object: &GameObject) {
        let owner = self.owner;
        let parent = self.parent.take();
        let children = std::mem::take(&mut self.children);

        self.lifecycle.release_with(|| {
            if let Some(parent) = parent.and_then(|(_, weak)| weak.upgrade()) {
                if let Some(transform) = parent.borrow_mut().as_transform_mut() {
                    transform.children.retain(|(id, _)| *id != owner);
                }
            }
            // Children outlive this transform as roots.
            for child in children.iter().filter_map(|(_, weak)| weak.upgrade()) {
                if let Some(transform) = child.borrow_mut().as_transform_mut() {
                    transform.parent = None;
                }
            }
        });
    }

    fn as_transform(&self) -> Option<&Transform> {
        Some(self)
    }

    fn as_transform_mut(&mut self) -> Option<&mut Transform> {
        Some(self)
    }
}
