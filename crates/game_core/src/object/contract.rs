//! Contract violations
//!
//! A broken lifecycle precondition is a programming error, not a runtime
//! condition the caller can handle. Every such check funnels through
//! [`fail`], which logs the violation and panics with its message.

use super::lifecycle::LifecycleStatus;
use super::ObjectId;
use thiserror::Error;

/// A broken precondition of the object/component state machine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    /// A lifecycle transition outside the legal chain
    #[error("illegal lifecycle transition {from:?} -> {to:?}")]
    IllegalTransition {
        /// Status before the attempted transition
        from: LifecycleStatus,
        /// Requested status
        to: LifecycleStatus,
    },

    /// `initialize` on an object that is not Uninitialized
    #[error("object {id} cannot initialize from {status:?}")]
    AlreadyInitialized {
        /// Offending object
        id: ObjectId,
        /// Status at the time of the call
        status: LifecycleStatus,
    },

    /// `release` on an object that is not Initialized
    #[error("object {id} cannot release from {status:?}")]
    NotReleasable {
        /// Offending object
        id: ObjectId,
        /// Status at the time of the call
        status: LifecycleStatus,
    },

    /// Replacing the default transform after the object left Uninitialized
    #[error("object {id} cannot replace its transform while {status:?}")]
    TransformLocked {
        /// Offending object
        id: ObjectId,
        /// Status at the time of the call
        status: LifecycleStatus,
    },

    /// Scene-rooted construction without a scene
    #[error("object {name:?} requires a parent scene")]
    MissingScene {
        /// Name the object would have had
        name: String,
    },

    /// Object-parented construction without a parent
    #[error("object {name:?} requires a parent object")]
    MissingParent {
        /// Name the object would have had
        name: String,
    },

    /// Object-parented construction under a parent that no longer has a transform
    #[error("parent object {parent} has no transform to attach {name:?} to")]
    ParentWithoutTransform {
        /// Parent object id
        parent: ObjectId,
        /// Name the object would have had
        name: String,
    },

    /// A freshly constructed object did not start Uninitialized
    #[error("object {id} was constructed in {status:?}")]
    DirtyConstruction {
        /// Offending object
        id: ObjectId,
        /// Observed status
        status: LifecycleStatus,
    },
}

/// Abort the current operation with a contract violation
#[track_caller]
pub fn fail(violation: ContractViolation) -> ! {
    log::error!("contract violation: {violation}");
    panic!("contract violation: {violation}");
}

/// Abort unless `condition` holds
#[track_caller]
pub fn ensure(condition: bool, violation: impl FnOnce() -> ContractViolation) {
    if !condition {
        fail(violation());
    }
}
