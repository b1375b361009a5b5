//! Lifecycle state shared by objects and components
//!
//! Both sides follow the same chain:
//! Uninitialized -> Initializing -> Initialized -> Releasing -> Released.
//! Any other step is a contract violation.

use super::contract::{self, ContractViolation};

/// Current position in the initialize/release chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleStatus {
    /// Constructed, nothing run yet
    #[default]
    Uninitialized,
    /// Initialization cascade in progress
    Initializing,
    /// Live; eligible for dispatch
    Initialized,
    /// Release cascade in progress
    Releasing,
    /// Terminal
    Released,
}

impl LifecycleStatus {
    /// The only status that may follow this one, if any
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Uninitialized => Some(Self::Initializing),
            Self::Initializing => Some(Self::Initialized),
            Self::Initialized => Some(Self::Releasing),
            Self::Releasing => Some(Self::Released),
            Self::Released => None,
        }
    }

    /// Check whether `next` is the legal successor of this status
    pub fn can_transition_to(self, next: Self) -> bool {
        self.successor() == Some(next)
    }

    /// Validate a step, returning the new status
    pub fn transition(self, next: Self) -> Result<Self, ContractViolation> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ContractViolation::IllegalTransition { from: self, to: next })
        }
    }

    /// Initialization finished and release not started
    pub const fn is_initialized(self) -> bool {
        matches!(self, Self::Initialized)
    }

    /// Release cascade in progress
    pub const fn is_releasing(self) -> bool {
        matches!(self, Self::Releasing)
    }

    /// Terminal state reached
    pub const fn is_released(self) -> bool {
        matches!(self, Self::Released)
    }

    /// Releasing or released
    pub const fn is_going_away(self) -> bool {
        matches!(self, Self::Releasing | Self::Released)
    }
}

/// Status tracker for concrete components
///
/// Components embed one of these and drive it from their `initialize` and
/// `release` hooks so that they obey the same transition rules as objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentLifecycle {
    status: LifecycleStatus,
}

impl ComponentLifecycle {
    /// Start Uninitialized
    pub const fn new() -> Self {
        Self {
            status: LifecycleStatus::Uninitialized,
        }
    }

    /// Current status
    pub const fn status(&self) -> LifecycleStatus {
        self.status
    }

    /// Fully initialized and not releasing
    pub const fn is_initialized(&self) -> bool {
        self.status.is_initialized()
    }

    /// Advance one step; an illegal step is fatal
    #[track_caller]
    pub fn advance(&mut self, next: LifecycleStatus) {
        match self.status.transition(next) {
            Ok(status) => self.status = status,
            Err(violation) => contract::fail(violation),
        }
    }

    /// Run `body` between Initializing and Initialized
    #[track_caller]
    pub fn initialize_with<R>(&mut self, body: impl FnOnce() -> R) -> R {
        self.advance(LifecycleStatus::Initializing);
        let result = body();
        self.advance(LifecycleStatus::Initialized);
        result
    }

    /// Run `body` between Releasing and Released
    #[track_caller]
    pub fn release_with<R>(&mut self, body: impl FnOnce() -> R) -> R {
        self.advance(LifecycleStatus::Releasing);
        let result = body();
        self.advance(LifecycleStatus::Released);
        result
    }
}
