//! Allocation counters for objects
//!
//! Injected into every object through [`Services`](crate::registry::Services)
//! instead of living in process-wide statics, so each test or world sees its
//! own totals.

use std::cell::Cell;

/// Created / deleted totals for one world
#[derive(Debug, Default)]
pub struct ObjectCounters {
    created: Cell<u64>,
    deleted: Cell<u64>,
    unreleased_drops: Cell<u64>,
}

impl ObjectCounters {
    /// All counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a constructed object
    pub fn record_created(&self) {
        self.created.set(self.created.get() + 1);
    }

    /// Count a dropped object
    pub fn record_deleted(&self) {
        self.deleted.set(self.deleted.get() + 1);
    }

    /// Count an initialized object dropped without going through release
    pub fn record_unreleased_drop(&self) {
        self.unreleased_drops.set(self.unreleased_drops.get() + 1);
    }

    /// Objects constructed so far
    pub fn created(&self) -> u64 {
        self.created.get()
    }

    /// Objects dropped so far
    pub fn deleted(&self) -> u64 {
        self.deleted.get()
    }

    /// Initialized objects that were dropped without release
    pub fn unreleased_drops(&self) -> u64 {
        self.unreleased_drops.get()
    }

    /// Objects constructed and not yet dropped
    pub fn alive(&self) -> u64 {
        self.created.get().saturating_sub(self.deleted.get())
    }
}
