//! Reentrancy guard for the component sequence
//!
//! Not a mutex: dispatch is single-threaded. While the guard is held, adds
//! and removes are redirected into the pending queues instead of touching
//! the sequence being iterated.

use std::cell::Cell;

/// Scoped hold on an object's component lock
///
/// Dropping the guard restores the flag to what it was on acquisition, so a
/// nested dispatch on the same object does not unlock the outer one, and a
/// panicking hook still unlocks on the way out.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct ComponentsLock<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl<'a> ComponentsLock<'a> {
    /// Set `flag` until the returned guard is dropped
    pub fn acquire(flag: &'a Cell<bool>) -> Self {
        let previous = flag.replace(true);
        Self { flag, previous }
    }
}

impl Drop for ComponentsLock<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}
