//! Collision payloads delivered by an external physics pass

use super::ObjectId;
use crate::foundation::math::Vec3;

/// Contact data handed to collision and trigger hooks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// The object on the other side of the contact
    pub other: ObjectId,
    /// Contact normal pointing away from the other object
    pub normal: Vec3,
    /// Overlap depth along the normal (0.0 for triggers)
    pub penetration: f32,
}

impl CollisionInfo {
    /// Contact with another object
    pub const fn new(other: ObjectId, normal: Vec3, penetration: f32) -> Self {
        Self {
            other,
            normal,
            penetration,
        }
    }

    /// Trigger overlap, which carries no physical response
    pub fn trigger(other: ObjectId) -> Self {
        Self::new(other, Vec3::zeros(), 0.0)
    }
}

/// Which of the six contact hooks to fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionEvent {
    /// First frame of a solid contact
    CollisionEnter,
    /// Ongoing solid contact
    CollisionStay,
    /// Solid contact ended
    CollisionExit,
    /// First frame of a trigger overlap
    TriggerEnter,
    /// Ongoing trigger overlap
    TriggerStay,
    /// Trigger overlap ended
    TriggerExit,
}

impl CollisionEvent {
    /// All events in hook declaration order
    pub const ALL: [Self; 6] = [
        Self::CollisionEnter,
        Self::CollisionStay,
        Self::CollisionExit,
        Self::TriggerEnter,
        Self::TriggerStay,
        Self::TriggerExit,
    ];

    /// Trigger events carry no physical response
    pub const fn is_trigger(self) -> bool {
        matches!(self, Self::TriggerEnter | Self::TriggerStay | Self::TriggerExit)
    }
}
