//! Object identifiers

use std::fmt;

/// Process-unique object identifier, handed out in ascending order by a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    id: u64,
}

impl ObjectId {
    /// Create an identifier from its raw value
    pub const fn new(id: u64) -> Self {
        Self { id }
    }

    /// Get the raw identifier value
    pub const fn id(self) -> u64 {
        self.id
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_order_by_value() {
        assert!(ObjectId::new(1) < ObjectId::new(2));
        assert_eq!(ObjectId::new(3).id(), 3);
        assert_eq!(ObjectId::new(3).to_string(), "#3");
    }
}
