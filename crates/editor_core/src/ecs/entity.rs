//! Entity implementation

/// Entity identifier
///
/// A pure key: entities carry no payload, and two entities are equal iff
/// their ids match. Id 0 is reserved for the null/invalid sentinel, so
/// `Entity::default()` is never a live entity. [`Scene`](super::Scene) is the
/// sole allocation authority; destroyed ids are never handed out again, which
/// keeps id-only equality safe against stale handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Entity {
    id: u32,
}

impl Entity {
    /// The null entity, used as an "invalid/none" sentinel throughout the editor
    pub const NULL: Entity = Entity { id: 0 };

    /// Create a new entity with the given ID
    pub(super) fn new(id: u32) -> Self {
        Self { id }
    }

    /// Get the entity ID
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Whether this is the null sentinel
    pub fn is_null(&self) -> bool {
        self.id == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_null() {
        assert_eq!(Entity::default(), Entity::NULL);
        assert!(Entity::default().is_null());
    }

    #[test]
    fn test_equality_is_id_only() {
        assert_eq!(Entity::new(7), Entity::new(7));
        assert_ne!(Entity::new(7), Entity::new(8));
        assert!(!Entity::new(1).is_null());
    }
}
