//! Entity descriptor component
//!
//! Carries the editor-facing name of an entity and whether it currently takes
//! part in the simulation.

/// Name and liveness flag of an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Display name
    pub name: String,

    /// Inactive entities are skipped by every per-frame system
    pub is_active: bool,
}

impl EntityDescriptor {
    /// Create an active descriptor with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_active: true,
        }
    }

    /// Set the active flag (builder pattern)
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

impl Default for EntityDescriptor {
    fn default() -> Self {
        Self::new("Entity")
    }
}
