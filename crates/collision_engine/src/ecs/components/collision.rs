//! Collider component for ECS
//!
//! One collider per entity that can collide. The shape is refreshed from the
//! entity's transform every frame by the collision manager.

use crate::ecs::Entity;
use crate::physics::collision::{BoxShape, CircleShape, ColliderShape};
use crate::physics::collision_layers::LayerIndex;
use std::collections::HashSet;

/// Component that marks an entity as taking part in collision detection
#[derive(Debug, Clone)]
pub struct Collider {
    /// The collision shape (box or circle)
    pub shape: ColliderShape,

    /// Is this a trigger volume (generates events but no physical response)?
    pub is_trigger: bool,

    /// Collision layer index in `0..TOTAL_COLLISION_LAYERS`
    pub layer: LayerIndex,

    /// Entities already found intersecting this collider in the current frame
    pub(crate) collision_checked: HashSet<Entity>,
}

impl Collider {
    /// Create a new collider with default settings
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            is_trigger: false,
            layer: 0,
            collision_checked: HashSet::new(),
        }
    }

    /// Create a box collider that matches the entity's scale
    pub fn boxed() -> Self {
        Self::new(ColliderShape::Box(BoxShape::default()))
    }

    /// Create a circle collider sized from the entity's width
    pub fn circle() -> Self {
        Self::new(ColliderShape::Circle(CircleShape::default()))
    }

    /// Put the collider on a specific layer
    pub fn with_layer(mut self, layer: LayerIndex) -> Self {
        self.layer = layer;
        self
    }

    /// Mark this as a trigger volume
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Whether this collider has already intersected `other` this frame
    pub fn has_checked(&self, other: Entity) -> bool {
        self.collision_checked.contains(&other)
    }

    /// Clear per-frame data (called by the collision manager before testing)
    pub(crate) fn clear_frame_data(&mut self) {
        self.collision_checked.clear();
    }
}
