//! Collider shape variants
//!
//! Shapes keep their offsets relative to the owning entity and recompute
//! their world-space bounds from the entity's transform once per frame.

use crate::foundation::math::{Transform, Vec2};

/// Axis-aligned box collider
///
/// The owning transform's orientation is ignored: boxes are always tested as
/// axis-aligned, so a rotated entity keeps its unrotated bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShape {
    /// Offset from the entity's position, added to it
    pub position_offset: Vec2,
    /// Per-axis multiplier applied to the entity's scale
    pub scale_offset: Vec2,
    /// World-space center
    pub center: Vec2,
    /// World-space width and height
    pub scale: Vec2,
    /// Bottom-left corner
    pub min: Vec2,
    /// Top-right corner
    pub max: Vec2,
}

impl Default for BoxShape {
    fn default() -> Self {
        Self {
            position_offset: Vec2::zeros(),
            scale_offset: Vec2::new(1.0, 1.0),
            center: Vec2::zeros(),
            scale: Vec2::zeros(),
            min: Vec2::zeros(),
            max: Vec2::zeros(),
        }
    }
}

impl BoxShape {
    /// Recompute center, extents and corners from the entity transform
    pub fn update(&mut self, position: Vec2, scale: Vec2) {
        self.center = position + self.position_offset;
        self.scale = scale.component_mul(&self.scale_offset).abs();
        self.min = self.center - self.scale * 0.5;
        self.max = self.center + self.scale * 0.5;
    }

    /// Half of the box's width and height
    pub fn half_extents(&self) -> Vec2 {
        self.scale * 0.5
    }

    /// Build an up-to-date box directly from a center and full size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let mut shape = Self::default();
        shape.update(center, size);
        shape
    }
}

/// Circle collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleShape {
    /// Offset from the entity's position, added to it
    pub position_offset: Vec2,
    /// Multiplier applied to the radius derived from the entity's scale
    pub scale_offset: f32,
    /// World-space center
    pub center: Vec2,
    /// World-space radius, never negative
    pub radius: f32,
}

impl Default for CircleShape {
    fn default() -> Self {
        Self {
            position_offset: Vec2::zeros(),
            scale_offset: 1.0,
            center: Vec2::zeros(),
            radius: 0.0,
        }
    }
}

impl CircleShape {
    /// Recompute center and radius from the entity transform
    ///
    /// The radius is half of the entity's width.
    pub fn update(&mut self, position: Vec2, scale: Vec2) {
        self.center = position + self.position_offset;
        self.radius = (scale.x.abs() * 0.5 * self.scale_offset).max(0.0);
    }

    /// Build an up-to-date circle directly from a center and radius
    pub fn from_center_radius(center: Vec2, radius: f32) -> Self {
        let mut shape = Self::default();
        shape.update(center, Vec2::new(radius * 2.0, radius * 2.0));
        shape
    }
}

/// The shape held by a collider: exactly one box or one circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Axis-aligned box
    Box(BoxShape),
    /// Circle
    Circle(CircleShape),
}

impl ColliderShape {
    /// Recompute world-space bounds from the owning transform
    pub fn update(&mut self, transform: &Transform) {
        match self {
            Self::Box(shape) => shape.update(transform.position, transform.scale),
            Self::Circle(shape) => shape.update(transform.position, transform.scale),
        }
    }

    /// World-space axis-aligned bounds as `(min, max)`
    pub fn bounds(&self) -> (Vec2, Vec2) {
        match self {
            Self::Box(shape) => (shape.min, shape.max),
            Self::Circle(shape) => {
                let extent = Vec2::new(shape.radius, shape.radius);
                (shape.center - extent, shape.center + extent)
            }
        }
    }

    /// World-space center
    pub fn center(&self) -> Vec2 {
        match self {
            Self::Box(shape) => shape.center,
            Self::Circle(shape) => shape.center,
        }
    }

    /// Whether this is a circle
    pub fn is_circle(&self) -> bool {
        matches!(self, Self::Circle(_))
    }
}
