//! Math utilities and types
//!
//! Provides the 2D math types used by collision detection and resolution.

pub use nalgebra::{Matrix3, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3x3 matrix type (2D homogeneous transforms)
pub type Mat3 = Matrix3<f32>;

/// Errors produced by degenerate math operations
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// The matrix has no inverse (e.g. a transform with zero scale)
    #[error("matrix is singular and cannot be inverted")]
    SingularMatrix,
}

/// Transform representing position, orientation, and scale of a 2D entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World position
    pub position: Vec2,

    /// Width and height of the entity
    pub scale: Vec2,

    /// Rotation in radians, counter-clockwise
    pub orientation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            scale: Vec2::new(1.0, 1.0),
            orientation: 0.0,
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and scale
    pub fn from_position_scale(position: Vec2, scale: Vec2) -> Self {
        Self {
            position,
            scale,
            ..Default::default()
        }
    }

    /// Convert to a homogeneous transformation matrix (translate * rotate * scale)
    pub fn to_matrix(&self) -> Mat3 {
        let (sin, cos) = self.orientation.sin_cos();
        Mat3::new(
            cos * self.scale.x, -sin * self.scale.y, self.position.x,
            sin * self.scale.x, cos * self.scale.y, self.position.y,
            0.0, 0.0, 1.0,
        )
    }

    /// Get the inverse transformation matrix
    ///
    /// Returns [`MathError::SingularMatrix`] when the transform collapses an
    /// axis (zero scale), rather than producing infinities.
    pub fn inverse_matrix(&self) -> Result<Mat3, MathError> {
        self.to_matrix()
            .try_inverse()
            .ok_or(MathError::SingularMatrix)
    }

    /// Map a world-space point into this transform's local space
    pub fn world_to_local(&self, point: Vec2) -> Result<Vec2, MathError> {
        let local = self.inverse_matrix()? * point.push(1.0);
        Ok(Vec2::new(local.x, local.y))
    }
}

/// Normalize a vector, returning `None` for zero-length input
pub fn safe_normalize(vector: Vec2) -> Option<Vec2> {
    vector.try_normalize(f32::EPSILON)
}

/// Math utility functions
pub mod utils {
    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }
}
