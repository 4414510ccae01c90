//! Primitive collision types
//!
//! Contact data produced by the narrow phase and the line segment helper used
//! by circle-versus-box edge tests.

use crate::foundation::math::{safe_normalize, Vec2};

/// Where and how deeply two shapes overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit separation direction, pointing from the second shape towards the first
    pub normal: Vec2,
    /// World-space point of contact
    pub intersection_point: Vec2,
    /// Overlap distance along `normal`, never negative
    pub penetration_depth: f32,
}

impl Contact {
    /// Create a new contact
    pub fn new(normal: Vec2, intersection_point: Vec2, penetration_depth: f32) -> Self {
        Self {
            normal,
            intersection_point,
            penetration_depth: penetration_depth.max(0.0),
        }
    }

    /// The same contact seen from the other shape
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            ..*self
        }
    }
}

/// A line segment with a precomputed unit normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Start point
    pub point0: Vec2,
    /// End point
    pub point1: Vec2,
    /// `point1 - point0`
    pub line_vec: Vec2,
    /// Unit normal, `line_vec` rotated clockwise; zero for a degenerate segment
    pub normal: Vec2,
}

impl LineSegment {
    /// Creates a new segment between two points
    pub fn new(point0: Vec2, point1: Vec2) -> Self {
        let line_vec = point1 - point0;
        let normal = safe_normalize(Vec2::new(line_vec.y, -line_vec.x)).unwrap_or_else(Vec2::zeros);
        Self {
            point0,
            point1,
            line_vec,
            normal,
        }
    }

    /// Signed distance from a point to the segment's infinite line
    pub fn signed_distance(&self, point: Vec2) -> f32 {
        (point - self.point0).dot(&self.normal)
    }

    /// Projection parameter of a point along the segment (0 at `point0`, 1 at `point1`)
    ///
    /// Returns `None` for a zero-length segment.
    pub fn projection(&self, point: Vec2) -> Option<f32> {
        let length_squared = self.line_vec.magnitude_squared();
        if length_squared <= f32::EPSILON {
            return None;
        }
        Some((point - self.point0).dot(&self.line_vec) / length_squared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_segment_normal_is_clockwise() {
        let segment = LineSegment::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 2.0));

        assert_relative_eq!(segment.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(segment.signed_distance(Vec2::new(3.0, 1.0)), 3.0);
        assert_relative_eq!(segment.projection(Vec2::new(3.0, 1.0)).unwrap(), 0.5);
    }

    #[test]
    fn test_degenerate_segment() {
        let segment = LineSegment::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0));

        assert_eq!(segment.normal, Vec2::zeros());
        assert!(segment.projection(Vec2::zeros()).is_none());
    }

    #[test]
    fn test_contact_flipped() {
        let contact = Contact::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 2.0), 0.5);
        let flipped = contact.flipped();

        assert_eq!(flipped.normal, Vec2::new(-1.0, 0.0));
        assert_eq!(flipped.intersection_point, contact.intersection_point);
        assert_eq!(flipped.penetration_depth, 0.5);
    }
}
