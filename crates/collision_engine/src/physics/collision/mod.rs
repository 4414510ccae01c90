//! Collision geometry: shapes, contacts and narrow-phase tests
//!
//! # Module Organization
//!
//! - [`shape`] - Box and circle collider shapes, refreshed from transforms each frame
//! - [`primitives`] - Contact data and line segments
//! - [`narrow_phase`] - Pairwise intersection tests producing contacts
//!
//! # Key Types
//!
//! - [`ColliderShape`] - Closed sum of the two supported shapes
//! - [`Contact`] - Normal, intersection point and penetration depth of an overlap

pub mod primitives;
pub mod shape;
pub mod narrow_phase;

// Re-export commonly used types
pub use primitives::{Contact, LineSegment};
pub use shape::{BoxShape, CircleShape, ColliderShape};
pub use narrow_phase::intersect;
