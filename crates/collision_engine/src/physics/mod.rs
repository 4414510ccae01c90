//! Physics module for collision detection and response
//!
//! Broad phase through the spatial grid, box and circle narrow phase,
//! layer filtering, enter/stay/exit tracking and impulse resolution.

pub mod collision;
pub mod collision_layers;
pub mod collision_manager;
pub mod pair_tracker;
pub mod resolver;

pub use collision::{BoxShape, CircleShape, ColliderShape, Contact};
pub use collision_layers::{CollisionLayer, CollisionLayerRegistry, LayerIndex, LayerLookup, TOTAL_COLLISION_LAYERS};
pub use collision_manager::{CollisionError, CollisionManager, CollisionSettings};
pub use pair_tracker::{CollisionPair, PairKind, PairTracker};
pub use resolver::{ContactResolver, Manifold, ResolverSettings};
