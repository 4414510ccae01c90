//! # Collision Engine
//!
//! Collision detection and resolution core for a 2D game engine.
//!
//! ## Features
//!
//! - **Uniform Grid Broad Phase**: only colliders sharing a cell are tested
//! - **Box and Circle Narrow Phase**: contacts with normal, point and depth
//! - **Collision Layers**: ten layers with per-layer collision signatures
//! - **Enter/Stay/Exit Events**: persistent pair tracking across frames
//! - **Impulse Resolution**: velocity and positional correction for rigid bodies
//! - **File Configuration**: grid size and layers in JSON, TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use collision_engine::prelude::*;
//!
//! let mut world = World::new();
//!
//! let ball = world.create_entity();
//! world.add_component(ball, Transform::from_position_scale(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0)));
//! world.add_component(ball, Collider::circle());
//! world.add_component(ball, RigidBody::dynamic(1.0).with_velocity(Vec2::new(3.0, 0.0)));
//!
//! let wall = world.create_entity();
//! world.add_component(wall, Transform::from_position_scale(Vec2::new(1.5, 0.0), Vec2::new(2.0, 2.0)));
//! world.add_component(wall, Collider::boxed());
//! world.add_component(wall, RigidBody::fixed());
//!
//! let mut manager = CollisionManager::new();
//! let mut events: Vec<CollisionEvent> = Vec::new();
//! manager.update(&mut world, &mut events);
//!
//! assert_eq!(events[0].kind, CollisionEventKind::CollisionEnter);
//! assert!(world.get_component::<RigidBody>(ball).unwrap().velocity.x < 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{CollisionConfig, Config, ConfigError},
        ecs::{
            components::{Collider, EntityDescriptor, RigidBody, RigidBodyType},
            Component, Entity, World,
        },
        events::{CollisionEvent, CollisionEventKind, CollisionEventSink, EventSystem},
        foundation::math::{Transform, Vec2},
        physics::{
            CollisionLayerRegistry, CollisionManager, CollisionSettings, LayerLookup, ResolverSettings,
        },
    };
}
