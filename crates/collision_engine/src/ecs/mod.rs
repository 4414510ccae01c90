//! Entity-Component-System implementation
//!
//! Provides the entity/component store the collision core reads from and
//! writes velocity and position corrections back into.

pub mod world;
pub mod entity;
pub mod component;
pub mod components;

pub use world::World;
pub use entity::Entity;
pub use component::Component;
