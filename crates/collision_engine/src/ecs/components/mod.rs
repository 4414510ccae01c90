//! ECS Components module
//! 
//! Components read and written by the collision core

pub mod descriptor;
pub mod collision;
pub mod rigid_body;

pub use descriptor::EntityDescriptor;
pub use collision::Collider;
pub use rigid_body::{RigidBody, RigidBodyType};
