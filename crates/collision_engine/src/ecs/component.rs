//! Component trait and implementations

/// Marker trait for components
pub trait Component: 'static + Send + Sync {}

// Implement Component for common types
impl Component for crate::foundation::math::Transform {}

// Implement Component for engine components
impl Component for crate::ecs::components::EntityDescriptor {}
impl Component for crate::ecs::components::Collider {}
impl Component for crate::ecs::components::RigidBody {}
