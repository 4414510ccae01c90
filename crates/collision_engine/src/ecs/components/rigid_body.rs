//! Rigid body component
//!
//! The integrator that advances velocities and positions lives outside this
//! crate; collision resolution only reads mass and velocity and writes
//! impulse-driven velocity corrections.

use crate::foundation::math::Vec2;

/// How a rigid body responds to forces and contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RigidBodyType {
    /// Never moves; infinite mass as far as contacts are concerned
    #[default]
    Static,
    /// Has mass and responds to forces and contacts
    Dynamic,
    /// Moves by its velocity but is not pushed by contacts
    Kinematic,
}

/// Component for entities that take part in physical collision response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    /// Linear velocity in units per second
    pub velocity: Vec2,

    mass: f32,
    inverse_mass: f32,
    body_type: RigidBodyType,
}

impl RigidBody {
    /// Default mass for newly created bodies
    pub const DEFAULT_MASS: f32 = 10.0;

    /// Create a new body of the given type with the default mass
    pub fn new(body_type: RigidBodyType) -> Self {
        Self {
            velocity: Vec2::zeros(),
            mass: Self::DEFAULT_MASS,
            inverse_mass: 1.0 / Self::DEFAULT_MASS,
            body_type,
        }
    }

    /// Create a dynamic body with the given mass
    pub fn dynamic(mass: f32) -> Self {
        let mut body = Self::new(RigidBodyType::Dynamic);
        body.set_mass(mass);
        body
    }

    /// Create a static body
    pub fn fixed() -> Self {
        Self::new(RigidBodyType::Static)
    }

    /// Set the initial velocity (builder pattern)
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Body mass
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Set the mass; a non-positive mass yields a zero inverse mass
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inverse_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
    }

    /// Stored inverse mass, regardless of body type
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// Inverse mass as seen by contact resolution: zero unless dynamic
    pub fn effective_inverse_mass(&self) -> f32 {
        match self.body_type {
            RigidBodyType::Dynamic => self.inverse_mass,
            RigidBodyType::Static | RigidBodyType::Kinematic => 0.0,
        }
    }

    /// Body type
    pub fn body_type(&self) -> RigidBodyType {
        self.body_type
    }

    /// Change the body type
    pub fn set_body_type(&mut self, body_type: RigidBodyType) {
        self.body_type = body_type;
    }

    /// Whether contacts can move this body
    pub fn is_dynamic(&self) -> bool {
        self.body_type == RigidBodyType::Dynamic
    }

    /// Apply an impulse directly to the linear velocity (dynamic bodies only)
    pub fn apply_linear_impulse(&mut self, impulse: Vec2) {
        if !self.is_dynamic() {
            return;
        }
        self.velocity += impulse * self.inverse_mass;
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(RigidBodyType::default())
    }
}
