//! Impulse-based contact resolution
//!
//! Resolves one contact at a time: a velocity impulse along the contact normal
//! followed by a positional correction that pushes overlapping bodies apart.
//! Only linear motion is affected.

use crate::ecs::components::RigidBody;
use crate::ecs::Entity;
use crate::foundation::math::{Transform, Vec2};
use crate::physics::collision::Contact;

/// A confirmed contact between two physical entities, waiting for resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Manifold {
    /// Contact with its normal pointing from `entity_b` towards `entity_a`
    pub contact: Contact,
    /// First entity
    pub entity_a: Entity,
    /// Second entity
    pub entity_b: Entity,
}

/// Tuning for contact resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverSettings {
    /// Coefficient of restitution; 1 is perfectly elastic
    pub restitution: f32,
    /// Fraction of the penetration removed per resolution
    pub correction_percent: f32,
    /// Penetration tolerated without positional correction
    pub penetration_slop: f32,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            restitution: 1.0,
            correction_percent: 0.8,
            penetration_slop: 0.01,
        }
    }
}

/// One side of a contact
pub struct ContactBody<'a> {
    /// Entity transform, moved by positional correction
    pub transform: &'a mut Transform,
    /// Rigid body, if the entity has one; absent bodies are immovable
    pub rigid_body: Option<&'a mut RigidBody>,
}

impl<'a> ContactBody<'a> {
    /// Create a new contact body
    pub fn new(transform: &'a mut Transform, rigid_body: Option<&'a mut RigidBody>) -> Self {
        Self { transform, rigid_body }
    }

    fn inverse_mass(&self) -> f32 {
        self.rigid_body
            .as_deref()
            .map_or(0.0, RigidBody::effective_inverse_mass)
    }

    fn velocity(&self) -> Vec2 {
        self.rigid_body.as_deref().map_or_else(Vec2::zeros, |body| body.velocity)
    }
}

/// Applies impulse and positional correction to contacting bodies
#[derive(Debug, Clone, Default)]
pub struct ContactResolver {
    settings: ResolverSettings,
}

impl ContactResolver {
    /// Create a resolver with the given settings
    pub fn new(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    /// Current settings
    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Replace the settings
    pub fn set_settings(&mut self, settings: ResolverSettings) {
        self.settings = settings;
    }

    /// Resolve a single contact between `a` and `b`
    ///
    /// The contact normal points from `b` towards `a`.
    pub fn resolve_contact(&self, contact: &Contact, mut a: ContactBody<'_>, mut b: ContactBody<'_>) {
        let inverse_mass_a = a.inverse_mass();
        let inverse_mass_b = b.inverse_mass();
        let total_inverse_mass = inverse_mass_a + inverse_mass_b;
        if total_inverse_mass <= 0.0 {
            return;
        }

        let normal = contact.normal;
        let relative_velocity = a.velocity() - b.velocity();
        let velocity_along_normal = relative_velocity.dot(&normal);

        // Positive means the bodies are already moving apart
        if velocity_along_normal < 0.0 {
            let impulse_magnitude = -(1.0 + self.settings.restitution) * velocity_along_normal / total_inverse_mass;
            let impulse = normal * impulse_magnitude;
            if let Some(body) = a.rigid_body.as_deref_mut() {
                body.apply_linear_impulse(impulse);
            }
            if let Some(body) = b.rigid_body.as_deref_mut() {
                body.apply_linear_impulse(-impulse);
            }
        }

        let excess_depth = (contact.penetration_depth - self.settings.penetration_slop).max(0.0);
        let correction = normal * (excess_depth / total_inverse_mass * self.settings.correction_percent);
        a.transform.position += correction * inverse_mass_a;
        b.transform.position -= correction * inverse_mass_b;
    }
}
