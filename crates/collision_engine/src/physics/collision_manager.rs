//! Per-frame collision pipeline
//!
//! Each frame runs, in order:
//! 1. refresh every active collider's shape from its transform
//! 2. maintain the spatial grid
//! 3. test candidate pairs and publish enter/stay/exit events
//! 4. resolve the contacts collected in step 3
//!
//! While the simulation is paused only steps 1 and 2 run.

use crate::config::{CollisionConfig, Config, ConfigError, GridSize};
use crate::ecs::components::{Collider, RigidBody};
use crate::ecs::{Entity, World};
use crate::events::{CollisionEvent, CollisionEventSink};
use crate::foundation::math::{Transform, Vec2};
use crate::physics::collision::{intersect, ColliderShape, Contact};
use crate::physics::collision_layers::{CollisionLayerRegistry, LayerIndex, LayerLookup};
use crate::physics::pair_tracker::{PairKind, PairTracker};
use crate::physics::resolver::{ContactBody, ContactResolver, Manifold, ResolverSettings};
use crate::spatial::SpatialGrid;
use std::path::Path;

/// Non-fatal problems found while processing a frame
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionError {
    /// A solid collision where one entity has no rigid body to resolve
    #[error("collision between {entity_a} and {entity_b} skipped: entity {missing} has no rigid body")]
    MissingRigidBody {
        /// First entity of the pair
        entity_a: Entity,
        /// Second entity of the pair
        entity_b: Entity,
        /// Entity lacking the rigid body
        missing: Entity,
    },

    /// A collider placed on a layer that does not exist
    #[error("entity {entity} uses unknown collision layer {layer}")]
    UnknownLayer {
        /// Offending entity
        entity: Entity,
        /// Its layer index
        layer: LayerIndex,
    },
}

/// Runtime switches for the collision manager
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionSettings {
    /// World size the grid must cover
    pub grid_size: Vec2,
    /// Use the spatial grid; otherwise every pair of colliders is tested
    pub grid_active: bool,
    /// Run detection and resolution; otherwise only colliders are refreshed
    pub simulation_running: bool,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            grid_size: Vec2::new(CollisionConfig::DEFAULT_GRID_SIZE, CollisionConfig::DEFAULT_GRID_SIZE),
            grid_active: true,
            simulation_running: true,
        }
    }
}

/// Detects collisions between entities in a [`World`] and resolves them
pub struct CollisionManager<L: LayerLookup = CollisionLayerRegistry> {
    layers: L,
    settings: CollisionSettings,
    grid: SpatialGrid,
    tracker: PairTracker,
    manifolds: Vec<Manifold>,
    resolver: ContactResolver,
}

impl CollisionManager<CollisionLayerRegistry> {
    /// Create a manager with default layers and settings
    pub fn new() -> Self {
        Self::with_layers(CollisionLayerRegistry::new(), CollisionSettings::default())
    }

    /// Create a manager from a loaded configuration
    pub fn from_config(config: &CollisionConfig) -> Self {
        let settings = CollisionSettings {
            grid_size: config.grid_size_or_default(),
            ..CollisionSettings::default()
        };
        Self::with_layers(config.layer_registry(), settings)
    }

    /// Snapshot of the grid size and layers, in configuration form
    pub fn to_config(&self) -> CollisionConfig {
        CollisionConfig::from_parts(self.settings.grid_size, &self.layers)
    }

    /// Write the current configuration to `path`
    pub fn save_config(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        self.to_config().save_to_file(path)?;
        log::info!("Saved collision config to {}", path.display());
        Ok(())
    }

    /// Mutable access to the layer registry
    pub fn layers_mut(&mut self) -> &mut CollisionLayerRegistry {
        &mut self.layers
    }
}

impl Default for CollisionManager<CollisionLayerRegistry> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: LayerLookup> CollisionManager<L> {
    /// Create a manager using the given layer lookup
    pub fn with_layers(layers: L, settings: CollisionSettings) -> Self {
        Self {
            layers,
            settings,
            grid: SpatialGrid::new(),
            tracker: PairTracker::new(),
            manifolds: Vec::new(),
            resolver: ContactResolver::default(),
        }
    }

    /// Layer lookup in use
    pub fn layers(&self) -> &L {
        &self.layers
    }

    /// Current settings
    pub fn settings(&self) -> &CollisionSettings {
        &self.settings
    }

    /// Change the world size the grid covers; the grid is rebuilt next frame
    ///
    /// Sizes no grid can be built for are ignored with a warning.
    pub fn set_grid_size(&mut self, grid_size: Vec2) {
        if !GridSize::from(grid_size).is_usable() {
            log::warn!("Ignoring unusable collision grid size {}x{}", grid_size.x, grid_size.y);
            return;
        }
        self.settings.grid_size = grid_size;
    }

    /// Enable or disable the spatial grid
    pub fn set_grid_active(&mut self, grid_active: bool) {
        self.settings.grid_active = grid_active;
    }

    /// Run or pause detection and resolution
    pub fn set_simulation_running(&mut self, simulation_running: bool) {
        self.settings.simulation_running = simulation_running;
    }

    /// Replace the contact resolution settings
    pub fn set_resolver_settings(&mut self, settings: ResolverSettings) {
        self.resolver.set_settings(settings);
    }

    /// The spatial grid
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// The pair tracker
    pub fn pair_tracker(&self) -> &PairTracker {
        &self.tracker
    }

    /// Contacts collected by the last test pass and not yet resolved
    pub fn manifolds(&self) -> &[Manifold] {
        &self.manifolds
    }

    /// Run one frame of the collision pipeline
    pub fn update(&mut self, world: &mut World, events: &mut impl CollisionEventSink) {
        self.update_colliders(world);
        self.update_grid(world);

        if !self.settings.simulation_running {
            return;
        }

        self.test_colliders(world, events);
        self.resolve_collisions(world);
    }

    /// Refresh active colliders from their transforms and clear per-frame data
    pub fn update_colliders(&mut self, world: &mut World) {
        for entity in active_colliders(world) {
            let Some(transform) = world.get_component::<Transform>(entity).copied() else {
                continue;
            };
            let Some(collider) = world.get_component_mut::<Collider>(entity) else {
                continue;
            };
            collider.shape.update(&transform);
            collider.clear_frame_data();

            if self.layers.layer(collider.layer).is_none() {
                log::warn!(
                    "{}",
                    CollisionError::UnknownLayer {
                        entity,
                        layer: collider.layer,
                    }
                );
            }
        }
    }

    /// Keep the grid in step with the settings and the colliders
    ///
    /// The grid is released while paused or disabled, rebuilt when the
    /// configured size changes and refilled every running frame.
    pub fn update_grid(&mut self, world: &World) {
        if !self.settings.simulation_running || !self.settings.grid_active {
            if self.grid.is_built() {
                self.grid.clear_grid();
            }
            return;
        }

        let size = self.settings.grid_size;
        self.grid.setup_grid(size.x, size.y);

        let entries: Vec<(Entity, Vec2, Vec2)> = active_colliders(world)
            .into_iter()
            .filter_map(|entity| {
                let (min, max) = world.get_component::<Collider>(entity)?.shape.bounds();
                Some((entity, min, max))
            })
            .collect();
        self.grid.update_grid(entries);
    }

    /// Test candidate pairs, publish events and collect manifolds
    ///
    /// Pairs tracked from earlier frames that were not found intersecting in
    /// this pass get their exit event at the end.
    pub fn test_colliders(&mut self, world: &mut World, events: &mut impl CollisionEventSink) {
        self.tracker.begin_frame();

        if self.settings.grid_active && self.grid.is_built() {
            for index in 0..self.grid.cell_count() {
                let Some(members) = self.grid.begin_cell_test(index) else {
                    continue;
                };
                self.test_all_pairs(world, &members, events);
            }
        } else {
            let colliders = active_colliders(world);
            self.test_all_pairs(world, &colliders, events);
        }

        for (pair, kind) in self.tracker.end_frame() {
            log::trace!("{} and {} no longer tested together", pair.first(), pair.second());
            events.emit(CollisionEvent::new(kind, pair.first(), pair.second()));
        }
    }

    /// Resolve every collected manifold in collection order, then clear them
    pub fn resolve_collisions(&mut self, world: &mut World) {
        for manifold in std::mem::take(&mut self.manifolds) {
            let (entity_a, entity_b) = (manifold.entity_a, manifold.entity_b);
            let (Some(mut transform_a), Some(mut transform_b)) = (
                world.get_component::<Transform>(entity_a).copied(),
                world.get_component::<Transform>(entity_b).copied(),
            ) else {
                continue;
            };
            let mut body_a = world.get_component::<RigidBody>(entity_a).copied();
            let mut body_b = world.get_component::<RigidBody>(entity_b).copied();

            self.resolver.resolve_contact(
                &manifold.contact,
                ContactBody::new(&mut transform_a, body_a.as_mut()),
                ContactBody::new(&mut transform_b, body_b.as_mut()),
            );

            write_back(world, entity_a, transform_a, body_a);
            write_back(world, entity_b, transform_b, body_b);
        }
    }

    /// Forget tracked pairs, pending manifolds and the grid
    pub fn reset(&mut self) {
        self.tracker.clear();
        self.manifolds.clear();
        self.grid.clear_grid();
    }

    fn test_all_pairs(&mut self, world: &mut World, entities: &[Entity], events: &mut impl CollisionEventSink) {
        for (i, &entity_a) in entities.iter().enumerate() {
            for &entity_b in &entities[i + 1..] {
                self.test_pair(world, entity_a, entity_b, events);
            }
        }
    }

    fn test_pair(&mut self, world: &mut World, entity_a: Entity, entity_b: Entity, events: &mut impl CollisionEventSink) {
        let (Some(collider_a), Some(collider_b)) = (
            world.get_component::<Collider>(entity_a),
            world.get_component::<Collider>(entity_b),
        ) else {
            return;
        };
        if collider_a.has_checked(entity_b) || collider_b.has_checked(entity_a) {
            return;
        }
        if !self.layers.should_collide(collider_a.layer, collider_b.layer) {
            return;
        }

        let shape_a = collider_a.shape;
        let shape_b = collider_b.shape;
        let kind = PairKind::from_triggers(collider_a.is_trigger, collider_b.is_trigger);

        let Some(contact) = intersect(&shape_a, &shape_b) else {
            if let Some(exit) = self.tracker.record_separation(entity_a, entity_b) {
                events.emit(CollisionEvent::new(exit, entity_a, entity_b));
            }
            return;
        };

        mark_checked(world, entity_a, entity_b);
        mark_checked(world, entity_b, entity_a);
        log::trace!(
            "{} intersects {} with depth {}",
            entity_a,
            entity_b,
            contact.penetration_depth
        );

        let Some(event_kind) = self.tracker.record_overlap(entity_a, entity_b, kind) else {
            return;
        };
        events.emit(CollisionEvent::new(event_kind, entity_a, entity_b));

        if kind == PairKind::Collision {
            self.push_manifold(world, entity_a, entity_b, &shape_a, &shape_b, contact);
        }
    }

    fn push_manifold(
        &mut self,
        world: &World,
        entity_a: Entity,
        entity_b: Entity,
        shape_a: &ColliderShape,
        shape_b: &ColliderShape,
        contact: Contact,
    ) {
        let missing = [entity_a, entity_b]
            .into_iter()
            .find(|&entity| !world.has_component::<RigidBody>(entity));
        if let Some(missing) = missing {
            log::error!(
                "{}",
                CollisionError::MissingRigidBody {
                    entity_a,
                    entity_b,
                    missing,
                }
            );
            return;
        }

        // Circle first when a box meets a circle
        let manifold = match (shape_a, shape_b) {
            (ColliderShape::Box(_), ColliderShape::Circle(_)) => Manifold {
                contact: contact.flipped(),
                entity_a: entity_b,
                entity_b: entity_a,
            },
            _ => Manifold {
                contact,
                entity_a,
                entity_b,
            },
        };
        self.manifolds.push(manifold);
    }
}

/// Active entities with both a collider and a transform, ordered by ID
fn active_colliders(world: &World) -> Vec<Entity> {
    world
        .query::<Collider>()
        .into_iter()
        .filter(|&entity| world.is_active(entity) && world.has_component::<Transform>(entity))
        .collect()
}

fn mark_checked(world: &mut World, entity: Entity, other: Entity) {
    if let Some(collider) = world.get_component_mut::<Collider>(entity) {
        collider.collision_checked.insert(other);
    }
}

fn write_back(world: &mut World, entity: Entity, transform: Transform, body: Option<RigidBody>) {
    if let Some(current) = world.get_component_mut::<Transform>(entity) {
        *current = transform;
    }
    if let (Some(body), Some(current)) = (body, world.get_component_mut::<RigidBody>(entity)) {
        *current = body;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollisionEventKind;
    use crate::physics::collision_layers::CollisionLayer;
    use approx::assert_relative_eq;

    fn spawn(world: &mut World, collider: Collider, position: Vec2, size: f32) -> Entity {
        let entity = world.create_entity();
        world.add_component(entity, Transform::from_position_scale(position, Vec2::new(size, size)));
        world.add_component(entity, collider);
        entity
    }

    #[test]
    fn test_box_circle_manifold_puts_circle_first() {
        let mut world = World::new();
        let boxed = spawn(&mut world, Collider::boxed(), Vec2::new(0.0, 0.0), 2.0);
        let circle = spawn(&mut world, Collider::circle(), Vec2::new(1.5, 0.0), 2.0);
        world.add_component(boxed, RigidBody::dynamic(1.0));
        world.add_component(circle, RigidBody::dynamic(1.0));

        let mut manager = CollisionManager::new();
        let mut events: Vec<CollisionEvent> = Vec::new();
        manager.update_colliders(&mut world);
        manager.update_grid(&world);
        manager.test_colliders(&mut world, &mut events);

        assert_eq!(manager.manifolds().len(), 1);
        let manifold = manager.manifolds()[0];
        assert_eq!(manifold.entity_a, circle);
        assert_eq!(manifold.entity_b, boxed);
        // Normal points from the box towards the circle
        assert_relative_eq!(manifold.contact.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(manifold.contact.penetration_depth, 0.5);
    }

    #[test]
    fn test_missing_rigid_body_still_emits_event() {
        crate::foundation::logging::init_for_tests();
        let mut world = World::new();
        let a = spawn(&mut world, Collider::boxed(), Vec2::new(0.0, 0.0), 2.0);
        let b = spawn(&mut world, Collider::boxed(), Vec2::new(1.0, 0.0), 2.0);
        world.add_component(a, RigidBody::dynamic(1.0));

        let mut manager = CollisionManager::new();
        let mut events: Vec<CollisionEvent> = Vec::new();
        manager.update_colliders(&mut world);
        manager.update_grid(&world);
        manager.test_colliders(&mut world, &mut events);

        assert_eq!(events, vec![CollisionEvent::new(CollisionEventKind::CollisionEnter, a, b)]);
        assert!(manager.manifolds().is_empty());
    }

    #[test]
    fn test_manifolds_cleared_after_resolution() {
        let mut world = World::new();
        let a = spawn(&mut world, Collider::circle(), Vec2::new(0.0, 0.0), 2.0);
        let b = spawn(&mut world, Collider::circle(), Vec2::new(1.0, 0.0), 2.0);
        world.add_component(a, RigidBody::dynamic(1.0).with_velocity(Vec2::new(1.0, 0.0)));
        world.add_component(b, RigidBody::dynamic(1.0));

        let mut manager = CollisionManager::new();
        manager.update(&mut world, &mut Vec::<CollisionEvent>::new());

        assert!(manager.manifolds().is_empty());
        let body_b = world.get_component::<RigidBody>(b).unwrap();
        assert!(body_b.velocity.x > 0.0);
        assert!(world.get_component::<Transform>(a).unwrap().position.x < 0.0);
    }

    #[test]
    fn test_unknown_layer_is_never_tested() {
        let mut world = World::new();
        spawn(&mut world, Collider::boxed().with_layer(12), Vec2::new(0.0, 0.0), 2.0);
        spawn(&mut world, Collider::boxed(), Vec2::new(0.5, 0.0), 2.0);

        let mut manager = CollisionManager::new();
        let mut events: Vec<CollisionEvent> = Vec::new();
        manager.update(&mut world, &mut events);

        assert!(events.is_empty());
    }

    struct OnlySameLayer(Vec<CollisionLayer>);

    impl LayerLookup for OnlySameLayer {
        fn layer(&self, index: LayerIndex) -> Option<&CollisionLayer> {
            self.0.get(index)
        }

        fn should_collide(&self, layer_a: LayerIndex, layer_b: LayerIndex) -> bool {
            layer_a == layer_b
        }
    }

    #[test]
    fn test_injected_layer_lookup() {
        let layers = OnlySameLayer((0..3).map(CollisionLayer::new).collect());
        let mut manager = CollisionManager::with_layers(layers, CollisionSettings::default());
        let mut world = World::new();
        let a = spawn(&mut world, Collider::circle().with_layer(1), Vec2::new(0.0, 0.0), 2.0);
        let b = spawn(&mut world, Collider::circle().with_layer(1), Vec2::new(0.5, 0.0), 2.0);
        spawn(&mut world, Collider::circle().with_layer(2), Vec2::new(0.25, 0.0), 2.0);

        let mut events: Vec<CollisionEvent> = Vec::new();
        manager.update(&mut world, &mut events);

        assert_eq!(events, vec![CollisionEvent::new(CollisionEventKind::CollisionEnter, a, b)]);
    }

    #[test]
    fn test_config_round_trip() {
        let mut manager = CollisionManager::new();
        manager.set_grid_size(Vec2::new(800.0, 600.0));
        manager.layers_mut().set_collides(0, 4, false);

        let restored = CollisionManager::from_config(&manager.to_config());

        assert_eq!(restored.settings().grid_size, Vec2::new(800.0, 600.0));
        assert!(!restored.layers().should_collide(4, 0));
        assert!(restored.layers().should_collide(4, 4));
    }

    #[test]
    fn test_oversized_config_grid_does_not_break_frame() {
        let config: CollisionConfig = serde_json::from_str(r#"{"Gridsize": {"x": 1e39, "y": 200.0}}"#).unwrap();
        let mut manager = CollisionManager::from_config(&config);
        let mut world = World::new();
        let a = spawn(&mut world, Collider::circle(), Vec2::new(0.0, 0.0), 2.0);
        let b = spawn(&mut world, Collider::circle(), Vec2::new(1.0, 0.0), 2.0);

        let mut events: Vec<CollisionEvent> = Vec::new();
        manager.update(&mut world, &mut events);

        assert_eq!(manager.settings().grid_size, Vec2::new(2000.0, 2000.0));
        assert_eq!(manager.grid().dimensions(), (20, 20));
        assert_eq!(events, vec![CollisionEvent::new(CollisionEventKind::CollisionEnter, a, b)]);
    }

    #[test]
    fn test_unusable_grid_size_is_ignored() {
        let mut manager = CollisionManager::new();
        manager.set_grid_size(Vec2::new(800.0, 600.0));

        manager.set_grid_size(Vec2::new(f32::INFINITY, 600.0));
        manager.set_grid_size(Vec2::new(1.0e6, 1.0e6));
        manager.set_grid_size(Vec2::new(0.0, 600.0));

        assert_eq!(manager.settings().grid_size, Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_grid_resized_when_settings_change() {
        let mut world = World::new();
        let mut manager = CollisionManager::new();

        manager.update(&mut world, &mut Vec::<CollisionEvent>::new());
        assert_eq!(manager.grid().size(), Vec2::new(2000.0, 2000.0));

        manager.set_grid_size(Vec2::new(500.0, 300.0));
        manager.update(&mut world, &mut Vec::<CollisionEvent>::new());
        assert_eq!(manager.grid().dimensions(), (5, 3));
    }
}
