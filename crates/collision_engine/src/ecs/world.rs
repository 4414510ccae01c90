//! ECS World implementation

use super::components::EntityDescriptor;
use super::{Component, Entity};
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Type-erased view of a component storage, used for whole-entity removal
trait AnyStorage: Any {
    fn remove_entity(&mut self, entity: Entity);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyStorage for HashMap<Entity, T> {
    fn remove_entity(&mut self, entity: Entity) {
        self.remove(&entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// ECS World containing all entities and components
pub struct World {
    next_entity_id: u32,
    entities: Vec<Entity>,
    component_storages: HashMap<TypeId, Box<dyn AnyStorage>>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            next_entity_id: 0,
            entities: Vec::new(),
            component_storages: HashMap::new(),
        }
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity::new(self.next_entity_id);
        self.next_entity_id += 1;
        self.entities.push(entity);
        entity
    }

    /// Destroy an entity and drop all of its components
    pub fn destroy_entity(&mut self, entity: Entity) {
        self.entities.retain(|&e| e != entity);
        for storage in self.component_storages.values_mut() {
            storage.remove_entity(entity);
        }
    }

    /// Check whether an entity exists
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Add a component to an entity, replacing any previous value of that type
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) {
        if !self.contains(entity) {
            log::warn!("Ignoring component for unknown entity {}", entity);
            return;
        }
        self.storage_mut::<T>().insert(entity, component);
    }

    /// Get a component from an entity
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(&entity)
    }

    /// Get a mutable component from an entity
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<HashMap<Entity, T>>()?
            .get_mut(&entity)
    }

    /// Check whether an entity has a component of type `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.get_component::<T>(entity).is_some()
    }

    /// Remove a component from an entity, returning it
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<HashMap<Entity, T>>()?
            .remove(&entity)
    }

    /// All entities carrying a component of type `T`, ordered by entity ID
    pub fn query<T: Component>(&self) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self
            .storage::<T>()
            .map(|storage| storage.keys().copied().collect())
            .unwrap_or_default();
        entities.sort_unstable();
        entities
    }

    /// Whether the entity exists and its descriptor (if any) is active
    pub fn is_active(&self, entity: Entity) -> bool {
        self.contains(entity)
            && self
                .get_component::<EntityDescriptor>(entity)
                .map_or(true, |descriptor| descriptor.is_active)
    }

    /// Get an iterator over all entities
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    fn storage<T: Component>(&self) -> Option<&HashMap<Entity, T>> {
        self.component_storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<HashMap<Entity, T>>()
    }

    fn storage_mut<T: Component>(&mut self) -> &mut HashMap<Entity, T> {
        let storage = self
            .component_storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(HashMap::<Entity, T>::new()) as Box<dyn AnyStorage>);
        match storage.as_any_mut().downcast_mut::<HashMap<Entity, T>>() {
            Some(storage) => storage,
            // Storages are keyed by the TypeId of their component type
            None => unreachable!("component storage registered under the wrong type"),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
