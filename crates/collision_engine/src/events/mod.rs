//! Collision events and their delivery
//!
//! The collision manager publishes events through a [`CollisionEventSink`] and
//! knows nothing about who listens. [`EventSystem`] queues events and forwards
//! them to handlers registered per event kind:
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Registration system (only notify interested handlers)
//! - Events queue up during the frame and are delivered on `dispatch`

use crate::ecs::Entity;
use std::collections::HashMap;
use std::fmt;

/// Kind of collision event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionEventKind {
    /// Two solid colliders started touching
    CollisionEnter,
    /// Two solid colliders are still touching
    CollisionStay,
    /// Two solid colliders stopped touching
    CollisionExit,
    /// A trigger started overlapping another collider
    TriggerEnter,
    /// A trigger is still overlapping another collider
    TriggerStay,
    /// A trigger stopped overlapping another collider
    TriggerExit,
}

impl CollisionEventKind {
    /// Whether this is one of the trigger kinds
    pub fn is_trigger(self) -> bool {
        matches!(self, Self::TriggerEnter | Self::TriggerStay | Self::TriggerExit)
    }
}

impl fmt::Display for CollisionEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CollisionEnter => "CollisionEnter",
            Self::CollisionStay => "CollisionStay",
            Self::CollisionExit => "CollisionExit",
            Self::TriggerEnter => "TriggerEnter",
            Self::TriggerStay => "TriggerStay",
            Self::TriggerExit => "TriggerExit",
        };
        f.write_str(name)
    }
}

/// A collision event between two entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionEvent {
    /// What happened
    pub kind: CollisionEventKind,
    /// First entity of the pair
    pub entity1: Entity,
    /// Second entity of the pair
    pub entity2: Entity,
}

impl CollisionEvent {
    /// Create a new event
    pub fn new(kind: CollisionEventKind, entity1: Entity, entity2: Entity) -> Self {
        Self { kind, entity1, entity2 }
    }

    /// Whether the event involves `entity`
    pub fn involves(&self, entity: Entity) -> bool {
        self.entity1 == entity || self.entity2 == entity
    }
}

impl fmt::Display for CollisionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} between {} and {}", self.kind, self.entity1, self.entity2)
    }
}

/// Fire-and-forget destination for collision events
pub trait CollisionEventSink {
    /// Publish an event
    fn emit(&mut self, event: CollisionEvent);
}

/// Records events in order
impl CollisionEventSink for Vec<CollisionEvent> {
    fn emit(&mut self, event: CollisionEvent) {
        self.push(event);
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &CollisionEvent) -> bool;
}

impl<F> EventHandler for F
where
    F: FnMut(&CollisionEvent) -> bool,
{
    fn on_event(&mut self, event: &CollisionEvent) -> bool {
        self(event)
    }
}

/// Event system with registration and queuing
/// Follows chain of responsibility pattern
pub struct EventSystem {
    queue: Vec<CollisionEvent>,
    handlers: HashMap<CollisionEventKind, Vec<Box<dyn EventHandler>>>,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a specific event kind
    /// Only handlers registered for this kind will be notified
    pub fn register_handler(&mut self, kind: CollisionEventKind, handler: Box<dyn EventHandler>) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Queue an event for delivery on the next `dispatch`
    pub fn send(&mut self, event: CollisionEvent) {
        self.queue.push(event);
    }

    /// Number of queued events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Deliver all queued events in the order they were sent
    pub fn dispatch(&mut self) {
        let queued = std::mem::take(&mut self.queue);
        for event in queued {
            self.dispatch_event(&event);
        }
    }

    /// Dispatch single event to registered handlers
    /// Stops on first handler that returns true (consumed)
    fn dispatch_event(&mut self, event: &CollisionEvent) {
        let Some(handlers) = self.handlers.get_mut(&event.kind) else {
            log::trace!("No handler for {}", event);
            return;
        };
        for handler in handlers.iter_mut() {
            if handler.on_event(event) {
                break;
            }
        }
    }

    /// Clear all queued events (useful for state transitions)
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionEventSink for EventSystem {
    fn emit(&mut self, event: CollisionEvent) {
        self.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_handler(log: &Rc<RefCell<Vec<CollisionEvent>>>, consume: bool) -> Box<dyn EventHandler> {
        let log = Rc::clone(log);
        Box::new(move |event: &CollisionEvent| {
            log.borrow_mut().push(*event);
            consume
        })
    }

    fn enter(a: u32, b: u32) -> CollisionEvent {
        CollisionEvent::new(CollisionEventKind::CollisionEnter, Entity::new(a), Entity::new(b))
    }

    #[test]
    fn test_dispatch_only_reaches_registered_kind() {
        let received = Rc::new(RefCell::new(Vec::new()));
        let mut system = EventSystem::new();
        system.register_handler(CollisionEventKind::CollisionEnter, recording_handler(&received, false));

        system.emit(enter(1, 2));
        system.emit(CollisionEvent::new(
            CollisionEventKind::TriggerExit,
            Entity::new(3),
            Entity::new(4),
        ));
        assert_eq!(system.pending(), 2);
        system.dispatch();

        assert_eq!(system.pending(), 0);
        assert_eq!(*received.borrow(), vec![enter(1, 2)]);
    }

    #[test]
    fn test_event_consumption() {
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let mut system = EventSystem::new();

        // First handler consumes, second should not receive
        system.register_handler(CollisionEventKind::CollisionEnter, recording_handler(&first, true));
        system.register_handler(CollisionEventKind::CollisionEnter, recording_handler(&second, false));

        system.send(enter(1, 2));
        system.dispatch();

        assert_eq!(first.borrow().len(), 1);
        assert!(second.borrow().is_empty());
    }

    #[test]
    fn test_clear_drops_queue() {
        let mut system = EventSystem::new();
        system.send(enter(1, 2));
        system.clear();
        assert_eq!(system.pending(), 0);
    }

    #[test]
    fn test_event_display() {
        let event = enter(1, 2);
        assert_eq!(event.to_string(), "CollisionEnter between 1 and 2");
        assert!(event.involves(Entity::new(2)));
        assert!(!event.kind.is_trigger());
    }
}
