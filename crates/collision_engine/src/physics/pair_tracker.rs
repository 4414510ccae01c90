//! Temporal classification of overlapping pairs
//!
//! The tracker remembers which pairs were intersecting at the end of the
//! previous frame. Each frame's test results are classified against that set
//! into enter, stay and exit events.

use crate::ecs::Entity;
use crate::events::CollisionEventKind;
use std::collections::{HashMap, HashSet};

/// Unordered pair of entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollisionPair {
    first: Entity,
    second: Entity,
}

impl CollisionPair {
    /// Create a new collision pair (always stores smaller entity ID first for consistency)
    pub fn new(entity_a: Entity, entity_b: Entity) -> Self {
        if entity_a <= entity_b {
            Self { first: entity_a, second: entity_b }
        } else {
            Self { first: entity_b, second: entity_a }
        }
    }

    /// Entity with the smaller ID
    pub fn first(&self) -> Entity {
        self.first
    }

    /// Entity with the larger ID
    pub fn second(&self) -> Entity {
        self.second
    }
}

/// Whether a pair interacts physically or only as a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairKind {
    /// Neither collider is a trigger
    Collision,
    /// At least one collider is a trigger
    Trigger,
}

impl PairKind {
    /// Classify from the two colliders' trigger flags
    pub fn from_triggers(is_trigger_a: bool, is_trigger_b: bool) -> Self {
        if is_trigger_a || is_trigger_b {
            Self::Trigger
        } else {
            Self::Collision
        }
    }

    /// Event kind for a pair that just started intersecting
    pub fn enter_event(self) -> CollisionEventKind {
        match self {
            Self::Collision => CollisionEventKind::CollisionEnter,
            Self::Trigger => CollisionEventKind::TriggerEnter,
        }
    }

    /// Event kind for a pair that keeps intersecting
    pub fn stay_event(self) -> CollisionEventKind {
        match self {
            Self::Collision => CollisionEventKind::CollisionStay,
            Self::Trigger => CollisionEventKind::TriggerStay,
        }
    }

    /// Event kind for a pair that stopped intersecting
    pub fn exit_event(self) -> CollisionEventKind {
        match self {
            Self::Collision => CollisionEventKind::CollisionExit,
            Self::Trigger => CollisionEventKind::TriggerExit,
        }
    }
}

/// Persistent set of intersecting pairs
#[derive(Debug, Default)]
pub struct PairTracker {
    /// Pairs intersecting as of the last recorded overlap, with their kind
    active: HashMap<CollisionPair, PairKind>,
    /// Pairs observed intersecting during the current frame
    seen: HashSet<CollisionPair>,
}

impl PairTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new test pass
    pub fn begin_frame(&mut self) {
        self.seen.clear();
    }

    /// Record that a pair intersects this frame
    ///
    /// Returns the enter or stay event to emit, or `None` if the pair was
    /// already recorded this frame.
    pub fn record_overlap(&mut self, entity_a: Entity, entity_b: Entity, kind: PairKind) -> Option<CollisionEventKind> {
        let pair = CollisionPair::new(entity_a, entity_b);
        if !self.seen.insert(pair) {
            return None;
        }

        match self.active.insert(pair, kind) {
            Some(_) => Some(kind.stay_event()),
            None => Some(kind.enter_event()),
        }
    }

    /// Record that a pair was tested and does not intersect
    ///
    /// Returns the exit event if the pair was intersecting. A pair already seen
    /// intersecting this frame is left alone.
    pub fn record_separation(&mut self, entity_a: Entity, entity_b: Entity) -> Option<CollisionEventKind> {
        let pair = CollisionPair::new(entity_a, entity_b);
        if self.seen.contains(&pair) {
            return None;
        }
        self.active.remove(&pair).map(PairKind::exit_event)
    }

    /// Finish the test pass
    ///
    /// Every active pair not seen intersecting this frame is removed. Returns
    /// their exit events ordered by pair.
    pub fn end_frame(&mut self) -> Vec<(CollisionPair, CollisionEventKind)> {
        let seen = &self.seen;
        let mut stale: Vec<(CollisionPair, CollisionEventKind)> = self
            .active
            .iter()
            .filter(|(pair, _)| !seen.contains(pair))
            .map(|(pair, kind)| (*pair, kind.exit_event()))
            .collect();
        stale.sort_unstable_by_key(|(pair, _)| *pair);

        for (pair, _) in &stale {
            self.active.remove(pair);
        }
        stale
    }

    /// Whether the pair is currently intersecting
    pub fn is_active(&self, entity_a: Entity, entity_b: Entity) -> bool {
        self.active.contains_key(&CollisionPair::new(entity_a, entity_b))
    }

    /// Number of intersecting pairs
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no pair is intersecting
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Forget every pair without emitting events
    pub fn clear(&mut self) {
        self.active.clear();
        self.seen.clear();
    }
}
