//! Id-keyed entity storage with deterministic iteration.
//!
//! Towers, enemies and projectiles each live in their own [`Arena`]. Entities
//! refer to each other only by [`EntityId`]; a lookup that returns `None`
//! means the other entity is gone, never a dangling reference.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

// =============================================================================
// Arena
// =============================================================================

/// Container for one kind of entity.
///
/// # Determinism
///
/// Storage is a `BTreeMap` and ids are assigned monotonically, so iteration
/// always visits entities in spawn order. Ids are never reused within an
/// arena, even after despawn.
///
/// # Example
///
/// ```
/// use palisade_core::arena::Arena;
///
/// let mut arena = Arena::new();
/// let a = arena.spawn("first");
/// let b = arena.spawn("second");
///
/// let ids: Vec<_> = arena.entity_ids_sorted().collect();
/// assert_eq!(ids, vec![a, b]);
///
/// assert_eq!(arena.despawn(a), Some("first"));
/// assert!(arena.get(a).is_none());
/// assert_eq!(arena.entity_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena<T> {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, T>,
}

impl<T> Arena<T> {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entities: BTreeMap::new(),
        }
    }

    /// Stores `entity` under a fresh id and returns the id.
    pub fn spawn(&mut self, entity: T) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, entity);
        id
    }

    /// Removes an entity, returning it if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<T> {
        self.entities.remove(&id)
    }

    /// Returns a reference to an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities.get_mut(&id)
    }

    /// Returns true if an entity with this id is stored.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Returns an iterator over entity IDs in deterministic (sorted) order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Returns an iterator over `(id, entity)` pairs in id order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = (EntityId, &T)> + '_ {
        self.entities.iter().map(|(id, e)| (*id, e))
    }

    /// Returns an iterator over `(id, entity)` pairs in id order, mutably.
    pub fn entities_sorted_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> + '_ {
        self.entities.iter_mut().map(|(id, e)| (*id, e))
    }

    /// Removes every entity matching `pred` and returns them in id order.
    pub fn despawn_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> Vec<(EntityId, T)> {
        let doomed: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| pred(e))
            .map(|(id, _)| *id)
            .collect();
        doomed
            .into_iter()
            .filter_map(|id| self.entities.remove(&id).map(|e| (id, e)))
            .collect()
    }

    /// Removes every entity and resets the id counter.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.next_id = 0;
    }

    /// Returns the number of entities in the arena.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the arena has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
