//! Entity types for the tower-defense simulation.
//!
//! - [`EntityId`]: Unique identifier for entities within an arena
//! - [`Reach`]: Which movement classes an attack can hit
//! - [`enemy`]: Enemies walking the path
//! - [`tower`]: Placed towers and their per-kind tables
//! - [`projectile`]: In-flight shots
//!
//! Entities never hold references to each other. A projectile follows its
//! target by [`EntityId`] and re-resolves it every tick.

pub mod enemy;
pub mod projectile;
pub mod tower;

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub use enemy::{Enemy, EnemyKind, EnemyStats};
pub use projectile::{Impact, Projectile, ProjectileStep, ProjectileTarget, Removal, Travel};
pub use tower::{Armament, Attack, Tower, TowerKind, TowerStats};

/// Unique identifier for an entity.
///
/// Entity IDs are ordered by their numeric value, which is used to ensure
/// deterministic iteration order and stable tie-breaking when ranking
/// enemies.
///
/// # Example
///
/// ```
/// use palisade_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

bitflags! {
    /// Movement classes. Enemies have exactly one; towers reach a set.
    ///
    /// ```
    /// use palisade_core::entity::Reach;
    ///
    /// let bomb = Reach::GROUND;
    /// assert!(!bomb.intersects(Reach::AIR));
    /// assert!(Reach::all().intersects(Reach::AIR));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Reach: u8 {
        /// Walks along the path.
        const GROUND = 1;
        /// Flies along the path.
        const AIR = 1 << 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_display_and_debug() {
        let id = EntityId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{id:?}"), "EntityId(42)");
        assert_eq!(u64::from(id), 42);
        assert_eq!(EntityId::from(42), id);
    }

    #[test]
    fn reach_intersection() {
        let both = Reach::GROUND | Reach::AIR;
        assert!(both.intersects(Reach::GROUND));
        assert!(both.intersects(Reach::AIR));
        assert!(!Reach::GROUND.intersects(Reach::AIR));
    }
}
