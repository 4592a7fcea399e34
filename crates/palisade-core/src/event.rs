//! Events recorded while the game ticks.
//!
//! The game appends events as things happen and the UI layer drains them with
//! [`Game::drain_events`](crate::game::Game::drain_events). Events are
//! informational; nothing in the simulation reads them back.

use serde::{Deserialize, Serialize};
use waypath::Location;

use crate::entity::{EnemyKind, EntityId};

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new wave began.
    WaveStarted {
        /// Wave number.
        wave: u32,
        /// Enemies in its roster.
        enemies: usize,
    },
    /// An enemy entered the field.
    EnemySpawned {
        /// The new enemy.
        enemy: EntityId,
        /// Its kind.
        kind: EnemyKind,
    },
    /// An enemy was killed and its worth paid out.
    EnemyKilled {
        /// The enemy.
        enemy: EntityId,
        /// Its kind.
        kind: EnemyKind,
        /// Gold awarded.
        worth: u32,
    },
    /// An enemy walked the whole path and cost a life.
    EnemyReachedBase {
        /// The enemy.
        enemy: EntityId,
        /// Lives left afterwards.
        lives: u32,
    },
    /// A tower fired.
    TowerFired {
        /// The tower.
        tower: EntityId,
        /// Projectiles created.
        projectiles: Vec<EntityId>,
    },
    /// A projectile damaged an enemy.
    EnemyHit {
        /// The enemy hit.
        enemy: EntityId,
        /// The tower that fired.
        tower: EntityId,
        /// Damage dealt.
        damage: f64,
        /// True if this hit was the killing blow.
        killed: bool,
    },
    /// A projectile lost its target and picked a new one.
    ProjectileRetargeted {
        /// The projectile.
        projectile: EntityId,
        /// Its new target.
        target: EntityId,
    },
    /// A projectile lost its target and found no replacement.
    ProjectileDiscarded {
        /// The projectile.
        projectile: EntityId,
        /// Where it was when discarded.
        location: Location,
    },
    /// Every wave was cleared.
    GameWon {
        /// Tick on which the game ended.
        tick: u64,
    },
    /// The last life was lost.
    GameLost {
        /// Tick on which the game ended.
        tick: u64,
    },
}

impl GameEvent {
    /// Returns the primary entity involved in this event, if any.
    #[must_use]
    pub const fn primary_entity(&self) -> Option<EntityId> {
        match self {
            Self::EnemySpawned { enemy, .. }
            | Self::EnemyKilled { enemy, .. }
            | Self::EnemyReachedBase { enemy, .. }
            | Self::EnemyHit { enemy, .. } => Some(*enemy),
            Self::TowerFired { tower, .. } => Some(*tower),
            Self::ProjectileRetargeted { projectile, .. }
            | Self::ProjectileDiscarded { projectile, .. } => Some(*projectile),
            Self::WaveStarted { .. } | Self::GameWon { .. } | Self::GameLost { .. } => None,
        }
    }

    /// True for the two events that end a run.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::GameWon { .. } | Self::GameLost { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_entity() {
        let id = EntityId::new(3);
        assert_eq!(
            GameEvent::EnemyReachedBase { enemy: id, lives: 4 }.primary_entity(),
            Some(id)
        );
        assert_eq!(
            GameEvent::TowerFired {
                tower: id,
                projectiles: vec![EntityId::new(9)]
            }
            .primary_entity(),
            Some(id)
        );
        assert_eq!(GameEvent::GameWon { tick: 10 }.primary_entity(), None);
    }

    #[test]
    fn terminal_events() {
        assert!(GameEvent::GameLost { tick: 1 }.is_terminal());
        assert!(!GameEvent::WaveStarted { wave: 1, enemies: 10 }.is_terminal());
    }

    #[test]
    fn serializes_with_variant_tag() {
        let event = GameEvent::EnemyKilled {
            enemy: EntityId::new(2),
            kind: EnemyKind::Tank,
            worth: 50,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"EnemyKilled":{"enemy":2,"kind":"Tank","worth":50}}"#
        );
    }
}
