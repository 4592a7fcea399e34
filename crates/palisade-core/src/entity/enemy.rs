//! Enemies walking the path.

use serde::{Deserialize, Serialize};
use waypath::Location;

use super::Reach;
use crate::path::Path;

/// Fixed attributes of an enemy kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Gold awarded when killed.
    pub worth: u32,
    /// Cost against the wave budget and weight in the random roster draw.
    pub weight: u32,
    /// Health on spawn.
    pub max_health: f64,
    /// Path distance covered per tick.
    pub speed: f64,
    /// Hitbox diameter.
    pub size: f64,
    /// Flying enemies can only be hit by towers that reach the air.
    pub flying: bool,
}

/// The enemy kinds that waves are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline walker.
    Regular,
    /// Fast, fragile, flying.
    Drone,
    /// Slow and heavily armoured.
    Tank,
}

impl EnemyKind {
    /// Every kind, in roster-draw order.
    pub const ALL: [Self; 3] = [Self::Regular, Self::Drone, Self::Tank];

    /// The stat table for this kind.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Regular => EnemyStats {
                worth: 20,
                weight: 1,
                max_health: 200.0,
                speed: 0.15,
                size: 3.5,
                flying: false,
            },
            Self::Drone => EnemyStats {
                worth: 20,
                weight: 1,
                max_health: 100.0,
                speed: 0.45,
                size: 3.0,
                flying: true,
            },
            Self::Tank => EnemyStats {
                worth: 50,
                weight: 3,
                max_health: 1000.0,
                speed: 0.06,
                size: 4.5,
                flying: false,
            },
        }
    }
}

/// A live enemy.
///
/// Health can go negative; [`is_dead`](Self::is_dead) is the only death test.
/// An enemy that reaches the end of the path is finished and can no longer be
/// damaged, so "killed" and "reached the base" never both happen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    kind: EnemyKind,
    stats: EnemyStats,
    health: f64,
    /// Fraction of the path completed, in `[0, 1]`.
    progress: f64,
    location: Location,
}

impl Enemy {
    /// Creates an enemy of `kind` standing at `start`.
    #[must_use]
    pub fn new(kind: EnemyKind, start: Location) -> Self {
        Self::with_stats(kind, kind.stats(), start)
    }

    /// Creates an enemy with custom stats.
    #[must_use]
    pub fn with_stats(kind: EnemyKind, stats: EnemyStats, start: Location) -> Self {
        Self {
            kind,
            stats,
            health: stats.max_health,
            progress: 0.0,
            location: start,
        }
    }

    /// Moves the enemy `speed` further along `path`. Dead or finished
    /// enemies stay put.
    pub fn tick(&mut self, path: &Path) {
        if !self.is_active() {
            return;
        }
        let length = path.length();
        self.progress = if length > 0.0 {
            (self.progress + self.stats.speed / length).min(1.0)
        } else {
            1.0
        };
        self.location = path.location_at(self.progress);
    }

    /// Subtracts `damage` from health.
    pub fn on_hit(&mut self, damage: f64) {
        self.health -= damage;
    }

    /// True once health has dropped to zero or below.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// True once the enemy has walked the whole path.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.progress >= 1.0
    }

    /// True while the enemy can be targeted and damaged.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_dead() && !self.has_finished()
    }

    /// True if a circle of diameter `size` at `location` overlaps this enemy.
    #[must_use]
    pub fn is_touching(&self, location: Location, size: f64) -> bool {
        self.location.distance(location) <= (self.stats.size + size) / 2.0
    }

    /// The movement class towers must reach to hit this enemy.
    #[must_use]
    pub fn class(&self) -> Reach {
        if self.stats.flying {
            Reach::AIR
        } else {
            Reach::GROUND
        }
    }

    /// The enemy kind.
    #[must_use]
    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// The enemy's stats.
    #[must_use]
    pub fn stats(&self) -> &EnemyStats {
        &self.stats
    }

    /// Current health.
    #[must_use]
    pub fn health(&self) -> f64 {
        self.health
    }

    /// Fraction of the path completed.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Current position.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Hitbox diameter.
    #[must_use]
    pub fn size(&self) -> f64 {
        self.stats.size
    }
}
