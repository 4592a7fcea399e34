//! Read-only snapshots for the UI layer.
//!
//! Snapshots are plain data copied out of the game after a tick. They carry
//! everything needed to draw a frame or fill a tooltip and serialize with
//! serde so a frontend in another process can consume them.

use serde::Serialize;
use waypath::Location;

use crate::entity::{Enemy, EnemyKind, EntityId, Impact, Projectile, Tower, TowerKind, Travel};
use crate::game::{Game, GameStatus};
use crate::path::PathView;
use crate::targeting::TargetingMode;
use crate::wave::WavePhase;

// =============================================================================
// Entity snapshots
// =============================================================================

/// A tower as the UI sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TowerSnapshot {
    /// Tower id.
    pub id: EntityId,
    /// Tower kind.
    pub kind: TowerKind,
    /// Position.
    pub location: Location,
    /// Current level, starting at 1.
    pub level: u8,
    /// Highest level.
    pub max_level: u8,
    /// Effective range.
    pub range: f64,
    /// Effective damage per hit.
    pub damage: f64,
    /// Effective cooldown in ticks.
    pub cooldown: i64,
    /// Ticks until the next action.
    pub remaining_cooldown: i64,
    /// Targeting mode.
    pub targeting: TargetingMode,
    /// Price of the next level, if any.
    pub upgrade_cost: Option<u32>,
    /// Gold returned on sale.
    pub sell_value: u32,
    /// Damage dealt over the tower's life.
    pub damage_dealt: f64,
}

impl TowerSnapshot {
    /// Copies out the state of `tower`.
    #[must_use]
    pub fn new(id: EntityId, tower: &Tower) -> Self {
        Self {
            id,
            kind: tower.kind(),
            location: tower.location(),
            level: tower.level(),
            max_level: tower.max_level(),
            range: tower.effective_range(),
            damage: tower.effective_damage(),
            cooldown: tower.effective_cooldown(),
            remaining_cooldown: tower.remaining_cooldown(),
            targeting: tower.targeting(),
            upgrade_cost: tower.upgrade_cost(),
            sell_value: tower.sell_value(),
            damage_dealt: tower.damage_dealt(),
        }
    }
}

/// An enemy as the UI sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemySnapshot {
    /// Enemy id.
    pub id: EntityId,
    /// Enemy kind.
    pub kind: EnemyKind,
    /// Position.
    pub location: Location,
    /// Current health.
    pub health: f64,
    /// Health on spawn.
    pub max_health: f64,
    /// Fraction of the path completed.
    pub progress: f64,
    /// Hitbox diameter.
    pub size: f64,
    /// True for flying enemies.
    pub flying: bool,
}

impl EnemySnapshot {
    /// Copies out the state of `enemy`.
    #[must_use]
    pub fn new(id: EntityId, enemy: &Enemy) -> Self {
        let stats = enemy.stats();
        Self {
            id,
            kind: enemy.kind(),
            location: enemy.location(),
            health: enemy.health(),
            max_health: stats.max_health,
            progress: enemy.progress(),
            size: stats.size,
            flying: stats.flying,
        }
    }
}

/// How a projectile should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ProjectileShape {
    /// A dart flying to its target.
    Bolt,
    /// A lobbed shell; `height` is the current arc offset.
    Shell {
        /// Height above the straight line at this point of the flight.
        height: f64,
    },
    /// A round shot of the given diameter.
    Ball {
        /// Diameter.
        size: f64,
    },
    /// A beam from `source` to the target.
    Beam,
}

/// A projectile as the UI sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileSnapshot {
    /// Projectile id.
    pub id: EntityId,
    /// Kind of the tower that fired it.
    pub tower_kind: TowerKind,
    /// Where it was fired from.
    pub source: Location,
    /// Current position.
    pub location: Location,
    /// Where it is heading.
    pub target: Location,
    /// Fraction of the flight completed.
    pub progress: f64,
    /// Drawing hint.
    pub shape: ProjectileShape,
}

impl ProjectileSnapshot {
    /// Copies out the state of `projectile`.
    #[must_use]
    pub fn new(id: EntityId, projectile: &Projectile) -> Self {
        let progress = projectile.progress();
        let shape = match (projectile.travel(), projectile.impact()) {
            (Travel::Line { .. }, _) => ProjectileShape::Beam,
            (Travel::Moving { arc_height, .. }, Impact::Splash { .. }) => ProjectileShape::Shell {
                // Parabola peaking mid-flight.
                height: 4.0 * arc_height * progress * (1.0 - progress),
            },
            (Travel::Moving { .. }, Impact::Pierce { size, .. }) => {
                ProjectileShape::Ball { size: *size }
            }
            (Travel::Moving { .. }, Impact::Single) => ProjectileShape::Bolt,
        };
        Self {
            id,
            tower_kind: projectile.armament().kind,
            source: projectile.source(),
            location: projectile.location(),
            target: projectile.target_location(),
            progress,
            shape,
        }
    }
}

// =============================================================================
// Game snapshot
// =============================================================================

/// Everything the UI needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    /// Steps simulated.
    pub tick: u64,
    /// Run state.
    pub status: GameStatus,
    /// Gold held.
    pub gold: u32,
    /// Gold spent.
    pub gold_spent: u32,
    /// Enemies killed.
    pub kills: u32,
    /// Weight of enemies killed.
    pub experience: u32,
    /// Lives left.
    pub lives: u32,
    /// Current wave.
    pub wave: u32,
    /// Last wave.
    pub max_wave: u32,
    /// Wave handler phase.
    pub wave_phase: WavePhase,
    /// Steps per tick.
    pub speed: u32,
    /// Selected spot.
    pub selected: Option<Location>,
    /// Field width.
    pub width: f64,
    /// Field height.
    pub height: f64,
    /// The enemy path.
    pub path: PathView,
    /// Placeable spots.
    pub spots: Vec<Location>,
    /// Towers, in id order.
    pub towers: Vec<TowerSnapshot>,
    /// Enemies, in id order.
    pub enemies: Vec<EnemySnapshot>,
    /// Projectiles, in id order.
    pub projectiles: Vec<ProjectileSnapshot>,
}

impl GameSnapshot {
    /// Copies out the state of `game`.
    #[must_use]
    pub fn capture(game: &Game) -> Self {
        let field = game.field();
        let waves = game.waves();
        Self {
            tick: game.current_tick(),
            status: game.status(),
            gold: game.gold(),
            gold_spent: game.gold_spent(),
            kills: game.kills(),
            experience: game.experience(),
            lives: game.lives(),
            wave: waves.wave(),
            max_wave: waves.max_wave(),
            wave_phase: waves.phase(field.has_enemies()),
            speed: game.speed(),
            selected: game.selected(),
            width: field.width(),
            height: field.height(),
            path: PathView::from(field.path()),
            spots: field.placeable_spots().to_vec(),
            towers: field
                .towers()
                .entities_sorted()
                .map(|(id, t)| TowerSnapshot::new(id, t))
                .collect(),
            enemies: field
                .enemies()
                .entities_sorted()
                .map(|(id, e)| EnemySnapshot::new(id, e))
                .collect(),
            projectiles: field
                .projectiles()
                .entities_sorted()
                .map(|(id, p)| ProjectileSnapshot::new(id, p))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entity::EnemyKind;

    #[test]
    fn tower_snapshot_reports_upgrade_and_sale() {
        let tower = Tower::new(TowerKind::Archer, Location::new(1.0, 1.0), 20);
        let snap = TowerSnapshot::new(EntityId::new(0), &tower);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.upgrade_cost, Some(75));
        assert_eq!(snap.sell_value, 50);
        assert_eq!(snap.cooldown, 14);
        assert_eq!(snap.remaining_cooldown, 10);
    }

    #[test]
    fn enemy_snapshot_copies_stats() {
        let enemy = Enemy::new(EnemyKind::Drone, Location::new(3.0, 4.0));
        let snap = EnemySnapshot::new(EntityId::new(7), &enemy);
        assert_eq!(snap.max_health, 100.0);
        assert!(snap.flying);
        assert_eq!(snap.location, Location::new(3.0, 4.0));
    }

    #[test]
    fn game_snapshot_serializes() {
        let game = Game::new(GameConfig::default(), 1).unwrap();
        let snap = game.snapshot();
        assert_eq!(snap.tick, 0);
        assert_eq!(snap.status, GameStatus::Idle);
        assert_eq!(snap.gold, 650);
        assert_eq!(snap.spots.len(), game.field().placeable_spots().len());
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["lives"], 15);
        assert_eq!(json["path"]["points"].as_array().map(Vec::len), Some(1001));
    }
}
