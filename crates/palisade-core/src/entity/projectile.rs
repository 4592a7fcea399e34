//! In-flight projectiles.
//!
//! A projectile follows its target by id. Each tick it re-resolves the
//! target, moves, and possibly lands. Two travel policies exist:
//!
//! - **Moving**: flies from a fixed source toward the target's current
//!   location and lands once the elapsed ticks cover the travel time.
//! - **Line**: an instant beam that hits on a fixed tick and lingers until
//!   its delete tick.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::trace;
use waypath::{Bounds, Location};

use super::{Armament, Enemy, EntityId};
use crate::arena::Arena;
use crate::combat::{self, Hit};
use crate::targeting::TargetView;

/// How far from a dead target's last position a replacement may be found.
pub const RETARGET_RADIUS: f64 = 5.0;

/// What a projectile is flying at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileTarget {
    /// An enemy, with the last place it was seen alive.
    Enemy {
        /// The enemy.
        id: EntityId,
        /// Its location when last resolved.
        last_known: Location,
    },
    /// A fixed point.
    Point(Location),
}

impl ProjectileTarget {
    /// Where the projectile is currently heading.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::Enemy { last_known, .. } => *last_known,
            Self::Point(p) => *p,
        }
    }

    /// The targeted enemy, if any.
    #[must_use]
    pub fn enemy(&self) -> Option<EntityId> {
        match self {
            Self::Enemy { id, .. } => Some(*id),
            Self::Point(_) => None,
        }
    }
}

/// Travel policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Travel {
    /// Straight-line flight at `speed` distance per tick.
    Moving {
        /// Distance per tick.
        speed: f64,
        /// Peak arc height for drawing; does not affect the simulation.
        arc_height: f64,
    },
    /// Instant beam.
    Line {
        /// Elapsed tick on which damage is applied.
        ticks_until_hit: u32,
        /// Elapsed tick on which the beam is removed.
        ticks_until_delete: u32,
    },
}

/// What happens when the projectile connects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Impact {
    /// Damage the target only.
    Single,
    /// Damage every reachable enemy near the impact point.
    Splash {
        /// Damage radius.
        radius: f64,
    },
    /// Damage every reachable enemy touched along the way, once each.
    Pierce {
        /// Projectile diameter.
        size: f64,
        /// Enemies already hit.
        struck: BTreeSet<EntityId>,
    },
}

/// Why a projectile is being removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Removal {
    /// Reached its target and applied its effect.
    Arrived,
    /// Lifetime ran out.
    Expired,
    /// Target died and no replacement was found.
    Discarded,
}

/// Result of one projectile tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectileStep {
    /// Damage dealt this tick.
    pub hits: Vec<Hit>,
    /// New target picked this tick, if the old one died.
    pub retargeted: Option<EntityId>,
    /// Set when the projectile should be removed at the end of the tick.
    pub removal: Option<Removal>,
}

/// A shot in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    armament: Armament,
    source: Location,
    target: ProjectileTarget,
    location: Location,
    travel: Travel,
    impact: Impact,
    elapsed: u32,
    /// A line projectile whose target vanished before the hit tick.
    target_lost: bool,
}

impl Projectile {
    /// A moving projectile fired from the tower at an enemy.
    #[must_use]
    pub fn moving(
        armament: Armament,
        target: (EntityId, Location),
        speed: f64,
        impact: Impact,
        arc_height: f64,
    ) -> Self {
        Self {
            armament,
            source: armament.location,
            target: ProjectileTarget::Enemy {
                id: target.0,
                last_known: target.1,
            },
            location: armament.location,
            travel: Travel::Moving { speed, arc_height },
            impact,
            elapsed: 0,
            target_lost: false,
        }
    }

    /// A piercing projectile fired from the tower at a fixed point.
    #[must_use]
    pub fn piercing(armament: Armament, point: Location, speed: f64, size: f64) -> Self {
        Self {
            armament,
            source: armament.location,
            target: ProjectileTarget::Point(point),
            location: armament.location,
            travel: Travel::Moving {
                speed,
                arc_height: 0.0,
            },
            impact: Impact::Pierce {
                size,
                struck: BTreeSet::new(),
            },
            elapsed: 0,
            target_lost: false,
        }
    }

    /// An instant beam from `source` to an enemy.
    #[must_use]
    pub fn line(
        armament: Armament,
        source: Location,
        target: (EntityId, Location),
        ticks_until_hit: u32,
        ticks_until_delete: u32,
    ) -> Self {
        Self {
            armament,
            source,
            target: ProjectileTarget::Enemy {
                id: target.0,
                last_known: target.1,
            },
            location: target.1,
            travel: Travel::Line {
                ticks_until_hit,
                ticks_until_delete,
            },
            impact: Impact::Single,
            elapsed: 0,
            target_lost: false,
        }
    }

    /// Advances the projectile by one tick.
    ///
    /// Order: resolve (and if needed replace) the target, move or apply the
    /// beam, then count the tick. Moving projectiles still in flight after
    /// `max_lifetime` ticks expire.
    pub fn tick(
        &mut self,
        enemies: &mut Arena<Enemy>,
        bounds: Bounds,
        max_lifetime: u32,
    ) -> ProjectileStep {
        let mut step = ProjectileStep::default();

        if let Some(removal) = self.refresh_target(enemies, bounds, &mut step) {
            step.removal = Some(removal);
            return step;
        }

        step.removal = match self.travel {
            Travel::Moving { speed, .. } => self.step_moving(enemies, speed, &mut step.hits),
            Travel::Line {
                ticks_until_hit,
                ticks_until_delete,
            } => self.step_line(enemies, ticks_until_hit, ticks_until_delete, &mut step.hits),
        };
        self.elapsed += 1;

        if step.removal.is_none()
            && matches!(self.travel, Travel::Moving { .. })
            && self.elapsed >= max_lifetime
        {
            step.removal = Some(Removal::Expired);
        }
        step
    }

    fn refresh_target(
        &mut self,
        enemies: &Arena<Enemy>,
        bounds: Bounds,
        step: &mut ProjectileStep,
    ) -> Option<Removal> {
        let ProjectileTarget::Enemy { id, last_known } = &mut self.target else {
            return None;
        };
        if let Some(enemy) = enemies.get(*id).filter(|e| e.is_active()) {
            *last_known = enemy.location();
            return None;
        }

        match self.travel {
            Travel::Line { .. } => {
                self.target_lost = true;
                None
            }
            Travel::Moving { .. } => {
                let view = TargetView::new(enemies, bounds);
                if let Some((new_id, location)) =
                    view.retarget(&self.armament, *last_known, RETARGET_RADIUS)
                {
                    trace!(from = %id, to = %new_id, "Projectile retargeted");
                    *id = new_id;
                    *last_known = location;
                    step.retargeted = Some(new_id);
                    None
                } else {
                    trace!(target = %id, "Projectile lost its target");
                    Some(Removal::Discarded)
                }
            }
        }
    }

    fn step_moving(
        &mut self,
        enemies: &mut Arena<Enemy>,
        speed: f64,
        hits: &mut Vec<Hit>,
    ) -> Option<Removal> {
        let target = self.target.location();
        let travel_time = self.source.distance(target) / speed;
        let elapsed = f64::from(self.elapsed);

        if elapsed >= travel_time {
            self.location = target;
            hits.extend(self.land(enemies));
            return Some(Removal::Arrived);
        }

        self.location = self.source.lerp(target, elapsed / travel_time);
        if let Impact::Pierce { size, struck } = &mut self.impact {
            hits.extend(combat::pierce(
                enemies,
                &self.armament,
                self.location,
                *size,
                struck,
            ));
        }
        None
    }

    fn step_line(
        &mut self,
        enemies: &mut Arena<Enemy>,
        ticks_until_hit: u32,
        ticks_until_delete: u32,
        hits: &mut Vec<Hit>,
    ) -> Option<Removal> {
        self.location = self.target.location();
        if self.elapsed == ticks_until_hit && !self.target_lost {
            if let Some(id) = self.target.enemy() {
                hits.extend(combat::strike(enemies, id, self.armament.damage));
            }
        }
        (self.elapsed >= ticks_until_delete).then_some(Removal::Expired)
    }

    fn land(&mut self, enemies: &mut Arena<Enemy>) -> Vec<Hit> {
        match &mut self.impact {
            Impact::Single => self
                .target
                .enemy()
                .and_then(|id| combat::strike(enemies, id, self.armament.damage))
                .into_iter()
                .collect(),
            Impact::Splash { radius } => {
                combat::splash(enemies, &self.armament, self.location, *radius)
            }
            Impact::Pierce { size, struck } => {
                combat::pierce(enemies, &self.armament, self.location, *size, struck)
            }
        }
    }

    /// Fraction of the flight completed, in `[0, 1]`. Beams report 1.
    #[must_use]
    pub fn progress(&self) -> f64 {
        match self.travel {
            Travel::Moving { speed, .. } => {
                let travel_time = self.source.distance(self.target.location()) / speed;
                if travel_time > 0.0 {
                    (f64::from(self.elapsed) / travel_time).min(1.0)
                } else {
                    1.0
                }
            }
            Travel::Line { .. } => 1.0,
        }
    }

    /// Profile of the tower that fired this.
    #[must_use]
    pub fn armament(&self) -> &Armament {
        &self.armament
    }

    /// Where the projectile started.
    #[must_use]
    pub fn source(&self) -> Location {
        self.source
    }

    /// The current target.
    #[must_use]
    pub fn target(&self) -> &ProjectileTarget {
        &self.target
    }

    /// Where the projectile is heading.
    #[must_use]
    pub fn target_location(&self) -> Location {
        self.target.location()
    }

    /// Current position.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Travel policy.
    #[must_use]
    pub fn travel(&self) -> &Travel {
        &self.travel
    }

    /// Hit policy.
    #[must_use]
    pub fn impact(&self) -> &Impact {
        &self.impact
    }

    /// Ticks since creation.
    #[must_use]
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EnemyKind, EnemyStats, Reach, TowerKind};
    use crate::targeting::TargetingMode;

    const LIFETIME: u32 = 200;

    fn bounds() -> Bounds {
        Bounds::new(80.0, 45.0)
    }

    fn armament() -> Armament {
        Armament {
            tower: EntityId::new(0),
            kind: TowerKind::Archer,
            location: Location::new(0.0, 0.0),
            damage: 10.0,
            range: 10.0,
            reach: Reach::all(),
            targeting: TargetingMode::First,
        }
    }

    fn still_enemy(kind: EnemyKind, at: Location) -> Enemy {
        Enemy::with_stats(
            kind,
            EnemyStats {
                speed: 0.0,
                ..kind.stats()
            },
            at,
        )
    }

    mod moving_tests {
        use super::*;

        #[test]
        fn lands_after_travel_time() {
            let mut arena = Arena::new();
            let target = Location::new(6.0, 0.0);
            let id = arena.spawn(still_enemy(EnemyKind::Regular, target));
            let mut shot = Projectile::moving(armament(), (id, target), 2.0, Impact::Single, 0.0);

            // travel time is 3 ticks: elapsed 0, 1, 2 in flight, lands at 3
            for expected_x in [0.0, 2.0, 4.0] {
                let step = shot.tick(&mut arena, bounds(), LIFETIME);
                assert!(step.removal.is_none());
                assert!(step.hits.is_empty());
                assert!((shot.location().x - expected_x).abs() < 1e-9);
            }
            let step = shot.tick(&mut arena, bounds(), LIFETIME);
            assert_eq!(step.removal, Some(Removal::Arrived));
            assert_eq!(step.hits.len(), 1);
            assert_eq!(arena.get(id).map(Enemy::health), Some(190.0));
        }

        #[test]
        fn dead_target_with_nobody_near_is_discarded() {
            let mut arena = Arena::new();
            let target = Location::new(8.0, 0.0);
            let id = arena.spawn(still_enemy(EnemyKind::Regular, target));
            let mut shot = Projectile::moving(armament(), (id, target), 1.0, Impact::Single, 0.0);
            shot.tick(&mut arena, bounds(), LIFETIME);

            if let Some(enemy) = arena.get_mut(id) {
                enemy.on_hit(500.0);
            }
            let step = shot.tick(&mut arena, bounds(), LIFETIME);
            assert_eq!(step.removal, Some(Removal::Discarded));
            assert!(step.hits.is_empty());
        }

        #[test]
        fn dead_target_is_replaced_nearby() {
            let mut arena = Arena::new();
            let target = Location::new(8.0, 0.0);
            let id = arena.spawn(still_enemy(EnemyKind::Regular, target));
            let other = arena.spawn(still_enemy(EnemyKind::Regular, Location::new(9.0, 2.0)));
            let mut shot = Projectile::moving(armament(), (id, target), 1.0, Impact::Single, 0.0);

            arena.despawn(id);
            let step = shot.tick(&mut arena, bounds(), LIFETIME);
            assert_eq!(step.retargeted, Some(other));
            assert_eq!(shot.target().enemy(), Some(other));
            assert!(step.removal.is_none());
        }

        #[test]
        fn expires_after_lifetime() {
            let mut arena = Arena::new();
            let target = Location::new(8.0, 0.0);
            let id = arena.spawn(still_enemy(EnemyKind::Regular, target));
            let mut shot = Projectile::moving(armament(), (id, target), 0.01, Impact::Single, 0.0);
            let mut removal = None;
            for _ in 0..5 {
                removal = shot.tick(&mut arena, bounds(), 5).removal;
            }
            assert_eq!(removal, Some(Removal::Expired));
        }

        #[test]
        fn splash_lands_on_group() {
            let mut arena = Arena::new();
            let target = Location::new(4.0, 0.0);
            let id = arena.spawn(still_enemy(EnemyKind::Regular, target));
            let near = arena.spawn(still_enemy(EnemyKind::Tank, Location::new(6.0, 0.0)));
            let arm = Armament {
                damage: 30.0,
                ..armament()
            };
            let mut shot =
                Projectile::moving(arm, (id, target), 10.0, Impact::Splash { radius: 3.0 }, 6.0);
            shot.tick(&mut arena, bounds(), LIFETIME);
            let step = shot.tick(&mut arena, bounds(), LIFETIME);
            assert_eq!(step.removal, Some(Removal::Arrived));
            assert_eq!(step.hits.len(), 2);
            assert_eq!(arena.get(near).map(Enemy::health), Some(970.0));
        }
    }

    mod pierce_tests {
        use super::*;

        #[test]
        fn pierces_through_a_line_of_enemies() {
            let mut arena = Arena::new();
            for x in [3.0, 6.0, 9.0] {
                arena.spawn(still_enemy(EnemyKind::Regular, Location::new(x, 0.0)));
            }
            let mut shot = Projectile::piercing(armament(), Location::new(12.0, 0.0), 3.0, 2.0);
            let mut total_hits = 0;
            let mut removal = None;
            while removal.is_none() {
                let step = shot.tick(&mut arena, bounds(), LIFETIME);
                total_hits += step.hits.len();
                removal = step.removal;
            }
            assert_eq!(removal, Some(Removal::Arrived));
            assert_eq!(total_hits, 3);
            assert!(arena
                .entities_sorted()
                .all(|(_, e)| (e.health() - 190.0).abs() < 1e-9));
        }
    }

    mod line_tests {
        use super::*;

        #[test]
        fn hits_on_creation_tick_and_lingers() {
            let mut arena = Arena::new();
            let target = Location::new(5.0, 0.0);
            let id = arena.spawn(still_enemy(EnemyKind::Regular, target));
            let mut shot = Projectile::line(armament(), Location::ORIGIN, (id, target), 0, 3);

            let step = shot.tick(&mut arena, bounds(), LIFETIME);
            assert_eq!(step.hits.len(), 1);
            for _ in 0..2 {
                let step = shot.tick(&mut arena, bounds(), LIFETIME);
                assert!(step.hits.is_empty());
                assert!(step.removal.is_none());
            }
            let step = shot.tick(&mut arena, bounds(), LIFETIME);
            assert_eq!(step.removal, Some(Removal::Expired));
            assert_eq!(arena.get(id).map(Enemy::health), Some(190.0));
        }

        #[test]
        fn lost_target_skips_hit() {
            let mut arena = Arena::new();
            let target = Location::new(5.0, 0.0);
            let id = arena.spawn(still_enemy(EnemyKind::Regular, target));
            let other = arena.spawn(still_enemy(EnemyKind::Regular, Location::new(6.0, 0.0)));
            let mut shot = Projectile::line(armament(), Location::ORIGIN, (id, target), 1, 3);

            shot.tick(&mut arena, bounds(), LIFETIME);
            arena.despawn(id);
            let step = shot.tick(&mut arena, bounds(), LIFETIME);
            assert!(step.hits.is_empty());
            assert!(step.retargeted.is_none());
            assert_eq!(arena.get(other).map(Enemy::health), Some(200.0));
        }
    }
}
