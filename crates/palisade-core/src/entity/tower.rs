//! Towers: per-kind tables, the cooldown state machine and firing.
//!
//! Every kind shares one [`Tower`] type. What differs between kinds is data:
//! a [`TowerStats`] table with per-level multipliers and an [`Attack`] that
//! says what a shot looks like.

use std::fmt;

use serde::{Deserialize, Serialize};
use waypath::Location;

use super::{Enemy, EntityId, Impact, Projectile, Reach};
use crate::error::InvalidState;
use crate::targeting::{TargetView, TargetingMode};

/// Highest level any tower can reach.
pub const MAX_LEVEL: u8 = 3;

// =============================================================================
// Kind tables
// =============================================================================

/// What a tower's shot does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Attack {
    /// One moving projectile that damages its target on arrival.
    Single {
        /// Distance per tick.
        speed: f64,
    },
    /// One moving projectile that damages everything near the impact point.
    Splash {
        /// Distance per tick.
        speed: f64,
        /// Damage radius around the impact.
        radius: f64,
        /// Peak height of the drawn arc; not simulated.
        arc_height: f64,
    },
    /// A shot aimed through the target to the field edge, damaging every
    /// enemy it touches once.
    Pierce {
        /// Distance per tick.
        speed: f64,
        /// Projectile diameter for touch tests.
        size: f64,
    },
    /// Instant lightning that jumps from enemy to enemy.
    Chain {
        /// Links in the chain at each level.
        links: [usize; MAX_LEVEL as usize],
        /// Longest jump between two linked enemies.
        bounce_range: f64,
        /// Ticks each link stays visible.
        ticks_until_delete: u32,
    },
}

/// Base values and per-level multipliers for a tower kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Purchase price.
    pub cost: u32,
    /// Price of upgrading to level 2 and to level 3.
    pub upgrade_costs: [u32; MAX_LEVEL as usize - 1],
    /// Ticks between actions at level 1.
    pub cooldown: u32,
    /// Damage per hit at level 1.
    pub damage: f64,
    /// Range at level 1.
    pub range: f64,
    /// Movement classes the tower can hit.
    pub reach: Reach,
    /// Cooldown scale per level.
    pub cooldown_multipliers: [f64; MAX_LEVEL as usize],
    /// Damage scale per level.
    pub damage_multipliers: [f64; MAX_LEVEL as usize],
    /// Range scale per level.
    pub range_multipliers: [f64; MAX_LEVEL as usize],
    /// Shot behaviour.
    pub attack: Attack,
}

static ARCHER: TowerStats = TowerStats {
    cost: 100,
    upgrade_costs: [75, 150],
    cooldown: 14,
    damage: 10.0,
    range: 10.0,
    reach: Reach::all(),
    cooldown_multipliers: [1.0, 0.8, 0.6],
    damage_multipliers: [1.0, 1.3, 1.5],
    range_multipliers: [1.0, 1.3, 1.5],
    attack: Attack::Single { speed: 1.2 },
};

static BOMB: TowerStats = TowerStats {
    cost: 300,
    upgrade_costs: [200, 350],
    cooldown: 40,
    damage: 30.0,
    range: 7.5,
    reach: Reach::GROUND,
    cooldown_multipliers: [1.0, 0.8, 0.6],
    damage_multipliers: [1.0, 1.3, 1.5],
    range_multipliers: [1.0, 1.3, 1.5],
    attack: Attack::Splash {
        speed: 0.6,
        radius: 3.0,
        arc_height: 6.0,
    },
};

static LASER: TowerStats = TowerStats {
    cost: 300,
    upgrade_costs: [225, 400],
    cooldown: 0,
    damage: 2.0,
    range: 10.0,
    reach: Reach::all(),
    cooldown_multipliers: [0.0, 0.0, 0.0],
    damage_multipliers: [1.0, 1.5, 2.0],
    range_multipliers: [1.0, 1.5, 2.0],
    attack: Attack::Single { speed: 1.5 },
};

static SLINGSHOT: TowerStats = TowerStats {
    cost: 300,
    upgrade_costs: [200, 325],
    cooldown: 40,
    damage: 20.0,
    range: 10.0,
    reach: Reach::all(),
    cooldown_multipliers: [1.0, 0.8, 0.6],
    damage_multipliers: [1.0, 1.5, 2.0],
    range_multipliers: [1.0, 1.5, 1.8],
    attack: Attack::Pierce {
        speed: 3.0,
        size: 2.0,
    },
};

static WIZARD: TowerStats = TowerStats {
    cost: 200,
    upgrade_costs: [150, 250],
    cooldown: 20,
    damage: 15.0,
    range: 10.0,
    reach: Reach::all(),
    cooldown_multipliers: [1.0, 0.8, 0.6],
    damage_multipliers: [1.0, 1.3, 1.7],
    range_multipliers: [1.0, 1.3, 1.5],
    attack: Attack::Chain {
        links: [3, 4, 5],
        bounce_range: 5.0,
        ticks_until_delete: 10,
    },
};

/// The tower kinds a player can buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Cheap single-target arrows.
    Archer,
    /// Ground-only splash damage.
    Bomb,
    /// Fires every tick for small damage.
    Laser,
    /// Piercing shots to the field edge.
    Slingshot,
    /// Chain lightning.
    Wizard,
}

impl TowerKind {
    /// Every kind, in shop order.
    pub const ALL: [Self; 5] = [
        Self::Archer,
        Self::Bomb,
        Self::Laser,
        Self::Slingshot,
        Self::Wizard,
    ];

    /// The stat table for this kind.
    #[must_use]
    pub fn stats(self) -> &'static TowerStats {
        match self {
            Self::Archer => &ARCHER,
            Self::Bomb => &BOMB,
            Self::Laser => &LASER,
            Self::Slingshot => &SLINGSHOT,
            Self::Wizard => &WIZARD,
        }
    }

    /// Purchase price.
    #[must_use]
    pub fn cost(self) -> u32 {
        self.stats().cost
    }
}

impl fmt::Display for TowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Archer => "Archer",
            Self::Bomb => "Bomb",
            Self::Laser => "Laser",
            Self::Slingshot => "Slingshot",
            Self::Wizard => "Wizard",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Armament
// =============================================================================

/// What a tower's shots carry with them: enough to apply hit rules after the
/// tower itself is gone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Armament {
    /// The firing tower.
    pub tower: EntityId,
    /// Its kind.
    pub kind: TowerKind,
    /// Its location.
    pub location: Location,
    /// Damage per hit.
    pub damage: f64,
    /// Effective range.
    pub range: f64,
    /// Movement classes it can hit.
    pub reach: Reach,
    /// Selection policy for targets and retargets.
    pub targeting: TargetingMode,
}

impl Armament {
    /// True if `enemy` is active, reachable and in range.
    ///
    /// Range is measured to the edge of the enemy's hitbox.
    #[must_use]
    pub fn can_damage(&self, enemy: &Enemy) -> bool {
        enemy.is_active()
            && self.reach.intersects(enemy.class())
            && self.location.distance(enemy.location()) - enemy.size() / 2.0 <= self.range
    }
}

// =============================================================================
// Tower
// =============================================================================

/// A placed tower.
///
/// The tower is `Ready` when its remaining cooldown is at most zero and
/// `Cooling` otherwise. Only [`tick`](Self::tick) moves between the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    kind: TowerKind,
    location: Location,
    level: u8,
    remaining_cooldown: i64,
    targeting: TargetingMode,
    total_spent: u32,
    damage_dealt: f64,
}

impl Tower {
    /// Creates a level 1 tower. The first action waits half a second.
    #[must_use]
    pub fn new(kind: TowerKind, location: Location, ticks_per_second: u32) -> Self {
        Self {
            kind,
            location,
            level: 1,
            remaining_cooldown: i64::from(ticks_per_second / 2),
            targeting: TargetingMode::default(),
            total_spent: kind.cost(),
            damage_dealt: 0.0,
        }
    }

    fn level_index(&self) -> usize {
        usize::from(self.level.saturating_sub(1))
    }

    /// Base cooldown scaled by the current level, truncated to whole ticks.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn effective_cooldown(&self) -> i64 {
        let stats = self.stats();
        (f64::from(stats.cooldown) * stats.cooldown_multipliers[self.level_index()]) as i64
    }

    /// Damage per hit at the current level.
    #[must_use]
    pub fn effective_damage(&self) -> f64 {
        let stats = self.stats();
        stats.damage * stats.damage_multipliers[self.level_index()]
    }

    /// Range at the current level.
    #[must_use]
    pub fn effective_range(&self) -> f64 {
        let stats = self.stats();
        stats.range * stats.range_multipliers[self.level_index()]
    }

    /// Advances the cooldown by one tick and fires if ready.
    ///
    /// The remaining cooldown is first decremented, then clamped to the
    /// current effective cooldown so an upgrade takes effect immediately.
    /// When ready the tower acts and the cooldown resets, whether or not a
    /// target was found.
    pub fn tick(&mut self, id: EntityId, view: &TargetView<'_>) -> Vec<Projectile> {
        let cooldown = self.effective_cooldown();
        self.remaining_cooldown = (self.remaining_cooldown - 1).min(cooldown);
        if self.remaining_cooldown > 0 {
            return Vec::new();
        }
        let shots = self.act(id, view);
        self.remaining_cooldown = cooldown;
        shots
    }

    /// Picks a target and builds this tower's shots at it.
    #[must_use]
    pub fn act(&self, id: EntityId, view: &TargetView<'_>) -> Vec<Projectile> {
        let armament = self.armament(id);
        let Some(target) = view.find_target(&armament) else {
            return Vec::new();
        };

        match self.stats().attack {
            Attack::Single { speed } => {
                vec![Projectile::moving(armament, target, speed, Impact::Single, 0.0)]
            }
            Attack::Splash {
                speed,
                radius,
                arc_height,
            } => vec![Projectile::moving(
                armament,
                target,
                speed,
                Impact::Splash { radius },
                arc_height,
            )],
            Attack::Pierce { speed, size } => {
                let direction = target.1.as_dvec2() - self.location.as_dvec2();
                view.bounds()
                    .exit_point(self.location, direction)
                    .map(|exit| Projectile::piercing(armament, exit, speed, size))
                    .into_iter()
                    .collect()
            }
            Attack::Chain {
                links,
                bounce_range,
                ticks_until_delete,
            } => {
                let count = links[self.level_index()];
                let mut chain = vec![target.0];
                let mut shots = vec![Projectile::line(
                    armament,
                    self.location,
                    target,
                    0,
                    ticks_until_delete,
                )];
                let mut previous = target.1;
                while chain.len() < count {
                    let Some(next) = view.nearest(previous, bounce_range, armament.reach, &chain)
                    else {
                        break;
                    };
                    shots.push(Projectile::line(
                        armament,
                        previous,
                        next,
                        0,
                        ticks_until_delete,
                    ));
                    chain.push(next.0);
                    previous = next.1;
                }
                shots
            }
        }
    }

    /// The shot profile for this tower under `id`.
    #[must_use]
    pub fn armament(&self, id: EntityId) -> Armament {
        Armament {
            tower: id,
            kind: self.kind,
            location: self.location,
            damage: self.effective_damage(),
            range: self.effective_range(),
            reach: self.stats().reach,
            targeting: self.targeting,
        }
    }

    /// True below max level.
    #[must_use]
    pub fn can_upgrade(&self) -> bool {
        self.level < MAX_LEVEL
    }

    /// Price of the next level, or `None` at max level.
    #[must_use]
    pub fn upgrade_cost(&self) -> Option<u32> {
        if self.can_upgrade() {
            Some(self.stats().upgrade_costs[self.level_index()])
        } else {
            None
        }
    }

    /// Raises the level by one and records the price paid.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidState::MaxLevel`] if the tower is already maxed.
    pub fn upgrade(&mut self) -> Result<u32, InvalidState> {
        let cost = self.upgrade_cost().ok_or(InvalidState::MaxLevel {
            max_level: MAX_LEVEL,
        })?;
        self.level += 1;
        self.total_spent += cost;
        Ok(cost)
    }

    /// Every kind can currently be sold.
    #[must_use]
    pub fn can_sell(&self) -> bool {
        true
    }

    /// Refund on sale: half of everything spent, rounded down.
    #[must_use]
    pub fn sell_value(&self) -> u32 {
        self.total_spent / 2
    }

    /// Purchase price plus every upgrade paid.
    #[must_use]
    pub fn total_spent(&self) -> u32 {
        self.total_spent
    }

    /// Switches the targeting mode.
    pub fn set_targeting(&mut self, mode: TargetingMode) {
        self.targeting = mode;
    }

    /// Advances to the next targeting mode and returns it.
    pub fn cycle_targeting(&mut self) -> TargetingMode {
        self.targeting = self.targeting.next();
        self.targeting
    }

    /// Adds to the damage credited to this tower.
    pub fn credit_damage(&mut self, amount: f64) {
        self.damage_dealt += amount;
    }

    /// The tower kind.
    #[must_use]
    pub fn kind(&self) -> TowerKind {
        self.kind
    }

    /// The kind's stat table.
    #[must_use]
    pub fn stats(&self) -> &'static TowerStats {
        self.kind.stats()
    }

    /// Where the tower stands.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Current level, starting at 1.
    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Highest level.
    #[must_use]
    pub fn max_level(&self) -> u8 {
        MAX_LEVEL
    }

    /// Ticks until the next action.
    #[must_use]
    pub fn remaining_cooldown(&self) -> i64 {
        self.remaining_cooldown
    }

    /// Current targeting mode.
    #[must_use]
    pub fn targeting(&self) -> TargetingMode {
        self.targeting
    }

    /// Damage this tower's shots have dealt.
    #[must_use]
    pub fn damage_dealt(&self) -> f64 {
        self.damage_dealt
    }
}
