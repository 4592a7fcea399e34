//! Enemy ranking and target selection.
//!
//! [`TargetView`] is the read-only window towers and projectiles get onto the
//! live enemies. All selection goes through [`sort_enemies`], so ties are
//! always broken by spawn order.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use waypath::{Bounds, Location};

use crate::arena::Arena;
use crate::entity::{Armament, Enemy, EntityId, Reach};

/// How a tower picks among the enemies it can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TargetingMode {
    /// Furthest along the path (closest to the base).
    #[default]
    First,
    /// Least far along the path.
    Last,
    /// Highest max health, then furthest along.
    Strongest,
    /// Lowest max health, then furthest along.
    Weakest,
}

impl TargetingMode {
    /// Every mode in cycling order.
    pub const ALL: [Self; 4] = [Self::First, Self::Last, Self::Strongest, Self::Weakest];

    /// The mode after this one, wrapping around.
    ///
    /// ```
    /// use palisade_core::targeting::TargetingMode;
    ///
    /// assert_eq!(TargetingMode::First.next(), TargetingMode::Last);
    /// assert_eq!(TargetingMode::Weakest.next(), TargetingMode::First);
    /// ```
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::First => Self::Last,
            Self::Last => Self::Strongest,
            Self::Strongest => Self::Weakest,
            Self::Weakest => Self::First,
        }
    }

    /// Orders two enemies; the preferred target compares as `Less`.
    fn compare(self, a: &Enemy, b: &Enemy) -> Ordering {
        let further = || b.progress().total_cmp(&a.progress());
        match self {
            Self::First => further(),
            Self::Last => a.progress().total_cmp(&b.progress()),
            Self::Strongest => b
                .stats()
                .max_health
                .total_cmp(&a.stats().max_health)
                .then_with(further),
            Self::Weakest => a
                .stats()
                .max_health
                .total_cmp(&b.stats().max_health)
                .then_with(further),
        }
    }
}

impl fmt::Display for TargetingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::First => "First",
            Self::Last => "Last",
            Self::Strongest => "Strongest",
            Self::Weakest => "Weakest",
        };
        f.write_str(name)
    }
}

/// Sorts `ids` so the preferred target under `mode` comes first.
///
/// The sort is stable: enemies that compare equal keep their order in `ids`.
/// Ids with no live entry in `enemies` sink to the end.
pub fn sort_enemies(enemies: &Arena<Enemy>, ids: &mut [EntityId], mode: TargetingMode) {
    ids.sort_by(|a, b| match (enemies.get(*a), enemies.get(*b)) {
        (Some(ea), Some(eb)) => mode.compare(ea, eb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

// =============================================================================
// TargetView
// =============================================================================

/// Read-only access to the enemies for target selection.
#[derive(Debug, Clone, Copy)]
pub struct TargetView<'a> {
    enemies: &'a Arena<Enemy>,
    bounds: Bounds,
}

impl<'a> TargetView<'a> {
    /// Wraps the enemy arena of a field with the given bounds.
    #[must_use]
    pub fn new(enemies: &'a Arena<Enemy>, bounds: Bounds) -> Self {
        Self { enemies, bounds }
    }

    /// The field rectangle.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Looks up an enemy.
    #[must_use]
    pub fn enemy(&self, id: EntityId) -> Option<&'a Enemy> {
        self.enemies.get(id)
    }

    /// Every enemy `armament` can damage right now, best target first.
    #[must_use]
    pub fn candidates(&self, armament: &Armament) -> Vec<EntityId> {
        self.ranked(armament, |_| true)
    }

    /// The best target for `armament`, with its location.
    #[must_use]
    pub fn find_target(&self, armament: &Armament) -> Option<(EntityId, Location)> {
        self.first(self.candidates(armament))
    }

    /// Best replacement target within `radius` of `around`.
    ///
    /// Used when a projectile's target dies; the same range and reach rules
    /// as [`find_target`](Self::find_target) apply.
    #[must_use]
    pub fn retarget(
        &self,
        armament: &Armament,
        around: Location,
        radius: f64,
    ) -> Option<(EntityId, Location)> {
        self.first(self.ranked(armament, |e| e.location().distance(around) <= radius))
    }

    /// The nearest active enemy within `radius` of `from` that `reach` can hit
    /// and that is not in `exclude`. Ties go to the lower id.
    #[must_use]
    pub fn nearest(
        &self,
        from: Location,
        radius: f64,
        reach: Reach,
        exclude: &[EntityId],
    ) -> Option<(EntityId, Location)> {
        self.enemies
            .entities_sorted()
            .filter(|(id, e)| {
                e.is_active()
                    && reach.intersects(e.class())
                    && !exclude.contains(id)
                    && e.location().distance(from) <= radius
            })
            .min_by(|(_, a), (_, b)| {
                a.location()
                    .distance(from)
                    .total_cmp(&b.location().distance(from))
            })
            .map(|(id, e)| (id, e.location()))
    }

    fn ranked(&self, armament: &Armament, extra: impl Fn(&Enemy) -> bool) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .enemies
            .entities_sorted()
            .filter(|(_, e)| armament.can_damage(e) && extra(e))
            .map(|(id, _)| id)
            .collect();
        sort_enemies(self.enemies, &mut ids, armament.targeting);
        ids
    }

    fn first(&self, ids: Vec<EntityId>) -> Option<(EntityId, Location)> {
        ids.into_iter()
            .next()
            .and_then(|id| self.enemies.get(id).map(|e| (id, e.location())))
    }
}
