//! Damage application.
//!
//! Projectiles never touch enemy health directly; they call into here so that
//! the "only active enemies take damage" rule lives in one place.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use waypath::Location;

use crate::arena::Arena;
use crate::entity::{Armament, Enemy, EntityId};

/// One application of damage to one enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// The enemy hit.
    pub enemy: EntityId,
    /// Damage applied.
    pub damage: f64,
    /// True if this hit took the enemy to zero health or below.
    pub killed: bool,
}

/// Damages a single enemy if it is still active.
pub fn strike(enemies: &mut Arena<Enemy>, id: EntityId, damage: f64) -> Option<Hit> {
    let enemy = enemies.get_mut(id).filter(|e| e.is_active())?;
    enemy.on_hit(damage);
    Some(Hit {
        enemy: id,
        damage,
        killed: enemy.is_dead(),
    })
}

/// Damages every reachable enemy within `radius` of `impact`.
///
/// Firing range plays no part here: anything near the impact point is hit.
pub fn splash(
    enemies: &mut Arena<Enemy>,
    armament: &Armament,
    impact: Location,
    radius: f64,
) -> Vec<Hit> {
    let ids: Vec<EntityId> = enemies
        .entities_sorted()
        .filter(|(_, e)| {
            e.is_active()
                && armament.reach.intersects(e.class())
                && e.location().distance(impact) <= radius
        })
        .map(|(id, _)| id)
        .collect();
    ids.into_iter()
        .filter_map(|id| strike(enemies, id, armament.damage))
        .collect()
}

/// Damages every reachable enemy touching a projectile of diameter `size` at
/// `at`, skipping enemies already in `struck` and adding the new ones.
pub fn pierce(
    enemies: &mut Arena<Enemy>,
    armament: &Armament,
    at: Location,
    size: f64,
    struck: &mut BTreeSet<EntityId>,
) -> Vec<Hit> {
    let ids: Vec<EntityId> = enemies
        .entities_sorted()
        .filter(|(id, e)| {
            e.is_active()
                && !struck.contains(id)
                && armament.reach.intersects(e.class())
                && e.is_touching(at, size)
        })
        .map(|(id, _)| id)
        .collect();
    ids.into_iter()
        .filter_map(|id| {
            struck.insert(id);
            strike(enemies, id, armament.damage)
        })
        .collect()
}
