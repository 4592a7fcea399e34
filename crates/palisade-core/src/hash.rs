//! State hashing for determinism verification.
//!
//! Two games built from the same seed and fed the same commands must produce
//! identical hashes after every tick. Floats are hashed through `to_bits` so
//! the hash is exact.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use waypath::Location;

use crate::entity::{Enemy, EntityId, Impact, Projectile, ProjectileTarget, Tower};
use crate::game::Game;
use crate::wave::WaveHandler;

/// Compute a deterministic hash of game state.
///
/// This hash includes:
/// - Tick, seed, run status and the player ledger
/// - Wave handler counters and the current roster
/// - Every tower, enemy and projectile, in id order
#[must_use]
pub fn hash_game(game: &Game) -> u64 {
    let mut hasher = DefaultHasher::new();

    game.current_tick().hash(&mut hasher);
    game.seed().hash(&mut hasher);
    game.status().hash(&mut hasher);
    game.gold().hash(&mut hasher);
    game.gold_spent().hash(&mut hasher);
    game.kills().hash(&mut hasher);
    game.experience().hash(&mut hasher);
    game.lives().hash(&mut hasher);

    hash_waves(game.waves(), &mut hasher);

    let field = game.field();
    for (id, tower) in field.towers().entities_sorted() {
        hash_tower(id, tower, &mut hasher);
    }
    for (id, enemy) in field.enemies().entities_sorted() {
        hash_enemy(id, enemy, &mut hasher);
    }
    for (id, projectile) in field.projectiles().entities_sorted() {
        hash_projectile(id, projectile, &mut hasher);
    }

    hasher.finish()
}

fn hash_location<H: Hasher>(location: Location, hasher: &mut H) {
    location.x.to_bits().hash(hasher);
    location.y.to_bits().hash(hasher);
}

fn hash_waves<H: Hasher>(waves: &WaveHandler, hasher: &mut H) {
    waves.wave().hash(hasher);
    waves.roster().hash(hasher);
    waves.remaining_spawns().hash(hasher);
    waves.ticks_until_next_spawn().hash(hasher);
    waves.ticks_until_next_wave().hash(hasher);
}

fn hash_tower<H: Hasher>(id: EntityId, tower: &Tower, hasher: &mut H) {
    id.hash(hasher);
    tower.kind().hash(hasher);
    hash_location(tower.location(), hasher);
    tower.level().hash(hasher);
    tower.remaining_cooldown().hash(hasher);
    tower.targeting().hash(hasher);
    tower.total_spent().hash(hasher);
    tower.damage_dealt().to_bits().hash(hasher);
}

fn hash_enemy<H: Hasher>(id: EntityId, enemy: &Enemy, hasher: &mut H) {
    id.hash(hasher);
    enemy.kind().hash(hasher);
    enemy.health().to_bits().hash(hasher);
    enemy.progress().to_bits().hash(hasher);
    hash_location(enemy.location(), hasher);
}

fn hash_projectile<H: Hasher>(id: EntityId, projectile: &Projectile, hasher: &mut H) {
    id.hash(hasher);
    projectile.armament().tower.hash(hasher);
    hash_location(projectile.location(), hasher);
    projectile.elapsed().hash(hasher);
    match projectile.target() {
        ProjectileTarget::Enemy { id, last_known } => {
            0u8.hash(hasher); // Discriminant for Enemy
            id.hash(hasher);
            hash_location(*last_known, hasher);
        }
        ProjectileTarget::Point(point) => {
            1u8.hash(hasher); // Discriminant for Point
            hash_location(*point, hasher);
        }
    }
    if let Impact::Pierce { struck, .. } = projectile.impact() {
        struck.hash(hasher);
    }
}
