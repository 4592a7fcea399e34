//! The playing field: path, placeable spots and every live entity.
//!
//! The field owns three arenas (towers, enemies, projectiles) and runs the
//! per-tick phases over them. Nothing is removed mid-phase; dead enemies and
//! spent projectiles go in [`Field::sweep`] at the end of the tick.

use glam::DVec2;
use rand::Rng;
use tracing::{debug, warn};
use waypath::{Bounds, Location};

use crate::arena::Arena;
use crate::config::{FieldConfig, PlacementPolicy};
use crate::entity::{Enemy, EnemyKind, EntityId, Projectile, ProjectileStep, Tower};
use crate::error::{GameError, PlacementError, Result};
use crate::path::Path;
use crate::targeting::{sort_enemies, TargetView, TargetingMode};

/// Two locations closer than this name the same spot.
pub const SPOT_EPSILON: f64 = 1e-6;

/// How far generated path samples may stray outside the field.
const BOUNDS_TOLERANCE: f64 = 1e-4;

/// Towers that fired this tick and the projectiles they created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volley {
    /// The tower.
    pub tower: EntityId,
    /// Ids of the new projectiles.
    pub projectiles: Vec<EntityId>,
}

/// Entities removed by the end-of-tick sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sweep {
    /// Enemies whose health reached zero.
    pub killed: Vec<(EntityId, Enemy)>,
    /// Enemies that walked the whole path.
    pub escaped: Vec<(EntityId, Enemy)>,
    /// Projectiles removed.
    pub projectiles: Vec<EntityId>,
}

// =============================================================================
// Field
// =============================================================================

/// The field and everything on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    bounds: Bounds,
    path: Path,
    spots: Vec<Location>,
    towers: Arena<Tower>,
    enemies: Arena<Enemy>,
    projectiles: Arena<Projectile>,
}

impl Field {
    /// Generates a random field.
    ///
    /// Start and end points sit on the left and right edges; interior
    /// waypoints are drawn inside an inset box and redrawn while they would
    /// make a corner sharper than `config.min_corner_degrees`. Whole paths
    /// that leave the field are thrown away and retried.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PathGeneration`] if no acceptable path is found
    /// within `config.path_attempts`, or [`GameError::InvalidInput`] if a
    /// drawn path cannot be fitted.
    pub fn generate(config: &FieldConfig, rng: &mut impl Rng) -> Result<Self> {
        let bounds = config.bounds();
        for attempt in 1..=config.path_attempts {
            let Some(waypoints) = random_waypoints(config, rng) else {
                continue;
            };
            let path = Path::from_waypoints(&waypoints, config.path_samples)?;
            if path.within(&bounds, BOUNDS_TOLERANCE) {
                debug!(attempt, length = path.length(), "Generated path");
                return Ok(Self::with_path(config, path, rng));
            }
        }
        Err(GameError::PathGeneration {
            attempts: config.path_attempts,
        })
    }

    /// Builds a field around a path through the given waypoints.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidInput`] if the waypoints cannot be fitted.
    pub fn from_waypoints(
        config: &FieldConfig,
        waypoints: &[Location],
        rng: &mut impl Rng,
    ) -> Result<Self> {
        let path = Path::from_waypoints(waypoints, config.path_samples)?;
        Ok(Self::with_path(config, path, rng))
    }

    fn with_path(config: &FieldConfig, path: Path, rng: &mut impl Rng) -> Self {
        let bounds = config.bounds();
        let spots = placeable_spots(&config.placement, &bounds, &path, rng);
        Self {
            bounds,
            path,
            spots,
            towers: Arena::new(),
            enemies: Arena::new(),
            projectiles: Arena::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Towers
    // -------------------------------------------------------------------------

    /// The placeable spot at `location`, if there is one.
    #[must_use]
    pub fn spot_at(&self, location: Location) -> Option<Location> {
        self.spots
            .iter()
            .copied()
            .find(|s| s.approx_eq(location, SPOT_EPSILON))
    }

    /// True if towers may be built at `location`.
    #[must_use]
    pub fn is_placeable(&self, location: Location) -> bool {
        self.spot_at(location).is_some()
    }

    /// Adds a tower at its own location.
    ///
    /// # Errors
    ///
    /// [`PlacementError::NotPlaceable`] if the location is not a spot,
    /// [`PlacementError::Occupied`] if a tower already stands there. The
    /// field is unchanged on error.
    pub fn add_tower(&mut self, tower: Tower) -> Result<EntityId> {
        let location = tower.location();
        if !self.is_placeable(location) {
            return Err(PlacementError::NotPlaceable(location).into());
        }
        if self.tower_at(location).is_some() {
            return Err(PlacementError::Occupied(location).into());
        }
        Ok(self.towers.spawn(tower))
    }

    /// Removes the tower at `location`.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if no tower stands there.
    pub fn remove_tower(&mut self, location: Location) -> Result<(EntityId, Tower)> {
        let (id, _) = self
            .tower_at(location)
            .ok_or(GameError::NotFound(location))?;
        self.towers
            .despawn(id)
            .map(|tower| (id, tower))
            .ok_or(GameError::NotFound(location))
    }

    /// The tower at `location`.
    #[must_use]
    pub fn tower_at(&self, location: Location) -> Option<(EntityId, &Tower)> {
        self.towers
            .entities_sorted()
            .find(|(_, t)| t.location().approx_eq(location, SPOT_EPSILON))
    }

    /// The tower at `location`, mutably.
    #[must_use]
    pub fn tower_at_mut(&mut self, location: Location) -> Option<(EntityId, &mut Tower)> {
        self.towers
            .entities_sorted_mut()
            .find(|(_, t)| t.location().approx_eq(location, SPOT_EPSILON))
    }

    // -------------------------------------------------------------------------
    // Enemies
    // -------------------------------------------------------------------------

    /// Puts a new enemy of `kind` at the start of the path.
    pub fn spawn_enemy(&mut self, kind: EnemyKind) -> EntityId {
        self.add_enemy(Enemy::new(kind, self.path.start()))
    }

    /// Adds an enemy as is.
    pub fn add_enemy(&mut self, enemy: Enemy) -> EntityId {
        self.enemies.spawn(enemy)
    }

    /// Ranks `ids` under `mode`; see [`sort_enemies`].
    pub fn sort_enemies(&self, ids: &mut [EntityId], mode: TargetingMode) {
        sort_enemies(&self.enemies, ids, mode);
    }

    /// Active enemies within `radius` of `center`, in id order.
    #[must_use]
    pub fn enemies_within(&self, center: Location, radius: f64) -> Vec<EntityId> {
        self.enemies
            .entities_sorted()
            .filter(|(_, e)| e.is_active() && e.location().distance(center) <= radius)
            .map(|(id, _)| id)
            .collect()
    }

    /// True if any enemy is still on the field.
    #[must_use]
    pub fn has_enemies(&self) -> bool {
        !self.enemies.is_empty()
    }

    // -------------------------------------------------------------------------
    // Tick phases
    // -------------------------------------------------------------------------

    /// Moves every enemy along the path.
    pub fn advance_enemies(&mut self) {
        for (_, enemy) in self.enemies.entities_sorted_mut() {
            enemy.tick(&self.path);
        }
    }

    /// Ticks every tower and adds the projectiles they fire.
    ///
    /// All towers see the same enemy state; new projectiles are added only
    /// after every tower has ticked.
    pub fn tick_towers(&mut self) -> Vec<Volley> {
        let view = TargetView::new(&self.enemies, self.bounds);
        let fired: Vec<(EntityId, Vec<Projectile>)> = self
            .towers
            .entities_sorted_mut()
            .map(|(id, tower)| (id, tower.tick(id, &view)))
            .filter(|(_, shots)| !shots.is_empty())
            .collect();

        fired
            .into_iter()
            .map(|(tower, shots)| Volley {
                tower,
                projectiles: shots
                    .into_iter()
                    .map(|shot| self.projectiles.spawn(shot))
                    .collect(),
            })
            .collect()
    }

    /// Ticks every projectile, applying hits and crediting towers.
    pub fn tick_projectiles(&mut self, max_lifetime: u32) -> Vec<(EntityId, ProjectileStep)> {
        let bounds = self.bounds;
        let mut steps = Vec::with_capacity(self.projectiles.entity_count());
        let mut credits = Vec::new();
        for (id, projectile) in self.projectiles.entities_sorted_mut() {
            let step = projectile.tick(&mut self.enemies, bounds, max_lifetime);
            let dealt: f64 = step.hits.iter().map(|h| h.damage).sum();
            if dealt > 0.0 {
                credits.push((projectile.armament().tower, dealt));
            }
            steps.push((id, step));
        }
        for (tower, dealt) in credits {
            if let Some(tower) = self.towers.get_mut(tower) {
                tower.credit_damage(dealt);
            }
        }
        steps
    }

    /// Removes dead and finished enemies and the listed projectiles.
    pub fn sweep(&mut self, spent: &[EntityId]) -> Sweep {
        let (killed, escaped): (Vec<_>, Vec<_>) = self
            .enemies
            .despawn_where(|e| !e.is_active())
            .into_iter()
            .partition(|(_, e)| e.is_dead());
        let projectiles = spent
            .iter()
            .copied()
            .filter(|id| self.projectiles.despawn(*id).is_some())
            .collect();
        Sweep {
            killed,
            escaped,
            projectiles,
        }
    }

    /// Removes every tower, enemy and projectile.
    pub fn clear(&mut self) {
        self.towers.clear();
        self.enemies.clear();
        self.projectiles.clear();
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The field rectangle.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Field width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.bounds.width
    }

    /// Field height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bounds.height
    }

    /// The enemy path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where towers may be built.
    #[must_use]
    pub fn placeable_spots(&self) -> &[Location] {
        &self.spots
    }

    /// Live towers.
    #[must_use]
    pub fn towers(&self) -> &Arena<Tower> {
        &self.towers
    }

    /// Live enemies.
    #[must_use]
    pub fn enemies(&self) -> &Arena<Enemy> {
        &self.enemies
    }

    /// Live enemies, mutably.
    #[must_use]
    pub fn enemies_mut(&mut self) -> &mut Arena<Enemy> {
        &mut self.enemies
    }

    /// In-flight projectiles.
    #[must_use]
    pub fn projectiles(&self) -> &Arena<Projectile> {
        &self.projectiles
    }
}

// =============================================================================
// Generation helpers
// =============================================================================

fn random_in(rng: &mut impl Rng, min: Location, max: Location) -> Location {
    Location::new(
        min.x + rng.gen::<f64>() * (max.x - min.x),
        min.y + rng.gen::<f64>() * (max.y - min.y),
    )
}

/// Interior angle at `corner` between the legs to `a` and `b`, in degrees.
fn corner_degrees(a: Location, corner: Location, b: Location) -> Option<f64> {
    let u: DVec2 = a.as_dvec2() - corner.as_dvec2();
    let v: DVec2 = b.as_dvec2() - corner.as_dvec2();
    let lengths = u.length() * v.length();
    if lengths == 0.0 {
        return None;
    }
    Some((u.dot(v) / lengths).clamp(-1.0, 1.0).acos().to_degrees())
}

fn corner_ok(a: Location, corner: Location, b: Location, min_degrees: f64) -> bool {
    corner_degrees(a, corner, b).is_some_and(|deg| deg >= min_degrees)
}

fn random_waypoints(config: &FieldConfig, rng: &mut impl Rng) -> Option<Vec<Location>> {
    let bounds = config.bounds();
    let edge_margin = config.height * config.edge_margin_fraction;
    let mut edge_point = |x: f64| {
        Location::new(
            x,
            edge_margin + rng.gen::<f64>() * (config.height - 2.0 * edge_margin),
        )
    };
    let start = edge_point(0.0);
    let end = edge_point(config.width);

    let (min, max) = bounds.inset(bounds.max_extent() * config.edge_margin_fraction);
    let mut points = vec![start];
    for i in 0..config.interior_waypoints {
        let is_last = i + 1 == config.interior_waypoints;
        let mut placed = false;
        for _ in 0..config.waypoint_attempts {
            let candidate = random_in(rng, min, max);
            let previous = points[points.len() - 1];
            let turn_ok = points.len() < 2
                || corner_ok(
                    points[points.len() - 2],
                    previous,
                    candidate,
                    config.min_corner_degrees,
                );
            let end_ok = !is_last || corner_ok(previous, candidate, end, config.min_corner_degrees);
            if turn_ok && end_ok && candidate != previous {
                points.push(candidate);
                placed = true;
                break;
            }
        }
        if !placed {
            return None;
        }
    }
    points.push(end);
    Some(points)
}

fn placeable_spots(
    policy: &PlacementPolicy,
    bounds: &Bounds,
    path: &Path,
    rng: &mut impl Rng,
) -> Vec<Location> {
    match policy {
        PlacementPolicy::Scattered {
            count,
            clearance,
            spacing,
            attempts,
        } => {
            let (min, max) = bounds.inset(spacing / 2.0);
            let mut spots: Vec<Location> = Vec::with_capacity(*count);
            for _ in 0..*attempts {
                if spots.len() >= *count {
                    break;
                }
                let candidate = random_in(rng, min, max);
                if path.distance_to(candidate) >= *clearance
                    && spots.iter().all(|s| s.distance(candidate) >= *spacing)
                {
                    spots.push(candidate);
                }
            }
            if spots.len() < *count {
                warn!(
                    wanted = count,
                    placed = spots.len(),
                    "Could not place every tower spot"
                );
            }
            spots
        }
        PlacementPolicy::Lattice { pitch, clearance } => {
            if *pitch <= 0.0 {
                warn!(pitch, "Lattice pitch must be positive; no spots placed");
                return Vec::new();
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (nx, ny) = (
                (bounds.width / pitch).floor() as u32,
                (bounds.height / pitch).floor() as u32,
            );
            (0..ny)
                .flat_map(|j| (0..nx).map(move |i| (i, j)))
                .map(|(i, j)| {
                    Location::new(
                        pitch / 2.0 + f64::from(i) * pitch,
                        pitch / 2.0 + f64::from(j) * pitch,
                    )
                })
                .filter(|spot| path.distance_to(*spot) >= *clearance)
                .collect()
        }
        PlacementPolicy::Fixed { spots, clearance } => spots
            .iter()
            .copied()
            .filter(|spot| {
                let clear = bounds.contains(*spot) && path.distance_to(*spot) >= *clearance;
                if !clear {
                    warn!(%spot, "Dropping tower spot on or near the path");
                }
                clear
            })
            .collect(),
    }
}
