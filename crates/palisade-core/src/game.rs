//! The game coordinator.
//!
//! [`Game`] owns the field, the wave handler, the seeded generator and the
//! player ledger. The UI layer calls [`Game::tick`] once per fixed interval
//! and issues commands between ticks; commands apply immediately and either
//! succeed or leave the game untouched.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use waypath::Location;

use crate::action::{Action, ActionOption};
use crate::config::GameConfig;
use crate::entity::{EntityId, Removal, Tower, TowerKind};
use crate::error::{GameError, InvalidState, Result};
use crate::event::GameEvent;
use crate::field::Field;
use crate::hash::hash_game;
use crate::targeting::TargetingMode;
use crate::view::GameSnapshot;
use crate::wave::{WaveEvent, WaveHandler};

/// Largest supported speed multiplier.
pub const MAX_SPEED: u32 = 8;

/// Seconds a moving projectile may stay in flight.
pub const PROJECTILE_LIFETIME_SECONDS: u32 = 10;

/// Run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Built but not started, or reset.
    #[default]
    Idle,
    /// Ticking.
    Running,
    /// Every wave cleared.
    Won,
    /// Out of lives.
    Lost,
}

impl GameStatus {
    /// True once the run has been won or lost.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Where the field comes from on reset.
#[derive(Debug, Clone, PartialEq)]
enum FieldOrigin {
    /// Generated from the seed.
    Generated,
    /// Supplied by the caller; reset restores this copy.
    Custom(Box<Field>),
}

// =============================================================================
// Game
// =============================================================================

/// A complete run.
///
/// # Example
///
/// ```
/// use palisade_core::config::GameConfig;
/// use palisade_core::game::{Game, GameStatus};
///
/// let mut game = Game::new(GameConfig::default(), 42).unwrap();
/// game.start(None).unwrap();
/// for _ in 0..100 {
///     game.tick();
/// }
/// assert_eq!(game.current_tick(), 100);
/// assert_eq!(game.status(), GameStatus::Running);
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    seed: u64,
    rng: ChaCha8Rng,
    origin: FieldOrigin,
    field: Field,
    waves: WaveHandler,
    tick: u64,
    gold: u32,
    gold_spent: u32,
    kills: u32,
    experience: u32,
    lives: u32,
    selected: Option<Location>,
    speed: u32,
    status: GameStatus,
    events: Vec<GameEvent>,
}

impl Game {
    /// Creates a game on a field generated from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PathGeneration`] if no valid path could be drawn.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let field = Field::generate(&config.field, &mut rng)?;
        Ok(Self::assemble(config, seed, rng, FieldOrigin::Generated, field))
    }

    /// Creates a game on a caller-supplied field.
    #[must_use]
    pub fn with_field(config: GameConfig, field: Field, seed: u64) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(seed);
        let origin = FieldOrigin::Custom(Box::new(field.clone()));
        Self::assemble(config, seed, rng, origin, field)
    }

    fn assemble(
        config: GameConfig,
        seed: u64,
        rng: ChaCha8Rng,
        origin: FieldOrigin,
        field: Field,
    ) -> Self {
        Self {
            waves: WaveHandler::new(&config),
            gold: config.starting_gold,
            lives: config.starting_lives,
            config,
            seed,
            rng,
            origin,
            field,
            tick: 0,
            gold_spent: 0,
            kills: 0,
            experience: 0,
            selected: None,
            speed: 1,
            status: GameStatus::Idle,
            events: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Starts (or resumes) the run.
    ///
    /// A seed different from the current one rebuilds the game from that
    /// seed first; so does starting a run that is already won or lost.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PathGeneration`] if a rebuild fails.
    pub fn start(&mut self, seed: Option<u64>) -> Result<()> {
        match seed {
            Some(seed) if seed != self.seed => *self = self.rebuild(seed)?,
            _ if self.status.is_over() => *self = self.rebuild(self.seed)?,
            _ => {}
        }
        self.status = GameStatus::Running;
        info!(seed = self.seed, "Game started");
        Ok(())
    }

    /// Rebuilds the game from its seed and stops it.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PathGeneration`] if the field cannot be
    /// regenerated. The game is unchanged on error.
    pub fn reset(&mut self) -> Result<()> {
        *self = self.rebuild(self.seed)?;
        debug!(seed = self.seed, "Game reset");
        Ok(())
    }

    /// A fresh, stopped game on `seed` with this game's config and field origin.
    fn rebuild(&self, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let field = match &self.origin {
            FieldOrigin::Generated => Field::generate(&self.config.field, &mut rng)?,
            FieldOrigin::Custom(field) => field.as_ref().clone(),
        };
        Ok(Self::assemble(
            self.config.clone(),
            seed,
            rng,
            self.origin.clone(),
            field,
        ))
    }

    /// Advances the simulation by `speed` steps. Does nothing unless running.
    pub fn tick(&mut self) {
        for _ in 0..self.speed {
            if self.status != GameStatus::Running {
                break;
            }
            self.step();
        }
    }

    /// One simulation step: waves, enemies, towers, projectiles, sweep, outcome.
    fn step(&mut self) {
        self.tick += 1;

        match self.waves.tick(self.field.has_enemies(), &mut self.rng) {
            WaveEvent::Idle => {}
            WaveEvent::Spawn(kind) => {
                let enemy = self.field.spawn_enemy(kind);
                debug!(tick = self.tick, %enemy, ?kind, "Enemy spawned");
                self.events.push(GameEvent::EnemySpawned { enemy, kind });
            }
            WaveEvent::WaveStarted { wave, roster_len } => {
                info!(tick = self.tick, wave, enemies = roster_len, "Wave started");
                self.events.push(GameEvent::WaveStarted {
                    wave,
                    enemies: roster_len,
                });
            }
        }

        self.field.advance_enemies();

        for volley in self.field.tick_towers() {
            self.events.push(GameEvent::TowerFired {
                tower: volley.tower,
                projectiles: volley.projectiles,
            });
        }

        let lifetime = self.config.ticks_per_second * PROJECTILE_LIFETIME_SECONDS;
        let mut spent = Vec::new();
        for (projectile, step) in self.field.tick_projectiles(lifetime) {
            let Some(shot) = self.field.projectiles().get(projectile) else {
                continue;
            };
            let tower = shot.armament().tower;
            let location = shot.location();
            self.events.extend(step.hits.iter().map(|hit| GameEvent::EnemyHit {
                enemy: hit.enemy,
                tower,
                damage: hit.damage,
                killed: hit.killed,
            }));
            if let Some(target) = step.retargeted {
                self.events
                    .push(GameEvent::ProjectileRetargeted { projectile, target });
            }
            if let Some(removal) = step.removal {
                if removal == Removal::Discarded {
                    self.events
                        .push(GameEvent::ProjectileDiscarded { projectile, location });
                }
                spent.push(projectile);
            }
        }

        let sweep = self.field.sweep(&spent);
        for (enemy, dead) in sweep.killed {
            let stats = dead.stats();
            self.gold += stats.worth;
            self.kills += 1;
            self.experience += stats.weight;
            debug!(tick = self.tick, %enemy, worth = stats.worth, "Enemy killed");
            self.events.push(GameEvent::EnemyKilled {
                enemy,
                kind: dead.kind(),
                worth: stats.worth,
            });
        }
        for (enemy, _) in sweep.escaped {
            self.lives = self.lives.saturating_sub(1);
            debug!(tick = self.tick, %enemy, lives = self.lives, "Enemy reached the base");
            self.events.push(GameEvent::EnemyReachedBase {
                enemy,
                lives: self.lives,
            });
        }

        if self.lives == 0 {
            self.status = GameStatus::Lost;
            info!(tick = self.tick, wave = self.waves.wave(), "Game lost");
            self.events.push(GameEvent::GameLost { tick: self.tick });
        } else if self.waves.is_completely_done(self.field.has_enemies()) {
            self.status = GameStatus::Won;
            info!(tick = self.tick, kills = self.kills, "Game won");
            self.events.push(GameEvent::GameWon { tick: self.tick });
        }

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(tick = self.tick, state_hash = hash_game(self), "Tick complete");
        }
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Buys a tower of `kind` and places it at `location`.
    ///
    /// # Errors
    ///
    /// [`GameError::InsufficientFunds`] if the player cannot pay, otherwise
    /// any placement error. Gold is only deducted once placement succeeds.
    pub fn buy_tower(&mut self, kind: TowerKind, location: Location) -> Result<EntityId> {
        let cost = kind.cost();
        self.ensure_funds(cost)?;
        let tower = Tower::new(kind, location, self.config.ticks_per_second);
        let id = self.field.add_tower(tower)?;
        self.pay(cost);
        debug!(%id, %kind, %location, cost, gold = self.gold, "Tower bought");
        Ok(id)
    }

    /// Sells the tower at `location` for half of what was spent on it.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if no tower stands there,
    /// [`InvalidState::NotSellable`] if the tower refuses.
    pub fn sell_tower(&mut self, location: Location) -> Result<u32> {
        let (_, tower) = self
            .field
            .tower_at(location)
            .ok_or(GameError::NotFound(location))?;
        if !tower.can_sell() {
            return Err(InvalidState::NotSellable.into());
        }
        let (id, tower) = self.field.remove_tower(location)?;
        let refund = tower.sell_value();
        self.gold += refund;
        debug!(%id, %location, refund, gold = self.gold, "Tower sold");
        Ok(refund)
    }

    /// Upgrades the tower at `location`, returning the price paid.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`], [`InvalidState::MaxLevel`] or
    /// [`GameError::InsufficientFunds`].
    pub fn upgrade_tower(&mut self, location: Location) -> Result<u32> {
        let available = self.gold;
        let (id, tower) = self
            .field
            .tower_at_mut(location)
            .ok_or(GameError::NotFound(location))?;
        let cost = tower.upgrade_cost().ok_or(InvalidState::MaxLevel {
            max_level: tower.max_level(),
        })?;
        if cost > available {
            return Err(GameError::InsufficientFunds {
                required: cost,
                available,
            });
        }
        tower.upgrade()?;
        let level = tower.level();
        self.pay(cost);
        debug!(%id, %location, level, cost, gold = self.gold, "Tower upgraded");
        Ok(cost)
    }

    /// Sets the targeting mode of the tower at `location`.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if no tower stands there.
    pub fn set_targeting_mode(&mut self, location: Location, mode: TargetingMode) -> Result<()> {
        let (_, tower) = self
            .field
            .tower_at_mut(location)
            .ok_or(GameError::NotFound(location))?;
        tower.set_targeting(mode);
        Ok(())
    }

    /// Advances the tower at `location` to its next targeting mode.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if no tower stands there.
    pub fn cycle_targeting_mode(&mut self, location: Location) -> Result<TargetingMode> {
        let (_, tower) = self
            .field
            .tower_at_mut(location)
            .ok_or(GameError::NotFound(location))?;
        Ok(tower.cycle_targeting())
    }

    /// Records the spot the UI has selected.
    pub fn select_location(&mut self, location: Option<Location>) {
        self.selected = location;
    }

    /// Sets how many simulation steps one [`tick`](Self::tick) runs.
    ///
    /// # Errors
    ///
    /// [`InvalidState::Speed`] unless `1 <= speed <= MAX_SPEED`.
    pub fn set_speed(&mut self, speed: u32) -> Result<()> {
        if !(1..=MAX_SPEED).contains(&speed) {
            return Err(InvalidState::Speed {
                speed,
                max: MAX_SPEED,
            }
            .into());
        }
        self.speed = speed;
        Ok(())
    }

    /// Actions available at `location`.
    ///
    /// An occupied spot offers upgrade, sell and targeting; an empty
    /// placeable spot offers every tower kind; anywhere else offers nothing.
    #[must_use]
    pub fn actions_at(&self, location: Location) -> Vec<ActionOption> {
        if let Some((_, tower)) = self.field.tower_at(location) {
            let cost = tower.upgrade_cost();
            return vec![
                ActionOption::new(
                    Action::Upgrade { cost },
                    cost.is_some_and(|c| c <= self.gold),
                ),
                ActionOption::new(
                    Action::Sell {
                        refund: tower.sell_value(),
                    },
                    tower.can_sell(),
                ),
                ActionOption::new(
                    Action::CycleTargeting {
                        current: tower.targeting(),
                    },
                    true,
                ),
            ];
        }
        if !self.field.is_placeable(location) {
            return Vec::new();
        }
        TowerKind::ALL
            .into_iter()
            .map(|kind| {
                let cost = kind.cost();
                ActionOption::new(Action::Buy { kind, cost }, cost <= self.gold)
            })
            .collect()
    }

    /// Takes every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn ensure_funds(&self, required: u32) -> Result<()> {
        if required > self.gold {
            return Err(GameError::InsufficientFunds {
                required,
                available: self.gold,
            });
        }
        Ok(())
    }

    fn pay(&mut self, cost: u32) {
        self.gold -= cost;
        self.gold_spent += cost;
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The configuration this game runs under.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The seed the current run derives from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Steps simulated since the last reset.
    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Gold held.
    #[must_use]
    pub fn gold(&self) -> u32 {
        self.gold
    }

    /// Gold spent on towers and upgrades.
    #[must_use]
    pub fn gold_spent(&self) -> u32 {
        self.gold_spent
    }

    /// Enemies killed.
    #[must_use]
    pub fn kills(&self) -> u32 {
        self.kills
    }

    /// Sum of the weights of killed enemies.
    #[must_use]
    pub fn experience(&self) -> u32 {
        self.experience
    }

    /// Lives left.
    #[must_use]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Steps per [`tick`](Self::tick).
    #[must_use]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Run state.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// True while ticking.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    /// True once every wave has been cleared.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.status == GameStatus::Won
    }

    /// True once the last life is gone.
    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.status == GameStatus::Lost
    }

    /// The spot the UI has selected.
    #[must_use]
    pub fn selected(&self) -> Option<Location> {
        self.selected
    }

    /// The field.
    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// The wave handler.
    #[must_use]
    pub fn waves(&self) -> &WaveHandler {
        &self.waves
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// A serializable copy of everything the UI draws.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Enemy, EnemyKind, EnemyStats};
    use crate::tests::{straight_field, straight_spots};

    mod projectile_tests {
        use super::*;

        #[test]
        fn shot_at_vanished_target_is_discarded_without_credit() {
            let config = GameConfig {
                first_wave_delay_seconds: 10.0,
                ..GameConfig::default()
            };
            let mut game = Game::with_field(config, straight_field(), 3);
            game.buy_tower(TowerKind::Archer, straight_spots()[0]).unwrap();
            let start = game.field.path().start();
            let target = game.field.add_enemy(Enemy::with_stats(
                EnemyKind::Tank,
                EnemyStats {
                    speed: 0.0,
                    ..EnemyKind::Tank.stats()
                },
                start,
            ));
            game.start(None).unwrap();

            while game.field.projectiles().is_empty() {
                assert!(game.current_tick() < 50, "archer never fired");
                game.tick();
            }
            let (kills, gold, lives) = (game.kills(), game.gold(), game.lives());
            game.drain_events();

            // Killed and swept by another tower while this shot was in flight.
            game.field.enemies_mut().despawn(target);
            game.tick();

            let events = game.drain_events();
            assert!(events
                .iter()
                .any(|e| matches!(e, GameEvent::ProjectileDiscarded { .. })));
            assert!(!events.iter().any(|e| matches!(
                e,
                GameEvent::EnemyHit { .. } | GameEvent::EnemyKilled { .. }
            )));
            assert!(game.field.projectiles().is_empty());
            assert_eq!(game.kills(), kills);
            assert_eq!(game.gold(), gold);
            assert_eq!(game.lives(), lives);
        }
    }
}
