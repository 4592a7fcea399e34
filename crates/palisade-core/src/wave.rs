//! Wave generation and spawn pacing.
//!
//! The handler is a small state machine advanced once per tick:
//!
//! ```text
//! Intermission --(countdown hits zero)--> Spawning --(roster exhausted)--> Intermission
//!       |
//!       +--(wave >= max_wave, nothing alive)--> AllWavesComplete
//! ```
//!
//! All randomness comes from the caller's generator so a run replays exactly
//! from its seed.

use rand::distributions::WeightedIndex;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::entity::EnemyKind;

/// Where the handler is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// The current roster is still being spawned.
    Spawning,
    /// Waiting for the next wave.
    Intermission,
    /// The last wave has spawned and every enemy is gone.
    AllWavesComplete,
}

/// What one tick of the handler produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveEvent {
    /// Nothing this tick.
    Idle,
    /// Spawn one enemy of this kind.
    Spawn(EnemyKind),
    /// A new wave began and its roster was drawn.
    WaveStarted {
        /// The new wave number.
        wave: u32,
        /// Enemies in its roster.
        roster_len: usize,
    },
}

/// Total enemy weight a wave may field: `floor(wave^1.1 * 10)`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn wave_value(wave: u32) -> u32 {
    (f64::from(wave).powf(1.1) * 10.0).floor() as u32
}

/// Draws a shuffled roster whose total weight never exceeds `value`.
///
/// Each draw picks among the kinds still affordable, weighted by their
/// weight, and stops once nothing fits the remaining budget.
pub fn generate_roster(value: u32, rng: &mut impl Rng) -> Vec<EnemyKind> {
    let mut budget = value;
    let mut roster = Vec::new();
    while budget > 0 {
        let choices: Vec<EnemyKind> = EnemyKind::ALL
            .into_iter()
            .filter(|kind| kind.stats().weight <= budget)
            .collect();
        let Ok(dist) = WeightedIndex::new(choices.iter().map(|kind| kind.stats().weight)) else {
            break;
        };
        let kind = choices[rng.sample(&dist)];
        budget -= kind.stats().weight;
        roster.push(kind);
    }
    roster.shuffle(rng);
    roster
}

/// Paces enemy spawns across escalating waves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveHandler {
    wave: u32,
    max_wave: u32,
    roster: Vec<EnemyKind>,
    spawn_index: usize,
    ticks_until_next_spawn: u32,
    ticks_until_next_wave: u32,
    ticks_per_second: u32,
    intermission_ticks: u32,
    empty_field_ticks: u32,
}

impl WaveHandler {
    /// A handler at wave 0, counting down to the first wave.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            wave: 0,
            max_wave: config.max_wave,
            roster: Vec::new(),
            spawn_index: 0,
            ticks_until_next_spawn: 0,
            ticks_until_next_wave: config.seconds_to_ticks(config.first_wave_delay_seconds),
            ticks_per_second: config.ticks_per_second,
            intermission_ticks: config.seconds_to_ticks(config.intermission_seconds),
            empty_field_ticks: config.seconds_to_ticks(config.empty_field_intermission_seconds),
        }
    }

    /// Advances the state machine by one tick.
    ///
    /// `enemies_alive` reports whether any enemy is still on the field; while
    /// none is, the intermission countdown is capped at the empty-field wait.
    pub fn tick(&mut self, enemies_alive: bool, rng: &mut impl Rng) -> WaveEvent {
        if !self.is_done_spawning() {
            if self.ticks_until_next_spawn > 0 {
                self.ticks_until_next_spawn -= 1;
                return WaveEvent::Idle;
            }
            let kind = self.roster[self.spawn_index];
            self.spawn_index += 1;
            self.ticks_until_next_spawn = self.spawn_interval(rng);
            return WaveEvent::Spawn(kind);
        }
        if self.max_wave_reached() {
            return WaveEvent::Idle;
        }
        if self.ticks_until_next_wave > 0 {
            self.ticks_until_next_wave -= 1;
            if !enemies_alive {
                self.ticks_until_next_wave = self.ticks_until_next_wave.min(self.empty_field_ticks);
            }
            return WaveEvent::Idle;
        }
        self.start_next_wave(rng)
    }

    fn start_next_wave(&mut self, rng: &mut impl Rng) -> WaveEvent {
        self.wave += 1;
        self.roster = generate_roster(wave_value(self.wave), rng);
        self.spawn_index = 0;
        self.ticks_until_next_spawn = self.spawn_interval(rng);
        self.ticks_until_next_wave = self.intermission_ticks;
        WaveEvent::WaveStarted {
            wave: self.wave,
            roster_len: self.roster.len(),
        }
    }

    /// Uniform in 10% to 50% of a second, truncated to whole ticks.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn spawn_interval(&self, rng: &mut impl Rng) -> u32 {
        let tps = f64::from(self.ticks_per_second);
        (tps * 0.1 + rng.gen::<f64>() * tps * 0.4) as u32
    }

    fn is_done_spawning(&self) -> bool {
        self.spawn_index >= self.roster.len()
    }

    fn max_wave_reached(&self) -> bool {
        self.wave >= self.max_wave
    }

    /// True once the last wave has fully spawned and nothing is alive.
    #[must_use]
    pub fn is_completely_done(&self, enemies_alive: bool) -> bool {
        self.max_wave_reached() && self.is_done_spawning() && !enemies_alive
    }

    /// The current phase.
    #[must_use]
    pub fn phase(&self, enemies_alive: bool) -> WavePhase {
        if !self.is_done_spawning() {
            WavePhase::Spawning
        } else if self.is_completely_done(enemies_alive) {
            WavePhase::AllWavesComplete
        } else {
            WavePhase::Intermission
        }
    }

    /// Current wave number; 0 before the first wave.
    #[must_use]
    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// The wave at which spawning stops.
    #[must_use]
    pub fn max_wave(&self) -> u32 {
        self.max_wave
    }

    /// The current wave's roster.
    #[must_use]
    pub fn roster(&self) -> &[EnemyKind] {
        &self.roster
    }

    /// Enemies of the current roster not yet spawned.
    #[must_use]
    pub fn remaining_spawns(&self) -> usize {
        self.roster.len().saturating_sub(self.spawn_index)
    }

    /// Ticks before the next spawn.
    #[must_use]
    pub fn ticks_until_next_spawn(&self) -> u32 {
        self.ticks_until_next_spawn
    }

    /// Ticks before the next wave, once the roster is exhausted.
    #[must_use]
    pub fn ticks_until_next_wave(&self) -> u32 {
        self.ticks_until_next_wave
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn roster_weight(roster: &[EnemyKind]) -> u32 {
        roster.iter().map(|k| k.stats().weight).sum()
    }

    mod roster_tests {
        use super::*;

        #[test]
        fn wave_values() {
            assert_eq!(wave_value(0), 0);
            assert_eq!(wave_value(1), 10);
            // 2^1.1 = 2.1435
            assert_eq!(wave_value(2), 21);
            // 10^1.1 = 12.589
            assert_eq!(wave_value(10), 125);
        }

        #[test]
        fn zero_value_gives_empty_roster() {
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            assert!(generate_roster(0, &mut rng).is_empty());
        }

        #[test]
        fn small_budget_excludes_heavy_kinds() {
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            for _ in 0..50 {
                let roster = generate_roster(2, &mut rng);
                assert_eq!(roster.len(), 2);
                assert!(!roster.contains(&EnemyKind::Tank));
            }
        }

        #[test]
        fn same_seed_same_roster() {
            let a = generate_roster(125, &mut ChaCha8Rng::seed_from_u64(9));
            let b = generate_roster(125, &mut ChaCha8Rng::seed_from_u64(9));
            assert_eq!(a, b);
        }

        proptest! {
            #[test]
            fn roster_never_exceeds_budget(value in 0u32..2000, seed in any::<u64>()) {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let roster = generate_roster(value, &mut rng);
                prop_assert!(roster_weight(&roster) <= value);
                // Weight-1 kinds are always affordable, so the budget is used up.
                prop_assert_eq!(roster_weight(&roster), value);
            }
        }
    }

    mod pacing_tests {
        use super::*;

        fn config() -> GameConfig {
            GameConfig {
                max_wave: 2,
                ..GameConfig::default()
            }
        }

        #[test]
        fn first_wave_waits_the_initial_delay() {
            let mut rng = ChaCha8Rng::seed_from_u64(5);
            let mut waves = WaveHandler::new(&config());
            // 20 ticks of delay with enemies "alive" so nothing is shortened.
            for _ in 0..20 {
                assert_eq!(waves.tick(true, &mut rng), WaveEvent::Idle);
            }
            assert_eq!(
                waves.tick(true, &mut rng),
                WaveEvent::WaveStarted {
                    wave: 1,
                    roster_len: waves.roster().len()
                }
            );
            assert_eq!(waves.phase(true), WavePhase::Spawning);
        }

        #[test]
        fn empty_field_shortens_intermission() {
            let mut rng = ChaCha8Rng::seed_from_u64(5);
            let mut waves = WaveHandler::new(&config());
            waves.tick(false, &mut rng);
            assert_eq!(waves.ticks_until_next_wave(), 10);
        }

        #[test]
        fn spawns_whole_roster_with_bounded_gaps() {
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            let mut waves = WaveHandler::new(&config());
            let mut spawned = Vec::new();
            let mut last_spawn = None;
            for tick in 0..2000u32 {
                match waves.tick(true, &mut rng) {
                    WaveEvent::Spawn(kind) => {
                        if let Some(prev) = last_spawn {
                            let gap = tick - prev;
                            // 2..=9 idle ticks plus the spawning tick itself.
                            assert!((3..=11).contains(&gap), "gap {gap}");
                        }
                        last_spawn = Some(tick);
                        spawned.push(kind);
                    }
                    WaveEvent::WaveStarted { .. } => last_spawn = None,
                    WaveEvent::Idle => {}
                }
            }
            assert_eq!(waves.wave(), 2);
            assert_eq!(
                roster_weight(&spawned),
                wave_value(1) + wave_value(2)
            );
        }

        #[test]
        fn completes_after_last_wave_clears() {
            let mut rng = ChaCha8Rng::seed_from_u64(2);
            let mut waves = WaveHandler::new(&GameConfig {
                max_wave: 1,
                ..GameConfig::default()
            });
            for _ in 0..500 {
                waves.tick(false, &mut rng);
            }
            assert_eq!(waves.wave(), 1);
            assert_eq!(waves.remaining_spawns(), 0);
            assert!(!waves.is_completely_done(true));
            assert_eq!(waves.phase(true), WavePhase::Intermission);
            assert!(waves.is_completely_done(false));
            assert_eq!(waves.phase(false), WavePhase::AllWavesComplete);
        }
    }
}
