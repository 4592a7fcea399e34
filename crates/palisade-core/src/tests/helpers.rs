//! Test helper functions for building fields and games.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use waypath::Location;

use crate::config::{FieldConfig, GameConfig, PlacementPolicy};
use crate::event::GameEvent;
use crate::field::Field;
use crate::game::Game;

// =============================================================================
// Tracing
// =============================================================================

/// Installs a fmt subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// =============================================================================
// Fields
// =============================================================================

/// Waypoints of the worked path example.
pub fn scenario_waypoints() -> Vec<Location> {
    vec![
        Location::new(0.0, 10.0),
        Location::new(20.0, 5.0),
        Location::new(40.0, 15.0),
        Location::new(60.0, 10.0),
    ]
}

/// Tower spots five units above the straight path.
pub fn straight_spots() -> Vec<Location> {
    vec![
        Location::new(10.0, 25.0),
        Location::new(25.0, 25.0),
        Location::new(40.0, 25.0),
        Location::new(55.0, 25.0),
        Location::new(70.0, 25.0),
    ]
}

/// A horizontal path along `y = 20` across the default 80x45 field.
pub fn straight_field() -> Field {
    let config = FieldConfig {
        placement: PlacementPolicy::Fixed {
            spots: straight_spots(),
            clearance: 3.0,
        },
        ..FieldConfig::default()
    };
    let waypoints = [
        Location::new(0.0, 20.0),
        Location::new(40.0, 20.0),
        Location::new(80.0, 20.0),
    ];
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    Field::from_waypoints(&config, &waypoints, &mut rng).expect("straight path is valid")
}

// =============================================================================
// Games
// =============================================================================

/// A game on [`straight_field`].
pub fn straight_game(config: GameConfig, seed: u64) -> Game {
    Game::with_field(config, straight_field(), seed)
}

/// Ticks until the game stops running or `max_ticks` is reached.
///
/// Returns every event recorded on the way.
pub fn run_until_over(game: &mut Game, max_ticks: u32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        if !game.is_running() {
            break;
        }
        game.tick();
        events.extend(game.drain_events());
    }
    events
}

/// Total gold paid out by kill events.
pub fn bounty(events: &[GameEvent]) -> u32 {
    events
        .iter()
        .map(|e| match e {
            GameEvent::EnemyKilled { worth, .. } => *worth,
            _ => 0,
        })
        .sum()
}

/// Number of events matching `pred`.
pub fn count_events(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}
