//! Game configuration.
//!
//! All tunables live here so a run is fully described by a [`GameConfig`]
//! plus a seed. Defaults describe the standard 80x45 field at 20 ticks per
//! second.

use serde::{Deserialize, Serialize};
use waypath::{Bounds, Location};

/// How placeable tower spots are laid out on a generated field.
///
/// Whatever the policy, spots closer than `clearance` to the path polyline
/// are discarded, so no spot ever sits on the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlacementPolicy {
    /// Seeded random spots inside the inset field box.
    Scattered {
        /// Number of spots wanted.
        count: usize,
        /// Minimum distance from the path.
        clearance: f64,
        /// Minimum distance between two spots.
        spacing: f64,
        /// Candidate draws before giving up on reaching `count`.
        attempts: u32,
    },
    /// A regular grid of spots with the given pitch.
    Lattice {
        /// Grid spacing on both axes.
        pitch: f64,
        /// Minimum distance from the path.
        clearance: f64,
    },
    /// An explicit list of spots.
    Fixed {
        /// Candidate spots.
        spots: Vec<Location>,
        /// Minimum distance from the path.
        clearance: f64,
    },
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self::Scattered {
            count: 8,
            clearance: 4.0,
            spacing: 6.0,
            attempts: 500,
        }
    }
}

/// Field generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field width in field-pixel units.
    pub width: f64,
    /// Field height in field-pixel units.
    pub height: f64,
    /// Random waypoints between the start and end points.
    pub interior_waypoints: usize,
    /// Points sampled along the spline to form the path polyline.
    pub path_samples: usize,
    /// Margin, as a fraction of the field size, kept free of waypoints.
    pub edge_margin_fraction: f64,
    /// Sharpest corner, in degrees, allowed at a waypoint.
    pub min_corner_degrees: f64,
    /// Draws per interior waypoint before the whole path is restarted.
    pub waypoint_attempts: u32,
    /// Whole-path attempts before generation fails.
    pub path_attempts: u32,
    /// Layout of placeable spots.
    pub placement: PlacementPolicy,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 80.0,
            height: 45.0,
            interior_waypoints: 3,
            path_samples: 1001,
            edge_margin_fraction: 0.1,
            min_corner_degrees: 30.0,
            waypoint_attempts: 100,
            path_attempts: 1000,
            placement: PlacementPolicy::default(),
        }
    }
}

impl FieldConfig {
    /// The field rectangle.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }
}

/// Top-level game parameters.
///
/// # Example
///
/// ```
/// use palisade_core::config::GameConfig;
///
/// let config = GameConfig {
///     starting_gold: 50,
///     ..GameConfig::default()
/// };
/// assert_eq!(config.ticks_per_second, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Simulation ticks per in-game second.
    pub ticks_per_second: u32,
    /// Gold at the start of a run.
    pub starting_gold: u32,
    /// Lives at the start of a run; reaching zero loses the game.
    pub starting_lives: u32,
    /// Last wave; clearing it wins the game.
    pub max_wave: u32,
    /// Delay before the first wave starts.
    pub first_wave_delay_seconds: f64,
    /// Pause between the end of one roster and the next wave.
    pub intermission_seconds: f64,
    /// Remaining intermission is capped to this once the field is empty.
    pub empty_field_intermission_seconds: f64,
    /// Field generation parameters.
    pub field: FieldConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 20,
            starting_gold: 650,
            starting_lives: 15,
            max_wave: 100,
            first_wave_delay_seconds: 1.0,
            intermission_seconds: 10.0,
            empty_field_intermission_seconds: 0.5,
            field: FieldConfig::default(),
        }
    }
}

impl GameConfig {
    /// Converts a duration in seconds to whole ticks (truncating).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn seconds_to_ticks(&self, seconds: f64) -> u32 {
        (f64::from(self.ticks_per_second) * seconds).max(0.0) as u32
    }
}
