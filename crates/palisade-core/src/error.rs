//! Error types for game commands.
//!
//! Every command either succeeds or returns one of these errors with the game
//! left exactly as it was.

use thiserror::Error;
use waypath::{Location, SplineError};

/// Why a tower could not be placed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    /// The location is not one of the field's placeable spots.
    #[error("{0} is not a placeable spot")]
    NotPlaceable(Location),
    /// A tower already stands on the spot.
    #[error("spot {0} is already occupied")]
    Occupied(Location),
}

/// A command that is not valid in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidState {
    /// The tower is already at its maximum level.
    #[error("tower is already at max level {max_level}")]
    MaxLevel {
        /// The tower's maximum level.
        max_level: u8,
    },
    /// The tower refuses to be sold.
    #[error("tower cannot be sold")]
    NotSellable,
    /// The speed multiplier is outside the supported range.
    #[error("speed {speed} is outside 1..={max}")]
    Speed {
        /// Requested multiplier.
        speed: u32,
        /// Largest supported multiplier.
        max: u32,
    },
}

/// Top-level error returned by game commands.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// Tower placement was rejected.
    #[error("placement rejected: {0}")]
    Placement(#[from] PlacementError),

    /// No tower stands at the given location.
    #[error("no tower at {0}")]
    NotFound(Location),

    /// The player cannot afford the command.
    #[error("insufficient funds: need {required} gold, have {available}")]
    InsufficientFunds {
        /// Gold the command costs.
        required: u32,
        /// Gold currently held.
        available: u32,
    },

    /// The command is not valid right now.
    #[error("invalid state: {0}")]
    InvalidState(#[from] InvalidState),

    /// Malformed path input.
    #[error("invalid path input: {0}")]
    InvalidInput(#[from] SplineError),

    /// No acceptable random path was found.
    #[error("could not generate a valid path after {attempts} attempts")]
    PathGeneration {
        /// Number of whole-path attempts made.
        attempts: u32,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = GameError::InsufficientFunds {
            required: 100,
            available: 50,
        };
        assert_eq!(
            err.to_string(),
            "insufficient funds: need 100 gold, have 50"
        );

        let err: GameError = PlacementError::Occupied(Location::new(1.0, 2.0)).into();
        assert_eq!(
            err.to_string(),
            "placement rejected: spot (1.00, 2.00) is already occupied"
        );

        let err: GameError = InvalidState::MaxLevel { max_level: 3 }.into();
        assert_eq!(err.to_string(), "invalid state: tower is already at max level 3");
    }

    #[test]
    fn spline_errors_convert() {
        let err: GameError = SplineError::NonIncreasing { index: 2 }.into();
        assert!(matches!(err, GameError::InvalidInput(_)));
    }
}
