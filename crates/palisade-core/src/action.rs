//! Player actions offered at a spot.

use serde::{Deserialize, Serialize};

use crate::entity::TowerKind;
use crate::targeting::TargetingMode;

/// A command the player may issue at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Build a tower on an empty spot.
    Buy {
        /// Tower to build.
        kind: TowerKind,
        /// Its price.
        cost: u32,
    },
    /// Upgrade the tower here; `None` once it is maxed.
    Upgrade {
        /// Price of the next level.
        cost: Option<u32>,
    },
    /// Sell the tower here.
    Sell {
        /// Gold returned.
        refund: u32,
    },
    /// Switch the tower to its next targeting mode.
    CycleTargeting {
        /// Mode in use now.
        current: TargetingMode,
    },
}

/// An [`Action`] and whether it can be taken right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOption {
    /// The action.
    pub action: Action,
    /// False if the player cannot afford it or it does not apply.
    pub enabled: bool,
}

impl ActionOption {
    /// Pairs an action with its availability.
    #[must_use]
    pub const fn new(action: Action, enabled: bool) -> Self {
        Self { action, enabled }
    }
}
