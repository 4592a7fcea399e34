//! # Palisade Core
//!
//! Deterministic tower-defense simulation core.
//!
//! A [`Game`] generates a smooth enemy path from its seed, spawns escalating
//! waves along it, lets placed towers pick targets and fire projectiles,
//! resolves damage, and keeps the player's gold and lives. Rendering and
//! input live elsewhere; they call the command surface between ticks and read
//! [`GameSnapshot`]s back.
//!
//! ## Architecture
//!
//! - **Arena**: towers, enemies and projectiles live in id-keyed arenas and
//!   refer to each other only by [`EntityId`]
//! - **Field**: path, placeable spots and the per-tick phases
//! - **Waves**: seeded roster generation and spawn pacing
//! - **Game**: ledger, commands, win/loss and the tick loop
//!
//! Every tick runs waves, enemies, towers, projectiles, then a sweep that
//! removes dead enemies and spent projectiles. Nothing is removed mid-phase.
//!
//! ## Usage
//!
//! ```
//! use palisade_core::{Game, GameConfig, TowerKind};
//!
//! let mut game = Game::new(GameConfig::default(), 7)?;
//! let spot = game.field().placeable_spots()[0];
//! game.buy_tower(TowerKind::Archer, spot)?;
//! assert_eq!(game.gold(), 550);
//!
//! game.start(None)?;
//! for _ in 0..200 {
//!     game.tick();
//! }
//! assert!(game.waves().wave() >= 1);
//! # Ok::<(), palisade_core::GameError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub use waypath;

pub mod action;
pub mod arena;
pub mod combat;
pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod field;
pub mod game;
pub mod hash;
pub mod path;
pub mod targeting;
pub mod view;
pub mod wave;

// Re-exports for convenience
pub use action::{Action, ActionOption};
pub use config::{FieldConfig, GameConfig, PlacementPolicy};
pub use entity::{EnemyKind, EntityId, TowerKind};
pub use error::{GameError, InvalidState, PlacementError, Result};
pub use event::GameEvent;
pub use field::Field;
pub use game::{Game, GameStatus};
pub use targeting::TargetingMode;
pub use view::GameSnapshot;
pub use waypath::Location;

#[cfg(test)]
mod tests;
