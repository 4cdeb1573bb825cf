//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timestamps supplied by the host, never read from a clock
//! - Seeded RNG only, owned by the world
//! - Stable iteration order (insertion order of each collection)
//! - No rendering or platform dependencies

pub mod blast;
pub mod collision;
pub mod enemy;
pub mod grid;
pub mod movement;
pub mod powerup;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use blast::{blast_cells, place_bomb, update_bombs};
pub use grid::{CellKind, Grid};
pub use snapshot::Snapshot;
pub use state::{
    Bomb, DeathCause, Direction, Enemy, Explosion, GameEvent, GameMode, GamePhase, MENU_ITEMS,
    Player, PlayerStats, PowerUp, PowerUpKind, World,
};
pub use tick::{Intent, MenuStep, TickInput, game_over_remaining_ms, start_game, tick};
