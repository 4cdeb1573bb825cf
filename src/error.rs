//! Error types
//!
//! Nothing in the simulation is fatal; these only describe why an action or a
//! settings blob was refused.

use crate::TileCoord;

/// Why a bomb could not be planted
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BombRejection {
    /// A bomb already sits on the player's tile
    #[error("tile ({}, {}) already holds a bomb", .0.x, .0.y)]
    TileOccupied(TileCoord),

    /// Every bomb the player may hold is already planted
    #[error("maximum bombs reached ({0})")]
    AtCapacity(u32),
}

/// Settings could not be loaded
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Parsed but out of range
    #[error("Invalid settings: {0}")]
    Invalid(String),
}
