//! Dyna - A tile-grid bomb arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, bombs, enemies, game state)
//! - `settings`: Runtime settings injected by the host (seed, layout origin)
//! - `error`: Error types for configuration and rejected actions

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{BombRejection, SettingsError};
pub use settings::Settings;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Grid dimensions (tiles)
    pub const GRID_WIDTH: i32 = 21;
    pub const GRID_HEIGHT: i32 = 21;
    /// Tile edge length (pixels)
    pub const TILE_SIZE: f32 = 40.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = TILE_SIZE - 10.0;
    pub const PLAYER_MAX_HEALTH: u32 = 1;
    /// Pixels per tick
    pub const BASE_PLAYER_SPEED: f32 = 4.0;
    pub const SPEED_INCREMENT: f32 = 0.5;
    pub const MAX_PLAYER_SPEED: f32 = BASE_PLAYER_SPEED * 2.0;
    /// Corner samples sit at this fraction of the player radius
    pub const PLAYER_CORNER_INSET: f32 = 0.7;

    /// Bomb defaults
    pub const BASE_BLAST_RADIUS: u32 = 1;
    pub const MAX_BLAST_RADIUS: u32 = 10;
    pub const BASE_MAX_BOMBS: u32 = 1;
    /// Fuse length (ms)
    pub const BOMB_FUSE_MS: f64 = 2000.0;
    /// How long a blast cell stays lethal (ms)
    pub const EXPLOSION_DURATION_MS: f64 = 500.0;
    /// Lethal radius of a blast cell around its tile center (pixels)
    pub const EXPLOSION_HIT_RADIUS: f32 = TILE_SIZE * 0.4;

    /// Grid generation
    pub const BLOCK_FILL_CHANCE: f64 = 0.7;
    pub const SPECIAL_BLOCK_CHANCE: f64 = 0.3;

    /// Enemy defaults
    pub const ENEMY_COUNT: usize = 5;
    pub const ENEMY_SIZE: f32 = TILE_SIZE - 20.0;
    pub const ENEMY_SPEED: f32 = 2.0;
    pub const ENEMY_DIRECTION_INTERVAL_MS: f64 = 500.0;
    pub const ENEMY_MIN_SPAWN_DISTANCE: f32 = 5.0;
    /// Enemies never spawn within this many tiles of each other on both axes
    pub const ENEMY_SPAWN_SPACING: i32 = 3;
    pub const ENEMY_SPAWN_ATTEMPTS: u32 = 100;
    /// Enemy contact only kills inside this fraction of the combined radii
    pub const ENEMY_CONTACT_FACTOR: f32 = 0.8;

    /// Game over screen duration before returning to the menu (ms)
    pub const GAME_OVER_DURATION_MS: f64 = 4000.0;
}

/// Integer tile coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbor one step along `(dx, dy)` scaled by `steps`
    #[inline]
    pub fn offset(self, dx: i32, dy: i32, steps: i32) -> Self {
        Self::new(self.x + dx * steps, self.y + dy * steps)
    }

    /// True when `other` is this tile or shares a row/column at distance 1
    pub fn touches(self, other: TileCoord) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        (dx == 0 && dy <= 1) || (dy == 0 && dx <= 1)
    }
}

/// Player spawn tile
pub const SPAWN_TILE: TileCoord = TileCoord::new(1, 1);

/// Convert a pixel position to the tile containing it
#[inline]
pub fn tile_of(pos: Vec2, tile_size: f32, origin: Vec2) -> TileCoord {
    let local = (pos - origin) / tile_size;
    TileCoord::new(local.x.floor() as i32, local.y.floor() as i32)
}

/// Pixel position of a tile's center
#[inline]
pub fn tile_center(tile: TileCoord, tile_size: f32, origin: Vec2) -> Vec2 {
    origin + Vec2::new(
        tile.x as f32 * tile_size + tile_size / 2.0,
        tile.y as f32 * tile_size + tile_size / 2.0,
    )
}
