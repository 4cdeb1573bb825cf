//! Tile grid and level generation
//!
//! The grid only changes when a blast destroys a block or the world resets.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::TileCoord;
use crate::consts::{BLOCK_FILL_CHANCE, SPECIAL_BLOCK_CHANCE};

/// What occupies a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    IndestructibleWall,
    DestructibleBlock,
    /// Destructible block that always leaves a power-up behind
    SpecialBlock,
}

impl CellKind {
    /// Walls and blocks stop actors and blast rays
    #[inline]
    pub fn blocks_movement(self) -> bool {
        self != CellKind::Empty
    }

    #[inline]
    pub fn is_destructible(self) -> bool {
        matches!(self, CellKind::DestructibleBlock | CellKind::SpecialBlock)
    }
}

/// Fixed-size tile map, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<CellKind>,
}

impl Grid {
    /// All-empty grid. Dimensions must be positive.
    pub fn empty(width: i32, height: i32) -> Self {
        debug_assert!(width > 0 && height > 0, "grid must have positive dimensions");
        Self {
            width,
            height,
            cells: vec![CellKind::Empty; (width * height) as usize],
        }
    }

    /// Border and pillar walls only, no blocks
    pub fn walls_only(width: i32, height: i32) -> Self {
        let mut grid = Self::empty(width, height);
        for y in 0..height {
            for x in 0..width {
                let tile = TileCoord::new(x, y);
                if grid.is_fixed_wall(tile) {
                    grid.set(tile, CellKind::IndestructibleWall);
                }
            }
        }
        grid
    }

    /// Generate a level: fixed walls, then random blocks everywhere except
    /// the spawn corner.
    pub fn generate(width: i32, height: i32, rng: &mut impl Rng) -> Self {
        let mut grid = Self::walls_only(width, height);
        for y in 0..height {
            for x in 0..width {
                let tile = TileCoord::new(x, y);
                if grid.is_fixed_wall(tile) || is_spawn_clearing(tile) {
                    continue;
                }
                if rng.random_bool(BLOCK_FILL_CHANCE) {
                    let kind = if rng.random_bool(SPECIAL_BLOCK_CHANCE) {
                        CellKind::SpecialBlock
                    } else {
                        CellKind::DestructibleBlock
                    };
                    grid.set(tile, kind);
                }
            }
        }
        grid
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, tile: TileCoord) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width && tile.y < self.height
    }

    /// Cell at `tile`; anything off the map reads as `Empty`
    pub fn cell_at(&self, tile: TileCoord) -> CellKind {
        if self.in_bounds(tile) {
            self.cells[self.index(tile)]
        } else {
            CellKind::Empty
        }
    }

    /// Overwrite a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, tile: TileCoord, kind: CellKind) {
        if self.in_bounds(tile) {
            let idx = self.index(tile);
            self.cells[idx] = kind;
        }
    }

    /// Rows of cells, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[CellKind]> {
        self.cells.chunks(self.width as usize)
    }

    /// Number of cells of the given kind
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }

    /// Border or even-even pillar
    fn is_fixed_wall(&self, tile: TileCoord) -> bool {
        tile.x == 0
            || tile.y == 0
            || tile.x == self.width - 1
            || tile.y == self.height - 1
            || (tile.x % 2 == 0 && tile.y % 2 == 0)
    }

    #[inline]
    fn index(&self, tile: TileCoord) -> usize {
        (tile.y * self.width + tile.x) as usize
    }
}

/// Spawn tile plus the two tiles that let the player step out of the corner
fn is_spawn_clearing(tile: TileCoord) -> bool {
    matches!((tile.x, tile.y), (1, 1) | (2, 1) | (1, 2))
}
