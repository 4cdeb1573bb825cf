//! Read-only view of the world for renderers and HUDs
//!
//! Hides what the player should not see yet: blast cells over blocks that are
//! still standing this frame, and power-ups still buried under their block.

use std::collections::HashSet;

use glam::Vec2;
use serde::Serialize;

use super::grid::CellKind;
use super::powerup::is_visible;
use super::state::{GameMode, GamePhase, MENU_ITEMS, MenuItem, PlayerStats, PowerUp, World};
use super::tick::game_over_remaining_ms;
use crate::TileCoord;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: f32,
    pub stats: PlayerStats,
    pub bombs_available: u32,
    pub speed_multiplier: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuView {
    pub items: [MenuItem; 2],
    pub cursor: usize,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub mode: Option<GameMode>,
    pub menu: MenuView,
    pub origin: Vec2,
    /// Rows of cells, top to bottom
    pub cells: Vec<Vec<CellKind>>,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub bombs: Vec<TileCoord>,
    /// Active blast cells on open floor, each listed once
    pub explosions: Vec<TileCoord>,
    pub power_ups: Vec<PowerUp>,
    pub game_over_remaining_ms: Option<f64>,
    /// Whole seconds left on the game over screen, rounded up
    pub game_over_countdown: Option<u32>,
}

impl Snapshot {
    pub fn capture(world: &World, now: f64) -> Self {
        let stats = world.player.stats;

        let mut seen = HashSet::new();
        let explosions = world
            .explosions
            .iter()
            .map(|e| e.tile)
            .filter(|&t| world.grid.cell_at(t) == CellKind::Empty && seen.insert(t))
            .collect();

        let remaining = game_over_remaining_ms(world, now);

        Self {
            phase: world.phase,
            mode: world.mode,
            menu: MenuView {
                items: MENU_ITEMS,
                cursor: world.menu_cursor,
            },
            origin: world.settings.origin,
            cells: world.grid.rows().map(|row| row.to_vec()).collect(),
            player: PlayerView {
                pos: world.player.pos,
                size: world.player.size,
                stats,
                bombs_available: stats.bombs_available(),
                speed_multiplier: stats.speed_multiplier(),
            },
            enemies: world
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    pos: e.pos,
                    size: e.size,
                })
                .collect(),
            bombs: world.bombs.iter().map(|b| b.tile).collect(),
            explosions,
            power_ups: world
                .power_ups
                .iter()
                .filter(|p| is_visible(world, p))
                .copied()
                .collect(),
            game_over_remaining_ms: remaining,
            game_over_countdown: remaining.map(|ms| (ms / 1000.0).ceil() as u32),
        }
    }
}
