//! Enemy spawning and wandering AI
//!
//! Enemies random-walk: every interval they pick one of the open neighboring
//! tiles (or stay put) and keep walking that way until the next pick. Running
//! into something forces an early pick.

use glam::IVec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::grid::CellKind;
use super::movement::move_enemy;
use super::state::{Direction, Enemy, GameEvent, World};
use crate::consts::*;
use crate::{SPAWN_TILE, TileCoord};

/// Populate `world.enemies` for a fresh run.
///
/// Each enemy gets a bounded number of attempts at finding an open tile far from
/// the spawn corner and from other enemies; one that runs out is skipped.
pub fn spawn_enemies(world: &mut World) {
    for _ in 0..ENEMY_COUNT {
        match find_spawn_tile(world) {
            Some(tile) => {
                let id = world.next_entity_id();
                let pos = world.tile_center(tile);
                world.enemies.push(Enemy::new(id, pos));
                log::debug!("Enemy {} spawned at ({}, {})", id, tile.x, tile.y);
            }
            None => {
                log::debug!(
                    "No enemy spawn found in {} attempts, skipping",
                    ENEMY_SPAWN_ATTEMPTS
                );
            }
        }
    }
}

fn find_spawn_tile(world: &mut World) -> Option<TileCoord> {
    let width = world.grid.width();
    let height = world.grid.height();
    for _ in 0..ENEMY_SPAWN_ATTEMPTS {
        let tile = TileCoord::new(
            world.rng.random_range(1..width - 1),
            world.rng.random_range(1..height - 1),
        );
        if is_valid_spawn(world, tile) {
            return Some(tile);
        }
    }
    None
}

fn is_valid_spawn(world: &World, tile: TileCoord) -> bool {
    if world.grid.cell_at(tile) != CellKind::Empty {
        return false;
    }
    let dx = (tile.x - SPAWN_TILE.x) as f32;
    let dy = (tile.y - SPAWN_TILE.y) as f32;
    if (dx * dx + dy * dy).sqrt() < ENEMY_MIN_SPAWN_DISTANCE {
        return false;
    }
    !world.enemies.iter().any(|e| {
        let other = world.tile_at(e.pos);
        (other.x - tile.x).abs() < ENEMY_SPAWN_SPACING
            && (other.y - tile.y).abs() < ENEMY_SPAWN_SPACING
    })
}

/// Headings an enemy standing on `tile` could take right now
pub fn open_headings(world: &World, tile: TileCoord) -> Vec<IVec2> {
    Direction::ALL
        .iter()
        .map(|d| d.delta())
        .chain(std::iter::once(IVec2::ZERO))
        .filter(|d| {
            let dest = tile.offset(d.x, d.y, 1);
            world.grid.in_bounds(dest)
                && !world.bomb_at(dest)
                && world.grid.cell_at(dest) == CellKind::Empty
        })
        .collect()
}

/// Kill enemies standing in a blast, then steer and move the survivors
pub fn update_enemies(world: &mut World, now: f64) {
    let mut enemies = std::mem::take(&mut world.enemies);

    enemies.retain(|enemy| {
        let tile = world.tile_at(enemy.pos);
        if world.explosion_at(tile) {
            world.push_event(GameEvent::EnemyKilled { id: enemy.id, tile });
            log::debug!("Enemy {} killed at ({}, {})", enemy.id, tile.x, tile.y);
            false
        } else {
            true
        }
    });

    for enemy in &mut enemies {
        let due = enemy
            .last_direction_change
            .is_none_or(|t| now - t > ENEMY_DIRECTION_INTERVAL_MS);
        if due {
            let options = open_headings(world, world.tile_at(enemy.pos));
            enemy.direction = options
                .choose(&mut world.rng)
                .copied()
                .unwrap_or(IVec2::ZERO);
            enemy.last_direction_change = Some(now);
        }

        if !move_enemy(enemy, &world.grid, &world.bombs, world.settings.origin) {
            // Re-pick on the next tick instead of idling against the obstacle
            enemy.last_direction_change = None;
        }
    }

    world.enemies = enemies;
}
