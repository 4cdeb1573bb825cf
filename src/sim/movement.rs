//! Movement resolution for the player and enemies
//!
//! Moves are all-or-nothing: if the destination is blocked the actor stays put.

use std::collections::HashSet;

use glam::Vec2;

use super::collision::{any_blocking, corner_tiles};
use super::grid::Grid;
use super::state::{Bomb, Enemy, World};
use crate::consts::{ENEMY_SPEED, PLAYER_CORNER_INSET, TILE_SIZE};
use crate::tile_of;

/// Advance the player by its held direction keys.
///
/// Corner samples are pulled in to 70% of the radius so the player slides past
/// pillar corners instead of snagging on them. Bombs the player already overlaps
/// stay walkable until the player steps fully off them.
///
/// Returns false if the move was rejected.
pub fn move_player(world: &mut World) -> bool {
    let player = &world.player;
    let target = player.pos + player.moving.displacement(player.stats.speed);
    let inset = player.radius() * PLAYER_CORNER_INSET;
    let tiles = corner_tiles(target, inset, world.settings.origin);

    if any_blocking(&world.grid, &tiles) {
        log::trace!("Player blocked by terrain at {:?}", tiles);
        return false;
    }

    let mut contacts = HashSet::new();
    for bomb in &world.bombs {
        if !tiles.contains(&bomb.tile) {
            continue;
        }
        if !player.bomb_contacts.contains(&bomb.tile) {
            log::trace!("Player blocked by bomb at {:?}", bomb.tile);
            return false;
        }
        contacts.insert(bomb.tile);
    }

    world.player.pos = target;
    world.player.bomb_contacts = contacts;
    true
}

/// Advance an enemy one step along its heading.
///
/// Enemies use their full radius for corner samples and never walk onto a bomb.
/// Returns false if the move was rejected.
pub fn move_enemy(enemy: &mut Enemy, grid: &Grid, bombs: &[Bomb], origin: Vec2) -> bool {
    let target = enemy.pos + enemy.direction.as_vec2() * ENEMY_SPEED;
    let tiles = corner_tiles(target, enemy.radius(), origin);
    if any_blocking(grid, &tiles) {
        return false;
    }

    let center = tile_of(target, TILE_SIZE, origin);
    if bombs.iter().any(|b| b.tile == center) {
        return false;
    }

    enemy.pos = target;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TileCoord;
    use crate::consts::{GRID_HEIGHT, GRID_WIDTH};
    use crate::settings::Settings;
    use crate::sim::grid::CellKind;
    use crate::sim::state::Direction;
    use glam::IVec2;

    /// World with only fixed walls, player at spawn
    fn open_world() -> World {
        let mut world = World::new(Settings::default());
        world.grid = Grid::walls_only(GRID_WIDTH, GRID_HEIGHT);
        world
    }

    #[test]
    fn test_player_moves_into_open_corridor() {
        let mut world = open_world();
        let start = world.player.pos;
        world.player.moving.set(Direction::Right, true);
        assert!(move_player(&mut world));
        assert_eq!(world.player.pos, start + Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_player_blocked_by_border_wall() {
        let mut world = open_world();
        // Spawn (1,1) center is y=60; radius 15 * 0.7 = 10.5; wall row 0 ends at y=40
        world.player.pos.y = 51.0;
        world.player.moving.set(Direction::Up, true);
        let before = world.player.pos;
        assert!(!move_player(&mut world));
        assert_eq!(world.player.pos, before);
    }

    #[test]
    fn test_player_blocked_by_destructible_block() {
        let mut world = open_world();
        world.grid.set(TileCoord::new(2, 1), CellKind::DestructibleBlock);
        world.player.pos.x = 69.0;
        world.player.moving.set(Direction::Right, true);
        assert!(!move_player(&mut world));
    }

    #[test]
    fn test_player_can_walk_off_own_bomb() {
        let mut world = open_world();
        let here = world.player_tile();
        world.bombs.push(Bomb::new(here, 0.0, 1));
        world.player.bomb_contacts.insert(here);
        world.player.moving.set(Direction::Right, true);

        // Step until fully off the bomb tile
        for _ in 0..10 {
            assert!(move_player(&mut world));
        }
        assert!(world.player.bomb_contacts.is_empty());

        // Walking back onto it is now blocked
        world.player.moving.set(Direction::Right, false);
        world.player.moving.set(Direction::Left, true);
        let mut blocked = false;
        for _ in 0..10 {
            if !move_player(&mut world) {
                blocked = true;
                break;
            }
        }
        assert!(blocked);
        assert!(world.player.pos.x > world.tile_center(here).x);
    }

    #[test]
    fn test_player_blocked_by_unknown_bomb() {
        let mut world = open_world();
        world.bombs.push(Bomb::new(TileCoord::new(2, 1), 0.0, 1));
        world.player.pos.x = 69.0;
        world.player.moving.set(Direction::Right, true);
        assert!(!move_player(&mut world));
    }

    #[test]
    fn test_enemy_moves_and_stops_at_wall() {
        let world = open_world();
        let mut enemy = Enemy::new(1, world.tile_center(TileCoord::new(1, 3)));
        enemy.direction = IVec2::new(-1, 0);
        // Center x=60, radius 10: left edge reaches the wall (x<40) after 5 steps
        let mut steps = 0;
        while move_enemy(&mut enemy, &world.grid, &world.bombs, Vec2::ZERO) {
            steps += 1;
            assert!(steps < 100);
        }
        assert_eq!(steps, 5);
    }

    #[test]
    fn test_enemy_blocked_by_bomb() {
        let mut world = open_world();
        world.bombs.push(Bomb::new(TileCoord::new(3, 1), 0.0, 1));
        let mut enemy = Enemy::new(1, world.tile_center(TileCoord::new(2, 1)));
        enemy.direction = IVec2::new(1, 0);
        let mut steps = 0;
        while move_enemy(&mut enemy, &world.grid, &world.bombs, Vec2::ZERO) {
            steps += 1;
            assert!(steps < 100);
        }
        // Center crosses into column 3 at x=120, from x=100
        assert_eq!(steps, 9);
    }
}
