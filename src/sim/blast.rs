//! Bombs and blast propagation
//!
//! A blast covers its own tile plus four rays out to the bomb's radius. Rays stop
//! at the grid edge or at the first wall or block (which is hit, then stops the
//! ray). Any bomb a blast reaches, or one sitting right next to the detonating
//! bomb, goes off in the same pass.

use super::grid::{CellKind, Grid};
use super::powerup::spawn_power_up;
use super::state::{Bomb, Explosion, GameEvent, World};
use crate::TileCoord;
use crate::error::BombRejection;

/// Ray order: right, left, down, up
const RAY_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Plant a bomb on the player's tile
pub fn place_bomb(world: &mut World, now: f64) -> Result<TileCoord, BombRejection> {
    let tile = world.player_tile();
    if world.bomb_at(tile) {
        return Err(BombRejection::TileOccupied(tile));
    }

    let stats = &mut world.player.stats;
    if stats.active_bombs >= stats.max_bombs {
        return Err(BombRejection::AtCapacity(stats.max_bombs));
    }
    stats.active_bombs += 1;
    let radius = stats.blast_radius;

    world.bombs.push(Bomb::new(tile, now, radius));
    // The player is standing on it and must be able to walk off
    world.player.bomb_contacts.insert(tile);
    world.push_event(GameEvent::BombPlaced { tile });
    log::debug!("Bomb placed at ({}, {}) radius {}", tile.x, tile.y, radius);
    Ok(tile)
}

/// Tiles covered by a blast at `center`, center first then each ray in order.
///
/// A ray includes the blocking tile that stops it.
pub fn blast_cells(grid: &Grid, center: TileCoord, radius: u32) -> Vec<TileCoord> {
    let mut cells = Vec::with_capacity(1 + 4 * radius as usize);
    cells.push(center);
    for (dx, dy) in RAY_DIRECTIONS {
        for step in 1..=radius as i32 {
            let tile = center.offset(dx, dy, step);
            if !grid.in_bounds(tile) {
                break;
            }
            cells.push(tile);
            if grid.cell_at(tile).blocks_movement() {
                break;
            }
        }
    }
    cells
}

/// Detonate due bombs (and everything they chain into), then drop expired blasts
pub fn update_bombs(world: &mut World, now: f64) {
    detonate_due_bombs(world, now);
    expire_explosions(world, now);
}

/// Detonate every due bomb until none are left due.
///
/// Chained bombs are forced due, so a whole chain resolves here regardless of
/// where each bomb sits in the list.
pub fn detonate_due_bombs(world: &mut World, now: f64) {
    while let Some(idx) = world.bombs.iter().position(|b| b.is_due(now)) {
        let bomb = world.bombs.remove(idx);
        detonate(world, bomb, now);
    }
}

/// Remove blast cells whose lethal window has elapsed
pub fn expire_explosions(world: &mut World, now: f64) {
    world.explosions.retain(|e| !e.is_expired(now));
}

fn detonate(world: &mut World, bomb: Bomb, now: f64) {
    let stats = &mut world.player.stats;
    stats.active_bombs = stats.active_bombs.saturating_sub(1);
    world.push_event(GameEvent::BombDetonated {
        tile: bomb.tile,
        radius: bomb.radius,
    });
    log::debug!(
        "Bomb at ({}, {}) detonated, radius {}",
        bomb.tile.x,
        bomb.tile.y,
        bomb.radius
    );

    for other in world.bombs.iter_mut().filter(|b| b.tile.touches(bomb.tile)) {
        other.force_detonate();
    }

    for tile in blast_cells(&world.grid, bomb.tile, bomb.radius) {
        world.explosions.push(Explosion::new(tile, now));
        destroy_cell(world, tile);
        for other in world.bombs.iter_mut().filter(|b| b.tile == tile) {
            other.force_detonate();
        }
    }
}

/// Clear a destructible block; special blocks leave a power-up
fn destroy_cell(world: &mut World, tile: TileCoord) {
    let cell = world.grid.cell_at(tile);
    if !cell.is_destructible() {
        return;
    }
    world.grid.set(tile, CellKind::Empty);
    let special = cell == CellKind::SpecialBlock;
    world.push_event(GameEvent::BlockDestroyed { tile, special });
    if special {
        spawn_power_up(world, tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BOMB_FUSE_MS, EXPLOSION_DURATION_MS, GRID_HEIGHT, GRID_WIDTH};
    use crate::settings::Settings;
    use proptest::prelude::*;

    fn open_world() -> World {
        let mut world = World::new(Settings::default());
        world.grid = Grid::walls_only(GRID_WIDTH, GRID_HEIGHT);
        world
    }

    fn explosion_tiles(world: &World) -> Vec<TileCoord> {
        world.explosions.iter().map(|e| e.tile).collect()
    }

    #[test]
    fn test_place_bomb_rejects_occupied_tile() {
        let mut world = open_world();
        world.player.stats.max_bombs = 3;
        assert!(place_bomb(&mut world, 0.0).is_ok());
        let here = world.player_tile();
        assert_eq!(place_bomb(&mut world, 1.0), Err(BombRejection::TileOccupied(here)));
        assert_eq!(world.bombs.len(), 1);
        assert_eq!(world.player.stats.active_bombs, 1);
    }

    #[test]
    fn test_place_bomb_rejects_at_capacity() {
        let mut world = open_world();
        assert!(place_bomb(&mut world, 0.0).is_ok());
        world.player.pos = world.tile_center(TileCoord::new(3, 1));
        assert_eq!(place_bomb(&mut world, 1.0), Err(BombRejection::AtCapacity(1)));
        assert_eq!(world.bombs.len(), 1);
    }

    #[test]
    fn test_place_bomb_records_contact_and_radius() {
        let mut world = open_world();
        world.player.stats.blast_radius = 4;
        let tile = place_bomb(&mut world, 10.0).unwrap();
        assert!(world.player.bomb_contacts.contains(&tile));
        assert_eq!(world.bombs[0], Bomb::new(tile, 10.0, 4));

        // Later pickups do not grow an already planted bomb
        world.player.stats.blast_radius = 9;
        assert_eq!(world.bombs[0].radius, 4);
    }

    #[test]
    fn test_spawn_corner_blast() {
        let mut world = open_world();
        place_bomb(&mut world, 0.0).unwrap();

        update_bombs(&mut world, BOMB_FUSE_MS - 1.0);
        assert!(world.explosions.is_empty());

        update_bombs(&mut world, BOMB_FUSE_MS);
        let tiles = explosion_tiles(&world);
        assert_eq!(
            tiles,
            vec![
                TileCoord::new(1, 1),
                TileCoord::new(2, 1),
                TileCoord::new(0, 1),
                TileCoord::new(1, 2),
                TileCoord::new(1, 0),
            ]
        );
        assert!(world.bombs.is_empty());
        assert_eq!(world.player.stats.active_bombs, 0);
        // Border walls survive
        assert_eq!(world.grid.cell_at(TileCoord::new(0, 1)), CellKind::IndestructibleWall);
        assert_eq!(world.grid.cell_at(TileCoord::new(1, 0)), CellKind::IndestructibleWall);
    }

    #[test]
    fn test_ray_stops_at_first_block() {
        let mut grid = Grid::walls_only(GRID_WIDTH, GRID_HEIGHT);
        grid.set(TileCoord::new(3, 1), CellKind::DestructibleBlock);
        grid.set(TileCoord::new(4, 1), CellKind::DestructibleBlock);
        let cells = blast_cells(&grid, TileCoord::new(1, 1), 5);
        assert!(cells.contains(&TileCoord::new(3, 1)));
        assert!(!cells.contains(&TileCoord::new(4, 1)));
    }

    #[test]
    fn test_pillar_stops_ray_and_survives() {
        let mut world = open_world();
        world.bombs.push(Bomb::new(TileCoord::new(3, 2), 0.0, 5));
        world.bombs.push(Bomb::new(TileCoord::new(1, 2), 0.0, 1));
        // Pillar at (2,2) sits between the two bombs
        world.bombs[0].fuse_ms = 0.0;
        world.bombs[1].planted_at = 5000.0;
        detonate_due_bombs(&mut world, 100.0);

        assert_eq!(world.grid.cell_at(TileCoord::new(2, 2)), CellKind::IndestructibleWall);
        assert!(explosion_tiles(&world).contains(&TileCoord::new(2, 2)));
        // The far bomb stays armed: walls do not pass the blast
        assert_eq!(world.bombs.len(), 1);
        assert_eq!(world.bombs[0].tile, TileCoord::new(1, 2));
    }

    #[test]
    fn test_special_block_drops_one_power_up() {
        let mut world = open_world();
        world.grid.set(TileCoord::new(3, 1), CellKind::SpecialBlock);
        world.grid.set(TileCoord::new(1, 3), CellKind::DestructibleBlock);
        world.bombs.push(Bomb::new(TileCoord::new(1, 1), 0.0, 3));
        detonate_due_bombs(&mut world, BOMB_FUSE_MS);

        assert_eq!(world.grid.cell_at(TileCoord::new(3, 1)), CellKind::Empty);
        assert_eq!(world.grid.cell_at(TileCoord::new(1, 3)), CellKind::Empty);
        assert_eq!(world.power_ups.len(), 1);
        assert_eq!(world.power_ups[0].tile, TileCoord::new(3, 1));
    }

    #[test]
    fn test_chain_resolves_in_same_pass_regardless_of_order() {
        let mut world = open_world();
        // Listed first but planted late: would not be due on its own
        world.bombs.push(Bomb::new(TileCoord::new(5, 1), 1500.0, 1));
        world.bombs.push(Bomb::new(TileCoord::new(3, 1), 0.0, 2));
        world.player.stats.active_bombs = 2;

        detonate_due_bombs(&mut world, BOMB_FUSE_MS);

        assert!(world.bombs.is_empty());
        assert_eq!(world.player.stats.active_bombs, 0);
        let tiles = explosion_tiles(&world);
        assert!(tiles.contains(&TileCoord::new(6, 1)));
    }

    #[test]
    fn test_adjacent_bomb_chains() {
        let mut world = open_world();
        world.bombs.push(Bomb::new(TileCoord::new(1, 1), 0.0, 1));
        world.bombs.push(Bomb::new(TileCoord::new(1, 2), 1900.0, 1));
        detonate_due_bombs(&mut world, BOMB_FUSE_MS);
        assert!(world.bombs.is_empty());
    }

    #[test]
    fn test_co_located_bomb_chains() {
        let mut world = open_world();
        let tile = TileCoord::new(3, 3);
        world.bombs.push(Bomb::new(tile, 0.0, 1));
        world.bombs.push(Bomb::new(tile, 1900.0, 1));
        world.player.stats.active_bombs = 2;

        detonate_due_bombs(&mut world, BOMB_FUSE_MS);

        assert!(world.bombs.is_empty());
        assert_eq!(world.player.stats.active_bombs, 0);
        let detonations = world
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BombDetonated { .. }))
            .count();
        assert_eq!(detonations, 2);
    }

    #[test]
    fn test_diagonal_bomb_does_not_chain() {
        let mut world = open_world();
        world.bombs.push(Bomb::new(TileCoord::new(1, 1), 0.0, 1));
        world.bombs.push(Bomb::new(TileCoord::new(3, 3), 1900.0, 1));
        detonate_due_bombs(&mut world, BOMB_FUSE_MS);
        assert_eq!(world.bombs.len(), 1);
    }

    #[test]
    fn test_explosions_expire_after_duration() {
        let mut world = open_world();
        world.bombs.push(Bomb::new(TileCoord::new(1, 1), 0.0, 1));
        update_bombs(&mut world, BOMB_FUSE_MS);
        assert!(!world.explosions.is_empty());
        update_bombs(&mut world, BOMB_FUSE_MS + EXPLOSION_DURATION_MS - 1.0);
        assert!(!world.explosions.is_empty());
        update_bombs(&mut world, BOMB_FUSE_MS + EXPLOSION_DURATION_MS);
        assert!(world.explosions.is_empty());
    }

    proptest! {
        #[test]
        fn bomb_in_reach_goes_off_in_same_pass(
            distance in 1i32..=4,
            horizontal in any::<bool>(),
            planted_late in 1.0f64..BOMB_FUSE_MS,
        ) {
            let mut world = open_world();
            // Row 5 and column 5 are free of pillars
            let trigger = TileCoord::new(5, 5);
            let target = if horizontal {
                trigger.offset(1, 0, distance)
            } else {
                trigger.offset(0, 1, distance)
            };
            // Not due on its own, and listed ahead of its trigger
            world.bombs.push(Bomb::new(target, planted_late, 1));
            world.bombs.push(Bomb::new(trigger, 0.0, 4));
            world.player.stats.active_bombs = 2;

            detonate_due_bombs(&mut world, BOMB_FUSE_MS);

            prop_assert!(world.bombs.is_empty());
            prop_assert_eq!(world.player.stats.active_bombs, 0);
            prop_assert!(explosion_tiles(&world).contains(&target));
        }

        #[test]
        fn blast_shape_truncates_at_first_blocker(
            seed in any::<u64>(),
            x in 1i32..20,
            y in 1i32..20,
            radius in 1u32..=10,
        ) {
            use rand::SeedableRng;
            let grid = Grid::generate(21, 21, &mut rand_pcg::Pcg32::seed_from_u64(seed));
            let center = TileCoord::new(x, y);
            let cells = blast_cells(&grid, center, radius);

            prop_assert_eq!(cells[0], center);
            prop_assert_eq!(cells.iter().filter(|&&c| c == center).count(), 1);
            prop_assert!(cells.len() <= 1 + 4 * radius as usize);

            for (dx, dy) in RAY_DIRECTIONS {
                let ray: Vec<_> = cells[1..]
                    .iter()
                    .filter(|c| (c.x - x).signum() == dx && (c.y - y).signum() == dy)
                    .collect();
                prop_assert!(ray.len() <= radius as usize);
                // Everything before the last ray cell is open floor
                if let Some((_last, before)) = ray.split_last() {
                    for c in before {
                        prop_assert_eq!(grid.cell_at(**c), CellKind::Empty);
                    }
                }
                // A ray shorter than the radius ended on a blocker or the edge
                if ray.len() < radius as usize {
                    let next = center.offset(dx, dy, ray.len() as i32 + 1);
                    let ended_on_blocker = ray
                        .last()
                        .map(|c| grid.cell_at(**c).blocks_movement())
                        .unwrap_or(false);
                    prop_assert!(ended_on_blocker || !grid.in_bounds(next));
                }
            }
        }
    }
}
