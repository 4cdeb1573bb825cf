//! Collision and geometry helpers
//!
//! Actors are circles in pixel space; terrain and hazards are tiles. Every test
//! here converts to tile space through [`crate::tile_of`] before comparing.

use glam::Vec2;

use super::grid::Grid;
use super::state::{DeathCause, World};
use crate::consts::{ENEMY_CONTACT_FACTOR, EXPLOSION_HIT_RADIUS, TILE_SIZE};
use crate::{TileCoord, tile_of};

/// The four axis-aligned corners of a square of half-width `inset` around `center`
/// (top-left, top-right, bottom-left, bottom-right)
#[inline]
pub fn corner_samples(center: Vec2, inset: f32) -> [Vec2; 4] {
    [
        Vec2::new(center.x - inset, center.y - inset),
        Vec2::new(center.x + inset, center.y - inset),
        Vec2::new(center.x - inset, center.y + inset),
        Vec2::new(center.x + inset, center.y + inset),
    ]
}

/// Tiles under each corner sample
pub fn corner_tiles(center: Vec2, inset: f32, origin: Vec2) -> [TileCoord; 4] {
    corner_samples(center, inset).map(|p| tile_of(p, TILE_SIZE, origin))
}

/// True if any of the tiles holds a wall or block
pub fn any_blocking(grid: &Grid, tiles: &[TileCoord]) -> bool {
    tiles.iter().any(|&t| grid.cell_at(t).blocks_movement())
}

/// Circle vs. the lethal disc of a blast cell centered at `cell_center`
#[inline]
pub fn circle_hits_explosion(pos: Vec2, radius: f32, cell_center: Vec2) -> bool {
    pos.distance(cell_center) < radius + EXPLOSION_HIT_RADIUS
}

/// Circle vs. circle, only counting overlap inside `factor` of the combined radii
#[inline]
pub fn circles_touch(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32, factor: f32) -> bool {
    a.distance(b) < (a_radius + b_radius) * factor
}

/// First hazard currently touching the player, explosions before enemies
pub fn find_lethal_hit(world: &World) -> Option<DeathCause> {
    let pos = world.player.pos;
    let radius = world.player.radius();

    if let Some(explosion) = world
        .explosions
        .iter()
        .find(|e| circle_hits_explosion(pos, radius, world.tile_center(e.tile)))
    {
        return Some(DeathCause::Explosion(explosion.tile));
    }

    world
        .enemies
        .iter()
        .find(|e| circles_touch(pos, radius, e.pos, e.radius(), ENEMY_CONTACT_FACTOR))
        .map(|e| DeathCause::Enemy(e.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::grid::CellKind;
    use crate::sim::state::{Enemy, Explosion};

    #[test]
    fn test_corner_samples_order() {
        let c = corner_samples(Vec2::new(10.0, 20.0), 5.0);
        assert_eq!(c[0], Vec2::new(5.0, 15.0));
        assert_eq!(c[1], Vec2::new(15.0, 15.0));
        assert_eq!(c[2], Vec2::new(5.0, 25.0));
        assert_eq!(c[3], Vec2::new(15.0, 25.0));
    }

    #[test]
    fn test_corner_tiles_straddle_boundary() {
        // Centered on (1,1) but pushed right so the right corners reach column 2
        let tiles = corner_tiles(Vec2::new(75.0, 60.0), 10.5, Vec2::ZERO);
        assert_eq!(tiles[0], TileCoord::new(1, 1));
        assert_eq!(tiles[1], TileCoord::new(2, 1));
    }

    #[test]
    fn test_any_blocking_ignores_out_of_bounds() {
        let mut grid = Grid::empty(5, 5);
        assert!(!any_blocking(&grid, &[TileCoord::new(-1, -1), TileCoord::new(9, 9)]));
        grid.set(TileCoord::new(2, 2), CellKind::DestructibleBlock);
        assert!(any_blocking(&grid, &[TileCoord::new(0, 0), TileCoord::new(2, 2)]));
    }

    #[test]
    fn test_explosion_radius() {
        let cell = Vec2::new(100.0, 100.0);
        // 15 + 16 = 31
        assert!(circle_hits_explosion(Vec2::new(130.5, 100.0), 15.0, cell));
        assert!(!circle_hits_explosion(Vec2::new(131.5, 100.0), 15.0, cell));
    }

    #[test]
    fn test_enemy_contact_factor() {
        // (15 + 10) * 0.8 = 20
        assert!(circles_touch(Vec2::ZERO, 15.0, Vec2::new(19.5, 0.0), 10.0, 0.8));
        assert!(!circles_touch(Vec2::ZERO, 15.0, Vec2::new(20.5, 0.0), 10.0, 0.8));
    }

    #[test]
    fn test_explosion_checked_before_enemy() {
        let mut world = World::new(Settings::default());
        let here = world.player_tile();
        world.enemies.push(Enemy::new(9, world.player.pos));
        world.explosions.push(Explosion::new(here, 0.0));
        assert_eq!(find_lethal_hit(&world), Some(DeathCause::Explosion(here)));

        world.explosions.clear();
        assert_eq!(find_lethal_hit(&world), Some(DeathCause::Enemy(9)));

        world.enemies.clear();
        assert_eq!(find_lethal_hit(&world), None);
    }
}
