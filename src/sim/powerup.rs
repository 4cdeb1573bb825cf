//! Power-up drops and pickup

use rand::Rng;

use super::grid::CellKind;
use super::state::{GameEvent, PlayerStats, PowerUp, PowerUpKind, World};
use crate::TileCoord;
use crate::consts::{MAX_BLAST_RADIUS, MAX_PLAYER_SPEED, SPEED_INCREMENT};

/// Drop a fresh power-up on `tile`, replacing any already there
pub fn spawn_power_up(world: &mut World, tile: TileCoord) -> PowerUpKind {
    world.power_ups.retain(|p| p.tile != tile);
    let kind = PowerUpKind::from_roll(world.rng.random::<f64>());
    world.power_ups.push(PowerUp { tile, kind });
    world.push_event(GameEvent::PowerUpSpawned { tile, kind });
    log::debug!("Power-up {:?} dropped at ({}, {})", kind, tile.x, tile.y);
    kind
}

/// Pick up every power-up on the player's tile
pub fn collect_power_ups(world: &mut World) {
    let here = world.player_tile();
    if !world.power_ups.iter().any(|p| p.tile == here) {
        return;
    }

    let mut collected = Vec::new();
    world.power_ups.retain(|p| {
        if p.tile == here {
            collected.push(p.kind);
            false
        } else {
            true
        }
    });

    for kind in collected {
        apply_power_up(&mut world.player.stats, kind);
        world.push_event(GameEvent::PowerUpCollected { tile: here, kind });
        log::debug!("Collected {:?}: {:?}", kind, world.player.stats);
    }
}

/// Permanent stat boost for the rest of the run
pub fn apply_power_up(stats: &mut PlayerStats, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Speed => {
            stats.speed = (stats.speed + SPEED_INCREMENT).min(MAX_PLAYER_SPEED);
        }
        PowerUpKind::BlastRadius => {
            stats.blast_radius = (stats.blast_radius + 1).min(MAX_BLAST_RADIUS);
        }
        PowerUpKind::ExtraBomb => {
            stats.max_bombs += 1;
        }
    }
}

/// Whether a renderer should show this power-up yet
pub fn is_visible(world: &World, power_up: &PowerUp) -> bool {
    world.settings.reveal_hidden || world.grid.cell_at(power_up.tile) == CellKind::Empty
}
