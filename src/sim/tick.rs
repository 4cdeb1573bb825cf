//! Per-frame simulation tick
//!
//! Core game loop: the host calls [`tick`] once per display frame with the
//! current timestamp. Timers compare against that timestamp, so they run at
//! real-time speed whatever the frame rate; movement is a fixed step per tick.

use serde::{Deserialize, Serialize};

use super::blast::{place_bomb, update_bombs};
use super::collision::find_lethal_hit;
use super::enemy::update_enemies;
use super::movement::move_player;
use super::powerup::collect_power_ups;
use super::state::{DeathCause, Direction, GameEvent, GameMode, GamePhase, MENU_ITEMS, World};
use crate::consts::GAME_OVER_DURATION_MS;

/// Menu cursor movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuStep {
    Up,
    Down,
}

/// Player intents produced by the host's input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// A direction key went down (true) or up (false)
    SetMoveDirection(Direction, bool),
    PlaceBomb,
    MenuNavigate(MenuStep),
    MenuConfirm,
    ConfirmWinScreen,
}

/// Input commands for a single tick, in arrival order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub intents: Vec<Intent>,
}

impl TickInput {
    pub fn new(intents: impl IntoIterator<Item = Intent>) -> Self {
        Self {
            intents: intents.into_iter().collect(),
        }
    }
}

/// Advance the world to timestamp `now` (ms).
///
/// `world.events` holds only what this tick raised; hosts that want them read or
/// drain them before the next call.
pub fn tick(world: &mut World, input: &TickInput, now: f64) {
    world.events.clear();

    match world.phase {
        GamePhase::Menu => {
            for &intent in &input.intents {
                // Keys pressed in the same frame as the confirm carry into the run
                if world.phase == GamePhase::Playing {
                    apply_play_intent(world, intent, now);
                    continue;
                }
                match intent {
                    Intent::MenuNavigate(step) => navigate_menu(world, step),
                    Intent::MenuConfirm => confirm_menu(world),
                    _ => {}
                }
            }
        }

        GamePhase::Playing => {
            for &intent in &input.intents {
                apply_play_intent(world, intent, now);
            }

            // Order matters: a blast this tick must see where enemies moved to
            // before the death and win checks run.
            move_player(world);
            collect_power_ups(world);
            update_bombs(world, now);
            update_enemies(world, now);

            if let Some(cause) = find_lethal_hit(world) {
                enter_game_over(world, cause, now);
            } else if world.mode == Some(GameMode::SinglePlayer) && world.enemies.is_empty() {
                log::info!("All enemies defeated");
                world.phase = GamePhase::Win;
                world.push_event(GameEvent::Won);
            }
        }

        GamePhase::GameOver => {
            let elapsed = world.game_over_at.map(|t| now - t).unwrap_or(f64::INFINITY);
            if elapsed >= GAME_OVER_DURATION_MS {
                log::info!("Game over timer complete, returning to menu");
                return_to_menu(world);
            }
        }

        GamePhase::Win => {
            if input.intents.contains(&Intent::ConfirmWinScreen) {
                return_to_menu(world);
            }
        }
    }
}

/// Milliseconds left on the game over screen, if it is showing
pub fn game_over_remaining_ms(world: &World, now: f64) -> Option<f64> {
    match (world.phase, world.game_over_at) {
        (GamePhase::GameOver, Some(t)) => Some((GAME_OVER_DURATION_MS - (now - t)).max(0.0)),
        _ => None,
    }
}

fn apply_play_intent(world: &mut World, intent: Intent, now: f64) {
    match intent {
        Intent::SetMoveDirection(dir, active) => world.player.moving.set(dir, active),
        Intent::PlaceBomb => {
            if let Err(reason) = place_bomb(world, now) {
                log::debug!("Cannot place bomb: {}", reason);
            }
        }
        _ => {}
    }
}

fn navigate_menu(world: &mut World, step: MenuStep) {
    world.menu_cursor = match step {
        MenuStep::Up => world.menu_cursor.saturating_sub(1),
        MenuStep::Down => (world.menu_cursor + 1).min(MENU_ITEMS.len() - 1),
    };
}

/// Start the highlighted mode if it is enabled
fn confirm_menu(world: &mut World) {
    let Some(item) = MENU_ITEMS.get(world.menu_cursor) else {
        return;
    };
    if !item.enabled {
        log::debug!("Menu item '{}' is disabled", item.label);
        return;
    }
    start_game(world, item.mode);
}

/// Reset the world and begin play in `mode`
pub fn start_game(world: &mut World, mode: GameMode) {
    world.mode = Some(mode);
    world.reset();
    world.phase = GamePhase::Playing;
    world.push_event(GameEvent::GameStarted { mode });
    log::info!("Started {:?} game with seed {}", mode, world.settings.seed);
}

fn enter_game_over(world: &mut World, cause: DeathCause, now: f64) {
    world.player.stats.health = 0;
    world.game_over_at = Some(now);
    world.phase = GamePhase::GameOver;
    world.push_event(GameEvent::PlayerDied { cause });
    log::info!("Player died: {:?}", cause);
}

fn return_to_menu(world: &mut World) {
    world.phase = GamePhase::Menu;
    world.game_over_at = None;
    world.push_event(GameEvent::ReturnedToMenu);
}
