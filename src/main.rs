//! Dyna - headless driver
//!
//! Runs the simulation without a renderer: starts a single-player run, feeds it
//! random key presses at 60 Hz, and logs what happens until the run ends.
//!
//! Usage: `dyna [settings.json]`

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use dyna::Settings;
use dyna::sim::{Direction, GameEvent, GamePhase, Intent, Snapshot, TickInput, World, tick};

/// Display refresh interval (ms)
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after ten simulated minutes
const MAX_FRAMES: u64 = 60 * 60 * 10;

fn load_settings() -> Settings {
    match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Failed to load settings from {}: {} - using defaults", path, e);
                Settings::default()
            }
        },
        None => {
            log::info!("Using default settings");
            Settings::default()
        }
    }
}

/// Random key presses: hold a direction for a while, drop bombs now and then
fn autopilot_input(rng: &mut Pcg32, held: &mut Option<Direction>) -> TickInput {
    let mut intents = Vec::new();
    if rng.random_bool(0.05) {
        if let Some(dir) = held.take() {
            intents.push(Intent::SetMoveDirection(dir, false));
        }
        let dir = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
        intents.push(Intent::SetMoveDirection(dir, true));
        *held = Some(dir);
    }
    if rng.random_bool(0.01) {
        intents.push(Intent::PlaceBomb);
    }
    TickInput { intents }
}

fn main() {
    env_logger::init();
    log::info!("Dyna (headless) starting...");

    let settings = load_settings();
    let mut autopilot = Pcg32::seed_from_u64(settings.seed ^ 0xA070_917);
    let mut world = World::new(settings);
    log::info!("Game initialized with seed: {}", world.settings.seed);

    let mut now = 0.0;
    tick(&mut world, &TickInput::new([Intent::MenuConfirm]), now);

    let mut held = None;
    let mut frame = 0u64;
    while frame < MAX_FRAMES {
        frame += 1;
        now += FRAME_MS;

        let input = match world.phase {
            GamePhase::Playing => autopilot_input(&mut autopilot, &mut held),
            GamePhase::Win => TickInput::new([Intent::ConfirmWinScreen]),
            _ => TickInput::default(),
        };
        tick(&mut world, &input, now);

        for event in world.drain_events() {
            match event {
                GameEvent::BombPlaced { .. } | GameEvent::PowerUpSpawned { .. } => {
                    log::debug!("[{:>6}] {:?}", frame, event)
                }
                _ => log::info!("[{:>6}] {:?}", frame, event),
            }
        }

        if world.phase == GamePhase::Menu {
            break;
        }
    }

    let snapshot = Snapshot::capture(&world, now);
    match serde_json::to_string(&snapshot.player) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize final state: {}", e),
    }
    log::info!(
        "Finished after {} frames ({:.1}s): {} enemies left",
        frame,
        now / 1000.0,
        world.enemies.len()
    );
}
