//! World state and core simulation types
//!
//! Everything the simulation mutates lives in [`World`], which the host owns and
//! threads through every system by reference.

use std::collections::HashSet;

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use crate::consts::*;
use crate::settings::Settings;
use crate::{SPAWN_TILE, TileCoord, tile_center, tile_of};

/// Top-level game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title menu, waiting for a mode selection
    Menu,
    /// Active gameplay
    Playing,
    /// Player died; returns to the menu on a timer
    GameOver,
    /// All enemies cleared; returns to the menu on confirm
    Win,
}

/// Game modes offered by the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    SinglePlayer,
    /// Listed but never selectable
    Multiplayer,
}

/// A menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub mode: GameMode,
    pub label: &'static str,
    pub enabled: bool,
}

pub const MENU_ITEMS: [MenuItem; 2] = [
    MenuItem {
        mode: GameMode::SinglePlayer,
        label: "Single Player",
        enabled: true,
    },
    MenuItem {
        mode: GameMode::Multiplayer,
        label: "Multiplayer (Coming Soon)",
        enabled: false,
    },
];

/// Cardinal movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step in tile space (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// Held movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveFlags {
    pub fn set(&mut self, dir: Direction, active: bool) {
        match dir {
            Direction::Up => self.up = active,
            Direction::Down => self.down = active,
            Direction::Left => self.left = active,
            Direction::Right => self.right = active,
        }
    }

    /// Per-tick displacement. Opposing keys cancel; diagonals are not normalized.
    pub fn displacement(&self, speed: f32) -> Vec2 {
        let mut delta = Vec2::ZERO;
        if self.up {
            delta.y -= speed;
        }
        if self.down {
            delta.y += speed;
        }
        if self.left {
            delta.x -= speed;
        }
        if self.right {
            delta.x += speed;
        }
        delta
    }
}

/// Player stats, reset each run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub max_bombs: u32,
    pub active_bombs: u32,
    pub blast_radius: u32,
    /// Pixels per tick
    pub speed: f32,
    pub health: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            max_bombs: BASE_MAX_BOMBS,
            active_bombs: 0,
            blast_radius: BASE_BLAST_RADIUS,
            speed: BASE_PLAYER_SPEED,
            health: PLAYER_MAX_HEALTH,
        }
    }
}

impl PlayerStats {
    pub fn bombs_available(&self) -> u32 {
        self.max_bombs.saturating_sub(self.active_bombs)
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed / BASE_PLAYER_SPEED
    }
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: f32,
    pub moving: MoveFlags,
    /// Bomb tiles the player currently overlaps and may walk off of
    pub bomb_contacts: HashSet<TileCoord>,
    pub stats: PlayerStats,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: PLAYER_SIZE,
            moving: MoveFlags::default(),
            bomb_contacts: HashSet::new(),
            stats: PlayerStats::default(),
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn is_alive(&self) -> bool {
        self.stats.health > 0
    }
}

/// A wandering enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    /// Current heading, each component in -1..=1
    pub direction: IVec2,
    /// Timestamp (ms) of the last heading choice; `None` forces a new choice
    pub last_direction_change: Option<f64>,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            size: ENEMY_SIZE,
            direction: IVec2::ZERO,
            last_direction_change: None,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }
}

/// A planted bomb
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bomb {
    pub tile: TileCoord,
    /// Remaining fuse measured from `planted_at` (ms)
    pub fuse_ms: f64,
    pub planted_at: f64,
    /// Blast radius at the moment of planting
    pub radius: u32,
}

impl Bomb {
    pub fn new(tile: TileCoord, planted_at: f64, radius: u32) -> Self {
        Self {
            tile,
            fuse_ms: BOMB_FUSE_MS,
            planted_at,
            radius,
        }
    }

    #[inline]
    pub fn is_due(&self, now: f64) -> bool {
        now - self.planted_at >= self.fuse_ms
    }

    /// Make the bomb go off at the next check
    pub fn force_detonate(&mut self) {
        self.fuse_ms = 0.0;
        self.planted_at = 0.0;
    }
}

/// One lethal blast cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub tile: TileCoord,
    pub duration_ms: f64,
    pub created_at: f64,
}

impl Explosion {
    pub fn new(tile: TileCoord, created_at: f64) -> Self {
        Self {
            tile,
            duration_ms: EXPLOSION_DURATION_MS,
            created_at,
        }
    }

    #[inline]
    pub fn is_expired(&self, now: f64) -> bool {
        now - self.created_at >= self.duration_ms
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    BlastRadius,
    ExtraBomb,
}

impl PowerUpKind {
    /// Map a uniform roll in [0, 1) onto a kind (30% / 30% / 40%)
    pub fn from_roll(roll: f64) -> Self {
        if roll < 0.3 {
            PowerUpKind::Speed
        } else if roll < 0.6 {
            PowerUpKind::BlastRadius
        } else {
            PowerUpKind::ExtraBomb
        }
    }
}

/// A power-up waiting on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub tile: TileCoord,
    pub kind: PowerUpKind,
}

/// What killed the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Explosion(TileCoord),
    Enemy(u32),
}

/// Notable things that happened during a tick, for audio/render hooks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted { mode: GameMode },
    BombPlaced { tile: TileCoord },
    BombDetonated { tile: TileCoord, radius: u32 },
    BlockDestroyed { tile: TileCoord, special: bool },
    PowerUpSpawned { tile: TileCoord, kind: PowerUpKind },
    PowerUpCollected { tile: TileCoord, kind: PowerUpKind },
    EnemyKilled { id: u32, tile: TileCoord },
    PlayerDied { cause: DeathCause },
    Won,
    ReturnedToMenu,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    /// Seeded RNG shared by generation, spawning, drops and AI
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub mode: Option<GameMode>,
    /// Highlighted menu entry
    pub menu_cursor: usize,
    /// Timestamp (ms) of entering `GameOver`
    pub game_over_at: Option<f64>,
    pub grid: Grid,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bombs: Vec<Bomb>,
    pub explosions: Vec<Explosion>,
    pub power_ups: Vec<PowerUp>,
    /// Events raised during the latest tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    /// A world sitting on the menu with a freshly generated backdrop grid
    pub fn new(settings: Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let grid = Grid::generate(GRID_WIDTH, GRID_HEIGHT, &mut rng);
        let spawn = tile_center(SPAWN_TILE, TILE_SIZE, settings.origin);
        Self {
            settings,
            rng,
            phase: GamePhase::Menu,
            mode: None,
            menu_cursor: 0,
            game_over_at: None,
            grid,
            player: Player::new(spawn),
            enemies: Vec::new(),
            bombs: Vec::new(),
            explosions: Vec::new(),
            power_ups: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Start a fresh run: new grid, cleared hazards, reset stats, new enemies
    pub fn reset(&mut self) {
        self.game_over_at = None;
        self.grid = Grid::generate(GRID_WIDTH, GRID_HEIGHT, &mut self.rng);
        self.player = Player::new(self.spawn_point());
        self.bombs.clear();
        self.explosions.clear();
        self.power_ups.clear();
        self.enemies.clear();
        super::enemy::spawn_enemies(self);
        log::info!(
            "World reset: {} enemies, {} special blocks",
            self.enemies.len(),
            self.grid.count(super::grid::CellKind::SpecialBlock)
        );
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_point(&self) -> Vec2 {
        tile_center(SPAWN_TILE, TILE_SIZE, self.settings.origin)
    }

    /// Pixel position to tile using this world's layout
    #[inline]
    pub fn tile_at(&self, pos: Vec2) -> TileCoord {
        tile_of(pos, TILE_SIZE, self.settings.origin)
    }

    #[inline]
    pub fn tile_center(&self, tile: TileCoord) -> Vec2 {
        tile_center(tile, TILE_SIZE, self.settings.origin)
    }

    pub fn player_tile(&self) -> TileCoord {
        self.tile_at(self.player.pos)
    }

    pub fn bomb_at(&self, tile: TileCoord) -> bool {
        self.bombs.iter().any(|b| b.tile == tile)
    }

    pub fn explosion_at(&self, tile: TileCoord) -> bool {
        self.explosions.iter().any(|e| e.tile == tile)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events raised during the latest tick
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
