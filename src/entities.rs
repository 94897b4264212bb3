/// Entity and event types for the arcade field. Data only.

// ── Field & tuning constants ──────────────────────────────────────────────────

/// Logical width of the play field.  The renderer scales this onto whatever
/// terminal grid is available.
pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 600.0;

pub const PLAYER_SIZE: f32 = 50.0;
pub const PLAYER_SPEED: f32 = 6.0;
pub const PLAYER_MAX_HEALTH: i32 = 100;
/// Gap between the player's starting position and the bottom edge.
pub const PLAYER_START_MARGIN: f32 = 20.0;

pub const BULLET_WIDTH: f32 = 4.0;
pub const BULLET_HEIGHT: f32 = 15.0;
pub const BULLET_SPEED: f32 = 10.0;
pub const BULLET_DAMAGE: i32 = 1;
/// Minimum milliseconds between two shots.
pub const FIRE_RATE_MS: u64 = 150;

/// Health lost when an enemy rams the player.
pub const COLLISION_DAMAGE: i32 = 20;
pub const POINTS_PER_LEVEL: u32 = 1000;

// ── Colours ───────────────────────────────────────────────────────────────────

/// A 24-bit colour, kept independent of the terminal backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const COLOR_PLAYER: Rgb = Rgb(0x10, 0xb9, 0x81);
pub const COLOR_BULLET: Rgb = Rgb(0xfb, 0xbf, 0x24);
pub const COLOR_ENGINE: Rgb = Rgb(0x60, 0xa5, 0xfa);

// ── Enumerations ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Scout,
    Interceptor,
    Bomber,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Menu,
    Playing,
    GameOver,
}

impl GameStatus {
    pub fn is_playing(self) -> bool {
        self == GameStatus::Playing
    }

    pub fn is_game_over(self) -> bool {
        self == GameStatus::GameOver
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommanderStatus {
    Idle,
    Thinking,
    Talking,
}

impl CommanderStatus {
    pub fn label(self) -> &'static str {
        match self {
            CommanderStatus::Idle => "IDLE",
            CommanderStatus::Thinking => "THINKING",
            CommanderStatus::Talking => "TALKING",
        }
    }
}

// ── Enemy lookup table ────────────────────────────────────────────────────────

/// Fixed per-kind attributes copied onto every spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySpec {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub health: i32,
    pub color: Rgb,
    pub score: u32,
}

impl EnemyKind {
    pub fn spec(self) -> EnemySpec {
        match self {
            EnemyKind::Scout => EnemySpec {
                width: 40.0,
                height: 40.0,
                speed: 3.0,
                health: 1,
                color: Rgb(0x22, 0xd3, 0xee),
                score: 20,
            },
            EnemyKind::Interceptor => EnemySpec {
                width: 50.0,
                height: 50.0,
                speed: 2.0,
                health: 3,
                color: Rgb(0x81, 0x8c, 0xf8),
                score: 50,
            },
            EnemyKind::Bomber => EnemySpec {
                width: 70.0,
                height: 60.0,
                speed: 1.0,
                health: 10,
                color: Rgb(0xf4, 0x72, 0xb6),
                score: 100,
            },
        }
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Base shape shared by every entity: top-left corner, size and speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Body {
    /// Strict axis-aligned bounding-box overlap.  Touching edges do not count.
    pub fn overlaps(&self, other: &Body) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub body: Body,
    pub damage: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub health: i32,
    pub max_health: i32,
    pub score: u32,
    pub bullets: Vec<Bullet>,
    /// Milliseconds timestamp of the last shot; `None` until the first one.
    pub last_shot: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    pub health: i32,
    pub color: Rgb,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Everything the simulation step owns.  Updated in place once per frame
/// and read by the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub status: GameStatus,
    /// Highest level reached this session; never decreases while playing.
    pub level: u32,
    pub width: f32,
    pub height: f32,
}

/// Events the simulation step reports to the session layer.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Collision { score: u32, health: i32 },
    LevelUp { level: u32, score: u32, health: i32 },
    Destroyed { score: u32 },
}

impl GameEvent {
    /// Human-readable description handed to the commander.
    pub fn description(&self) -> String {
        match self {
            GameEvent::Collision { .. } => "Collided with an enemy craft!".to_string(),
            GameEvent::LevelUp { level, .. } => {
                format!("Level {level} reached! Combat intensity is rising.")
            }
            GameEvent::Destroyed { .. } => "Aircraft destroyed. Mission failed.".to_string(),
        }
    }

    pub fn score(&self) -> u32 {
        match *self {
            GameEvent::Collision { score, .. }
            | GameEvent::LevelUp { score, .. }
            | GameEvent::Destroyed { score } => score,
        }
    }

    /// Health reported with the event; a destroyed craft always reports 0.
    pub fn health(&self) -> i32 {
        match *self {
            GameEvent::Collision { health, .. } | GameEvent::LevelUp { health, .. } => health,
            GameEvent::Destroyed { .. } => 0,
        }
    }
}
