//! All game entity types. Pure data, no logic.

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned box in world units.  `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// Strict overlap: boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

// ── Enums ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FishKind {
    Regular,
    /// Rarer, faster, worth two catches.
    Special,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    /// Main loop frozen; a minigame resolves the hooked fish.
    MinigamePending { special: bool },
    /// Main loop frozen while the shop overlay is open.
    Shopping,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeTrack {
    Hook,
    Boat,
}

// ── Boat & hook ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Boat {
    pub x: i32,
    /// Fixed at the water line minus the hull height.
    pub y: i32,
    pub vx: f32,
    pub facing: Direction,
    /// Thrust upgrade, 0..=MAX_UPGRADE_LEVEL.
    pub upgrade_level: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hook {
    pub x: i32,
    pub y: i32,
    pub dropped: bool,
    /// Descent-speed upgrade, 0..=MAX_UPGRADE_LEVEL.
    pub upgrade_level: u32,
}

// ── Fish ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Fish {
    pub x: i32,
    /// Negative while captured and waiting for respawn.
    pub y: i32,
    /// Signed horizontal speed (negative = leftward).
    pub speed: i32,
    pub kind: FishKind,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The main-loop world.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct EntireGameStateInfo {
    pub boat: Boat,
    pub hook: Hook,
    /// Regular fish first, then special fish.
    pub fish: Vec<Fish>,
    pub status: GameStatus,
    pub frame: u64,
    pub width: i32,
    pub height: i32,
    pub water_level: i32,
}

/// Per-tick player intent, sampled by the front end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    pub thrust: Option<Direction>,
    /// Shop entry requested this tick (only honoured over the shop region).
    pub enter_shop: bool,
}

// ── Minigame ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinigameOutcome {
    Caught { reward: u32 },
    Escaped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinigamePhase {
    /// Waiting for the first impulse; nothing moves yet.
    Waiting,
    Active,
    Finished(MinigameOutcome),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Minigame {
    pub special: bool,
    pub bar_y: i32,
    pub bar_velocity: i32,
    pub target_y: i32,
    /// Base target speed; doubled on the fly for special fish.
    pub target_speed: i32,
    /// Catch progress, 0..=100.
    pub score: u32,
    /// Seconds left on the countdown.
    pub time_left: u32,
    pub phase: MinigamePhase,
}
