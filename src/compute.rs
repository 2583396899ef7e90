//! Pure main-loop logic: boat motion, hook, fish population and the
//! per-tick catch check.
//!
//! Every public function takes an immutable reference to the current value
//! (and, where needed, an RNG handle) and returns a brand-new value.  Side
//! effects are limited to the injected RNG.

use rand::Rng;

use crate::entities::{
    Boat, Direction, EntireGameStateInfo, Fish, FishKind, GameStatus, Hook, Rect, TickInput,
};

// ── Boat tuning ───────────────────────────────────────────────────────────────

pub const BOAT_WIDTH: i32 = 80;
pub const BOAT_HEIGHT: i32 = 30;
const BOAT_ACCELERATION: f32 = 1.2;
/// Base thrust multiplier before upgrades.
const BOAT_SPEED_MULTIPLIER: f32 = 0.75;
/// Extra thrust multiplier per boat upgrade level.
const BOAT_UPGRADE_STEP: f32 = 0.2;
pub const BOAT_MAX_SPEED: f32 = 12.0;
const BOAT_FRICTION: f32 = 0.85;
/// Below this speed the boat snaps to rest.
const BOAT_REST_THRESHOLD: f32 = 0.1;

// ── Hook tuning ───────────────────────────────────────────────────────────────

pub const HOOK_BASE_SPEED: i32 = 5;
/// The hook auto-retracts this far above the floor.
pub const HOOK_FLOOR_MARGIN: i32 = 20;
const HOOK_BOX_WIDTH: i32 = 4;
const HOOK_BOX_HEIGHT: i32 = 10;

// ── Fish tuning ───────────────────────────────────────────────────────────────

pub const REGULAR_FISH_COUNT: usize = 5;
pub const SPECIAL_FISH_COUNT: usize = 2;
/// Fish never spawn closer than this to the surface.
const FISH_MIN_DEPTH: i32 = 50;
const FISH_JITTER_CHANCE: f64 = 0.05;

// ── Shop ──────────────────────────────────────────────────────────────────────

pub const SHOP_WIDTH: i32 = 150;
pub const SHOP_HEIGHT: i32 = 100;

/// Box size (w, h) per fish kind.
pub fn fish_size(kind: FishKind) -> (i32, i32) {
    match kind {
        FishKind::Regular => (30, 20),
        FishKind::Special => (50, 40),
    }
}

/// Unsigned swim speed per fish kind.
pub fn fish_base_speed(kind: FishKind) -> i32 {
    match kind {
        FishKind::Regular => 2,
        FishKind::Special => 5,
    }
}

// ── Boxes ─────────────────────────────────────────────────────────────────────

pub fn boat_box(boat: &Boat) -> Rect {
    Rect::new(boat.x, boat.y, BOAT_WIDTH, BOAT_HEIGHT)
}

pub fn hook_box(hook: &Hook) -> Rect {
    Rect::new(hook.x - HOOK_BOX_WIDTH / 2, hook.y, HOOK_BOX_WIDTH, HOOK_BOX_HEIGHT)
}

pub fn fish_box(fish: &Fish) -> Rect {
    let (w, h) = fish_size(fish.kind);
    Rect::new(fish.x, fish.y, w, h)
}

/// The dock region at the left edge, sitting on the water line.
pub fn shop_area(state: &EntireGameStateInfo) -> Rect {
    Rect::new(0, state.water_level - SHOP_HEIGHT, SHOP_WIDTH, SHOP_HEIGHT)
}

/// Line attachment point: a quarter in from whichever side the boat faces.
pub fn hook_anchor_x(boat: &Boat) -> i32 {
    match boat.facing {
        Direction::Left => boat.x + BOAT_WIDTH / 4,
        Direction::Right => boat.x + BOAT_WIDTH * 3 / 4,
    }
}

/// Depth of a retracted hook: the boat's keel, i.e. the water line.
pub fn hook_rest_y(boat: &Boat) -> i32 {
    boat.y + BOAT_HEIGHT
}

/// Pixels per tick the hook sinks at the given upgrade level.
pub fn hook_speed(level: u32) -> i32 {
    HOOK_BASE_SPEED + level as i32
}

/// Thrust multiplier at the given boat upgrade level.
pub fn thrust_multiplier(level: u32) -> f32 {
    BOAT_SPEED_MULTIPLIER + level as f32 * BOAT_UPGRADE_STEP
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial world: boat centred on the water line, hook retracted,
/// full fish population.
pub fn init_state(width: i32, height: i32, rng: &mut impl Rng) -> EntireGameStateInfo {
    let water_level = height / 2;
    let boat = Boat {
        x: width / 2 - BOAT_WIDTH / 2,
        y: water_level - BOAT_HEIGHT,
        vx: 0.0,
        facing: Direction::Right,
        upgrade_level: 0,
    };
    let hook = Hook {
        x: hook_anchor_x(&boat),
        y: hook_rest_y(&boat),
        dropped: false,
        upgrade_level: 0,
    };
    EntireGameStateInfo {
        boat,
        hook,
        fish: spawn_population(width, height, water_level, rng),
        status: GameStatus::Running,
        frame: 0,
        width,
        height,
        water_level,
    }
}

/// A fresh fish of `kind` at a random spot below the surface.
pub fn spawn_fish(
    kind: FishKind,
    width: i32,
    height: i32,
    water_level: i32,
    rng: &mut impl Rng,
) -> Fish {
    let (w, h) = fish_size(kind);
    let min_y = water_level + FISH_MIN_DEPTH;
    let x = rng.gen_range(0..(width - w).max(1));
    let y = rng.gen_range(min_y..(height - h).max(min_y + 1));
    Fish {
        x,
        y,
        speed: random_speed(kind, rng),
        kind,
    }
}

pub fn spawn_population(
    width: i32,
    height: i32,
    water_level: i32,
    rng: &mut impl Rng,
) -> Vec<Fish> {
    let regular = (0..REGULAR_FISH_COUNT).map(|_| FishKind::Regular);
    let special = (0..SPECIAL_FISH_COUNT).map(|_| FishKind::Special);
    regular
        .chain(special)
        .map(|kind| spawn_fish(kind, width, height, water_level, rng))
        .collect()
}

fn random_speed(kind: FishKind, rng: &mut impl Rng) -> i32 {
    let base = fish_base_speed(kind);
    if rng.gen_bool(0.5) {
        base
    } else {
        -base
    }
}

// ── Boat motion (pure) ───────────────────────────────────────────────────────

/// Accelerate towards `direction`, capped at `BOAT_MAX_SPEED`.
pub fn apply_thrust(state: &EntireGameStateInfo, direction: Direction) -> EntireGameStateInfo {
    let boat = &state.boat;
    let push = BOAT_ACCELERATION * thrust_multiplier(boat.upgrade_level);
    let vx = match direction {
        Direction::Left => (boat.vx - push).max(-BOAT_MAX_SPEED),
        Direction::Right => (boat.vx + push).min(BOAT_MAX_SPEED),
    };
    EntireGameStateInfo {
        boat: Boat {
            vx,
            facing: direction,
            ..boat.clone()
        },
        ..state.clone()
    }
}

/// Move by the current velocity, clamp to the screen, then apply friction.
pub fn integrate(state: &EntireGameStateInfo) -> EntireGameStateInfo {
    let boat = &state.boat;
    let max_x = (state.width - BOAT_WIDTH).max(0);
    let x = (boat.x + boat.vx as i32).clamp(0, max_x);

    let mut vx = boat.vx * BOAT_FRICTION;
    if vx.abs() < BOAT_REST_THRESHOLD {
        vx = 0.0;
    }

    let boat = Boat {
        x,
        vx,
        ..boat.clone()
    };
    let hook = Hook {
        x: hook_anchor_x(&boat),
        ..state.hook.clone()
    };
    EntireGameStateInfo {
        boat,
        hook,
        ..state.clone()
    }
}

/// Start the hook's descent.  No-op while already dropped.
pub fn drop_hook(state: &EntireGameStateInfo) -> EntireGameStateInfo {
    if state.hook.dropped {
        return state.clone();
    }
    EntireGameStateInfo {
        hook: Hook {
            x: hook_anchor_x(&state.boat),
            dropped: true,
            ..state.hook.clone()
        },
        ..state.clone()
    }
}

/// Reel the hook back to the boat.
pub fn retract_hook(state: &EntireGameStateInfo) -> EntireGameStateInfo {
    EntireGameStateInfo {
        hook: Hook {
            x: hook_anchor_x(&state.boat),
            y: hook_rest_y(&state.boat),
            dropped: false,
            ..state.hook.clone()
        },
        ..state.clone()
    }
}

pub fn toggle_hook(state: &EntireGameStateInfo) -> EntireGameStateInfo {
    if state.hook.dropped {
        retract_hook(state)
    } else {
        drop_hook(state)
    }
}

/// Sink a dropped hook; it reels in on its own once it nears `floor_y`.
pub fn advance_hook(state: &EntireGameStateInfo, floor_y: i32) -> EntireGameStateInfo {
    if !state.hook.dropped {
        return state.clone();
    }
    let y = state.hook.y + hook_speed(state.hook.upgrade_level);
    if y > floor_y - HOOK_FLOOR_MARGIN {
        return retract_hook(state);
    }
    EntireGameStateInfo {
        hook: Hook {
            y,
            ..state.hook.clone()
        },
        ..state.clone()
    }
}

/// Push purchased upgrade levels into the boat and hook.
pub fn with_upgrade_levels(
    state: &EntireGameStateInfo,
    hook_level: u32,
    boat_level: u32,
) -> EntireGameStateInfo {
    EntireGameStateInfo {
        boat: Boat {
            upgrade_level: boat_level,
            ..state.boat.clone()
        },
        hook: Hook {
            upgrade_level: hook_level,
            ..state.hook.clone()
        },
        ..state.clone()
    }
}

/// Park the boat just right of the dock so leaving the shop doesn't
/// immediately re-open it.
pub fn move_boat_away_from_shop(state: &EntireGameStateInfo) -> EntireGameStateInfo {
    let boat = Boat {
        x: SHOP_WIDTH + 5,
        vx: 0.0,
        ..state.boat.clone()
    };
    let hook = Hook {
        x: hook_anchor_x(&boat),
        ..state.hook.clone()
    };
    EntireGameStateInfo {
        boat,
        hook,
        ..state.clone()
    }
}

// ── Fish population (pure) ───────────────────────────────────────────────────

/// Captured fish sit above the screen until the next respawn.
pub fn is_visible(fish: &Fish, height: i32) -> bool {
    fish.y >= 0 && fish.y <= height
}

pub fn hide_fish(fish: &Fish) -> Fish {
    let (_, h) = fish_size(fish.kind);
    Fish {
        y: -h,
        ..fish.clone()
    }
}

/// Swim one step, bounce off the side walls, occasionally pick a new heading.
pub fn move_fish(fish: &Fish, width: i32, rng: &mut impl Rng) -> Fish {
    let (w, _) = fish_size(fish.kind);
    let max_x = width - w;
    let mut x = fish.x + fish.speed;
    let mut speed = fish.speed;

    if x <= 0 {
        x = 0;
        speed = -speed;
    } else if x >= max_x {
        x = max_x;
        speed = -speed;
    }

    if rng.gen_bool(FISH_JITTER_CHANCE) {
        speed = random_speed(fish.kind, rng);
    }

    Fish {
        x,
        speed,
        ..fish.clone()
    }
}

/// Replace every hidden fish with a freshly randomised one of the same kind.
pub fn respawn_hidden(state: &EntireGameStateInfo, rng: &mut impl Rng) -> EntireGameStateInfo {
    let fish = state
        .fish
        .iter()
        .map(|f| {
            if is_visible(f, state.height) {
                f.clone()
            } else {
                spawn_fish(f.kind, state.width, state.height, state.water_level, rng)
            }
        })
        .collect();
    EntireGameStateInfo {
        fish,
        ..state.clone()
    }
}

/// Index of the first visible fish the hook touches.  Regular fish are
/// checked before special ones, so a regular fish wins a tie.
pub fn hooked_fish(state: &EntireGameStateInfo) -> Option<usize> {
    let hook = hook_box(&state.hook);
    [FishKind::Regular, FishKind::Special]
        .iter()
        .find_map(|kind| {
            state.fish.iter().position(|f| {
                f.kind == *kind && is_visible(f, state.height) && hook.intersects(&fish_box(f))
            })
        })
}

// ── Per-frame tick (nearly pure, RNG is injected) ───────────────────────────

/// Advance the main loop by one frame.  Does nothing unless `Running`.
pub fn tick(
    state: &EntireGameStateInfo,
    input: &TickInput,
    rng: &mut impl Rng,
) -> EntireGameStateInfo {
    if state.status != GameStatus::Running {
        return state.clone();
    }

    // ── 1. Boat & hook ───────────────────────────────────────────────────────
    let mut next = match input.thrust {
        Some(direction) => apply_thrust(state, direction),
        None => state.clone(),
    };
    next = integrate(&next);
    next = advance_hook(&next, next.height);
    next.frame = state.frame + 1;

    // ── 2. Catch check: the first hit freezes the tick ──────────────────────
    if let Some(i) = hooked_fish(&next) {
        let special = next.fish[i].kind == FishKind::Special;
        next.fish[i] = hide_fish(&next.fish[i]);
        next.status = GameStatus::MinigamePending { special };
        return next;
    }

    // ── 3. Fish swim ─────────────────────────────────────────────────────────
    let width = next.width;
    let height = next.height;
    next.fish = next
        .fish
        .iter()
        .map(|f| {
            if is_visible(f, height) {
                move_fish(f, width, rng)
            } else {
                f.clone()
            }
        })
        .collect();

    // ── 4. Dock ──────────────────────────────────────────────────────────────
    if input.enter_shop && shop_area(&next).intersects(&boat_box(&next.boat)) {
        next.status = GameStatus::Shopping;
    }

    next
}
