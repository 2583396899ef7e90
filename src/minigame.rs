//! Catch minigame: a timed skill check.
//!
//! ```text
//!  FRAME_TOP    ┬
//!               │  [fish]   ← target: drifts up/down, bounces, jitters
//!               │
//!               │  [ bar ]  ← player bar: falls under gravity, kicks up on impulse
//!  FRAME_BOTTOM ┴
//! ```
//!
//! Score rises by one every tick the bar overlaps the target and falls by one
//! otherwise.  Reaching `MAX_SCORE` lands the fish; running out of time loses it.
//! Like `compute`, every function returns a new value and takes its
//! randomness from the caller.

use rand::Rng;

use crate::entities::{Minigame, MinigameOutcome, MinigamePhase};

pub const FRAME_TOP: i32 = 50;
pub const FRAME_BOTTOM: i32 = 350;
pub const BAR_HEIGHT: i32 = 60;
pub const TARGET_HEIGHT: i32 = 40;
const BAR_START_Y: i32 = 120;
const GRAVITY: i32 = 1;
/// Velocity set by each impulse (negative = upward).
const IMPULSE: i32 = -10;
const TARGET_SPEED: i32 = 2;
const TARGET_JITTER_CHANCE: f64 = 0.05;
pub const MAX_SCORE: u32 = 100;
pub const COUNTDOWN_SECONDS: u32 = 10;

/// Catch-counter reward for landing a fish.
pub fn reward_for(special: bool) -> u32 {
    if special {
        2
    } else {
        1
    }
}

/// A fresh minigame, waiting for the first impulse.
pub fn new_minigame(special: bool, rng: &mut impl Rng) -> Minigame {
    Minigame {
        special,
        bar_y: BAR_START_Y,
        bar_velocity: 0,
        target_y: rng.gen_range(FRAME_TOP..FRAME_BOTTOM - TARGET_HEIGHT),
        target_speed: TARGET_SPEED,
        score: 0,
        time_left: COUNTDOWN_SECONDS,
        phase: MinigamePhase::Waiting,
    }
}

/// Bar and target share a column, so overlap is purely vertical.
pub fn bar_overlaps_target(game: &Minigame) -> bool {
    game.bar_y < game.target_y + TARGET_HEIGHT && game.target_y < game.bar_y + BAR_HEIGHT
}

pub fn outcome(game: &Minigame) -> Option<MinigameOutcome> {
    match game.phase {
        MinigamePhase::Finished(outcome) => Some(outcome),
        _ => None,
    }
}

/// Kick the bar upward.  The first impulse also starts the clock.
pub fn impulse(game: &Minigame) -> Minigame {
    match game.phase {
        MinigamePhase::Finished(_) => game.clone(),
        MinigamePhase::Waiting | MinigamePhase::Active => Minigame {
            bar_velocity: IMPULSE,
            phase: MinigamePhase::Active,
            ..game.clone()
        },
    }
}

/// One physics step.  No-op unless active.
pub fn tick(game: &Minigame, rng: &mut impl Rng) -> Minigame {
    if game.phase != MinigamePhase::Active {
        return game.clone();
    }

    // ── Target ───────────────────────────────────────────────────────────────
    let step = if game.special {
        game.target_speed * 2
    } else {
        game.target_speed
    };
    let target_max = FRAME_BOTTOM - TARGET_HEIGHT;
    let mut target_y = game.target_y + step;
    let mut target_speed = game.target_speed;
    if target_y <= FRAME_TOP {
        target_y = FRAME_TOP;
        target_speed = -target_speed;
    } else if target_y >= target_max {
        target_y = target_max;
        target_speed = -target_speed;
    }
    if rng.gen_bool(TARGET_JITTER_CHANCE) {
        target_speed = if rng.gen_bool(0.5) {
            TARGET_SPEED
        } else {
            -TARGET_SPEED
        };
    }

    // ── Bar ──────────────────────────────────────────────────────────────────
    let mut bar_velocity = game.bar_velocity + GRAVITY;
    let mut bar_y = game.bar_y + bar_velocity;
    let bar_max = FRAME_BOTTOM - BAR_HEIGHT;
    if bar_y > bar_max {
        bar_y = bar_max;
        bar_velocity = 0;
    } else if bar_y < FRAME_TOP {
        bar_y = FRAME_TOP;
        bar_velocity = 0;
    }

    let mut next = Minigame {
        bar_y,
        bar_velocity,
        target_y,
        target_speed,
        ..game.clone()
    };

    // ── Score ────────────────────────────────────────────────────────────────
    if bar_overlaps_target(&next) {
        next.score = (next.score + 1).min(MAX_SCORE);
        if next.score >= MAX_SCORE {
            next.phase = MinigamePhase::Finished(MinigameOutcome::Caught {
                reward: reward_for(next.special),
            });
        }
    } else {
        next.score = next.score.saturating_sub(1);
    }

    next
}

/// One second off the clock.  Hitting zero lets the fish escape.
pub fn countdown(game: &Minigame) -> Minigame {
    if game.phase != MinigamePhase::Active {
        return game.clone();
    }
    let time_left = game.time_left.saturating_sub(1);
    let phase = if time_left == 0 {
        MinigamePhase::Finished(MinigameOutcome::Escaped)
    } else {
        MinigamePhase::Active
    };
    Minigame {
        time_left,
        phase,
        ..game.clone()
    }
}
