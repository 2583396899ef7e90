//! Rendering layer.  All terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! session.  No game logic is performed; this module only translates state
//! into terminal commands, scaling world units to terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use rand::Rng;

use boat_fishing::compute::{self, BOAT_WIDTH, SHOP_WIDTH};
use boat_fishing::entities::{Fish, FishKind, GameStatus, Minigame, MinigamePhase};
use boat_fishing::minigame::{
    BAR_HEIGHT, COUNTDOWN_SECONDS, FRAME_BOTTOM, FRAME_TOP, MAX_SCORE, TARGET_HEIGHT,
};
use boat_fishing::session::Session;
use boat_fishing::store::{Store, UpgradeState, MAX_UPGRADE_LEVEL};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_MONEY: Color = Color::Yellow;
const C_HUD_FISH: Color = Color::Cyan;
const C_WATER: Color = Color::Blue;
const C_BOAT: Color = Color::White;
const C_LINE: Color = Color::Grey;
const C_FISH_REGULAR: Color = Color::DarkYellow;
const C_FISH_SPECIAL: Color = Color::Red;
const C_SHOP: Color = Color::Magenta;
const C_BAR: Color = Color::Green;
const C_PROGRESS: Color = Color::Blue;
const C_NOTICE: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

/// Maps world units onto the bordered play area.
struct Viewport {
    cols: u16,
    rows: u16,
    world_w: i32,
    world_h: i32,
}

impl Viewport {
    fn col(&self, x: i32) -> u16 {
        let inner = self.cols.saturating_sub(2) as i32;
        let c = 1 + x.clamp(0, self.world_w) * inner / self.world_w.max(1);
        (c as u16).min(self.cols.saturating_sub(2))
    }

    fn row(&self, y: i32) -> u16 {
        let inner = self.rows.saturating_sub(4) as i32;
        let r = 2 + y.clamp(0, self.world_h) * inner / self.world_h.max(1);
        (r as u16).min(self.rows.saturating_sub(3))
    }

    fn span(&self, w: i32) -> usize {
        let inner = self.cols.saturating_sub(2) as i32;
        (w * inner / self.world_w.max(1)).max(1) as usize
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write, R: Rng>(out: &mut W, session: &Session<R>) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let state = session.state();
    let view = Viewport {
        cols,
        rows,
        world_w: state.width,
        world_h: state.height,
    };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, &view, session.store())?;
    draw_water(out, &view, state.water_level)?;
    draw_shop(out, &view, state.water_level)?;

    for fish in state.fish.iter().filter(|f| compute::is_visible(f, state.height)) {
        draw_fish(out, &view, fish)?;
    }
    draw_boat(out, &view, session)?;

    match state.status {
        GameStatus::Running => {}
        GameStatus::MinigamePending { .. } => {
            if let Some(game) = session.minigame() {
                draw_minigame(out, &view, game)?;
            }
        }
        GameStatus::Shopping => draw_shop_menu(out, &view, session.store())?,
    }

    draw_footer(out, &view, state.status, session.notice())?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, store: &Store) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_MONEY))?;
    out.queue(Print(format!("Money:{:>7}", store.money)))?;

    out.queue(style::SetForegroundColor(C_HUD_FISH))?;
    out.queue(Print(format!(
        "   Fish:{:>4}   Caught:{:>5}",
        store.fish_on_hand, store.lifetime_catches
    )))?;

    let levels = format!("Hook Lv{}  Boat Lv{}", store.hook.level, store.boat.level);
    let rx = view.cols.saturating_sub(levels.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&levels))?;
    Ok(())
}

// ── World ─────────────────────────────────────────────────────────────────────

fn draw_water<W: Write>(out: &mut W, view: &Viewport, water_level: i32) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.row(water_level)))?;
    out.queue(style::SetForegroundColor(C_WATER))?;
    out.queue(Print("~".repeat(view.cols.saturating_sub(2) as usize)))?;
    Ok(())
}

fn draw_shop<W: Write>(out: &mut W, view: &Viewport, water_level: i32) -> std::io::Result<()> {
    let width = view.span(SHOP_WIDTH).max(6);
    out.queue(style::SetForegroundColor(C_SHOP))?;
    out.queue(cursor::MoveTo(1, view.row(water_level).saturating_sub(2)))?;
    out.queue(Print(format!("{:^width$}", "SHOP")))?;
    out.queue(cursor::MoveTo(1, view.row(water_level).saturating_sub(1)))?;
    out.queue(Print("▔".repeat(width)))?;
    Ok(())
}

fn draw_boat<W: Write, R: Rng>(
    out: &mut W,
    view: &Viewport,
    session: &Session<R>,
) -> std::io::Result<()> {
    let state = session.state();
    let boat = &state.boat;
    let hull = view.span(BOAT_WIDTH).max(3);
    let row = view.row(state.water_level).saturating_sub(1);

    out.queue(style::SetForegroundColor(C_BOAT))?;
    out.queue(cursor::MoveTo(view.col(boat.x), row))?;
    out.queue(Print(format!("\\{}/", "_".repeat(hull - 2))))?;

    if state.hook.dropped {
        let col = view.col(state.hook.x);
        let top = view.row(compute::hook_rest_y(boat));
        let bottom = view.row(state.hook.y);
        out.queue(style::SetForegroundColor(C_LINE))?;
        for r in top..bottom {
            out.queue(cursor::MoveTo(col, r))?;
            out.queue(Print("│"))?;
        }
        out.queue(cursor::MoveTo(col, bottom))?;
        out.queue(Print("J"))?;
    }
    Ok(())
}

fn draw_fish<W: Write>(out: &mut W, view: &Viewport, fish: &Fish) -> std::io::Result<()> {
    let (sprite, color) = match (fish.kind, fish.speed < 0) {
        (FishKind::Regular, false) => ("><>", C_FISH_REGULAR),
        (FishKind::Regular, true) => ("<><", C_FISH_REGULAR),
        (FishKind::Special, false) => ("><(((°>", C_FISH_SPECIAL),
        (FishKind::Special, true) => ("<°)))><", C_FISH_SPECIAL),
    };
    out.queue(cursor::MoveTo(view.col(fish.x), view.row(fish.y)))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(sprite))?;
    Ok(())
}

// ── Minigame overlay ──────────────────────────────────────────────────────────

/// Rows used for the minigame column.
const MINIGAME_ROWS: i32 = 15;

fn draw_minigame<W: Write>(out: &mut W, view: &Viewport, game: &Minigame) -> std::io::Result<()> {
    let left = (view.cols / 2).saturating_sub(14);
    let top = (view.rows / 2).saturating_sub(MINIGAME_ROWS as u16 / 2 + 2);
    let span = FRAME_BOTTOM - FRAME_TOP;
    let to_row = |y: i32| ((y - FRAME_TOP) * MINIGAME_ROWS / span) as u16;

    let title = if game.special { " SPECIAL FISH! " } else { "  FISH ON!  " };
    out.queue(cursor::MoveTo(left, top))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(format!("╔{:═^26}╗", title)))?;
    for r in 1..=MINIGAME_ROWS as u16 + 2 {
        out.queue(cursor::MoveTo(left, top + r))?;
        out.queue(Print(format!("║{:26}║", "")))?;
    }
    out.queue(cursor::MoveTo(left, top + MINIGAME_ROWS as u16 + 3))?;
    out.queue(Print(format!("╚{}╝", "═".repeat(26))))?;

    let column = left + 3;
    let bar_top = to_row(game.bar_y);
    let bar_bottom = to_row(game.bar_y + BAR_HEIGHT).max(bar_top + 1);
    out.queue(style::SetForegroundColor(C_BAR))?;
    for r in bar_top..bar_bottom {
        out.queue(cursor::MoveTo(column, top + 1 + r))?;
        out.queue(Print("██"))?;
    }

    let fish_row = to_row(game.target_y + TARGET_HEIGHT / 2);
    out.queue(cursor::MoveTo(column + 3, top + 1 + fish_row))?;
    let fish_color = if game.special { C_FISH_SPECIAL } else { C_FISH_REGULAR };
    out.queue(style::SetForegroundColor(fish_color))?;
    out.queue(Print("<°)"))?;

    let filled = (game.score * 12 / MAX_SCORE) as usize;
    out.queue(cursor::MoveTo(column + 8, top + 2))?;
    out.queue(style::SetForegroundColor(C_PROGRESS))?;
    out.queue(Print(format!("[{}{}]", "█".repeat(filled), "░".repeat(12 - filled))))?;

    out.queue(cursor::MoveTo(column + 8, top + 4))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(format!("Time: {:>2}/{}s", game.time_left, COUNTDOWN_SECONDS)))?;

    if game.phase == MinigamePhase::Waiting {
        out.queue(cursor::MoveTo(column + 8, top + 6))?;
        out.queue(style::SetForegroundColor(C_NOTICE))?;
        out.queue(Print("SPACE to start"))?;
    }
    Ok(())
}

// ── Shop overlay ──────────────────────────────────────────────────────────────

fn draw_shop_menu<W: Write>(out: &mut W, view: &Viewport, store: &Store) -> std::io::Result<()> {
    let upgrade_row = |key: char, name: &str, track: UpgradeState| -> String {
        let pips: String = (0..MAX_UPGRADE_LEVEL)
            .map(|i| if i < track.level { '■' } else { '□' })
            .collect();
        let cost = if track.level >= MAX_UPGRADE_LEVEL {
            "MAX".to_string()
        } else {
            track.cost.to_string()
        };
        format!("║ [{key}] {name:<5} {pips} {cost:>8}          ║")
    };

    let lines = [
        "╔══════════════ SHOP ══════════════╗".to_string(),
        format!("║ Money: {:<8} Fish on hand: {:<4}║", store.money, store.fish_on_hand),
        "║                                  ║".to_string(),
        "║ [S] Sell one fish (100)          ║".to_string(),
        upgrade_row('H', "Hook", store.hook),
        upgrade_row('B', "Boat", store.boat),
        "║ [R] Reset upgrades (full refund) ║".to_string(),
        "║ [X] Leave                        ║".to_string(),
        "╚══════════════════════════════════╝".to_string(),
    ];

    let cx = view.cols / 2;
    let start = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);
    out.queue(style::SetForegroundColor(C_SHOP))?;
    for (i, line) in lines.iter().enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start + i as u16))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

// ── Footer (last two rows) ────────────────────────────────────────────────────

fn draw_footer<W: Write>(
    out: &mut W,
    view: &Viewport,
    status: GameStatus,
    notice: Option<&str>,
) -> std::io::Result<()> {
    if let Some(msg) = notice {
        out.queue(cursor::MoveTo(2, view.rows.saturating_sub(2)))?;
        out.queue(style::SetForegroundColor(C_NOTICE))?;
        out.queue(Print(format!(" {msg} ")))?;
    }

    let hint = match status {
        GameStatus::Running => "← → / A D : Move   SPACE : Hook   ↑ / W : Shop   Q : Quit",
        GameStatus::MinigamePending { .. } => "SPACE : Reel   Q : Quit",
        GameStatus::Shopping => {
            "S : Sell   H / B : Upgrade   R : Reset   X / Esc : Leave   Q : Quit"
        }
    };
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}
