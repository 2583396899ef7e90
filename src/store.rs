//! Economy and upgrade store, backed by one plaintext integer per file.
//!
//! Every mutation is written through immediately.  Reads never fail: a
//! missing or malformed file falls back to the documented default.  A failed
//! write is logged and the in-memory value is kept, so the file simply lags.
//! Counters saturate at their type's maximum instead of wrapping.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::entities::UpgradeTrack;

pub const MONEY_FILE: &str = "money.txt";
pub const FISH_CAUGHT_FILE: &str = "fish_caught.txt";
pub const FISH_LIFETIME_FILE: &str = "fish_lifetime.txt";
pub const HOOK_LEVEL_FILE: &str = "hook_upgrade.txt";
pub const BOAT_LEVEL_FILE: &str = "boat_upgrade.txt";
pub const HOOK_COST_FILE: &str = "hook_upgrade_cost.txt";
pub const BOAT_COST_FILE: &str = "boat_upgrade_cost.txt";

pub const FISH_PRICE: u64 = 100;
pub const BASE_UPGRADE_COST: u64 = 200;
pub const MAX_UPGRADE_LEVEL: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeState {
    pub level: u32,
    /// Price of the next level.
    pub cost: u64,
}

impl Default for UpgradeState {
    fn default() -> Self {
        UpgradeState {
            level: 0,
            cost: BASE_UPGRADE_COST,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SellOutcome {
    Sold { money: u64, fish_on_hand: u32 },
    NothingToSell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Purchased { level: u32, next_cost: u64 },
    MaxLevel,
    InsufficientFunds { cost: u64 },
}

/// Total spent to reach `level` from zero: 200 + 400 + … (one term per level).
pub fn refund_for(level: u32) -> u64 {
    (0..level).map(|k| BASE_UPGRADE_COST << k).sum()
}

#[derive(Clone, Debug)]
pub struct Store {
    dir: PathBuf,
    pub money: u64,
    /// Fish waiting to be sold.
    pub fish_on_hand: u32,
    /// Every fish ever landed; never decremented.
    pub lifetime_catches: u32,
    pub hook: UpgradeState,
    pub boat: UpgradeState,
}

impl Store {
    /// Load every counter from `dir`.
    pub fn load(dir: impl Into<PathBuf>) -> Self {
        let mut store = Store {
            dir: dir.into(),
            money: 0,
            fish_on_hand: 0,
            lifetime_catches: 0,
            hook: UpgradeState::default(),
            boat: UpgradeState::default(),
        };
        store.reload();
        store
    }

    /// Re-read every counter from disk, discarding in-memory values.
    pub fn reload(&mut self) {
        self.money = read_counter(&self.path(MONEY_FILE), 0);
        self.fish_on_hand = read_counter(&self.path(FISH_CAUGHT_FILE), 0);
        self.lifetime_catches = read_counter(&self.path(FISH_LIFETIME_FILE), 0);
        self.hook = UpgradeState {
            level: read_counter::<u32>(&self.path(HOOK_LEVEL_FILE), 0).min(MAX_UPGRADE_LEVEL),
            cost: read_counter(&self.path(HOOK_COST_FILE), BASE_UPGRADE_COST),
        };
        self.boat = UpgradeState {
            level: read_counter::<u32>(&self.path(BOAT_LEVEL_FILE), 0).min(MAX_UPGRADE_LEVEL),
            cost: read_counter(&self.path(BOAT_COST_FILE), BASE_UPGRADE_COST),
        };
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn track(&self, track: UpgradeTrack) -> UpgradeState {
        match track {
            UpgradeTrack::Hook => self.hook,
            UpgradeTrack::Boat => self.boat,
        }
    }

    /// Credit a landed fish to both the inventory and the lifetime tally.
    pub fn record_catch(&mut self, reward: u32) {
        self.fish_on_hand = self.fish_on_hand.saturating_add(reward);
        self.lifetime_catches = self.lifetime_catches.saturating_add(reward);
        info!(reward, on_hand = self.fish_on_hand, "fish landed");
        self.persist(self.save_fish());
        self.persist(write_counter(&self.path(FISH_LIFETIME_FILE), self.lifetime_catches));
    }

    pub fn sell_fish(&mut self) -> SellOutcome {
        if self.fish_on_hand == 0 {
            return SellOutcome::NothingToSell;
        }
        self.fish_on_hand -= 1;
        self.money = self.money.saturating_add(FISH_PRICE);
        self.persist(self.save_fish());
        self.persist(self.save_money());
        SellOutcome::Sold {
            money: self.money,
            fish_on_hand: self.fish_on_hand,
        }
    }

    pub fn purchase_upgrade(&mut self, track: UpgradeTrack) -> PurchaseOutcome {
        let current = self.track(track);
        if current.level >= MAX_UPGRADE_LEVEL {
            return PurchaseOutcome::MaxLevel;
        }
        if self.money < current.cost {
            return PurchaseOutcome::InsufficientFunds { cost: current.cost };
        }

        self.money -= current.cost;
        let next = UpgradeState {
            level: current.level + 1,
            cost: current.cost.saturating_mul(2),
        };
        match track {
            UpgradeTrack::Hook => self.hook = next,
            UpgradeTrack::Boat => self.boat = next,
        }
        info!(?track, level = next.level, money = self.money, "upgrade purchased");

        self.persist(self.save_track(track));
        self.persist(self.save_money());
        PurchaseOutcome::Purchased {
            level: next.level,
            next_cost: next.cost,
        }
    }

    /// Refund everything spent on both tracks and start them over.
    /// Returns the amount refunded.
    pub fn reset_upgrades(&mut self) -> u64 {
        let refund = refund_for(self.hook.level).saturating_add(refund_for(self.boat.level));
        self.money = self.money.saturating_add(refund);
        self.hook = UpgradeState::default();
        self.boat = UpgradeState::default();
        info!(refund, money = self.money, "upgrades reset");

        self.persist(self.save_track(UpgradeTrack::Hook));
        self.persist(self.save_track(UpgradeTrack::Boat));
        self.persist(self.save_money());
        refund
    }

    /// Write every counter, e.g. to seed a fresh data directory.
    pub fn save_all(&self) -> io::Result<()> {
        self.save_money()?;
        self.save_fish()?;
        write_counter(&self.path(FISH_LIFETIME_FILE), self.lifetime_catches)?;
        self.save_track(UpgradeTrack::Hook)?;
        self.save_track(UpgradeTrack::Boat)
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    fn persist(&self, result: io::Result<()>) {
        if let Err(err) = result {
            warn!(dir = %self.dir.display(), %err, "failed to save counter");
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn save_money(&self) -> io::Result<()> {
        write_counter(&self.path(MONEY_FILE), self.money)
    }

    fn save_fish(&self) -> io::Result<()> {
        write_counter(&self.path(FISH_CAUGHT_FILE), self.fish_on_hand)
    }

    fn save_track(&self, track: UpgradeTrack) -> io::Result<()> {
        let (level_file, cost_file) = match track {
            UpgradeTrack::Hook => (HOOK_LEVEL_FILE, HOOK_COST_FILE),
            UpgradeTrack::Boat => (BOAT_LEVEL_FILE, BOAT_COST_FILE),
        };
        let state = self.track(track);
        write_counter(&self.path(level_file), state.level)?;
        write_counter(&self.path(cost_file), state.cost)
    }
}

fn read_counter<T: std::str::FromStr>(path: &Path, default: T) -> T {
    match std::fs::read_to_string(path) {
        Ok(text) => text.trim().parse().unwrap_or_else(|_| {
            debug!(path = %path.display(), "malformed counter, using default");
            default
        }),
        Err(err) => {
            debug!(path = %path.display(), %err, "counter unreadable, using default");
            default
        }
    }
}

fn write_counter(path: &Path, value: impl std::fmt::Display) -> io::Result<()> {
    std::fs::write(path, format!("{value}\n"))
}
