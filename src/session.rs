//! Game session: the Running / MinigamePending / Shopping state machine.
//!
//! Owns the world, the store, the scheduler and the RNG.  The front end
//! forwards player commands and elapsed time; everything else happens here,
//! on one thread, in scheduler order.

use std::time::Duration;

use rand::Rng;
use tracing::info;

use crate::compute;
use crate::entities::{
    Direction, EntireGameStateInfo, GameStatus, Minigame, MinigameOutcome, MinigamePhase,
    TickInput, UpgradeTrack,
};
use crate::minigame;
use crate::scheduler::{Scheduler, Task};
use crate::store::{PurchaseOutcome, SellOutcome, Store, FISH_PRICE};

pub struct Session<R: Rng> {
    state: EntireGameStateInfo,
    minigame: Option<Minigame>,
    store: Store,
    scheduler: Scheduler,
    input: TickInput,
    notice: Option<String>,
    rng: R,
}

impl<R: Rng> Session<R> {
    /// Start a session on a fresh world; the main tick and respawn timers
    /// are running on return.
    pub fn new(width: i32, height: i32, store: Store, mut rng: R) -> Self {
        let state = compute::init_state(width, height, &mut rng);
        Self::with_state(state, store, rng)
    }

    /// Build a session around an existing world (tests, replays).
    pub fn with_state(state: EntireGameStateInfo, store: Store, rng: R) -> Self {
        let mut session = Session {
            state,
            minigame: None,
            store,
            scheduler: Scheduler::new(),
            input: TickInput::default(),
            notice: None,
            rng,
        };
        session.apply_upgrade_levels();
        session.scheduler.start(Task::MainTick);
        session.scheduler.start(Task::Respawn);
        session
    }

    pub fn state(&self) -> &EntireGameStateInfo {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn minigame(&self) -> Option<&Minigame> {
        self.minigame.as_ref()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Latest message for the player, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    // ── Player commands ───────────────────────────────────────────────────────

    /// Held direction; applied on every main tick until changed.
    pub fn set_thrust(&mut self, thrust: Option<Direction>) {
        self.input.thrust = thrust;
    }

    pub fn toggle_hook(&mut self) {
        if self.state.status == GameStatus::Running {
            self.state = compute::toggle_hook(&self.state);
        }
    }

    /// Ask to dock; honoured on the next main tick if the boat is over the shop.
    pub fn request_shop(&mut self) {
        if self.state.status == GameStatus::Running {
            self.input.enter_shop = true;
        }
    }

    /// Minigame control.  The first impulse starts its timers.
    pub fn impulse(&mut self) {
        let Some(game) = self.minigame.as_ref() else {
            return;
        };
        let started = game.phase == MinigamePhase::Waiting;
        self.minigame = Some(minigame::impulse(game));
        if started {
            self.scheduler.start(Task::MinigameTick);
            self.scheduler.start(Task::Countdown);
        }
    }

    pub fn sell_fish(&mut self) -> Option<SellOutcome> {
        if self.state.status != GameStatus::Shopping {
            return None;
        }
        let outcome = self.store.sell_fish();
        self.notice = Some(match outcome {
            SellOutcome::Sold { money, .. } => {
                format!("Sold a fish for {FISH_PRICE}. Balance: {money}")
            }
            SellOutcome::NothingToSell => "You have no fish to sell!".to_string(),
        });
        Some(outcome)
    }

    pub fn purchase_upgrade(&mut self, track: UpgradeTrack) -> Option<PurchaseOutcome> {
        if self.state.status != GameStatus::Shopping {
            return None;
        }
        let outcome = self.store.purchase_upgrade(track);
        let name = match track {
            UpgradeTrack::Hook => "Hook",
            UpgradeTrack::Boat => "Boat",
        };
        self.notice = Some(match outcome {
            PurchaseOutcome::Purchased { level, .. } => {
                self.apply_upgrade_levels();
                format!("{name} upgraded to level {level}")
            }
            PurchaseOutcome::MaxLevel => format!("{name} is already at max level!"),
            PurchaseOutcome::InsufficientFunds { cost } => {
                format!("Not enough money! Need {cost}")
            }
        });
        Some(outcome)
    }

    pub fn reset_upgrades(&mut self) -> Option<u64> {
        if self.state.status != GameStatus::Shopping {
            return None;
        }
        let refund = self.store.reset_upgrades();
        self.apply_upgrade_levels();
        self.notice = Some(format!("Upgrades reset, refunded {refund}"));
        Some(refund)
    }

    pub fn close_shop(&mut self) {
        if self.state.status != GameStatus::Shopping {
            return;
        }
        self.store.reload();
        self.apply_upgrade_levels();
        self.state = compute::move_boat_away_from_shop(&self.state);
        self.state.status = GameStatus::Running;
        self.scheduler.start(Task::MainTick);
    }

    // ── Time ──────────────────────────────────────────────────────────────────

    /// Let `dt` pass and run every task that comes due.
    pub fn advance(&mut self, dt: Duration) {
        for task in self.scheduler.advance(dt) {
            // An earlier firing in this batch may have stopped it.
            if !self.scheduler.is_running(task) {
                continue;
            }
            match task {
                Task::MainTick => self.on_main_tick(),
                Task::Respawn => {
                    self.state = compute::respawn_hidden(&self.state, &mut self.rng);
                }
                Task::MinigameTick => self.on_minigame_step(|g, rng| minigame::tick(g, rng)),
                Task::Countdown => self.on_minigame_step(|g, _| minigame::countdown(g)),
            }
        }
    }

    fn on_main_tick(&mut self) {
        self.state = compute::tick(&self.state, &self.input, &mut self.rng);
        self.input.enter_shop = false;

        match self.state.status {
            GameStatus::Running => {}
            GameStatus::MinigamePending { special } => {
                info!(special, frame = self.state.frame, "fish hooked");
                self.scheduler.stop(Task::MainTick);
                self.scheduler.stop(Task::Respawn);
                self.minigame = Some(minigame::new_minigame(special, &mut self.rng));
                self.notice = Some("Fish on! Tap SPACE to reel it in".to_string());
            }
            GameStatus::Shopping => {
                info!("shop opened");
                self.scheduler.stop(Task::MainTick);
                self.store.reload();
                self.apply_upgrade_levels();
                self.notice = None;
            }
        }
    }

    fn on_minigame_step(&mut self, step: impl FnOnce(&Minigame, &mut R) -> Minigame) {
        let Some(game) = self.minigame.as_ref() else {
            return;
        };
        let next = step(game, &mut self.rng);
        match minigame::outcome(&next) {
            Some(outcome) => self.resolve_minigame(outcome),
            None => self.minigame = Some(next),
        }
    }

    fn resolve_minigame(&mut self, outcome: MinigameOutcome) {
        self.scheduler.stop(Task::MinigameTick);
        self.scheduler.stop(Task::Countdown);
        self.minigame = None;

        self.notice = Some(match outcome {
            MinigameOutcome::Caught { reward } => {
                self.store.record_catch(reward);
                "You caught the fish!".to_string()
            }
            MinigameOutcome::Escaped => {
                info!("fish escaped");
                "Time's up! The fish got away.".to_string()
            }
        });

        self.state = compute::retract_hook(&self.state);
        self.store.reload();
        self.apply_upgrade_levels();
        self.state.status = GameStatus::Running;
        self.scheduler.start(Task::MainTick);
        self.scheduler.start(Task::Respawn);
    }

    fn apply_upgrade_levels(&mut self) {
        self.state =
            compute::with_upgrade_levels(&self.state, self.store.hook.level, self.store.boat.level);
    }
}
