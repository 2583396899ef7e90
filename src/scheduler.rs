//! Single-threaded scheduler of named, fixed-interval tasks.
//!
//! The front end feeds wall-clock time in through `advance`; tests feed
//! synthetic durations.  A stopped task accumulates nothing, and starting a
//! task resets its phase so it first fires one full interval later.
//! After a long stall (a suspended laptop, a debugger) each task replays at
//! most `MAX_FIRINGS_PER_ADVANCE` firings and the rest of the backlog is
//! dropped.

use std::time::Duration;

/// Upper bound on how often one task fires in a single `advance`.
pub const MAX_FIRINGS_PER_ADVANCE: usize = 100;

/// Discriminants double as slot indices and follow `Task::ALL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum Task {
    MainTick = 0,
    Respawn = 1,
    MinigameTick = 2,
    Countdown = 3,
}

impl Task {
    /// Fixed firing order for tasks that come due together.
    pub const ALL: [Task; 4] = [
        Task::MainTick,
        Task::Respawn,
        Task::MinigameTick,
        Task::Countdown,
    ];

    pub fn interval(self) -> Duration {
        match self {
            Task::MainTick => Duration::from_millis(30),
            Task::Respawn => Duration::from_millis(3000),
            Task::MinigameTick => Duration::from_millis(30),
            Task::Countdown => Duration::from_millis(1000),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    running: bool,
    elapsed: Duration,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    slots: [Slot; 4],
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, task: Task) {
        self.slots[task.index()] = Slot {
            running: true,
            elapsed: Duration::ZERO,
        };
    }

    pub fn stop(&mut self, task: Task) {
        self.slots[task.index()] = Slot::default();
    }

    pub fn is_running(&self, task: Task) -> bool {
        self.slots[task.index()].running
    }

    /// Let `dt` pass on every running task and return one entry per firing,
    /// grouped in `Task::ALL` order.  A long `dt` fires a task several times,
    /// up to `MAX_FIRINGS_PER_ADVANCE`.
    pub fn advance(&mut self, dt: Duration) -> Vec<Task> {
        let mut fired = Vec::new();
        for task in Task::ALL {
            let slot = &mut self.slots[task.index()];
            if !slot.running {
                continue;
            }
            slot.elapsed = slot.elapsed.saturating_add(dt);
            let interval = task.interval().as_nanos();
            let due = slot.elapsed.as_nanos() / interval;
            slot.elapsed = Duration::from_nanos((slot.elapsed.as_nanos() % interval) as u64);
            let count = due.min(MAX_FIRINGS_PER_ADVANCE as u128) as usize;
            fired.extend(std::iter::repeat(task).take(count));
        }
        fired
    }
}
