use std::time::Duration;

use boat_fishing::scheduler::*;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn new_scheduler_runs_nothing() {
    let mut s = Scheduler::new();
    assert!(Task::ALL.iter().all(|t| !s.is_running(*t)));
    assert!(s.advance(ms(10_000)).is_empty());
}

#[test]
fn intervals() {
    assert_eq!(Task::MainTick.interval(), ms(30));
    assert_eq!(Task::Respawn.interval(), ms(3000));
    assert_eq!(Task::MinigameTick.interval(), ms(30));
    assert_eq!(Task::Countdown.interval(), ms(1000));
}

#[test]
fn task_fires_after_full_interval() {
    let mut s = Scheduler::new();
    s.start(Task::MainTick);
    assert!(s.advance(ms(29)).is_empty());
    assert_eq!(s.advance(ms(1)), vec![Task::MainTick]);
    assert!(s.advance(ms(29)).is_empty());
}

#[test]
fn long_step_fires_repeatedly() {
    let mut s = Scheduler::new();
    s.start(Task::MainTick);
    assert_eq!(s.advance(ms(95)), vec![Task::MainTick; 3]);
    // 5 ms carried over
    assert_eq!(s.advance(ms(25)), vec![Task::MainTick]);
}

#[test]
fn stopped_task_never_fires() {
    let mut s = Scheduler::new();
    s.start(Task::Respawn);
    s.stop(Task::Respawn);
    assert!(!s.is_running(Task::Respawn));
    assert!(s.advance(ms(10_000)).is_empty());
}

#[test]
fn restart_resets_phase() {
    let mut s = Scheduler::new();
    s.start(Task::Countdown);
    s.advance(ms(900));
    s.stop(Task::Countdown);
    s.start(Task::Countdown);
    assert!(s.advance(ms(900)).is_empty());
    assert_eq!(s.advance(ms(100)), vec![Task::Countdown]);
}

#[test]
fn due_tasks_fire_in_fixed_order() {
    let mut s = Scheduler::new();
    s.start(Task::Countdown);
    s.start(Task::MinigameTick);
    s.start(Task::Respawn);
    s.start(Task::MainTick);
    let fired = s.advance(ms(3000));

    assert_eq!(fired.iter().filter(|t| **t == Task::MainTick).count(), 100);
    assert_eq!(fired.iter().filter(|t| **t == Task::Respawn).count(), 1);
    assert_eq!(fired.iter().filter(|t| **t == Task::MinigameTick).count(), 100);
    assert_eq!(fired.iter().filter(|t| **t == Task::Countdown).count(), 3);

    let rank = |t: &Task| Task::ALL.iter().position(|a| a == t);
    assert!(fired.windows(2).all(|w| rank(&w[0]) <= rank(&w[1])));
}

#[test]
fn tasks_run_independently() {
    let mut s = Scheduler::new();
    s.start(Task::MainTick);
    s.advance(ms(20));
    s.start(Task::MinigameTick);
    assert_eq!(s.advance(ms(10)), vec![Task::MainTick]);
    assert_eq!(s.advance(ms(20)), vec![Task::MinigameTick]);
}

#[test]
fn stall_replays_bounded_backlog() {
    let mut s = Scheduler::new();
    s.start(Task::MainTick);
    s.start(Task::Countdown);
    let fired = s.advance(Duration::from_secs(3600));
    assert_eq!(
        fired.iter().filter(|t| **t == Task::MainTick).count(),
        MAX_FIRINGS_PER_ADVANCE
    );
    assert_eq!(
        fired.iter().filter(|t| **t == Task::Countdown).count(),
        MAX_FIRINGS_PER_ADVANCE
    );

    // The dropped backlog doesn't come back on the next frame.
    assert_eq!(s.advance(ms(30)), vec![Task::MainTick]);
}

#[test]
fn slots_follow_fixed_order() {
    let mut s = Scheduler::new();
    for (i, task) in Task::ALL.into_iter().enumerate() {
        assert_eq!(task as usize, i);
        s.start(task);
        assert!(s.is_running(task));
        s.stop(task);
        assert!(Task::ALL.iter().all(|t| !s.is_running(*t)));
    }
}
