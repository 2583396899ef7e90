use boat_fishing::compute::*;
use boat_fishing::entities::*;

use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 800×600 world, water at 300, boat centred and at rest, no fish.
fn make_state() -> EntireGameStateInfo {
    EntireGameStateInfo {
        boat: Boat {
            x: 360,
            y: 270,
            vx: 0.0,
            facing: Direction::Right,
            upgrade_level: 0,
        },
        hook: Hook {
            x: 420,
            y: 300,
            dropped: false,
            upgrade_level: 0,
        },
        fish: Vec::new(),
        status: GameStatus::Running,
        frame: 0,
        width: 800,
        height: 600,
        water_level: 300,
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Every probability roll fails, so fish never change heading on their own.
fn no_jitter() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

/// Every probability roll succeeds and every coin flip lands "positive".
fn always_jitter() -> StepRng {
    StepRng::new(0, 0)
}

fn idle() -> TickInput {
    TickInput::default()
}

fn thrust(direction: Direction) -> TickInput {
    TickInput {
        thrust: Some(direction),
        enter_shop: false,
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_boat_centred_on_water_line() {
    let s = init_state(800, 600, &mut seeded_rng());
    assert_eq!(s.water_level, 300);
    assert_eq!(s.boat.x, 360); // width/2 - BOAT_WIDTH/2
    assert_eq!(s.boat.y, 270); // water - BOAT_HEIGHT
    assert_eq!(s.boat.vx, 0.0);
    assert_eq!(s.status, GameStatus::Running);
    assert_eq!(s.frame, 0);
}

#[test]
fn init_state_hook_retracted_at_rest_depth() {
    let s = init_state(800, 600, &mut seeded_rng());
    assert!(!s.hook.dropped);
    assert_eq!(s.hook.y, 300);
    assert_eq!(s.hook.x, s.boat.x + 60); // facing right → 75 %
}

#[test]
fn init_state_spawns_full_population() {
    let s = init_state(800, 600, &mut seeded_rng());
    assert_eq!(s.fish.len(), REGULAR_FISH_COUNT + SPECIAL_FISH_COUNT);
    assert!(s.fish.iter().all(|f| is_visible(f, s.height)));
}

// ── apply_thrust ──────────────────────────────────────────────────────────────

#[test]
fn thrust_right_from_rest() {
    let s2 = apply_thrust(&make_state(), Direction::Right);
    assert!(approx(s2.boat.vx, 0.9)); // 1.2 × 0.75
    assert_eq!(s2.boat.facing, Direction::Right);
}

#[test]
fn thrust_left_sets_facing() {
    let s2 = apply_thrust(&make_state(), Direction::Left);
    assert!(approx(s2.boat.vx, -0.9));
    assert_eq!(s2.boat.facing, Direction::Left);
}

#[test]
fn thrust_scales_with_boat_upgrade() {
    let mut s = make_state();
    s.boat.upgrade_level = 5;
    let s2 = apply_thrust(&s, Direction::Right);
    assert!(approx(s2.boat.vx, 2.1)); // 1.2 × (0.75 + 5 × 0.2)
}

#[test]
fn thrust_clamps_to_max_speed() {
    let mut s = make_state();
    s.boat.vx = 11.5;
    assert_eq!(apply_thrust(&s, Direction::Right).boat.vx, BOAT_MAX_SPEED);
    s.boat.vx = -11.5;
    assert_eq!(apply_thrust(&s, Direction::Left).boat.vx, -BOAT_MAX_SPEED);
}

#[test]
fn thrust_does_not_move_boat() {
    let s2 = apply_thrust(&make_state(), Direction::Right);
    assert_eq!(s2.boat.x, 360);
}

// ── integrate ─────────────────────────────────────────────────────────────────

#[test]
fn integrate_moves_and_applies_friction() {
    let mut s = make_state();
    s.boat.vx = 5.0;
    let s2 = integrate(&s);
    assert_eq!(s2.boat.x, 365);
    assert!(approx(s2.boat.vx, 4.25));
    assert_eq!(s2.hook.x, 425); // hook follows the boat
}

#[test]
fn integrate_truncates_fractional_velocity() {
    let mut s = make_state();
    s.boat.vx = 0.9;
    let s2 = integrate(&s);
    assert_eq!(s2.boat.x, 360);
    assert!(s2.boat.vx > 0.0);
}

#[test]
fn integrate_snaps_slow_boat_to_rest() {
    let mut s = make_state();
    s.boat.vx = 0.11; // × 0.85 = 0.0935 < 0.1
    assert_eq!(integrate(&s).boat.vx, 0.0);
}

#[test]
fn integrate_clamps_right_edge() {
    let mut s = make_state();
    s.boat.x = 715;
    s.boat.vx = 12.0;
    assert_eq!(integrate(&s).boat.x, 720); // width - BOAT_WIDTH
}

#[test]
fn integrate_clamps_left_edge() {
    let mut s = make_state();
    s.boat.x = 3;
    s.boat.vx = -12.0;
    assert_eq!(integrate(&s).boat.x, 0);
}

#[test]
fn hook_anchor_follows_facing() {
    let mut s = make_state();
    s.boat.facing = Direction::Left;
    let s2 = integrate(&s);
    assert_eq!(s2.hook.x, s2.boat.x + 20); // 25 %
}

#[test]
fn boat_stays_on_screen_for_any_thrust_sequence() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    for _ in 0..5_000 {
        let input = match rng.gen_range(0..3) {
            0 => thrust(Direction::Left),
            1 => thrust(Direction::Right),
            _ => idle(),
        };
        s = tick(&s, &input, &mut rng);
        assert!(s.boat.x >= 0 && s.boat.x <= s.width - BOAT_WIDTH);
        assert!(s.boat.vx.abs() <= BOAT_MAX_SPEED);
    }
}

#[test]
fn move_does_not_mutate_original() {
    let s = make_state();
    let _ = integrate(&apply_thrust(&s, Direction::Left));
    assert_eq!(s.boat.x, 360);
    assert_eq!(s.boat.vx, 0.0);
}

// ── hook ──────────────────────────────────────────────────────────────────────

#[test]
fn drop_hook_sets_flag_and_anchor() {
    let s2 = drop_hook(&make_state());
    assert!(s2.hook.dropped);
    assert_eq!(s2.hook.x, 420);
    assert_eq!(s2.hook.y, 300);
}

#[test]
fn drop_hook_twice_is_noop() {
    let mut s = drop_hook(&make_state());
    s.hook.y = 400;
    let s2 = drop_hook(&s);
    assert_eq!(s2.hook.y, 400);
}

#[test]
fn advance_hook_sinks_by_base_speed() {
    let s = drop_hook(&make_state());
    assert_eq!(advance_hook(&s, 600).hook.y, 305);
}

#[test]
fn advance_hook_sinks_faster_with_upgrade() {
    let mut s = drop_hook(&make_state());
    s.hook.upgrade_level = 3;
    assert_eq!(advance_hook(&s, 600).hook.y, 308);
}

#[test]
fn advance_hook_ignores_retracted_hook() {
    let s = make_state();
    assert_eq!(advance_hook(&s, 600).hook.y, 300);
}

#[test]
fn advance_hook_retracts_near_floor() {
    let mut s = drop_hook(&make_state());
    s.hook.y = 576; // → 581 > 600 - 20
    let s2 = advance_hook(&s, 600);
    assert!(!s2.hook.dropped);
    assert_eq!(s2.hook.y, 300);
}

#[test]
fn advance_hook_keeps_going_at_margin() {
    let mut s = drop_hook(&make_state());
    s.hook.y = 575; // → 580, not past the margin
    let s2 = advance_hook(&s, 600);
    assert!(s2.hook.dropped);
    assert_eq!(s2.hook.y, 580);
}

#[test]
fn hook_depth_monotonic_until_retraction() {
    let mut s = drop_hook(&make_state());
    let mut last = s.hook.y;
    let mut steps = 0;
    while s.hook.dropped {
        s = advance_hook(&s, 600);
        if s.hook.dropped {
            assert!(s.hook.y >= last);
            last = s.hook.y;
        }
        steps += 1;
        assert!(steps < 1_000);
    }
    assert_eq!(s.hook.y, hook_rest_y(&s.boat));
}

#[test]
fn retract_hook_resets_depth() {
    let mut s = drop_hook(&make_state());
    s.hook.y = 450;
    let s2 = retract_hook(&s);
    assert!(!s2.hook.dropped);
    assert_eq!(s2.hook.y, 300);
}

#[test]
fn toggle_hook_alternates() {
    let s = toggle_hook(&make_state());
    assert!(s.hook.dropped);
    let s = toggle_hook(&s);
    assert!(!s.hook.dropped);
}

#[test]
fn upgrade_levels_reach_boat_and_hook() {
    let s2 = with_upgrade_levels(&make_state(), 4, 2);
    assert_eq!(s2.hook.upgrade_level, 4);
    assert_eq!(s2.boat.upgrade_level, 2);
}

#[test]
fn leaving_shop_parks_boat_right_of_dock() {
    let mut s = make_state();
    s.boat.x = 40;
    s.boat.vx = 3.0;
    let s2 = move_boat_away_from_shop(&s);
    assert_eq!(s2.boat.x, SHOP_WIDTH + 5);
    assert_eq!(s2.boat.vx, 0.0);
    assert!(!shop_area(&s2).intersects(&boat_box(&s2.boat)));
}

// ── fish ──────────────────────────────────────────────────────────────────────

fn regular(x: i32, y: i32, speed: i32) -> Fish {
    Fish { x, y, speed, kind: FishKind::Regular }
}

fn special(x: i32, y: i32, speed: i32) -> Fish {
    Fish { x, y, speed, kind: FishKind::Special }
}

#[test]
fn fish_swims_by_speed() {
    let f = move_fish(&regular(100, 400, 2), 800, &mut no_jitter());
    assert_eq!(f.x, 102);
    assert_eq!(f.speed, 2);
}

#[test]
fn fish_bounces_off_right_wall() {
    let f = move_fish(&regular(769, 400, 2), 800, &mut no_jitter());
    assert_eq!(f.x, 770); // width - 30
    assert_eq!(f.speed, -2);
}

#[test]
fn fish_bounces_off_left_wall() {
    let f = move_fish(&regular(1, 400, -2), 800, &mut no_jitter());
    assert_eq!(f.x, 0);
    assert_eq!(f.speed, 2);
}

#[test]
fn special_fish_uses_its_own_box() {
    let f = move_fish(&special(748, 400, 5), 800, &mut no_jitter());
    assert_eq!(f.x, 750); // width - 50
    assert_eq!(f.speed, -5);
}

#[test]
fn fish_jitter_picks_base_speed() {
    let f = move_fish(&regular(100, 400, -2), 800, &mut always_jitter());
    assert_eq!(f.x, 98);
    assert_eq!(f.speed, 2);

    let f = move_fish(&special(100, 400, -5), 800, &mut always_jitter());
    assert_eq!(f.speed, 5);
}

#[test]
fn hidden_fish_sits_above_screen() {
    let f = hide_fish(&regular(100, 400, 2));
    assert_eq!(f.y, -20);
    assert!(!is_visible(&f, 600));

    let f = hide_fish(&special(100, 400, 5));
    assert_eq!(f.y, -40);
}

#[test]
fn spawned_fish_stay_below_surface() {
    let mut rng = seeded_rng();
    for _ in 0..200 {
        let f = spawn_fish(FishKind::Regular, 800, 600, 300, &mut rng);
        assert!(f.x >= 0 && f.x < 770);
        assert!(f.y >= 350 && f.y < 580);
        assert_eq!(f.speed.abs(), 2);

        let f = spawn_fish(FishKind::Special, 800, 600, 300, &mut rng);
        assert!(f.x >= 0 && f.x < 750);
        assert!(f.y >= 350 && f.y < 560);
        assert_eq!(f.speed.abs(), 5);
    }
}

#[test]
fn population_lists_regular_before_special() {
    let fish = spawn_population(800, 600, 300, &mut seeded_rng());
    let kinds: Vec<_> = fish.iter().map(|f| f.kind).collect();
    assert_eq!(&kinds[..5], &[FishKind::Regular; 5]);
    assert_eq!(&kinds[5..], &[FishKind::Special; 2]);
}

#[test]
fn respawn_replaces_only_hidden_fish() {
    let mut s = make_state();
    s.fish = vec![regular(100, 400, 2), hide_fish(&special(200, 450, 5))];
    let s2 = respawn_hidden(&s, &mut seeded_rng());
    assert_eq!(s2.fish[0], s.fish[0]);
    assert_eq!(s2.fish[1].kind, FishKind::Special);
    assert!(s2.fish[1].y >= 350);
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_increments_frame() {
    let mut s = make_state();
    s.frame = 5;
    assert_eq!(tick(&s, &idle(), &mut no_jitter()).frame, 6);
}

#[test]
fn tick_frozen_outside_running() {
    let mut s = make_state();
    s.status = GameStatus::MinigamePending { special: false };
    s.boat.vx = 5.0;
    s.fish = vec![regular(100, 400, 2)];
    let s2 = tick(&s, &thrust(Direction::Right), &mut no_jitter());
    assert_eq!(s2.frame, 0);
    assert_eq!(s2.boat.x, 360);
    assert_eq!(s2.fish[0].x, 100);
}

#[test]
fn tick_applies_thrust_then_integrates() {
    let mut s = make_state();
    s.boat.vx = 4.0;
    let s2 = tick(&s, &thrust(Direction::Right), &mut no_jitter());
    // 4.0 + 0.9 = 4.9 → x + 4, then friction
    assert_eq!(s2.boat.x, 364);
    assert!(approx(s2.boat.vx, 4.9 * 0.85));
}

#[test]
fn tick_moves_visible_fish() {
    let mut s = make_state();
    s.fish = vec![regular(100, 400, 2), hide_fish(&regular(300, 400, 2))];
    let s2 = tick(&s, &idle(), &mut no_jitter());
    assert_eq!(s2.fish[0].x, 102);
    assert_eq!(s2.fish[1].x, 300); // hidden fish stay put
}

#[test]
fn tick_hook_catches_regular_fish() {
    let mut s = drop_hook(&make_state());
    // hook box after sinking: (418, 305, 4, 10)
    s.fish = vec![regular(405, 300, 2), regular(100, 500, 2)];
    let s2 = tick(&s, &idle(), &mut no_jitter());
    assert_eq!(s2.status, GameStatus::MinigamePending { special: false });
    assert_eq!(s2.fish[0].y, -20);
    assert_eq!(s2.fish[1].x, 100); // catch freezes the rest of the tick
}

#[test]
fn tick_hook_catches_special_fish() {
    let mut s = drop_hook(&make_state());
    s.fish = vec![special(400, 290, 5)];
    let s2 = tick(&s, &idle(), &mut no_jitter());
    assert_eq!(s2.status, GameStatus::MinigamePending { special: true });
    assert_eq!(s2.fish[0].y, -40);
}

#[test]
fn tick_regular_fish_wins_tie() {
    let mut s = drop_hook(&make_state());
    // Special listed first to show order in the list doesn't matter.
    s.fish = vec![special(400, 290, 5), regular(405, 300, 2)];
    let s2 = tick(&s, &idle(), &mut no_jitter());
    assert_eq!(s2.status, GameStatus::MinigamePending { special: false });
    assert_eq!(s2.fish[1].y, -20);
    assert_eq!(s2.fish[0].y, 290);
}

#[test]
fn tick_resting_hook_misses_fish_below_surface() {
    // The resting hook hangs at the water line; fish never spawn that high.
    let mut s = make_state();
    s.fish = vec![regular(100, 350, 2)];
    let s2 = tick(&s, &idle(), &mut no_jitter());
    assert_eq!(s2.status, GameStatus::Running);
}

#[test]
fn tick_retracts_hook_at_floor() {
    let mut s = drop_hook(&make_state());
    s.hook.y = 576;
    let s2 = tick(&s, &idle(), &mut no_jitter());
    assert!(!s2.hook.dropped);
    assert_eq!(s2.hook.y, 300);
}

#[test]
fn tick_enters_shop_over_dock() {
    let mut s = make_state();
    s.boat.x = 100;
    let input = TickInput {
        thrust: None,
        enter_shop: true,
    };
    assert_eq!(tick(&s, &input, &mut no_jitter()).status, GameStatus::Shopping);
}

#[test]
fn tick_ignores_shop_request_away_from_dock() {
    let mut s = make_state();
    s.boat.x = 200;
    let input = TickInput {
        thrust: None,
        enter_shop: true,
    };
    assert_eq!(tick(&s, &input, &mut no_jitter()).status, GameStatus::Running);
}

#[test]
fn tick_does_not_shop_without_request() {
    let mut s = make_state();
    s.boat.x = 100;
    assert_eq!(tick(&s, &idle(), &mut no_jitter()).status, GameStatus::Running);
}

#[test]
fn sail_right_drop_hook_and_catch() {
    let mut rng = no_jitter();
    let mut s = make_state();

    for _ in 0..10 {
        s = tick(&s, &thrust(Direction::Right), &mut rng);
    }
    assert!(s.boat.x > 360);

    for _ in 0..100 {
        if s.boat.vx == 0.0 {
            break;
        }
        s = tick(&s, &idle(), &mut rng);
    }
    assert_eq!(s.boat.vx, 0.0);

    s = drop_hook(&s);
    let next_y = s.hook.y + hook_speed(0);
    s.fish = vec![regular(s.hook.x - 15, next_y - 5, 2)];
    s = tick(&s, &idle(), &mut rng);

    assert_eq!(s.status, GameStatus::MinigamePending { special: false });
    assert_eq!(s.fish[0].y, -20);

    // Frozen from here on.
    let frozen = tick(&s, &thrust(Direction::Left), &mut rng);
    assert_eq!(frozen.frame, s.frame);
    assert_eq!(frozen.boat.x, s.boat.x);
}
