use ball_game::compute::*;
use ball_game::consts::*;
use ball_game::entities::*;
use ball_game::surface::Rect;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Flies in a row along the top of the sky, far from the launch point.
fn make_state() -> GameState {
    let flies = (0..6)
        .map(|i| Fly::new(40.0 + i as f32 * 90.0, 40.0, FLY_COLORS[0]))
        .collect();
    GameState {
        ball: Ball::at_launch_point(),
        flies,
        ground: GroundLine::default(),
        score: 0,
        velocity: Velocity::default(),
        released: false,
        press: None,
        status: GameStatus::Playing,
        frame: 0,
        score_label: Label::score(0),
        status_label: Label::status(false),
        physics: Physics::default(),
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn launched(xv: f32, yv: f32) -> GameState {
    GameState {
        velocity: Velocity { xv, yv },
        released: true,
        ..make_state()
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_sets_up_session() {
    let s = init_state(&mut seeded_rng());
    assert_eq!(s.flies.len(), FLY_COUNT);
    assert!(s.flies.iter().all(|f| f.visible()));
    assert_eq!(s.ball.location(), LAUNCH_POINT);
    assert_eq!(s.score, 0);
    assert_eq!(s.status, GameStatus::Playing);
    assert!(!s.released);
    assert_eq!(s.score_label.text, "Score: 0");
    assert_eq!(s.status_label.text, "moving");
}

#[test]
fn init_state_flies_spawn_in_range() {
    let s = init_state(&mut seeded_rng());
    for fly in &s.flies {
        let (x, y) = fly.location();
        assert!((40.0..=560.0).contains(&x), "x={}", x);
        assert!((40.0..=360.0).contains(&y), "y={}", y);
        assert_eq!(x.fract(), 0.0);
        assert_eq!(y.fract(), 0.0);
        assert!(FLY_COLORS.contains(&fly.color));
    }
}

#[test]
fn init_state_is_reproducible_with_same_seed() {
    let a = init_state(&mut StdRng::seed_from_u64(7));
    let b = init_state(&mut StdRng::seed_from_u64(7));
    assert_eq!(a.flies, b.flies);
}

// ── place_fly ─────────────────────────────────────────────────────────────────

#[test]
fn candidate_within_band_is_redrawn() {
    let existing = vec![Fly::new(100.0, 100.0, FLY_COLORS[0])];
    let mut rng = seeded_rng();
    let mut replay = rng.clone();

    let placed = place_fly(&existing, (140.0, 100.0), &mut rng);

    // x is on the band's edge and y matches exactly: both are redrawn once
    let expected_x = replay.gen_range(40..=560) as f32;
    let expected_y = replay.gen_range(40..=360) as f32;
    assert_eq!(placed, (expected_x, expected_y));
}

#[test]
fn candidate_outside_band_is_kept() {
    let existing = vec![Fly::new(100.0, 100.0, FLY_COLORS[0])];
    let mut rng = seeded_rng();
    let mut untouched = rng.clone();

    let placed = place_fly(&existing, (141.0, 300.0), &mut rng);

    assert_eq!(placed, (141.0, 300.0));
    // No randomness consumed
    assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
}

#[test]
fn y_is_checked_against_fly_y_not_x() {
    // y=300 is near the fly's x (300) but far from its y (100)
    let existing = vec![Fly::new(300.0, 100.0, FLY_COLORS[0])];
    let placed = place_fly(&existing, (500.0, 300.0), &mut seeded_rng());
    assert_eq!(placed, (500.0, 300.0));
}

#[test]
fn first_fly_is_never_redrawn() {
    let placed = place_fly(&[], (100.0, 100.0), &mut seeded_rng());
    assert_eq!(placed, (100.0, 100.0));
}

// ── intersects ────────────────────────────────────────────────────────────────

#[test]
fn intersects_overlapping_boxes() {
    let a = Rect::new(0.0, 0.0, 20.0, 20.0);
    let b = Rect::new(10.0, 10.0, 40.0, 40.0);
    assert!(intersects(&a, &b));
    assert!(intersects(&b, &a));
}

#[test]
fn intersects_touching_edges_do_not_count() {
    let a = Rect::new(0.0, 0.0, 20.0, 20.0);
    let b = Rect::new(20.0, 0.0, 20.0, 20.0);
    assert!(!intersects(&a, &b));
}

#[test]
fn intersects_separated_on_one_axis() {
    let a = Rect::new(0.0, 0.0, 20.0, 20.0);
    let b = Rect::new(5.0, 100.0, 20.0, 20.0);
    assert!(!intersects(&a, &b));
}

// ── Launch ────────────────────────────────────────────────────────────────────

#[test]
fn launch_velocity_is_drag_displacement() {
    let v = launch_velocity((100.0, 400.0), (50.0, 450.0));
    assert_eq!(v, Velocity { xv: 50.0, yv: 50.0 });
}

#[test]
fn drag_and_release_launches_ball() {
    let s = make_state();
    let s = pointer_down(&s, 100.0, 400.0);
    assert_eq!(s.press, Some((100.0, 400.0)));
    assert!(!s.released);

    let s = pointer_up(&s, 50.0, 450.0);
    assert!(s.released);
    assert_eq!(s.press, None);
    assert_eq!(s.velocity, Velocity { xv: 50.0, yv: 50.0 });
}

#[test]
fn first_step_after_launch() {
    let s = pointer_up(&pointer_down(&make_state(), 100.0, 400.0), 50.0, 450.0);
    let s = step_ball(&s);
    let (x, y) = s.ball.location();
    assert!(approx(x, 30.0), "x={}", x);
    assert!(approx(y, 395.0), "y={}", y);
    // Airborne: gravity applied
    assert!(approx(s.velocity.yv, 50.0 - 6.67 * 0.1));
    assert_eq!(s.velocity.xv, 50.0);
}

#[test]
fn release_without_press_is_ignored() {
    let s = make_state();
    let s2 = pointer_up(&s, 50.0, 450.0);
    assert!(!s2.released);
    assert_eq!(s2.velocity, Velocity::default());
}

#[test]
fn pointer_ignored_while_in_flight() {
    let s = launched(30.0, 30.0);
    let s2 = pointer_down(&s, 10.0, 10.0);
    assert_eq!(s2.press, None);
    let s3 = pointer_up(&GameState { press: Some((0.0, 0.0)), ..s }, 90.0, 90.0);
    assert_eq!(s3.velocity, Velocity { xv: 30.0, yv: 30.0 });
}

// ── step_ball ─────────────────────────────────────────────────────────────────

#[test]
fn step_ball_noop_at_rest() {
    let s = make_state();
    let s2 = step_ball(&s);
    assert_eq!(s2.ball.location(), LAUNCH_POINT);
    assert!(!s2.released);
}

#[test]
fn bounce_reflects_and_damps() {
    // Falling fast just above the ground
    let mut s = launched(40.0, -30.0);
    s.ball.set_location((200.0, 399.0));
    let s2 = step_ball(&s);
    assert_eq!(s2.ball.location(), (204.0, BALL_REST_Y));
    assert!(approx(s2.velocity.yv, 21.0));
    assert!(approx(s2.velocity.xv, 20.0));
    assert!(s2.released);
}

#[test]
fn leftward_throw_stops_after_one_step() {
    let s = launched(-40.0, 30.0);
    let s2 = step_ball(&s);
    assert!(!s2.released);
    assert_eq!(s2.velocity, Velocity::default());
    assert_eq!(s2.ball.location(), (21.0, BALL_REST_Y));
}

#[test]
fn flat_throw_stops_immediately() {
    let s = launched(40.0, 0.0);
    let s2 = step_ball(&s);
    assert!(!s2.released);
    assert_eq!(s2.ball.location(), (29.0, BALL_REST_Y));
}

#[test]
fn flight_always_comes_to_rest_on_ground() {
    let mut s = launched(50.0, 50.0);
    let mut steps = 0;
    while s.released {
        s = step_ball(&s);
        steps += 1;
        assert!(steps < 10_000, "ball never settled");
        assert!(s.ball.location().1 <= BALL_REST_Y);
    }
    assert_eq!(s.ball.location().1, BALL_REST_Y);
    assert!(s.ball.location().0 > LAUNCH_POINT.0);
}

#[test]
fn trajectory_is_reproducible() {
    let run = || {
        let mut rng = seeded_rng();
        let mut s = pointer_up(&pointer_down(&init_state(&mut rng), 100.0, 400.0), 50.0, 450.0);
        while s.released && s.status == GameStatus::Playing {
            s = tick(&s, &mut rng);
        }
        (s.ball.location(), s.score, s.frame)
    };
    assert_eq!(run(), run());
}

// ── Keys ──────────────────────────────────────────────────────────────────────

#[test]
fn reset_returns_ball_and_keeps_score() {
    let mut s = launched(50.0, 50.0);
    s.ball.set_location((300.0, 200.0));
    s.score = 2;
    s.flies[0].set_visible(false);
    s.flies[1].set_visible(false);

    let s2 = reset_ball(&s);
    assert_eq!(s2.ball.location(), LAUNCH_POINT);
    assert_eq!(s2.velocity, Velocity::default());
    assert!(!s2.released);
    assert_eq!(s2.score, 2);
    assert_eq!(s2.flies, s.flies);
}

#[test]
fn toggle_pause_flips_status_and_label() {
    let s = make_state();
    let paused = toggle_pause(&s);
    assert_eq!(paused.status, GameStatus::Paused);
    assert_eq!(paused.status_label.text, "idle");
    assert_eq!(paused.status_label.location(), (565.0, 0.0));

    let resumed = toggle_pause(&paused);
    assert_eq!(resumed.status, GameStatus::Playing);
    assert_eq!(resumed.status_label.text, "moving");
    assert_eq!(resumed.status_label.location(), (530.0, 0.0));
}

#[test]
fn toggle_pause_ignored_when_won() {
    let s = GameState { status: GameStatus::Won, ..make_state() };
    assert_eq!(toggle_pause(&s).status, GameStatus::Won);
}

#[test]
fn restart_key_only_acts_when_won() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.score = 3;
    let s2 = handle_event(&s, &GameEvent::Key(Key::Restart), &mut rng);
    assert_eq!(s2.score, 3);
    assert_eq!(s2.flies, s.flies);
}

#[test]
fn quit_event_leaves_state_untouched() {
    let s = make_state();
    let s2 = handle_event(&s, &GameEvent::Quit, &mut seeded_rng());
    assert_eq!(s2.status, s.status);
    assert_eq!(s2.ball, s.ball);
}

#[test]
fn handle_event_routes_pointer_and_keys() {
    let mut rng = seeded_rng();
    let s = make_state();
    let s = handle_event(&s, &GameEvent::PointerDown { x: 100.0, y: 400.0 }, &mut rng);
    let s = handle_event(&s, &GameEvent::PointerUp { x: 50.0, y: 450.0 }, &mut rng);
    assert!(s.released);
    let s = handle_event(&s, &GameEvent::Key(Key::TogglePause), &mut rng);
    assert_eq!(s.status, GameStatus::Paused);
    let s = handle_event(&s, &GameEvent::Key(Key::Reset), &mut rng);
    assert!(!s.released);
    assert_eq!(s.status, GameStatus::Paused);
}

// ── move_fly ──────────────────────────────────────────────────────────────────

#[test]
fn move_fly_travels_fixed_distance() {
    let fly = Fly::new(200.0, 200.0, FLY_COLORS[0]);
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let moved = move_fly(&fly, &mut rng);
        let (x, y) = moved.location();
        let dist = ((x - 200.0).powi(2) + (y - 200.0).powi(2)).sqrt();
        assert!(approx(dist, FLY_SPEED), "dist={}", dist);
    }
}

#[test]
fn move_fly_is_clamped_to_sky() {
    let mut rng = seeded_rng();
    let mut fly = Fly::new(0.0, 0.0, FLY_COLORS[0]);
    for _ in 0..500 {
        fly = move_fly(&fly, &mut rng);
        let (x, y) = fly.location();
        assert!((0.0..=SCREEN_WIDTH - FLY_SIZE).contains(&x));
        assert!((0.0..=GROUND_Y - FLY_SIZE).contains(&y));
    }
}

#[test]
fn hidden_flies_do_not_move() {
    let mut s = make_state();
    s.flies[2].set_visible(false);
    let s2 = move_flies(&s, &mut seeded_rng());
    assert_eq!(s2.flies[2].location(), s.flies[2].location());
    assert_ne!(s2.flies[0].location(), s.flies[0].location());
}

// ── detect_hits ───────────────────────────────────────────────────────────────

#[test]
fn hit_hides_fly_and_scores() {
    let mut s = make_state();
    s.ball.set_location((45.0, 45.0));
    let s2 = detect_hits(&s);
    assert_eq!(s2.score, 1);
    assert!(!s2.flies[0].visible());
    assert!(s2.flies[1..].iter().all(|f| f.visible()));
    assert_eq!(s2.score_label.text, "Score: 1");
}

#[test]
fn hidden_fly_cannot_be_hit_twice() {
    let mut s = make_state();
    s.ball.set_location((45.0, 45.0));
    let s2 = detect_hits(&s);
    let s3 = detect_hits(&s2);
    assert_eq!(s3.score, 1);
    assert!(!s3.flies[0].visible());
}

#[test]
fn one_ball_can_hit_two_flies() {
    let mut s = make_state();
    s.flies[1].set_location((60.0, 40.0));
    s.ball.set_location((50.0, 50.0));
    let s2 = detect_hits(&s);
    assert_eq!(s2.score, 2);
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_advances_frame_and_moves_flies() {
    let s = make_state();
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.frame, 1);
    assert_ne!(s2.flies, s.flies);
}

#[test]
fn tick_frozen_while_paused() {
    let s = GameState { status: GameStatus::Paused, ..launched(50.0, 50.0) };
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.frame, 0);
    assert_eq!(s2.flies, s.flies);
    assert_eq!(s2.ball, s.ball);
    assert_eq!(s2.velocity, s.velocity);
}

#[test]
fn drag_while_paused_launches_on_resume() {
    let mut rng = seeded_rng();
    let s = toggle_pause(&make_state());
    let s = handle_event(&s, &GameEvent::PointerDown { x: 100.0, y: 400.0 }, &mut rng);
    let s = handle_event(&s, &GameEvent::PointerUp { x: 50.0, y: 450.0 }, &mut rng);

    // Launched, but frozen in place
    let s = tick(&s, &mut rng);
    assert!(s.released);
    assert_eq!(s.ball.location(), LAUNCH_POINT);

    let s = toggle_pause(&s);
    let s = tick(&s, &mut rng);
    let (x, y) = s.ball.location();
    assert!(approx(x, 30.0), "x = {}", x);
    assert!(approx(y, 395.0), "y = {}", y);
}

#[test]
fn last_hit_wins_the_game() {
    let mut s = make_state();
    for fly in &mut s.flies[1..] {
        fly.set_visible(false);
    }
    s.score = 5;
    // Park the ball on the last fly; one random step cannot escape it
    let (fx, fy) = s.flies[0].location();
    s.ball.set_location((fx + 10.0, fy + 10.0));

    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.score, 6);
    assert_eq!(s2.status, GameStatus::Won);

    // Won sessions stand still until restarted
    let s3 = tick(&s2, &mut seeded_rng());
    assert_eq!(s3.frame, s2.frame);
}

#[test]
fn restart_after_win_builds_fresh_session() {
    let mut rng = seeded_rng();
    let mut won = make_state();
    for fly in &mut won.flies {
        fly.set_visible(false);
    }
    won.score = 6;
    won.status = GameStatus::Won;
    won.ball.set_location((300.0, 400.0));

    let s = handle_event(&won, &GameEvent::Key(Key::Restart), &mut rng);
    assert_eq!(s.score, 0);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.flies.len(), FLY_COUNT);
    assert!(s.flies.iter().all(|f| f.visible()));
    assert_eq!(s.ball.location(), LAUNCH_POINT);
    assert_eq!(s.score_label.text, "Score: 0");
    assert!(s
        .flies
        .iter()
        .zip(&won.flies)
        .any(|(a, b)| a.location() != b.location()));
}

#[test]
fn restart_keeps_physics_tunables() {
    let mut won = make_state();
    won.status = GameStatus::Won;
    won.physics.gravity = 9.81;
    let s = restart(&won, &mut seeded_rng());
    assert_eq!(s.physics.gravity, 9.81);
}

#[test]
fn score_matches_hidden_flies_through_play() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut s = init_state(&mut rng);
    let mut ever_hidden = vec![false; s.flies.len()];

    for frame in 0..3_000 {
        if !s.released && s.status == GameStatus::Playing {
            let dx = rng.gen_range(5.0..120.0);
            let dy = rng.gen_range(-120.0..-5.0);
            s = pointer_down(&s, 100.0, 300.0);
            s = pointer_up(&s, 100.0 - dx, 300.0 - dy);
        }
        if frame % 400 == 399 {
            s = reset_ball(&s);
        }
        s = tick(&s, &mut rng);

        let hidden = s.flies.iter().filter(|f| !f.visible()).count();
        assert_eq!(s.score as usize, hidden);
        assert!(s.score as usize <= FLY_COUNT);
        for (i, fly) in s.flies.iter().enumerate() {
            assert!(!(ever_hidden[i] && fly.visible()), "fly {} came back", i);
            ever_hidden[i] |= !fly.visible();
        }
        if !s.released {
            assert_eq!(s.ball.location().1, BALL_REST_Y);
        }
        if s.status == GameStatus::Won {
            break;
        }
    }
}
