/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG and logging.

use std::f32::consts::TAU;

use log::{debug, info};
use rand::Rng;

use crate::consts::{
    BALL_REST_Y, FLY_COUNT, FLY_SIZE, FLY_SPACING, FLY_SPEED, GROUND_Y, LAUNCH_POINT,
    SCREEN_WIDTH,
};
use crate::entities::{
    Ball, Drawable, Fly, GameEvent, GameState, GameStatus, GroundLine, Key, Label, Physics,
    Velocity, FLY_COLORS,
};
use crate::surface::Rect;

// ── Collision ─────────────────────────────────────────────────────────────────

/// Axis-aligned overlap test.  Touching edges do not count.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

// ── Constructors ─────────────────────────────────────────────────────────────

fn random_x(rng: &mut impl Rng) -> f32 {
    rng.gen_range(40..=560) as f32
}

fn random_y(rng: &mut impl Rng) -> f32 {
    rng.gen_range(40..=360) as f32
}

/// Nudge a candidate spawn point away from flies already placed.
///
/// Best effort only: for each existing fly in turn, a coordinate that lands
/// within `FLY_SPACING` of that fly's matching coordinate is redrawn once.
/// The redrawn value is not re-checked against earlier flies.
pub fn place_fly(existing: &[Fly], candidate: (f32, f32), rng: &mut impl Rng) -> (f32, f32) {
    let (mut x, mut y) = candidate;
    for fly in existing {
        let (fx, fy) = fly.location();
        if (fx - FLY_SPACING..=fx + FLY_SPACING).contains(&x) {
            x = random_x(rng);
        }
        if (fy - FLY_SPACING..=fy + FLY_SPACING).contains(&y) {
            y = random_y(rng);
        }
    }
    (x, y)
}

/// Create the session's flies at random, loosely separated positions.
pub fn spawn_flies(rng: &mut impl Rng) -> Vec<Fly> {
    let mut flies: Vec<Fly> = Vec::with_capacity(FLY_COUNT);
    while flies.len() < FLY_COUNT {
        let candidate = (random_x(rng), random_y(rng));
        let (x, y) = place_fly(&flies, candidate, rng);
        let color = FLY_COLORS[rng.gen_range(0..FLY_COLORS.len())];
        flies.push(Fly::new(x, y, color));
    }
    flies
}

/// Build a fresh session: new fly layout, ball at the launch point, score 0.
pub fn init_state(rng: &mut impl Rng) -> GameState {
    let flies = spawn_flies(rng);
    info!("new session with {} flies", flies.len());
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

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Slingshot launch: the drag displacement becomes the velocity.
pub fn launch_velocity(press: (f32, f32), release: (f32, f32)) -> Velocity {
    Velocity {
        xv: press.0 - release.0,
        yv: -(press.1 - release.1),
    }
}

/// Remember where the drag started.  Ignored while the ball is in flight.
pub fn pointer_down(state: &GameState, x: f32, y: f32) -> GameState {
    if state.released {
        return state.clone();
    }
    GameState {
        press: Some((x, y)),
        ..state.clone()
    }
}

/// Finish the drag and launch the ball.
pub fn pointer_up(state: &GameState, x: f32, y: f32) -> GameState {
    let press = match state.press {
        Some(press) if !state.released => press,
        _ => return state.clone(),
    };
    let velocity = launch_velocity(press, (x, y));
    info!("launch: xv={:.1} yv={:.1}", velocity.xv, velocity.yv);
    GameState {
        velocity,
        released: true,
        press: None,
        ..state.clone()
    }
}

/// Put the ball back on the launch point, at rest.  Score and flies are
/// left alone.
pub fn reset_ball(state: &GameState) -> GameState {
    debug!("ball reset");
    let mut ball = state.ball.clone();
    ball.set_location(LAUNCH_POINT);
    GameState {
        ball,
        velocity: Velocity::default(),
        released: false,
        press: None,
        ..state.clone()
    }
}

/// Flip between playing and paused.  No effect once the game is won.
pub fn toggle_pause(state: &GameState) -> GameState {
    let status = match state.status {
        GameStatus::Playing => GameStatus::Paused,
        GameStatus::Paused => GameStatus::Playing,
        GameStatus::Won => return state.clone(),
    };
    let paused = status == GameStatus::Paused;
    debug!("paused: {}", paused);
    GameState {
        status,
        status_label: Label::status(paused),
        ..state.clone()
    }
}

/// Replace the session with a fresh one, keeping the physics tunables.
pub fn restart(state: &GameState, rng: &mut impl Rng) -> GameState {
    info!("restarting after score {}", state.score);
    GameState {
        physics: state.physics,
        ..init_state(rng)
    }
}

/// Apply one input event.  `Quit` is left to the frame loop, which owns the
/// process lifetime.
pub fn handle_event(state: &GameState, event: &GameEvent, rng: &mut impl Rng) -> GameState {
    match *event {
        GameEvent::Quit => state.clone(),
        GameEvent::PointerDown { x, y } => pointer_down(state, x, y),
        GameEvent::PointerUp { x, y } => pointer_up(state, x, y),
        GameEvent::Key(Key::Reset) => reset_ball(state),
        GameEvent::Key(Key::TogglePause) => toggle_pause(state),
        GameEvent::Key(Key::Restart) if state.status == GameStatus::Won => restart(state, rng),
        GameEvent::Key(Key::Restart) => state.clone(),
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// One random-walk step: a fresh direction every frame, fixed speed,
/// clamped to the sky.
pub fn move_fly(fly: &Fly, rng: &mut impl Rng) -> Fly {
    let angle: f32 = rng.gen_range(0.0..TAU);
    let (x, y) = fly.location();
    let x = (x + angle.cos() * FLY_SPEED).clamp(0.0, SCREEN_WIDTH - FLY_SIZE);
    let y = (y + angle.sin() * FLY_SPEED).clamp(0.0, GROUND_Y - FLY_SIZE);
    let mut moved = fly.clone();
    moved.set_location((x, y));
    moved
}

/// Move every visible fly; hit flies stay where they fell.
pub fn move_flies(state: &GameState, rng: &mut impl Rng) -> GameState {
    let flies = state
        .flies
        .iter()
        .map(|fly| if fly.visible() { move_fly(fly, rng) } else { fly.clone() })
        .collect();
    GameState {
        flies,
        ..state.clone()
    }
}

/// Advance the ball by one step.
///
/// The stop test compares the signed horizontal velocity, so a ball thrown
/// leftward (or straight up) comes to rest after a single step.
pub fn step_ball(state: &GameState) -> GameState {
    if !state.released {
        return state.clone();
    }
    let Physics { dt, gravity, restitution, damping, rest_epsilon, min_xv } = state.physics;
    let Velocity { mut xv, mut yv } = state.velocity;

    let (x, y) = state.ball.location();
    let x = x + dt * xv;
    let y = y - dt * yv;
    let mut ball = state.ball.clone();
    ball.set_location((x, y));

    if yv.abs() > rest_epsilon && xv > min_xv {
        if y > BALL_REST_Y {
            ball.set_location((x, BALL_REST_Y));
            yv = -restitution * yv;
            xv = damping * xv;
        } else {
            yv -= gravity * dt;
        }
        GameState {
            ball,
            velocity: Velocity { xv, yv },
            ..state.clone()
        }
    } else {
        ball.set_location((x, BALL_REST_Y));
        debug!("ball at rest at x={:.1}", x);
        GameState {
            ball,
            velocity: Velocity::default(),
            released: false,
            ..state.clone()
        }
    }
}

/// Hide every visible fly the ball overlaps, scoring one point each.
pub fn detect_hits(state: &GameState) -> GameState {
    let ball_rect = state.ball.rect();
    let mut score = state.score;
    let flies: Vec<Fly> = state
        .flies
        .iter()
        .map(|fly| {
            let mut fly = fly.clone();
            if fly.visible() && intersects(&fly.rect(), &ball_rect) {
                fly.set_visible(false);
                score += 1;
                info!("fly hit, score {}", score);
            }
            fly
        })
        .collect();

    if score == state.score {
        return state.clone();
    }
    GameState {
        flies,
        score,
        score_label: Label::score(score),
        ..state.clone()
    }
}

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
/// Paused and won sessions are returned unchanged.
pub fn tick(state: &GameState, rng: &mut impl Rng) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }

    let next = move_flies(state, rng);
    let next = step_ball(&next);
    let next = detect_hits(&next);

    let status = if next.score as usize == next.flies.len() {
        info!("all {} flies down, winner", next.flies.len());
        GameStatus::Won
    } else {
        GameStatus::Playing
    };

    GameState {
        status,
        frame: state.frame + 1,
        ..next
    }
}
