/// All game entity types and the session state.
///
/// Entities share a `Placement` (position + visibility) and implement
/// `Drawable`; the session state is plain data updated by `compute`.

use crate::consts::{BALL_RADIUS, FLY_SIZE, GROUND_Y, LAUNCH_POINT, SCREEN_WIDTH};
use crate::surface::{Rect, Rgb, Surface};

// ── Drawable contract ─────────────────────────────────────────────────────────

/// Position and visibility shared by every on-screen object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub visible: bool,
}

impl Placement {
    pub fn new(x: f32, y: f32) -> Self {
        Placement { x, y, visible: true }
    }
}

/// Anything that can be drawn and collision-tested.
///
/// `rect` is computed from the current location on every call, so it always
/// reflects the latest `set_location`.
pub trait Drawable {
    fn placement(&self) -> &Placement;
    fn placement_mut(&mut self) -> &mut Placement;

    /// Tight axis-aligned bounding box.
    fn rect(&self) -> Rect;

    fn draw(&self, surface: &mut dyn Surface);

    fn location(&self) -> (f32, f32) {
        let p = self.placement();
        (p.x, p.y)
    }

    fn set_location(&mut self, (x, y): (f32, f32)) {
        let p = self.placement_mut();
        p.x = x;
        p.y = y;
    }

    fn visible(&self) -> bool {
        self.placement().visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.placement_mut().visible = visible;
    }
}

// ── Ball ──────────────────────────────────────────────────────────────────────

/// The player's projectile.
#[derive(Clone, Debug, PartialEq)]
pub struct Ball {
    pub placement: Placement,
    pub radius: f32,
    pub color: Rgb,
}

impl Ball {
    pub fn new(x: f32, y: f32, radius: f32, color: Rgb) -> Self {
        Ball { placement: Placement::new(x, y), radius, color }
    }

    /// A red ball of the standard radius waiting at the launch point.
    pub fn at_launch_point() -> Self {
        Ball::new(LAUNCH_POINT.0, LAUNCH_POINT.1, BALL_RADIUS, Rgb::RED)
    }
}

impl Drawable for Ball {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    /// The location is the box's top-left corner even though the circle is
    /// drawn centred on it.
    fn rect(&self) -> Rect {
        let diameter = self.radius * 2.0;
        Rect::new(self.placement.x, self.placement.y, diameter, diameter)
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.circle(self.location(), self.radius, self.color);
    }
}

// ── Fly ───────────────────────────────────────────────────────────────────────

/// Body colours a fly may be spawned with.
pub const FLY_COLORS: [Rgb; 3] = [Rgb(0, 0, 0), Rgb(1, 50, 32), Rgb(92, 64, 51)];

/// A wandering target.
#[derive(Clone, Debug, PartialEq)]
pub struct Fly {
    pub placement: Placement,
    pub color: Rgb,
}

impl Fly {
    pub fn new(x: f32, y: f32, color: Rgb) -> Self {
        Fly { placement: Placement::new(x, y), color }
    }
}

impl Drawable for Fly {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn rect(&self) -> Rect {
        Rect::new(self.placement.x, self.placement.y, FLY_SIZE, FLY_SIZE)
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let (x, y) = self.location();

        // Body and eye
        surface.ellipse(Rect::new(x, y, 40.0, 20.0), self.color, 0.0);
        surface.circle((x + 5.0, y + 5.0), 5.0, Rgb::EYE_RED);

        // Six legs
        for i in 0..6 {
            let leg_x = x + 5.0 + i as f32 * 5.0;
            surface.line((leg_x, y + 15.0), (leg_x, y + 25.0), Rgb::BLACK);
        }

        // Two wings, outlined
        surface.ellipse(Rect::new(x + 10.0, y, 35.0, 10.0), Rgb::GREY, 2.0);
        surface.ellipse(Rect::new(x + 10.0, y + 5.0, 35.0, 10.0), Rgb::GREY, 2.0);
    }
}

// ── Ground line ───────────────────────────────────────────────────────────────

/// Horizontal line from the left edge to `x` at height `y`.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundLine {
    pub placement: Placement,
}

impl GroundLine {
    pub fn new(x: f32, y: f32) -> Self {
        GroundLine { placement: Placement::new(x, y) }
    }
}

impl Default for GroundLine {
    fn default() -> Self {
        GroundLine::new(SCREEN_WIDTH, GROUND_Y)
    }
}

impl Drawable for GroundLine {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn rect(&self) -> Rect {
        Rect::new(0.0, self.placement.y, self.placement.x, 1.0)
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let (x, y) = self.location();
        surface.line((0.0, y), (x, y), Rgb::BLACK);
    }
}

// ── Label ─────────────────────────────────────────────────────────────────────

/// Advance per character of the 20-unit label font.
pub const LABEL_CHAR_WIDTH: f32 = 11.0;
pub const LABEL_HEIGHT: f32 = 20.0;

/// A line of black text.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub placement: Placement,
    pub text: String,
}

impl Label {
    pub fn new(x: f32, y: f32, text: impl Into<String>) -> Self {
        Label { placement: Placement::new(x, y), text: text.into() }
    }

    /// Top-left score readout.
    pub fn score(score: u32) -> Self {
        Label::new(0.0, 0.0, format!("Score: {}", score))
    }

    /// Top-right indicator: "idle" while paused, "moving" otherwise.
    pub fn status(paused: bool) -> Self {
        if paused {
            Label::new(565.0, 0.0, "idle")
        } else {
            Label::new(530.0, 0.0, "moving")
        }
    }

    /// The victory overlay.
    pub fn winner_banner() -> [Label; 2] {
        [
            Label::new(270.0, 220.0, "Winner!"),
            Label::new(200.0, 250.0, "Hit \"return\" to restart!"),
        ]
    }
}

impl Drawable for Label {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn rect(&self) -> Rect {
        let width = self.text.chars().count() as f32 * LABEL_CHAR_WIDTH;
        Rect::new(self.placement.x, self.placement.y, width, LABEL_HEIGHT)
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.text(self.location(), &self.text, Rgb::BLACK);
    }
}

// ── Session state ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Paused,
    Won,
}

/// Keys the game reacts to.  Anything else never reaches the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Reset,
    TogglePause,
    Restart,
}

/// Input delivered to the game, already in logical coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    Quit,
    Key(Key),
    PointerDown { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
}

/// Launch velocity.  Positive `yv` points up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub xv: f32,
    pub yv: f32,
}

/// Physics tunables for the ball.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Physics {
    /// Pseudo time step applied each frame.
    pub dt: f32,
    pub gravity: f32,
    /// Fraction of vertical speed kept (and reversed) on a bounce.
    pub restitution: f32,
    /// Fraction of horizontal speed kept on a bounce.
    pub damping: f32,
    /// Vertical speed at or below which the ball stops.
    pub rest_epsilon: f32,
    /// Horizontal velocity at or below which the ball stops (signed).
    pub min_xv: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Physics {
            dt: 0.1,
            gravity: 6.67,
            restitution: 0.7,
            damping: 0.5,
            rest_epsilon: 0.0001,
            min_xv: 0.1,
        }
    }
}

/// The entire session state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub ball: Ball,
    pub flies: Vec<Fly>,
    pub ground: GroundLine,
    pub score: u32,
    pub velocity: Velocity,
    /// True while the ball is in flight.
    pub released: bool,
    /// Where the pointer went down, waiting for the matching release.
    pub press: Option<(f32, f32)>,
    pub status: GameStatus,
    pub frame: u64,
    pub score_label: Label,
    pub status_label: Label,
    pub physics: Physics,
}
