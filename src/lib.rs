//! Ball Game - drag to launch a ball, hit all six flies to win.
//!
//! Core modules:
//! - `entities`: drawable game objects and the session state (pure data)
//! - `compute`: pure game-logic functions (setup, input, physics, collisions)
//! - `surface`: drawing interface and the pixel canvas implementing it
//! - `scene`: composes one frame of a session onto a surface

pub mod compute;
pub mod entities;
pub mod scene;
pub mod surface;

/// Game configuration constants
pub mod consts {
    /// Logical drawing area
    pub const SCREEN_WIDTH: f32 = 600.0;
    pub const SCREEN_HEIGHT: f32 = 500.0;

    /// Height of the ground line; sky above, grass below.
    pub const GROUND_Y: f32 = 410.0;
    /// The ball rests (and is clamped) at this y.
    pub const BALL_REST_Y: f32 = 400.0;
    pub const LAUNCH_POINT: (f32, f32) = (25.0, 400.0);
    pub const BALL_RADIUS: f32 = 10.0;

    pub const FLY_COUNT: usize = 6;
    /// Flies occupy a square box of this side.
    pub const FLY_SIZE: f32 = 40.0;
    /// Distance a fly travels per frame.
    pub const FLY_SPEED: f32 = 5.0;
    /// Half-width of the band around an existing fly that triggers a redraw.
    pub const FLY_SPACING: f32 = 40.0;

    pub const FPS: u64 = 25;
}
