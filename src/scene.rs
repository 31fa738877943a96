/// Compose one frame of a session onto any `Surface`.
///
/// No game logic here: the state is only read.

use crate::consts::GROUND_Y;
use crate::entities::{Drawable, GameState, GameStatus, Label};
use crate::surface::{Rect, Rgb, Surface};

pub fn draw_scene(surface: &mut dyn Surface, state: &GameState) {
    if state.status == GameStatus::Won {
        draw_winner(surface);
        return;
    }

    let (width, height) = surface.size();
    surface.fill(Rgb::WHITE);
    surface.fill_rect(Rect::new(0.0, 0.0, width, GROUND_Y), Rgb::BLUE);
    surface.fill_rect(Rect::new(0.0, GROUND_Y, width, height - GROUND_Y), Rgb::GREEN);

    state.ground.draw(surface);
    state.ball.draw(surface);
    state.score_label.draw(surface);
    state.status_label.draw(surface);

    for fly in state.flies.iter().filter(|f| f.visible()) {
        fly.draw(surface);
    }
}

fn draw_winner(surface: &mut dyn Surface) {
    surface.fill(Rgb::WHITE);
    for label in Label::winner_banner() {
        label.draw(surface);
    }
}
