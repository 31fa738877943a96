/// Rendering layer — all terminal I/O lives here.
///
/// The scene is drawn onto a `Canvas`, which is then printed with one
/// half-block character per cell: the foreground colour is the upper pixel,
/// the background colour the lower one.  Text runs are printed on top.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate},
    QueueableCommand,
};

use ball_game::entities::GameState;
use ball_game::scene::draw_scene;
use ball_game::surface::{Canvas, Rgb};

const UPPER_HALF: char = '▀';

fn color(rgb: Rgb) -> Color {
    Color::Rgb { r: rgb.0, g: rgb.1, b: rgb.2 }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, canvas: &mut Canvas, state: &GameState) -> std::io::Result<()> {
    draw_scene(canvas, state);

    out.queue(BeginSynchronizedUpdate)?;
    draw_pixels(out, canvas)?;
    draw_texts(out, canvas)?;
    out.queue(style::ResetColor)?;
    out.queue(EndSynchronizedUpdate)?;
    out.flush()
}

fn draw_pixels<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    let rows = canvas.height() / 2;
    for row in 0..rows {
        out.queue(cursor::MoveTo(0, row as u16))?;
        // Only emit colour changes; most of a row is sky or grass.
        let mut current: Option<(Rgb, Rgb)> = None;
        let mut line = String::with_capacity(canvas.width() * 3);
        for col in 0..canvas.width() {
            let top = canvas.pixel(col, row * 2).unwrap_or(Rgb::WHITE);
            let bottom = canvas.pixel(col, row * 2 + 1).unwrap_or(Rgb::WHITE);
            if current != Some((top, bottom)) {
                if !line.is_empty() {
                    out.queue(Print(&line))?;
                    line.clear();
                }
                out.queue(style::SetForegroundColor(color(top)))?;
                out.queue(style::SetBackgroundColor(color(bottom)))?;
                current = Some((top, bottom));
            }
            line.push(UPPER_HALF);
        }
        out.queue(Print(&line))?;
    }
    Ok(())
}

fn draw_texts<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    for run in canvas.texts() {
        let row = run.y / 2;
        let available = canvas.width().saturating_sub(run.x);
        let text: String = run.text.chars().take(available).collect();
        if text.is_empty() {
            continue;
        }
        let backdrop = canvas.pixel(run.x, row * 2).unwrap_or(Rgb::WHITE);
        out.queue(cursor::MoveTo(run.x as u16, row as u16))?;
        out.queue(style::SetBackgroundColor(color(backdrop)))?;
        out.queue(style::SetForegroundColor(color(run.color)))?;
        out.queue(Print(text))?;
    }
    Ok(())
}
