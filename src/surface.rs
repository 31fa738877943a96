/// Drawing interface and the pixel canvas behind it.
///
/// Everything above this module draws in logical units (a 600×500 area,
/// origin top-left, y down).  `Canvas` scales those units onto a pixel grid
/// of whatever resolution the terminal provides.

use std::ops::Range;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

// ── Primitives ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const RED: Rgb = Rgb(230, 0, 0);
    pub const EYE_RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(172, 240, 120);
    pub const BLUE: Rgb = Rgb(155, 217, 250);
    pub const GREY: Rgb = Rgb(169, 169, 169);
}

/// Axis-aligned rectangle in logical units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// The narrow set of operations entities use to render themselves.
pub trait Surface {
    /// Logical size of the drawing area.
    fn size(&self) -> (f32, f32);

    /// Paint the whole surface, discarding anything drawn before.
    fn fill(&mut self, color: Rgb);

    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    /// Ellipse inscribed in `rect`.  A `width` of 0 fills it, anything else
    /// draws an outline that thick.
    fn ellipse(&mut self, rect: Rect, color: Rgb, width: f32);

    fn circle(&mut self, center: (f32, f32), radius: f32, color: Rgb) {
        let (cx, cy) = center;
        let rect = Rect::new(cx - radius, cy - radius, radius * 2.0, radius * 2.0);
        self.ellipse(rect, color, 0.0);
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb);

    /// Render `text` with its top-left corner at `at`.
    fn text(&mut self, at: (f32, f32), text: &str, color: Rgb);
}

// ── Canvas ────────────────────────────────────────────────────────────────────

/// A run of text placed on the canvas, in pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub x: usize,
    pub y: usize,
    pub text: String,
    pub color: Rgb,
}

/// Software rasterizer implementing `Surface`.
///
/// Shapes are sampled at pixel centres.  Text is not rasterized: it is kept
/// as runs so a character-cell display can print it directly.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: usize,
    height: usize,
    scale_x: f32,
    scale_y: f32,
    pixels: Vec<Rgb>,
    texts: Vec<TextRun>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Canvas {
            width,
            height,
            scale_x: width as f32 / SCREEN_WIDTH,
            scale_y: height as f32 / SCREEN_HEIGHT,
            pixels: vec![Rgb::WHITE; width * height],
            texts: Vec::new(),
        }
    }

    /// One pixel per column and two per row, matching half-block output.
    pub fn for_terminal(cols: u16, rows: u16) -> Self {
        Canvas::new(cols as usize, rows as usize * 2)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn texts(&self) -> &[TextRun] {
        &self.texts
    }

    /// Map a terminal cell (as produced by `for_terminal`) back to the
    /// logical point at its centre.
    pub fn cell_to_logical(&self, col: u16, row: u16) -> (f32, f32) {
        let px = col as f32 + 0.5;
        let py = row as f32 * 2.0 + 1.0;
        (
            px * SCREEN_WIDTH / self.width as f32,
            py * SCREEN_HEIGHT / self.height as f32,
        )
    }

    fn to_pixel(&self, point: (f32, f32)) -> (f32, f32) {
        (point.0 * self.scale_x, point.1 * self.scale_y)
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            let idx = y as usize * self.width + x as usize;
            self.pixels[idx] = color;
        }
    }

    /// Pixels whose centres fall in `[lo, hi)` logical units on one axis.
    fn span(lo: f32, hi: f32, scale: f32, limit: usize) -> Range<usize> {
        let start = (lo * scale - 0.5).ceil().max(0.0) as usize;
        let end = (hi * scale - 0.5).ceil().max(0.0) as usize;
        start.min(limit)..end.min(limit)
    }
}

impl Surface for Canvas {
    fn size(&self) -> (f32, f32) {
        (SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
        self.texts.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let xs = Canvas::span(rect.x, rect.right(), self.scale_x, self.width);
        let ys = Canvas::span(rect.y, rect.bottom(), self.scale_y, self.height);
        for py in ys {
            let row = py * self.width;
            for px in xs.clone() {
                self.pixels[row + px] = color;
            }
        }
    }

    fn ellipse(&mut self, rect: Rect, color: Rgb, width: f32) {
        let rx = rect.width / 2.0;
        let ry = rect.height / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let (cx, cy) = (rect.x + rx, rect.y + ry);

        // Outlines thinner than a pixel would vanish entirely.
        let min_stroke = 1.0 / self.scale_x.min(self.scale_y);
        let inner = if width > 0.0 {
            let stroke = width.max(min_stroke);
            Some((rx - stroke, ry - stroke)).filter(|&(ix, iy)| ix > 0.0 && iy > 0.0)
        } else {
            None
        };

        let xs = Canvas::span(rect.x, rect.right(), self.scale_x, self.width);
        let ys = Canvas::span(rect.y, rect.bottom(), self.scale_y, self.height);
        for py in ys {
            let dy = (py as f32 + 0.5) / self.scale_y - cy;
            for px in xs.clone() {
                let dx = (px as f32 + 0.5) / self.scale_x - cx;
                if (dx / rx).powi(2) + (dy / ry).powi(2) > 1.0 {
                    continue;
                }
                if let Some((ix, iy)) = inner {
                    if (dx / ix).powi(2) + (dy / iy).powi(2) < 1.0 {
                        continue;
                    }
                }
                self.pixels[py * self.width + px] = color;
            }
        }
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb) {
        let (x0, y0) = self.to_pixel(from);
        let (x1, y1) = self.to_pixel(to);
        let (x0, y0) = (x0.floor(), y0.floor());
        let (dx, dy) = (x1.floor() - x0, y1.floor() - y0);
        let steps = dx.abs().max(dy.abs()).max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (x0 + dx * t).round() as i64;
            let y = (y0 + dy * t).round() as i64;
            self.put(x, y, color);
        }
    }

    fn text(&mut self, at: (f32, f32), text: &str, color: Rgb) {
        let (x, y) = self.to_pixel(at);
        self.texts.push(TextRun {
            x: x.max(0.0) as usize,
            y: y.max(0.0) as usize,
            text: text.to_string(),
            color,
        });
    }
}
