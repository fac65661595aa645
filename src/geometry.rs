//! Canvas coordinate space and the two primitive transforms applied to it.
//!
//! Every managed window lives on an unbounded canvas; the physical screen is
//! a fixed viewport at the canvas origin. Panning moves content relative to
//! that viewport, zooming rescales content about a fixed point. Positions and
//! sizes are kept as `f64` so repeated zooming does not accumulate rounding
//! drift; values are rounded only when handed to the window system.

/// Position and size of a client on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Geometry {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Scale about `(px, py)`, keeping that point fixed. Each dimension is
    /// clamped to `min_size` after scaling.
    pub fn scale_about(&mut self, factor: f64, px: f64, py: f64, min_size: f64) {
        self.w = (self.w * factor).max(min_size);
        self.h = (self.h * factor).max(min_size);
        self.x = (self.x - px) * factor + px;
        self.y = (self.y - py) * factor + py;
    }

    /// Integer rectangle for the window system. Sizes are floored to
    /// `min_size` so a window never collapses to nothing on screen.
    pub fn to_screen(&self, min_size: u32) -> ScreenRect {
        ScreenRect {
            x: self.x.round() as i32,
            y: self.y.round() as i32,
            width: (self.w.round().max(0.0) as u32).max(min_size),
            height: (self.h.round().max(0.0) as u32).max(min_size),
        }
    }
}

/// Rounded rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Size of the physical viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Screen {
    pub width: i32,
    pub height: i32,
}

impl Screen {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Strict containment of a canvas point in the viewport.
    pub fn contains_strict(&self, x: f64, y: f64) -> bool {
        x > 0.0 && x < self.width as f64 && y > 0.0 && y < self.height as f64
    }

    /// Which of the nine screen-relative regions (left/inside/right by
    /// above/inside/below) a canvas point falls in, as a 0..9 index laid out
    /// column-major: `column * 3 + row`.
    pub fn region_index(&self, x: f64, y: f64) -> usize {
        let column = if x < 0.0 {
            0
        } else if x < self.width as f64 {
            1
        } else {
            2
        };
        let row = if y < 0.0 {
            0
        } else if y < self.height as f64 {
            1
        } else {
            2
        };
        column * 3 + row
    }
}

/// Split a pan of `(tx, ty)` into animation frames.
///
/// Each axis advances by `step` (with the sign of its remaining distance)
/// while its remainder is at least one step; the final frame carries the
/// exact leftover so the frames always sum to the requested pan. A
/// non-positive step produces a single frame.
pub fn animation_frames(tx: f64, ty: f64, step: f64) -> Vec<(f64, f64)> {
    let mut frames = Vec::new();
    if step <= 0.0 {
        if tx != 0.0 || ty != 0.0 {
            frames.push((tx, ty));
        }
        return frames;
    }
    let (mut rx, mut ry) = (tx, ty);
    while rx.abs() >= step || ry.abs() >= step {
        let sx = if rx.abs() >= step { step.copysign(rx) } else { 0.0 };
        let sy = if ry.abs() >= step { step.copysign(ry) } else { 0.0 };
        frames.push((sx, sy));
        rx -= sx;
        ry -= sy;
    }
    if rx != 0.0 || ry != 0.0 {
        frames.push((rx, ry));
    }
    frames
}
