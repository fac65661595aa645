//! Direct manipulation of single floating clients.

use super::LayoutParams;
use crate::geometry::Geometry;

/// Pointer position tracked across a drag. Each motion yields the delta
/// since the previous one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDrag {
    last_x: i32,
    last_y: i32,
}

impl PointerDrag {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            last_x: x,
            last_y: y,
        }
    }

    pub fn origin(&self) -> (i32, i32) {
        (self.last_x, self.last_y)
    }

    pub fn motion(&mut self, x: i32, y: i32) -> (f64, f64) {
        let delta = (f64::from(x - self.last_x), f64::from(y - self.last_y));
        self.last_x = x;
        self.last_y = y;
        delta
    }
}

pub fn move_by(geometry: &mut Geometry, dx: f64, dy: f64) {
    geometry.translate(dx, dy);
}

/// Grow the bottom-right corner by the pointer delta. Sizes never drop
/// below `min_size`.
pub fn resize_by(geometry: &mut Geometry, dx: f64, dy: f64, min_size: f64) {
    geometry.w = (geometry.w + dx).max(min_size);
    geometry.h = (geometry.h + dy).max(min_size);
}

/// Fill the screen edge to edge with the border pushed just off screen,
/// leaving the bar band free while the bar is shown.
pub fn maximized(params: &LayoutParams) -> Geometry {
    let b = params.border;
    let y = params.top_offset() - b;
    let h = if params.bar.visible {
        params.usable_height()
    } else {
        params.screen.height + 2 * b
    };
    Geometry::new(
        f64::from(-b),
        f64::from(y),
        f64::from(params.screen.width),
        f64::from(h),
    )
}
