//! Tiling arrangements over the visible clients.
//!
//! All arithmetic is done on whole pixels, the same way the window system
//! sees it, and converted to canvas geometry at the end. Clients are given
//! in traversal order; the first one is the master.

use super::{LayoutKind, LayoutParams, LayoutPlan};
use crate::client::WindowId;
use crate::geometry::Geometry;

fn rect(x: i32, y: i32, w: i32, h: i32) -> Geometry {
    Geometry::new(f64::from(x), f64::from(y), f64::from(w), f64::from(h))
}

/// Geometry of a client filling the usable area inside the gaps.
pub fn single(params: &LayoutParams) -> Geometry {
    let g = params.gap;
    let b = params.border;
    rect(
        g,
        params.top_offset() + g,
        params.screen.width - 2 * (g + b),
        params.usable_height() - 2 * (g + b),
    )
}

/// Lay out `windows` with `kind`. No clients is an empty plan; a single
/// client is always placed with [`single`].
pub fn arrange(kind: LayoutKind, windows: &[WindowId], params: &LayoutParams) -> LayoutPlan {
    match windows {
        [] => LayoutPlan::default(),
        [only] => LayoutPlan {
            placements: vec![(*only, single(params))],
            raise: None,
        },
        _ => match kind {
            LayoutKind::Flow => flow(windows, params),
            LayoutKind::VerticalStack => vertical_stack(windows, params),
            LayoutKind::HorizontalStack => horizontal_stack(windows, params),
            LayoutKind::MasterStack => master_stack(windows, params),
        },
    }
}

fn flow(windows: &[WindowId], params: &LayoutParams) -> LayoutPlan {
    let base = single(params);
    let sw = f64::from(params.screen.width);
    let placements = windows
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let mut g = base;
            g.x += sw * i as f64;
            (*id, g)
        })
        .collect();
    LayoutPlan {
        placements,
        raise: None,
    }
}

fn vertical_stack(windows: &[WindowId], params: &LayoutParams) -> LayoutPlan {
    let (g, b, bias, min) = (params.gap, params.border, params.bias, params.win_min);
    let sw = params.screen.width;
    let oy = params.top_offset();
    let stacked = windows.len() as i32 - 1;
    let h = (params.usable_height() - g) / 2 - (g + 2 * b);
    let w = (sw - g) / stacked;

    let mut placements = Vec::with_capacity(windows.len());
    placements.push((windows[0], rect(g, oy + g, sw - 2 * (g + b), h + bias)));
    let y = oy + h + 2 * (g + b) + bias;
    for (i, id) in windows[1..].iter().enumerate() {
        let x = g + i as i32 * w;
        let width = if i as i32 == stacked - 1 {
            (sw - x - g - 2 * b).max(min)
        } else {
            (w - g - 2 * b).max(min)
        };
        placements.push((*id, rect(x, y, width, h - bias)));
    }
    LayoutPlan {
        placements,
        raise: None,
    }
}

fn horizontal_stack(windows: &[WindowId], params: &LayoutParams) -> LayoutPlan {
    let (g, b, bias, min) = (params.gap, params.border, params.bias, params.win_min);
    let uh = params.usable_height();
    let oy = params.top_offset();
    let stacked = windows.len() as i32 - 1;
    let w = (params.screen.width - g) / 2 - (g + 2 * b);
    let h = (uh - g) / stacked;

    let mut placements = Vec::with_capacity(windows.len());
    placements.push((windows[0], rect(g, oy + g, w + bias, uh - 2 * (g + b))));
    let x = w + 2 * (g + b) + bias;
    for (i, id) in windows[1..].iter().enumerate() {
        let y = oy + g + i as i32 * h;
        let height = if i as i32 == stacked - 1 {
            (oy + uh - y - g - 2 * b).max(min)
        } else {
            (h - g - 2 * b).max(min)
        };
        placements.push((*id, rect(x, y, w - bias, height)));
    }
    LayoutPlan {
        placements,
        raise: None,
    }
}

fn master_stack(windows: &[WindowId], params: &LayoutParams) -> LayoutPlan {
    let (g, b, bias) = (params.gap, params.border, params.bias);
    let uh = params.usable_height();
    let oy = params.top_offset();
    let w = (params.screen.width - g) / 2 - (g + 2 * b);
    let full = uh - 2 * (g + b);

    let mut placements = Vec::with_capacity(windows.len());
    placements.push((windows[0], rect(g, oy + g, w + bias, full)));
    let stack = rect(w + 2 * (g + b) + bias, oy + g, w - bias, full);
    placements.extend(windows[1..].iter().map(|id| (*id, stack)));
    LayoutPlan {
        placements,
        raise: windows.get(1).copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Screen;
    use crate::tags::BarState;

    fn params(bar_visible: bool, top: bool) -> LayoutParams {
        LayoutParams {
            screen: Screen::new(1000, 800),
            gap: 4,
            border: 1,
            win_min: 50,
            bar: BarState {
                visible: bar_visible,
                top,
                height: 20,
            },
            bias: 0,
        }
    }

    #[test]
    fn empty_and_single() {
        let p = params(true, true);
        assert!(arrange(LayoutKind::Flow, &[], &p).is_empty());
        let plan = arrange(LayoutKind::MasterStack, &[7], &p);
        assert_eq!(plan.get(7), Some(Geometry::new(4.0, 24.0, 990.0, 770.0)));
        assert_eq!(plan.raise, None);
    }

    #[test]
    fn bstack_master_takes_half_and_columns_split_evenly() {
        let p = params(false, true);
        let plan = arrange(LayoutKind::VerticalStack, &[1, 2, 3], &p);
        let master = plan.get(1).unwrap();
        // (800 - 4) / 2 - (4 + 2)
        assert_eq!(master, Geometry::new(4.0, 4.0, 990.0, 392.0));
        let a = plan.get(2).unwrap();
        let b = plan.get(3).unwrap();
        assert_eq!(a.w, b.w);
        assert_eq!(a.y, b.y);
        assert_eq!(a.h, 392.0);
        assert_eq!(a.x, 4.0);
        assert_eq!(b.x, 502.0);
    }

    #[test]
    fn bias_shifts_split_line() {
        let mut p = params(false, true);
        p.bias = 10;
        let plan = arrange(LayoutKind::VerticalStack, &[1, 2], &p);
        assert_eq!(plan.get(1).unwrap().h, 402.0);
        assert_eq!(plan.get(2).unwrap().h, 382.0);
        let plan = arrange(LayoutKind::HorizontalStack, &[1, 2], &p);
        assert_eq!(plan.get(1).unwrap().w, 502.0);
        assert_eq!(plan.get(2).unwrap().w, 482.0);
    }

    #[test]
    fn rstack_last_row_reaches_usable_bottom() {
        let p = params(true, true);
        let plan = arrange(LayoutKind::HorizontalStack, &[1, 2, 3, 4], &p);
        let last = plan.get(4).unwrap();
        // 20 + 780 - 4 - 2
        assert_eq!(last.y + last.h, 794.0);
        let first = plan.get(2).unwrap();
        assert_eq!(first.y, 24.0);
    }

    #[test]
    fn flow_places_one_screen_apart() {
        let p = params(true, true);
        let plan = arrange(LayoutKind::Flow, &[1, 2, 3], &p);
        assert_eq!(plan.get(3).unwrap().x, 2004.0);
        assert_eq!(plan.get(3).unwrap().y, 24.0);
    }

    #[test]
    fn master_stack_raises_second() {
        let p = params(true, true);
        let plan = arrange(LayoutKind::MasterStack, &[1, 2, 3], &p);
        assert_eq!(plan.raise, Some(2));
        assert_eq!(plan.get(2), plan.get(3));
        assert_eq!(plan.get(2).unwrap().h, 770.0);
    }
}
