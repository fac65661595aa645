pub mod floating;
pub mod tiling;

pub use tiling::*;

use std::fmt;

use crate::client::WindowId;
use crate::geometry::{Geometry, Screen};
use crate::tags::BarState;

/// The named tiling arrangements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    /// Every client full screen, one screen width apart.
    Flow,
    /// Master on top, the rest in columns below (bstack).
    VerticalStack,
    /// Master on the left, the rest in rows on the right (rstack).
    HorizontalStack,
    /// Master on the left, the rest stacked on top of each other on the right.
    MasterStack,
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LayoutKind::Flow => "flow",
            LayoutKind::VerticalStack => "bstack",
            LayoutKind::HorizontalStack => "rstack",
            LayoutKind::MasterStack => "master-stack",
        };
        write!(f, "{}", s)
    }
}

/// Everything a layout needs to know about the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub screen: Screen,
    pub gap: i32,
    pub border: i32,
    pub win_min: i32,
    pub bar: BarState,
    pub bias: i32,
}

impl LayoutParams {
    pub fn top_offset(&self) -> i32 {
        self.bar.top_offset()
    }

    /// Screen height left once the bar is accounted for.
    pub fn usable_height(&self) -> i32 {
        self.screen.height - self.bar.consumed()
    }
}

/// Result of a layout pass: new geometry per client and an optional client
/// to raise once the placements are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPlan {
    pub placements: Vec<(WindowId, Geometry)>,
    pub raise: Option<WindowId>,
}

impl LayoutPlan {
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn get(&self, window: WindowId) -> Option<Geometry> {
        self.placements
            .iter()
            .find(|(id, _)| *id == window)
            .map(|(_, g)| *g)
    }
}

/// Configured sequence of layouts walked by the cycle-layout binding.
#[derive(Debug, Clone)]
pub struct LayoutCycle {
    kinds: Vec<LayoutKind>,
    index: usize,
}

impl LayoutCycle {
    pub fn new(kinds: Vec<LayoutKind>) -> Self {
        Self { kinds, index: 0 }
    }

    pub fn current(&self) -> Option<LayoutKind> {
        self.kinds.get(self.index).copied()
    }

    /// Step to the next layout, wrapping to the first.
    pub fn advance(&mut self) -> Option<LayoutKind> {
        if self.kinds.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.kinds.len();
        self.current()
    }
}
