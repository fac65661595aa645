//! Tag masks and the process-wide visibility policy.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// One bit per tag. A client may carry several bits, or none.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TagMask(u32);

impl TagMask {
    pub const EMPTY: TagMask = TagMask(0);

    pub fn single(tag: usize) -> Self {
        Self(1 << tag)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, tag: usize) -> bool {
        self.0 & (1 << tag) != 0
    }

    pub fn intersects(self, other: TagMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, tag: usize) {
        self.0 |= 1 << tag;
    }

    pub fn remove(&mut self, tag: usize) {
        self.0 &= !(1 << tag);
    }

    pub fn toggle(&mut self, tag: usize) {
        self.0 ^= 1 << tag;
    }

    pub fn clear(&mut self, other: TagMask) {
        self.0 &= !other.0;
    }

    /// Indices of the set bits below `count`.
    pub fn iter(self, count: usize) -> impl Iterator<Item = usize> {
        (0..count).filter(move |tag| self.contains(*tag))
    }
}

impl BitOr for TagMask {
    type Output = TagMask;

    fn bitor(self, rhs: TagMask) -> TagMask {
        TagMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for TagMask {
    fn bitor_assign(&mut self, rhs: TagMask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for TagMask {
    type Output = TagMask;

    fn bitand(self, rhs: TagMask) -> TagMask {
        TagMask(self.0 & rhs.0)
    }
}

impl fmt::Debug for TagMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagMask({:#b})", self.0)
    }
}

/// Operations accepted by the tag configuration command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagConfigOp {
    /// Hide the active tag.
    Hide,
    /// Make the active tag immune to pan and zoom.
    Stick,
    /// Clear hidden and sticky for the active tag.
    Normal,
    ToggleBar,
    ToggleBarPosition,
    /// Hide every tag except the active one.
    Isolate,
}

/// Visibility and placement of the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarState {
    pub visible: bool,
    pub top: bool,
    pub height: i32,
}

impl BarState {
    /// Vertical offset of the usable area: the bar height when the bar is
    /// shown at the top.
    pub fn top_offset(&self) -> i32 {
        if self.visible && self.top {
            self.height
        } else {
            0
        }
    }

    /// Height the bar takes away from the usable area.
    pub fn consumed(&self) -> i32 {
        if self.visible { self.height } else { 0 }
    }

    /// Screen y of the bar window; off screen when hidden.
    pub fn window_y(&self, screen_height: i32) -> i32 {
        match (self.visible, self.top) {
            (true, true) => 0,
            (true, false) => screen_height - self.height,
            (false, true) => -self.height,
            (false, false) => screen_height,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TagPolicy {
    count: usize,
    active: usize,
    hidden: TagMask,
    sticky: TagMask,
    urgent: TagMask,
    bar: BarState,
}

impl TagPolicy {
    pub fn new(count: usize, bar: BarState) -> Self {
        Self {
            count: count.clamp(1, 32),
            active: 0,
            hidden: TagMask::EMPTY,
            sticky: TagMask::EMPTY,
            urgent: TagMask::EMPTY,
            bar,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_mask(&self) -> TagMask {
        TagMask::single(self.active)
    }

    pub fn hidden(&self) -> TagMask {
        self.hidden
    }

    pub fn sticky(&self) -> TagMask {
        self.sticky
    }

    pub fn urgent(&self) -> TagMask {
        self.urgent
    }

    pub fn bar(&self) -> BarState {
        self.bar
    }

    pub fn is_valid(&self, tag: usize) -> bool {
        tag < self.count
    }

    /// Switch the active tag and drop its urgency. Returns false for an
    /// index outside the configured tag list.
    pub fn set_active(&mut self, tag: usize) -> bool {
        if !self.is_valid(tag) {
            return false;
        }
        self.active = tag;
        self.urgent.remove(tag);
        true
    }

    pub fn mark_urgent(&mut self, tags: TagMask) {
        self.urgent |= tags;
    }

    /// Urgency is acknowledged by looking: the focused client's tags and the
    /// active tag stop being urgent whenever the bar is redrawn.
    pub fn acknowledge(&mut self, focused_tags: Option<TagMask>) {
        if let Some(tags) = focused_tags {
            self.urgent.clear(tags);
        }
        self.urgent.remove(self.active);
    }

    pub fn apply(&mut self, op: TagConfigOp) {
        match op {
            TagConfigOp::Hide => self.hidden.insert(self.active),
            TagConfigOp::Stick => self.sticky.insert(self.active),
            TagConfigOp::Normal => {
                self.sticky.remove(self.active);
                self.hidden.remove(self.active);
            }
            TagConfigOp::ToggleBar => self.bar.visible = !self.bar.visible,
            TagConfigOp::ToggleBarPosition => self.bar.top = !self.bar.top,
            TagConfigOp::Isolate => {
                for tag in 0..self.count {
                    if tag == self.active {
                        self.hidden.remove(tag);
                    } else {
                        self.hidden.insert(tag);
                    }
                }
            }
        }
    }
}
