//! Focus traversal policy.

use std::fmt;

use crate::client::{ClientRegistry, WindowId};
use crate::geometry::{Geometry, Screen};
use crate::tags::TagMask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleMode {
    /// Every client, hidden ones included.
    All,
    /// Clients whose tags are not hidden.
    Visible,
    /// Visible clients whose centre lies on screen.
    Onscreen,
    /// Clients sharing at least one tag with the current one.
    SameTags,
}

impl fmt::Display for CycleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CycleMode::All => "all",
            CycleMode::Visible => "visible",
            CycleMode::Onscreen => "onscreen",
            CycleMode::SameTags => "same-tags",
        };
        write!(f, "{}", s)
    }
}

pub fn is_onscreen(geometry: &Geometry, screen: Screen) -> bool {
    let (cx, cy) = geometry.center();
    screen.contains_strict(cx, cy)
}

/// Next client after `current` in traversal order that satisfies `mode`,
/// wrapping around the head. The current client is the last candidate, so
/// the result is `current` itself when nothing else qualifies. Returns `None`
/// only when `current` is not tracked.
pub fn next_in_cycle(
    registry: &ClientRegistry,
    current: WindowId,
    mode: CycleMode,
    hidden: TagMask,
    screen: Screen,
) -> Option<WindowId> {
    let order = registry.order();
    let start = registry.position(current)?;
    let current_tags = registry.get(current)?.tags;
    let n = order.len();
    for step in 1..=n {
        let id = order[(start + step) % n];
        let Some(client) = registry.get(id) else {
            continue;
        };
        let qualifies = match mode {
            CycleMode::All => true,
            CycleMode::Visible => !client.is_hidden(hidden),
            CycleMode::Onscreen => {
                !client.is_hidden(hidden) && is_onscreen(&client.geometry, screen)
            }
            CycleMode::SameTags => client.tags.intersects(current_tags),
        };
        if qualifies {
            return Some(id);
        }
    }
    Some(current)
}

/// First visible client at or after traversal `index`, falling back to the
/// first visible client from the head. Called with the slot a removed client
/// used to occupy, so `index` names its former successor.
pub fn next_visible_from(registry: &ClientRegistry, index: usize, hidden: TagMask) -> Option<WindowId> {
    let visible = |id: &&WindowId| {
        registry
            .get(**id)
            .is_some_and(|client| !client.is_hidden(hidden))
    };
    let order = registry.order();
    order
        .iter()
        .skip(index)
        .find(visible)
        .or_else(|| order.iter().find(visible))
        .copied()
}

/// Pan that brings a client to the top-left corner of the usable area, or
/// `None` when the client is already on screen.
pub fn autopan_vector(
    geometry: &Geometry,
    screen: Screen,
    gap: i32,
    top_offset: i32,
) -> Option<(f64, f64)> {
    if is_onscreen(geometry, screen) {
        return None;
    }
    Some((
        -geometry.x + f64::from(gap),
        -geometry.y + f64::from(top_offset + gap),
    ))
}
