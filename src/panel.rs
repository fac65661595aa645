//! Contents of the status bar, computed without touching the window system.
//!
//! The bar reads left to right: the tag strip, a 3x3 overview of where
//! clients sit relative to the screen, the focused client's title and tags,
//! and the status text flushed right. Painting is left to the driver.

use crate::client::{ClientRegistry, WindowId};
use crate::constants::UNNAMED_TITLE;
use crate::geometry::Screen;
use crate::status::StatusSegment;
use crate::tags::{TagMask, TagPolicy};
use crate::theme::ColorRole;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagIndicator {
    pub name: String,
    pub role: ColorRole,
    /// Drawn underlined.
    pub active: bool,
}

/// Occupancy of the nine screen-relative regions, indexed `column * 3 + row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overview {
    pub cells: [bool; 9],
}

impl Overview {
    pub fn occupied(&self, column: usize, row: usize) -> bool {
        self.cells.get(column * 3 + row).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusedTitle {
    pub title: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BarModel {
    pub tags: Vec<TagIndicator>,
    /// Only present while at least one client is managed.
    pub overview: Option<Overview>,
    pub focused: Option<FocusedTitle>,
    pub status: Vec<StatusSegment>,
}

impl BarModel {
    pub fn build(
        clients: &ClientRegistry,
        focus: Option<WindowId>,
        policy: &TagPolicy,
        tag_names: &[String],
        screen: Screen,
        status: &[StatusSegment],
    ) -> Self {
        let mut occupied = TagMask::EMPTY;
        let mut overview = Overview::default();
        for client in clients.iter() {
            occupied |= client.tags;
            let (cx, cy) = client.geometry.center();
            overview.cells[screen.region_index(cx, cy)] = true;
        }

        let tags = tag_names
            .iter()
            .take(policy.count())
            .enumerate()
            .filter(|(i, _)| occupied.contains(*i) || policy.active() == *i)
            .map(|(i, name)| TagIndicator {
                name: name.clone(),
                role: tag_role(i, occupied, policy),
                active: policy.active() == i,
            })
            .collect();

        let focused = focus.and_then(|id| clients.get(id)).map(|client| FocusedTitle {
            title: client
                .title
                .clone()
                .unwrap_or_else(|| UNNAMED_TITLE.to_string()),
            tags: client
                .tags
                .iter(policy.count())
                .filter_map(|i| tag_names.get(i).cloned())
                .collect(),
        });

        Self {
            tags,
            overview: (!clients.is_empty()).then_some(overview),
            focused,
            status: status.to_vec(),
        }
    }
}

/// Urgent beats hidden beats sticky beats occupied.
fn tag_role(tag: usize, occupied: TagMask, policy: &TagPolicy) -> ColorRole {
    if policy.urgent().contains(tag) {
        ColorRole::Urgent
    } else if policy.hidden().contains(tag) {
        ColorRole::Hidden
    } else if policy.sticky().contains(tag) {
        ColorRole::Sticky
    } else if occupied.contains(tag) {
        ColorRole::Normal
    } else {
        ColorRole::Default
    }
}
