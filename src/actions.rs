use std::fmt;

use crate::focus::CycleMode;
use crate::layout::LayoutKind;
use crate::tags::TagConfigOp;

/// Everything a key or button binding can trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Spawn(String),
    /// Politely close the focused client.
    Kill,
    Quit,
    Cycle(CycleMode),
    CycleLayout,
    Tile(LayoutKind),
    Monocle,
    IncreaseBias,
    DecreaseBias,
    /// Switch the active tag (0-based).
    Tag(usize),
    /// Flip one tag bit on the focused client.
    ToggleTag(usize),
    TagConfig(TagConfigOp),
    /// Recall a checkpoint; `None` captures the key from the next key press.
    Checkpoint(Option<char>),
    SetCheckpoint(Option<char>),
    Pan {
        dx: i32,
        dy: i32,
    },
    Maximize,
    // Pointer bindings
    WindowMove,
    WindowResize,
    WindowGrow,
    WindowShrink,
    DesktopMove,
    DesktopGrow,
    DesktopShrink,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Spawn(cmd) => write!(f, "Spawn `{}`", cmd),
            Action::Kill => write!(f, "Close window"),
            Action::Quit => write!(f, "Quit"),
            Action::Cycle(mode) => write!(f, "Cycle focus ({})", mode),
            Action::CycleLayout => write!(f, "Cycle layout"),
            Action::Tile(kind) => write!(f, "Tile ({})", kind),
            Action::Monocle => write!(f, "Monocle"),
            Action::IncreaseBias => write!(f, "Increase tiling bias"),
            Action::DecreaseBias => write!(f, "Decrease tiling bias"),
            Action::Tag(tag) => write!(f, "Show tag {}", tag + 1),
            Action::ToggleTag(tag) => write!(f, "Toggle tag {}", tag + 1),
            Action::TagConfig(op) => write!(f, "Tag config ({:?})", op),
            Action::Checkpoint(Some(key)) => write!(f, "Recall checkpoint {}", key),
            Action::Checkpoint(None) => write!(f, "Recall checkpoint (ask)"),
            Action::SetCheckpoint(Some(key)) => write!(f, "Set checkpoint {}", key),
            Action::SetCheckpoint(None) => write!(f, "Set checkpoint (ask)"),
            Action::Pan { dx, dy } => write!(f, "Pan by ({}, {})", dx, dy),
            Action::Maximize => write!(f, "Maximize window"),
            Action::WindowMove => write!(f, "Move window"),
            Action::WindowResize => write!(f, "Resize window"),
            Action::WindowGrow => write!(f, "Grow window"),
            Action::WindowShrink => write!(f, "Shrink window"),
            Action::DesktopMove => write!(f, "Move desktop"),
            Action::DesktopGrow => write!(f, "Zoom desktop in"),
            Action::DesktopShrink => write!(f, "Zoom desktop out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_one_based_for_tags() {
        assert_eq!(Action::Tag(0).to_string(), "Show tag 1");
        assert_eq!(
            Action::Cycle(CycleMode::SameTags).to_string(),
            "Cycle focus (same-tags)"
        );
    }
}
