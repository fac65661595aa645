//! Shared crate-wide constants.

/// Longest status line accepted from the feed, including the terminating
/// newline. Longer lines are truncated and the remainder discarded.
pub const MAX_STATUS_LINE: usize = 512;

/// Number of checkpoints that exist from startup, keyed `'0'..='5'`.
pub const DEFAULT_CHECKPOINTS: usize = 6;

/// The home checkpoint. It can be recalled but never re-set.
pub const RESERVED_CHECKPOINT: char = '0';

/// Zoom factor applied by one "grow" step of the wheel bindings.
pub const ZOOM_GROW: f64 = 1.1;

/// Zoom factor applied by one "shrink" step of the wheel bindings.
pub const ZOOM_SHRINK: f64 = 0.92;

/// Pixels added to or removed from the tiling bias per adjustment.
pub const BIAS_STEP: i32 = 2;

/// Clients on hidden tags are parked this far past the right screen edge.
pub const HIDDEN_PARK_OFFSET: i32 = 2;

/// Title shown in the bar for a focused client that never set one.
pub const UNNAMED_TITLE: &str = "UNNAMED";

/// Pixels moved by one keyboard pan.
pub const PAN_STEP: i32 = 200;
