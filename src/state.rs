use crate::layout::floating::PointerDrag;

/// Checkpoint operation waiting for its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingCheckpoint {
    Recall,
    Set,
}

/// Dispatcher mode. While a checkpoint key is awaited the keyboard is
/// grabbed and every other event is held back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    AwaitingCheckpointKey(PendingCheckpoint),
}

/// What a pointer drag currently manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerMode {
    #[default]
    Off,
    WindowMove,
    WindowResize,
    DesktopMove,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchState {
    input: InputMode,
    pointer: PointerMode,
    drag: Option<PointerDrag>,
}

impl DispatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_mode(&self) -> InputMode {
        self.input
    }

    pub fn awaiting_key(&self) -> bool {
        matches!(self.input, InputMode::AwaitingCheckpointKey(_))
    }

    pub fn begin_capture(&mut self, op: PendingCheckpoint) {
        self.input = InputMode::AwaitingCheckpointKey(op);
    }

    /// Leave capture mode, returning the operation that was pending.
    pub fn finish_capture(&mut self) -> Option<PendingCheckpoint> {
        match std::mem::take(&mut self.input) {
            InputMode::AwaitingCheckpointKey(op) => Some(op),
            InputMode::Normal => None,
        }
    }

    pub fn pointer_mode(&self) -> PointerMode {
        self.pointer
    }

    pub fn begin_drag(&mut self, mode: PointerMode, x: i32, y: i32) {
        self.pointer = mode;
        self.drag = Some(PointerDrag::new(x, y));
    }

    /// Press position seeds the drag origin even when no drag starts, so
    /// wheel zooms centre on the pointer.
    pub fn set_origin(&mut self, x: i32, y: i32) {
        self.drag = Some(PointerDrag::new(x, y));
    }

    pub fn origin(&self) -> Option<(i32, i32)> {
        self.drag.map(|d| d.origin())
    }

    pub fn drag_motion(&mut self, x: i32, y: i32) -> Option<(f64, f64)> {
        if self.pointer == PointerMode::Off {
            return None;
        }
        self.drag.as_mut().map(|d| d.motion(x, y))
    }

    pub fn end_drag(&mut self) {
        self.pointer = PointerMode::Off;
    }
}
