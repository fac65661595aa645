mod window_manager;

use crate::client::WindowId;
use crate::colors::Rgb;
use crate::geometry::ScreenRect;
use crate::panel::BarModel;

pub use window_manager::WindowManager;

/// Side effect the manager wants applied to the window system. The manager
/// never talks to the display itself; the runner drains these after every
/// event and hands them to the driver in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Map(WindowId),
    SetBorderWidth(WindowId, u32),
    MoveResize(WindowId, ScreenRect),
    /// Reposition without touching the size.
    Move(WindowId, i32, i32),
    Raise(WindowId),
    Focus(WindowId),
    SetBorderColor(WindowId, Rgb),
    /// Ask the client to close, killing it if it does not speak
    /// `WM_DELETE_WINDOW`.
    Close(WindowId),
    GrabKeyboard,
    UngrabKeyboard,
    GrabPointer,
    UngrabPointer,
    PlaceBar {
        y: i32,
    },
    RaiseBar,
    DrawBar(BarModel),
    Spawn(String),
}

impl Request {
    /// Client the request targets, if any.
    pub fn window(&self) -> Option<WindowId> {
        match self {
            Request::Map(w)
            | Request::SetBorderWidth(w, _)
            | Request::MoveResize(w, _)
            | Request::Move(w, _, _)
            | Request::Raise(w)
            | Request::Focus(w)
            | Request::SetBorderColor(w, _)
            | Request::Close(w) => Some(*w),
            _ => None,
        }
    }
}
