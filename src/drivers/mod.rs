pub mod headless;
pub mod x11;

use std::os::fd::RawFd;

use thiserror::Error;

use crate::client::WindowId;
use crate::geometry::Screen;
use crate::keybindings::{ButtonBindings, KeyBindings};
use crate::window::Request;

/// Attributes of a window asking to be mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAttributes {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub override_redirect: bool,
}

/// Window-system events, already decoded into what the manager cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum WmEvent {
    /// `attributes` is `None` when the attribute query failed.
    MapRequest {
        window: WindowId,
        attributes: Option<WindowAttributes>,
        title: Option<String>,
    },
    Destroy {
        window: WindowId,
    },
    Unmap {
        window: WindowId,
        /// Sent by the client itself rather than caused by us.
        synthetic: bool,
    },
    TitleChanged {
        window: WindowId,
        title: Option<String>,
    },
    UrgencyChanged {
        window: WindowId,
        urgent: bool,
    },
    ButtonPress {
        /// Child of the root the press landed in, if any.
        window: Option<WindowId>,
        button: u8,
        state: u16,
        root_x: i32,
        root_y: i32,
    },
    ButtonRelease,
    Motion {
        root_x: i32,
        root_y: i32,
    },
    KeyPress {
        keysym: u32,
        state: u16,
    },
    Expose,
    Enter {
        window: WindowId,
    },
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("cannot open display: {0}")]
    Connect(String),
    #[error("connection to the display was lost: {0}")]
    Connection(String),
    #[error("request failed: {0}")]
    Reply(String),
    #[error("ran out of resource ids: {0}")]
    IdExhausted(String),
    #[error("another window manager is already running")]
    AnotherWmRunning,
}

/// Everything the runner needs from a window system.
pub trait WindowSystem {
    fn screen(&self) -> Screen;
    /// Height of the bar window, derived from the bar font.
    fn bar_height(&self) -> i32;
    /// Descriptor to poll for incoming events. `None` means events are only
    /// ever already queued.
    fn raw_fd(&self) -> Option<RawFd>;
    /// Next event that is already available, without blocking.
    fn poll_event(&mut self) -> Result<Option<WmEvent>, DriverError>;
    fn apply(&mut self, request: Request) -> Result<(), DriverError>;
    fn grab_bindings(&mut self, keys: &KeyBindings, buttons: &ButtonBindings)
    -> Result<(), DriverError>;
    fn flush(&mut self) -> Result<(), DriverError>;
}

impl<T: WindowSystem + ?Sized> WindowSystem for &mut T {
    fn screen(&self) -> Screen {
        (**self).screen()
    }

    fn bar_height(&self) -> i32 {
        (**self).bar_height()
    }

    fn raw_fd(&self) -> Option<RawFd> {
        (**self).raw_fd()
    }

    fn poll_event(&mut self) -> Result<Option<WmEvent>, DriverError> {
        (**self).poll_event()
    }

    fn apply(&mut self, request: Request) -> Result<(), DriverError> {
        (**self).apply(request)
    }

    fn grab_bindings(
        &mut self,
        keys: &KeyBindings,
        buttons: &ButtonBindings,
    ) -> Result<(), DriverError> {
        (**self).grab_bindings(keys, buttons)
    }

    fn flush(&mut self) -> Result<(), DriverError> {
        (**self).flush()
    }
}
