//! A window manager for X11 that keeps every window on one large canvas.
//! The screen is a viewport onto that canvas; it can be panned, zoomed and
//! bookmarked, and tags select which windows are shown.

pub mod actions;
pub mod checkpoint;
pub mod client;
pub mod colors;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod event_loop;
pub mod focus;
pub mod geometry;
pub mod keybindings;
pub mod layout;
pub mod panel;
pub mod process;
pub mod runner;
pub mod state;
pub mod status;
pub mod tags;
pub mod theme;
pub mod tracing_sub;
pub mod window;
