//! Compiled-in configuration.
//!
//! Everything here is fixed once the manager starts. The command line can
//! override a handful of tunables before the [`Config`] is handed over.

use crate::layout::LayoutKind;
use crate::theme::Palette;

#[derive(Debug, Clone)]
pub struct Config {
    /// Gap left around tiled clients.
    pub gap: i32,
    pub border_width: i32,
    /// Smallest size a client is ever shown at.
    pub win_min: i32,
    /// Smallest size zooming can shrink a client to.
    pub zoom_min: i32,
    /// Pixels per frame of an animated pan.
    pub animation_step: i32,
    pub animations: bool,
    pub focus_follows_mouse: bool,
    /// Pan the canvas so a newly focused, off-screen client becomes visible.
    pub scroll_to_focused: bool,
    pub show_bar: bool,
    pub top_bar: bool,
    /// Draw the focused client's border in the highlight colour.
    pub highlight_focused: bool,
    /// Core font used to draw the bar.
    pub font: String,
    pub tag_names: Vec<String>,
    pub layouts: Vec<LayoutKind>,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gap: 4,
            border_width: 1,
            win_min: 50,
            zoom_min: 20,
            animation_step: 40,
            animations: true,
            focus_follows_mouse: false,
            scroll_to_focused: true,
            show_bar: true,
            top_bar: true,
            highlight_focused: true,
            font: "fixed".to_string(),
            tag_names: ["term", "web", "code", "chat", "media"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            layouts: vec![
                LayoutKind::MasterStack,
                LayoutKind::VerticalStack,
                LayoutKind::HorizontalStack,
                LayoutKind::Flow,
            ],
            palette: Palette::default(),
        }
    }
}

impl Config {
    pub fn tag_count(&self) -> usize {
        self.tag_names.len().clamp(1, 32)
    }

    /// Step handed to the pan animation. Zero disables stepping.
    pub fn pan_step(&self) -> f64 {
        if self.animations {
            f64::from(self.animation_step.max(0))
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.tag_count(), 5);
        assert_eq!(config.layouts.first(), Some(&LayoutKind::MasterStack));
        assert_eq!(config.pan_step(), 40.0);
    }

    #[test]
    fn disabling_animations_zeroes_step() {
        let config = Config {
            animations: false,
            ..Config::default()
        };
        assert_eq!(config.pan_step(), 0.0);
    }
}
