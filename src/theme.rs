use crate::colors::Rgb;

// Centralized palette. Everything drawn by the manager (borders, bar text,
// the overview icon) picks its colour by role so the table can be swapped
// in one place.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Background,
    Default,
    Hidden,
    Normal,
    Sticky,
    Urgent,
    Title,
    TagList,
}

impl ColorRole {
    pub const ALL: [ColorRole; 8] = [
        ColorRole::Background,
        ColorRole::Default,
        ColorRole::Hidden,
        ColorRole::Normal,
        ColorRole::Sticky,
        ColorRole::Urgent,
        ColorRole::Title,
        ColorRole::TagList,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgb; 8],
}

impl Palette {
    pub fn new(colors: [Rgb; 8]) -> Self {
        Self { colors }
    }

    pub fn get(&self, role: ColorRole) -> Rgb {
        self.colors[role.index()]
    }

    pub fn set(&mut self, role: ColorRole, color: Rgb) {
        self.colors[role.index()] = color;
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new([
            Rgb::new(0x12, 0x12, 0x12),
            Rgb::new(0x58, 0x58, 0x58),
            Rgb::new(0x2E, 0x86, 0xC1),
            Rgb::new(0xBB, 0xBB, 0xBB),
            Rgb::new(0xD4, 0xA0, 0x17),
            Rgb::new(0xE0, 0x50, 0x50),
            Rgb::new(0xDD, 0xDD, 0xDD),
            Rgb::new(0x7A, 0x9E, 0xBF),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_index_their_own_slot() {
        let mut palette = Palette::default();
        palette.set(ColorRole::Urgent, Rgb::new(1, 2, 3));
        assert_eq!(palette.get(ColorRole::Urgent), Rgb::new(1, 2, 3));
        assert_eq!(palette.get(ColorRole::Background), Rgb::new(0x12, 0x12, 0x12));
        assert_eq!(ColorRole::ALL.len(), 8);
    }
}
