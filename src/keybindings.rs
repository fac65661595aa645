use std::fmt;

pub use crate::actions::Action;
use crate::constants::PAN_STEP;
use crate::focus::CycleMode;
use crate::layout::LayoutKind;
use crate::tags::TagConfigOp;

/// Core protocol modifier masks.
pub mod modifiers {
    pub const SHIFT: u16 = 1 << 0;
    pub const LOCK: u16 = 1 << 1;
    pub const CONTROL: u16 = 1 << 2;
    pub const MOD1: u16 = 1 << 3;
    pub const MOD2: u16 = 1 << 4;
    pub const MOD4: u16 = 1 << 6;
    pub const NONE: u16 = 0;
}

/// Keysyms used by the default bindings.
pub mod keysyms {
    pub const SPACE: u32 = 0x0020;
    pub const DIGIT_0: u32 = 0x0030;
    pub const LETTER_A: u32 = 0x0061;
    pub const RETURN: u32 = 0xff0d;
    pub const TAB: u32 = 0xff09;
    pub const LEFT: u32 = 0xff51;
    pub const UP: u32 = 0xff52;
    pub const RIGHT: u32 = 0xff53;
    pub const DOWN: u32 = 0xff54;

    pub const fn letter(c: u8) -> u32 {
        LETTER_A + (c - b'a') as u32
    }

    pub const fn digit(d: u8) -> u32 {
        DIGIT_0 + d as u32
    }
}

/// Strip Lock and NumLock (Mod2) plus the button state bits so bindings
/// match regardless of those toggles.
pub fn normalize_modifiers(state: u16) -> u16 {
    state & !(modifiers::LOCK | modifiers::MOD2) & 0xff
}

/// Character a keysym types, if it is printable Latin-1.
pub fn keysym_char(keysym: u32) -> Option<char> {
    match keysym {
        0x21..=0x7e | 0xa1..=0xff => char::from_u32(keysym),
        _ => None,
    }
}

fn modifier_names(mods: u16) -> Vec<&'static str> {
    let mut parts = Vec::new();
    if mods & modifiers::MOD4 != 0 {
        parts.push("Super");
    }
    if mods & modifiers::CONTROL != 0 {
        parts.push("Ctrl");
    }
    if mods & modifiers::MOD1 != 0 {
        parts.push("Alt");
    }
    if mods & modifiers::SHIFT != 0 {
        parts.push("Shift");
    }
    parts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub keysym: u32,
    pub mods: u16,
}

impl KeyCombo {
    pub fn new(keysym: u32, mods: u16) -> Self {
        Self { keysym, mods }
    }

    pub fn matches(&self, keysym: u32, state: u16) -> bool {
        self.keysym == keysym && self.mods == normalize_modifiers(state)
    }

    pub fn display(&self) -> String {
        let mut parts: Vec<String> = modifier_names(self.mods)
            .into_iter()
            .map(str::to_string)
            .collect();
        let key = match self.keysym {
            keysyms::RETURN => "Return".to_string(),
            keysyms::TAB => "Tab".to_string(),
            keysyms::SPACE => "Space".to_string(),
            keysyms::LEFT => "Left".to_string(),
            keysyms::RIGHT => "Right".to_string(),
            keysyms::UP => "Up".to_string(),
            keysyms::DOWN => "Down".to_string(),
            other => match keysym_char(other) {
                Some(c) => c.to_ascii_uppercase().to_string(),
                None => format!("{:#x}", other),
            },
        };
        parts.push(key);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonCombo {
    pub button: u8,
    pub mods: u16,
}

impl ButtonCombo {
    pub fn new(button: u8, mods: u16) -> Self {
        Self { button, mods }
    }

    pub fn matches(&self, button: u8, state: u16) -> bool {
        self.button == button && self.mods == normalize_modifiers(state)
    }
}

impl fmt::Display for ButtonCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = modifier_names(self.mods).join("+");
        if !parts.is_empty() {
            parts.push('+');
        }
        write!(f, "{}Button{}", parts, self.button)
    }
}

/// Keyboard binding table, scanned in order. Every matching entry fires.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    entries: Vec<(KeyCombo, Action)>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, combo: KeyCombo, action: Action) {
        self.entries.push((combo, action));
    }

    pub fn actions_for(&self, keysym: u32, state: u16) -> Vec<Action> {
        self.entries
            .iter()
            .filter(|(combo, _)| combo.matches(keysym, state))
            .map(|(_, action)| action.clone())
            .collect()
    }

    pub fn combos(&self) -> impl Iterator<Item = KeyCombo> + '_ {
        self.entries.iter().map(|(combo, _)| *combo)
    }

    pub fn help_entries(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(combo, action)| (combo.display(), action.to_string()))
            .collect()
    }

    /// Compiled-in key table. `tag_count` limits the digit bindings.
    pub fn defaults(tag_count: usize) -> Self {
        use keysyms::{digit, letter};
        use modifiers::{MOD1, MOD4, SHIFT};

        let mut kb = Self::new();
        let mut bind = |keysym: u32, mods: u16, action: Action| {
            kb.add(KeyCombo::new(keysym, mods), action);
        };

        bind(keysyms::RETURN, MOD4, Action::Spawn("xterm".to_string()));
        bind(letter(b'p'), MOD4, Action::Spawn("dmenu_run".to_string()));
        bind(letter(b'q'), MOD4, Action::Kill);
        bind(letter(b'q'), MOD4 | SHIFT, Action::Quit);
        // Focus
        bind(keysyms::TAB, MOD4, Action::Cycle(CycleMode::Visible));
        bind(keysyms::TAB, MOD4 | SHIFT, Action::Cycle(CycleMode::All));
        bind(letter(b's'), MOD4, Action::Cycle(CycleMode::Onscreen));
        bind(letter(b't'), MOD4, Action::Cycle(CycleMode::SameTags));
        // Layouts
        bind(keysyms::SPACE, MOD4, Action::CycleLayout);
        bind(letter(b'm'), MOD4, Action::Monocle);
        bind(letter(b'f'), MOD4, Action::Tile(LayoutKind::Flow));
        bind(letter(b'b'), MOD4, Action::Tile(LayoutKind::VerticalStack));
        bind(letter(b'r'), MOD4, Action::Tile(LayoutKind::HorizontalStack));
        bind(letter(b'w'), MOD4, Action::Tile(LayoutKind::MasterStack));
        bind(letter(b'i'), MOD4, Action::IncreaseBias);
        bind(letter(b'd'), MOD4, Action::DecreaseBias);
        bind(letter(b'z'), MOD4, Action::Maximize);
        // Tags
        for tag in 0..tag_count.min(9) {
            let key = digit(tag as u8 + 1);
            bind(key, MOD4, Action::Tag(tag));
            bind(key, MOD4 | SHIFT, Action::ToggleTag(tag));
        }
        bind(letter(b'h'), MOD4, Action::TagConfig(TagConfigOp::Hide));
        bind(letter(b's'), MOD4 | SHIFT, Action::TagConfig(TagConfigOp::Stick));
        bind(letter(b'n'), MOD4, Action::TagConfig(TagConfigOp::Normal));
        bind(letter(b'b'), MOD4 | SHIFT, Action::TagConfig(TagConfigOp::ToggleBar));
        bind(
            letter(b'm'),
            MOD4 | SHIFT,
            Action::TagConfig(TagConfigOp::ToggleBarPosition),
        );
        bind(letter(b'o'), MOD4, Action::TagConfig(TagConfigOp::Isolate));
        // Checkpoints
        bind(letter(b'c'), MOD4, Action::Checkpoint(None));
        bind(letter(b'c'), MOD4 | SHIFT, Action::SetCheckpoint(None));
        for d in 0..=5u8 {
            bind(digit(d), MOD1, Action::Checkpoint(Some(char::from(b'0' + d))));
        }
        // Panning
        let step = PAN_STEP;
        bind(keysyms::LEFT, MOD4, Action::Pan { dx: step, dy: 0 });
        bind(keysyms::RIGHT, MOD4, Action::Pan { dx: -step, dy: 0 });
        bind(keysyms::UP, MOD4, Action::Pan { dx: 0, dy: step });
        bind(keysyms::DOWN, MOD4, Action::Pan { dx: 0, dy: -step });
        kb
    }
}

pub const BUTTON_LEFT: u8 = 1;
pub const BUTTON_RIGHT: u8 = 3;
pub const WHEEL_UP: u8 = 4;
pub const WHEEL_DOWN: u8 = 5;

/// Pointer binding table.
#[derive(Debug, Clone, Default)]
pub struct ButtonBindings {
    entries: Vec<(ButtonCombo, Action)>,
}

impl ButtonBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, combo: ButtonCombo, action: Action) {
        self.entries.push((combo, action));
    }

    pub fn actions_for(&self, button: u8, state: u16) -> Vec<Action> {
        self.entries
            .iter()
            .filter(|(combo, _)| combo.matches(button, state))
            .map(|(_, action)| action.clone())
            .collect()
    }

    pub fn combos(&self) -> impl Iterator<Item = ButtonCombo> + '_ {
        self.entries.iter().map(|(combo, _)| *combo)
    }

    pub fn help_entries(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(combo, action)| (combo.to_string(), action.to_string()))
            .collect()
    }

    pub fn defaults() -> Self {
        use modifiers::{MOD4, SHIFT};

        let mut bb = Self::new();
        bb.add(ButtonCombo::new(BUTTON_LEFT, MOD4), Action::WindowMove);
        bb.add(ButtonCombo::new(BUTTON_RIGHT, MOD4), Action::WindowResize);
        bb.add(ButtonCombo::new(WHEEL_UP, MOD4), Action::WindowGrow);
        bb.add(ButtonCombo::new(WHEEL_DOWN, MOD4), Action::WindowShrink);
        bb.add(ButtonCombo::new(BUTTON_LEFT, MOD4 | SHIFT), Action::DesktopMove);
        bb.add(ButtonCombo::new(WHEEL_UP, MOD4 | SHIFT), Action::DesktopGrow);
        bb.add(ButtonCombo::new(WHEEL_DOWN, MOD4 | SHIFT), Action::DesktopShrink);
        bb
    }
}
