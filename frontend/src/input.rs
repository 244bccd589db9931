use std::collections::HashMap;

use sdl2::keyboard::Scancode;
use tracing::warn;
use zpaceway_core::input::Button;
use zpaceway_shell::config::InputConfig;

/// Maps SDL scancodes to handheld buttons.
pub struct KeyMap {
    map: HashMap<Scancode, Button>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Bind a scancode to a button.
    pub fn bind(&mut self, scancode: Scancode, button: Button) {
        self.map.insert(scancode, button);
    }

    /// Look up the button for a scancode.
    pub fn get(&self, scancode: Scancode) -> Option<Button> {
        self.map.get(&scancode).copied()
    }

    /// Build from the `[input.keys]` table. Key names are SDL scancode
    /// names ("Left", "X", "Return", ...); unknown ones are skipped.
    pub fn from_config(config: &InputConfig) -> Self {
        let mut km = Self::new();
        for (button, key) in config.bindings() {
            match Scancode::from_name(key) {
                Some(sc) => km.bind(sc, button),
                None => warn!(key, button = button.name(), "unknown key name in config"),
            }
        }
        km
    }
}
