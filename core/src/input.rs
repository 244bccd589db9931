/// One logical handheld button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Button {
    Left,
    Right,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    /// All buttons, directional first, then action, then system.
    pub const ALL: [Button; 8] = [
        Button::Left,
        Button::Right,
        Button::Up,
        Button::Down,
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
    ];

    /// Lower-case name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Button::Left => "left",
            Button::Right => "right",
            Button::Up => "up",
            Button::Down => "down",
            Button::A => "a",
            Button::B => "b",
            Button::Select => "select",
            Button::Start => "start",
        }
    }

    /// Inverse of [`name`](Self::name), case-insensitive.
    pub fn from_name(name: &str) -> Option<Button> {
        Button::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(name))
    }
}

/// Pressed/released flags for every button, as read by the engine each frame.
///
/// All flags start released. Writes are idempotent: setting a flag to the
/// value it already holds changes nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub a: bool,
    pub b: bool,
    pub select: bool,
    pub start: bool,
}

impl ButtonState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, button: Button, pressed: bool) {
        *self.flag_mut(button) = pressed;
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        match button {
            Button::Left => self.left,
            Button::Right => self.right,
            Button::Up => self.up,
            Button::Down => self.down,
            Button::A => self.a,
            Button::B => self.b,
            Button::Select => self.select,
            Button::Start => self.start,
        }
    }

    /// Release every button.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Buttons currently held, in [`Button::ALL`] order.
    pub fn pressed(&self) -> impl Iterator<Item = Button> + '_ {
        Button::ALL.into_iter().filter(|&b| self.is_pressed(b))
    }

    fn flag_mut(&mut self, button: Button) -> &mut bool {
        match button {
            Button::Left => &mut self.left,
            Button::Right => &mut self.right,
            Button::Up => &mut self.up,
            Button::Down => &mut self.down,
            Button::A => &mut self.a,
            Button::B => &mut self.b,
            Button::Select => &mut self.select,
            Button::Start => &mut self.start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_released() {
        let state = ButtonState::new();
        assert_eq!(state.pressed().count(), 0);
    }

    #[test]
    fn set_touches_only_its_own_flag() {
        let mut state = ButtonState::new();
        state.set(Button::Select, true);
        for button in Button::ALL {
            assert_eq!(state.is_pressed(button), button == Button::Select);
        }
        assert!(state.select);
    }

    #[test]
    fn repeated_writes_are_idempotent() {
        let mut state = ButtonState::new();
        state.set(Button::A, true);
        state.set(Button::A, true);
        assert!(state.a);
        state.set(Button::A, false);
        state.set(Button::A, false);
        assert_eq!(state, ButtonState::default());
    }

    #[test]
    fn clear_releases_everything() {
        let mut state = ButtonState::new();
        for button in Button::ALL {
            state.set(button, true);
        }
        state.clear();
        assert_eq!(state, ButtonState::default());
    }

    #[test]
    fn names_round_trip_case_insensitively() {
        for button in Button::ALL {
            assert_eq!(Button::from_name(button.name()), Some(button));
        }
        assert_eq!(Button::from_name("START"), Some(Button::Start));
        assert_eq!(Button::from_name("turbo"), None);
    }
}
