//! Gesture-to-button translation.
//!
//! Every gesture family (pointer, touch, keyboard) collapses to the same two
//! edges: begin sets the button's flag, end clears it. Events are applied
//! immediately, with no debouncing or coalescing.

use tracing::trace;
use zpaceway_core::input::{Button, ButtonState};

/// Raw gesture as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    PointerDown,
    PointerUp,
    TouchStart,
    TouchEnd,
    KeyDown,
    KeyUp,
}

/// Logical trigger a gesture maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Begin,
    End,
}

impl Gesture {
    pub fn edge(self) -> Edge {
        match self {
            Gesture::PointerDown | Gesture::TouchStart | Gesture::KeyDown => Edge::Begin,
            Gesture::PointerUp | Gesture::TouchEnd | Gesture::KeyUp => Edge::End,
        }
    }
}

#[derive(Debug, Default)]
pub struct InputBridge {
    applied: u64,
    dropped: u64,
}

impl InputBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `gesture` on `button` to the active session's input record.
    ///
    /// Returns `false` (and changes nothing) when there is no session.
    pub fn apply(&mut self, state: Option<&mut ButtonState>, button: Button, gesture: Gesture) -> bool {
        let Some(state) = state else {
            self.dropped += 1;
            trace!(?button, ?gesture, "gesture with no active session");
            return false;
        };
        let pressed = gesture.edge() == Edge::Begin;
        state.set(button, pressed);
        self.applied += 1;
        true
    }

    /// Gestures applied to a session so far.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Gestures that arrived with no session.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
