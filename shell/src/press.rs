//! Which control each held pointer, finger or key is pressing.
//!
//! A release ends the control its own press began, wherever the release
//! lands, so one source can never release (or strand) another's control.

use std::collections::HashMap;
use std::hash::Hash;

use crate::layout::Control;

#[derive(Debug)]
pub struct HeldControls<K> {
    held: HashMap<K, Control>,
}

impl<K: Eq + Hash + Copy> HeldControls<K> {
    pub fn new() -> Self {
        Self {
            held: HashMap::new(),
        }
    }

    /// Record that `source` pressed `control`. Returns the control the same
    /// source was still holding, if any; the caller should end it.
    pub fn begin(&mut self, source: K, control: Control) -> Option<Control> {
        self.held.insert(source, control)
    }

    /// `source` was released. Returns the control it was holding.
    pub fn end(&mut self, source: K) -> Option<Control> {
        self.held.remove(&source)
    }

    /// Release everything, e.g. when the window loses focus and the matching
    /// release events will never arrive.
    pub fn end_all(&mut self) -> Vec<(K, Control)> {
        self.held.drain().collect()
    }

    pub fn holding(&self, source: K) -> Option<Control> {
        self.held.get(&source).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

impl<K: Eq + Hash + Copy> Default for HeldControls<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zpaceway_core::input::Button;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Source {
        Mouse(u8),
        Finger(i64),
    }

    const A: Control = Control::Button(Button::A);
    const B: Control = Control::Button(Button::B);

    #[test]
    fn each_source_releases_its_own_control() {
        let mut held = HeldControls::new();
        assert_eq!(held.begin(Source::Mouse(1), A), None);
        assert_eq!(held.begin(Source::Mouse(3), B), None);

        assert_eq!(held.end(Source::Mouse(3)), Some(B));
        assert_eq!(held.end(Source::Mouse(1)), Some(A));
        assert!(held.is_empty());
    }

    #[test]
    fn release_without_press_is_nothing() {
        let mut held: HeldControls<Source> = HeldControls::new();
        assert_eq!(held.end(Source::Finger(7)), None);
    }

    #[test]
    fn repeated_begin_hands_back_previous_control() {
        let mut held = HeldControls::new();
        held.begin(Source::Finger(1), A);
        assert_eq!(held.begin(Source::Finger(1), B), Some(A));
        assert_eq!(held.holding(Source::Finger(1)), Some(B));
    }

    #[test]
    fn end_all_drains_every_source() {
        let mut held = HeldControls::new();
        held.begin(Source::Mouse(1), A);
        held.begin(Source::Finger(4), B);
        held.begin(Source::Finger(5), Control::Load);

        let mut released = held.end_all();
        released.sort_by_key(|(source, _)| format!("{source:?}"));
        assert_eq!(
            released,
            vec![
                (Source::Finger(4), B),
                (Source::Finger(5), Control::Load),
                (Source::Mouse(1), A),
            ]
        );
        assert!(held.is_empty());
        assert!(held.end_all().is_empty());
    }
}
