//! The seams between the machine and its host, plus the keypad state
//! the machine owns.

use crate::{definitions::keypad, screen::Screen};

/// A key event, already translated by the host from whatever physical
/// input it reads into one of the sixteen logical key indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(usize),
    Up(usize),
}

/// Where finished frames go.
#[cfg_attr(test, mockall::automock)]
pub trait FrameSink {
    /// Called after every step that changed the display.
    fn present(&mut self, screen: &Screen);
}

/// Where key events come from.
#[cfg_attr(test, mockall::automock)]
pub trait KeySource {
    /// The next pending event, if any.
    fn poll(&mut self) -> Option<KeyEvent>;
}

/// The audio tone switch, flipped on the edges of the sound timer.
#[cfg_attr(test, mockall::automock)]
pub trait Buzzer {
    fn start(&mut self);
    fn stop(&mut self);
}

/// The sixteen boolean key states.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; keypad::COUNT],
}

impl Keypad {
    pub(crate) fn press(&mut self, key: usize) {
        debug_assert!(key < self.keys.len());
        self.keys[key] = true;
    }

    pub(crate) fn release(&mut self, key: usize) {
        debug_assert!(key < self.keys.len());
        self.keys[key] = false;
    }

    /// The state of a single key.
    pub fn is_pressed(&self, key: usize) -> bool {
        self.keys[key]
    }

    /// All key states at once.
    pub fn keys(&self) -> &[bool; keypad::COUNT] {
        &self.keys
    }
}
