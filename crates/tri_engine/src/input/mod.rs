//! Input management system
//!
//! Input is polled, not event driven: once per frame [`InputState::process`]
//! samples the keys the engine cares about from the window.

use crate::render::window::WindowBackend;

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// Q key
    Q,
    /// S key
    S,
    /// W key
    W,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
}

/// Sampled state of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyState {
    /// Held down (including auto-repeat)
    Pressed,
    /// Not held
    #[default]
    Released,
}

/// Per-frame input sampling
///
/// Maps exactly one key, [`KeyCode::Escape`], to a close request on the
/// window. Every other key is ignored.
#[derive(Debug, Default)]
pub struct InputState {
    escape: KeyState,
}

impl InputState {
    /// The key that requests the window to close
    pub const CLOSE_KEY: KeyCode = KeyCode::Escape;

    /// Create a new input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the keyboard and act on it
    ///
    /// Returns true if this call set the window's close flag.
    pub fn process<W: WindowBackend + ?Sized>(&mut self, window: &mut W) -> bool {
        self.escape = window.key_state(Self::CLOSE_KEY);

        if self.escape == KeyState::Pressed {
            log::debug!("{:?} pressed, requesting window close", Self::CLOSE_KEY);
            window.set_should_close(true);
            return true;
        }

        false
    }

    /// State of the close key as of the last [`InputState::process`]
    pub fn close_key_state(&self) -> KeyState {
        self.escape
    }
}
