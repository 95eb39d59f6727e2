//! Scancodes (macOS hardware virtual keycodes) and character conversions.
//!
//! A "scancode" in this crate refers to the macOS hardware virtual keycode:
//! - The integer reported by `NSEvent.keyCode` and by CoreGraphics in the
//!   `kCGKeyboardEventKeycode` field.
//! - The set of constants prefixed `kVK_` in the SDK header
//!   `HIToolbox/Events.h`.
//! - A layout-independent, positional identifier for a physical key. The
//!   characters this crate attaches to it are those of the US-ANSI layout.

use crate::Key;

/// macOS hardware virtual keycode (`kVK_*`, `NSEvent.keyCode`).
pub type Scancode = u16;

impl TryFrom<Scancode> for Key {
    type Error = ();
    fn try_from(value: Scancode) -> Result<Self, Self::Error> {
        Self::from_scancode(value).ok_or(())
    }
}

impl From<Key> for Scancode {
    fn from(k: Key) -> Self {
        k as u16
    }
}

impl Key {
    /// Looks up a `Key` from a macOS scancode (hardware virtual keycode).
    pub fn from_scancode(sc: Scancode) -> Option<Self> {
        Self::from_keycode(sc)
    }

    /// Returns the scancode (`kVK_*`) for this key.
    pub const fn scancode(self) -> Scancode {
        self as u16
    }
}

/// The lowercase character for a scancode, if the key is printable.
pub fn character_for(sc: Scancode) -> Option<char> {
    Key::from_scancode(sc).map(Key::to_char)
}

/// The scancode for a character. Uppercase letters are folded first.
pub fn key_code_for(c: char) -> Option<Scancode> {
    Key::from_char(c).map(Key::scancode)
}
