//! mac-keycode: Virtual keycodes, characters, and modifier state for macOS.
//!
//! - `Key`: Enum of the printable US-ANSI keys, assigned the exact `kVK_*`
//!   hardware codes from the SDK HIToolbox header. The enum is `repr(u16)`.
//! - Codec helpers: [`character_for`] and [`key_code_for`] translate between
//!   scancodes and the lowercase characters printed on the keycaps.
//! - [`ModifierState`]: the decoded form of a CoreGraphics flag word. Raw
//!   bits are read here and nowhere else.

mod key;
pub use key::Key;

mod modifiers;
pub use modifiers::{CommandSide, ModifierSet, ModifierState};

mod scancode;
pub use scancode::{Scancode, character_for, key_code_for};
