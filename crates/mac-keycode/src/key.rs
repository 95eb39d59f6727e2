//! Printable keys of the US-ANSI layout and their hardware codes.

/// Central table of `Key` variant, `kVK_*` value, and printed character.
macro_rules! key_table {
    ($m:ident) => {
        $m! {
            A = 0x00 => 'a',
            S = 0x01 => 's',
            D = 0x02 => 'd',
            F = 0x03 => 'f',
            H = 0x04 => 'h',
            G = 0x05 => 'g',
            Z = 0x06 => 'z',
            X = 0x07 => 'x',
            C = 0x08 => 'c',
            V = 0x09 => 'v',
            B = 0x0B => 'b',
            Q = 0x0C => 'q',
            W = 0x0D => 'w',
            E = 0x0E => 'e',
            R = 0x0F => 'r',
            Y = 0x10 => 'y',
            T = 0x11 => 't',
            Digit1 = 0x12 => '1',
            Digit2 = 0x13 => '2',
            Digit3 = 0x14 => '3',
            Digit4 = 0x15 => '4',
            Digit6 = 0x16 => '6',
            Digit5 = 0x17 => '5',
            Equal = 0x18 => '=',
            Digit9 = 0x19 => '9',
            Digit7 = 0x1A => '7',
            Minus = 0x1B => '-',
            Digit8 = 0x1C => '8',
            Digit0 = 0x1D => '0',
            RightBracket = 0x1E => ']',
            O = 0x1F => 'o',
            U = 0x20 => 'u',
            LeftBracket = 0x21 => '[',
            I = 0x22 => 'i',
            P = 0x23 => 'p',
            L = 0x25 => 'l',
            J = 0x26 => 'j',
            Quote = 0x27 => '\'',
            K = 0x28 => 'k',
            Semicolon = 0x29 => ';',
            Backslash = 0x2A => '\\',
            Comma = 0x2B => ',',
            Slash = 0x2C => '/',
            N = 0x2D => 'n',
            M = 0x2E => 'm',
            Period = 0x2F => '.',
            Grave = 0x32 => '`',
        }
    };
}

/// Expand the table into the `Key` enum and its lookup functions.
macro_rules! define_keys {
    ( $( $k:ident = $code:literal => $ch:literal, )* ) => {
        /// A printable key identified by its macOS virtual keycode.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        #[allow(missing_docs)]
        pub enum Key {
            $( $k = $code, )*
        }

        impl Key {
            /// Every key in the table, in hardware-code order.
            pub const ALL: &'static [Self] = &[ $( Self::$k, )* ];

            /// The variant name, e.g. `"Digit1"` or `"Comma"`.
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$k => stringify!($k), )*
                }
            }

            /// The unshifted character printed on this key.
            pub const fn to_char(self) -> char {
                match self {
                    $( Self::$k => $ch, )*
                }
            }

            /// Look up a key from a hardware virtual keycode.
            pub const fn from_keycode(code: u16) -> Option<Self> {
                match code {
                    $( $code => Some(Self::$k), )*
                    _ => None,
                }
            }

            /// Look up the key that prints `c`. Letters match case-insensitively.
            pub fn from_char(c: char) -> Option<Self> {
                match c.to_ascii_lowercase() {
                    $( $ch => Some(Self::$k), )*
                    _ => None,
                }
            }
        }
    };
}

key_table!(define_keys);

impl Key {
    /// True for the 26 letter keys.
    pub fn is_letter(self) -> bool {
        self.to_char().is_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn table_is_a_bijection() {
        assert_eq!(Key::ALL.len(), 47);
        let codes: HashSet<u16> = Key::ALL.iter().map(|k| *k as u16).collect();
        let chars: HashSet<char> = Key::ALL.iter().map(|k| k.to_char()).collect();
        assert_eq!(codes.len(), Key::ALL.len());
        assert_eq!(chars.len(), Key::ALL.len());
    }

    #[test]
    fn letters_and_names() {
        assert_eq!(Key::ALL.iter().filter(|k| k.is_letter()).count(), 26);
        assert_eq!(Key::Digit1.name(), "Digit1");
        assert!(!Key::Comma.is_letter());
    }

    #[test]
    fn from_char_folds_case() {
        assert_eq!(Key::from_char('A'), Some(Key::A));
        assert_eq!(Key::from_char('a'), Some(Key::A));
        assert_eq!(Key::from_char(','), Some(Key::Comma));
        assert_eq!(Key::from_char('é'), None);
        assert_eq!(Key::from_char(' '), None);
    }
}
