use bitflags::bitflags;

bitflags! {
    /// Device-independent modifier flags observed on a keyboard event.
    ///
    /// This is the complete set CoreGraphics reports in the device-independent
    /// part of `CGEventFlags`, so a matcher can reject any modifier it was not
    /// asked for.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct ModifierSet: u32 {
        /// Command (either side).
        const COMMAND = 1 << 0;
        /// Option/Alternate.
        const OPTION = 1 << 1;
        /// Control.
        const CONTROL = 1 << 2;
        /// Shift.
        const SHIFT = 1 << 3;
        /// Caps lock engaged.
        const CAPS_LOCK = 1 << 4;
        /// The fn key (also set by arrow and function keys).
        const FUNCTION = 1 << 5;
        /// Key on the numeric keypad.
        const NUMERIC_PAD = 1 << 6;
        /// Help key.
        const HELP = 1 << 7;
    }
}

/// Which physical command key the event source reported, if any.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum CommandSide {
    /// No side bit was present. Key remappers often synthesize events like this.
    #[default]
    Untagged,
    /// Only the left command key.
    Left,
    /// Only the right command key.
    Right,
    /// Both command keys are held.
    Both,
}

impl CommandSide {
    /// True when the right-side bit was present.
    pub fn has_right(self) -> bool {
        matches!(self, Self::Right | Self::Both)
    }

    /// True when the left-side bit was present.
    pub fn has_left(self) -> bool {
        matches!(self, Self::Left | Self::Both)
    }
}

/// Decoded modifier state for one keyboard event.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ModifierState {
    /// Device-independent modifiers held.
    pub flags: ModifierSet,
    /// Side information for the command key. Only meaningful when
    /// `flags` contains `COMMAND`.
    pub command_side: CommandSide,
}

// CGEventFlags device-independent masks.
const CG_ALPHA_SHIFT: u64 = 1 << 16;
const CG_SHIFT: u64 = 1 << 17;
const CG_CONTROL: u64 = 1 << 18;
const CG_ALTERNATE: u64 = 1 << 19;
const CG_COMMAND: u64 = 1 << 20;
const CG_NUMERIC_PAD: u64 = 1 << 21;
const CG_HELP: u64 = 1 << 22;
const CG_SECONDARY_FN: u64 = 1 << 23;

// IOKit NX_DEVICE*CMDKEYMASK device-dependent bits.
const NX_DEVICE_LCMD: u64 = 0x0000_0008;
const NX_DEVICE_RCMD: u64 = 0x0000_0010;

impl ModifierState {
    /// Build a state from a set of flags with no side information.
    pub fn new(flags: ModifierSet) -> Self {
        Self {
            flags,
            command_side: CommandSide::Untagged,
        }
    }

    /// Attach command-side information.
    pub fn with_side(mut self, side: CommandSide) -> Self {
        self.command_side = side;
        self
    }

    /// Decode a raw `CGEventFlags` word.
    pub fn from_cg_flags(flags: u64) -> Self {
        let table = [
            (CG_SHIFT, ModifierSet::SHIFT),
            (CG_CONTROL, ModifierSet::CONTROL),
            (CG_ALTERNATE, ModifierSet::OPTION),
            (CG_COMMAND, ModifierSet::COMMAND),
            (CG_ALPHA_SHIFT, ModifierSet::CAPS_LOCK),
            (CG_SECONDARY_FN, ModifierSet::FUNCTION),
            (CG_NUMERIC_PAD, ModifierSet::NUMERIC_PAD),
            (CG_HELP, ModifierSet::HELP),
        ];
        let mut set = ModifierSet::empty();
        for (bit, m) in table {
            if flags & bit != 0 {
                set |= m;
            }
        }
        let command_side = if set.contains(ModifierSet::COMMAND) {
            match (flags & NX_DEVICE_LCMD != 0, flags & NX_DEVICE_RCMD != 0) {
                (true, true) => CommandSide::Both,
                (true, false) => CommandSide::Left,
                (false, true) => CommandSide::Right,
                (false, false) => CommandSide::Untagged,
            }
        } else {
            CommandSide::Untagged
        };
        Self {
            flags: set,
            command_side,
        }
    }

    /// True when command is held.
    pub fn command(&self) -> bool {
        self.flags.contains(ModifierSet::COMMAND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_primary_bits() {
        let st = ModifierState::from_cg_flags(CG_SHIFT | CG_CONTROL);
        assert_eq!(st.flags, ModifierSet::SHIFT | ModifierSet::CONTROL);
        assert_eq!(st.command_side, CommandSide::Untagged);
        assert!(!st.command());
    }

    #[test]
    fn decode_command_sides() {
        let right = ModifierState::from_cg_flags(CG_COMMAND | NX_DEVICE_RCMD);
        assert!(right.command());
        assert_eq!(right.command_side, CommandSide::Right);
        assert!(right.command_side.has_right());

        let left = ModifierState::from_cg_flags(CG_COMMAND | NX_DEVICE_LCMD);
        assert_eq!(left.command_side, CommandSide::Left);
        assert!(!left.command_side.has_right());

        let both = ModifierState::from_cg_flags(CG_COMMAND | NX_DEVICE_LCMD | NX_DEVICE_RCMD);
        assert_eq!(both.command_side, CommandSide::Both);

        let bare = ModifierState::from_cg_flags(CG_COMMAND);
        assert_eq!(bare.command_side, CommandSide::Untagged);
    }

    #[test]
    fn side_bits_ignored_without_command() {
        // A stale side bit with the command flag cleared carries no meaning.
        let st = ModifierState::from_cg_flags(NX_DEVICE_RCMD);
        assert!(st.flags.is_empty());
        assert_eq!(st.command_side, CommandSide::Untagged);
    }

    #[test]
    fn decode_secondary_flags() {
        let st = ModifierState::from_cg_flags(CG_ALPHA_SHIFT | CG_SECONDARY_FN | CG_NUMERIC_PAD);
        assert!(st.flags.contains(ModifierSet::CAPS_LOCK));
        assert!(st.flags.contains(ModifierSet::FUNCTION));
        assert!(st.flags.contains(ModifierSet::NUMERIC_PAD));
        assert!(!st.flags.contains(ModifierSet::HELP));
    }
}
