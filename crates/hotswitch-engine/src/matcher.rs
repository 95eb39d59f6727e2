//! Decide whether an event's modifiers satisfy the trigger configuration.

use config::{ModifierConfig, PrimarySide};
use mac_keycode::ModifierState;

/// True when `observed` is exactly the modifier chord `config` asks for.
///
/// - A configuration with no modifiers never matches.
/// - Every required modifier must be held, and no other device-independent
///   modifier may be (caps lock, fn, and the keypad flag included).
/// - `Left` rejects any press carrying the right-command bit.
/// - `Right` never rejects on side bits. Remappers emit command without
///   them, and some tag synthesized presses as left.
pub fn matches(config: &ModifierConfig, observed: &ModifierState) -> bool {
    if config.is_empty() {
        return false;
    }
    if observed.flags != config.required() {
        return false;
    }
    if !config.command {
        return true;
    }
    match config.command_side {
        PrimarySide::Any | PrimarySide::Right => true,
        PrimarySide::Left => !observed.command_side.has_right(),
    }
}

#[cfg(test)]
mod tests {
    use mac_keycode::{CommandSide, ModifierSet};

    use super::*;

    fn state(flags: ModifierSet, side: CommandSide) -> ModifierState {
        ModifierState::new(flags).with_side(side)
    }

    fn cfg(spec: &str) -> ModifierConfig {
        ModifierConfig::parse(spec).unwrap()
    }

    #[test]
    fn exact_chord_matches() {
        let c = cfg("cmd+opt+ctrl");
        let chord = ModifierSet::COMMAND | ModifierSet::OPTION | ModifierSet::CONTROL;
        assert!(matches(&c, &state(chord, CommandSide::Left)));
        assert!(!matches(
            &c,
            &state(chord | ModifierSet::SHIFT, CommandSide::Left)
        ));
        assert!(!matches(
            &c,
            &state(ModifierSet::COMMAND | ModifierSet::OPTION, CommandSide::Left)
        ));
    }

    #[test]
    fn empty_config_never_matches() {
        let c = ModifierConfig::none();
        assert!(!matches(&c, &ModifierState::default()));
        assert!(!matches(
            &c,
            &state(ModifierSet::COMMAND, CommandSide::Right)
        ));
    }

    #[test]
    fn extra_lock_flags_reject() {
        let c = cfg("cmd");
        for extra in [
            ModifierSet::CAPS_LOCK,
            ModifierSet::FUNCTION,
            ModifierSet::NUMERIC_PAD,
            ModifierSet::HELP,
        ] {
            assert!(!matches(
                &c,
                &state(ModifierSet::COMMAND | extra, CommandSide::Untagged)
            ));
        }
    }

    #[test]
    fn right_side_rules() {
        let c = cfg("rcmd");
        assert!(matches(&c, &state(ModifierSet::COMMAND, CommandSide::Right)));
        assert!(matches(&c, &state(ModifierSet::COMMAND, CommandSide::Both)));
        assert!(matches(
            &c,
            &state(ModifierSet::COMMAND, CommandSide::Untagged)
        ));
        // No right sub-flag is required, even when the press is tagged left.
        assert!(matches(&c, &state(ModifierSet::COMMAND, CommandSide::Left)));
        assert!(!matches(&c, &ModifierState::default()));
        assert!(!matches(
            &c,
            &state(ModifierSet::OPTION, CommandSide::Right)
        ));
    }

    #[test]
    fn left_side_rules() {
        let c = cfg("lcmd");
        assert!(matches(&c, &state(ModifierSet::COMMAND, CommandSide::Left)));
        assert!(matches(
            &c,
            &state(ModifierSet::COMMAND, CommandSide::Untagged)
        ));
        assert!(!matches(&c, &state(ModifierSet::COMMAND, CommandSide::Right)));
        assert!(!matches(&c, &state(ModifierSet::COMMAND, CommandSide::Both)));
    }

    #[test]
    fn any_side_accepts_all() {
        let c = cfg("cmd");
        for side in [
            CommandSide::Untagged,
            CommandSide::Left,
            CommandSide::Right,
            CommandSide::Both,
        ] {
            assert!(matches(&c, &state(ModifierSet::COMMAND, side)));
        }
    }

    #[test]
    fn decoded_cg_flags_match() {
        // Right command plus option, as reported by an event tap.
        let raw = (1 << 20) | (1 << 19) | 0x10;
        let c = cfg("rcmd+opt");
        assert!(matches(&c, &ModifierState::from_cg_flags(raw)));
        let left = (1 << 20) | (1 << 19) | 0x08;
        assert!(matches(&c, &ModifierState::from_cg_flags(left)));
        assert!(!matches(&cfg("lcmd+opt"), &ModifierState::from_cg_flags(raw)));
    }
}
