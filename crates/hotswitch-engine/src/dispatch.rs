//! Keyboard event routing.
//!
//! [`route`] decides, from the current settings and registry, whether an
//! event is passed through to the focused app or consumed to switch apps.
//! It only touches in-memory state; activation happens after the caller
//! has released its locks.

use assignments::Registry;
use config::ModifierConfig;
use mac_keycode::{Key, ModifierSet, ModifierState, Scancode, character_for};

use crate::matcher;

/// Key transition reported by the event source.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EventKind {
    /// Key pressed. Auto-repeat presses arrive as further key-downs.
    KeyDown,
    /// Key released.
    KeyUp,
}

/// One keyboard event as seen by the interceptor.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KeyEvent {
    /// Hardware virtual keycode.
    pub scancode: Scancode,
    /// Decoded modifier flags.
    pub modifiers: ModifierState,
    /// Press or release.
    pub kind: EventKind,
}

impl KeyEvent {
    /// A key press.
    pub fn key_down(scancode: Scancode, modifiers: ModifierState) -> Self {
        Self {
            scancode,
            modifiers,
            kind: EventKind::KeyDown,
        }
    }

    /// A key release.
    pub fn key_up(scancode: Scancode, modifiers: ModifierState) -> Self {
        Self {
            scancode,
            modifiers,
            kind: EventKind::KeyUp,
        }
    }

    /// Build from the raw keycode and `CGEventFlags` an event tap reports.
    pub fn from_cg(keycode: u16, flags: u64, kind: EventKind) -> Self {
        Self {
            scancode: keycode,
            modifiers: ModifierState::from_cg_flags(flags),
            kind,
        }
    }
}

/// Why an event was passed through untouched.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Pass {
    /// Command-comma, reserved for opening the settings window.
    OpenSettings,
    /// Switching is turned off.
    Disabled,
    /// Releases are never consumed.
    KeyUp,
    /// Modifiers do not match the trigger configuration.
    Modifiers,
    /// The scancode has no printable character.
    UnknownKey,
    /// Nothing is assigned to the key.
    Unassigned,
}

/// Routing decision for one event.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Route {
    /// Let the event reach the focused app.
    Pass(Pass),
    /// Consume the event and bring `bundle_id` forward.
    Switch {
        /// The key that was pressed.
        key: char,
        /// The app the cycle selected.
        bundle_id: String,
    },
}

/// True for command-comma with no other modifier.
pub fn is_open_settings(event: &KeyEvent) -> bool {
    event.scancode == Key::Comma.scancode() && event.modifiers.flags == ModifierSet::COMMAND
}

/// Decide what to do with `event`. Advances the key's cycle cursor when the
/// result is a switch.
pub fn route(
    event: &KeyEvent,
    enabled: bool,
    trigger: &ModifierConfig,
    registry: &mut Registry,
) -> Route {
    if is_open_settings(event) {
        return Route::Pass(Pass::OpenSettings);
    }
    if !enabled {
        return Route::Pass(Pass::Disabled);
    }
    if event.kind == EventKind::KeyUp {
        return Route::Pass(Pass::KeyUp);
    }
    if !matcher::matches(trigger, &event.modifiers) {
        return Route::Pass(Pass::Modifiers);
    }
    let Some(key) = character_for(event.scancode) else {
        return Route::Pass(Pass::UnknownKey);
    };
    match registry.next_bundle_id(key) {
        Some(bundle_id) => Route::Switch { key, bundle_id },
        None => Route::Pass(Pass::Unassigned),
    }
}

#[cfg(test)]
mod tests {
    use mac_keycode::CommandSide;

    use super::*;

    fn rcmd() -> ModifierState {
        ModifierState::new(ModifierSet::COMMAND).with_side(CommandSide::Right)
    }

    fn registry() -> Registry {
        let mut r = Registry::new();
        r.assign('s', "com.tinyspeck.slackmacgap", "Slack");
        r.assign('s', "com.apple.Safari", "Safari");
        r
    }

    #[test]
    fn switches_and_cycles() {
        let mut r = registry();
        let trigger = ModifierConfig::default();
        let ev = KeyEvent::key_down(Key::S.scancode(), rcmd());
        let first = route(&ev, true, &trigger, &mut r);
        let second = route(&ev, true, &trigger, &mut r);
        assert_eq!(
            first,
            Route::Switch {
                key: 's',
                bundle_id: "com.tinyspeck.slackmacgap".into()
            }
        );
        assert_eq!(
            second,
            Route::Switch {
                key: 's',
                bundle_id: "com.apple.Safari".into()
            }
        );
    }

    #[test]
    fn open_settings_passes_even_when_assigned() {
        let mut r = registry();
        r.assign(',', "com.example.comma", "Comma");
        let trigger = ModifierConfig::parse("cmd").unwrap();
        let ev = KeyEvent::key_down(Key::Comma.scancode(), rcmd());
        assert_eq!(
            route(&ev, true, &trigger, &mut r),
            Route::Pass(Pass::OpenSettings)
        );
        assert_eq!(r.cursor(','), Some(0));
    }

    #[test]
    fn disabled_and_key_up_pass() {
        let mut r = registry();
        let trigger = ModifierConfig::default();
        let down = KeyEvent::key_down(Key::S.scancode(), rcmd());
        assert_eq!(
            route(&down, false, &trigger, &mut r),
            Route::Pass(Pass::Disabled)
        );
        let up = KeyEvent::key_up(Key::S.scancode(), rcmd());
        assert_eq!(route(&up, true, &trigger, &mut r), Route::Pass(Pass::KeyUp));
        // Neither moved the cursor.
        assert_eq!(r.cursor('s'), Some(0));
    }

    #[test]
    fn modifier_mismatch_and_unassigned() {
        let mut r = registry();
        let trigger = ModifierConfig::default();
        let plain = KeyEvent::key_down(Key::S.scancode(), ModifierState::default());
        assert_eq!(
            route(&plain, true, &trigger, &mut r),
            Route::Pass(Pass::Modifiers)
        );
        let q = KeyEvent::key_down(Key::Q.scancode(), rcmd());
        assert_eq!(
            route(&q, true, &trigger, &mut r),
            Route::Pass(Pass::Unassigned)
        );
        let arrow = KeyEvent::key_down(0x7B, rcmd());
        assert_eq!(
            route(&arrow, true, &trigger, &mut r),
            Route::Pass(Pass::UnknownKey)
        );
    }

    #[test]
    fn from_cg_decodes_flags() {
        let ev = KeyEvent::from_cg(Key::S.scancode(), (1 << 20) | 0x10, EventKind::KeyDown);
        assert_eq!(ev.modifiers, rcmd());
    }
}
