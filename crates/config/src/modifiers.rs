//! Trigger modifier configuration and its spec-string form.

use std::{fmt, str::FromStr};

use mac_keycode::ModifierSet;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Which physical command key satisfies a command requirement.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimarySide {
    /// Either command key.
    Any,
    /// Left command only.
    Left,
    /// Right command. Side bits are not checked, so presses from remappers
    /// that omit or misreport them still count.
    #[default]
    Right,
}

/// The modifiers that must be held for a letter press to switch apps.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierConfig {
    /// Command is required.
    #[serde(default)]
    pub command: bool,
    /// Option is required.
    #[serde(default)]
    pub option: bool,
    /// Control is required.
    #[serde(default)]
    pub control: bool,
    /// Shift is required.
    #[serde(default)]
    pub shift: bool,
    /// Side constraint for the command key.
    #[serde(default)]
    pub command_side: PrimarySide,
}

/// Used when no record is stored at all. A stored record keeps its booleans
/// literally, with absent flags read as `false`.
impl Default for ModifierConfig {
    fn default() -> Self {
        Self {
            command: true,
            option: false,
            control: false,
            shift: false,
            command_side: PrimarySide::Right,
        }
    }
}

impl ModifierConfig {
    /// A configuration with nothing required. It never matches anything.
    pub const fn none() -> Self {
        Self {
            command: false,
            option: false,
            control: false,
            shift: false,
            command_side: PrimarySide::Any,
        }
    }

    /// True when no modifier is required.
    pub fn is_empty(&self) -> bool {
        !(self.command || self.option || self.control || self.shift)
    }

    /// The set of device-independent modifiers this configuration requires.
    pub fn required(&self) -> ModifierSet {
        let mut set = ModifierSet::empty();
        set.set(ModifierSet::COMMAND, self.command);
        set.set(ModifierSet::OPTION, self.option);
        set.set(ModifierSet::CONTROL, self.control);
        set.set(ModifierSet::SHIFT, self.shift);
        set
    }

    /// Parses a modifier specification of the form "rcmd+opt".
    ///
    /// - Case-insensitive; components are separated by "+".
    /// - Accepts `cmd`/`command`, `lcmd`, `rcmd`, `opt`/`option`/`alt`,
    ///   `ctrl`/`control`, and `shift`.
    /// - At least one modifier is required, and the command side may be given once.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let invalid = |message: String| Error::Validation { message };
        let mut out = Self::none();
        let mut side_seen = false;
        for raw in s.split('+') {
            let part = raw.trim().to_ascii_lowercase();
            let side = match part.as_str() {
                "cmd" | "command" => Some(PrimarySide::Any),
                "lcmd" => Some(PrimarySide::Left),
                "rcmd" => Some(PrimarySide::Right),
                "opt" | "option" | "alt" => {
                    out.option = true;
                    None
                }
                "ctrl" | "control" => {
                    out.control = true;
                    None
                }
                "shift" => {
                    out.shift = true;
                    None
                }
                "" => return Err(invalid(format!("empty component in modifier spec '{s}'"))),
                other => return Err(invalid(format!("unknown modifier '{other}'"))),
            };
            if let Some(side) = side {
                if side_seen && out.command_side != side {
                    return Err(invalid(format!("conflicting command keys in '{s}'")));
                }
                side_seen = true;
                out.command = true;
                out.command_side = side;
            }
        }
        Ok(out)
    }

    /// Returns the canonical string form: command variant, opt, ctrl, shift.
    pub fn to_spec(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.command {
            parts.push(match self.command_side {
                PrimarySide::Any => "cmd",
                PrimarySide::Left => "lcmd",
                PrimarySide::Right => "rcmd",
            });
        }
        if self.option {
            parts.push("opt");
        }
        if self.control {
            parts.push("ctrl");
        }
        if self.shift {
            parts.push("shift");
        }
        parts.join("+")
    }
}

impl FromStr for ModifierConfig {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ModifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(none)");
        }
        write!(f, "{}", self.to_spec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_specs() {
        let c = ModifierConfig::parse("rcmd").expect("parse");
        assert_eq!(c, ModifierConfig::default());

        let c = ModifierConfig::parse("Ctrl+ALT+cmd").expect("parse");
        assert!(c.command && c.option && c.control && !c.shift);
        assert_eq!(c.command_side, PrimarySide::Any);
        assert_eq!(c.to_string(), "cmd+opt+ctrl");

        let c = ModifierConfig::parse("ctrl+shift").expect("parse");
        assert!(!c.command);
        assert_eq!(
            c.required(),
            ModifierSet::CONTROL | ModifierSet::SHIFT
        );
    }

    #[test]
    fn canonical_roundtrip() {
        for s in ["lcmd+opt", "shift+opt+rcmd", "command", "alt+control"] {
            let c = ModifierConfig::parse(s).expect("parse");
            let again = ModifierConfig::parse(&c.to_spec()).expect("reparse");
            assert_eq!(c, again, "idempotent for {} => {}", s, c);
        }
    }

    #[test]
    fn rejects_bad_specs() {
        assert!(ModifierConfig::parse("").is_err());
        assert!(ModifierConfig::parse("cmd+").is_err());
        assert!(ModifierConfig::parse("hyper").is_err());
        assert!(ModifierConfig::parse("lcmd+rcmd").is_err());
        // Repeating the same command variant is harmless.
        assert!(ModifierConfig::parse("cmd+command").is_ok());
    }

    #[test]
    fn empty_config_displays_none() {
        let c = ModifierConfig::none();
        assert!(c.is_empty());
        assert!(c.required().is_empty());
        assert_eq!(c.to_string(), "(none)");
    }
}
