//! Key assignments for hotswitch.
//!
//! A [`Registry`] maps single-character keys to one or more applications and
//! remembers, per key, which application should activate next. Three
//! structures live inside it: the forward key → apps map, the reverse
//! bundle id → key index, and the per-key cycle cursor. They are only ever
//! changed together, through the registry's own methods.
//!
//! None of the operations fail. Unknown keys, unknown apps, and duplicates
//! are no-ops; mutating methods report whether anything changed so the
//! owner can decide whether a save is needed.

mod app;
mod ignored;
mod registry;

#[cfg(test)]
mod property_tests;

pub use app::AppRef;
pub use ignored::IgnoredApps;
pub use registry::{Registry, normalize_key};
