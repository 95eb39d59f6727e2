#![warn(missing_docs)]

//! Shared logging helpers and CLI argument definitions for the hotswitch workspace.
//!
//! Log levels given on the command line apply to our own crates only, so
//! dependency chatter stays out of the way unless an explicit filter asks
//! for it.

use std::env;

use clap::Args;
use tracing_subscriber::EnvFilter;

/// Logging controls for CLI apps.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Set global log level to trace (our crates only)
    #[arg(long, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Set global log level to debug (our crates only)
    #[arg(long, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Set a single global log level for our crates (error|warn|info|debug|trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Set an explicit tracing filter directive (overrides other flags)
    /// e.g. "hotswitch_engine=trace,config=debug"
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl LogArgs {
    /// The filter spec these flags select. See [`compute_spec`].
    pub fn spec(&self) -> String {
        compute_spec(
            self.trace,
            self.debug,
            self.log_level.as_deref(),
            self.log_filter.as_deref(),
        )
    }
}

/// List of crate targets that constitute "our" logs.
pub fn our_crates() -> &'static [&'static str] {
    &[
        // App and core crates
        "hotswitch",
        "hotswitch_engine",
        "assignments",
        // macOS key tables
        "mac_keycode",
        // Utilities
        "config",
        "logging",
    ]
}

/// Build a filter directive string that sets the same `level` for all of our crates.
pub fn level_spec_for(level: &str) -> String {
    let lvl = level.to_ascii_lowercase();
    our_crates()
        .iter()
        .map(|t| format!("{}={}", t, lvl))
        .collect::<Vec<_>>()
        .join(",")
}

/// Compute the final filter spec string with precedence:
/// - `log_filter`
/// - `trace`/`debug`/`log_level` (crate-scoped)
/// - `RUST_LOG` env
/// - default to crate-scoped `info`
pub fn compute_spec(
    trace: bool,
    debug: bool,
    log_level: Option<&str>,
    log_filter: Option<&str>,
) -> String {
    if let Some(spec) = log_filter {
        return spec.to_string();
    }
    if trace {
        return level_spec_for("trace");
    }
    if debug {
        return level_spec_for("debug");
    }
    if let Some(lvl) = log_level {
        return level_spec_for(lvl);
    }
    match env::var("RUST_LOG") {
        Ok(spec) if !spec.trim().is_empty() => spec,
        _ => level_spec_for("info"),
    }
}

/// Create an `EnvFilter` from a spec string.
pub fn env_filter_from_spec(spec: &str) -> EnvFilter {
    EnvFilter::new(spec)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        log: LogArgs,
    }

    #[test]
    fn explicit_filter_wins() {
        let spec = compute_spec(false, false, Some("warn"), Some("config=trace"));
        assert_eq!(spec, "config=trace");
    }

    #[test]
    fn level_applies_to_our_crates_only() {
        let spec = compute_spec(false, false, Some("DEBUG"), None);
        let parts: Vec<&str> = spec.split(',').collect();
        assert_eq!(parts.len(), our_crates().len());
        assert!(parts.contains(&"hotswitch_engine=debug"));
        assert!(parts.iter().all(|p| p.ends_with("=debug")));
    }

    #[test]
    fn trace_and_debug_flags() {
        assert_eq!(compute_spec(true, false, None, None), level_spec_for("trace"));
        assert_eq!(compute_spec(false, true, None, None), level_spec_for("debug"));
    }

    #[test]
    fn flags_parse_and_conflict() {
        let cli = Cli::try_parse_from(["t", "--debug"]).unwrap();
        assert!(cli.log.debug);
        assert_eq!(cli.log.spec(), level_spec_for("debug"));
        assert!(Cli::try_parse_from(["t", "--debug", "--trace"]).is_err());
    }

    #[test]
    fn filter_builds() {
        let filter = env_filter_from_spec(&level_spec_for("info"));
        assert!(filter.to_string().contains("assignments=info"));
    }
}
