//! Binary entrypoint for the hotswitch command-line tool.
use std::{io, path::PathBuf, process};

use clap::{Parser, Subcommand, ValueEnum};
use config::resolve_settings_path;
use logging as logshared;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*};

/// Command implementations.
mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "hotswitch",
    about = "Switch apps with a modifier and a letter",
    version
)]
/// Command-line interface for the `hotswitch` binary.
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,

    /// Logging controls
    #[command(flatten)]
    log: logshared::LogArgs,

    /// Path to the settings file (defaults to ~/.hotswitch/settings.json)
    #[arg(long, value_name = "PATH", global = true)]
    settings: Option<PathBuf>,
}

/// On/off switch argument.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Toggle {
    /// Turn the setting on.
    On,
    /// Turn the setting off.
    Off,
}

impl From<Toggle> for bool {
    fn from(t: Toggle) -> Self {
        t == Toggle::On
    }
}

#[derive(Subcommand, Debug)]
/// Top-level CLI subcommands.
enum Command {
    /// Load and validate the settings file then exit.
    Check {
        /// Dump the normalized settings as JSON to stdout
        #[arg(long)]
        dump: bool,
    },
    /// Show assignments and settings.
    List,
    /// Add an app to a key's cycle.
    Assign {
        /// Single character key
        #[arg(value_parser = commands::parse_key)]
        key: char,
        /// Bundle identifier, e.g. com.apple.Safari
        bundle_id: String,
        /// Display name
        name: String,
    },
    /// Remove a key's assignments, or one app with --app.
    Unassign {
        /// Key to clear
        #[arg(value_parser = commands::parse_key, required_unless_present = "app")]
        key: Option<char>,
        /// Remove this bundle id from whichever key holds it
        #[arg(long, value_name = "BUNDLE_ID", conflicts_with = "key")]
        app: Option<String>,
    },
    /// Exclude an app from auto-assignment.
    Ignore {
        /// Bundle identifier
        bundle_id: String,
        /// Display name
        name: String,
    },
    /// Allow an app to be auto-assigned again.
    Unignore {
        /// Bundle identifier
        bundle_id: String,
    },
    /// Set the trigger modifiers, e.g. "rcmd" or "cmd+opt+ctrl".
    Modifiers {
        /// Modifier spec
        spec: String,
    },
    /// Turn hotkeys on.
    Enable,
    /// Turn hotkeys off.
    Disable,
    /// Launch assigned apps that are not running.
    Relaunch {
        /// on or off
        #[arg(value_enum)]
        state: Toggle,
    },
}

fn main() {
    let cli = Cli::parse();

    let final_spec = cli.log.spec();
    let env_filter = logshared::env_filter_from_spec(&final_spec);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr).without_time())
        .try_init()
        .ok();

    let path = resolve_settings_path(cli.settings.as_deref());
    debug!(path = %path.display(), "settings_path");

    match commands::run(&cli.command, &path) {
        Ok(out) => {
            if !out.is_empty() {
                println!("{out}");
            }
        }
        Err(msg) => {
            eprintln!("{msg}");
            process::exit(1);
        }
    }
}
