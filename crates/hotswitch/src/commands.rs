use std::{path::Path, sync::Arc};

use assignments::{AppRef, normalize_key};
use config::{JsonFileStore, ModifierConfig, SettingsStore};
use hotswitch_engine::{Engine, Error, Services};
use tracing::info;

use crate::Command;

/// Parse a single key character for clap.
pub fn parse_key(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => normalize_key(c).ok_or_else(|| format!("'{s}' cannot be used as a key")),
        _ => Err(format!("key must be a single character, got '{s}'")),
    }
}

fn pretty(e: &Error) -> String {
    match e {
        Error::Config(c) => c.pretty(),
        other => other.to_string(),
    }
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

fn open(path: &Path) -> Result<Engine, String> {
    let store: Arc<dyn SettingsStore> = Arc::new(JsonFileStore::new(path));
    let engine = Engine::new(Services::offline(store));
    engine.load().map_err(|e| pretty(&e))?;
    Ok(engine)
}

fn list(engine: &Engine) -> String {
    let mut lines = vec![
        format!("modifiers: {}", engine.modifiers()),
        format!("enabled: {}", yes_no(engine.enabled())),
        format!(
            "relaunch inactive apps: {}",
            yes_no(engine.relaunch_inactive_apps())
        ),
        format!("launch at login: {}", yes_no(engine.launch_at_login())),
    ];
    let assignments = engine.assignments();
    if assignments.is_empty() {
        lines.push("no assignments".to_string());
    }
    for (key, apps) in assignments {
        let names: Vec<String> = apps
            .iter()
            .map(|a| format!("{} ({})", a.name, a.bundle_id))
            .collect();
        lines.push(format!("{key}  {}", names.join(", ")));
    }
    let ignored = engine.ignored_apps();
    if !ignored.is_empty() {
        lines.push("ignored:".to_string());
        lines.extend(
            ignored
                .iter()
                .map(|a| format!("  {} ({})", a.name, a.bundle_id)),
        );
    }
    lines.join("\n")
}

fn changed(did: bool, what: String) -> String {
    if did {
        info!(%what, "settings_changed");
        what
    } else {
        "no change".to_string()
    }
}

/// Run one command against the settings file at `path`, returning the text
/// to print.
pub fn run(command: &Command, path: &Path) -> Result<String, String> {
    let engine = open(path)?;
    let out = match command {
        Command::Check { dump: true } => {
            return engine.snapshot().to_json().map_err(|e| e.pretty());
        }
        Command::Check { dump: false } => return Ok("OK".to_string()),
        Command::List => return Ok(list(&engine)),
        Command::Assign {
            key,
            bundle_id,
            name,
        } => {
            let did = engine.assign(*key, bundle_id, name);
            changed(did, format!("assigned {name} to {key}"))
        }
        Command::Unassign { key: Some(key), .. } => {
            let did = engine.remove_assignment(*key);
            changed(did, format!("cleared {key}"))
        }
        Command::Unassign { app: Some(app), .. } => {
            let did = engine.remove_bundle(app);
            changed(did, format!("unassigned {app}"))
        }
        Command::Unassign { .. } => return Err("nothing to unassign".to_string()),
        Command::Ignore { bundle_id, name } => {
            let did = engine.ignore_app(AppRef::new(bundle_id.as_str(), name.as_str()));
            changed(did, format!("ignoring {name}"))
        }
        Command::Unignore { bundle_id } => {
            let did = engine.unignore_app(bundle_id);
            changed(did, format!("no longer ignoring {bundle_id}"))
        }
        Command::Modifiers { spec } => {
            let mods = ModifierConfig::parse(spec).map_err(|e| e.pretty())?;
            let did = engine.set_modifiers(mods);
            changed(did, format!("modifiers set to {mods}"))
        }
        Command::Enable => changed(engine.set_enabled(true), "enabled".to_string()),
        Command::Disable => changed(engine.set_enabled(false), "disabled".to_string()),
        Command::Relaunch { state } => {
            let on: bool = (*state).into();
            changed(
                engine.set_relaunch_inactive_apps(on),
                format!("relaunch inactive apps: {}", yes_no(on)),
            )
        }
    };
    engine.flush().map_err(|e| pretty(&e))?;
    Ok(out)
}
