#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        path::PathBuf,
        process,
        time::{SystemTime, UNIX_EPOCH},
    };

    use crate::*;

    fn unique_tmp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let mut dir = env::temp_dir();
        dir.push(format!("hotswitch-{name}-{}-{nanos}", process::id()));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn sample() -> Snapshot {
        Snapshot {
            assignments: vec![
                AssignmentRecord {
                    key: "s".into(),
                    apps: vec![
                        AppRecord::new("com.apple.Safari", "Safari"),
                        AppRecord::new("com.tinyspeck.slackmacgap", "Slack"),
                    ],
                },
                AssignmentRecord {
                    key: "t".into(),
                    apps: vec![AppRecord::new("com.apple.Terminal", "Terminal")],
                },
            ],
            enabled: false,
            relaunch_inactive_apps: false,
            modifier_config: ModifierConfig::parse("lcmd+opt").expect("spec"),
            ignored_apps: vec![AppRecord::new("com.apple.finder", "Finder")],
            launch_at_login: true,
        }
    }

    #[test]
    fn wire_names_are_camel_case() {
        let json = sample().to_json().expect("encode");
        for field in [
            "\"bundleIdentifier\"",
            "\"appName\"",
            "\"relaunchInactiveApps\"",
            "\"modifierConfig\"",
            "\"commandSide\": \"left\"",
            "\"ignoredApps\"",
            "\"launchAtLogin\"",
        ] {
            assert!(json.contains(field), "missing {field} in {json}");
        }
        let back = Snapshot::from_json(&json, None).expect("decode");
        assert_eq!(back, sample());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let snap = Snapshot::from_json("{}", None).expect("decode");
        assert_eq!(snap, Snapshot::default());
        assert!(snap.enabled);
        assert!(snap.relaunch_inactive_apps);
        assert_eq!(snap.modifier_config.to_spec(), "rcmd");

    }

    #[test]
    fn partial_modifier_record_is_literal() {
        let snap = Snapshot::from_json(r#"{"modifierConfig": {"shift": true}}"#, None)
            .expect("decode");
        assert!(!snap.modifier_config.command);
        assert!(snap.modifier_config.shift);
        assert_eq!(snap.modifier_config.to_spec(), "shift");

        let snap = Snapshot::from_json(r#"{"modifierConfig": {"option": true}}"#, None)
            .expect("decode");
        assert_eq!(snap.modifier_config.to_spec(), "opt");
        assert_eq!(snap.modifier_config.command_side, PrimarySide::Right);

        let snap = Snapshot::from_json(r#"{"modifierConfig": {}}"#, None).expect("decode");
        assert!(snap.modifier_config.is_empty());
    }

    #[test]
    fn malformed_record_is_skipped() {
        let text = r#"{
            "assignments": [
                {"key": "a", "apps": [{"bundleIdentifier": "com.a", "appName": "A"}]},
                {"key": 7, "apps": []},
                {"apps": [{"bundleIdentifier": "com.c", "appName": "C"}]},
                {"key": "b", "apps": [{"bundleIdentifier": "com.b", "appName": "B"}]}
            ],
            "ignoredApps": [{"bundleIdentifier": "com.x"}, {"bundleIdentifier": "com.y", "appName": "Y"}]
        }"#;
        let snap = Snapshot::from_json(text, None).expect("decode");
        let keys: Vec<&str> = snap.assignments.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(snap.ignored_apps, vec![AppRecord::new("com.y", "Y")]);
    }

    #[test]
    fn broken_json_reports_location() {
        let path = PathBuf::from("/tmp/settings.json");
        let err = Snapshot::from_json("{\n  \"enabled\": tru\n}", Some(path.as_path())).unwrap_err();
        match &err {
            Error::Parse { line, .. } => assert_eq!(*line, 2),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.path(), Some(path.as_path()));
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = unique_tmp_dir("store");
        let store = JsonFileStore::new(dir.join("nested").join("settings.json"));
        assert_eq!(store.load().expect("load missing"), None);

        store.save(&sample()).expect("save");
        assert_eq!(store.load().expect("load"), Some(sample()));
        // The temp file is renamed away.
        assert!(!dir.join("nested").join("settings.json.tmp").exists());

        let _ignored = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_store_reports_parse_errors() {
        let dir = unique_tmp_dir("bad");
        let path = dir.join("settings.json");
        fs::write(&path, "not json").expect("write");
        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.pretty().contains("settings.json"));
        let _ignored = fs::remove_dir_all(&dir);
    }

    #[test]
    fn memory_store_failure_switch() {
        let store = MemoryStore::with_snapshot(sample());
        assert_eq!(store.load().expect("load"), Some(sample()));
        store.set_fail(true);
        assert!(store.load().is_err());
        assert!(store.save(&Snapshot::default()).is_err());
        assert_eq!(store.save_count(), 0);
        store.set_fail(false);
        store.save(&Snapshot::default()).expect("save");
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.current(), Some(Snapshot::default()));
    }

    #[test]
    fn explicit_path_wins() {
        let p = PathBuf::from("/tmp/custom.json");
        assert_eq!(resolve_settings_path(Some(p.as_path())), p);
        assert!(resolve_settings_path(None).ends_with(".hotswitch/settings.json"));
    }
}
