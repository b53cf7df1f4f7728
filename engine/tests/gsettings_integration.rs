//! Drives the gsettings backend against a stand-in script that keeps the
//! value in a file next to itself.

#![cfg(unix)]

use claims::assert_ok;
use engine::settings::GsettingsStore;
use engine::{SettingsKey, SettingsStore, StoreError};
use std::cell::RefCell;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tempfile::TempDir;

const FAKE_GSETTINGS: &str = r#"#!/bin/sh
state="$(dirname "$0")/value"
case "$1" in
  get)
    cat "$state"
    ;;
  set)
    printf '%s\n' "$4" > "$state"
    ;;
  monitor)
    printf '%s: %s\n' "$3" "'Papirus'"
    printf 'gtk-theme: %s\n' "'Adwaita'"
    printf '%s: %s\n' "$3" "\"Bob's Icons\""
    ;;
  *)
    echo "unsupported" >&2
    exit 1
    ;;
esac
"#;

fn install_fake(dir: &TempDir, initial: &str) -> PathBuf {
    let program = dir.path().join("gsettings");
    fs::write(&program, FAKE_GSETTINGS).unwrap();
    fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();
    fs::write(dir.path().join("value"), format!("{initial}\n")).unwrap();
    program
}

#[test]
fn test_gsettings_backend_against_stand_in() {
    let dir = TempDir::new().unwrap();
    let program = install_fake(&dir, "'Adwaita'");
    let key = SettingsKey::icon_theme();
    let store = Rc::new(GsettingsStore::with_program(&program));

    // Read decodes the GVariant literal
    assert_eq!(assert_ok!(store.get(&key)), "Adwaita");

    // Writes are quoted, persisted and notify local listeners
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = store.subscribe(&key, Box::new(move |key| sink.borrow_mut().push(key.clone())));

    assert_ok!(store.set(&key, "Bob's Icons"));
    assert_eq!(
        fs::read_to_string(dir.path().join("value")).unwrap().trim(),
        r"'Bob\'s Icons'"
    );
    assert_eq!(assert_ok!(store.get(&key)), "Bob's Icons");
    assert_eq!(seen.borrow().len(), 1);

    // External changes arrive through the monitor channel
    let monitor = assert_ok!(store.monitor(&key));
    let mut observed = Vec::new();
    while let Ok(value) = monitor.receiver().recv_timeout(Duration::from_secs(5)) {
        observed.push(value);
    }
    monitor.stop();
    assert_eq!(observed, ["Papirus", "Bob's Icons"]);

    assert_eq!(store.notify_external(&key), 1);
    assert!(store.unsubscribe(id));
    assert_eq!(store.notify_external(&key), 0);

    // Anything that is not a string literal is rejected
    fs::write(dir.path().join("value"), "uint32 7\n").unwrap();
    assert!(matches!(
        store.get(&key),
        Err(StoreError::InvalidValue { .. })
    ));
}
