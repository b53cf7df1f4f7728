use engine::ThemeScanner;
use engine::scanner::{THEME_INDEX_FILE, scan};
use std::fs::{self, File};
use std::path::Path;
use tempfile::TempDir;

fn add_theme(root: &Path, name: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    File::create(dir.join(THEME_INDEX_FILE)).unwrap();
}

fn add_decoy(root: &Path, name: &str) {
    fs::create_dir_all(root.join(name).join("scalable")).unwrap();
}

#[test]
fn test_theme_without_index_in_one_root_still_counts_from_another() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    add_theme(a.path(), "Foo");
    add_decoy(b.path(), "Foo");
    add_theme(b.path(), "Bar");

    assert_eq!(scan(&[a.path(), b.path()]).names(), ["Bar", "Foo"]);
}

#[test]
fn test_overlapping_roots_yield_each_name_once() {
    let user = TempDir::new().unwrap();
    let system = TempDir::new().unwrap();
    for name in ["Adwaita", "Papirus", "hicolor"] {
        add_theme(system.path(), name);
    }
    for name in ["Papirus", "Numix"] {
        add_theme(user.path(), name);
    }

    let themes = scan(&[user.path(), system.path()]);
    assert_eq!(themes.names(), ["Adwaita", "hicolor", "Numix", "Papirus"]);
}

#[test]
fn test_root_order_does_not_change_result() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    add_theme(a.path(), "Yaru");
    add_theme(b.path(), "breeze");
    add_theme(b.path(), "Yaru");

    assert_eq!(scan(&[a.path(), b.path()]), scan(&[b.path(), a.path()]));
}

#[test]
fn test_decoy_with_theme_like_name_is_excluded() {
    let root = TempDir::new().unwrap();
    add_theme(root.path(), "Adwaita");
    add_decoy(root.path(), "Adwaita-fake");

    let themes = scan(&[root.path()]);
    assert!(themes.contains("Adwaita"));
    assert!(!themes.contains("Adwaita-fake"));
}

#[test]
fn test_only_one_standard_root_present() {
    let home = TempDir::new().unwrap();
    let user_icons = home.path().join(".local/share/icons");
    let system = TempDir::new().unwrap();
    add_theme(system.path(), "Adwaita");

    let scanner = ThemeScanner::new([user_icons.clone(), system.path().to_path_buf()]);
    let report = scanner.scan_with_report();

    assert_eq!(report.themes.names(), ["Adwaita"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, user_icons);
}

#[test]
fn test_scan_has_no_side_effects() {
    let root = TempDir::new().unwrap();
    add_theme(root.path(), "Adwaita");
    add_decoy(root.path(), "Empty");

    let before = fs::read_dir(root.path()).unwrap().count();
    let first = scan(&[root.path()]);
    let second = scan(&[root.path()]);
    let after = fs::read_dir(root.path()).unwrap().count();

    assert_eq!(first, second);
    assert_eq!(before, after);
    assert!(!root.path().join("Empty").join(THEME_INDEX_FILE).exists());
}
