use crate::model::{MarkerMap, MenuEntry, ThemeSet};
use crate::scanner::{ScanReport, ThemeScanner};
use crate::settings::StoreError;
use crate::sync::{Subscription, ThemeStateSync};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    #[error("Failed to read the active icon theme: {0}")]
    Read(#[source] StoreError),

    #[error("Failed to apply icon theme '{name}': {source}")]
    Write {
        name: String,
        #[source]
        source: StoreError,
    },
}

impl MenuError {
    pub fn store_error(&self) -> &StoreError {
        match self {
            MenuError::Read(source) => source,
            MenuError::Write { source, .. } => source,
        }
    }
}

#[derive(Debug, Default)]
struct MenuState {
    theme_set: ThemeSet,
    markers: MarkerMap,
    last_report: ScanReport,
}

impl MenuState {
    fn apply_active(&mut self, active: &str) -> MarkerMap {
        self.markers = MarkerMap::reconcile(&self.theme_set, active);
        self.markers.clone()
    }
}

/// Icon theme menu: one entry per discovered theme, at most one checked.
///
/// The menu keeps its marker map consistent with the settings store:
///
/// - [`ThemeMenu::refresh`] rescans and re-reads the active value
/// - [`ThemeMenu::select`] writes a new value, then reconciles locally
/// - after [`ThemeMenu::attach`], writes from anywhere reconcile the menu
///
/// Store failures never clear what the menu shows. A failed read keeps the
/// previous markers, a failed write leaves them untouched.
pub struct ThemeMenu {
    scanner: ThemeScanner,
    sync: ThemeStateSync,
    state: Rc<RefCell<MenuState>>,
    subscription: Option<Subscription>,
}

impl ThemeMenu {
    pub fn new(scanner: ThemeScanner, sync: ThemeStateSync) -> Self {
        Self {
            scanner,
            sync,
            state: Rc::new(RefCell::new(MenuState::default())),
            subscription: None,
        }
    }

    pub fn scanner(&self) -> &ThemeScanner {
        &self.scanner
    }

    pub fn sync(&self) -> &ThemeStateSync {
        &self.sync
    }

    /// Rebuild the entries from a fresh scan and the stored active value.
    ///
    /// The new theme set is kept even when the read fails; entries then carry
    /// their previous markers.
    pub fn refresh(&mut self) -> Result<(), MenuError> {
        let report = self.scanner.scan_with_report();
        let active = self.sync.read_active();

        let mut state = self.state.borrow_mut();
        state.theme_set = report.themes.clone();
        state.last_report = report;

        match active {
            Ok(active) => {
                state.apply_active(&active);
                log::debug!(
                    "Menu refreshed with {} themes, active '{active}'",
                    state.theme_set.len()
                );
                Ok(())
            }
            Err(e) => {
                log::warn!("Keeping previous icon theme marker: {e}");
                let carried = MarkerMap::carry_over(&state.theme_set, &state.markers);
                state.markers = carried;
                Err(MenuError::Read(e))
            }
        }
    }

    /// Apply `name` as the icon theme. The marker only moves once the write
    /// has succeeded.
    pub fn select(&mut self, name: &str) -> Result<(), MenuError> {
        // The store notifies listeners synchronously, so no borrow of the
        // menu state may be held across the write.
        self.sync.set_active(name).map_err(|source| MenuError::Write {
            name: name.to_string(),
            source,
        })?;

        self.state.borrow_mut().apply_active(name);
        Ok(())
    }

    /// Reconcile against a value delivered by a change notification.
    pub fn apply_external_change(&self, active: &str) {
        match self.state.try_borrow_mut() {
            Ok(mut state) => {
                state.apply_active(active);
            }
            Err(_) => log::warn!("Menu busy, ignoring icon theme change to '{active}'"),
        }
    }

    /// Follow writes to the active theme key, from this process or any other.
    ///
    /// `on_change` runs after the markers were updated. Attaching twice
    /// replaces the earlier subscription.
    pub fn attach<F>(&mut self, mut on_change: F)
    where
        F: FnMut(&MarkerMap) + 'static,
    {
        self.detach();

        let state = Rc::clone(&self.state);
        let subscription = self.sync.subscribe_to_external_change(move |active| {
            let markers = match state.try_borrow_mut() {
                Ok(mut state) => state.apply_active(active),
                Err(_) => {
                    log::warn!("Menu busy, ignoring icon theme change to '{active}'");
                    return;
                }
            };
            on_change(&markers);
        });
        self.subscription = Some(subscription);
    }

    /// Release the change subscription, if any.
    pub fn detach(&mut self) -> bool {
        match self.subscription.take() {
            Some(subscription) => self.sync.unsubscribe(subscription),
            None => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn theme_set(&self) -> ThemeSet {
        self.state.borrow().theme_set.clone()
    }

    pub fn markers(&self) -> MarkerMap {
        self.state.borrow().markers.clone()
    }

    /// Menu entries in display order.
    pub fn entries(&self) -> Vec<MenuEntry> {
        self.state.borrow().markers.entries().to_vec()
    }

    pub fn last_report(&self) -> ScanReport {
        self.state.borrow().last_report.clone()
    }
}

impl Drop for ThemeMenu {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{MemoryStore, SettingsKey, SettingsStore};
    use claims::{assert_err, assert_ok};
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn fixture(names: &[&str]) -> TempDir {
        let root = TempDir::new().unwrap();
        for name in names {
            let dir = root.path().join(name);
            fs::create_dir(&dir).unwrap();
            File::create(dir.join("index.theme")).unwrap();
        }
        root
    }

    fn menu_for(root: &TempDir, store: &Rc<MemoryStore>) -> ThemeMenu {
        let dyn_store: Rc<dyn SettingsStore> = store.clone();
        ThemeMenu::new(
            ThemeScanner::new([root.path()]),
            ThemeStateSync::new(dyn_store, SettingsKey::icon_theme()),
        )
    }

    #[test]
    fn test_refresh_marks_stored_theme() {
        let root = fixture(&["Adwaita", "Breeze"]);
        let store = Rc::new(MemoryStore::with_value(&SettingsKey::icon_theme(), "Breeze"));
        let mut menu = menu_for(&root, &store);

        assert_ok!(menu.refresh());
        assert_eq!(menu.theme_set().names(), ["Adwaita", "Breeze"]);
        assert_eq!(menu.markers().active(), Some("Breeze"));

        let entries = menu.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Adwaita");
        assert!(!entries[0].marker.is_active());
        assert!(entries[1].marker.is_active());
    }

    #[test]
    fn test_select_moves_marker() {
        let root = fixture(&["Adwaita", "Breeze"]);
        let store = Rc::new(MemoryStore::with_value(&SettingsKey::icon_theme(), "Breeze"));
        let mut menu = menu_for(&root, &store);
        menu.refresh().unwrap();

        assert_ok!(menu.select("Adwaita"));
        assert_eq!(menu.markers().active(), Some("Adwaita"));
        assert_eq!(store.get(&SettingsKey::icon_theme()).unwrap(), "Adwaita");
    }

    #[test]
    fn test_failed_write_keeps_marker() {
        let root = fixture(&["Adwaita", "Breeze"]);
        let store = Rc::new(MemoryStore::with_value(&SettingsKey::icon_theme(), "Breeze"));
        let mut menu = menu_for(&root, &store);
        menu.refresh().unwrap();

        store.set_available(false);
        let err = assert_err!(menu.select("Adwaita"));
        assert!(err.store_error().is_unavailable());
        assert_eq!(menu.markers().active(), Some("Breeze"));
    }

    #[test]
    fn test_failed_read_keeps_marker_and_new_entries() {
        let root = fixture(&["Adwaita", "Breeze"]);
        let store = Rc::new(MemoryStore::with_value(&SettingsKey::icon_theme(), "Breeze"));
        let mut menu = menu_for(&root, &store);
        menu.refresh().unwrap();

        fs::create_dir(root.path().join("Papirus")).unwrap();
        File::create(root.path().join("Papirus").join("index.theme")).unwrap();
        store.set_available(false);

        assert!(matches!(menu.refresh(), Err(MenuError::Read(_))));
        assert_eq!(menu.theme_set().len(), 3);
        assert_eq!(menu.markers().active(), Some("Breeze"));
    }

    #[test]
    fn test_attached_menu_follows_external_writes() {
        let root = fixture(&["Adwaita", "Breeze"]);
        let key = SettingsKey::icon_theme();
        let store = Rc::new(MemoryStore::with_value(&key, "Breeze"));
        let mut menu = menu_for(&root, &store);
        menu.refresh().unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        menu.attach(move |markers| sink.borrow_mut().push(markers.active().map(str::to_string)));

        store.notify_external(&key, "Adwaita");
        assert_eq!(menu.markers().active(), Some("Adwaita"));

        store.notify_external(&key, "Unknown");
        assert_eq!(menu.markers().active_count(), 0);

        assert_eq!(*seen.borrow(), [Some("Adwaita".to_string()), None]);
    }

    #[test]
    fn test_select_while_attached_notifies_once() {
        let root = fixture(&["Adwaita", "Breeze"]);
        let store = Rc::new(MemoryStore::new());
        let mut menu = menu_for(&root, &store);
        menu.refresh().unwrap();

        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        menu.attach(move |_| *counter.borrow_mut() += 1);

        menu.select("Breeze").unwrap();
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(menu.markers().active(), Some("Breeze"));
    }

    #[test]
    fn test_detach_and_drop_release_listener() {
        let root = fixture(&["Adwaita"]);
        let store = Rc::new(MemoryStore::new());

        let mut menu = menu_for(&root, &store);
        menu.attach(|_| {});
        menu.attach(|_| {});
        assert_eq!(store.listener_count(), 1);
        assert!(menu.detach());
        assert!(!menu.detach());
        assert_eq!(store.listener_count(), 0);

        menu.attach(|_| {});
        drop(menu);
        assert_eq!(store.listener_count(), 0);
    }
}
