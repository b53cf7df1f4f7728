use super::{
    Listener, ListenerId, ListenerRegistry, SettingsKey, SettingsStore, StoreError,
    StoreOperation,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-process settings store.
///
/// Keys that were never written read as the empty string, which matches no
/// theme. [`MemoryStore::set_available`] simulates the store going away so
/// callers can exercise their failure paths.
#[derive(Debug)]
pub struct MemoryStore {
    values: RefCell<HashMap<SettingsKey, String>>,
    listeners: ListenerRegistry,
    available: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            values: RefCell::new(HashMap::new()),
            listeners: ListenerRegistry::new(),
            available: Cell::new(true),
        }
    }

    /// Store pre-populated with `value` under `key`.
    pub fn with_value(key: &SettingsKey, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.values.borrow_mut().insert(key.clone(), value.into());
        store
    }

    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub fn is_available(&self) -> bool {
        self.available.get()
    }

    /// Apply a write made by another process and notify listeners.
    pub fn notify_external(&self, key: &SettingsKey, value: impl Into<String>) {
        self.values.borrow_mut().insert(key.clone(), value.into());
        self.listeners.notify(key);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn ensure_available(
        &self,
        operation: StoreOperation,
        key: &SettingsKey,
    ) -> Result<(), StoreError> {
        if self.available.get() {
            Ok(())
        } else {
            Err(StoreError::unavailable(operation, key, "memory store is offline"))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &SettingsKey) -> Result<String, StoreError> {
        self.ensure_available(StoreOperation::Read, key)?;
        Ok(self.values.borrow().get(key).cloned().unwrap_or_default())
    }

    fn set(&self, key: &SettingsKey, value: &str) -> Result<(), StoreError> {
        self.ensure_available(StoreOperation::Write, key)?;
        self.values
            .borrow_mut()
            .insert(key.clone(), value.to_string());
        log::debug!("Stored '{value}' in {key}");
        self.listeners.notify(key);
        Ok(())
    }

    fn subscribe(&self, key: &SettingsKey, listener: Listener) -> ListenerId {
        self.listeners.subscribe(key, listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_ok};
    use std::rc::Rc;

    #[test]
    fn test_unwritten_key_reads_empty() {
        let store = MemoryStore::new();
        assert_eq!(assert_ok!(store.get(&SettingsKey::icon_theme())), "");
    }

    #[test]
    fn test_write_then_read() {
        let store = MemoryStore::new();
        let key = SettingsKey::icon_theme();
        assert_ok!(store.set(&key, "Breeze"));
        assert_eq!(assert_ok!(store.get(&key)), "Breeze");
    }

    #[test]
    fn test_offline_store_rejects_reads_and_writes() {
        let key = SettingsKey::icon_theme();
        let store = MemoryStore::with_value(&key, "Adwaita");
        store.set_available(false);

        let err = assert_err!(store.get(&key));
        assert!(err.is_unavailable());
        assert_err!(store.set(&key, "Breeze"));

        store.set_available(true);
        assert_eq!(assert_ok!(store.get(&key)), "Adwaita");
    }

    #[test]
    fn test_listener_can_read_during_notification() {
        let key = SettingsKey::icon_theme();
        let store = Rc::new(MemoryStore::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let reader = Rc::downgrade(&store);
        let sink = Rc::clone(&seen);
        store.subscribe(
            &key,
            Box::new(move |key| {
                if let Some(store) = reader.upgrade() {
                    sink.borrow_mut().push(store.get(key).unwrap());
                }
            }),
        );

        store.set(&key, "Papirus").unwrap();
        store.notify_external(&key, "Numix");
        assert_eq!(*seen.borrow(), ["Papirus", "Numix"]);
    }

    #[test]
    fn test_nested_write_from_listener_does_not_loop() {
        let key = SettingsKey::icon_theme();
        let store = Rc::new(MemoryStore::new());
        let calls = Rc::new(Cell::new(0));

        let writer = Rc::downgrade(&store);
        let counter = Rc::clone(&calls);
        store.subscribe(
            &key,
            Box::new(move |key| {
                counter.set(counter.get() + 1);
                if let Some(store) = writer.upgrade() {
                    store.set(key, "Adwaita").unwrap();
                }
            }),
        );

        store.set(&key, "Breeze").unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(store.get(&key).unwrap(), "Adwaita");
    }
}
