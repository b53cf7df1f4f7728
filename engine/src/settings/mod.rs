//! Settings store collaborator.
//!
//! The active icon theme lives in a desktop settings store under a single
//! string key. This module defines the store interface the engine talks to and
//! ships two backends:
//!
//! - [`MemoryStore`] - in-process store, used in tests and without a desktop session
//! - [`GsettingsStore`] - the desktop settings daemon, driven through `gsettings`
//!
//! All stores are single-threaded. Listeners run synchronously on the thread
//! that performed the write (or observed the external one).

mod errors;
pub mod gsettings;
pub mod memory;

pub use errors::{StoreError, StoreOperation};
pub use gsettings::{ChangeMonitor, GsettingsStore};
pub use memory::MemoryStore;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Schema holding the desktop interface settings.
pub const INTERFACE_SCHEMA: &str = "org.gnome.desktop.interface";

/// Key naming the active icon theme inside [`INTERFACE_SCHEMA`].
pub const ICON_THEME_KEY: &str = "icon-theme";

/// Fully qualified settings key: schema plus key name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingsKey {
    schema: String,
    key: String,
}

impl SettingsKey {
    pub fn new(schema: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            key: key.into(),
        }
    }

    /// The desktop interface's icon theme key.
    pub fn icon_theme() -> Self {
        Self::new(INTERFACE_SCHEMA, ICON_THEME_KEY)
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Default for SettingsKey {
    fn default() -> Self {
        Self::icon_theme()
    }
}

impl fmt::Display for SettingsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.schema, self.key)
    }
}

/// Token identifying a registered change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Change listener, invoked with the key that was written.
pub type Listener = Box<dyn FnMut(&SettingsKey)>;

/// Key-value store holding desktop settings.
pub trait SettingsStore {
    /// Current value of `key`.
    fn get(&self, key: &SettingsKey) -> Result<String, StoreError>;

    /// Durably write `value` to `key` and notify its listeners.
    fn set(&self, key: &SettingsKey, value: &str) -> Result<(), StoreError>;

    /// Register `listener` for writes to `key`, from this process or any other.
    fn subscribe(&self, key: &SettingsKey, listener: Listener) -> ListenerId;

    /// Remove a listener. Returns `false` when `id` was not registered.
    fn unsubscribe(&self, id: ListenerId) -> bool;
}

struct Registration {
    id: ListenerId,
    key: SettingsKey,
    listener: Rc<RefCell<Listener>>,
}

/// Listener bookkeeping shared by the store backends.
///
/// Notification never holds a borrow of the registry while a listener runs,
/// so listeners may read, write, subscribe or unsubscribe from inside the
/// callback. A listener that is still running is not entered a second time.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: Cell<u64>,
    entries: RefCell<Vec<Registration>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, key: &SettingsKey, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);

        self.entries.borrow_mut().push(Registration {
            id,
            key: key.clone(),
            listener: Rc::new(RefCell::new(listener)),
        });
        log::debug!("Registered listener {id} for {key}");
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|registration| registration.id != id);
        let removed = entries.len() != before;
        if removed {
            log::debug!("Released listener {id}");
        }
        removed
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|registration| registration.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Invoke every listener registered for `key`. Returns how many ran.
    pub fn notify(&self, key: &SettingsKey) -> usize {
        let targets: Vec<(ListenerId, Rc<RefCell<Listener>>)> = self
            .entries
            .borrow()
            .iter()
            .filter(|registration| &registration.key == key)
            .map(|registration| (registration.id, Rc::clone(&registration.listener)))
            .collect();

        let mut delivered = 0;
        for (id, listener) in targets {
            // An earlier listener in this round may have released this one.
            if !self.is_registered(id) {
                continue;
            }

            match listener.try_borrow_mut() {
                Ok(mut listener) => {
                    let callback = &mut *listener;
                    callback(key);
                    delivered += 1;
                }
                Err(_) => {
                    log::debug!("Listener {id} is already handling {key}, skipping nested change");
                }
            }
        }
        delivered
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}
