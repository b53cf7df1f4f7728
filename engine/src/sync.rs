use crate::model::{MarkerMap, ThemeSet};
use crate::settings::{ListenerId, SettingsKey, SettingsStore, StoreError};
use std::fmt;
use std::rc::{Rc, Weak};

/// Reads, writes and observes the active icon theme name.
///
/// The store owns the value; this type never invents one. Writes are not
/// checked against any theme set, so a name that was never scanned is stored
/// as given and simply matches no menu entry on the next reconcile.
pub struct ThemeStateSync {
    store: Rc<dyn SettingsStore>,
    key: SettingsKey,
}

impl ThemeStateSync {
    pub fn new(store: Rc<dyn SettingsStore>, key: SettingsKey) -> Self {
        Self { store, key }
    }

    pub fn key(&self) -> &SettingsKey {
        &self.key
    }

    pub fn store(&self) -> &Rc<dyn SettingsStore> {
        &self.store
    }

    pub fn read_active(&self) -> Result<String, StoreError> {
        self.store.get(&self.key)
    }

    pub fn set_active(&self, name: &str) -> Result<(), StoreError> {
        log::info!("Setting active icon theme to '{name}'");
        self.store.set(&self.key, name)
    }

    /// Mark `active` in `theme_set`; nothing is marked when it is absent.
    pub fn reconcile(theme_set: &ThemeSet, active: &str) -> MarkerMap {
        MarkerMap::reconcile(theme_set, active)
    }

    /// Call `callback` with the new value whenever the key is written.
    ///
    /// The value is re-read from the store on each notification. If that read
    /// fails the callback is skipped, so the caller keeps what it showed
    /// before. A write made while the callback runs (including one made by the
    /// callback itself) is picked up once it returns: the key is read again
    /// and the callback repeats until the value stops changing.
    ///
    /// The returned [`Subscription`] must be handed back to
    /// [`ThemeStateSync::unsubscribe`] when the owner is torn down.
    pub fn subscribe_to_external_change<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(&str) + 'static,
    {
        let store = Rc::downgrade(&self.store);
        let id = self.store.subscribe(
            &self.key,
            Box::new(move |key| {
                let Some(store) = store.upgrade() else {
                    return;
                };
                deliver_until_settled(store.as_ref(), key, &mut callback);
            }),
        );

        Subscription {
            id: Some(id),
            store: Rc::downgrade(&self.store),
            key: self.key.clone(),
        }
    }

    /// Release a subscription. Returns `false` if the store had already
    /// dropped the listener.
    pub fn unsubscribe(&self, mut subscription: Subscription) -> bool {
        subscription.release()
    }
}

/// Upper bound on follow-up deliveries for one notification.
const MAX_SETTLE_ROUNDS: usize = 16;

fn deliver_until_settled<F>(store: &dyn SettingsStore, key: &SettingsKey, callback: &mut F)
where
    F: FnMut(&str),
{
    let mut delivered = match store.get(key) {
        Ok(active) => active,
        Err(e) => {
            log::warn!("Could not read {key} after change notification: {e}");
            return;
        }
    };
    callback(&delivered);

    // nested writes to this key skip this listener while it runs
    for _ in 0..MAX_SETTLE_ROUNDS {
        match store.get(key) {
            Ok(current) if current == delivered => return,
            Ok(current) => {
                log::debug!("{key} changed to '{current}' during its change callback");
                callback(&current);
                delivered = current;
            }
            Err(e) => {
                log::warn!("Could not re-read {key} after change callback: {e}");
                return;
            }
        }
    }
    log::warn!(
        "{key} kept changing inside its change callback, giving up after {MAX_SETTLE_ROUNDS} rounds"
    );
}

impl fmt::Debug for ThemeStateSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStateSync")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Registration of a change callback, released exactly once.
///
/// Dropping a subscription that was never passed to
/// [`ThemeStateSync::unsubscribe`] still removes the listener, but logs a
/// warning: the owner forgot its teardown.
#[must_use = "a subscription must be released with ThemeStateSync::unsubscribe"]
pub struct Subscription {
    id: Option<ListenerId>,
    store: Weak<dyn SettingsStore>,
    key: SettingsKey,
}

impl Subscription {
    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    pub fn key(&self) -> &SettingsKey {
        &self.key
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    fn release(&mut self) -> bool {
        let Some(id) = self.id.take() else {
            return false;
        };
        match self.store.upgrade() {
            Some(store) => store.unsubscribe(id),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            log::warn!(
                "Change subscription {id} on {} dropped without unsubscribe",
                self.key
            );
            self.release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("key", &self.key)
            .finish()
    }
}
