use crate::config::{SettingsConfig, StoreBackend};
use crate::error::AppResult;
use engine::SettingsKey;
use engine::settings::{ChangeMonitor, GsettingsStore, MemoryStore, SettingsStore};
use std::io::{BufRead, BufReader};
use std::rc::Rc;
use std::thread;

/// The settings store selected at start-up.
///
/// The menu only sees it as `dyn SettingsStore`; the concrete backend is kept
/// here because the two deliver outside changes differently.
#[derive(Debug, Clone)]
pub enum StoreHandle {
    Memory(Rc<MemoryStore>),
    Gsettings(Rc<GsettingsStore>),
}

impl StoreHandle {
    pub fn from_config(settings: &SettingsConfig, force_memory: bool) -> Self {
        let backend = if force_memory {
            StoreBackend::Memory
        } else {
            settings.backend()
        };
        log::debug!("Using {backend} settings store");

        match backend {
            StoreBackend::Memory => StoreHandle::Memory(Rc::new(MemoryStore::new())),
            StoreBackend::Gsettings => StoreHandle::Gsettings(Rc::new(
                GsettingsStore::with_program(settings.gsettings_program()),
            )),
        }
    }

    pub fn backend(&self) -> StoreBackend {
        match self {
            StoreHandle::Memory(_) => StoreBackend::Memory,
            StoreHandle::Gsettings(_) => StoreBackend::Gsettings,
        }
    }

    pub fn as_dyn(&self) -> Rc<dyn SettingsStore> {
        match self {
            StoreHandle::Memory(store) => Rc::clone(store) as Rc<dyn SettingsStore>,
            StoreHandle::Gsettings(store) => Rc::clone(store) as Rc<dyn SettingsStore>,
        }
    }

    /// Start receiving values written to `key` outside this process.
    ///
    /// The desktop store is watched with `gsettings monitor`. The memory store
    /// has no other writers, so each non-empty line on stdin stands in for one.
    pub fn external_changes(&self, key: &SettingsKey) -> AppResult<ExternalChanges> {
        match self {
            StoreHandle::Gsettings(store) => {
                Ok(ExternalChanges::from_monitor(store.monitor(key)?))
            }
            StoreHandle::Memory(_) => {
                ExternalChanges::from_reader(BufReader::new(std::io::stdin()))
            }
        }
    }

    /// Hand an observed outside change to the store so its listeners run.
    pub fn deliver(&self, key: &SettingsKey, value: &str) {
        match self {
            StoreHandle::Memory(store) => store.notify_external(key, value),
            StoreHandle::Gsettings(store) => {
                // listeners re-read the key themselves
                let delivered = store.notify_external(key);
                log::debug!("Change of {key} to '{value}' delivered to {delivered} listeners");
            }
        }
    }
}

/// Channel of outside changes, plus whatever produces them.
pub struct ExternalChanges {
    receiver: flume::Receiver<String>,
    _monitor: Option<ChangeMonitor>,
}

impl ExternalChanges {
    pub fn from_monitor(monitor: ChangeMonitor) -> Self {
        Self {
            receiver: monitor.receiver().clone(),
            _monitor: Some(monitor),
        }
    }

    /// Treat each non-empty line of `reader` as a newly written value.
    ///
    /// The reader thread is detached; it ends at end of input or once the
    /// receiving side is gone.
    pub fn from_reader<R>(reader: R) -> AppResult<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (sender, receiver) = flume::unbounded();
        thread::Builder::new()
            .name("change-input".to_string())
            .spawn(move || {
                for line in reader.lines() {
                    let Ok(line) = line else { break };
                    let value = line.trim();
                    if value.is_empty() {
                        continue;
                    }
                    if sender.send(value.to_string()).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            receiver,
            _monitor: None,
        })
    }

    pub fn receiver(&self) -> &flume::Receiver<String> {
        &self.receiver
    }
}
