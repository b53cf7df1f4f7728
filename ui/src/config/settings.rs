use engine::SettingsKey;
use engine::settings::gsettings::GSETTINGS_PROGRAM;
use engine::settings::{ICON_THEME_KEY, INTERFACE_SCHEMA};
use serde::Deserialize;
use std::fmt;

/// Which settings store holds the active icon theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Desktop settings daemon, through the `gsettings` tool
    #[default]
    Gsettings,
    /// Process-local store; nothing is persisted
    Memory,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Gsettings => write!(f, "gsettings"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Settings store configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct SettingsConfig {
    schema: Option<String>,
    key: Option<String>,
    backend: Option<StoreBackend>,
    gsettings_program: Option<String>,
}

impl SettingsConfig {
    pub fn schema(&self) -> &str {
        self.schema.as_deref().unwrap_or(INTERFACE_SCHEMA)
    }

    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or(ICON_THEME_KEY)
    }

    pub fn backend(&self) -> StoreBackend {
        self.backend.unwrap_or_default()
    }

    pub fn gsettings_program(&self) -> &str {
        self.gsettings_program
            .as_deref()
            .unwrap_or(GSETTINGS_PROGRAM)
    }

    pub fn settings_key(&self) -> SettingsKey {
        SettingsKey::new(self.schema(), self.key())
    }
}
