use super::{LoggingConfig, settings::SettingsConfig, validation::ConfigValidationError};
use crate::constants::SYSTEM_ICON_DIR;
use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    theme_roots: Option<Vec<PathBuf>>,

    #[serde(default)]
    settings: SettingsConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl AppConfig {
    /// Validate the configuration before it is used
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        let roots = self.theme_roots();
        if roots.is_empty() {
            errors.push(ConfigValidationError::NoThemeRoots);
        }
        for root in roots.iter().filter(|root| !root.is_absolute()) {
            errors.push(ConfigValidationError::RelativeThemeRoot { path: root.clone() });
        }

        if self.settings.schema().trim().is_empty() {
            errors.push(ConfigValidationError::EmptySetting { field: "schema" });
        }
        if self.settings.key().trim().is_empty() {
            errors.push(ConfigValidationError::EmptySetting { field: "key" });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Replace the configured theme roots, e.g. with command-line overrides
    pub fn with_theme_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.theme_roots = Some(roots);
        self
    }

    /// Theme roots in scan order. Defaults to the user and system icon directories.
    pub fn theme_roots(&self) -> Vec<PathBuf> {
        self.theme_roots.clone().unwrap_or_else(default_theme_roots)
    }

    pub fn settings(&self) -> &SettingsConfig {
        &self.settings
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }
}

/// `~/.local/share/icons` followed by `/usr/share/icons`
pub fn default_theme_roots() -> Vec<PathBuf> {
    let mut roots = Vec::with_capacity(2);
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".local").join("share").join("icons"));
    }
    roots.push(PathBuf::from(SYSTEM_ICON_DIR));
    roots
}
