use super::app::AppConfig;
use crate::constants::env_vars::THEME_ROOTS;
use std::path::PathBuf;

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("No theme roots configured")]
    NoThemeRoots,
    #[error("Theme root is not an absolute path: {}", .path.display())]
    RelativeThemeRoot { path: PathBuf },
    #[error("Setting '{field}' must not be empty")]
    EmptySetting { field: &'static str },
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::NoThemeRoots => {
                format!(
                    "No icon theme directories configured!\n\n\
                    Please list at least one directory in theme_roots in config.toml\n\
                    or set {THEME_ROOTS}."
                )
            }
            ConfigValidationError::RelativeThemeRoot { path } => {
                format!(
                    "Theme root must be an absolute path!\n\n\
                    Your configured value: {}\n\n\
                    Please update theme_roots in config.toml.",
                    path.display()
                )
            }
            ConfigValidationError::EmptySetting { field } => {
                format!(
                    "Settings {field} is empty!\n\n\
                    Please update settings.{field} in config.toml or remove it to use the default."
                )
            }
        }
    }
}

/// Configuration loading result
#[derive(Debug, Clone)]
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
}
