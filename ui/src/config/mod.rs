use crate::constants::env_vars::{ENV_PREFIX, ENV_SEPARATOR, THEME_ROOTS_SEPARATOR};
use crate::constants::{APP_DIR_NAME, CONFIG_FILE_NAME};
use crate::error::{AppError, AppResult};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// Re-export all submodules
pub mod app;
pub mod settings;
pub mod validation;

// Re-export main types
pub use app::{AppConfig, default_theme_roots};
pub use settings::{SettingsConfig, StoreBackend};
pub use validation::{ConfigLoadResult, ConfigValidationError};

/// Global configuration loading and access
static CONFIG: OnceLock<ConfigLoadResult> = OnceLock::new();

/// `$XDG_CONFIG_HOME/icon-switcher/config.toml`, when a config directory exists
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration from files and environment variables.
///
/// With `explicit` set, that file is mandatory and the default locations are
/// skipped. Otherwise the user config file and `./config.toml` are read when
/// present. Environment variables prefixed with `ICON_SWITCHER__` override
/// both; `ICON_SWITCHER__THEME_ROOTS` takes a `:`-separated list.
pub fn load_config(explicit: Option<&Path>) -> ConfigLoadResult {
    load_config_with(explicit, Vec::new())
}

/// Like [`load_config`], with `theme_roots` from the command line replacing
/// the configured roots before validation. An empty list keeps the
/// configured roots.
pub fn load_config_with(explicit: Option<&Path>, theme_roots: Vec<PathBuf>) -> ConfigLoadResult {
    dotenv::dotenv().ok();

    let env_source = Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
        .list_separator(THEME_ROOTS_SEPARATOR)
        .with_list_parse_key("theme_roots");

    let mut builder = Config::builder();
    match explicit {
        Some(path) => {
            builder = builder.add_source(File::from(path).required(true));
        }
        None => {
            if let Some(path) = user_config_path() {
                builder = builder.add_source(File::from(path).required(false));
            }
            builder = builder.add_source(File::with_name(CONFIG_FILE_NAME).required(false));
        }
    }

    // environment entries override file values when present
    let config = match builder.add_source(env_source).build() {
        Ok(config) => config,
        Err(e) => {
            return ConfigLoadResult::LoadError(format!(
                "Configuration loading failed: {e}. \
                 Please check your config.toml file and environment variables."
            ));
        }
    };

    match config.try_deserialize::<AppConfig>() {
        Ok(mut app_config) => {
            if !theme_roots.is_empty() {
                app_config = app_config.with_theme_roots(theme_roots);
            }
            if let Err(validation_errors) = app_config.validate() {
                let error_messages: Vec<String> =
                    validation_errors.iter().map(|e| e.user_message()).collect();
                return ConfigLoadResult::DeserializeError(format!(
                    "Configuration validation failed:\n{}",
                    error_messages.join("\n\n")
                ));
            }
            ConfigLoadResult::Success(Box::new(app_config))
        }
        Err(e) => ConfigLoadResult::DeserializeError(format!("Failed to deserialize config: {e}")),
    }
}

/// Load the configuration once for the lifetime of the process.
///
/// Only the first call decides which file is read and which root overrides
/// apply; later calls return the cached result.
pub fn init_config(
    explicit: Option<&Path>,
    theme_roots: Vec<PathBuf>,
) -> &'static ConfigLoadResult {
    CONFIG.get_or_init(|| load_config_with(explicit, theme_roots))
}

pub fn get_config() -> &'static ConfigLoadResult {
    init_config(None, Vec::new())
}

impl ConfigLoadResult {
    pub fn as_result(&self) -> AppResult<&AppConfig> {
        match self {
            ConfigLoadResult::Success(config) => Ok(config),
            ConfigLoadResult::LoadError(e) => Err(AppError::Config(e.clone())),
            ConfigLoadResult::DeserializeError(e) => Err(AppError::Config(e.clone())),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
