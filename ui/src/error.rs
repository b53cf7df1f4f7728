use crate::config::ConfigValidationError;
use crate::validation::ThemeNameError;
use engine::{MenuError, StoreError};
use std::fmt::Display;

/// Application-wide error types for the icon switcher command line.
///
/// Every failure that reaches `main` is one of these. The payload is the
/// already formatted message; the variant decides the prefix printed to the
/// user and the hint that follows it.
///
/// # Error Categories
///
/// - [`Config`] - configuration loading and validation errors
/// - [`Store`] - the settings store could not be read, written or watched
/// - [`Validation`] - a theme name given on the command line was rejected
/// - [`Io`] - writing output or reading change input failed
///
/// # Examples
///
/// ```no_run
/// use icon_switcher::error::{AppError, AppResult};
///
/// fn apply(menu: &mut engine::ThemeMenu, name: &str) -> AppResult<()> {
///     // MenuError converts into AppError::Store
///     menu.select(name)?;
///     Ok(())
/// }
/// ```
///
/// [`Config`]: AppError::Config
/// [`Store`]: AppError::Store
/// [`Validation`]: AppError::Validation
/// [`Io`]: AppError::Io
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration could not be loaded or failed validation.
    ///
    /// # Recovery
    /// - Fix the reported entries in `config.toml`
    /// - Check `ICON_SWITCHER__*` environment variables
    Config(String),

    /// The settings store failed.
    ///
    /// Carries the failed operation and key. The menu keeps its previous
    /// markers whenever this is raised from a refresh or a selection.
    Store(String),

    /// A theme name was rejected before it reached the store.
    Validation(String),

    /// Output or change input failed.
    Io(String),
}

impl AppError {
    /// Short follow-up hint shown below the error message
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            AppError::Config(_) => {
                Some("Check ~/.config/icon-switcher/config.toml and ICON_SWITCHER__* variables.")
            }
            AppError::Store(_) => Some(
                "Make sure the gsettings tool is installed, \
                 or run with --memory-store to try without it.",
            ),
            AppError::Validation(_) => Some("Run `icon-switcher list` to see installed themes."),
            AppError::Io(_) => None,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration Error: {msg}"),
            AppError::Store(msg) => write!(f, "Settings Store Error: {msg}"),
            AppError::Validation(msg) => write!(f, "Validation Error: {msg}"),
            AppError::Io(msg) => write!(f, "IO Error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err.to_string())
    }
}

impl From<MenuError> for AppError {
    fn from(err: MenuError) -> Self {
        AppError::Store(err.to_string())
    }
}

impl From<ThemeNameError> for AppError {
    fn from(err: ThemeNameError) -> Self {
        AppError::Validation(err.user_message())
    }
}

impl From<ConfigValidationError> for AppError {
    fn from(err: ConfigValidationError) -> Self {
        AppError::Config(err.user_message())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Io(format!("Failed to encode JSON output: {err}"))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use engine::settings::StoreOperation;

    #[test]
    fn test_store_error_converts_with_context() {
        let err = StoreError::unavailable(
            StoreOperation::Write,
            engine::SettingsKey::icon_theme(),
            "daemon not running",
        );
        let app_error = AppError::from(err);

        let AppError::Store(message) = &app_error else {
            panic!("expected store error, got {app_error:?}");
        };
        assert!(message.contains("org.gnome.desktop.interface::icon-theme"));
        assert!(message.contains("daemon not running"));
        assert!(app_error.to_string().starts_with("Settings Store Error:"));
        assert!(app_error.suggestion().is_some());
    }

    #[test]
    fn test_theme_name_error_is_validation() {
        let app_error = AppError::from(ThemeNameError::Empty);
        assert!(matches!(app_error, AppError::Validation(_)));
    }

    #[test]
    fn test_io_error_has_no_suggestion() {
        let err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert_eq!(AppError::from(err).suggestion(), None);
    }
}
