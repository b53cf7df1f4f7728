use std::fmt;

/// Core validation trait that all validators must implement.
///
/// This trait provides a consistent interface for validating data across
/// the application.
///
/// # Type Parameters
///
/// * `T` - The type of data being validated (can be unsized like `str`)
///
/// # Examples
///
/// ```
/// use icon_switcher::validation::{ThemeNameValidator, Validator};
///
/// assert!(ThemeNameValidator.validate("Papirus-Dark").is_ok());
/// assert!(ThemeNameValidator.validate("../etc").is_err());
/// ```
pub trait Validator<T: ?Sized> {
    type Error;

    /// Validate the input and return Ok(()) if valid, or Err with validation error
    fn validate(&self, input: &T) -> Result<(), Self::Error>;
}

/// Longest directory name most filesystems accept
pub const MAX_THEME_NAME_BYTES: usize = 255;

/// Reasons a theme name cannot name an icon theme directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeNameError {
    Empty,
    Reserved(String),
    PathSeparator(String),
    ControlCharacter(String),
    TooLong { length: usize },
}

impl ThemeNameError {
    pub fn user_message(&self) -> String {
        match self {
            ThemeNameError::Empty => "Theme name cannot be empty".to_string(),
            ThemeNameError::Reserved(name) => {
                format!("'{name}' is not a theme directory name")
            }
            ThemeNameError::PathSeparator(name) => {
                format!("Theme name '{name}' must not contain '/'")
            }
            ThemeNameError::ControlCharacter(name) => {
                format!("Theme name {name:?} contains control characters")
            }
            ThemeNameError::TooLong { length } => format!(
                "Theme name is {length} bytes long, the limit is {MAX_THEME_NAME_BYTES}"
            ),
        }
    }
}

impl fmt::Display for ThemeNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for ThemeNameError {}

/// Accepts anything that can be the name of a directory under an icon root.
///
/// Whether the theme is actually installed is not checked here; the store
/// accepts unknown names.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeNameValidator;

impl Validator<str> for ThemeNameValidator {
    type Error = ThemeNameError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        if input.is_empty() {
            return Err(ThemeNameError::Empty);
        }
        if input == "." || input == ".." {
            return Err(ThemeNameError::Reserved(input.to_string()));
        }
        if input.contains('/') {
            return Err(ThemeNameError::PathSeparator(input.to_string()));
        }
        if input.chars().any(char::is_control) {
            return Err(ThemeNameError::ControlCharacter(input.to_string()));
        }
        if input.len() > MAX_THEME_NAME_BYTES {
            return Err(ThemeNameError::TooLong {
                length: input.len(),
            });
        }
        Ok(())
    }
}
