/// Environment variable name constants
/// This module provides centralized constants for the environment variables
/// that override values from config.toml.
//
// Prefix shared by every override
pub const ENV_PREFIX: &str = "ICON_SWITCHER";
pub const ENV_SEPARATOR: &str = "__";

// Theme discovery
pub const THEME_ROOTS: &str = "ICON_SWITCHER__THEME_ROOTS";
pub const THEME_ROOTS_SEPARATOR: &str = ":";

// Logging
pub const LOGGING_LEVEL: &str = "ICON_SWITCHER__LOGGING__LEVEL";
