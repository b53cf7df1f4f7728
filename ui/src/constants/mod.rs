pub mod env_vars;

/// Directory name used under the user's configuration directory
pub const APP_DIR_NAME: &str = "icon-switcher";

/// Configuration file name, looked up in the config directory and the working directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// System-wide icon theme directory
pub const SYSTEM_ICON_DIR: &str = "/usr/share/icons";
