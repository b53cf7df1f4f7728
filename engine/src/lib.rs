//! # Icon Switcher Engine
//!
//! Host-independent core of the icon theme switcher. The engine discovers
//! installed icon themes on disk and keeps a menu's "active" marker in step
//! with the desktop setting that names the current icon theme.
//!
//! ## Modules
//!
//! - [`model`] - Theme sets, active markers and menu entries
//! - [`scanner`] - Icon theme discovery across a list of root directories
//! - [`settings`] - Settings store collaborator and its backends
//! - [`sync`] - Reading, writing and observing the active theme name
//! - [`menu`] - Menu model that ties scanning and synchronization together
//!
//! ## Data flow
//!
//! ```text
//! ThemeScanner --ThemeSet--> ThemeMenu --select--> ThemeStateSync --set--> SettingsStore
//!                               ^                                            |
//!                               +-------------- change notification ---------+
//! ```

pub mod menu;
pub mod model;
pub mod scanner;
pub mod settings;
pub mod sync;

pub use menu::{MenuError, ThemeMenu};
pub use model::{Marker, MarkerMap, MenuEntry, ThemeSet};
pub use scanner::{ScanReport, SkippedRoot, ThemeScanner};
pub use settings::{SettingsKey, SettingsStore, StoreError};
pub use sync::{Subscription, ThemeStateSync};
