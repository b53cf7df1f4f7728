//! # Icon Switcher
//!
//! Command-line front end for the icon theme switcher engine. It plays the
//! role of a panel menu: list the installed icon themes, show which one is
//! active, apply another one and follow changes made elsewhere.
//!
//! ## Modules
//!
//! - [`app`] - Command execution against the theme menu
//! - [`cli`] - Command-line arguments and subcommands
//! - [`config`] - Configuration loading, layering and validation
//! - [`constants`] - Global constants for environment variables and shared values
//! - [`error`] - Application error type and result alias
//! - [`logger`] - Logging configuration
//! - [`validation`] - Input validation for theme names
//!
//! This library interface enables integration testing by providing access to internal modules.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod logger;
pub mod validation;

// Re-export commonly used types for easier access in tests
pub use error::AppError;

// Re-export validation trait for broader use
pub use validation::Validator;
