//! Core utilities and types for the pojogen source generator.
//!
//! This crate provides the fundamental pieces shared by every other
//! pojogen crate: writing generated files, Java-flavoured naming helpers
//! and the flat settings map that configures a generation run.

mod file;
mod settings;
mod utils;

// File operations
pub use file::{OutputFile, WriteResult, write_file};
// Configuration
pub use settings::{Settings, SettingsError, keys};
// String utilities
pub use utils::{
    bean_capitalize, pluralize, qualifier, to_camel_case, to_pascal_case, toml_value_to_string,
    unqualify,
};
