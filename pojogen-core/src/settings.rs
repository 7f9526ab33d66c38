//! Flat key/value settings for a generation run.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::toml_value_to_string;

/// Well-known settings keys.
pub mod keys {
    /// Emit generic collection types (`Set<Item>`) instead of raw ones.
    pub const JDK5: &str = "jdk5";
    /// Package for generated classes without an explicit `generated-class`.
    pub const PACKAGE: &str = "package";
    /// Class documentation used when a class has no `class-description`.
    pub const DOC_FALLBACK: &str = "doc.fallback";
    /// Abort the run on the first failed write.
    pub const STRICT: &str = "strict";
    /// Number of worker threads used to render units.
    pub const JOBS: &str = "jobs";
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings file '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse settings file '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("setting '{key}' has invalid value '{value}': expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// A flat string → string settings map.
///
/// Nested TOML tables are flattened with `.` separators, so
/// `[doc] fallback = "x"` becomes the key `doc.fallback`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    /// Create empty settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let table: toml::Table = toml::from_str(content)?;
        let mut settings = Self::new();
        settings.flatten("", &table);
        Ok(settings)
    }

    fn flatten(&mut self, prefix: &str, table: &toml::Table) {
        for (key, value) in table {
            let key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            match value {
                toml::Value::Table(nested) => self.flatten(&key, nested),
                other => {
                    self.values.insert(key, toml_value_to_string(other));
                }
            }
        }
    }

    /// Set a value, replacing any previous one.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Merge `other` into these settings; `other` wins on conflicts.
    pub fn merge(&mut self, other: &Settings) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Get a raw value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Interpret a value as a boolean flag; missing keys are `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key)
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"))
    }

    /// Interpret a value as a positive count.
    pub fn count(&self, key: &str) -> Result<Option<usize>, SettingsError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(SettingsError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
                expected: "a positive integer",
            }),
        }
    }

    /// Iterate over all settings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse_flattens_tables() {
        let settings = Settings::parse(
            r#"
            jdk5 = true
            package = "org.example"
            jobs = 4

            [doc]
            fallback = "Generated entity"
            "#,
        )
        .unwrap();

        assert!(settings.flag(keys::JDK5));
        assert_eq!(settings.get(keys::PACKAGE), Some("org.example"));
        assert_eq!(settings.get(keys::DOC_FALLBACK), Some("Generated entity"));
        assert_eq!(settings.count(keys::JOBS).unwrap(), Some(4));
    }

    #[test]
    fn test_missing_flag_is_false() {
        let settings = Settings::new();
        assert!(!settings.flag(keys::STRICT));
        assert_eq!(settings.count(keys::JOBS).unwrap(), None);
    }

    #[test]
    fn test_invalid_count() {
        let settings = Settings::new().set(keys::JOBS, "zero");
        assert!(matches!(
            settings.count(keys::JOBS),
            Err(SettingsError::InvalidValue { .. })
        ));
        let settings = Settings::new().set(keys::JOBS, "0");
        assert!(settings.count(keys::JOBS).is_err());
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = Settings::new().set(keys::JDK5, "false").set(keys::PACKAGE, "a");
        base.merge(&Settings::new().set(keys::JDK5, "true"));
        assert!(base.flag(keys::JDK5));
        assert_eq!(base.get(keys::PACKAGE), Some("a"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = Settings::load(temp.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn test_load_unparseable_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        std::fs::write(&path, "jdk5 = = true").unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::Parse { .. })
        ));
    }
}
