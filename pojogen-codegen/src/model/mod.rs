//! Structural class model derived from mapping metadata.

mod declaration;
mod docs;
mod pojo;
pub mod types;

pub use declaration::{Declaration, canonical_modifiers};
pub use docs::to_java_doc;
pub use pojo::{ClassSource, FieldSpec, PojoClass};
use pojogen_core::{Settings, keys, unqualify};

/// Options shared by every class model of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelOptions {
    /// Emit generic collection types; raw types otherwise.
    pub generics: bool,
    /// Package replacing the mapped package of every class.
    pub package: Option<String>,
    /// Class documentation used when a class declares none.
    pub doc_fallback: Option<String>,
}

impl ModelOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            generics: settings.flag(keys::JDK5),
            package: settings.get(keys::PACKAGE).map(str::to_string),
            doc_fallback: settings.get(keys::DOC_FALLBACK).map(str::to_string),
        }
    }

    /// Move a mapped class name into the configured package, if any.
    pub fn relocate(&self, class_name: &str) -> String {
        match self.package.as_deref() {
            None => class_name.to_string(),
            Some("") => unqualify(class_name).to_string(),
            Some(package) => format!("{}.{}", package, unqualify(class_name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_settings() {
        let settings = Settings::new()
            .set(keys::JDK5, "true")
            .set(keys::PACKAGE, "com.acme")
            .set(keys::DOC_FALLBACK, "Generated class");
        let options = ModelOptions::from_settings(&settings);

        assert!(options.generics);
        assert_eq!(options.package.as_deref(), Some("com.acme"));
        assert_eq!(options.doc_fallback.as_deref(), Some("Generated class"));
        assert_eq!(options.relocate("org.test.Order"), "com.acme.Order");

        let defaults = ModelOptions::from_settings(&Settings::new());
        assert!(!defaults.generics);
        assert_eq!(defaults.relocate("org.test.Order"), "org.test.Order");
    }
}
