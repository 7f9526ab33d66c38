//! Free-form meta attributes and their inheritance rules.

use indexmap::IndexMap;

/// Meta attribute keys understood by the generators.
pub mod meta_keys {
    pub const INTERFACE: &str = "interface";
    pub const EXTENDS: &str = "extends";
    pub const IMPLEMENTS: &str = "implements";
    pub const SCOPE_CLASS: &str = "scope-class";
    pub const CLASS_MODIFIER: &str = "class-modifier";
    pub const ABSTRACT: &str = "abstract";
    pub const GENERATED_CLASS: &str = "generated-class";
    pub const CLASS_DESCRIPTION: &str = "class-description";
    pub const CLASS_CODE: &str = "class-code";
    pub const FIELD_DESCRIPTION: &str = "field-description";
    pub const PROPERTY_TYPE: &str = "property-type";
    pub const GEN_PROPERTY: &str = "gen-property";
    pub const USE_IN_EQUALS: &str = "use-in-equals";
    pub const USE_IN_TOSTRING: &str = "use-in-tostring";
    pub const SCOPE_FIELD: &str = "scope-field";
    pub const SCOPE_GET: &str = "scope-get";
    pub const SCOPE_SET: &str = "scope-set";
}

/// A named attribute bound to an ordered, non-empty list of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaAttribute {
    name: String,
    values: Vec<String>,
    inherit: bool,
}

impl MetaAttribute {
    /// Create an inheritable attribute with a single value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_values(name, [value])
    }

    /// Create an inheritable attribute with several values.
    pub fn with_values(
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            inherit: true,
        }
    }

    /// Mark whether subclasses and properties see this attribute.
    pub fn inherit(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }

    /// Append a value.
    pub fn add_value(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_inherited(&self) -> bool {
        self.inherit
    }

    /// The first value, if any.
    pub fn first(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// True when the first value reads `true` (case-insensitive).
    pub fn is_true(&self) -> bool {
        self.first()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    /// True when the first value reads `false` (case-insensitive).
    pub fn is_false(&self) -> bool {
        self.first()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("false"))
    }

    /// All values joined with `sep`.
    pub fn joined(&self, sep: &str) -> String {
        self.values.join(sep)
    }
}

/// The meta attributes declared at one level (class, component or property).
///
/// Keys keep their declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaAttributes {
    attributes: IndexMap<String, MetaAttribute>,
}

impl MetaAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, replacing any previous declaration of the same key.
    pub fn insert(&mut self, attribute: MetaAttribute) {
        self.attributes
            .insert(attribute.name().to_string(), attribute);
    }

    pub fn get(&self, key: &str) -> Option<&MetaAttribute> {
        self.attributes.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetaAttribute> {
        self.attributes.values()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Resolve `key` over a chain of levels, nearest first.
    ///
    /// The nearest level answers with any attribute it declares; outer
    /// levels only contribute attributes marked as inherited. The first
    /// declaring level wins outright, values are never merged.
    pub fn resolve<'a>(
        levels: impl IntoIterator<Item = &'a MetaAttributes>,
        key: &str,
    ) -> Option<&'a MetaAttribute> {
        for (depth, level) in levels.into_iter().enumerate() {
            if let Some(attribute) = level.get(key)
                && (depth == 0 || attribute.is_inherited())
            {
                return Some(attribute);
            }
        }
        None
    }
}

impl FromIterator<MetaAttribute> for MetaAttributes {
    fn from_iter<T: IntoIterator<Item = MetaAttribute>>(iter: T) -> Self {
        let mut attributes = Self::new();
        for attribute in iter {
            attributes.insert(attribute);
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        assert!(MetaAttribute::new("interface", "true").is_true());
        assert!(MetaAttribute::new("interface", " TRUE ").is_true());
        assert!(!MetaAttribute::new("interface", "yes").is_true());
        assert!(MetaAttribute::new("gen-property", "false").is_false());
    }

    #[test]
    fn test_insert_replaces() {
        let mut attrs = MetaAttributes::new();
        attrs.insert(MetaAttribute::with_values("extends", ["a", "b"]));
        attrs.insert(MetaAttribute::new("extends", "c"));
        assert_eq!(attrs.get("extends").unwrap().values(), ["c"]);
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_resolve_nearest_level_wins() {
        let base: MetaAttributes = [MetaAttribute::with_values("implements", ["a", "b"])]
            .into_iter()
            .collect();
        let sub: MetaAttributes = [MetaAttribute::new("implements", "c")].into_iter().collect();

        let resolved = MetaAttributes::resolve([&sub, &base], "implements").unwrap();
        assert_eq!(resolved.values(), ["c"]);
    }

    #[test]
    fn test_resolve_walks_to_inherited() {
        let base: MetaAttributes = [MetaAttribute::new("scope-class", "public strictfp")]
            .into_iter()
            .collect();
        let sub = MetaAttributes::new();

        let resolved = MetaAttributes::resolve([&sub, &base], "scope-class").unwrap();
        assert_eq!(resolved.first(), Some("public strictfp"));
    }

    #[test]
    fn test_resolve_skips_non_inherited() {
        let base: MetaAttributes = [MetaAttribute::new("class-code", "// base only").inherit(false)]
            .into_iter()
            .collect();
        let sub = MetaAttributes::new();

        assert!(MetaAttributes::resolve([&sub, &base], "class-code").is_none());
        assert!(MetaAttributes::resolve([&base], "class-code").is_some());
    }
}
