//! The class model of one generated unit.

use pojogen_core::{bean_capitalize, qualifier, unqualify};
use pojogen_mapping::{
    CollectionBinding, CollectionKind, ComponentBinding, MetaAttribute, MetaAttributes, Metadata,
    PersistentClassBinding, PropertyBinding, ValueKind, meta_keys,
};

use super::{Declaration, ModelOptions, canonical_modifiers, to_java_doc, types};
use crate::{ImportResolver, ModelError, TypeReference};

const SERIALIZABLE: &str = "java.io.Serializable";

/// What a class model is generated from.
#[derive(Debug, Clone, Copy)]
pub enum ClassSource<'a> {
    Entity(&'a PersistentClassBinding),
    Component(&'a ComponentBinding),
}

/// A field of the generated class with its accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    /// Fully-qualified Java type, not yet passed through an import context.
    pub type_name: String,
    pub getter: String,
    pub setter: String,
    /// Raw `field-description` text.
    pub doc: Option<String>,
    pub is_identifier: bool,
    pub field_scope: String,
    pub getter_scope: String,
    pub setter_scope: String,
    /// Collection implementation used to initialise the field, if any.
    pub initializer: Option<String>,
}

/// Structural model of one generated class or interface.
///
/// Holds no rendering state; import decisions belong to the
/// [`ImportResolver`] passed into the formatting methods.
#[derive(Debug, Clone)]
pub struct PojoClass<'a> {
    metadata: &'a Metadata,
    source: ClassSource<'a>,
    options: &'a ModelOptions,
    qualified_name: String,
    declaration: Declaration,
}

impl<'a> PojoClass<'a> {
    pub fn for_entity(
        metadata: &'a Metadata,
        binding: &'a PersistentClassBinding,
        options: &'a ModelOptions,
    ) -> Self {
        Self::new(metadata, ClassSource::Entity(binding), options)
    }

    pub fn for_component(
        metadata: &'a Metadata,
        component: &'a ComponentBinding,
        options: &'a ModelOptions,
    ) -> Self {
        Self::new(metadata, ClassSource::Component(component), options)
    }

    fn new(metadata: &'a Metadata, source: ClassSource<'a>, options: &'a ModelOptions) -> Self {
        let mut pojo = Self {
            metadata,
            source,
            options,
            qualified_name: String::new(),
            declaration: Declaration::Class {
                extends: Vec::new(),
                implements: Vec::new(),
            },
        };
        pojo.qualified_name = pojo.compute_qualified_name();
        pojo.declaration = pojo.compute_declaration();
        pojo
    }

    fn own_meta(&self) -> &'a MetaAttributes {
        match self.source {
            ClassSource::Entity(binding) => &binding.meta,
            ClassSource::Component(component) => &component.meta,
        }
    }

    fn compute_qualified_name(&self) -> String {
        // Never inherited: a subclass must not take over its parent's name.
        if let Some(generated) = self
            .own_meta()
            .get(meta_keys::GENERATED_CLASS)
            .and_then(MetaAttribute::first)
        {
            return generated.to_string();
        }
        self.options.relocate(self.mapped_class_name())
    }

    fn compute_declaration(&self) -> Declaration {
        let mut extends: Vec<String> = self.structural_superclass().into_iter().collect();
        extends.extend(self.meta_values(meta_keys::EXTENDS));

        if self.meta_is_true(meta_keys::INTERFACE) {
            return Declaration::Interface { extends };
        }

        let mut implements = self.meta_values(meta_keys::IMPLEMENTS);
        if self.structural_superclass().is_none()
            && !implements.iter().any(|i| i == SERIALIZABLE)
        {
            implements.push(SERIALIZABLE.to_string());
        }
        Declaration::Class {
            extends,
            implements,
        }
    }

    fn structural_superclass(&self) -> Option<String> {
        match self.source {
            ClassSource::Entity(binding) => self
                .metadata
                .superclass_of(binding)
                .map(|parent| self.options.relocate(&parent.class_name)),
            ClassSource::Component(_) => None,
        }
    }

    pub fn source(&self) -> ClassSource<'a> {
        self.source
    }

    pub fn options(&self) -> &'a ModelOptions {
        self.options
    }

    pub fn metadata(&self) -> &'a Metadata {
        self.metadata
    }

    pub fn is_component(&self) -> bool {
        matches!(self.source, ClassSource::Component(_))
    }

    /// Class name as written in the mapping.
    pub fn mapped_class_name(&self) -> &'a str {
        match self.source {
            ClassSource::Entity(binding) => &binding.class_name,
            ClassSource::Component(component) => &component.class_name,
        }
    }

    /// Resolve a class-level meta attribute, following superclasses.
    pub fn meta(&self, key: &str) -> Option<&'a MetaAttribute> {
        match self.source {
            ClassSource::Entity(binding) => self.metadata.class_meta(binding, key),
            ClassSource::Component(component) => component.meta.get(key),
        }
    }

    fn meta_values(&self, key: &str) -> Vec<String> {
        self.meta(key)
            .map(|attribute| attribute.values().to_vec())
            .unwrap_or_default()
    }

    fn meta_is_true(&self, key: &str) -> bool {
        self.meta(key).is_some_and(MetaAttribute::is_true)
    }

    /// Resolve a meta attribute of `property`, which is declared on `owner`.
    fn property_meta_on(
        &self,
        owner: Option<&'a PersistentClassBinding>,
        property: &'a PropertyBinding,
        key: &str,
    ) -> Option<&'a MetaAttribute> {
        match (owner, self.source) {
            (Some(owner), _) => self.metadata.property_meta(owner, property, key),
            (None, ClassSource::Component(component)) => {
                MetaAttributes::resolve([&property.meta, &component.meta], key)
            }
            (None, ClassSource::Entity(binding)) => {
                self.metadata.property_meta(binding, property, key)
            }
        }
    }

    /// Resolve a meta attribute of one of this class's own properties.
    pub fn property_meta(
        &self,
        property: &'a PropertyBinding,
        key: &str,
    ) -> Option<&'a MetaAttribute> {
        self.property_meta_on(None, property, key)
    }

    fn is_generated_on(
        &self,
        owner: Option<&'a PersistentClassBinding>,
        property: &'a PropertyBinding,
    ) -> bool {
        !self
            .property_meta_on(owner, property, meta_keys::GEN_PROPERTY)
            .is_some_and(MetaAttribute::is_false)
    }

    // Names

    pub fn qualified_declaration_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn declaration_name(&self) -> &str {
        unqualify(&self.qualified_name)
    }

    pub fn package_name(&self) -> &str {
        qualifier(&self.qualified_name)
    }

    /// `package x.y;`, or empty for the default package.
    pub fn package_declaration(&self) -> String {
        match self.package_name() {
            "" => String::new(),
            package => format!("package {};", package),
        }
    }

    // Declaration

    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    pub fn is_interface(&self) -> bool {
        self.declaration.is_interface()
    }

    pub fn declaration_type(&self) -> &'static str {
        self.declaration.keyword()
    }

    /// Supertypes joined with `,`, or `None` when there are none.
    pub fn extends(&self) -> Option<String> {
        join_non_empty(self.declaration.extends())
    }

    /// Implemented interfaces joined with `,`; always `None` for interfaces.
    pub fn implements(&self) -> Option<String> {
        join_non_empty(self.declaration.implements())
    }

    pub fn extends_declaration(&self, imports: &mut dyn ImportResolver) -> String {
        clause("extends", self.declaration.extends(), imports)
    }

    pub fn implements_declaration(&self, imports: &mut dyn ImportResolver) -> String {
        clause("implements", self.declaration.implements(), imports)
    }

    /// Class modifiers in canonical order, `public` unless scoped otherwise.
    pub fn class_modifiers(&self) -> String {
        let mut tokens: Vec<&str> = Vec::new();
        match self.meta(meta_keys::SCOPE_CLASS) {
            Some(scope) => tokens.extend(scope.values().iter().flat_map(|v| v.split_whitespace())),
            None => tokens.push("public"),
        }
        if let Some(modifiers) = self.meta(meta_keys::CLASS_MODIFIER) {
            tokens.extend(modifiers.values().iter().flat_map(|v| v.split_whitespace()));
        }
        if self.meta_is_true(meta_keys::ABSTRACT) {
            tokens.push("abstract");
        }
        canonical_modifiers(tokens)
    }

    // Properties

    /// The identifier declared by this class itself (root entities only).
    pub fn identifier(&self) -> Option<&'a PropertyBinding> {
        match self.source {
            ClassSource::Entity(binding) => binding
                .identifier
                .as_ref()
                .filter(|id| self.is_generated_on(Some(binding), id)),
            ClassSource::Component(_) => None,
        }
    }

    /// Declared properties without the identifier, in declaration order.
    pub fn properties(&self) -> Vec<&'a PropertyBinding> {
        let (owner, properties) = match self.source {
            ClassSource::Entity(binding) => (Some(binding), &binding.properties),
            ClassSource::Component(component) => (None, &component.properties),
        };
        properties
            .iter()
            .filter(|p| self.is_generated_on(owner, p))
            .collect()
    }

    /// Identifier first, then declared properties.
    pub fn all_properties(&self) -> Vec<&'a PropertyBinding> {
        self.identifier()
            .into_iter()
            .chain(self.properties())
            .collect()
    }

    /// Components held directly by this class, identifier first.
    pub fn components(&self) -> Vec<&'a ComponentBinding> {
        self.all_properties()
            .into_iter()
            .filter_map(PropertyBinding::as_component)
            .collect()
    }

    fn constructor_properties_of(
        &self,
        level: &'a PersistentClassBinding,
        required_only: bool,
    ) -> Vec<&'a PropertyBinding> {
        let mut out = Vec::new();
        if let Some(id) = &level.identifier {
            let supplied = level.has_assigned_identifier()
                || matches!(id.value, ValueKind::Component(_));
            if supplied && self.is_generated_on(Some(level), id) {
                out.push(id);
            }
        }
        out.extend(
            level
                .properties
                .iter()
                .filter(|p| !required_only || !p.nullable)
                .filter(|p| self.is_generated_on(Some(level), p)),
        );
        out
    }

    fn super_constructor_properties(&self, required_only: bool) -> Vec<&'a PropertyBinding> {
        let ClassSource::Entity(binding) = self.source else {
            return Vec::new();
        };
        let mut ancestors = self.metadata.hierarchy(binding);
        ancestors.remove(0);
        ancestors
            .into_iter()
            .rev()
            .flat_map(|level| self.constructor_properties_of(level, required_only))
            .collect()
    }

    fn own_constructor_properties(&self, required_only: bool) -> Vec<&'a PropertyBinding> {
        match self.source {
            ClassSource::Entity(binding) => self.constructor_properties_of(binding, required_only),
            ClassSource::Component(_) => self
                .properties()
                .into_iter()
                .filter(|p| !required_only || !p.nullable)
                .collect(),
        }
    }

    /// Superclass part of the full constructor, root first.
    pub fn properties_for_super_constructor(&self) -> Vec<&'a PropertyBinding> {
        self.super_constructor_properties(false)
    }

    /// Parameters of the full constructor: superclass closure, then own
    /// properties. Generated identifiers are left out.
    pub fn properties_for_full_constructor(&self) -> Vec<&'a PropertyBinding> {
        let mut properties = self.super_constructor_properties(false);
        properties.extend(self.own_constructor_properties(false));
        properties
    }

    pub fn needs_full_constructor(&self) -> bool {
        !self.properties_for_full_constructor().is_empty()
    }

    pub fn properties_for_super_minimal_constructor(&self) -> Vec<&'a PropertyBinding> {
        self.super_constructor_properties(true)
    }

    /// Parameters of the minimal constructor: the non-nullable subset of the
    /// full constructor's parameters.
    pub fn properties_for_minimal_constructor(&self) -> Vec<&'a PropertyBinding> {
        let mut properties = self.super_constructor_properties(true);
        properties.extend(self.own_constructor_properties(true));
        properties
    }

    /// True when the minimal constructor differs from both the no-argument
    /// and the full constructor.
    pub fn needs_minimal_constructor(&self) -> bool {
        let minimal = self.properties_for_minimal_constructor().len();
        minimal > 0 && minimal < self.properties_for_full_constructor().len()
    }

    /// `"T1 a, T2 b"` with types resolved through `imports`.
    pub fn as_parameter_list(
        &self,
        properties: &[&'a PropertyBinding],
        imports: &mut dyn ImportResolver,
    ) -> Result<String, ModelError> {
        let mut parameters = Vec::with_capacity(properties.len());
        for property in properties {
            let java_type = self.java_type_name(property)?;
            parameters.push(format!("{} {}", imports.import_type(&java_type), property.name));
        }
        Ok(parameters.join(", "))
    }

    /// `"a, b"`.
    pub fn as_argument_list(&self, properties: &[&'a PropertyBinding]) -> String {
        properties
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    // Types

    /// Java type of `property`, fully qualified.
    pub fn java_type_name(&self, property: &'a PropertyBinding) -> Result<String, ModelError> {
        if let Some(override_type) = self.property_meta(property, meta_keys::PROPERTY_TYPE) {
            let declared = override_type.joined(",");
            TypeReference::parse(&declared)
                .map_err(|e| self.malformed(property, e.to_string()))?;
            return Ok(declared);
        }

        match &property.value {
            ValueKind::Simple { type_name } => types::basic_java_type(type_name, property.nullable)
                .ok_or_else(|| self.malformed(property, format!("unknown type '{}'", type_name))),
            ValueKind::Component(component) => Ok(self.options.relocate(&component.class_name)),
            ValueKind::ManyToOne { entity } => self
                .metadata
                .entity_binding(entity)
                .map(|target| self.options.relocate(&target.class_name))
                .ok_or_else(|| self.malformed(property, format!("unknown entity '{}'", entity))),
            ValueKind::Collection(collection) => self.collection_type(property, collection),
            ValueKind::Untyped => Err(self.malformed(property, "no type declared")),
        }
    }

    fn collection_type(
        &self,
        property: &PropertyBinding,
        collection: &CollectionBinding,
    ) -> Result<String, ModelError> {
        let interface = types::collection_interface(collection.kind);
        if !self.options.generics {
            return Ok(interface.to_string());
        }
        let element = match self.metadata.entity_binding(&collection.element) {
            Some(target) => self.options.relocate(&target.class_name),
            None => types::basic_java_type(&collection.element, true).ok_or_else(|| {
                self.malformed(
                    property,
                    format!("unknown collection element '{}'", collection.element),
                )
            })?,
        };
        Ok(match collection.kind {
            CollectionKind::Map => format!("{}<java.lang.String, {}>", interface, element),
            _ => format!("{}<{}>", interface, element),
        })
    }

    fn malformed(&self, property: &PropertyBinding, reason: impl Into<String>) -> ModelError {
        ModelError::malformed(self.mapped_class_name(), &property.name, reason)
    }

    /// Check that every generated property has a resolvable type.
    pub fn validate(&self) -> Result<(), ModelError> {
        for property in self.all_properties() {
            self.java_type_name(property)?;
        }
        Ok(())
    }

    // Accessors and fields

    pub fn getter_name(&self, property: &'a PropertyBinding) -> Result<String, ModelError> {
        let prefix = if self.java_type_name(property)? == "boolean" {
            "is"
        } else {
            "get"
        };
        Ok(format!("{}{}", prefix, bean_capitalize(&property.name)))
    }

    pub fn setter_name(&self, property: &PropertyBinding) -> String {
        format!("set{}", bean_capitalize(&property.name))
    }

    fn scope(&self, property: &'a PropertyBinding, key: &str, default: &str) -> String {
        self.property_meta(property, key)
            .map(|scope| scope.joined(" "))
            .unwrap_or_else(|| default.to_string())
    }

    /// Fields of the generated class: identifier first, then properties.
    pub fn fields(&self) -> Result<Vec<FieldSpec>, ModelError> {
        let identifier = self.identifier();
        self.all_properties()
            .into_iter()
            .map(|property| {
                let initializer = match &property.value {
                    ValueKind::Collection(collection) => {
                        Some(types::collection_implementation(collection.kind).to_string())
                    }
                    _ => None,
                };
                Ok(FieldSpec {
                    name: property.name.clone(),
                    type_name: self.java_type_name(property)?,
                    getter: self.getter_name(property)?,
                    setter: self.setter_name(property),
                    doc: self
                        .property_meta(property, meta_keys::FIELD_DESCRIPTION)
                        .map(|d| d.joined("\n")),
                    is_identifier: identifier.is_some_and(|id| std::ptr::eq(id, property)),
                    field_scope: self.scope(property, meta_keys::SCOPE_FIELD, "private"),
                    getter_scope: self.scope(property, meta_keys::SCOPE_GET, "public"),
                    setter_scope: self.scope(property, meta_keys::SCOPE_SET, "public"),
                    initializer,
                })
            })
            .collect()
    }

    // Documentation

    /// Class Javadoc body from `class-description`, else `fallback`.
    pub fn class_java_doc(&self, fallback: &str, indent: usize) -> String {
        let text = self
            .meta(meta_keys::CLASS_DESCRIPTION)
            .map(|d| d.joined("\n"))
            .unwrap_or_else(|| fallback.to_string());
        to_java_doc(&text, indent)
    }

    /// Field Javadoc body from `field-description`, or empty.
    pub fn field_java_doc(&self, property: &'a PropertyBinding, indent: usize) -> String {
        self.property_meta(property, meta_keys::FIELD_DESCRIPTION)
            .map(|d| to_java_doc(&d.joined("\n"), indent))
            .unwrap_or_default()
    }

    /// Verbatim `class-code` contributed by the mapping.
    pub fn extra_class_code(&self) -> Option<String> {
        self.meta(meta_keys::CLASS_CODE).map(|code| code.joined("\n"))
    }

    // Equality and toString

    fn flagged(&self, key: &str) -> Vec<&'a PropertyBinding> {
        self.all_properties()
            .into_iter()
            .filter(|p| {
                self.property_meta(p, key)
                    .is_some_and(MetaAttribute::is_true)
            })
            .collect()
    }

    pub fn equals_hash_code_properties(&self) -> Vec<&'a PropertyBinding> {
        self.flagged(meta_keys::USE_IN_EQUALS)
    }

    pub fn needs_equals_hash_code(&self) -> bool {
        !self.equals_hash_code_properties().is_empty()
    }

    pub fn to_string_properties(&self) -> Vec<&'a PropertyBinding> {
        self.flagged(meta_keys::USE_IN_TOSTRING)
    }

    pub fn needs_to_string(&self) -> bool {
        !self.to_string_properties().is_empty()
    }
}

fn join_non_empty(names: &[String]) -> Option<String> {
    (!names.is_empty()).then(|| names.join(","))
}

fn clause(keyword: &str, names: &[String], imports: &mut dyn ImportResolver) -> String {
    if names.is_empty() {
        return String::new();
    }
    let resolved: Vec<String> = names.iter().map(|n| imports.import_type(n)).collect();
    format!("{} {}", keyword, resolved.join(", "))
}
