//! Mapping-file parsing from TOML or JSON.
//!
//! ```toml
//! [[class]]
//! name = "org.example.Order"
//! table = "ORDERS"
//! meta = { scope-class = "public strictfp" }
//!
//! [class.id]
//! name = "id"
//! type = "long"
//! generator = "native"
//!
//! [[class.property]]
//! name = "customer"
//! many-to-one = "org.example.Customer"
//! ```

use std::path::Path;

use indexmap::IndexMap;
use miette::SourceSpan;
use serde::Deserialize;

use crate::{
    CollectionBinding, CollectionKind, ComponentBinding, Error, InvariantViolation, MetaAttribute,
    MetaAttributes, Metadata, PersistentClassBinding, PropertyBinding, Result, TableRef,
    ValueKind,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMapping {
    #[serde(default, rename = "class")]
    classes: Vec<RawClass>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawClass {
    name: String,
    entity_name: Option<String>,
    superclass: Option<String>,
    table: Option<String>,
    schema: Option<String>,
    catalog: Option<String>,
    #[serde(default)]
    meta: IndexMap<String, RawMeta>,
    id: Option<RawProperty>,
    #[serde(default, rename = "property")]
    properties: Vec<RawProperty>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawProperty {
    name: String,
    #[serde(rename = "type")]
    type_name: Option<String>,
    not_null: Option<bool>,
    generator: Option<String>,
    many_to_one: Option<String>,
    collection: Option<String>,
    element: Option<String>,
    #[serde(default)]
    key: Vec<String>,
    index: Option<String>,
    #[serde(default)]
    element_key: Vec<String>,
    #[serde(default)]
    inverse: bool,
    table: Option<String>,
    schema: Option<String>,
    catalog: Option<String>,
    component: Option<RawComponent>,
    #[serde(default)]
    meta: IndexMap<String, RawMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawComponent {
    class: String,
    #[serde(default, rename = "property")]
    properties: Vec<RawProperty>,
    #[serde(default)]
    meta: IndexMap<String, RawMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMeta {
    One(String),
    Many(Vec<String>),
    Detailed {
        values: Vec<String>,
        #[serde(default = "default_inherit")]
        inherit: bool,
    },
}

fn default_inherit() -> bool {
    true
}

/// Parse a mapping file; `.json` files are read as JSON, everything else as TOML.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Metadata> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source: e,
        })
    })?;
    let filename = path.display().to_string();
    if path.extension().is_some_and(|ext| ext == "json") {
        parse_json(&content, &filename)
    } else {
        parse_str_with_filename(&content, &filename)
    }
}

/// Parse a TOML mapping (uses "mapping.toml" as default filename)
pub fn parse_str(content: &str) -> Result<Metadata> {
    parse_str_with_filename(content, "mapping.toml")
}

/// Parse a TOML mapping with a custom filename for error reporting
pub fn parse_str_with_filename(content: &str, filename: &str) -> Result<Metadata> {
    let raw: RawMapping =
        toml::from_str(content).map_err(|e| Error::parse(e, content, filename))?;
    build(raw, &SourceCtx { src: content, filename })
}

/// Parse a JSON mapping
pub fn parse_json(content: &str, filename: &str) -> Result<Metadata> {
    let raw: RawMapping =
        serde_json::from_str(content).map_err(|e| Error::parse_json(e, content, filename))?;
    build(raw, &SourceCtx { src: content, filename })
}

struct SourceCtx<'a> {
    src: &'a str,
    filename: &'a str,
}

impl SourceCtx<'_> {
    fn span_of(&self, name: &str) -> Option<SourceSpan> {
        find_name_span(self.src, name)
    }

    fn validation(&self, message: impl Into<String>, name: &str) -> Box<Error> {
        Error::validation(message, self.src, self.filename, self.span_of(name))
    }

    fn invariant(&self, violation: InvariantViolation) -> Box<Error> {
        let span = self.span_of(violation.subject());
        Error::invariant(violation, self.src, self.filename, span)
    }
}

fn build(raw: RawMapping, ctx: &SourceCtx<'_>) -> Result<Metadata> {
    let mut metadata = Metadata::new();
    for class in raw.classes {
        let binding = convert_class(class, ctx)?;
        let entity = binding.entity_name.clone();
        if metadata.add(binding).is_some() {
            return Err(ctx.invariant(InvariantViolation::DuplicateEntity { entity }));
        }
    }
    metadata.check().map_err(|violation| ctx.invariant(violation))?;
    Ok(metadata)
}

fn convert_class(raw: RawClass, ctx: &SourceCtx<'_>) -> Result<PersistentClassBinding> {
    let mut binding = match raw.superclass {
        Some(superclass) => PersistentClassBinding::subclass(&raw.name, superclass),
        None => PersistentClassBinding::root(&raw.name),
    };
    if let Some(entity_name) = raw.entity_name {
        binding = binding.entity_name(entity_name);
    }
    binding.table = table_ref(raw.table, raw.schema, raw.catalog);
    binding.meta = convert_meta(raw.meta, &raw.name, ctx)?;

    if let Some(mut id) = raw.id {
        let generator = id.generator.take().unwrap_or_else(|| "assigned".to_string());
        // identifiers are never null unless explicitly mapped otherwise
        id.not_null.get_or_insert(true);
        let property = convert_property(id, &raw.name, ctx)?;
        binding = binding.identifier(property, generator);
    }
    for property in raw.properties {
        if property.generator.is_some() {
            return Err(ctx.validation(
                format!("only the identifier of '{}' may declare a generator", raw.name),
                &property.name,
            ));
        }
        binding.properties.push(convert_property(property, &raw.name, ctx)?);
    }
    Ok(binding)
}

fn convert_property(
    raw: RawProperty,
    owner: &str,
    ctx: &SourceCtx<'_>,
) -> Result<PropertyBinding> {
    let declared = [
        raw.type_name.is_some(),
        raw.many_to_one.is_some(),
        raw.collection.is_some(),
        raw.component.is_some(),
    ]
    .into_iter()
    .filter(|set| *set)
    .count();
    if declared > 1 {
        return Err(ctx.validation(
            format!(
                "property '{}' of '{}' declares more than one of type, many-to-one, collection, component",
                raw.name, owner
            ),
            &raw.name,
        ));
    }

    let collection_only = !raw.key.is_empty()
        || raw.index.is_some()
        || !raw.element_key.is_empty()
        || raw.inverse;
    if collection_only && raw.collection.is_none() {
        return Err(ctx.validation(
            format!(
                "property '{}' of '{}' sets key, index, element-key or inverse without a collection",
                raw.name, owner
            ),
            &raw.name,
        ));
    }

    let value = if let Some(type_name) = raw.type_name {
        ValueKind::Simple { type_name }
    } else if let Some(entity) = raw.many_to_one {
        ValueKind::ManyToOne { entity }
    } else if let Some(kind) = raw.collection {
        let kind = CollectionKind::parse(&kind).ok_or_else(|| {
            ctx.validation(
                format!("unknown collection kind '{}', expected set, list, bag or map", kind),
                &raw.name,
            )
        })?;
        let element = raw.element.ok_or_else(|| {
            ctx.validation(
                format!("collection '{}' of '{}' has no element", raw.name, owner),
                &raw.name,
            )
        })?;
        let mut collection = CollectionBinding::new(kind, element)
            .key(raw.key)
            .many_to_many(raw.element_key)
            .inverse(raw.inverse);
        collection.index_column = raw.index;
        collection.table = table_ref(raw.table, raw.schema, raw.catalog);
        ValueKind::Collection(collection)
    } else if let Some(component) = raw.component {
        ValueKind::Component(convert_component(component, ctx)?)
    } else {
        ValueKind::Untyped
    };

    let mut property = PropertyBinding::new(&raw.name, value).nullable(!raw.not_null.unwrap_or(false));
    property.meta = convert_meta(raw.meta, &raw.name, ctx)?;
    Ok(property)
}

fn convert_component(raw: RawComponent, ctx: &SourceCtx<'_>) -> Result<ComponentBinding> {
    let mut component = ComponentBinding::new(&raw.class);
    component.meta = convert_meta(raw.meta, &raw.class, ctx)?;
    for property in raw.properties {
        component
            .properties
            .push(convert_property(property, &raw.class, ctx)?);
    }
    Ok(component)
}

fn convert_meta(
    raw: IndexMap<String, RawMeta>,
    owner: &str,
    ctx: &SourceCtx<'_>,
) -> Result<MetaAttributes> {
    let mut attributes = MetaAttributes::new();
    for (key, value) in raw {
        let (values, inherit) = match value {
            RawMeta::One(value) => (vec![value], true),
            RawMeta::Many(values) => (values, true),
            RawMeta::Detailed { values, inherit } => (values, inherit),
        };
        if values.is_empty() {
            return Err(ctx.invariant(InvariantViolation::EmptyMetaAttribute {
                owner: owner.to_string(),
                key,
            }));
        }
        attributes.insert(MetaAttribute::with_values(key, values).inherit(inherit));
    }
    Ok(attributes)
}

fn table_ref(
    name: Option<String>,
    schema: Option<String>,
    catalog: Option<String>,
) -> Option<TableRef> {
    name.map(|name| TableRef {
        catalog,
        schema,
        name,
    })
}

/// Find the span of a quoted name in the source.
fn find_name_span(src: &str, name: &str) -> Option<SourceSpan> {
    // Prefer the quoted form: name = "Order" or "Order"
    let quoted = format!("\"{}\"", name);
    if let Some(pos) = src.find(&quoted) {
        return Some(SourceSpan::from((pos + 1, name.len())));
    }

    // Fallback: just find the name anywhere (less precise)
    src.find(name)
        .map(|pos| SourceSpan::from((pos, name.len())))
}
