//! Hibernate mapping document renderer.

use std::path::PathBuf;

use pojogen_codegen::{
    ImportContext, ModelError, PojoClass, Renderer, builder::CodeBuilder, model::ClassSource,
    pipeline::package_path,
};
use pojogen_mapping::{
    CollectionBinding, CollectionKind, ComponentBinding, MetaAttributes, Metadata,
    PersistentClassBinding, PropertyBinding, TableRef, ValueKind,
};

use crate::xml::Tag;

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE hibernate-mapping PUBLIC "-//Hibernate/Hibernate Mapping DTD 3.0//EN"
  "http://www.hibernate.org/dtd/hibernate-mapping-3.0.dtd">
"#;

/// Renders one `.hbm.xml` mapping document per entity.
///
/// The document describes the mapping as loaded, so class names are the
/// mapped names rather than any relocated or `generated-class` name.
#[derive(Debug, Clone, Copy, Default)]
pub struct HbmXmlRenderer;

impl HbmXmlRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for HbmXmlRenderer {
    fn category(&self) -> &'static str {
        "hbm.xml"
    }

    fn renders_components(&self) -> bool {
        false
    }

    fn relative_path(&self, pojo: &PojoClass<'_>) -> PathBuf {
        package_path(pojo.mapped_class_name(), self.category())
    }

    fn render(
        &self,
        pojo: &PojoClass<'_>,
        _imports: &mut ImportContext,
    ) -> Result<String, ModelError> {
        let ClassSource::Entity(binding) = pojo.source() else {
            return Err(ModelError::malformed(
                pojo.mapped_class_name(),
                "",
                "components are mapped inside their owning entity",
            ));
        };

        let mut out = CodeBuilder::xml();
        out.push_raw(HEADER);
        out.push_open("<hibernate-mapping>");
        render_class(&mut out, pojo.metadata(), binding)?;
        out.push_close("</hibernate-mapping>");
        Ok(out.build())
    }
}

fn with_table(tag: Tag, table: Option<&TableRef>) -> Tag {
    match table {
        Some(table) => tag
            .attr("table", &table.name)
            .attr_opt("schema", table.schema.as_deref())
            .attr_opt("catalog", table.catalog.as_deref()),
        None => tag,
    }
}

fn render_class(
    out: &mut CodeBuilder,
    metadata: &Metadata,
    binding: &PersistentClassBinding,
) -> Result<(), ModelError> {
    let mut tag = match &binding.superclass {
        Some(parent) => {
            let parent = metadata.entity_binding(parent).ok_or_else(|| {
                ModelError::malformed(
                    &binding.class_name,
                    "",
                    format!("unknown superclass '{}'", parent),
                )
            })?;
            Tag::new("subclass")
                .attr("name", &binding.class_name)
                .attr("extends", &parent.class_name)
        }
        None => Tag::new("class").attr("name", &binding.class_name),
    };
    if binding.entity_name != binding.class_name {
        tag = tag.attr("entity-name", &binding.entity_name);
    }
    let tag = with_table(tag, binding.table.as_ref());

    out.push_open(&tag.open());
    render_meta(out, &binding.meta);
    if let Some(identifier) = &binding.identifier {
        render_identifier(out, identifier, binding.generator.as_deref())?;
    }
    for property in &binding.properties {
        render_property(out, metadata, &binding.class_name, property)?;
    }
    out.push_close(&tag.close());
    Ok(())
}

fn render_meta(out: &mut CodeBuilder, meta: &MetaAttributes) {
    for attribute in meta.iter() {
        let tag = Tag::new("meta")
            .attr("attribute", attribute.name())
            .attr_if(!attribute.is_inherited(), "inherit", "false");
        for value in attribute.values() {
            out.push_line(&tag.with_text(value));
        }
    }
}

fn render_identifier(
    out: &mut CodeBuilder,
    identifier: &PropertyBinding,
    generator: Option<&str>,
) -> Result<(), ModelError> {
    if let ValueKind::Component(component) = &identifier.value {
        let tag = Tag::new("composite-id")
            .attr("name", &identifier.name)
            .attr("class", &component.class_name);
        out.push_open(&tag.open());
        render_meta(out, &identifier.meta);
        for key in &component.properties {
            let ValueKind::Simple { type_name } = &key.value else {
                return Err(ModelError::malformed(
                    &component.class_name,
                    &key.name,
                    "composite identifier keys must be basic values",
                ));
            };
            out.push_line(
                &Tag::new("key-property")
                    .attr("name", &key.name)
                    .attr("type", type_name)
                    .empty(),
            );
        }
        out.push_close(&tag.close());
        return Ok(());
    }

    let tag = Tag::new("id").attr("name", &identifier.name);
    let tag = match &identifier.value {
        ValueKind::Simple { type_name } => tag.attr("type", type_name),
        _ => tag,
    };
    out.push_open(&tag.open());
    render_meta(out, &identifier.meta);
    out.push_line(
        &Tag::new("generator")
            .attr("class", generator.unwrap_or("assigned"))
            .empty(),
    );
    out.push_close(&tag.close());
    Ok(())
}

/// Emit `tag` self-closed, or wrapping the property's meta elements.
fn render_leaf(out: &mut CodeBuilder, tag: Tag, meta: &MetaAttributes) {
    if meta.is_empty() {
        out.push_line(&tag.empty());
    } else {
        out.push_open(&tag.open());
        render_meta(out, meta);
        out.push_close(&tag.close());
    }
}

fn render_property(
    out: &mut CodeBuilder,
    metadata: &Metadata,
    owner: &str,
    property: &PropertyBinding,
) -> Result<(), ModelError> {
    let not_null = !property.nullable;
    match &property.value {
        ValueKind::Simple { type_name } => {
            let tag = Tag::new("property")
                .attr("name", &property.name)
                .attr("type", type_name)
                .attr_if(not_null, "not-null", "true");
            render_leaf(out, tag, &property.meta);
        }
        ValueKind::Untyped => {
            let tag = Tag::new("property")
                .attr("name", &property.name)
                .attr_if(not_null, "not-null", "true");
            render_leaf(out, tag, &property.meta);
        }
        ValueKind::ManyToOne { entity } => {
            let target = metadata.entity_binding(entity).ok_or_else(|| {
                ModelError::malformed(owner, &property.name, format!("unknown entity '{}'", entity))
            })?;
            let tag = Tag::new("many-to-one")
                .attr("name", &property.name)
                .attr("class", &target.class_name)
                .attr_if(not_null, "not-null", "true");
            render_leaf(out, tag, &property.meta);
        }
        ValueKind::Component(component) => {
            render_component(out, metadata, property, component)?;
        }
        ValueKind::Collection(collection) => {
            render_collection(out, metadata, owner, property, collection)?;
        }
    }
    Ok(())
}

fn render_component(
    out: &mut CodeBuilder,
    metadata: &Metadata,
    property: &PropertyBinding,
    component: &ComponentBinding,
) -> Result<(), ModelError> {
    let tag = Tag::new("component")
        .attr("name", &property.name)
        .attr("class", &component.class_name);
    out.push_open(&tag.open());
    render_meta(out, &property.meta);
    for nested in &component.properties {
        render_property(out, metadata, &component.class_name, nested)?;
    }
    out.push_close(&tag.close());
    Ok(())
}

fn render_collection(
    out: &mut CodeBuilder,
    metadata: &Metadata,
    owner: &str,
    property: &PropertyBinding,
    collection: &CollectionBinding,
) -> Result<(), ModelError> {
    let malformed = |reason: String| ModelError::malformed(owner, &property.name, reason);
    if collection.key_columns.is_empty() {
        return Err(malformed(format!(
            "{} has no key column",
            collection.kind.as_str()
        )));
    }

    let tag = with_table(
        Tag::new(collection.kind.as_str()).attr("name", &property.name),
        collection.table.as_ref(),
    )
    .attr_if(collection.inverse, "inverse", "true");
    out.push_open(&tag.open());
    render_meta(out, &property.meta);
    render_columns(out, Tag::new("key"), &collection.key_columns);

    let index = match collection.kind {
        CollectionKind::List => Some(Tag::new("list-index")),
        // Map keys are modelled as java.lang.String.
        CollectionKind::Map => Some(Tag::new("map-key").attr("type", "string")),
        CollectionKind::Set | CollectionKind::Bag => None,
    };
    if let Some(index) = index {
        let column = collection.index_column.as_deref().ok_or_else(|| {
            malformed(format!("{} has no index column", collection.kind.as_str()))
        })?;
        out.push_line(&index.attr("column", column).empty());
    }

    let target = metadata.entity_binding(&collection.element);
    match target {
        Some(target) if collection.is_many_to_many() => {
            render_columns(
                out,
                Tag::new("many-to-many").attr("class", &target.class_name),
                &collection.element_columns,
            );
        }
        None if collection.is_many_to_many() => {
            return Err(malformed(format!("unknown entity '{}'", collection.element)));
        }
        Some(target) => {
            out.push_line(&Tag::new("one-to-many").attr("class", &target.class_name).empty());
        }
        None => {
            out.push_line(&Tag::new("element").attr("type", &collection.element).empty());
        }
    }
    out.push_close(&tag.close());
    Ok(())
}

/// `tag` with a `column` attribute, or with nested `<column>` elements when
/// there is more than one.
fn render_columns(out: &mut CodeBuilder, tag: Tag, columns: &[String]) {
    match columns {
        [column] => {
            out.push_line(&tag.attr("column", column).empty());
        }
        columns => {
            out.push_open(&tag.open());
            for column in columns {
                out.push_line(&Tag::new("column").attr("name", column).empty());
            }
            out.push_close(&tag.close());
        }
    }
}
