//! The metadata graph: persistent classes, properties and components.

use indexmap::IndexMap;

use crate::{InvariantViolation, MetaAttribute, MetaAttributes};

/// Location of a table in the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// `catalog.schema.name` with absent parts left out.
    pub fn qualified_name(&self) -> String {
        [self.catalog.as_deref(), self.schema.as_deref(), Some(&self.name)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Kind of a mapped collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Set,
    List,
    Bag,
    Map,
}

impl CollectionKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "set" => Some(Self::Set),
            "list" => Some(Self::List),
            "bag" => Some(Self::Bag),
            "map" => Some(Self::Map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::List => "list",
            Self::Bag => "bag",
            Self::Map => "map",
        }
    }
}

/// A mapped collection of entities or values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionBinding {
    pub kind: CollectionKind,
    /// Entity name for entity collections, type name for value collections.
    pub element: String,
    /// Table holding the collection rows, when known.
    pub table: Option<TableRef>,
    /// Columns of the collection table that reference the owner.
    pub key_columns: Vec<String>,
    /// Position column of a list, key column of a map.
    pub index_column: Option<String>,
    /// Columns referencing the element entity through a link table.
    /// Non-empty only for many-to-many collections.
    pub element_columns: Vec<String>,
    /// The other side of the association maintains it.
    pub inverse: bool,
}

impl CollectionBinding {
    pub fn new(kind: CollectionKind, element: impl Into<String>) -> Self {
        Self {
            kind,
            element: element.into(),
            table: None,
            key_columns: Vec::new(),
            index_column: None,
            element_columns: Vec::new(),
            inverse: false,
        }
    }

    pub fn table(mut self, table: TableRef) -> Self {
        self.table = Some(table);
        self
    }

    pub fn key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn index(mut self, column: impl Into<String>) -> Self {
        self.index_column = Some(column.into());
        self
    }

    /// Make this a many-to-many collection joined on `columns`.
    pub fn many_to_many<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.element_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }

    pub fn is_many_to_many(&self) -> bool {
        !self.element_columns.is_empty()
    }
}

/// An embeddable component (also used for composite identifiers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentBinding {
    pub class_name: String,
    pub properties: Vec<PropertyBinding>,
    pub meta: MetaAttributes,
}

impl ComponentBinding {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            properties: Vec::new(),
            meta: MetaAttributes::new(),
        }
    }

    pub fn property(mut self, property: PropertyBinding) -> Self {
        self.properties.push(property);
        self
    }

    pub fn meta(mut self, attribute: MetaAttribute) -> Self {
        self.meta.insert(attribute);
        self
    }

    pub fn get_property(&self, name: &str) -> Option<&PropertyBinding> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// What a property holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// A basic value: a Hibernate type name (`long`, `string`, `calendar`)
    /// or a fully-qualified class name.
    Simple { type_name: String },
    /// An embedded component.
    Component(ComponentBinding),
    /// A collection.
    Collection(CollectionBinding),
    /// A reference to another entity by entity name.
    ManyToOne { entity: String },
    /// No type was declared in the mapping.
    Untyped,
}

/// A mapped property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyBinding {
    pub name: String,
    pub value: ValueKind,
    pub nullable: bool,
    pub meta: MetaAttributes,
}

impl PropertyBinding {
    pub fn new(name: impl Into<String>, value: ValueKind) -> Self {
        Self {
            name: name.into(),
            value,
            nullable: true,
            meta: MetaAttributes::new(),
        }
    }

    pub fn simple(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(
            name,
            ValueKind::Simple {
                type_name: type_name.into(),
            },
        )
    }

    pub fn component(name: impl Into<String>, component: ComponentBinding) -> Self {
        Self::new(name, ValueKind::Component(component))
    }

    pub fn many_to_one(name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::new(
            name,
            ValueKind::ManyToOne {
                entity: entity.into(),
            },
        )
    }

    pub fn collection(name: impl Into<String>, collection: CollectionBinding) -> Self {
        Self::new(name, ValueKind::Collection(collection))
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn meta(mut self, attribute: MetaAttribute) -> Self {
        self.meta.insert(attribute);
        self
    }

    pub fn as_component(&self) -> Option<&ComponentBinding> {
        match &self.value {
            ValueKind::Component(component) => Some(component),
            _ => None,
        }
    }
}

/// A mapped entity class, root or subclass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentClassBinding {
    pub entity_name: String,
    pub class_name: String,
    /// Entity name of the mapped superclass.
    pub superclass: Option<String>,
    pub identifier: Option<PropertyBinding>,
    /// Identifier generator strategy (`native`, `assigned`, ...).
    pub generator: Option<String>,
    pub properties: Vec<PropertyBinding>,
    pub meta: MetaAttributes,
    pub table: Option<TableRef>,
}

impl PersistentClassBinding {
    /// A root entity whose entity name is its class name.
    pub fn root(class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        Self {
            entity_name: class_name.clone(),
            class_name,
            superclass: None,
            identifier: None,
            generator: None,
            properties: Vec::new(),
            meta: MetaAttributes::new(),
            table: None,
        }
    }

    /// A subclass of the entity named `superclass`.
    pub fn subclass(class_name: impl Into<String>, superclass: impl Into<String>) -> Self {
        let mut binding = Self::root(class_name);
        binding.superclass = Some(superclass.into());
        binding
    }

    pub fn entity_name(mut self, entity_name: impl Into<String>) -> Self {
        self.entity_name = entity_name.into();
        self
    }

    pub fn identifier(mut self, property: PropertyBinding, generator: impl Into<String>) -> Self {
        self.identifier = Some(property);
        self.generator = Some(generator.into());
        self
    }

    pub fn property(mut self, property: PropertyBinding) -> Self {
        self.properties.push(property);
        self
    }

    pub fn meta(mut self, attribute: MetaAttribute) -> Self {
        self.meta.insert(attribute);
        self
    }

    pub fn table(mut self, table: TableRef) -> Self {
        self.table = Some(table);
        self
    }

    pub fn get_property(&self, name: &str) -> Option<&PropertyBinding> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn is_root(&self) -> bool {
        self.superclass.is_none()
    }

    /// True when identifier values are supplied by the application.
    pub fn has_assigned_identifier(&self) -> bool {
        self.generator.as_deref() == Some("assigned")
    }
}

/// The complete, read-only mapping metadata of one run.
///
/// Entities are keyed by entity name and keep their insertion order, which
/// is the order generators visit them in.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    entities: IndexMap<String, PersistentClassBinding>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity binding, returning any binding it replaced.
    pub fn add(&mut self, binding: PersistentClassBinding) -> Option<PersistentClassBinding> {
        self.entities.insert(binding.entity_name.clone(), binding)
    }

    pub fn entity_binding(&self, entity_name: &str) -> Option<&PersistentClassBinding> {
        self.entities.get(entity_name)
    }

    /// All entity bindings in insertion order.
    pub fn entity_bindings(&self) -> impl Iterator<Item = &PersistentClassBinding> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn superclass_of(&self, binding: &PersistentClassBinding) -> Option<&PersistentClassBinding> {
        binding
            .superclass
            .as_deref()
            .and_then(|name| self.entity_binding(name))
    }

    /// The class followed by its superclasses, nearest first.
    ///
    /// Stops at an unknown superclass and never loops on cyclic input.
    pub fn hierarchy<'a>(
        &'a self,
        binding: &'a PersistentClassBinding,
    ) -> Vec<&'a PersistentClassBinding> {
        let mut chain = vec![binding];
        let mut current = binding;
        while let Some(parent) = self.superclass_of(current) {
            if chain.iter().any(|seen| seen.entity_name == parent.entity_name) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// The identifier property, inherited from the root for subclasses.
    pub fn identifier_of<'a>(
        &'a self,
        binding: &'a PersistentClassBinding,
    ) -> Option<&'a PropertyBinding> {
        self.hierarchy(binding)
            .into_iter()
            .find_map(|level| level.identifier.as_ref())
    }

    /// Resolve a class-level meta attribute through the superclass chain.
    pub fn class_meta<'a>(
        &'a self,
        binding: &'a PersistentClassBinding,
        key: &str,
    ) -> Option<&'a MetaAttribute> {
        MetaAttributes::resolve(
            self.hierarchy(binding).into_iter().map(|level| &level.meta),
            key,
        )
    }

    /// Resolve a property-level meta attribute: the property itself first,
    /// then inherited attributes of its class and superclasses.
    pub fn property_meta<'a>(
        &'a self,
        owner: &'a PersistentClassBinding,
        property: &'a PropertyBinding,
        key: &str,
    ) -> Option<&'a MetaAttribute> {
        let levels = std::iter::once(&property.meta)
            .chain(self.hierarchy(owner).into_iter().map(|level| &level.meta));
        MetaAttributes::resolve(levels, key)
    }

    /// Check the structural invariants of the graph.
    pub fn check(&self) -> Result<(), InvariantViolation> {
        for binding in self.entity_bindings() {
            self.check_binding(binding)?;
        }
        Ok(())
    }

    fn check_binding(&self, binding: &PersistentClassBinding) -> Result<(), InvariantViolation> {
        let entity = &binding.entity_name;
        match &binding.superclass {
            None if binding.identifier.is_none() => {
                return Err(InvariantViolation::MissingIdentifier {
                    entity: entity.clone(),
                });
            }
            Some(superclass) => {
                if self.entity_binding(superclass).is_none() {
                    return Err(InvariantViolation::UnknownSuperclass {
                        entity: entity.clone(),
                        superclass: superclass.clone(),
                    });
                }
                if binding.identifier.is_some() {
                    return Err(InvariantViolation::SubclassIdentifier {
                        entity: entity.clone(),
                    });
                }
                let chain = self.hierarchy(binding);
                let cyclic = chain.last().is_some_and(|top| {
                    top.superclass
                        .as_deref()
                        .is_some_and(|name| self.entity_binding(name).is_some())
                });
                if cyclic {
                    return Err(InvariantViolation::InheritanceCycle {
                        entity: entity.clone(),
                    });
                }
            }
            None => {}
        }

        let mut seen = Vec::new();
        for property in binding.identifier.iter().chain(&binding.properties) {
            if seen.contains(&property.name.as_str()) {
                return Err(InvariantViolation::DuplicateProperty {
                    entity: entity.clone(),
                    property: property.name.clone(),
                });
            }
            seen.push(property.name.as_str());
            self.check_property(entity, property)?;
        }
        Ok(())
    }

    fn check_property(
        &self,
        entity: &str,
        property: &PropertyBinding,
    ) -> Result<(), InvariantViolation> {
        if let Some(attribute) = property.meta.iter().find(|a| a.values().is_empty()) {
            return Err(InvariantViolation::EmptyMetaAttribute {
                owner: format!("{}.{}", entity, property.name),
                key: attribute.name().to_string(),
            });
        }
        match &property.value {
            ValueKind::ManyToOne { entity: target } if self.entity_binding(target).is_none() => {
                Err(InvariantViolation::UnknownAssociation {
                    entity: entity.to_string(),
                    property: property.name.clone(),
                    target: target.clone(),
                })
            }
            ValueKind::Component(component) => component
                .properties
                .iter()
                .try_for_each(|nested| self.check_property(entity, nested)),
            _ => Ok(()),
        }
    }
}
