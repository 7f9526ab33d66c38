use std::collections::HashSet;

use pojogen_core::{pluralize, to_pascal_case};
use pojogen_mapping::{
    CollectionBinding, CollectionKind, ComponentBinding, Metadata, PersistentClassBinding,
    PropertyBinding,
};
use tracing::{debug, warn};

use super::{
    ColumnDescriptor, ForeignKeyDescriptor, RevengStrategy, SelectedTable, TableDescriptor,
};

const NUMERIC_KEY_TYPES: &[&str] = &["integer", "long", "short", "byte", "big_integer"];

/// Bind selected tables into a metadata graph, one entity per table.
///
/// Entities are added in selection order. A foreign key outside the table's
/// key becomes a many-to-one on the owning entity and an inverse set on the
/// referenced one. Foreign keys that are part of the key make the table a
/// link table: each referenced entity gets a many-to-many set of the others.
/// Keys pointing outside the selection are ignored.
pub fn bind_tables(
    strategy: &dyn RevengStrategy,
    selected: &[SelectedTable<'_>],
    package: Option<&str>,
) -> Metadata {
    let class_names = class_names(strategy, selected, package);
    let target_of = |table: &TableDescriptor, fk: usize| {
        let key = &table.foreign_keys[fk].references;
        selected.iter().position(|s| s.table.is_named_by(key))
    };

    let mut bindings: Vec<PersistentClassBinding> = selected
        .iter()
        .zip(&class_names)
        .map(|(selected, class_name)| {
            bind_table(strategy, selected.table, class_name, |fk| {
                target_of(selected.table, fk).map(|i| class_names[i].as_str())
            })
        })
        .collect();

    for (owner, selection) in selected.iter().enumerate() {
        let table = selection.table;
        let key_names = key_column_names(table);
        let mut link_keys: Vec<(&ForeignKeyDescriptor, usize)> = Vec::new();

        for (index, fk) in table.foreign_keys.iter().enumerate() {
            let Some(target) = target_of(table, index) else {
                continue;
            };
            if fk.columns.iter().any(|c| key_names.contains(c.as_str())) {
                link_keys.push((fk, target));
                continue;
            }
            let collection = CollectionBinding::new(CollectionKind::Set, &class_names[owner])
                .table(table.table_ref())
                .key(fk.columns.iter().cloned())
                .inverse(true);
            add_collection(&mut bindings[target], &class_names[owner], collection);
        }

        for (side, (fk, target)) in link_keys.iter().enumerate() {
            for (other_side, (other_fk, other)) in link_keys.iter().enumerate() {
                if side == other_side {
                    continue;
                }
                let collection = CollectionBinding::new(CollectionKind::Set, &class_names[*other])
                    .table(table.table_ref())
                    .key(fk.columns.iter().cloned())
                    .many_to_many(other_fk.columns.iter().cloned())
                    .inverse(side > other_side);
                add_collection(&mut bindings[*target], &class_names[*other], collection);
            }
        }
    }

    let mut metadata = Metadata::new();
    for binding in bindings {
        metadata.add(binding);
    }
    metadata
}

/// Add a set named after the plural of `element_class` to `binding`.
fn add_collection(
    binding: &mut PersistentClassBinding,
    element_class: &str,
    collection: CollectionBinding,
) {
    let name = unique_name(binding, &pluralize(&decapitalize(simple_name(element_class))));
    debug!(
        entity = %binding.class_name,
        property = %name,
        many_to_many = collection.is_many_to_many(),
        "Added collection"
    );
    binding
        .properties
        .push(PropertyBinding::collection(name, collection));
}

/// Names of the columns forming the table's key: the declared primary key,
/// or every column when none of it is declared.
fn key_column_names(table: &TableDescriptor) -> HashSet<&str> {
    let declared: HashSet<&str> = table
        .primary_key
        .iter()
        .map(String::as_str)
        .filter(|name| table.get_column(name).is_some())
        .collect();
    if declared.is_empty() {
        table.columns.iter().map(|c| c.name.as_str()).collect()
    } else {
        declared
    }
}

/// Qualified class names in selection order, made unique.
///
/// A later table whose name is taken gets its schema (or catalog) appended,
/// then a counter.
fn class_names(
    strategy: &dyn RevengStrategy,
    selected: &[SelectedTable<'_>],
    package: Option<&str>,
) -> Vec<String> {
    let mut taken = HashSet::new();
    selected
        .iter()
        .map(|selection| {
            let table = selection.table;
            let base = strategy.table_to_class_name(table);
            let mut simple = base.clone();
            if taken.contains(&simple) {
                let qualifier = table
                    .schema
                    .as_deref()
                    .or(table.catalog.as_deref())
                    .unwrap_or_default();
                simple = format!("{}{}", base, to_pascal_case(qualifier));
            }
            let mut counter = 2;
            while taken.contains(&simple) {
                simple = format!("{}{}", base, counter);
                counter += 1;
            }
            taken.insert(simple.clone());
            match package {
                Some(package) if !package.is_empty() => format!("{}.{}", package, simple),
                _ => simple,
            }
        })
        .collect()
}

fn bind_table<'n>(
    strategy: &dyn RevengStrategy,
    table: &TableDescriptor,
    class_name: &str,
    target_class: impl Fn(usize) -> Option<&'n str>,
) -> PersistentClassBinding {
    let mut binding = PersistentClassBinding::root(class_name).table(table.table_ref());

    let mut key_columns: Vec<&ColumnDescriptor> = table
        .primary_key
        .iter()
        .filter_map(|name| {
            let column = table.get_column(name);
            if column.is_none() {
                warn!(table = %table.name, column = %name, "Primary key column is not declared");
            }
            column
        })
        .collect();
    if key_columns.is_empty() {
        key_columns = table.columns.iter().collect();
    }

    match key_columns.as_slice() {
        [] => {}
        [column] => {
            let type_name = strategy.column_to_type_name(column);
            let generator = if NUMERIC_KEY_TYPES.contains(&type_name.as_str()) {
                "native"
            } else {
                "assigned"
            };
            let id = PropertyBinding::simple(strategy.column_to_property_name(&column.name), type_name)
                .nullable(false);
            binding = binding.identifier(id, generator);
        }
        columns => {
            let mut key = ComponentBinding::new(format!("{}Id", class_name));
            for column in columns {
                key = key.property(
                    PropertyBinding::simple(
                        strategy.column_to_property_name(&column.name),
                        strategy.column_to_type_name(column),
                    )
                    .nullable(false),
                );
            }
            binding = binding.identifier(PropertyBinding::component("id", key), "assigned");
        }
    }

    let key_names = key_column_names(table);
    let mut association_columns: HashSet<&str> = HashSet::new();

    for (index, fk) in table.foreign_keys.iter().enumerate() {
        if fk.columns.iter().any(|c| key_names.contains(c.as_str())) {
            continue;
        }
        let Some(target) = target_class(index) else {
            continue;
        };
        let nullable = fk
            .columns
            .iter()
            .filter_map(|c| table.get_column(c))
            .any(|c| c.nullable);
        let name = unique_name(&binding, &decapitalize(simple_name(target)));
        binding
            .properties
            .push(PropertyBinding::many_to_one(name, target).nullable(nullable));
        association_columns.extend(fk.columns.iter().map(String::as_str));
    }

    for column in &table.columns {
        if key_names.contains(column.name.as_str())
            || association_columns.contains(column.name.as_str())
        {
            continue;
        }
        let name = unique_name(&binding, &strategy.column_to_property_name(&column.name));
        binding.properties.push(
            PropertyBinding::simple(name, strategy.column_to_type_name(column))
                .nullable(column.nullable),
        );
    }

    binding
}

fn simple_name(class_name: &str) -> &str {
    pojogen_core::unqualify(class_name)
}

fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `base`, or `base` with a counter when the binding already uses it.
fn unique_name(binding: &PersistentClassBinding, base: &str) -> String {
    let used = |name: &str| {
        binding.get_property(name).is_some()
            || binding.identifier.as_ref().is_some_and(|id| id.name == name)
    };
    let mut name = base.to_string();
    let mut counter = 2;
    while used(&name) {
        name = format!("{}{}", base, counter);
        counter += 1;
    }
    name
}
