//! Reveng operation - metadata from introspected tables.

use eyre::{Context, Result};
use pojogen_codegen::reveng::{SelectionStrategy, TableSet, bind_tables, select_tables};
use pojogen_mapping::Metadata;
use tracing::info;

use crate::reports::SelectionSummary;

/// Execute the reveng operation.
///
/// Applies the tables file's selections (all tables when it has none) and
/// binds the selected tables into a metadata graph.
pub fn reveng(tables: &TableSet, package: Option<&str>) -> Result<(Metadata, SelectionSummary)> {
    let strategy = SelectionStrategy::new(tables.selections.clone());
    let selected = select_tables(&strategy, &tables.tables);
    info!(
        tables = tables.tables.len(),
        selected = selected.len(),
        "Selected tables"
    );

    let metadata = bind_tables(&strategy, &selected, package);
    metadata
        .check()
        .wrap_err("Reverse engineering produced an invalid mapping")?;

    let summary = SelectionSummary {
        tables: selected
            .iter()
            .map(|s| s.table.table_ref().qualified_name())
            .collect(),
        classes: metadata
            .entity_bindings()
            .map(|binding| binding.class_name.clone())
            .collect(),
    };
    Ok((metadata, summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveng_selects_and_binds() {
        let tables = TableSet::parse(
            r#"
[[selection]]
schema = "SHOP"

[[table]]
schema = "SHOP"
name = "CUSTOMER"
primary-key = ["ID"]

[[table.column]]
name = "ID"
sql-type = "INTEGER"
nullable = false

[[table]]
schema = "ARCHIVE"
name = "CUSTOMER"
primary-key = ["ID"]

[[table.column]]
name = "ID"
sql-type = "INTEGER"
nullable = false
"#,
        )
        .unwrap();

        let (metadata, summary) = reveng(&tables, Some("com.shop")).unwrap();

        assert_eq!(summary.tables, vec!["SHOP.CUSTOMER"]);
        assert_eq!(summary.classes, vec!["com.shop.Customer"]);
        assert_eq!(metadata.len(), 1);
    }
}
