use serde::Deserialize;

use super::{RevengStrategy, TableDescriptor};

/// Catalog, schema and table patterns selecting a set of tables.
///
/// Patterns use SQL `LIKE` wildcards and compare case-sensitively. An
/// absent pattern matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaSelection {
    #[serde(default, rename = "catalog")]
    pub match_catalog: Option<String>,
    #[serde(default, rename = "schema")]
    pub match_schema: Option<String>,
    #[serde(default, rename = "table")]
    pub match_table: Option<String>,
}

impl SchemaSelection {
    /// A selection matching every table.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn schema(schema: impl Into<String>) -> Self {
        Self {
            match_schema: Some(schema.into()),
            ..Self::default()
        }
    }

    pub fn catalog(mut self, catalog: impl Into<String>) -> Self {
        self.match_catalog = Some(catalog.into());
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.match_table = Some(table.into());
        self
    }

    pub fn matches(&self, table: &TableDescriptor) -> bool {
        matches_part(self.match_catalog.as_deref(), table.catalog.as_deref())
            && matches_part(self.match_schema.as_deref(), table.schema.as_deref())
            && matches_part(self.match_table.as_deref(), Some(&table.name))
    }
}

fn matches_part(pattern: Option<&str>, value: Option<&str>) -> bool {
    match pattern {
        None => true,
        Some(pattern) => like_matches(pattern, value.unwrap_or_default()),
    }
}

/// SQL `LIKE` matching: `%` matches any run of characters, `_` exactly one.
pub fn like_matches(pattern: &str, value: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let value: Vec<char> = value.chars().collect();

    let (mut p, mut v) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while v < value.len() {
        match pattern.get(p) {
            Some('%') => {
                backtrack = Some((p, v));
                p += 1;
            }
            Some(&c) if c == '_' || c == value[v] => {
                p += 1;
                v += 1;
            }
            _ => match backtrack {
                Some((star, consumed)) => {
                    p = star + 1;
                    v = consumed + 1;
                    backtrack = Some((star, consumed + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '%')
}

/// A table chosen for binding and the index of the selection that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedTable<'t> {
    pub table: &'t TableDescriptor,
    pub selection: usize,
}

/// Select tables in priority order.
///
/// Each selection contributes, in input order, the matching tables no
/// earlier selection claimed. Excluded tables are dropped.
pub fn select_tables<'t>(
    strategy: &dyn RevengStrategy,
    tables: &'t [TableDescriptor],
) -> Vec<SelectedTable<'t>> {
    let mut claimed = vec![false; tables.len()];
    let mut selected = Vec::new();
    for (index, selection) in strategy.schema_selections().iter().enumerate() {
        for (position, table) in tables.iter().enumerate() {
            if claimed[position] || !selection.matches(table) || strategy.exclude_table(table) {
                continue;
            }
            claimed[position] = true;
            selected.push(SelectedTable {
                table,
                selection: index,
            });
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveng::{DefaultStrategy, SelectionStrategy};

    #[test]
    fn test_like_matches() {
        assert!(like_matches("%", ""));
        assert!(like_matches("%", "ANYTHING"));
        assert!(like_matches("HTT", "HTT"));
        assert!(!like_matches("HTT", "htt"));
        assert!(like_matches("H_T", "HTT"));
        assert!(!like_matches("H_T", "HT"));
        assert!(like_matches("OTHER%", "OTHERSCHEMA"));
        assert!(like_matches("%SCHEMA", "THIRDSCHEMA"));
        assert!(like_matches("%R%E%", "USERROLES"));
        assert!(!like_matches("%X%", "USERROLES"));
        assert!(!like_matches("", "A"));
    }

    #[test]
    fn test_absent_patterns_match_everything() {
        let table = TableDescriptor::new(None, "ORPHAN");
        assert!(SchemaSelection::any().matches(&table));
        assert!(!SchemaSelection::schema("HTT").matches(&table));
        assert!(SchemaSelection::schema("%").matches(&table));
    }

    #[test]
    fn test_earliest_selection_claims_table() {
        let tables = vec![
            TableDescriptor::new(Some("B"), "ONE"),
            TableDescriptor::new(Some("A"), "TWO"),
            TableDescriptor::new(Some("A"), "THREE"),
        ];
        let strategy = SelectionStrategy::new(vec![
            SchemaSelection::schema("A"),
            SchemaSelection::any(),
        ]);

        let selected = select_tables(&strategy, &tables);
        let names: Vec<_> = selected
            .iter()
            .map(|s| (s.table.name.as_str(), s.selection))
            .collect();
        assert_eq!(names, [("TWO", 0), ("THREE", 0), ("ONE", 1)]);
    }

    #[test]
    fn test_default_strategy_keeps_input_order() {
        let tables = vec![
            TableDescriptor::new(Some("B"), "ONE"),
            TableDescriptor::new(Some("A"), "TWO"),
        ];
        let selected = select_tables(&DefaultStrategy, &tables);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].table.name, "ONE");
    }
}
