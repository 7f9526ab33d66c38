use std::path::Path;

use eyre::{Result, WrapErr};
use pojogen_mapping::TableRef;
use serde::Deserialize;

use super::SchemaSelection;

/// Identifies a table by catalog, schema and name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableKey {
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ColumnDescriptor {
    pub name: String,
    pub sql_type: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ForeignKeyDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    pub columns: Vec<String>,
    pub references: TableKey,
}

/// An introspected table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TableDescriptor {
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
    #[serde(default, rename = "column")]
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    pub primary_key: Vec<String>,
    #[serde(default, rename = "foreign-key")]
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
}

impl TableDescriptor {
    pub fn new(schema: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: schema.map(str::to_string),
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn foreign_key(mut self, columns: &[&str], schema: Option<&str>, table: &str) -> Self {
        self.foreign_keys.push(ForeignKeyDescriptor {
            name: None,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            references: TableKey {
                catalog: None,
                schema: schema.map(str::to_string),
                name: table.to_string(),
            },
        });
        self
    }

    pub fn get_column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Location of this table as recorded in the mapping metadata.
    pub fn table_ref(&self) -> TableRef {
        TableRef {
            catalog: self.catalog.clone(),
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }

    /// True when `key` names this table; absent key parts match anything.
    pub fn is_named_by(&self, key: &TableKey) -> bool {
        self.name == key.name
            && key.schema.as_ref().is_none_or(|s| self.schema.as_ref() == Some(s))
            && key.catalog.as_ref().is_none_or(|c| self.catalog.as_ref() == Some(c))
    }
}

/// A tables file: introspected tables plus the selections to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSet {
    #[serde(default, rename = "selection")]
    pub selections: Vec<SchemaSelection>,
    #[serde(default, rename = "table")]
    pub tables: Vec<TableDescriptor>,
}

impl TableSet {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).wrap_err("invalid tables file")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read tables file '{}'", path.display()))?;
        Self::parse(&content).wrap_err_with(|| format!("in '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tables_file() {
        let content = r#"
[[selection]]
schema = "HTT"

[[selection]]
schema = "OTHER%"
table = "ROLE"

[[table]]
schema = "HTT"
name = "USER"
primary-key = ["ID"]

[[table.column]]
name = "ID"
sql-type = "INTEGER"
nullable = false

[[table.column]]
name = "NAME"
sql-type = "VARCHAR(64)"

[[table]]
schema = "HTT"
name = "ADDRESS"

[[table.column]]
name = "USER_ID"
sql-type = "INTEGER"

[[table.foreign-key]]
columns = ["USER_ID"]
references = { schema = "HTT", name = "USER" }
"#;
        let set = TableSet::parse(content).unwrap();

        assert_eq!(set.selections.len(), 2);
        assert_eq!(set.selections[1].match_table.as_deref(), Some("ROLE"));
        assert_eq!(set.tables.len(), 2);

        let user = &set.tables[0];
        assert_eq!(user.primary_key, vec!["ID"]);
        assert!(!user.get_column("ID").unwrap().nullable);
        assert!(user.get_column("NAME").unwrap().nullable);

        let address = &set.tables[1];
        assert_eq!(address.foreign_keys.len(), 1);
        assert!(user.is_named_by(&address.foreign_keys[0].references));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(TableSet::parse("[[table]]\nname = \"A\"\ncolour = \"red\"\n").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = TableSet::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("failed to read tables file"));
    }

    #[test]
    fn test_is_named_by() {
        let table = TableDescriptor::new(Some("HTT"), "USER");
        let key = |schema: Option<&str>, name: &str| TableKey {
            catalog: None,
            schema: schema.map(str::to_string),
            name: name.to_string(),
        };

        assert!(table.is_named_by(&key(Some("HTT"), "USER")));
        assert!(table.is_named_by(&key(None, "USER")));
        assert!(!table.is_named_by(&key(Some("OTHER"), "USER")));
        assert!(!table.is_named_by(&key(Some("HTT"), "ROLE")));
    }
}
