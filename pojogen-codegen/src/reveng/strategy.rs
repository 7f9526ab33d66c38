use pojogen_core::{to_camel_case, to_pascal_case};

use super::{ColumnDescriptor, SchemaSelection, TableDescriptor};

/// Naming and selection decisions of a reverse-engineering run.
pub trait RevengStrategy {
    /// Ordered selections; earlier ones win ties.
    fn schema_selections(&self) -> Vec<SchemaSelection> {
        vec![SchemaSelection::any()]
    }

    fn exclude_table(&self, _table: &TableDescriptor) -> bool {
        false
    }

    /// Unqualified class name for a table.
    fn table_to_class_name(&self, table: &TableDescriptor) -> String {
        to_pascal_case(&table.name)
    }

    fn column_to_property_name(&self, column: &str) -> String {
        to_camel_case(column)
    }

    /// Basic type name for a column.
    fn column_to_type_name(&self, column: &ColumnDescriptor) -> String {
        sql_type_to_basic_type(&column.sql_type).to_string()
    }
}

/// Strategy with an unconstrained selection and default naming.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStrategy;

impl RevengStrategy for DefaultStrategy {}

/// Default naming over an explicit list of selections.
#[derive(Debug, Clone, Default)]
pub struct SelectionStrategy {
    selections: Vec<SchemaSelection>,
}

impl SelectionStrategy {
    pub fn new(selections: Vec<SchemaSelection>) -> Self {
        Self { selections }
    }
}

impl RevengStrategy for SelectionStrategy {
    fn schema_selections(&self) -> Vec<SchemaSelection> {
        if self.selections.is_empty() {
            return vec![SchemaSelection::any()];
        }
        self.selections.clone()
    }
}

/// Map a JDBC type name (optionally with a length) to a basic type name.
pub(crate) fn sql_type_to_basic_type(sql_type: &str) -> &'static str {
    let (base, length) = match sql_type.split_once('(') {
        Some((base, rest)) => (base, rest.trim_end_matches(')').trim().parse::<u32>().ok()),
        None => (sql_type, None),
    };
    match base.trim().to_ascii_uppercase().as_str() {
        "INTEGER" | "INT" => "integer",
        "BIGINT" => "long",
        "SMALLINT" => "short",
        "TINYINT" => "byte",
        "DECIMAL" | "NUMERIC" => "big_decimal",
        "FLOAT" | "DOUBLE" | "DOUBLE PRECISION" => "double",
        "REAL" => "float",
        "CHAR" | "NCHAR" if length == Some(1) => "character",
        "CHAR" | "NCHAR" | "VARCHAR" | "NVARCHAR" | "VARCHAR2" | "LONGVARCHAR" | "TEXT" => {
            "string"
        }
        "DATE" => "date",
        "TIME" => "time",
        "TIMESTAMP" => "timestamp",
        "BOOLEAN" | "BIT" => "boolean",
        "BLOB" | "BINARY" | "VARBINARY" | "LONGVARBINARY" => "binary",
        "CLOB" => "clob",
        _ => "serializable",
    }
}
