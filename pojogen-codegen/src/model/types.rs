//! Mapping of basic type names to Java types.

use pojogen_mapping::CollectionKind;

/// Basic types with a primitive form: (aliases, primitive, wrapper).
const PRIMITIVES: &[(&[&str], &str, &str)] = &[
    (&["int", "integer", "java.lang.Integer"], "int", "java.lang.Integer"),
    (&["long", "java.lang.Long"], "long", "java.lang.Long"),
    (&["short", "java.lang.Short"], "short", "java.lang.Short"),
    (&["byte", "java.lang.Byte"], "byte", "java.lang.Byte"),
    (&["float", "java.lang.Float"], "float", "java.lang.Float"),
    (&["double", "java.lang.Double"], "double", "java.lang.Double"),
    (
        &["boolean", "yes_no", "true_false", "java.lang.Boolean"],
        "boolean",
        "java.lang.Boolean",
    ),
    (
        &["character", "char", "java.lang.Character"],
        "char",
        "java.lang.Character",
    ),
];

/// Basic types that always map to a class.
const CLASSES: &[(&str, &str)] = &[
    ("string", "java.lang.String"),
    ("text", "java.lang.String"),
    ("date", "java.util.Date"),
    ("time", "java.util.Date"),
    ("timestamp", "java.util.Date"),
    ("calendar", "java.util.Calendar"),
    ("calendar_date", "java.util.Calendar"),
    ("big_decimal", "java.math.BigDecimal"),
    ("big_integer", "java.math.BigInteger"),
    ("binary", "byte[]"),
    ("blob", "java.sql.Blob"),
    ("clob", "java.sql.Clob"),
    ("locale", "java.util.Locale"),
    ("timezone", "java.util.TimeZone"),
    ("currency", "java.util.Currency"),
    ("class", "java.lang.Class"),
    ("serializable", "java.io.Serializable"),
    ("uuid", "java.util.UUID"),
];

/// Java type for a basic type name.
///
/// Non-nullable values of primitive-capable types use the primitive form.
/// Dotted names are class names and are returned as given. Returns `None`
/// for unknown basic type names.
pub fn basic_java_type(type_name: &str, nullable: bool) -> Option<String> {
    let type_name = type_name.trim();
    if let Some((_, primitive, wrapper)) = PRIMITIVES
        .iter()
        .find(|(aliases, _, _)| aliases.contains(&type_name))
    {
        let chosen = if nullable { wrapper } else { primitive };
        return Some(chosen.to_string());
    }
    if let Some((_, class)) = CLASSES.iter().find(|(name, _)| *name == type_name) {
        return Some(class.to_string());
    }
    if type_name.contains('.') {
        return Some(type_name.to_string());
    }
    None
}

/// Interface type of a collection kind.
pub fn collection_interface(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Set => "java.util.Set",
        CollectionKind::List => "java.util.List",
        CollectionKind::Bag => "java.util.Collection",
        CollectionKind::Map => "java.util.Map",
    }
}

/// Implementation type used to initialise a collection field.
pub fn collection_implementation(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Set => "java.util.HashSet",
        CollectionKind::List | CollectionKind::Bag => "java.util.ArrayList",
        CollectionKind::Map => "java.util.HashMap",
    }
}

/// True for Java primitive type names.
pub fn is_primitive(java_type: &str) -> bool {
    PRIMITIVES.iter().any(|(_, primitive, _)| *primitive == java_type)
}
