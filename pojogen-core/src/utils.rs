//! Shared naming helpers for code generation.

/// Capitalize a property name the way JavaBeans accessors expect
/// (e.g., "mail" -> "Mail", but "eMail" stays "eMail").
///
/// A name whose second character is uppercase is left untouched so that
/// `getEMail`/`geteMail` round-trip through bean introspection.
pub fn bean_capitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.next().is_some_and(char::is_uppercase) {
        return name.to_string();
    }
    first.to_uppercase().chain(name.chars().skip(1)).collect()
}

/// Last dot-separated segment of a qualified name ("a.b.C" -> "C")
pub fn unqualify(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, simple)| simple)
}

/// Everything before the last dot of a qualified name ("a.b.C" -> "a.b")
pub fn qualifier(name: &str) -> &str {
    name.rsplit_once('.').map_or("", |(package, _)| package)
}

/// Convert a database identifier to PascalCase (e.g., "ORDER_LINE" -> "OrderLine")
pub fn to_pascal_case(s: &str) -> String {
    s.split(['_', ' ', '-'])
        .map(|part| {
            let lower = part.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert a database identifier to camelCase (e.g., "ORDER_DATE" -> "orderDate")
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

/// Naive English pluralization used for inverse collection names.
///
/// Words that already end in a single `s` are assumed to be plural.
pub fn pluralize(word: &str) -> String {
    if word.ends_with("ss") || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh")
    {
        return format!("{}es", word);
    }
    if word.ends_with('s') {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix('y')
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        return format!("{}ies", stem);
    }
    format!("{}s", word)
}

/// Convert a TOML value to its string representation
pub fn toml_value_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(d) => d.to_string(),
        toml::Value::Array(values) => values
            .iter()
            .map(toml_value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        toml::Value::Table(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bean_capitalize() {
        assert_eq!(bean_capitalize("Mail"), "Mail");
        assert_eq!(bean_capitalize("mail"), "Mail");
        assert_eq!(bean_capitalize("eMail"), "eMail");
        assert_eq!(bean_capitalize("EMail"), "EMail");
        assert_eq!(bean_capitalize("x"), "X");
        assert_eq!(bean_capitalize(""), "");
    }

    #[test]
    fn test_unqualify_and_qualifier() {
        assert_eq!(unqualify("java.util.Calendar"), "Calendar");
        assert_eq!(unqualify("HelloWorld"), "HelloWorld");
        assert_eq!(qualifier("java.util.Calendar"), "java.util");
        assert_eq!(qualifier("HelloWorld"), "");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("USERROLES"), "Userroles");
        assert_eq!(to_pascal_case("ORDER_LINE"), "OrderLine");
        assert_eq!(to_pascal_case("plainrole"), "Plainrole");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("ORDER_DATE"), "orderDate");
        assert_eq!(to_camel_case("ID"), "id");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("user"), "users");
        assert_eq!(pluralize("address"), "addresses");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("userroles"), "userroles");
    }

    #[test]
    fn test_toml_value_to_string() {
        assert_eq!(
            toml_value_to_string(&toml::Value::String("hello".to_string())),
            "hello"
        );
        assert_eq!(toml_value_to_string(&toml::Value::Integer(42)), "42");
        assert_eq!(toml_value_to_string(&toml::Value::Boolean(true)), "true");
    }
}
