//! Import resolution for generated Java sources.
//!
//! Every generated unit owns an [`ImportContext`]. Renderers pass fully
//! qualified type references through it and get back the form to print,
//! short when the simple name is free and fully qualified otherwise.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use pojogen_core::{qualifier, unqualify};
use thiserror::Error;

/// Packages whose classes are visible without an import statement.
const IMPLICIT_PACKAGE: &str = "java.lang";

/// Packages whose names may be printed short but are never imported.
const EXCLUDED_PACKAGES: &[&str] = &["org.hibernate.annotations"];

/// Resolves type references for a single generated unit.
pub trait ImportResolver {
    /// Return the form of `reference` to print in the generated source.
    fn import_type(&mut self, reference: &str) -> String;

    /// Render the import block for everything registered so far.
    fn generate_imports(&self) -> String;
}

/// Error raised when a type reference is not syntactically a Java type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid type reference '{reference}': {reason}")]
pub struct TypeReferenceError {
    pub reference: String,
    pub reason: &'static str,
}

/// A parsed Java type reference: `base<arguments>[]...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference<'a> {
    pub base: &'a str,
    pub arguments: Vec<&'a str>,
    pub array_dims: usize,
}

impl<'a> TypeReference<'a> {
    pub fn parse(reference: &'a str) -> Result<Self, TypeReferenceError> {
        let fail = |reason| TypeReferenceError {
            reference: reference.to_string(),
            reason,
        };

        let trimmed = reference.trim();
        let split = trimmed.find(['<', '[']).unwrap_or(trimmed.len());
        let (base, mut rest) = trimmed.split_at(split);
        if !is_qualified_name(base) {
            return Err(fail("expected a dotted Java name"));
        }

        let mut arguments = Vec::new();
        if let Some(inner) = rest.strip_prefix('<') {
            let close = matching_angle(inner).ok_or_else(|| fail("unbalanced '<'"))?;
            for argument in split_top_level(&inner[..close]) {
                let argument = argument.trim();
                if argument.is_empty() {
                    return Err(fail("empty type argument"));
                }
                if !is_wildcard(argument) {
                    TypeReference::parse(argument)?;
                }
                arguments.push(argument);
            }
            rest = &inner[close + 1..];
        }

        let mut array_dims = 0;
        while let Some(after) = rest.strip_prefix("[]") {
            array_dims += 1;
            rest = after;
        }
        if !rest.is_empty() {
            return Err(fail("unexpected trailing characters"));
        }

        Ok(Self {
            base,
            arguments,
            array_dims,
        })
    }

    /// Render the reference with `base` substituted and generic arguments
    /// kept verbatim apart from nested-class separators.
    pub fn render_with(&self, base: &str) -> String {
        let mut out = base.to_string();
        if !self.arguments.is_empty() {
            let args: Vec<String> = self.arguments.iter().map(|a| a.replace('$', ".")).collect();
            out.push('<');
            out.push_str(&args.join(", "));
            out.push('>');
        }
        for _ in 0..self.array_dims {
            out.push_str("[]");
        }
        out
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn is_qualified_name(name: &str) -> bool {
    !name.is_empty() && name.split(['.', '$']).all(is_identifier)
}

fn is_wildcard(argument: &str) -> bool {
    if argument == "?" {
        return true;
    }
    ["? extends ", "? super "].iter().any(|prefix| {
        argument
            .strip_prefix(*prefix)
            .is_some_and(|bound| TypeReference::parse(bound).is_ok())
    })
}

fn matching_angle(inner: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if depth == 0 => return Some(index),
            '>' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn split_top_level(arguments: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, c) in arguments.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&arguments[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&arguments[start..]);
    parts
}

/// Import context of one generated Java source file.
///
/// Simple names are claimed first come, first served. The first origin of a
/// simple name is printed short; any other origin of the same simple name is
/// printed fully qualified for the rest of the unit.
///
/// `java.util.Map$Entry` and `java.util.Map.Entry` name the same class but are
/// treated as different references: the first yields `Map.Entry`, the second
/// `Entry`.
#[derive(Debug, Clone)]
pub struct ImportContext {
    base_package: String,
    /// Simple name (with `$` kept) -> origin that claimed it
    simple_names: IndexMap<String, String>,
    imports: BTreeSet<String>,
}

enum Claim {
    Free,
    Same,
    Taken,
}

impl ImportContext {
    pub fn new(base_package: impl Into<String>) -> Self {
        Self {
            base_package: base_package.into(),
            simple_names: IndexMap::new(),
            imports: BTreeSet::new(),
        }
    }

    /// Context for the source file declaring `qualified_name`.
    ///
    /// The declared class owns its simple name, so any other class of that
    /// name is printed fully qualified and never imported.
    pub fn for_class(qualified_name: &str) -> Self {
        let mut ctx = Self::new(qualifier(qualified_name));
        ctx.simple_names.insert(
            unqualify(qualified_name).to_string(),
            qualified_name.to_string(),
        );
        ctx
    }

    pub fn base_package(&self) -> &str {
        &self.base_package
    }

    /// Import statements rendered so far, without line terminators.
    pub fn import_statements(&self) -> Vec<String> {
        self.imports
            .iter()
            .map(|origin| format!("import {};", origin))
            .collect()
    }

    fn claim(&self, key: &str, origin: &str) -> Claim {
        match self.simple_names.get(key) {
            None => Claim::Free,
            Some(existing) if existing == origin => Claim::Same,
            Some(_) => Claim::Taken,
        }
    }

    fn needs_import(&self, origin: &str) -> bool {
        let package = qualifier(origin);
        if package == IMPLICIT_PACKAGE || package == self.base_package {
            return false;
        }
        !EXCLUDED_PACKAGES.iter().any(|excluded| {
            package == *excluded || package.starts_with(&format!("{}.", excluded))
        })
    }

    fn register(&mut self, key: &str, origin: &str) {
        self.simple_names
            .insert(key.to_string(), origin.to_string());
        if self.needs_import(origin) {
            self.imports.insert(origin.to_string());
        }
    }

    fn resolve_base(&mut self, base: &str) -> String {
        let short = unqualify(base).replace('$', ".");
        let full = base.replace('$', ".");
        let key = unqualify(base).to_string();

        match self.claim(&key, base) {
            Claim::Same => return short,
            Claim::Taken => return full,
            Claim::Free => {}
        }

        // A nested class is imported through its outermost class, which
        // therefore has to claim its own simple name as well.
        if let Some(dollar) = base.find('$') {
            let outer = &base[..dollar];
            let outer_key = unqualify(outer).to_string();
            match self.claim(&outer_key, outer) {
                Claim::Taken => return full,
                Claim::Same => {}
                Claim::Free => self.register(&outer_key, outer),
            }
            self.simple_names.insert(key, base.to_string());
            return short;
        }

        self.register(&key, base);
        short
    }
}

impl ImportResolver for ImportContext {
    fn import_type(&mut self, reference: &str) -> String {
        let Ok(parsed) = TypeReference::parse(reference) else {
            return reference.replace('$', ".");
        };
        if !parsed.base.contains('.') {
            return parsed.render_with(&parsed.base.replace('$', "."));
        }
        let base = self.resolve_base(parsed.base);
        parsed.render_with(&base)
    }

    fn generate_imports(&self) -> String {
        self.import_statements()
            .into_iter()
            .map(|line| line + "\n")
            .collect()
    }
}

/// Resolver that keeps every reference fully qualified.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopImportContext;

impl ImportResolver for NoopImportContext {
    fn import_type(&mut self, reference: &str) -> String {
        reference.to_string()
    }

    fn generate_imports(&self) -> String {
        String::new()
    }
}
