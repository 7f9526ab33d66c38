use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for mapping operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// A broken structural invariant of the metadata graph.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("root entity '{entity}' has no identifier property")]
    MissingIdentifier { entity: String },

    #[error("subclass '{entity}' declares its own identifier")]
    SubclassIdentifier { entity: String },

    #[error("entity '{entity}' extends unknown entity '{superclass}'")]
    UnknownSuperclass { entity: String, superclass: String },

    #[error("entity '{entity}' is part of an inheritance cycle")]
    InheritanceCycle { entity: String },

    #[error("entity '{entity}' declares property '{property}' twice")]
    DuplicateProperty { entity: String, property: String },

    #[error("property '{property}' of '{entity}' references unknown entity '{target}'")]
    UnknownAssociation {
        entity: String,
        property: String,
        target: String,
    },

    #[error("meta attribute '{key}' on '{owner}' has no values")]
    EmptyMetaAttribute { owner: String, key: String },

    #[error("entity '{entity}' is declared twice")]
    DuplicateEntity { entity: String },
}

impl InvariantViolation {
    /// The name most useful for locating the problem in a mapping file.
    pub fn subject(&self) -> &str {
        match self {
            Self::MissingIdentifier { entity }
            | Self::SubclassIdentifier { entity }
            | Self::InheritanceCycle { entity }
            | Self::DuplicateEntity { entity } => entity,
            Self::UnknownSuperclass { superclass, .. } => superclass,
            Self::DuplicateProperty { property, .. }
            | Self::UnknownAssociation { property, .. } => property,
            Self::EmptyMetaAttribute { key, .. } => key,
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(pojogen::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(pojogen::parse_error))]
    Parse {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse {filename}: {message}")]
    #[diagnostic(code(pojogen::parse_error))]
    ParseJson {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("{message}")]
    #[diagnostic(code(pojogen::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("{violation}")]
    #[diagnostic(
        code(pojogen::invariant),
        help("every root entity needs an `id`, subclasses inherit it from their root")
    )]
    Invariant {
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
        violation: InvariantViolation,
    },
}

impl Error {
    /// Create a parse error from a toml error with source context
    pub fn parse(source: toml::de::Error, src: &str, filename: &str) -> Box<Self> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            filename: filename.to_string(),
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }

    /// Create a parse error from a JSON error with source context
    pub fn parse_json(source: serde_json::Error, src: &str, filename: &str) -> Box<Self> {
        let span = offset_of(src, source.line(), source.column()).map(|at| SourceSpan::from((at, 1)));
        Box::new(Error::ParseJson {
            filename: filename.to_string(),
            src: NamedSource::new(filename, src.to_string()),
            span,
            message: source.to_string(),
        })
    }

    /// Create a validation error with source context
    pub fn validation(
        message: impl Into<String>,
        src: &str,
        filename: &str,
        span: Option<SourceSpan>,
    ) -> Box<Self> {
        Box::new(Error::Validation {
            src: NamedSource::new(filename, src.to_string()),
            span,
            message: message.into(),
        })
    }

    /// Create an invariant error with source context
    pub fn invariant(
        violation: InvariantViolation,
        src: &str,
        filename: &str,
        span: Option<SourceSpan>,
    ) -> Box<Self> {
        Box::new(Error::Invariant {
            src: NamedSource::new(filename, src.to_string()),
            span,
            violation,
        })
    }
}

/// Byte offset of a 1-based line/column position.
fn offset_of(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    Some((line_start + column.saturating_sub(1)).min(src.len().saturating_sub(1)))
}
