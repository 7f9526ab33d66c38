//! Mapping metadata for the pojogen source generator.
//!
//! This crate holds the read-only metadata graph that every generator
//! consumes: persistent classes, their properties, embedded components,
//! collections and the free-form meta attributes attached to them.
//!
//! # Architecture
//!
//! ```text
//! mapping.toml / mapping.json → pojogen-mapping (parse + validate) → Metadata → codegen
//! ```
//!
//! [`Metadata`] can also be assembled programmatically (the reverse
//! engineering binder in `pojogen-codegen` does so) and checked with
//! [`Metadata::check`].

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod meta;
mod model;
mod parse;

pub use error::{Error, InvariantViolation, Result};
pub use meta::{MetaAttribute, MetaAttributes, meta_keys};
pub use model::{
    CollectionBinding, CollectionKind, ComponentBinding, Metadata, PersistentClassBinding,
    PropertyBinding, TableRef, ValueKind,
};
pub use parse::{parse_file, parse_json, parse_str, parse_str_with_filename};
