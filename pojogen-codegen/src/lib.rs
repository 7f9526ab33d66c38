//! Class model, import resolution and export pipeline for pojogen.
//!
//! # Module Organization
//!
//! - [`imports`] - Per-unit import resolution (ImportContext, NoopImportContext)
//! - [`model`] - Structural class model derived from mapping metadata (PojoClass)
//! - [`artifacts`] - Registry of written files (ArtifactCollector)
//! - [`reveng`] - Schema selection and table-to-entity binding
//! - [`builder`] - Indentation-aware text building for renderers
//! - [`pipeline`] - One generation run over a metadata graph (Exporter)

pub mod artifacts;
pub mod builder;
mod error;
pub mod imports;
pub mod model;
pub mod pipeline;
pub mod reveng;

pub use artifacts::ArtifactCollector;
pub use error::ModelError;
pub use imports::{ImportContext, ImportResolver, NoopImportContext, TypeReference};
pub use model::{Declaration, FieldSpec, ModelOptions, PojoClass};
pub use pipeline::{ExportOptions, ExportReport, Exporter, Renderer};
