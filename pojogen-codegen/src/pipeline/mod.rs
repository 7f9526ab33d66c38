//! Export pipeline: one generation run over a metadata graph.
//!
//! The [`Exporter`] enumerates generation units (entities plus the component
//! classes they embed), builds a [`PojoClass`](crate::PojoClass) and a fresh
//! [`ImportContext`](crate::ImportContext) per unit, hands both to every
//! registered [`Renderer`] and writes the results below the destination
//! directory.
//!
//! # Example
//!
//! ```ignore
//! let collector = ArtifactCollector::new();
//! let report = Exporter::new()
//!     .renderer(PojoRenderer::new())
//!     .run(&metadata, &options, &collector)?;
//! println!("{} written, {} skipped", report.written.len(), report.skipped.len());
//! ```

mod exporter;
mod renderer;

pub use exporter::{ExportOptions, ExportReport, Exporter, FailedWrite, SkippedUnit, Unit};
pub use renderer::{Renderer, package_path};
