//! Generate operation - sources from a metadata graph.

use std::path::Path;

use eyre::{Context, Result};
use pojogen_codegen::{ArtifactCollector, ExportOptions, Exporter};
use pojogen_codegen_java::{HbmXmlRenderer, PojoRenderer};
use pojogen_mapping::Metadata;

use crate::reports::GenerateReport;

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    pub export: &'a ExportOptions,
    /// Whether to write `.hbm.xml` documents next to the sources.
    pub hbm: bool,
}

/// Execute the generate operation.
pub fn generate(
    metadata: &Metadata,
    source: &Path,
    opts: GenerateOptions<'_>,
) -> Result<GenerateReport> {
    let mut exporter = Exporter::new().renderer(PojoRenderer::new());
    if opts.hbm {
        exporter = exporter.renderer(HbmXmlRenderer::new());
    }

    let collector = ArtifactCollector::new();
    let export = exporter
        .run(metadata, opts.export, &collector)
        .wrap_err("Generation failed")?;

    let artifacts = collector
        .categories()
        .into_iter()
        .map(|category| {
            let count = collector.file_count(&category);
            (category, count)
        })
        .collect();

    Ok(GenerateReport {
        source: source.to_path_buf(),
        entity_count: metadata.len(),
        output_dir: opts.export.destination.clone(),
        artifacts,
        export,
    })
}
