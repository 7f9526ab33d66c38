//! Generate command report data structures.

use std::path::PathBuf;

use pojogen_codegen::ExportReport;

use super::output::{Output, Report};

/// Report data from one generation run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Mapping or tables file the metadata came from.
    pub source: PathBuf,
    pub entity_count: usize,
    pub output_dir: PathBuf,
    /// Written files per category, in first-written order.
    pub artifacts: Vec<(String, usize)>,
    pub export: ExportReport,
}

impl GenerateReport {
    /// Whether every rendered file reached the disk.
    pub fn is_success(&self) -> bool {
        self.export.failed.is_empty()
    }

    fn is_preview(&self) -> bool {
        !self.export.previews.is_empty()
    }

    fn render_preview(&self, out: &mut dyn Output) {
        for file in &self.export.previews {
            out.divider(&file.relative_path().display().to_string());
            out.preformatted(file.content());
        }

        out.divider("Summary");
        out.preformatted(&format!(
            "{} files would be generated",
            self.export.previews.len()
        ));
    }

    fn render_written(&self, out: &mut dyn Output) {
        out.preformatted(&format!(
            "{}: {} entities",
            self.source.display(),
            self.entity_count
        ));
        out.newline();
        out.key_value("Generated", &self.output_dir.display().to_string());
        for (category, count) in &self.artifacts {
            out.key_value_indented(category, &format!("{} files", count));
        }
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        for skipped in &self.export.skipped {
            out.warning(&format!(
                "skipped {} ({}): {}",
                skipped.unit, skipped.category, skipped.reason
            ));
        }

        if self.is_preview() {
            self.render_preview(out);
        } else {
            self.render_written(out);
        }

        if !self.export.failed.is_empty() {
            out.newline();
            for failed in &self.export.failed {
                out.error(&format!(
                    "failed to write {}: {}",
                    failed.path.display(),
                    failed.reason
                ));
            }
        }
    }
}
