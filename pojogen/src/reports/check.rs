//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from mapping validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the mapping file.
    pub mapping_path: PathBuf,
    pub entity_count: usize,
    /// Distinct component classes reachable from the entities.
    pub component_count: usize,
    /// Units whose class model could not be built.
    pub errors: Vec<String>,
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for error in &self.errors {
            out.error(error);
        }
        if !self.is_valid() {
            out.newline();
            return;
        }

        out.preformatted(&format!("✓ {} is valid", self.mapping_path.display()));
        out.newline();
        out.key_value_indented("entities", &self.entity_count.to_string());
        out.key_value_indented("components", &self.component_count.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::testing::RecordingOutput;

    #[test]
    fn test_render_valid() {
        let report = CheckReport {
            mapping_path: PathBuf::from("mapping.toml"),
            entity_count: 3,
            component_count: 1,
            errors: Vec::new(),
        };
        let mut out = RecordingOutput::default();
        report.render(&mut out);

        assert_eq!(
            out.lines,
            vec![
                "✓ mapping.toml is valid",
                "",
                "  entities: 3",
                "  components: 1",
            ]
        );
    }

    #[test]
    fn test_render_errors() {
        let report = CheckReport {
            mapping_path: PathBuf::from("mapping.toml"),
            entity_count: 1,
            component_count: 0,
            errors: vec!["malformed metadata for 'A.b': no type declared".to_string()],
        };
        let mut out = RecordingOutput::default();
        report.render(&mut out);

        assert_eq!(
            out.lines,
            vec!["error: malformed metadata for 'A.b': no type declared", ""]
        );
    }
}
