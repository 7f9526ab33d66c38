//! Reveng command report data structures.

use super::{
    GenerateReport,
    output::{Output, Report},
};

/// Tables picked by the schema selections and the classes bound to them.
#[derive(Debug, Default)]
pub struct SelectionSummary {
    /// Qualified table names in selection order.
    pub tables: Vec<String>,
    pub classes: Vec<String>,
}

impl SelectionSummary {
    pub fn with_generation(self, generation: GenerateReport) -> RevengReport {
        RevengReport {
            selection: self,
            generation,
        }
    }
}

/// Report data from reverse engineering followed by generation.
#[derive(Debug)]
pub struct RevengReport {
    pub selection: SelectionSummary,
    pub generation: GenerateReport,
}

impl RevengReport {
    pub fn is_success(&self) -> bool {
        self.generation.is_success()
    }
}

impl Report for RevengReport {
    fn render(&self, out: &mut dyn Output) {
        out.section(&format!("Tables ({})", self.selection.tables.len()));
        for (table, class) in self.selection.tables.iter().zip(&self.selection.classes) {
            out.list_item(&format!("{} -> {}", table, class));
        }
        out.newline();
        self.generation.render(out);
    }
}
