use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use pojogen_codegen::reveng::{SchemaSelection, TableSet};
use pojogen_core::keys;

use super::GenerationArgs;
use crate::{
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct RevengCommand {
    /// Tables file (defaults to ./tables.toml)
    #[arg(short, long, default_value = "tables.toml")]
    pub tables: PathBuf,

    /// Extra schema selection as a LIKE pattern, after those in the tables file
    #[arg(long = "select-schema", value_name = "PATTERN")]
    pub select_schema: Vec<String>,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

impl RevengCommand {
    pub fn run(&self) -> Result<()> {
        let mut tables = TableSet::load(&self.tables)?;
        tables
            .selections
            .extend(self.select_schema.iter().map(SchemaSelection::schema));

        let settings = self.generation.settings()?;
        let export = self.generation.export_options(&settings)?;

        let (metadata, selected) = ops::reveng(&tables, settings.get(keys::PACKAGE))?;
        let generation = ops::generate(
            &metadata,
            &self.tables,
            GenerateOptions {
                export: &export,
                hbm: self.generation.hbm,
            },
        )?;

        let report = selected.with_generation(generation);
        report.render(&mut TerminalOutput::new());

        if !report.is_success() {
            std::process::exit(1);
        }
        Ok(())
    }
}
