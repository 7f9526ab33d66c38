use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use pojogen_mapping::parse_file;

use super::{GenerationArgs, UnwrapOrExit};
use crate::{
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Mapping file, TOML or JSON (defaults to ./mapping.toml)
    #[arg(short, long, default_value = "mapping.toml")]
    pub mapping: PathBuf,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let metadata = parse_file(&self.mapping).unwrap_or_exit();
        let settings = self.generation.settings()?;
        let export = self.generation.export_options(&settings)?;

        let report = ops::generate(
            &metadata,
            &self.mapping,
            GenerateOptions {
                export: &export,
                hbm: self.generation.hbm,
            },
        )?;
        report.render(&mut TerminalOutput::new());

        if !report.is_success() {
            std::process::exit(1);
        }
        Ok(())
    }
}
