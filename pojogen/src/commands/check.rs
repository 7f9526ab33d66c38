use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use pojogen_codegen::ModelOptions;
use pojogen_mapping::parse_file;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Mapping file, TOML or JSON (defaults to ./mapping.toml)
    #[arg(short, long, default_value = "mapping.toml")]
    pub mapping: PathBuf,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let metadata = parse_file(&self.mapping).unwrap_or_exit();

        let report = ops::check(&metadata, &self.mapping, &ModelOptions::default());
        report.render(&mut TerminalOutput::new());

        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
