mod check;
mod generate;
mod reveng;

use std::path::PathBuf;

use check::CheckCommand;
use clap::{Args, Parser, Subcommand, ValueEnum};
use eyre::Result;
use generate::GenerateCommand;
use pojogen_codegen::ExportOptions;
use pojogen_core::{Settings, keys};
use reveng::RevengCommand;
use tracing_subscriber::EnvFilter;

/// Extension trait for exiting on mapping errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for pojogen_mapping::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "pojogen")]
#[command(version)]
#[command(about = "Generate Java POJOs and Hibernate mappings from mapping metadata")]
pub(crate) struct Cli {
    /// Log verbosity (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum, default_value = "warn")]
    verbosity: Verbosity,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Install the stderr log subscriber.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.verbosity.directive()));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Reveng(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate sources from a mapping file
    Generate(GenerateCommand),

    /// Generate sources from a tables file
    Reveng(RevengCommand),

    /// Validate a mapping file without generating anything
    Check(CheckCommand),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Verbosity {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    fn directive(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Flags shared by every command that writes sources.
#[derive(Args)]
pub(crate) struct GenerationArgs {
    /// Settings file (TOML)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Output directory (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Preview generated files without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Abort on the first file that cannot be written
    #[arg(long)]
    pub strict: bool,

    /// Number of worker threads
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Package for every generated class
    #[arg(short, long)]
    pub package: Option<String>,

    /// Emit generic collection types
    #[arg(long)]
    pub jdk5: bool,

    /// Also write .hbm.xml mapping documents
    #[arg(long)]
    pub hbm: bool,
}

impl GenerationArgs {
    /// The settings file, if any, overridden by command-line flags.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::new(),
        };

        let mut overrides = Settings::new();
        if self.jdk5 {
            overrides = overrides.set(keys::JDK5, "true");
        }
        if self.strict {
            overrides = overrides.set(keys::STRICT, "true");
        }
        if let Some(jobs) = self.jobs {
            overrides = overrides.set(keys::JOBS, jobs.to_string());
        }
        if let Some(package) = &self.package {
            overrides = overrides.set(keys::PACKAGE, package);
        }
        settings.merge(&overrides);
        Ok(settings)
    }

    pub fn export_options(&self, settings: &Settings) -> Result<ExportOptions> {
        let mut options = ExportOptions::from_settings(&self.output, settings)?;
        options.dry_run = self.dry_run;
        Ok(options)
    }
}
