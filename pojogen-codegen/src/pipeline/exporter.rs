use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

use eyre::{Result, eyre};
use indexmap::IndexMap;
use pojogen_core::{OutputFile, Settings, SettingsError, WriteResult, keys};
use pojogen_mapping::{ComponentBinding, Metadata, PersistentClassBinding};
use tracing::{debug, error, info, warn};

use super::Renderer;
use crate::{ArtifactCollector, ImportContext, ModelOptions, PojoClass};

/// Settings of one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub destination: PathBuf,
    /// Render without touching the filesystem.
    pub dry_run: bool,
    /// Abort on the first failed write.
    pub strict: bool,
    /// Worker threads rendering units.
    pub jobs: usize,
    pub model: ModelOptions,
}

impl ExportOptions {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            dry_run: false,
            strict: false,
            jobs: 1,
            model: ModelOptions::default(),
        }
    }

    pub fn from_settings(
        destination: impl Into<PathBuf>,
        settings: &Settings,
    ) -> Result<Self, SettingsError> {
        Ok(Self {
            strict: settings.flag(keys::STRICT),
            jobs: settings.count(keys::JOBS)?.unwrap_or(1),
            model: ModelOptions::from_settings(settings),
            ..Self::new(destination)
        })
    }
}

/// A unit skipped because its metadata could not be turned into a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedUnit {
    pub unit: String,
    pub category: String,
    pub reason: String,
}

/// An artifact that was rendered but could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedWrite {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of an export run, in unit order regardless of scheduling.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    /// Rendered files of a dry run.
    pub previews: Vec<OutputFile>,
    pub skipped: Vec<SkippedUnit>,
    pub failed: Vec<FailedWrite>,
}

impl ExportReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// A generation unit: one entity or one embedded component class.
#[derive(Debug, Clone, Copy)]
pub enum Unit<'m> {
    Entity(&'m PersistentClassBinding),
    Component(&'m ComponentBinding),
}

impl<'m> Unit<'m> {
    pub fn name(&self) -> &'m str {
        match self {
            Unit::Entity(binding) => &binding.class_name,
            Unit::Component(component) => &component.class_name,
        }
    }

    fn model(&self, metadata: &'m Metadata, options: &'m ModelOptions) -> PojoClass<'m> {
        match *self {
            Unit::Entity(binding) => PojoClass::for_entity(metadata, binding, options),
            Unit::Component(component) => PojoClass::for_component(metadata, component, options),
        }
    }
}

enum Outcome {
    Written(PathBuf),
    Preview(OutputFile),
    Skipped(SkippedUnit),
    Failed(FailedWrite),
}

/// Runs registered renderers over every unit of a metadata graph.
#[derive(Default)]
pub struct Exporter {
    renderers: Vec<Box<dyn Renderer>>,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a renderer; every unit is offered to renderers in this order.
    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderers.push(Box::new(renderer));
        self
    }

    /// Generation units: entities in metadata order, then every component
    /// class they embed, first occurrence wins.
    pub fn units<'m>(metadata: &'m Metadata, options: &'m ModelOptions) -> Vec<Unit<'m>> {
        let mut units: Vec<Unit<'m>> = metadata.entity_bindings().map(Unit::Entity).collect();

        let mut components: IndexMap<&'m str, &'m ComponentBinding> = IndexMap::new();
        let mut pending: Vec<&'m ComponentBinding> = metadata
            .entity_bindings()
            .flat_map(|binding| PojoClass::for_entity(metadata, binding, options).components())
            .collect();
        pending.reverse();
        while let Some(component) = pending.pop() {
            if components.contains_key(component.class_name.as_str()) {
                continue;
            }
            components.insert(&component.class_name, component);
            let mut nested = PojoClass::for_component(metadata, component, options).components();
            nested.reverse();
            pending.extend(nested);
        }

        units.extend(components.into_values().map(Unit::Component));
        units
    }

    /// Render and write every unit.
    ///
    /// Malformed units are skipped and failed writes are counted; with
    /// `strict` set the first failed write aborts the run.
    pub fn run(
        &self,
        metadata: &Metadata,
        options: &ExportOptions,
        collector: &ArtifactCollector,
    ) -> Result<ExportReport> {
        let units = Self::units(metadata, &options.model);
        let work: Vec<(Unit<'_>, &dyn Renderer)> = units
            .iter()
            .flat_map(|unit| {
                self.renderers
                    .iter()
                    .map(|renderer| renderer.as_ref())
                    .filter(move |renderer| {
                        matches!(unit, Unit::Entity(_)) || renderer.renders_components()
                    })
                    .map(move |renderer| (*unit, renderer))
            })
            .collect();

        let jobs = options.jobs.clamp(1, work.len().max(1));
        info!(
            units = units.len(),
            artifacts = work.len(),
            jobs,
            destination = %options.destination.display(),
            "Generating sources"
        );

        let abort = AtomicBool::new(false);
        let process = |worker: usize| -> Vec<(usize, Outcome)> {
            let mut outcomes = Vec::new();
            for (index, (unit, renderer)) in work.iter().enumerate().skip(worker).step_by(jobs) {
                if abort.load(Ordering::SeqCst) {
                    break;
                }
                let outcome = export_unit(metadata, options, collector, *unit, *renderer);
                if options.strict && matches!(outcome, Outcome::Failed(_)) {
                    abort.store(true, Ordering::SeqCst);
                }
                outcomes.push((index, outcome));
            }
            outcomes
        };

        let process = &process;
        let mut outcomes = if jobs == 1 {
            process(0)
        } else {
            thread::scope(|scope| {
                let handles: Vec<_> = (0..jobs)
                    .map(|worker| scope.spawn(move || process(worker)))
                    .collect();
                handles
                    .into_iter()
                    .flat_map(|handle| {
                        handle
                            .join()
                            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                    })
                    .collect::<Vec<_>>()
            })
        };
        outcomes.sort_by_key(|(index, _)| *index);

        let mut report = ExportReport::default();
        for (_, outcome) in outcomes {
            match outcome {
                Outcome::Written(path) => report.written.push(path),
                Outcome::Preview(file) => report.previews.push(file),
                Outcome::Skipped(skipped) => report.skipped.push(skipped),
                Outcome::Failed(failed) => report.failed.push(failed),
            }
        }

        if options.strict
            && let Some(failed) = report.failed.first()
        {
            return Err(eyre!(
                "failed to write '{}': {}",
                failed.path.display(),
                failed.reason
            ));
        }

        info!(
            written = report.written.len(),
            previewed = report.previews.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Generation finished"
        );
        Ok(report)
    }
}

fn export_unit(
    metadata: &Metadata,
    options: &ExportOptions,
    collector: &ArtifactCollector,
    unit: Unit<'_>,
    renderer: &dyn Renderer,
) -> Outcome {
    let pojo = unit.model(metadata, &options.model);
    let mut imports = ImportContext::for_class(pojo.qualified_declaration_name());

    let rendered = pojo
        .validate()
        .and_then(|()| renderer.render(&pojo, &mut imports));
    let content = match rendered {
        Ok(content) => content,
        Err(err) => {
            warn!(unit = unit.name(), category = renderer.category(), "Skipping unit: {}", err);
            return Outcome::Skipped(SkippedUnit {
                unit: unit.name().to_string(),
                category: renderer.category().to_string(),
                reason: err.to_string(),
            });
        }
    };

    let file = OutputFile::new(renderer.relative_path(&pojo), content);
    if options.dry_run {
        return Outcome::Preview(file);
    }
    write_artifact(&file, &options.destination, renderer.category(), collector)
}

fn write_artifact(
    file: &OutputFile,
    destination: &Path,
    category: &str,
    collector: &ArtifactCollector,
) -> Outcome {
    match file.write(destination) {
        Ok(WriteResult::Written(path)) => {
            debug!(path = %path.display(), "Wrote file");
            collector.record(category, &path);
            Outcome::Written(path)
        }
        Ok(WriteResult::Skipped) => Outcome::Preview(file.clone()),
        Err(err) => {
            let path = file.full_path(destination);
            error!(path = %path.display(), "Failed to write file: {:#}", err);
            Outcome::Failed(FailedWrite {
                path,
                reason: format!("{:#}", err),
            })
        }
    }
}
