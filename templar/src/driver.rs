//! The generator driver.
//!
//! A run goes through discovery, profile construction, output planning,
//! parallel dispatch and the final join:
//!
//! 1. The template tree is scanned and every unit is resolved in the
//!    [`TemplateRegistry`]. Units without factories are reported as
//!    [`DiscoveryWarning`]s and skipped.
//! 2. Factories are invoked in discovery order. A factory that panics fails
//!    its own profile only.
//! 3. Output paths of all targets are computed up front. Two profiles
//!    producing the same file is a configuration error and aborts the run
//!    before anything is written.
//! 4. Each profile becomes one task on a bounded rayon pool. A task renders
//!    all of its targets and then hands them to the [`IncrementalWriter`].
//!    Errors and panics are contained to the task.
//! 5. Once every task has finished the results are folded into a
//!    [`RunSummary`]; any failed profile turns the run into
//!    [`GenerateError::Failed`].

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::error::{DiscoveryError, DiscoveryWarning, GenerateError, GenerateResult, RenderError};
use crate::registry::{RegisteredTemplate, TemplateRegistry};
use crate::render::Renderer;
use crate::scanner::{TemplateScanner, DEFAULT_EXTENSION};
use crate::target::Profile;
use crate::writer::{IncrementalWriter, WriteOutcome};

/// Default name of the generated source directory below `src/`.
pub const DEFAULT_GENERATED_DIR: &str = "generated";

/// Options of a generator run.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Worker threads; `0` uses the available parallelism.
    pub workers: usize,

    /// Extension of template files.
    pub template_extension: String,

    /// Optional glob template paths must match.
    pub include: Option<String>,

    /// Globs excluding template paths.
    pub exclude: Vec<String>,

    /// Directory below `src/` that receives generated sources.
    pub generated_dir: String,

    /// Compute outcomes without touching the file system.
    pub dry_run: bool,

    /// Unchanged files get their modification time moved past this.
    pub min_timestamp: Option<SystemTime>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            workers: 0,
            template_extension: DEFAULT_EXTENSION.to_string(),
            include: None,
            exclude: vec!["**/mod.rs".to_string()],
            generated_dir: DEFAULT_GENERATED_DIR.to_string(),
            dry_run: false,
            min_timestamp: None,
        }
    }
}

impl GeneratorOptions {
    /// Worker count after resolving `0` to the available parallelism.
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

/// Templates resolved from a template tree.
#[derive(Debug)]
pub struct Discovery<'r> {
    /// `(unit, template)` pairs in discovery order.
    pub templates: Vec<(String, &'r RegisteredTemplate)>,

    /// Units that could not be resolved.
    pub warnings: Vec<DiscoveryWarning>,
}

/// Result of writing one generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub profile: String,
    pub path: PathBuf,
    pub outcome: WriteOutcome,
}

/// Per-profile failure, reported after the join.
#[derive(Debug)]
pub struct ProfileFailure {
    pub profile: String,
    pub error: GenerateError,
}

/// Counts and details of a finished run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Profiles dispatched, including failed ones.
    pub profiles: usize,
    pub files: Vec<FileReport>,
    pub failures: Vec<ProfileFailure>,
    pub warnings: Vec<DiscoveryWarning>,
}

impl RunSummary {
    fn count(&self, outcome: WriteOutcome) -> usize {
        self.files.iter().filter(|f| f.outcome == outcome).count()
    }

    pub fn created(&self) -> usize {
        self.count(WriteOutcome::Created)
    }

    pub fn updated(&self) -> usize {
        self.count(WriteOutcome::Updated)
    }

    pub fn unchanged(&self) -> usize {
        self.count(WriteOutcome::Unchanged)
    }

    pub fn touched(&self) -> usize {
        self.count(WriteOutcome::Touched)
    }

    /// Files whose content was (or in a dry run would be) written.
    pub fn written(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.wrote_content()).count()
    }
}

/// One unit of work: a built profile and where its targets go.
struct ProfileJob {
    name: String,
    profile: Profile,
    paths: Vec<PathBuf>,
}

/// Generates source files from registered templates.
#[derive(Debug)]
pub struct Generator {
    registry: TemplateRegistry,
    renderer: Renderer,
    options: GeneratorOptions,
}

impl Generator {
    /// Create a generator with default options and renderer.
    pub fn new(registry: TemplateRegistry) -> Self {
        Self {
            registry,
            renderer: Renderer::default(),
            options: GeneratorOptions::default(),
        }
    }

    /// Set the run options.
    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the renderer.
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Get the run options.
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Get the template registry.
    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Scan `template_root` and resolve every unit in the registry.
    pub fn discover(&self, template_root: &Path) -> Result<Discovery<'_>, DiscoveryError> {
        let mut scanner = TemplateScanner::new(template_root)
            .with_extension(self.options.template_extension.as_str());
        if let Some(include) = &self.options.include {
            scanner = scanner.with_include(include)?;
        }
        for exclude in &self.options.exclude {
            scanner = scanner.with_exclude(exclude)?;
        }

        let mut discovery = Discovery {
            templates: Vec::new(),
            warnings: Vec::new(),
        };
        for unit in scanner.scan()? {
            match self.registry.get(&unit.name) {
                Some(templates) => {
                    let mut templates: Vec<_> = templates.iter().collect();
                    templates.sort_by(|a, b| a.name.cmp(&b.name));
                    tracing::debug!(unit = %unit.name, count = templates.len(), "resolved template unit");
                    discovery
                        .templates
                        .extend(templates.into_iter().map(|t| (unit.name.clone(), t)));
                }
                None => {
                    let warning = DiscoveryWarning::UnresolvedUnit {
                        unit: unit.name,
                        path: unit.path,
                    };
                    tracing::warn!("{warning}");
                    discovery.warnings.push(warning);
                }
            }
        }

        Ok(discovery)
    }

    /// Run the generator: discover templates below `template_root` and
    /// write their output below `target_root`.
    pub fn run(&self, template_root: &Path, target_root: &Path) -> GenerateResult<RunSummary> {
        let discovery = self.discover(template_root)?;
        let mut summary = RunSummary {
            warnings: discovery.warnings,
            ..RunSummary::default()
        };

        let mut jobs = Vec::with_capacity(discovery.templates.len());
        for (unit, template) in &discovery.templates {
            let name = format!("{unit}::{}", template.name);
            match panic::catch_unwind(AssertUnwindSafe(|| template.build())) {
                Ok(profile) => jobs.push(ProfileJob {
                    name,
                    profile,
                    paths: Vec::new(),
                }),
                Err(payload) => {
                    let error = RenderError::Panicked {
                        profile: name.clone(),
                        message: panic_message(payload.as_ref()),
                    };
                    tracing::error!(profile = %name, error = %error, "failed to build profile");
                    summary.failures.push(ProfileFailure {
                        profile: name,
                        error: error.into(),
                    });
                }
            }
        }

        self.plan_outputs(&mut jobs, target_root)?;
        summary.profiles = jobs.len() + summary.failures.len();

        let workers = self.options.effective_workers();
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("templar-worker-{i}"))
            .build()
            .map_err(|e| GenerateError::Pool(e.to_string()))?;

        let writer = IncrementalWriter::new()
            .with_dry_run(self.options.dry_run)
            .with_min_timestamp(self.options.min_timestamp);

        tracing::info!(
            profiles = jobs.len(),
            workers,
            dry_run = self.options.dry_run,
            "dispatching profiles"
        );

        let results: Vec<(String, Result<Vec<FileReport>, GenerateError>)> = pool.install(|| {
            jobs.par_iter()
                .map(|job| (job.name.clone(), self.process(job, &writer)))
                .collect()
        });

        for (name, result) in results {
            match result {
                Ok(files) => summary.files.extend(files),
                Err(error) => {
                    tracing::error!(profile = %name, error = %error, detail = ?error, "profile failed");
                    summary.failures.push(ProfileFailure {
                        profile: name,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            created = summary.created(),
            updated = summary.updated(),
            unchanged = summary.unchanged(),
            touched = summary.touched(),
            failed = summary.failures.len(),
            "generation finished"
        );

        if !summary.failures.is_empty() {
            return Err(GenerateError::Failed {
                failed: summary.failures.len(),
                total: summary.profiles,
            });
        }

        Ok(summary)
    }

    /// Compute the output path of every target and reject collisions.
    fn plan_outputs(&self, jobs: &mut [ProfileJob], target_root: &Path) -> GenerateResult<()> {
        let mut owners: HashMap<PathBuf, String> = HashMap::new();

        for job in jobs.iter_mut() {
            for target in &job.profile.targets {
                let path = target.output_path(target_root, &self.options.generated_dir);
                if let Some(first) = owners.get(&path) {
                    return Err(GenerateError::PathCollision {
                        path,
                        first: first.clone(),
                        second: job.name.clone(),
                    });
                }
                owners.insert(path.clone(), job.name.clone());
                job.paths.push(path);
            }
        }

        Ok(())
    }

    /// Render and write one profile. Runs on a pool thread.
    fn process(
        &self,
        job: &ProfileJob,
        writer: &IncrementalWriter,
    ) -> Result<Vec<FileReport>, GenerateError> {
        let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
            job.profile
                .targets
                .iter()
                .map(|target| self.renderer.render(target))
                .collect::<Result<Vec<_>, RenderError>>()
        }))
        .map_err(|payload| RenderError::Panicked {
            profile: job.name.clone(),
            message: panic_message(payload.as_ref()),
        })??;

        let mut reports = Vec::with_capacity(rendered.len());
        for ((target, path), text) in job.profile.targets.iter().zip(&job.paths).zip(rendered) {
            let outcome = writer.write(path, &text)?;
            match outcome {
                WriteOutcome::Created | WriteOutcome::Updated => tracing::info!(
                    profile = %job.profile.name,
                    kind = %target.kind,
                    "{}: {}",
                    outcome.label(),
                    path.display()
                ),
                WriteOutcome::Unchanged | WriteOutcome::Touched => tracing::debug!(
                    profile = %job.profile.name,
                    "{}: {}",
                    outcome.label(),
                    path.display()
                ),
            }
            reports.push(FileReport {
                profile: job.name.clone(),
                path: path.clone(),
                outcome,
            });
        }

        Ok(reports)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
