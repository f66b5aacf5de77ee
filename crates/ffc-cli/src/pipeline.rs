//! One checking run: load structures, then read and check every input file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use ffc_ingest::{expand_inputs, read_flat_file};
use ffc_model::FlatFileStructure;
use ffc_report::Report;
use ffc_standards::{
    StructureRegistry, TestCaseConfigs, load_structures_from_dir, load_structures_from_dir_partial,
    load_test_configs,
};
use ffc_validate::{CheckRegistry, TestCaseEngine};
use tracing::{debug, info, info_span, warn};

use crate::config::RunConfig;

/// Structures of a run, with the definitions that failed to load.
#[derive(Debug)]
pub struct LoadedStructures {
    pub registry: StructureRegistry,
    /// `(definition file name, error message)` for each skipped definition.
    pub failures: Vec<(String, String)>,
}

/// Load every structure definition of the run.
///
/// With `keep_going`, broken definitions are collected instead of aborting.
pub fn load_structures(config: &RunConfig, keep_going: bool) -> Result<LoadedStructures> {
    let dir = &config.structures_dir;
    let pattern = &config.structure_pattern;
    if keep_going {
        let outcome = load_structures_from_dir_partial(dir, pattern)
            .with_context(|| format!("scan structures in {}", dir.display()))?;
        let failures = outcome
            .failures
            .into_iter()
            .map(|failure| (base_name(&failure.path), failure.error.to_string()))
            .collect();
        Ok(LoadedStructures {
            registry: outcome.registry,
            failures,
        })
    } else {
        let registry = load_structures_from_dir(dir, pattern)
            .with_context(|| format!("load structures from {}", dir.display()))?;
        Ok(LoadedStructures {
            registry,
            failures: Vec::new(),
        })
    }
}

/// Build the engine: built-in checks, configured plugins and test configurations.
pub fn build_engine(config: &RunConfig) -> Result<TestCaseEngine> {
    let registry = CheckRegistry::with_plugins(&config.plugin_dirs).context("discover plugins")?;
    let configs = match &config.test_configs {
        Some(path) => load_test_configs(path)
            .with_context(|| format!("load test configurations {}", path.display()))?,
        None => {
            debug!("no test configurations given, every check applies everywhere");
            TestCaseConfigs::permissive()
        }
    };
    info!(
        checks = registry.len(),
        test_configs = configs.count(),
        "test case engine ready"
    );
    Ok(TestCaseEngine::new(registry, configs))
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Check every file against this structure instead of matching file names.
    pub file_structure: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Checked {
        structure: String,
        checks: usize,
        failed: usize,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

/// Everything a run produced.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub report: Report,
    pub files: Vec<FileOutcome>,
}

impl RunOutcome {
    pub fn has_findings(&self) -> bool {
        self.report.has_findings()
    }
}

/// Check every input file, in argument order, directories expanded by name.
pub fn run(
    inputs: &[PathBuf],
    structures: &LoadedStructures,
    engine: &TestCaseEngine,
    options: &RunOptions,
) -> Result<RunOutcome> {
    let forced = match &options.file_structure {
        Some(name) => match structures.registry.get(name) {
            Some(structure) => Some(structure),
            None => bail!("unknown file structure '{name}'"),
        },
        None => None,
    };

    let mut outcome = RunOutcome::default();
    for (file_name, message) in &structures.failures {
        outcome.report.push_structure_error(file_name, message.as_str());
    }

    let files = expand_inputs(inputs).context("list input files")?;
    info!(files = files.len(), "checking files");
    for path in files {
        let span = info_span!("file", path = %path.display());
        let _guard = span.enter();
        let status = check_file(&path, forced, &structures.registry, engine, &mut outcome.report);
        outcome.files.push(FileOutcome { path, status });
    }
    info!(
        files = outcome.files.len(),
        findings = outcome.report.count_failed(),
        "run finished"
    );
    Ok(outcome)
}

fn check_file(
    path: &Path,
    forced: Option<&FlatFileStructure>,
    registry: &StructureRegistry,
    engine: &TestCaseEngine,
    report: &mut Report,
) -> FileStatus {
    let structure = match forced {
        Some(structure) => structure,
        None => match registry.resolve_by_filename(path) {
            Ok(Some(structure)) => structure,
            Ok(None) => {
                warn!("no structure matches this file name, skipping");
                return skipped("no matching structure");
            }
            Err(error) => {
                warn!(%error, "skipping file");
                return skipped(error.to_string());
            }
        },
    };

    let file = match read_flat_file(path, structure) {
        Ok(file) => file,
        Err(error) => {
            warn!(%error, "skipping unreadable file");
            return skipped(error.to_string());
        }
    };
    debug!(structure = %structure.name, rows = file.rows().len(), "file parsed");

    let suite = engine.run_defined(&file);
    let status = FileStatus::Checked {
        structure: structure.name.clone(),
        checks: suite.results.len(),
        failed: suite.count_failed(),
    };
    report.push_suite(suite);
    status
}

fn skipped(reason: impl Into<String>) -> FileStatus {
    FileStatus::Skipped {
        reason: reason.into(),
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
