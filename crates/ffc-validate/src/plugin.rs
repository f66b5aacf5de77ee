//! External checks: executables found in plugin directories.
//!
//! A plugin receives the parsed file as JSON on stdin and the source path
//! as its first argument, and answers with `{"steps": [...]}` on stdout.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use ffc_model::{ErrorType, FlatFile, TestCaseResult, TestCaseStepResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::check::{Check, CheckSource};
use crate::error::{CheckError, PluginError};

#[derive(Debug, Serialize)]
struct PluginInput<'a> {
    source_path: String,
    file_name: String,
    structure: &'a str,
    conf_type: &'static str,
    rows: Vec<PluginRow<'a>>,
}

#[derive(Debug, Serialize)]
struct PluginRow<'a> {
    line_number: usize,
    marker: &'a str,
    fields: &'a [String],
}

#[derive(Debug, Deserialize)]
struct PluginOutput {
    #[serde(default)]
    steps: Vec<PluginStep>,
}

#[derive(Debug, Deserialize)]
struct PluginStep {
    #[serde(default)]
    line_number: Option<usize>,
    passed: bool,
    error_type: String,
    #[serde(default)]
    message: String,
}

/// A check implemented by an external program.
#[derive(Debug, Clone)]
pub struct PluginCheck {
    name: String,
    path: PathBuf,
}

impl PluginCheck {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn input(&self, file: &FlatFile<'_>) -> Result<Vec<u8>, PluginError> {
        let structure = file.structure();
        let input = PluginInput {
            source_path: file.source_path().display().to_string(),
            file_name: file.file_name(),
            structure: &structure.name,
            conf_type: structure.conf_type().as_str(),
            rows: file
                .rows()
                .iter()
                .map(|row| PluginRow {
                    line_number: row.line_number,
                    marker: &row.marker,
                    fields: &row.fields,
                })
                .collect(),
        };
        serde_json::to_vec(&input).map_err(|source| PluginError::Input {
            path: self.path.clone(),
            source,
        })
    }

    fn execute(&self, file: &FlatFile<'_>) -> Result<Vec<u8>, PluginError> {
        let input = self.input(file)?;
        let mut child = Command::new(&self.path)
            .arg(file.source_path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| PluginError::Spawn {
                path: self.path.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let output = std::thread::scope(|scope| {
            // Feed stdin while the output is drained so large files cannot deadlock.
            scope.spawn(move || {
                if let Some(mut stdin) = stdin {
                    if let Err(e) = stdin.write_all(&input) {
                        if e.kind() != std::io::ErrorKind::BrokenPipe {
                            warn!(error = %e, "failed to write plugin input");
                        }
                    }
                }
            });
            child.wait_with_output()
        })
        .map_err(|source| PluginError::Spawn {
            path: self.path.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(PluginError::Exit {
                path: self.path.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

impl Check for PluginCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> CheckSource {
        CheckSource::Plugin(self.path.clone())
    }

    fn run(&self, file: &FlatFile<'_>) -> Result<TestCaseResult, CheckError> {
        debug!(check = %self.name, plugin = %self.path.display(), "running plugin");
        let stdout = self.execute(file)?;
        let output: PluginOutput =
            serde_json::from_slice(&stdout).map_err(|source| PluginError::Output {
                path: self.path.clone(),
                source,
            })?;

        let file_name = file.file_name();
        let mut result = TestCaseResult::new(&self.name);
        for step in output.steps {
            result.push(TestCaseStepResult {
                line_number: step.line_number,
                passed: step.passed,
                error_type: ErrorType::parse(&step.error_type),
                message: step.message,
                file_name: file_name.clone(),
            });
        }
        Ok(result)
    }
}

/// Find plugin checks in `dirs`, in directory order then file name order.
///
/// Every executable regular file is a check named after its file stem.
pub fn discover_plugins(dirs: &[PathBuf]) -> Result<Vec<PluginCheck>, PluginError> {
    let mut plugins = Vec::new();
    for dir in dirs {
        let entries = std::fs::read_dir(dir).map_err(|source| PluginError::DirectoryRead {
            path: dir.clone(),
            source,
        })?;
        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PluginError::DirectoryRead {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !is_executable_file(&path) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            found.push(PluginCheck::new(stem, path.clone()));
        }
        found.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        debug!(dir = %dir.display(), plugins = found.len(), "scanned plugin directory");
        plugins.extend(found);
    }
    Ok(plugins)
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
