//! Run configuration, read from TOML and overridden by command line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ffc_standards::DEFAULT_STRUCTURE_PATTERN;
use serde::Deserialize;

/// Where a run finds its structures, test configurations and plugins.
///
/// Relative paths in a configuration file are resolved against the
/// directory holding that file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub structures_dir: PathBuf,
    pub structure_pattern: String,
    /// Test case configurations; every check is allowed everywhere when unset.
    pub test_configs: Option<PathBuf>,
    pub plugin_dirs: Vec<PathBuf>,
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            structures_dir: PathBuf::from("structures"),
            structure_pattern: DEFAULT_STRUCTURE_PATTERN.to_string(),
            test_configs: None,
            plugin_dirs: Vec::new(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read run configuration {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("parse run configuration {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve relative paths against `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        let resolve = |path: &Path| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                base.join(path)
            }
        };
        self.structures_dir = resolve(&self.structures_dir);
        self.test_configs = self.test_configs.as_deref().map(resolve);
        self.plugin_dirs = self.plugin_dirs.iter().map(|dir| resolve(dir)).collect();
        self.output_dir = resolve(&self.output_dir);
        self
    }
}
