//! Registry of loaded structures, indexed by name.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use ffc_model::FlatFileStructure;
use globset::Glob;
use tracing::{debug, info, warn};

use crate::definition::load_structure;
use crate::error::RegistryError;

/// Glob used to find structure definitions in a directory.
pub const DEFAULT_STRUCTURE_PATTERN: &str = "struct_*.json";

/// Structures available for a run, keyed by structure name.
#[derive(Debug, Clone, Default)]
pub struct StructureRegistry {
    structures: BTreeMap<String, FlatFileStructure>,
    sources: HashMap<String, PathBuf>,
}

impl StructureRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a structure. Names must be unique.
    pub fn insert(&mut self, structure: FlatFileStructure) -> Result<(), RegistryError> {
        if self.structures.contains_key(&structure.name) {
            return Err(RegistryError::DuplicateStructure {
                path: self.sources.get(&structure.name).cloned().unwrap_or_default(),
                name: structure.name,
            });
        }
        self.structures.insert(structure.name.clone(), structure);
        Ok(())
    }

    /// Insert a structure loaded from a definition file.
    pub fn insert_from(
        &mut self,
        structure: FlatFileStructure,
        source: PathBuf,
    ) -> Result<(), RegistryError> {
        if self.structures.contains_key(&structure.name) {
            return Err(RegistryError::DuplicateStructure {
                name: structure.name,
                path: source,
            });
        }
        self.sources.insert(structure.name.clone(), source);
        self.insert(structure)
    }

    /// Get a structure by name.
    pub fn get(&self, name: &str) -> Option<&FlatFileStructure> {
        self.structures.get(name)
    }

    /// Definition file a structure was loaded from.
    pub fn source(&self, name: &str) -> Option<&Path> {
        self.sources.get(name).map(PathBuf::as_path)
    }

    /// Find the structure whose file pattern matches the basename of `path`.
    ///
    /// Returns `Ok(None)` when no structure applies.
    pub fn resolve_by_filename(
        &self,
        path: &Path,
    ) -> Result<Option<&FlatFileStructure>, RegistryError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let matching: Vec<&FlatFileStructure> = self
            .structures
            .values()
            .filter(|structure| structure.matches_file_name(&file_name))
            .collect();

        match matching.as_slice() {
            [] => Ok(None),
            [structure] => Ok(Some(*structure)),
            many => Err(RegistryError::AmbiguousStructure {
                file_name,
                candidates: many.iter().map(|s| s.name.clone()).collect(),
            }),
        }
    }

    /// Number of structures in the registry.
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Iterate over structures in name order.
    pub fn iter(&self) -> impl Iterator<Item = &FlatFileStructure> {
        self.structures.values()
    }
}

/// A definition file that failed to load during a partial directory load.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: RegistryError,
}

/// Outcome of [`load_structures_from_dir_partial`].
#[derive(Debug, Default)]
pub struct PartialLoad {
    pub registry: StructureRegistry,
    pub failures: Vec<LoadFailure>,
}

/// List definition files in `dir` whose name matches `pattern`, sorted.
pub fn list_structure_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, RegistryError> {
    let matcher = Glob::new(pattern)?.compile_matcher();
    let entries = std::fs::read_dir(dir).map_err(|source| RegistryError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| RegistryError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path
            .file_name()
            .is_some_and(|name| matcher.is_match(Path::new(name)))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load every matching definition in `dir`.
///
/// The first failure aborts the load and carries the offending path.
pub fn load_structures_from_dir(
    dir: &Path,
    pattern: &str,
) -> Result<StructureRegistry, RegistryError> {
    let mut registry = StructureRegistry::new();
    for path in list_structure_files(dir, pattern)? {
        let structure = load_structure(&path)?;
        registry.insert_from(structure, path)?;
    }
    info!(
        dir = %dir.display(),
        structures = registry.len(),
        "loaded structures"
    );
    Ok(registry)
}

/// Load every matching definition in `dir`, collecting failures instead of
/// stopping at the first one.
pub fn load_structures_from_dir_partial(
    dir: &Path,
    pattern: &str,
) -> Result<PartialLoad, RegistryError> {
    let mut outcome = PartialLoad::default();
    for path in list_structure_files(dir, pattern)? {
        let loaded = load_structure(&path)
            .map_err(RegistryError::from)
            .and_then(|structure| outcome.registry.insert_from(structure, path.clone()));
        if let Err(error) = loaded {
            warn!(path = %path.display(), %error, "skipping structure definition");
            outcome.failures.push(LoadFailure { path, error });
        } else {
            debug!(path = %path.display(), "structure definition loaded");
        }
    }
    info!(
        dir = %dir.display(),
        structures = outcome.registry.len(),
        failures = outcome.failures.len(),
        "loaded structures"
    );
    Ok(outcome)
}
