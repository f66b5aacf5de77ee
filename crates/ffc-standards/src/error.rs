#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

/// Failure to build one row structure of a definition.
#[derive(Debug, thiserror::Error)]
pub enum RowStructureLoadError {
    #[error("'type' property is mandatory in row structures of '{structure}'")]
    MissingType { structure: String },

    #[error(
        "missing properties in row structure '{row_type}' of '{structure}': {}",
        .missing.join(", ")
    )]
    MissingProperties {
        structure: String,
        row_type: String,
        missing: Vec<String>,
    },

    #[error("invalid row structure '{row_type}' of '{structure}': {message}")]
    Schema {
        structure: String,
        row_type: String,
        message: String,
    },

    #[error("invalid '{property}' in row structure '{row_type}' of '{structure}': {message}")]
    InvalidProperty {
        structure: String,
        row_type: String,
        property: String,
        message: String,
    },
}

/// Failure to load one structure definition file.
#[derive(Debug, thiserror::Error)]
pub enum StructureLoadError {
    #[error("failed to read structure file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode {path}: {message} line {line} column {column}")]
    Decode {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("structure definition {path} is not a JSON object")]
    NotAnObject { path: PathBuf },

    #[error("'conf_type' property is mandatory in structure {path}")]
    MissingConfType { path: PathBuf },

    #[error("conf_type must be 'pos' or 'csv' in {path}, not '{value}'")]
    UnknownConfType { path: PathBuf, value: String },

    #[error(
        "missing properties in structure '{structure}' ({path}): {}",
        .missing.join(", ")
    )]
    MissingProperties {
        path: PathBuf,
        structure: String,
        missing: Vec<String>,
    },

    #[error("invalid structure definition {path}: {message}")]
    Schema { path: PathBuf, message: String },

    #[error("invalid '{property}' in structure {path}: {message}")]
    InvalidProperty {
        path: PathBuf,
        property: String,
        message: String,
    },

    #[error("row structure error in {path}: {source}")]
    RowStructure {
        path: PathBuf,
        #[source]
        source: RowStructureLoadError,
    },

    #[error("row type '{row_type}' is declared more than once in structure '{structure}' ({path})")]
    DuplicateRowType {
        path: PathBuf,
        structure: String,
        row_type: String,
    },
}

impl StructureLoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(
        path: &Path,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidProperty {
            path: path.to_path_buf(),
            property: property.into(),
            message: message.into(),
        }
    }

    /// Definition file the error originates from.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Decode { path, .. }
            | Self::NotAnObject { path }
            | Self::MissingConfType { path }
            | Self::UnknownConfType { path, .. }
            | Self::MissingProperties { path, .. }
            | Self::Schema { path, .. }
            | Self::InvalidProperty { path, .. }
            | Self::RowStructure { path, .. }
            | Self::DuplicateRowType { path, .. } => path,
        }
    }
}

/// Failure to build or query a structure registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Load(#[from] StructureLoadError),

    #[error("failed to read structures directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid structure file pattern: {0}")]
    InvalidPattern(#[from] globset::Error),

    #[error("structure '{name}' is declared more than once ({path})")]
    DuplicateStructure { name: String, path: PathBuf },

    #[error(
        "more than one structure matches file '{file_name}': {}",
        .candidates.join(", ")
    )]
    AmbiguousStructure {
        file_name: String,
        candidates: Vec<String>,
    },
}

/// Failure to load test case configurations.
#[derive(Debug, thiserror::Error)]
pub enum TestConfigError {
    #[error("failed to read test configurations {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse test configurations {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "missing {} information to build test case configuration '{name}'",
        .missing.join(", ")
    )]
    MissingKeys { name: String, missing: Vec<String> },

    #[error("invalid test case configuration '{name}': {message}")]
    Invalid { name: String, message: String },

    #[error("test case configuration '{name}' is declared more than once")]
    Duplicate { name: String },

    #[error("no 'default' test case configuration in {path}")]
    MissingDefault { path: PathBuf },
}
