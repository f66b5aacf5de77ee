//! Input file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Lists all regular files in a directory, sorted by filename.
///
/// Subdirectories are not descended into.
pub fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Expand command line inputs: directories are replaced by their files,
/// files are kept in the given order.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(list_input_files(input)?);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(IngestError::FileNotFound {
                path: input.clone(),
            });
        }
    }
    Ok(files)
}
