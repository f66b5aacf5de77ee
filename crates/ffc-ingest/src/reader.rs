//! Reading an input file into a [`FlatFile`].

use std::path::Path;

use ffc_model::{FlatFile, FlatFileStructure};
use tracing::debug;

use crate::decode::decode;
use crate::error::{IngestError, Result};
use crate::parse::parse;

/// Read, decode and parse one file against a structure.
pub fn read_flat_file<'s>(path: &Path, structure: &'s FlatFileStructure) -> Result<FlatFile<'s>> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let content = decode(&bytes, &structure.encoding, path)?;
    let rows = parse(&content, structure).map_err(|source| IngestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        path = %path.display(),
        structure = %structure.name,
        rows = rows.len(),
        "parsed flat file"
    );

    Ok(FlatFile::new(path, structure, content, rows))
}
