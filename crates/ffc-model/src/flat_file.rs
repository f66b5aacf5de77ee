//! Parsed flat file bound to its structure.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ModelError, Result};
use crate::lines::{RawLine, split_lines};
use crate::resolution::{RowStructureFault, resolve_row_structure};
use crate::structure::{FlatFileStructure, RowStructure};

/// One parsed record of a flat file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based line on which the record starts.
    pub line_number: usize,
    /// Row type marker extracted from the record (empty when absent).
    pub marker: String,
    pub fields: Vec<String>,
    /// Character width of the raw line, fixed-width files only.
    pub width: Option<usize>,
}

impl Row {
    /// Field at a 1-based position.
    pub fn field(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|idx| self.fields.get(idx))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Rows sharing the same grouping key, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowGroup<'f> {
    pub key: String,
    pub rows: Vec<&'f Row>,
}

/// Content of one file, parsed against a structure.
///
/// Lives for a single validation pass; the structure is borrowed from the
/// registry and never modified.
#[derive(Debug, Clone)]
pub struct FlatFile<'s> {
    source_path: PathBuf,
    structure: &'s FlatFileStructure,
    raw: String,
    rows: Vec<Row>,
}

impl<'s> FlatFile<'s> {
    pub fn new(
        source_path: impl Into<PathBuf>,
        structure: &'s FlatFileStructure,
        raw: String,
        rows: Vec<Row>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            structure,
            raw,
            rows,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Basename of the source path, as reported in findings.
    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string())
    }

    pub fn structure(&self) -> &'s FlatFileStructure {
        self.structure
    }

    /// Decoded content as read from disk.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn raw_lines(&self) -> Vec<RawLine<'_>> {
        split_lines(&self.raw)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Resolve the row structure of a row from its marker.
    pub fn row_structure(&self, row: &Row) -> std::result::Result<&'s RowStructure, RowStructureFault> {
        resolve_row_structure(&self.structure.row_structures, &row.marker)
    }

    /// Group rows by the key field of their row structure.
    ///
    /// Groups are returned in the order their key first appears.
    pub fn group_by_key(&self) -> Result<Vec<RowGroup<'_>>> {
        let mut groups: Vec<RowGroup<'_>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for row in &self.rows {
            let row_structure =
                self.row_structure(row)
                    .map_err(|fault| ModelError::UnresolvedRow {
                        file_name: self.file_name(),
                        line_number: row.line_number,
                        fault,
                    })?;
            let key = row
                .field(row_structure.key_position)
                .ok_or_else(|| ModelError::MissingKey {
                    file_name: self.file_name(),
                    line_number: row.line_number,
                    position: row_structure.key_position,
                })?;

            match index.get(key) {
                Some(&slot) => groups[slot].rows.push(row),
                None => {
                    index.insert(key.to_string(), groups.len());
                    groups.push(RowGroup {
                        key: key.to_string(),
                        rows: vec![row],
                    });
                }
            }
        }

        Ok(groups)
    }

    /// Distinct grouping keys in order of first appearance.
    pub fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self
            .group_by_key()?
            .into_iter()
            .map(|group| group.key)
            .collect())
    }
}
