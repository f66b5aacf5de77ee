//! Row-type resolution for multi-row-type files.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::structure::RowStructure;

/// Why a row could not be tied to a single row structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowStructureFault {
    /// The structure declares no row structures at all.
    NoRowStructures,
    /// No row type pattern matches the marker.
    NotFound { marker: String },
    /// Several row type patterns match the marker.
    Ambiguous {
        marker: String,
        candidates: Vec<String>,
    },
}

impl fmt::Display for RowStructureFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRowStructures => write!(f, "no row structures defined"),
            Self::NotFound { marker } => {
                write!(f, "could not find row structure matching type '{marker}'")
            }
            Self::Ambiguous { marker, candidates } => write!(
                f,
                "{} row structures match type '{}': {}",
                candidates.len(),
                marker,
                candidates.join(", ")
            ),
        }
    }
}

impl std::error::Error for RowStructureFault {}

/// Resolve the row structure owning a row with the given type marker.
///
/// A structure with a single row structure skips type dispatch: the marker
/// is ignored and that row structure is returned.
pub fn resolve_row_structure<'a>(
    row_structures: &'a [RowStructure],
    marker: &str,
) -> Result<&'a RowStructure, RowStructureFault> {
    match row_structures {
        [] => Err(RowStructureFault::NoRowStructures),
        [only] => Ok(only),
        _ => {
            let matching: Vec<&RowStructure> = row_structures
                .iter()
                .filter(|rs| rs.row_type.is_match(marker))
                .collect();
            match matching.as_slice() {
                [] => Err(RowStructureFault::NotFound {
                    marker: marker.to_string(),
                }),
                [found] => Ok(*found),
                many => Err(RowStructureFault::Ambiguous {
                    marker: marker.to_string(),
                    candidates: many.iter().map(|rs| rs.type_name().to_string()).collect(),
                }),
            }
        }
    }
}
