use thiserror::Error;

use crate::resolution::RowStructureFault;

#[derive(Debug, Error)]
pub enum ModelError {
    /// A row could not be assigned to a group because its type is unresolved.
    #[error("cannot group line {line_number} of {file_name}: {fault}")]
    UnresolvedRow {
        file_name: String,
        line_number: usize,
        fault: RowStructureFault,
    },

    /// The key position of a row structure points past the end of the row.
    #[error("line {line_number} of {file_name} has no key field at position {position}")]
    MissingKey {
        file_name: String,
        line_number: usize,
        position: usize,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
