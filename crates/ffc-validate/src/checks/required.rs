//! Every non-optional field must be filled.

use ffc_model::{ErrorType, FlatFile, TestCaseResult};

use super::scan_rows;
use crate::error::CheckError;

pub fn check(file: &FlatFile<'_>) -> Result<TestCaseResult, CheckError> {
    Ok(scan_rows(file, "check_required", |row, row_structure, findings| {
        for position in 1..=row_structure.length {
            if row_structure.is_optional(position) {
                continue;
            }
            if row.field(position).is_none_or(str::is_empty) {
                findings.fail(
                    row.line_number,
                    ErrorType::RequiredField,
                    format!("Missing required field at position {position}"),
                );
            }
        }
    }))
}
