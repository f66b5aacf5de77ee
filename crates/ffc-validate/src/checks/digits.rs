//! Digit fields hold only ASCII digits.

use ffc_model::{ErrorType, FlatFile, TestCaseResult};

use super::{present, scan_rows};
use crate::error::CheckError;

pub fn check(file: &FlatFile<'_>) -> Result<TestCaseResult, CheckError> {
    Ok(scan_rows(file, "check_digit_fields", |row, row_structure, findings| {
        for &position in &row_structure.digit_fields {
            let Some(content) = present(row, position) else {
                continue;
            };
            if !content.chars().all(|c| c.is_ascii_digit()) {
                findings.fail(
                    row.line_number,
                    ErrorType::FieldFormatError,
                    format!("Field should be numeric at field {position} : '{content}'"),
                );
            }
        }
    }))
}
