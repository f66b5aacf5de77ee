//! Decimal fields are digits with the structure's decimal separator.

use ffc_model::{ErrorType, FlatFile, TestCaseResult};

use super::{present, scan_rows};
use crate::error::CheckError;

pub fn check(file: &FlatFile<'_>) -> Result<TestCaseResult, CheckError> {
    let separator = file.structure().decimal_separator.as_str();
    Ok(scan_rows(file, "check_decimal", |row, row_structure, findings| {
        for &position in &row_structure.decimal_fields {
            let Some(content) = present(row, position) else {
                continue;
            };
            if !is_decimal(content, separator) {
                findings.fail(
                    row.line_number,
                    ErrorType::FieldFormatError,
                    format!("Field {position} should be numeric with separator '{separator}': '{content}'"),
                );
            }
        }
    }))
}

/// Digits once every separator is removed. Several separators are accepted.
pub fn is_decimal(content: &str, separator: &str) -> bool {
    let digits = if separator.is_empty() {
        content.to_string()
    } else {
        content.replace(separator, "")
    };
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
