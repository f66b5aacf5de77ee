//! Reference checks compiled into the engine.
//!
//! Row-based checks share [`scan_rows`]: a row whose type cannot be resolved,
//! or whose field count differs from its row structure, is reported as
//! `ROW_STRUCT_ERROR` and skipped. Empty fields are absent values and are
//! never checked against format rules.

use ffc_model::{ErrorType, FlatFile, Row, RowStructure, TestCaseResult, TestCaseStepResult};

use crate::check::BuiltinCheck;

pub mod carriage_return;
pub mod dates;
pub mod decimal;
pub mod digits;
pub mod fixed_values;
pub mod lengths;
pub mod quotes;
pub mod required;
pub mod special_characters;

/// Every built-in check, in lookup order.
pub fn builtin_checks() -> Vec<BuiltinCheck> {
    vec![
        BuiltinCheck::new("check_dates", dates::check),
        BuiltinCheck::new("check_required", required::check),
        BuiltinCheck::new("check_field_lengths", lengths::check),
        BuiltinCheck::new("check_digit_fields", digits::check),
        BuiltinCheck::new("check_decimal", decimal::check),
        BuiltinCheck::new("check_carriage_return", carriage_return::check),
        BuiltinCheck::new("check_quotes", quotes::check),
        BuiltinCheck::new("check_fixed_values", fixed_values::check),
        BuiltinCheck::new("check_special_characters", special_characters::check),
    ]
}

/// Findings of one check against one file.
pub(crate) struct Findings {
    file_name: String,
    result: TestCaseResult,
}

impl Findings {
    pub(crate) fn new(file: &FlatFile<'_>, test_name: &str) -> Self {
        Self {
            file_name: file.file_name(),
            result: TestCaseResult::new(test_name),
        }
    }

    pub(crate) fn fail(&mut self, line_number: usize, error_type: ErrorType, message: impl Into<String>) {
        self.result.push(TestCaseStepResult::failure(
            Some(line_number),
            error_type,
            message,
            self.file_name.as_str(),
        ));
    }

    pub(crate) fn wrong_field_count(&mut self, line_number: usize, found: usize, expected: usize) {
        self.fail(
            line_number,
            ErrorType::RowStructError,
            format!("Wrong number of fields for this row. {found} fields instead of {expected}"),
        );
    }

    pub(crate) fn finish(self) -> TestCaseResult {
        self.result
    }
}

/// Visit every structurally sound row of a file.
pub(crate) fn scan_rows<F>(file: &FlatFile<'_>, test_name: &str, mut visit: F) -> TestCaseResult
where
    F: FnMut(&Row, &RowStructure, &mut Findings),
{
    let mut findings = Findings::new(file, test_name);
    for row in file.rows() {
        match file.row_structure(row) {
            Err(fault) => findings.fail(row.line_number, ErrorType::RowStructError, fault.to_string()),
            Ok(row_structure) if row.len() != row_structure.length => {
                findings.wrong_field_count(row.line_number, row.len(), row_structure.length);
            }
            Ok(row_structure) => visit(row, row_structure, &mut findings),
        }
    }
    findings.finish()
}

/// Non-empty content of a 1-based field.
pub(crate) fn present(row: &Row, position: usize) -> Option<&str> {
    row.field(position).filter(|content| !content.is_empty())
}
