//! Quoting discipline of delimited files.
//!
//! Works on the raw lines: alphanumeric fields (neither digit, decimal nor
//! date) must be wrapped in the quote character, other fields must not be.

use ffc_model::{ErrorType, FlatFile, Layout, TestCaseResult, resolve_row_structure};

use super::Findings;
use crate::error::CheckError;

pub fn check(file: &FlatFile<'_>) -> Result<TestCaseResult, CheckError> {
    let structure = file.structure();
    let Layout::Delimited {
        field_separator,
        quote_char,
        type_marker_position,
    } = structure.layout
    else {
        return Err(CheckError::Unsupported(
            "check_quotes only applies to delimited files".to_string(),
        ));
    };

    let mut findings = Findings::new(file, "check_quotes");
    for line in file.raw_lines() {
        let fields: Vec<&str> = line.content.split(field_separator).collect();
        let marker: String = type_marker_position
            .checked_sub(1)
            .and_then(|idx| fields.get(idx))
            .map(|field| field.replace(quote_char, ""))
            .unwrap_or_default();

        let row_structure = match resolve_row_structure(&structure.row_structures, &marker) {
            Ok(row_structure) => row_structure,
            Err(fault) => {
                findings.fail(line.number, ErrorType::RowStructError, fault.to_string());
                continue;
            }
        };
        if fields.len() != row_structure.length {
            findings.wrong_field_count(line.number, fields.len(), row_structure.length);
            continue;
        }

        for (idx, content) in fields.iter().enumerate() {
            let position = idx + 1;
            if content.is_empty() {
                continue;
            }
            let alphanumeric = !row_structure.digit_fields.contains(&position)
                && !row_structure.decimal_fields.contains(&position)
                && !row_structure.date_fields.contains(&position);
            let quoted_start = content.starts_with(quote_char);
            let quoted_end = content.ends_with(quote_char);
            let long_enough = content.chars().count() >= 2;

            if alphanumeric && !(long_enough && quoted_start && quoted_end) {
                findings.fail(
                    line.number,
                    ErrorType::FieldFormatError,
                    format!("Missing quote at field {position}"),
                );
            } else if !alphanumeric && long_enough && (quoted_start || quoted_end) {
                findings.fail(
                    line.number,
                    ErrorType::FieldFormatError,
                    format!("Field {position} should not be quoted"),
                );
            }
        }
    }
    Ok(findings.finish())
}
