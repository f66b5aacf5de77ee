//! Fixed field lengths, and full-width lines in fixed-width files.

use ffc_model::{ErrorType, FlatFile, TestCaseResult};

use super::{present, scan_rows};
use crate::error::CheckError;

pub fn check(file: &FlatFile<'_>) -> Result<TestCaseResult, CheckError> {
    Ok(scan_rows(file, "check_field_lengths", |row, row_structure, findings| {
        if let (Some(width), Some(total)) = (row.width, row_structure.total_width())
            && width < total
        {
            findings.fail(
                row.line_number,
                ErrorType::RowStructError,
                format!("Line is {width} characters long instead of {total}"),
            );
            return;
        }

        for fixed in row_structure.fixed_lengths.iter().flatten() {
            let Some(content) = present(row, fixed.field) else {
                continue;
            };
            if content.chars().count() != fixed.length {
                findings.fail(
                    row.line_number,
                    ErrorType::FieldLengthError,
                    format!(
                        "Wrong field length at position {}. Should be {}",
                        fixed.field, fixed.length
                    ),
                );
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use ffc_model::FixedLength;

    use super::*;
    use crate::checks::fixtures;

    #[test]
    fn flags_wrong_fixed_length() {
        let mut row = fixtures::row_structure("H", 3);
        row.fixed_lengths = Some(vec![FixedLength { field: 2, length: 4 }]);
        let structure = fixtures::delimited(vec![row]);
        let file = fixtures::file("ORD_1.csv", &structure, "H;ABCD;x\nH;ABC;x\nH;;x\n");
        let result = check(&file).unwrap();
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].line_number, Some(2));
        assert_eq!(result.steps[0].error_type, ErrorType::FieldLengthError);
    }

    #[test]
    fn short_fixed_width_line_is_a_row_struct_error() {
        let mut row = fixtures::row_structure("S", 3);
        row.field_widths = Some(vec![1, 4, 3]);
        let structure = fixtures::fixed_width(vec![row]);
        let file = fixtures::file("STK_1.txt", &structure, "S1234ABC\r\nS12\r\n");
        let result = check(&file).unwrap();
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].line_number, Some(2));
        assert_eq!(result.steps[0].error_type, ErrorType::RowStructError);
        assert_eq!(
            result.steps[0].message,
            "Line is 3 characters long instead of 8"
        );
    }
}
