//! Fields with a fixed value must hold exactly that value.

use ffc_model::{ErrorType, FlatFile, TestCaseResult};

use super::{present, scan_rows};
use crate::error::CheckError;

pub fn check(file: &FlatFile<'_>) -> Result<TestCaseResult, CheckError> {
    Ok(scan_rows(file, "check_fixed_values", |row, row_structure, findings| {
        for fixed in row_structure.fixed_values.iter().flatten() {
            let Some(content) = present(row, fixed.field) else {
                continue;
            };
            if content != fixed.value {
                findings.fail(
                    row.line_number,
                    ErrorType::FieldValueError,
                    format!(
                        "Field {} should be '{}' instead of '{}'",
                        fixed.field, fixed.value, content
                    ),
                );
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use ffc_model::FixedValue;

    use super::*;
    use crate::checks::fixtures;

    #[test]
    fn flags_unexpected_values() {
        let mut row = fixtures::row_structure("H", 3);
        row.fixed_values = Some(vec![FixedValue {
            field: 3,
            value: "EUR".to_string(),
        }]);
        let structure = fixtures::delimited(vec![row]);
        let file = fixtures::file("ORD_1.csv", &structure, "H;1;EUR\nH;2;USD\nH;3;\n");
        let result = check(&file).unwrap();
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].message, "Field 3 should be 'EUR' instead of 'USD'");
        assert_eq!(result.steps[0].error_type, ErrorType::FieldValueError);
    }
}
