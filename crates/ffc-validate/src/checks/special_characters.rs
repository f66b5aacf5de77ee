//! Forbidden characters anywhere in the raw lines of a row.

use ffc_model::{ErrorType, FlatFile, TestCaseResult};

use super::Findings;
use crate::error::CheckError;

pub fn check(file: &FlatFile<'_>) -> Result<TestCaseResult, CheckError> {
    let lines = file.raw_lines();
    let rows = file.rows();
    let mut findings = Findings::new(file, "check_special_characters");

    for (idx, row) in rows.iter().enumerate() {
        let row_structure = match file.row_structure(row) {
            Ok(row_structure) => row_structure,
            Err(fault) => {
                findings.fail(row.line_number, ErrorType::RowStructError, fault.to_string());
                continue;
            }
        };
        let Some(forbidden) = row_structure.special_characters.as_deref() else {
            continue;
        };

        // A delimited record may span several lines when a field is quoted.
        let next_start = rows
            .get(idx + 1)
            .map_or(usize::MAX, |next| next.line_number);
        let spanned = lines
            .iter()
            .filter(|line| line.number >= row.line_number && line.number < next_start);

        for line in spanned {
            for special in forbidden.iter().filter(|s| !s.is_empty()) {
                if let Some(byte_idx) = line.content.find(special.as_str()) {
                    let position = line.content[..byte_idx].chars().count() + 1;
                    findings.fail(
                        line.number,
                        ErrorType::SpecialCharacterError,
                        format!(
                            "Forbidden character '{special}' at position '{position}' of row {}.",
                            line.number
                        ),
                    );
                }
            }
        }
    }
    Ok(findings.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::fixtures;

    #[test]
    fn reports_first_position_of_each_forbidden_character() {
        let mut row = fixtures::row_structure("H", 2);
        row.special_characters = Some(vec!["|".to_string(), "é".to_string()]);
        let structure = fixtures::delimited(vec![row]);
        let file = fixtures::file("ORD_1.csv", &structure, "H;ok\nH;a|b|é\n");

        let result = check(&file).unwrap();
        let messages: Vec<_> = result.steps.iter().map(|s| s.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Forbidden character '|' at position '4' of row 2.",
                "Forbidden character 'é' at position '7' of row 2.",
            ]
        );
    }

    #[test]
    fn rows_without_forbidden_characters_are_skipped() {
        let structure = fixtures::delimited(vec![fixtures::row_structure("H", 2)]);
        let file = fixtures::file("ORD_1.csv", &structure, "H;a|b\n");
        assert!(check(&file).unwrap().is_empty());
    }
}
