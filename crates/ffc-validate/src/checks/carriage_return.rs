//! Every raw line ends with the structure's line terminator.

use ffc_model::{ErrorType, FlatFile, TestCaseResult};

use super::Findings;
use crate::error::CheckError;

pub fn check(file: &FlatFile<'_>) -> Result<TestCaseResult, CheckError> {
    let expected = file.structure().line_terminator.as_str();
    let mut findings = Findings::new(file, "check_carriage_return");
    for line in file.raw_lines() {
        if line.terminator != expected {
            findings.fail(
                line.number,
                ErrorType::CarriageReturnError,
                format!("Wrong carriage return. Should be {expected:?}"),
            );
        }
    }
    Ok(findings.finish())
}
