//! Date fields must parse with the structure's date format.

use chrono::format::{Item, Parsed, StrftimeItems, parse};
use ffc_model::{ErrorType, FlatFile, TestCaseResult};

use super::{present, scan_rows};
use crate::error::CheckError;

pub fn check(file: &FlatFile<'_>) -> Result<TestCaseResult, CheckError> {
    let date_format = file.structure().date_format.as_str();
    if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
        return Err(CheckError::Unsupported(format!(
            "invalid date format '{date_format}'"
        )));
    }

    Ok(scan_rows(file, "check_dates", |row, row_structure, findings| {
        for &position in &row_structure.date_fields {
            let Some(content) = present(row, position) else {
                continue;
            };
            if !matches_date_format(content, date_format) {
                findings.fail(
                    row.line_number,
                    ErrorType::DateFormat,
                    format!(
                        "DATE format is incorrect at position {position} should be '{date_format}'"
                    ),
                );
            }
        }
    }))
}

/// Whether `content` parses completely with `format` into a real calendar date.
///
/// Date components the format does not name default to year 1900, month 1
/// and day 1, so `%Y%m` accepts `202401` while `%Y%m%d` still rejects
/// `20240230`.
pub fn matches_date_format(content: &str, format: &str) -> bool {
    let mut parsed = Parsed::new();
    if parse(&mut parsed, content, StrftimeItems::new(format)).is_err() {
        return false;
    }
    fill_missing_date_fields(&mut parsed).is_ok() && parsed.to_naive_date().is_ok()
}

fn fill_missing_date_fields(parsed: &mut Parsed) -> chrono::format::ParseResult<()> {
    let has_year = parsed.year().is_some()
        || parsed.year_div_100().is_some()
        || parsed.year_mod_100().is_some()
        || parsed.isoyear().is_some();
    if !has_year {
        parsed.set_year(1900)?;
    }
    let week_based = parsed.ordinal().is_some()
        || parsed.isoweek().is_some()
        || parsed.week_from_sun().is_some()
        || parsed.week_from_mon().is_some();
    if week_based {
        return Ok(());
    }
    if parsed.month().is_none() {
        parsed.set_month(1)?;
    }
    if parsed.day().is_none() {
        parsed.set_day(1)?;
    }
    Ok(())
}
