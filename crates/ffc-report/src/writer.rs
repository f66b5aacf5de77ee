//! `;`-delimited report, one record per finding.

use std::io::Write;

use ffc_model::{TestCaseStepResult, TestSuiteResult};

use crate::error::{ReportError, Result};
use crate::report::Report;

pub const HEADER: [&str; 5] = ["FILENAME", "LINE_NUMBER", "STATUS", "ERROR_TYPE", "MESSAGE"];

/// Streams findings to a CSV sink.
///
/// The header is written on construction, so an empty run still produces a
/// valid report.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(sink);
        writer.write_record(HEADER)?;
        Ok(Self { writer })
    }

    pub fn write_step(&mut self, step: &TestCaseStepResult) -> Result<()> {
        let line_number = step
            .line_number
            .map(|line| line.to_string())
            .unwrap_or_default();
        let status = if step.passed { "True" } else { "False" };
        self.writer.write_record([
            step.file_name.as_str(),
            line_number.as_str(),
            status,
            step.error_type.tag().as_str(),
            step.message.as_str(),
        ])?;
        Ok(())
    }

    pub fn write_suite(&mut self, suite: &TestSuiteResult) -> Result<()> {
        for step in suite.steps() {
            self.write_step(step)?;
        }
        Ok(())
    }

    pub fn write_report(&mut self, report: &Report) -> Result<()> {
        for step in report.steps() {
            self.write_step(step)?;
        }
        Ok(())
    }

    /// Flush and hand back the sink.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| ReportError::Io(err.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use ffc_model::{ErrorType, TestCaseResult};

    use super::*;

    fn render(report: &Report) -> String {
        let mut writer = ReportWriter::new(Vec::new()).unwrap();
        writer.write_report(report).unwrap();
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn empty_run_has_only_the_header() {
        insta::assert_snapshot!(render(&Report::new()), @"FILENAME;LINE_NUMBER;STATUS;ERROR_TYPE;MESSAGE");
    }

    #[test]
    fn writes_one_record_per_finding() {
        let mut suite = TestSuiteResult::new("ORD_1.csv", "orders");
        let mut dates = TestCaseResult::new("check_dates");
        dates.fail(
            2,
            ErrorType::DateFormat,
            "DATE format is incorrect at position 2 should be '%Y%m%d'",
            "ORD_1.csv",
        );
        suite.push(dates);
        suite.push(TestCaseResult::new("check_required"));
        let mut quotes = TestCaseResult::new("check_quotes");
        quotes.push(TestCaseStepResult::failure(
            None,
            ErrorType::TestExecError("check_quotes".to_string()),
            "Test 'check_quotes' is not allowed for file type 'pos'",
            "ORD_1.csv",
        ));
        suite.push(quotes);

        let mut report = Report::new();
        report.push_structure_error("struct_bad.json", "missing field; 'name'");
        report.push_suite(suite);

        insta::assert_snapshot!(render(&report), @r#"
        FILENAME;LINE_NUMBER;STATUS;ERROR_TYPE;MESSAGE
        struct_bad.json;;False;JSON_STRUCTURES_ERROR;"missing field; 'name'"
        ORD_1.csv;2;False;DATE_FORMAT;DATE format is incorrect at position 2 should be '%Y%m%d'
        ORD_1.csv;;False;TEST_EXEC_ERROR_check_quotes;Test 'check_quotes' is not allowed for file type 'pos'
        "#);
    }
}
