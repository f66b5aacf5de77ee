//! JSON report: run totals followed by every suite.

use std::io::Write;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::Result;
use crate::report::Report;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    files: usize,
    passed: usize,
    failed: usize,
    #[serde(flatten)]
    report: &'a Report,
}

/// Write `report` as pretty-printed JSON.
pub fn write_json<W: Write>(mut sink: W, report: &Report, generated_at: DateTime<Local>) -> Result<W> {
    let document = JsonReport {
        generated_at: generated_at.to_rfc3339(),
        files: report.suites.len(),
        passed: report.count_passed(),
        failed: report.count_failed(),
        report,
    };
    serde_json::to_writer_pretty(&mut sink, &document)?;
    sink.write_all(b"\n")?;
    sink.flush()?;
    Ok(sink)
}
