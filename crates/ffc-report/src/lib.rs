#![deny(unsafe_code)]

//! Check result reports.
//!
//! - **CSV**: `;`-delimited, one record per finding, header
//!   `FILENAME;LINE_NUMBER;STATUS;ERROR_TYPE;MESSAGE`
//! - **JSON**: run totals and every suite, for tooling

mod error;
mod json;
mod output;
mod report;
mod writer;

pub use error::{ReportError, Result};
pub use json::write_json;
pub use output::{ReportFile, ReportFormat, report_file_name, write_report_file};
pub use report::Report;
pub use writer::{HEADER, ReportWriter};
