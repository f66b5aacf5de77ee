//! Report files on disk.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::error::{ReportError, Result};
use crate::json::write_json;
use crate::report::Report;
use crate::writer::ReportWriter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Default report name, `test_<YYYYmmddHHMMSS>.<ext>`.
pub fn report_file_name(at: DateTime<Local>, format: ReportFormat) -> String {
    format!("test_{}.{}", at.format("%Y%m%d%H%M%S"), format.extension())
}

/// A report file opened before the run, so that an unusable output
/// directory fails before any input is checked.
#[derive(Debug)]
pub struct ReportFile {
    path: PathBuf,
    format: ReportFormat,
    at: DateTime<Local>,
    sink: BufWriter<File>,
}

impl ReportFile {
    /// Create the timestamped report file in `output_dir`.
    pub fn create(output_dir: &Path, format: ReportFormat, at: DateTime<Local>) -> Result<Self> {
        let path = output_dir.join(report_file_name(at, format));
        let file = File::create(&path).map_err(|source| ReportError::Create {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "report file created");
        Ok(Self {
            path,
            format,
            at,
            sink: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `report` and close the file.
    pub fn write(self, report: &Report) -> Result<PathBuf> {
        let mut sink = match self.format {
            ReportFormat::Csv => {
                let mut writer = ReportWriter::new(self.sink)?;
                writer.write_report(report)?;
                writer.finish()?
            }
            ReportFormat::Json => write_json(self.sink, report, self.at)?,
        };
        sink.flush()?;

        info!(
            path = %self.path.display(),
            findings = report.count_failed(),
            "report written"
        );
        Ok(self.path)
    }
}

/// Write `report` into `output_dir` under its timestamped name.
pub fn write_report_file(
    output_dir: &Path,
    format: ReportFormat,
    report: &Report,
    at: DateTime<Local>,
) -> Result<PathBuf> {
    ReportFile::create(output_dir, format, at)?.write(report)
}
