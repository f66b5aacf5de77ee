//! Error types for check execution.

use std::path::PathBuf;

use ffc_model::{ConfType, ErrorType, TestCaseStepResult};
use thiserror::Error;

/// Failure of an external check program.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("failed to read plugin directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start plugin {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode input for plugin {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("plugin {path} exited with {status}: {stderr}")]
    Exit {
        path: PathBuf,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("plugin {path} produced unreadable output: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Fault raised while a check body runs.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The check cannot interpret the structure or file it was given.
    #[error("{0}")]
    Unsupported(String),

    #[error(transparent)]
    Plugin(#[from] PluginError),
}

/// A check could not run against a file.
///
/// Gate failures never invoke the check body; [`TestExecError::Execution`]
/// wraps a fault raised by the body itself.
#[derive(Debug, Error)]
pub enum TestExecError {
    #[error("Could not find the test {test_name} in built-in checks or plugin directories")]
    NotFound { test_name: String, file_name: String },

    #[error("Test '{test_name}' is not allowed for file structure '{structure}'")]
    StructureNotAllowed {
        test_name: String,
        file_name: String,
        structure: String,
    },

    #[error("Test '{test_name}' is not allowed for file type '{conf_type}'")]
    FileTypeNotAllowed {
        test_name: String,
        file_name: String,
        conf_type: ConfType,
    },

    #[error("Test '{test_name}' requires missing fields : {}.", .missing.join(","))]
    MissingStructureFields {
        test_name: String,
        file_name: String,
        missing: Vec<String>,
    },

    #[error(
        "Test '{test_name}' requires missing field(s) {} on row structure type '{row_type}' for structure '{structure}'",
        quoted(.missing)
    )]
    MissingRowFields {
        test_name: String,
        file_name: String,
        structure: String,
        row_type: String,
        missing: Vec<String>,
    },

    #[error("{source}. Error during execution of test {test_name}")]
    Execution {
        test_name: String,
        file_name: String,
        #[source]
        source: CheckError,
    },
}

impl TestExecError {
    pub fn test_name(&self) -> &str {
        match self {
            Self::NotFound { test_name, .. }
            | Self::StructureNotAllowed { test_name, .. }
            | Self::FileTypeNotAllowed { test_name, .. }
            | Self::MissingStructureFields { test_name, .. }
            | Self::MissingRowFields { test_name, .. }
            | Self::Execution { test_name, .. } => test_name,
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            Self::NotFound { file_name, .. }
            | Self::StructureNotAllowed { file_name, .. }
            | Self::FileTypeNotAllowed { file_name, .. }
            | Self::MissingStructureFields { file_name, .. }
            | Self::MissingRowFields { file_name, .. }
            | Self::Execution { file_name, .. } => file_name,
        }
    }

    /// Whether the applicability gate rejected the check.
    pub fn is_gate_failure(&self) -> bool {
        matches!(
            self,
            Self::StructureNotAllowed { .. }
                | Self::FileTypeNotAllowed { .. }
                | Self::MissingStructureFields { .. }
                | Self::MissingRowFields { .. }
        )
    }

    /// The file-level finding reported in place of the check's results.
    pub fn to_step(&self) -> TestCaseStepResult {
        TestCaseStepResult::failure(
            None,
            ErrorType::TestExecError(self.test_name().to_string()),
            self.to_string(),
            self.file_name(),
        )
    }
}

fn quoted(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| format!("'{field}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_error_wraps_message_and_test_name() {
        let err = TestExecError::Execution {
            test_name: "check_dates".to_string(),
            file_name: "ORD_1.csv".to_string(),
            source: CheckError::Unsupported("invalid date format '%Q'".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "invalid date format '%Q'. Error during execution of test check_dates"
        );
        let step = err.to_step();
        assert_eq!(step.line_number, None);
        assert_eq!(step.error_type.tag(), "TEST_EXEC_ERROR_check_dates");
        assert_eq!(step.file_name, "ORD_1.csv");
    }

    #[test]
    fn row_field_message_quotes_each_field() {
        let err = TestExecError::MissingRowFields {
            test_name: "check_fixed_values".to_string(),
            file_name: "STK_1.txt".to_string(),
            structure: "stock".to_string(),
            row_type: "S".to_string(),
            missing: vec!["fixed_values".to_string(), "optional_fields".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Test 'check_fixed_values' requires missing field(s) 'fixed_values', 'optional_fields' \
             on row structure type 'S' for structure 'stock'"
        );
        assert!(err.is_gate_failure());
    }
}
