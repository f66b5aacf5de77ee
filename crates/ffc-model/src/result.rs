//! Check results: findings, per-check results and per-file suites.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const TEST_EXEC_ERROR_PREFIX: &str = "TEST_EXEC_ERROR_";

/// Taxonomy tag of a finding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Row type unresolved or field count mismatch.
    RowStructError,
    DateFormat,
    RequiredField,
    FieldLengthError,
    FieldFormatError,
    FieldValueError,
    CarriageReturnError,
    SpecialCharacterError,
    /// A structure definition failed to load.
    StructuresError,
    /// The named check could not run against the file.
    TestExecError(String),
    /// Tag reported by an external check.
    Other(String),
}

impl ErrorType {
    /// Parse a tag as written in reports.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "ROW_STRUCT_ERROR" => Self::RowStructError,
            "DATE_FORMAT" => Self::DateFormat,
            "REQUIRED_FIELD" => Self::RequiredField,
            "FIELD_LENGTH_ERROR" => Self::FieldLengthError,
            "FIELD_FORMAT_ERROR" => Self::FieldFormatError,
            "FIELD_VALUE_ERROR" => Self::FieldValueError,
            "CARRIAGE_RETURN_ERROR" => Self::CarriageReturnError,
            "SPECIAL_CHARACTER_ERROR" => Self::SpecialCharacterError,
            "JSON_STRUCTURES_ERROR" => Self::StructuresError,
            other => match other.strip_prefix(TEST_EXEC_ERROR_PREFIX) {
                Some(test_name) => Self::TestExecError(test_name.to_string()),
                None => Self::Other(other.to_string()),
            },
        }
    }

    /// Tag as written in reports.
    pub fn tag(&self) -> String {
        match self {
            Self::RowStructError => "ROW_STRUCT_ERROR".to_string(),
            Self::DateFormat => "DATE_FORMAT".to_string(),
            Self::RequiredField => "REQUIRED_FIELD".to_string(),
            Self::FieldLengthError => "FIELD_LENGTH_ERROR".to_string(),
            Self::FieldFormatError => "FIELD_FORMAT_ERROR".to_string(),
            Self::FieldValueError => "FIELD_VALUE_ERROR".to_string(),
            Self::CarriageReturnError => "CARRIAGE_RETURN_ERROR".to_string(),
            Self::SpecialCharacterError => "SPECIAL_CHARACTER_ERROR".to_string(),
            Self::StructuresError => "JSON_STRUCTURES_ERROR".to_string(),
            Self::TestExecError(test_name) => format!("{TEST_EXEC_ERROR_PREFIX}{test_name}"),
            Self::Other(tag) => tag.clone(),
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl Serialize for ErrorType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.tag())
    }
}

impl<'de> Deserialize<'de> for ErrorType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::parse(&tag))
    }
}

/// One finding of a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseStepResult {
    /// 1-based line, absent for file-level findings.
    pub line_number: Option<usize>,
    pub passed: bool,
    pub error_type: ErrorType,
    pub message: String,
    #[serde(default)]
    pub file_name: String,
}

impl TestCaseStepResult {
    /// A failed step at a given line.
    pub fn failure(
        line_number: Option<usize>,
        error_type: ErrorType,
        message: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            passed: false,
            error_type,
            message: message.into(),
            file_name: file_name.into(),
        }
    }
}

/// Findings of one check against one file.
///
/// An empty result means the check ran and found nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseResult {
    #[serde(default)]
    pub test_name: String,
    #[serde(default)]
    pub steps: Vec<TestCaseStepResult>,
}

impl TestCaseResult {
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, step: TestCaseStepResult) {
        self.steps.push(step);
    }

    /// Record a failed step.
    pub fn fail(
        &mut self,
        line_number: usize,
        error_type: ErrorType,
        message: impl Into<String>,
        file_name: &str,
    ) {
        self.steps.push(TestCaseStepResult::failure(
            Some(line_number),
            error_type,
            message,
            file_name,
        ));
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// `None` when there are no steps, otherwise whether all steps passed.
    pub fn status(&self) -> Option<bool> {
        if self.steps.is_empty() {
            None
        } else {
            Some(self.steps.iter().all(|step| step.passed))
        }
    }

    /// True when no step failed.
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|step| step.passed)
    }

    pub fn count_passed(&self) -> usize {
        self.steps.iter().filter(|step| step.passed).count()
    }

    pub fn count_failed(&self) -> usize {
        self.steps.iter().filter(|step| !step.passed).count()
    }
}

/// Results of every check run against one file, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub file_name: String,
    pub structure: String,
    pub results: Vec<TestCaseResult>,
}

impl TestSuiteResult {
    pub fn new(file_name: impl Into<String>, structure: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            structure: structure.into(),
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, result: TestCaseResult) {
        self.results.push(result);
    }

    /// Every step of every check, in execution order.
    pub fn steps(&self) -> impl Iterator<Item = &TestCaseStepResult> {
        self.results.iter().flat_map(|result| result.steps.iter())
    }

    /// `None` when no check produced a step.
    pub fn status(&self) -> Option<bool> {
        let mut steps = self.steps().peekable();
        steps.peek()?;
        Some(steps.all(|step| step.passed))
    }

    pub fn count_passed(&self) -> usize {
        self.results.iter().map(TestCaseResult::count_passed).sum()
    }

    pub fn count_failed(&self) -> usize {
        self.results.iter().map(TestCaseResult::count_failed).sum()
    }
}
