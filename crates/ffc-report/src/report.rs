//! Findings of a whole run, across files.

use ffc_model::{ErrorType, TestCaseStepResult, TestSuiteResult};
use serde::Serialize;

/// Everything a run found: structure load failures, then one suite per file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub structure_errors: Vec<TestCaseStepResult>,
    pub suites: Vec<TestSuiteResult>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_suite(&mut self, suite: TestSuiteResult) {
        self.suites.push(suite);
    }

    /// Record a structure definition that failed to load.
    pub fn push_structure_error(&mut self, file_name: &str, message: impl Into<String>) {
        self.structure_errors.push(TestCaseStepResult::failure(
            None,
            ErrorType::StructuresError,
            message,
            file_name,
        ));
    }

    /// Every step in report order.
    pub fn steps(&self) -> impl Iterator<Item = &TestCaseStepResult> {
        self.structure_errors
            .iter()
            .chain(self.suites.iter().flat_map(TestSuiteResult::steps))
    }

    pub fn count_passed(&self) -> usize {
        self.steps().filter(|step| step.passed).count()
    }

    pub fn count_failed(&self) -> usize {
        self.steps().filter(|step| !step.passed).count()
    }

    pub fn has_findings(&self) -> bool {
        self.count_failed() > 0
    }
}
