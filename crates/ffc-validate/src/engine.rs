//! Test case engine: look up, gate and run checks against parsed files.

use ffc_model::{FlatFile, TestCaseResult, TestSuiteResult};
use ffc_standards::TestCaseConfigs;
use tracing::{debug, warn};

use crate::error::TestExecError;
use crate::gate::check_applicability;
use crate::registry::CheckRegistry;

/// Runs named checks under their test case configurations.
#[derive(Debug)]
pub struct TestCaseEngine {
    registry: CheckRegistry,
    configs: TestCaseConfigs,
}

impl TestCaseEngine {
    pub fn new(registry: CheckRegistry, configs: TestCaseConfigs) -> Self {
        Self { registry, configs }
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    pub fn configs(&self) -> &TestCaseConfigs {
        &self.configs
    }

    /// Run one check against a file.
    ///
    /// The check body is only invoked once the applicability gate passes.
    pub fn run(&self, test_name: &str, file: &FlatFile<'_>) -> Result<TestCaseResult, TestExecError> {
        let Some(check) = self.registry.get(test_name) else {
            return Err(TestExecError::NotFound {
                test_name: test_name.to_string(),
                file_name: file.file_name(),
            });
        };

        let config = self.configs.get_or_default(test_name);
        check_applicability(config, test_name, file)?;

        debug!(
            check = test_name,
            source = %check.source(),
            file = %file.file_name(),
            config = %config.name,
            "running check"
        );
        let mut result = check
            .run(file)
            .map_err(|source| TestExecError::Execution {
                test_name: test_name.to_string(),
                file_name: file.file_name(),
                source,
            })?;
        result.test_name = test_name.to_string();
        debug!(
            check = test_name,
            failed = result.count_failed(),
            passed = result.count_passed(),
            "check finished"
        );
        Ok(result)
    }

    /// Run checks in order; a check that cannot run becomes one failed step.
    pub fn run_suite(&self, file: &FlatFile<'_>, test_names: &[String]) -> TestSuiteResult {
        let mut suite = TestSuiteResult::new(file.file_name(), file.structure().name.as_str());
        for test_name in test_names {
            let result = match self.run(test_name, file) {
                Ok(result) => result,
                Err(err) => {
                    warn!(check = %test_name, file = %err.file_name(), error = %err, "check could not run");
                    let mut result = TestCaseResult::new(test_name.as_str());
                    result.push(err.to_step());
                    result
                }
            };
            suite.push(result);
        }
        suite
    }

    /// Run the checks listed by the file's structure.
    pub fn run_defined(&self, file: &FlatFile<'_>) -> TestSuiteResult {
        self.run_suite(file, &file.structure().tests)
    }
}
