//! The check contract shared by built-in and external checks.

use std::fmt;
use std::path::PathBuf;

use ffc_model::{FlatFile, TestCaseResult};

use crate::error::CheckError;

/// Where a check comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckSource {
    Builtin,
    Plugin(PathBuf),
}

impl fmt::Display for CheckSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => f.write_str("built-in"),
            Self::Plugin(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A named validation routine.
///
/// A check only reads the file it is given. An empty result means it ran
/// and found nothing.
pub trait Check: fmt::Debug {
    fn name(&self) -> &str;

    fn source(&self) -> CheckSource;

    fn run(&self, file: &FlatFile<'_>) -> Result<TestCaseResult, CheckError>;
}

/// Signature of a compiled-in check body.
pub type CheckFn = fn(&FlatFile<'_>) -> Result<TestCaseResult, CheckError>;

/// A check compiled into the binary.
#[derive(Clone, Copy)]
pub struct BuiltinCheck {
    name: &'static str,
    body: CheckFn,
}

impl BuiltinCheck {
    pub const fn new(name: &'static str, body: CheckFn) -> Self {
        Self { name, body }
    }
}

impl fmt::Debug for BuiltinCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinCheck")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Check for BuiltinCheck {
    fn name(&self) -> &str {
        self.name
    }

    fn source(&self) -> CheckSource {
        CheckSource::Builtin
    }

    fn run(&self, file: &FlatFile<'_>) -> Result<TestCaseResult, CheckError> {
        (self.body)(file)
    }
}
