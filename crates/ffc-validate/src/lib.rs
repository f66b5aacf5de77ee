#![deny(unsafe_code)]

//! Test case engine for flat files.
//!
//! Checks are looked up in a [`CheckRegistry`] holding the built-in reference
//! checks followed by external plugins. Before a check runs, its test case
//! configuration decides whether it applies to the file's structure.

pub mod check;
pub mod checks;
pub mod engine;
pub mod error;
pub mod gate;
pub mod plugin;
pub mod registry;

pub use crate::check::{BuiltinCheck, Check, CheckFn, CheckSource};
pub use crate::checks::builtin_checks;
pub use crate::engine::TestCaseEngine;
pub use crate::error::{CheckError, PluginError, TestExecError};
pub use crate::gate::check_applicability;
pub use crate::plugin::{PluginCheck, discover_plugins};
pub use crate::registry::CheckRegistry;
