#![deny(unsafe_code)]

//! Structure definitions and test case configurations.
//!
//! Structures are JSON documents, one per file format, usually kept together
//! in a directory as `struct_*.json`. Test case configurations gate which
//! checks may run against which structures.

pub mod definition;
pub mod error;
pub mod registry;
pub mod test_config;

pub use crate::definition::{
    load_structure, mandatory_row_properties, mandatory_structure_properties, structure_from_str,
};
pub use crate::error::{RegistryError, RowStructureLoadError, StructureLoadError, TestConfigError};
pub use crate::registry::{
    DEFAULT_STRUCTURE_PATTERN, LoadFailure, PartialLoad, StructureRegistry, list_structure_files,
    load_structures_from_dir, load_structures_from_dir_partial,
};
pub use crate::test_config::{
    Allowance, DEFAULT_TEST_CONFIG, FieldRequirement, TestCaseConfig, TestCaseConfigs,
    load_test_configs, test_configs_from_str,
};
