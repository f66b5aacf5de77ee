#![deny(unsafe_code)]

//! Core types for flat file checking.
//!
//! A [`FlatFileStructure`] describes the layout of one family of flat files
//! (delimited or fixed-width) and the field rules of each row type. A
//! [`FlatFile`] binds parsed rows of one file to its structure, and the
//! result types record what each check found.

pub mod error;
pub mod flat_file;
pub mod lines;
pub mod resolution;
pub mod result;
pub mod structure;

pub use error::{ModelError, Result};
pub use flat_file::{FlatFile, Row, RowGroup};
pub use lines::{RawLine, split_lines};
pub use resolution::{RowStructureFault, resolve_row_structure};
pub use result::{ErrorType, TestCaseResult, TestCaseStepResult, TestSuiteResult};
pub use structure::{
    AnchoredPattern, ConfType, FixedLength, FixedValue, FlatFileStructure, Layout, MarkerRange,
    RowStructure,
};
