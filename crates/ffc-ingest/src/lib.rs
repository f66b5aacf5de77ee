#![deny(unsafe_code)]

//! Flat file ingestion.
//!
//! Reads input files, decodes them with the encoding declared by their
//! structure and parses them into row records, either by splitting on a
//! separator or by slicing fixed character widths.

mod decode;
mod discovery;
mod error;
mod parse;
mod reader;

// === Error Types ===
pub use error::{IngestError, ParseError, Result};

// === Reading ===
pub use decode::decode;
pub use parse::{parse, slice_fields};
pub use reader::read_flat_file;

// === File Discovery ===
pub use discovery::{expand_inputs, list_input_files};
