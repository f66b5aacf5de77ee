//! Byte decoding with the encoding declared by a structure.

use std::path::Path;

use encoding_rs::Encoding;

use crate::error::{IngestError, Result};

/// Decode raw file bytes.
///
/// A byte order mark takes precedence over the declared label and is
/// stripped. Malformed sequences are an error rather than being replaced.
pub fn decode(bytes: &[u8], label: &str, path: &Path) -> Result<String> {
    let declared =
        Encoding::for_label(label.as_bytes()).ok_or_else(|| IngestError::UnknownEncoding {
            path: path.to_path_buf(),
            label: label.to_string(),
        })?;
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_len)) => (bom_encoding, &bytes[bom_len..]),
        None => (declared, bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(std::borrow::Cow::into_owned)
        .ok_or_else(|| IngestError::MalformedContent {
            path: path.to_path_buf(),
            encoding: encoding.name(),
        })
}
