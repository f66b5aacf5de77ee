//! JSON structure definitions.
//!
//! A definition is first read as a JSON object so that every missing
//! mandatory property can be reported at once, then deserialized into raw
//! types and validated into the model.

use std::collections::BTreeSet;
use std::path::Path;

use ffc_model::{
    AnchoredPattern, ConfType, FixedLength, FixedValue, FlatFileStructure, Layout, MarkerRange,
    RowStructure,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{RowStructureLoadError, StructureLoadError};

pub const DELIMITED_STRUCTURE_PROPERTIES: &[&str] = &[
    "name",
    "conf_type",
    "sep",
    "quotechar",
    "encoding",
    "type_pos",
    "date_fmt",
    "decimal_sep",
    "tests",
    "file_pattern",
    "carriage_return",
    "row_structures",
];

pub const FIXED_WIDTH_STRUCTURE_PROPERTIES: &[&str] = &[
    "name",
    "conf_type",
    "encoding",
    "type_limits",
    "date_fmt",
    "decimal_sep",
    "tests",
    "file_pattern",
    "carriage_return",
    "row_structures",
];

pub const DELIMITED_ROW_PROPERTIES: &[&str] = &[
    "type",
    "length",
    "date_fields",
    "key_pos",
    "optional_fields",
    "decimal_fields",
    "digit_fields",
    "fixed_lengths",
];

pub const FIXED_WIDTH_ROW_PROPERTIES: &[&str] = &[
    "type",
    "lengths",
    "date_fields",
    "key_pos",
    "decimal_fields",
    "digit_fields",
];

/// Mandatory structure properties for a conf type.
pub fn mandatory_structure_properties(conf_type: ConfType) -> &'static [&'static str] {
    match conf_type {
        ConfType::Delimited => DELIMITED_STRUCTURE_PROPERTIES,
        ConfType::FixedWidth => FIXED_WIDTH_STRUCTURE_PROPERTIES,
    }
}

/// Mandatory row structure properties for a conf type.
pub fn mandatory_row_properties(conf_type: ConfType) -> &'static [&'static str] {
    match conf_type {
        ConfType::Delimited => DELIMITED_ROW_PROPERTIES,
        ConfType::FixedWidth => FIXED_WIDTH_ROW_PROPERTIES,
    }
}

#[derive(Debug, Deserialize)]
struct RawStructure {
    name: String,
    #[serde(default)]
    sep: Option<String>,
    #[serde(default)]
    quotechar: Option<String>,
    encoding: String,
    #[serde(default)]
    type_pos: Option<usize>,
    #[serde(default)]
    type_limits: Option<Vec<usize>>,
    date_fmt: String,
    decimal_sep: String,
    tests: Vec<String>,
    file_pattern: String,
    carriage_return: String,
}

#[derive(Debug, Deserialize)]
struct RawRowStructure {
    #[serde(default)]
    length: Option<usize>,
    #[serde(default)]
    lengths: Option<Vec<usize>>,
    key_pos: usize,
    #[serde(default)]
    optional_fields: Option<Vec<usize>>,
    date_fields: Vec<usize>,
    decimal_fields: Vec<usize>,
    digit_fields: Vec<usize>,
    #[serde(default)]
    fixed_lengths: Option<Vec<(usize, usize)>>,
    #[serde(default)]
    fixed_values: Option<Vec<(usize, String)>>,
    #[serde(default)]
    special_characters: Option<Vec<String>>,
}

const KNOWN_STRUCTURE_PROPERTIES: &[&str] = &[
    "name",
    "conf_type",
    "sep",
    "quotechar",
    "encoding",
    "type_pos",
    "type_limits",
    "date_fmt",
    "decimal_sep",
    "tests",
    "file_pattern",
    "carriage_return",
    "row_structures",
];

const KNOWN_ROW_PROPERTIES: &[&str] = &[
    "type",
    "length",
    "lengths",
    "key_pos",
    "optional_fields",
    "date_fields",
    "decimal_fields",
    "digit_fields",
    "fixed_lengths",
    "fixed_values",
    "special_characters",
];

/// Load one structure definition file.
pub fn load_structure(path: &Path) -> Result<FlatFileStructure, StructureLoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| StructureLoadError::io(path, e))?;
    structure_from_str(path, &content)
}

/// Build a structure from definition JSON. `source` is only used in errors.
pub fn structure_from_str(source: &Path, json: &str) -> Result<FlatFileStructure, StructureLoadError> {
    let value: Value = serde_json::from_str(json).map_err(|e| StructureLoadError::Decode {
        path: source.to_path_buf(),
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;
    let Value::Object(object) = value else {
        return Err(StructureLoadError::NotAnObject {
            path: source.to_path_buf(),
        });
    };

    let conf_type = match object.get("conf_type") {
        None => {
            return Err(StructureLoadError::MissingConfType {
                path: source.to_path_buf(),
            });
        }
        Some(raw) => raw
            .as_str()
            .and_then(ConfType::parse)
            .ok_or_else(|| StructureLoadError::UnknownConfType {
                path: source.to_path_buf(),
                value: display_value(raw),
            })?,
    };

    let structure_name = object
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
        .to_string();
    let missing = missing_properties(&object, mandatory_structure_properties(conf_type));
    if !missing.is_empty() {
        return Err(StructureLoadError::MissingProperties {
            path: source.to_path_buf(),
            structure: structure_name,
            missing,
        });
    }
    warn_unknown(&object, KNOWN_STRUCTURE_PROPERTIES, &structure_name, None);

    let raw_rows = match object.get("row_structures") {
        Some(Value::Array(rows)) => rows.clone(),
        _ => {
            return Err(StructureLoadError::invalid(
                source,
                "row_structures",
                "expected an array of row structures",
            ));
        }
    };
    let raw: RawStructure = serde_json::from_value(Value::Object(object)).map_err(|e| {
        StructureLoadError::Schema {
            path: source.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    let layout = build_layout(source, conf_type, &raw)?;
    let file_pattern = AnchoredPattern::new(&raw.file_pattern)
        .map_err(|e| StructureLoadError::invalid(source, "file_pattern", e.to_string()))?;
    if encoding_rs::Encoding::for_label(raw.encoding.as_bytes()).is_none() {
        return Err(StructureLoadError::invalid(
            source,
            "encoding",
            format!("unknown encoding label '{}'", raw.encoding),
        ));
    }
    if raw.carriage_return.is_empty() {
        return Err(StructureLoadError::invalid(
            source,
            "carriage_return",
            "line terminator must not be empty",
        ));
    }

    let mut row_structures: Vec<RowStructure> = Vec::with_capacity(raw_rows.len());
    for raw_row in &raw_rows {
        let row_structure = build_row_structure(&raw.name, conf_type, raw_row).map_err(|e| {
            StructureLoadError::RowStructure {
                path: source.to_path_buf(),
                source: e,
            }
        })?;
        if row_structures
            .iter()
            .any(|existing| existing.type_name() == row_structure.type_name())
        {
            return Err(StructureLoadError::DuplicateRowType {
                path: source.to_path_buf(),
                structure: raw.name.clone(),
                row_type: row_structure.type_name().to_string(),
            });
        }
        row_structures.push(row_structure);
    }

    debug!(
        structure = %raw.name,
        conf_type = %conf_type,
        row_structures = row_structures.len(),
        path = %source.display(),
        "loaded structure"
    );

    Ok(FlatFileStructure {
        name: raw.name,
        layout,
        date_format: raw.date_fmt,
        decimal_separator: raw.decimal_sep,
        file_pattern,
        encoding: raw.encoding,
        line_terminator: raw.carriage_return,
        tests: raw.tests,
        row_structures,
    })
}

fn build_layout(
    source: &Path,
    conf_type: ConfType,
    raw: &RawStructure,
) -> Result<Layout, StructureLoadError> {
    match conf_type {
        ConfType::Delimited => {
            let field_separator = single_char(source, "sep", raw.sep.as_deref())?;
            let quote_char = single_char(source, "quotechar", raw.quotechar.as_deref())?;
            let type_marker_position = match raw.type_pos {
                Some(pos) if pos >= 1 => pos,
                _ => {
                    return Err(StructureLoadError::invalid(
                        source,
                        "type_pos",
                        "expected a 1-based field position",
                    ));
                }
            };
            if raw.type_limits.is_some() {
                warn!(structure = %raw.name, "ignoring 'type_limits' on a delimited structure");
            }
            Ok(Layout::Delimited {
                field_separator,
                quote_char,
                type_marker_position,
            })
        }
        ConfType::FixedWidth => {
            let type_marker_range = match raw.type_limits.as_deref() {
                Some(&[start, end]) if start >= 1 && start <= end => MarkerRange { start, end },
                _ => {
                    return Err(StructureLoadError::invalid(
                        source,
                        "type_limits",
                        "expected [start, end] with 1 <= start <= end",
                    ));
                }
            };
            let delimited_only = [
                ("sep", raw.sep.is_some()),
                ("quotechar", raw.quotechar.is_some()),
                ("type_pos", raw.type_pos.is_some()),
            ];
            for (property, _) in delimited_only.iter().filter(|(_, present)| *present) {
                warn!(structure = %raw.name, property, "ignoring property on a fixed-width structure");
            }
            Ok(Layout::FixedWidth { type_marker_range })
        }
    }
}

fn single_char(
    source: &Path,
    property: &str,
    value: Option<&str>,
) -> Result<char, StructureLoadError> {
    let mut chars = value.unwrap_or_default().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(StructureLoadError::invalid(
            source,
            property,
            format!("expected a single ASCII character, got {value:?}"),
        )),
    }
}

fn build_row_structure(
    structure: &str,
    conf_type: ConfType,
    value: &Value,
) -> Result<RowStructure, RowStructureLoadError> {
    let Value::Object(object) = value else {
        return Err(RowStructureLoadError::MissingType {
            structure: structure.to_string(),
        });
    };
    let row_type = match object.get("type") {
        None => {
            return Err(RowStructureLoadError::MissingType {
                structure: structure.to_string(),
            });
        }
        Some(raw) => match raw.as_str() {
            Some(s) => s.to_string(),
            None => {
                return Err(RowStructureLoadError::InvalidProperty {
                    structure: structure.to_string(),
                    row_type: display_value(raw),
                    property: "type".to_string(),
                    message: "expected a string".to_string(),
                });
            }
        },
    };

    let invalid = |property: &str, message: String| RowStructureLoadError::InvalidProperty {
        structure: structure.to_string(),
        row_type: row_type.clone(),
        property: property.to_string(),
        message,
    };

    let missing = missing_properties(object, mandatory_row_properties(conf_type));
    if !missing.is_empty() {
        return Err(RowStructureLoadError::MissingProperties {
            structure: structure.to_string(),
            row_type: row_type.clone(),
            missing,
        });
    }
    warn_unknown(object, KNOWN_ROW_PROPERTIES, structure, Some(&row_type));

    let raw: RawRowStructure =
        serde_json::from_value(value.clone()).map_err(|e| RowStructureLoadError::Schema {
            structure: structure.to_string(),
            row_type: row_type.clone(),
            message: e.to_string(),
        })?;

    let pattern = AnchoredPattern::new(&row_type).map_err(|e| invalid("type", e.to_string()))?;

    let (length, field_widths) = match conf_type {
        ConfType::Delimited => {
            if raw.lengths.is_some() {
                warn!(structure, row_type = %row_type, "ignoring 'lengths' on a delimited row structure");
            }
            (raw.length.unwrap_or_default(), None)
        }
        ConfType::FixedWidth => {
            let widths = raw.lengths.unwrap_or_default();
            if widths.contains(&0) {
                return Err(invalid("lengths", "field widths must be non-zero".to_string()));
            }
            if let Some(declared) = raw.length.filter(|&declared| declared != widths.len()) {
                warn!(
                    structure,
                    row_type = %row_type,
                    declared,
                    derived = widths.len(),
                    "'length' disagrees with 'lengths', using the number of widths"
                );
            }
            (widths.len(), Some(widths))
        }
    };

    let check_position = |property: &str, position: usize| {
        if position == 0 || position > length {
            Err(invalid(
                property,
                format!("field position {position} is outside 1..={length}"),
            ))
        } else {
            Ok(position)
        }
    };
    let position_set = |property: &str, positions: &[usize]| {
        positions
            .iter()
            .map(|&position| check_position(property, position))
            .collect::<Result<BTreeSet<usize>, _>>()
    };

    let key_position = check_position("key_pos", raw.key_pos)?;
    let optional_fields = raw
        .optional_fields
        .as_deref()
        .map(|fields| position_set("optional_fields", fields))
        .transpose()?;
    let date_fields = position_set("date_fields", &raw.date_fields)?;
    let decimal_fields = position_set("decimal_fields", &raw.decimal_fields)?;
    let digit_fields = position_set("digit_fields", &raw.digit_fields)?;
    let fixed_lengths = raw
        .fixed_lengths
        .map(|pairs| {
            pairs
                .into_iter()
                .map(|(field, length)| {
                    check_position("fixed_lengths", field).map(|field| FixedLength { field, length })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;
    let fixed_values = raw
        .fixed_values
        .map(|pairs| {
            pairs
                .into_iter()
                .map(|(field, value)| {
                    check_position("fixed_values", field).map(|field| FixedValue { field, value })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    Ok(RowStructure {
        row_type: pattern,
        length,
        field_widths,
        key_position,
        optional_fields,
        decimal_fields,
        digit_fields,
        date_fields,
        fixed_lengths,
        fixed_values,
        special_characters: raw.special_characters,
    })
}

fn missing_properties(object: &Map<String, Value>, mandatory: &[&str]) -> Vec<String> {
    mandatory
        .iter()
        .filter(|property| !object.contains_key(**property))
        .map(|property| (*property).to_string())
        .collect()
}

fn warn_unknown(
    object: &Map<String, Value>,
    known: &[&str],
    structure: &str,
    row_type: Option<&str>,
) {
    let unknown = object
        .keys()
        .map(String::as_str)
        .filter(|key| !known.contains(key));
    for property in unknown {
        match row_type {
            Some(row_type) => {
                warn!(structure, row_type, property, "ignoring unknown row structure property");
            }
            None => warn!(structure, property, "ignoring unknown structure property"),
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delimited_json() -> Value {
        serde_json::json!({
            "name": "orders",
            "conf_type": "csv",
            "sep": ";",
            "quotechar": "\"",
            "encoding": "utf-8",
            "type_pos": 1,
            "date_fmt": "%Y%m%d",
            "decimal_sep": ".",
            "tests": ["check_dates", "check_required"],
            "file_pattern": "ORD_.*\\.csv",
            "carriage_return": "\r\n",
            "row_structures": [{
                "type": "H",
                "length": 3,
                "date_fields": [2],
                "key_pos": 1,
                "optional_fields": [3],
                "decimal_fields": [],
                "digit_fields": [],
                "fixed_lengths": [[1, 1]]
            }]
        })
    }

    fn load(value: &Value) -> Result<FlatFileStructure, StructureLoadError> {
        structure_from_str(Path::new("struct_orders.json"), &value.to_string())
    }

    #[test]
    fn loads_delimited_structure() {
        let structure = load(&delimited_json()).unwrap();
        assert_eq!(structure.name, "orders");
        assert_eq!(structure.conf_type(), ConfType::Delimited);
        assert_eq!(structure.field_separator(), Some(';'));
        assert_eq!(structure.line_terminator, "\r\n");
        let row = &structure.row_structures[0];
        assert_eq!(row.length, 3);
        assert!(row.is_optional(3));
        assert_eq!(
            row.fixed_lengths,
            Some(vec![FixedLength {
                field: 1,
                length: 1
            }])
        );
    }

    #[test]
    fn lists_every_missing_property() {
        let mut json = delimited_json();
        let object = json.as_object_mut().unwrap();
        object.remove("sep");
        object.remove("date_fmt");
        match load(&json).unwrap_err() {
            StructureLoadError::MissingProperties {
                structure, missing, ..
            } => {
                assert_eq!(structure, "orders");
                assert_eq!(missing, vec!["sep", "date_fmt"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_conf_type_is_reported_first() {
        let mut json = delimited_json();
        json.as_object_mut().unwrap().remove("conf_type");
        assert!(matches!(
            load(&json),
            Err(StructureLoadError::MissingConfType { .. })
        ));
    }

    #[test]
    fn unknown_conf_type_is_rejected() {
        let mut json = delimited_json();
        json["conf_type"] = Value::from("xml");
        let err = load(&json).unwrap_err();
        assert!(matches!(err, StructureLoadError::UnknownConfType { ref value, .. } if value == "xml"));
    }

    #[test]
    fn row_missing_properties_name_the_row_type() {
        let mut json = delimited_json();
        json["row_structures"][0]
            .as_object_mut()
            .unwrap()
            .remove("key_pos");
        let err = load(&json).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'H'"), "{message}");
        assert!(message.contains("key_pos"), "{message}");
    }

    #[test]
    fn multi_character_separator_is_invalid() {
        let mut json = delimited_json();
        json["sep"] = Value::from(";;");
        let err = load(&json).unwrap_err();
        assert!(matches!(err, StructureLoadError::InvalidProperty { ref property, .. } if property == "sep"));
    }

    #[test]
    fn unknown_encoding_is_invalid() {
        let mut json = delimited_json();
        json["encoding"] = Value::from("klingon");
        let err = load(&json).unwrap_err();
        assert!(matches!(err, StructureLoadError::InvalidProperty { ref property, .. } if property == "encoding"));
    }

    #[test]
    fn duplicate_row_types_are_rejected() {
        let mut json = delimited_json();
        let row = json["row_structures"][0].clone();
        json["row_structures"].as_array_mut().unwrap().push(row);
        assert!(matches!(
            load(&json),
            Err(StructureLoadError::DuplicateRowType { .. })
        ));
    }

    #[test]
    fn unknown_properties_are_ignored() {
        let mut json = delimited_json();
        json["comment"] = Value::from("legacy field");
        json["row_structures"][0]["note"] = Value::from(1);
        let structure = load(&json).unwrap();
        assert!(!structure.has_attribute("comment"));
    }

    #[test]
    fn fixed_width_length_derives_from_widths() {
        let json = serde_json::json!({
            "name": "stock",
            "conf_type": "pos",
            "encoding": "latin1",
            "type_limits": [1, 1],
            "date_fmt": "%d%m%Y",
            "decimal_sep": ",",
            "tests": [],
            "file_pattern": "STK",
            "carriage_return": "\n",
            "row_structures": [{
                "type": "D",
                "lengths": [1, 4, 8],
                "date_fields": [3],
                "key_pos": 2,
                "decimal_fields": [],
                "digit_fields": [2]
            }]
        });
        let structure = load(&json).unwrap();
        let row = &structure.row_structures[0];
        assert_eq!(row.length, 3);
        assert_eq!(row.total_width(), Some(13));
        assert!(!row.has_attribute("optional_fields"));
        assert!(structure.has_attribute("type_limits"));
        assert!(!structure.has_attribute("sep"));
    }

    #[test]
    fn decode_error_carries_position() {
        let err = structure_from_str(Path::new("bad.json"), "{\n  \"name\": ,\n}").unwrap_err();
        match err {
            StructureLoadError::Decode { line, path, .. } => {
                assert_eq!(line, 2);
                assert_eq!(path, Path::new("bad.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
