//! Structural contract of a flat file family.
//!
//! Structures are built once by the loader and only read afterwards. Field
//! positions are 1-based throughout, as they appear in structure definitions.

use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Kind of flat file a structure describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfType {
    /// Separator-delimited text (CSV and friends).
    #[serde(rename = "csv", alias = "delimited")]
    Delimited,
    /// Positional text where every field has a fixed character width.
    #[serde(rename = "pos", alias = "fixed-width")]
    FixedWidth,
}

impl ConfType {
    /// Parse a conf type from its definition value.
    ///
    /// Both the short names (`csv`, `pos`) and the descriptive names
    /// (`delimited`, `fixed-width`) are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" | "delimited" => Some(Self::Delimited),
            "pos" | "fixed-width" | "fixed_width" | "positional" => Some(Self::FixedWidth),
            _ => None,
        }
    }

    /// Short name used in definitions and test configurations.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delimited => "csv",
            Self::FixedWidth => "pos",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Delimited => "delimited",
            Self::FixedWidth => "fixed-width",
        }
    }
}

impl fmt::Display for ConfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A regular expression matched at the start of the input.
///
/// Row types and file patterns use prefix-match semantics: `L` matches the
/// marker `L01`, while `L$` only matches `L`.
#[derive(Debug, Clone)]
pub struct AnchoredPattern {
    source: String,
    regex: Regex,
}

impl AnchoredPattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{source})"))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// The pattern as written in the definition.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for AnchoredPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for AnchoredPattern {}

impl fmt::Display for AnchoredPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// 1-based inclusive character range holding the row type marker of a
/// fixed-width line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerRange {
    pub start: usize,
    pub end: usize,
}

impl MarkerRange {
    /// Extract the marker from a line. Characters past the end of the line
    /// are simply absent.
    pub fn extract(&self, line: &str) -> String {
        let skip = self.start.saturating_sub(1);
        let take = (self.end + 1).saturating_sub(self.start);
        line.chars().skip(skip).take(take).collect()
    }
}

/// Physical layout of the file, one variant per conf type.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    Delimited {
        field_separator: char,
        quote_char: char,
        /// 1-based field holding the row type marker.
        type_marker_position: usize,
    },
    FixedWidth {
        type_marker_range: MarkerRange,
    },
}

/// A field that must have an exact character length when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedLength {
    pub field: usize,
    pub length: usize,
}

/// A field that must hold an exact value when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedValue {
    pub field: usize,
    pub value: String,
}

/// Contract for one row type of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct RowStructure {
    /// Pattern matched against the marker extracted from each line.
    pub row_type: AnchoredPattern,
    /// Expected number of fields.
    pub length: usize,
    /// Field widths, fixed-width layouts only.
    pub field_widths: Option<Vec<usize>>,
    /// Field supplying the grouping key for rows of this type.
    pub key_position: usize,
    pub optional_fields: Option<BTreeSet<usize>>,
    pub decimal_fields: BTreeSet<usize>,
    pub digit_fields: BTreeSet<usize>,
    pub date_fields: BTreeSet<usize>,
    pub fixed_lengths: Option<Vec<FixedLength>>,
    pub fixed_values: Option<Vec<FixedValue>>,
    pub special_characters: Option<Vec<String>>,
}

impl RowStructure {
    /// Row type as written in the definition.
    pub fn type_name(&self) -> &str {
        self.row_type.as_str()
    }

    /// Sum of all field widths, fixed-width layouts only.
    pub fn total_width(&self) -> Option<usize> {
        self.field_widths.as_ref().map(|widths| widths.iter().sum())
    }

    /// Whether a field may be left empty.
    pub fn is_optional(&self, position: usize) -> bool {
        self.optional_fields
            .as_ref()
            .is_some_and(|fields| fields.contains(&position))
    }

    /// Names of the definition properties this row structure exposes.
    pub fn attribute_names(&self) -> Vec<&'static str> {
        let mut names = vec![
            "type",
            "length",
            "key_pos",
            "date_fields",
            "decimal_fields",
            "digit_fields",
        ];
        if self.field_widths.is_some() {
            names.push("lengths");
        }
        if self.optional_fields.is_some() {
            names.push("optional_fields");
        }
        if self.fixed_lengths.is_some() {
            names.push("fixed_lengths");
        }
        if self.fixed_values.is_some() {
            names.push("fixed_values");
        }
        if self.special_characters.is_some() {
            names.push("special_characters");
        }
        names
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute_names().contains(&name)
    }
}

/// Contract for one family of flat files.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatFileStructure {
    /// Registry key.
    pub name: String,
    pub layout: Layout,
    /// strftime-style date format used by date fields.
    pub date_format: String,
    pub decimal_separator: String,
    /// Pattern matched against file basenames.
    pub file_pattern: AnchoredPattern,
    /// WHATWG encoding label of the file content.
    pub encoding: String,
    /// Exact byte sequence expected at the end of every line.
    pub line_terminator: String,
    /// Checks run by default, in order.
    pub tests: Vec<String>,
    pub row_structures: Vec<RowStructure>,
}

impl FlatFileStructure {
    pub fn conf_type(&self) -> ConfType {
        match self.layout {
            Layout::Delimited { .. } => ConfType::Delimited,
            Layout::FixedWidth { .. } => ConfType::FixedWidth,
        }
    }

    pub fn field_separator(&self) -> Option<char> {
        match self.layout {
            Layout::Delimited {
                field_separator, ..
            } => Some(field_separator),
            Layout::FixedWidth { .. } => None,
        }
    }

    pub fn quote_char(&self) -> Option<char> {
        match self.layout {
            Layout::Delimited { quote_char, .. } => Some(quote_char),
            Layout::FixedWidth { .. } => None,
        }
    }

    /// Whether this structure applies to a file basename.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        self.file_pattern.is_match(file_name)
    }

    /// Names of the definition properties this structure exposes.
    pub fn attribute_names(&self) -> Vec<&'static str> {
        let mut names = vec![
            "name",
            "conf_type",
            "encoding",
            "date_fmt",
            "decimal_sep",
            "tests",
            "file_pattern",
            "carriage_return",
            "row_structures",
        ];
        match self.layout {
            Layout::Delimited { .. } => names.extend(["sep", "quotechar", "type_pos"]),
            Layout::FixedWidth { .. } => names.push("type_limits"),
        }
        names
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute_names().contains(&name)
    }
}
