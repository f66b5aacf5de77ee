//! Splitting decoded content into row records.

use ffc_model::{FlatFileStructure, Layout, MarkerRange, Row, resolve_row_structure, split_lines};

use crate::error::ParseError;

/// Parse decoded content into rows, in file order.
///
/// Field counts are not validated here; a row whose type cannot be resolved
/// is kept without fields so that checks can report it.
pub fn parse(content: &str, structure: &FlatFileStructure) -> Result<Vec<Row>, ParseError> {
    match structure.layout {
        Layout::Delimited {
            field_separator,
            quote_char,
            type_marker_position,
        } => parse_delimited(content, field_separator, quote_char, type_marker_position),
        Layout::FixedWidth { type_marker_range } => {
            Ok(parse_fixed_width(content, structure, type_marker_range))
        }
    }
}

fn parse_delimited(
    content: &str,
    field_separator: char,
    quote_char: char,
    type_marker_position: usize,
) -> Result<Vec<Row>, ParseError> {
    // Separators are validated as single ASCII characters at load time.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(ascii_byte(field_separator))
        .quote(ascii_byte(quote_char))
        .from_reader(content.as_bytes());

    let lines = split_lines(content);
    let line_starts: Vec<usize> = lines
        .iter()
        .scan(0, |offset, line| {
            let start = *offset;
            *offset += line.content.len() + line.terminator.len();
            Some(start)
        })
        .collect();
    let line_at = |offset: usize| line_starts.partition_point(|&start| start <= offset).max(1);

    let mut rows = Vec::new();
    let mut spans = Vec::new();
    let mut record = csv::StringRecord::new();
    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|e| ParseError::Delimited {
                line: e.position().map(csv::Position::line).unwrap_or_default(),
                message: e.to_string(),
            })?;
        if !more {
            break;
        }
        // The reader positions a record where the previous one ended, before
        // any blank lines it skipped.
        let raw_start = record.position().map_or(0, |pos| byte_offset(pos.byte()));
        let start = raw_start
            + content
                .as_bytes()
                .get(raw_start..)
                .unwrap_or_default()
                .iter()
                .take_while(|&&b| b == b'\r' || b == b'\n')
                .count();
        spans.push(start..byte_offset(reader.position().byte()));

        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        let marker = type_marker_position
            .checked_sub(1)
            .and_then(|idx| fields.get(idx))
            .cloned()
            .unwrap_or_default();
        rows.push(Row {
            line_number: line_at(start),
            marker,
            fields,
            width: None,
        });
    }

    // Blank lines outside quoted fields become rows without fields.
    for (line, &start) in lines.iter().zip(&line_starts) {
        if line.content.is_empty() && !spans.iter().any(|span| span.contains(&start)) {
            rows.push(Row {
                line_number: line.number,
                marker: String::new(),
                fields: Vec::new(),
                width: None,
            });
        }
    }
    rows.sort_by_key(|row| row.line_number);
    Ok(rows)
}

fn byte_offset(position: u64) -> usize {
    usize::try_from(position).unwrap_or(usize::MAX)
}

fn parse_fixed_width(
    content: &str,
    structure: &FlatFileStructure,
    type_marker_range: MarkerRange,
) -> Vec<Row> {
    split_lines(content)
        .into_iter()
        .map(|line| {
            let marker = type_marker_range.extract(line.content);
            let fields = match resolve_row_structure(&structure.row_structures, &marker) {
                Ok(row_structure) => {
                    slice_fields(line.content, row_structure.field_widths.as_deref().unwrap_or_default())
                }
                Err(fault) => {
                    tracing::debug!(line = line.number, %fault, "row type unresolved");
                    Vec::new()
                }
            };
            Row {
                line_number: line.number,
                marker,
                fields,
                width: Some(line.content.chars().count()),
            }
        })
        .collect()
}

/// Cut a line into consecutive fields of the given character widths.
///
/// Fields past the end of a short line are truncated or empty.
pub fn slice_fields(line: &str, widths: &[usize]) -> Vec<String> {
    let mut chars = line.chars();
    widths
        .iter()
        .map(|&width| chars.by_ref().take(width).collect())
        .collect()
}

fn ascii_byte(c: char) -> u8 {
    u8::try_from(c).unwrap_or(b'?')
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use ffc_model::{AnchoredPattern, RowStructure};
    use proptest::prelude::*;

    use super::*;

    fn fixed_row(row_type: &str, widths: Vec<usize>) -> RowStructure {
        RowStructure {
            row_type: AnchoredPattern::new(row_type).unwrap(),
            length: widths.len(),
            field_widths: Some(widths),
            key_position: 1,
            optional_fields: None,
            decimal_fields: BTreeSet::new(),
            digit_fields: BTreeSet::new(),
            date_fields: BTreeSet::new(),
            fixed_lengths: None,
            fixed_values: None,
            special_characters: None,
        }
    }

    fn structure(layout: Layout, row_structures: Vec<RowStructure>) -> FlatFileStructure {
        FlatFileStructure {
            name: "test".to_string(),
            layout,
            date_format: "%Y%m%d".to_string(),
            decimal_separator: ".".to_string(),
            file_pattern: AnchoredPattern::new("T").unwrap(),
            encoding: "utf-8".to_string(),
            line_terminator: "\n".to_string(),
            tests: Vec::new(),
            row_structures,
        }
    }

    fn fixed_width(row_structures: Vec<RowStructure>) -> FlatFileStructure {
        structure(
            Layout::FixedWidth {
                type_marker_range: MarkerRange { start: 1, end: 1 },
            },
            row_structures,
        )
    }

    #[test]
    fn slices_fixed_width_line() {
        let structure = fixed_width(vec![fixed_row("A", vec![3, 5, 2])]);
        let rows = parse("ABC12345XY\n", &structure).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields, vec!["ABC", "12345", "XY"]);
        assert_eq!(rows[0].width, Some(10));
    }

    #[test]
    fn short_line_yields_truncated_fields() {
        let structure = fixed_width(vec![fixed_row("A", vec![3, 5, 2])]);
        let rows = parse("ABC12\n", &structure).unwrap();
        assert_eq!(rows[0].fields, vec!["ABC", "12", ""]);
        assert_eq!(rows[0].width, Some(5));
    }

    #[test]
    fn fixed_width_dispatches_on_marker() {
        let structure = fixed_width(vec![
            fixed_row("H", vec![1, 4]),
            fixed_row("D", vec![1, 2, 2]),
        ]);
        let rows = parse("H2024\r\nD0102\r\nX9999\r\n", &structure).unwrap();
        assert_eq!(rows[0].fields, vec!["H", "2024"]);
        assert_eq!(rows[1].fields, vec!["D", "01", "02"]);
        assert_eq!(rows[2].marker, "X");
        assert!(rows[2].fields.is_empty());
        assert_eq!(rows[2].line_number, 3);
    }

    #[test]
    fn widths_count_characters_not_bytes() {
        let structure = fixed_width(vec![fixed_row("A", vec![2, 3])]);
        let rows = parse("Aéçà!\n", &structure).unwrap();
        assert_eq!(rows[0].fields, vec!["Aé", "çà!"]);
    }

    #[test]
    fn delimited_records_keep_line_numbers_and_quotes() {
        let structure = structure(
            Layout::Delimited {
                field_separator: ';',
                quote_char: '"',
                type_marker_position: 1,
            },
            vec![fixed_row("H", vec![1])],
        );
        let content = "H;\"a;b\";1\nL;\"multi\nline\";2\nL;\"say \"\"hi\"\"\"\n";
        let rows = parse(content, &structure).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].fields, vec!["H", "a;b", "1"]);
        assert_eq!(rows[1].fields, vec!["L", "multi\nline", "2"]);
        assert_eq!(rows[2].line_number, 4);
        assert_eq!(rows[2].fields, vec!["L", "say \"hi\""]);
        assert_eq!(rows[2].marker, "L");
    }

    #[test]
    fn delimited_blank_lines_become_empty_rows() {
        let structure = structure(
            Layout::Delimited {
                field_separator: ';',
                quote_char: '"',
                type_marker_position: 1,
            },
            vec![fixed_row("H", vec![1, 1])],
        );
        let rows = parse("H;1\n\nH;2\r\n\r\nH;\"a\n\nb\"\n", &structure).unwrap();
        let found: Vec<(usize, &str, usize)> = rows
            .iter()
            .map(|row| (row.line_number, row.marker.as_str(), row.fields.len()))
            .collect();
        assert_eq!(
            found,
            vec![(1, "H", 2), (2, "", 0), (3, "H", 2), (4, "", 0), (5, "H", 2)]
        );
        assert_eq!(rows[4].fields[1], "a\n\nb");
    }

    #[test]
    fn delimited_marker_is_empty_when_absent() {
        let structure = structure(
            Layout::Delimited {
                field_separator: ',',
                quote_char: '"',
                type_marker_position: 3,
            },
            vec![fixed_row("H", vec![1])],
        );
        let rows = parse("a,b\n", &structure).unwrap();
        assert_eq!(rows[0].marker, "");
    }

    proptest! {
        #[test]
        fn fixed_width_fields_reassemble_the_line(
            widths in prop::collection::vec(1usize..6, 1..6),
            extra in "[a-z0-9]{0,4}",
            seed in "[A-Za-z0-9 ]{30}",
        ) {
            let total: usize = widths.iter().sum();
            let line: String = seed.chars().take(total).collect::<String>() + &extra;
            let fields = slice_fields(&line, &widths);
            prop_assert_eq!(fields.len(), widths.len());
            let rebuilt: String = fields.concat();
            prop_assert_eq!(rebuilt.as_str(), &line[..total]);
        }
    }
}
