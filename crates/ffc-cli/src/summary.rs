use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ffc_cli::pipeline::FileStatus;

use crate::commands::CheckSummary;

pub fn print_summary(summary: &CheckSummary) {
    let outcome = &summary.outcome;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Structure"),
        header_cell("Checks"),
        header_cell("Findings"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);

    let mut total_checked = 0usize;
    let mut total_failed = 0usize;
    for file in &outcome.files {
        let name = file
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.path.display().to_string());
        match &file.status {
            FileStatus::Checked {
                structure,
                checks,
                failed,
            } => {
                total_checked += 1;
                total_failed += failed;
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(structure),
                    Cell::new(checks),
                    count_cell(*failed),
                    status_cell(*failed == 0),
                ]);
            }
            FileStatus::Skipped { reason } => {
                table.add_row(vec![
                    Cell::new(name),
                    dim_cell(reason),
                    dim_cell("-"),
                    dim_cell("-"),
                    Cell::new("SKIPPED").fg(Color::Yellow),
                ]);
            }
        }
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{total_checked} checked"))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(total_failed).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");

    if !outcome.report.structure_errors.is_empty() {
        eprintln!("Structure definitions skipped:");
        for step in &outcome.report.structure_errors {
            eprintln!("- {}: {}", step.file_name, step.message);
        }
    }
    if let Some(path) = &summary.report_path {
        println!("Report: {}", path.display());
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn status_cell(passed: bool) -> Cell {
    if passed {
        Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new("✗").fg(Color::Red).add_attribute(Attribute::Bold)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
