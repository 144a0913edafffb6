use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dwca_cli::types::RunResult;
use dwca_extract::WriteMode;

pub fn print_summary(result: &RunResult) {
    println!("Input: {}", result.input.display());
    if result.archive_dir != result.input {
        println!("Archive: {}", result.archive_dir.display());
    }
    let mode = match result.mode {
        WriteMode::Truncate => "written",
        WriteMode::Append => "appended",
    };
    println!("Output: {} ({mode})", result.output.display());

    let mut table = Table::new();
    table.set_header(vec![header_cell("Step"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Extension files"), Cell::new(result.extensions)]);
    table.add_row(vec![
        Cell::new("Records read"),
        Cell::new(result.summary.records_read),
    ]);
    table.add_row(vec![
        Cell::new("Records extracted")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.summary.records_extracted).add_attribute(Attribute::Bold),
    ]);
    if result.summary.example_rows > 0 {
        table.add_row(vec![
            Cell::new("Example copies"),
            Cell::new(result.summary.example_rows),
        ]);
    }
    println!("{table}");

    if !result.missing_terms.is_empty() {
        let names: Vec<&str> = result
            .missing_terms
            .iter()
            .map(|term| term.simple_name())
            .collect();
        println!("Expected terms not in archive: {}", names.join(", "));
    }
    println!(
        "Extracted {} flat Darwin Core occurrence records",
        result.summary.records_extracted
    );
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
