use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use f1_cli::pipeline::PipelineError;
use f1_model::{RunReport, TableLoad};

pub fn print_summary(report: &RunReport) {
    let mut table = loads_table(&report.loaded);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.total_rows()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let mut details = Table::new();
    apply_table_style(&mut details);
    details.add_row(vec![
        Cell::new("Result rows"),
        Cell::new(report.fact_candidates),
    ]);
    details.add_row(vec![
        Cell::new("Dropped (unresolved keys)"),
        count_cell(report.facts_dropped, Color::Yellow),
    ]);
    details.add_row(vec![
        Cell::new("Race id discrepancies"),
        count_cell(report.race_id_discrepancies, Color::Yellow),
    ]);
    details.add_row(vec![
        Cell::new("Duration (ms)"),
        Cell::new(report.duration_ms),
    ]);
    align_column(&mut details, 1, CellAlignment::Right);
    println!("{details}");
}

pub fn print_failure(error: &PipelineError) {
    eprintln!("error: [{}] {error}", error.kind());
    if error.nothing_loaded() {
        eprintln!("No tables were written.");
        return;
    }
    eprintln!("Tables appended before the failure (not rolled back):");
    eprintln!("{}", loads_table(&error.loaded));
}

fn loads_table(loads: &[TableLoad]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table"), header_cell("Rows appended")]);
    apply_table_style(&mut table);
    for load in loads {
        table.add_row(vec![Cell::new(&load.table), Cell::new(load.rows)]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
