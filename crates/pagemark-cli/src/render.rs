//! Tables for the terminal.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use pagemark_core::{Book, Metrics, ProgressEntry};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row per book with its metrics.
pub fn books_table(rows: &[(Book, Metrics)]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Title"),
        header_cell("Pages"),
        header_cell("Price"),
        header_cell("Read"),
        header_cell("Progress"),
        header_cell("Consumed"),
    ]);
    apply_table_style(&mut table);
    for index in 2..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for (book, metrics) in rows {
        table.add_row(vec![
            dim_cell(&book.id),
            Cell::new(&book.title).add_attribute(Attribute::Bold),
            Cell::new(book.total_page_count),
            Cell::new(book.price),
            Cell::new(metrics.pages_read),
            progress_cell(metrics.progress_percent),
            Cell::new(metrics.price_consumed),
        ]);
    }
    table
}

/// Entries in logging order.
pub fn entries_table(entries: &[ProgressEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("From"),
        header_cell("To"),
        header_cell("Pages"),
        header_cell("Enabled"),
        header_cell("Logged at"),
    ]);
    apply_table_style(&mut table);
    for index in 1..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 4, CellAlignment::Center);

    for entry in entries {
        table.add_row(vec![
            dim_cell(&entry.id),
            Cell::new(entry.from_page_number),
            Cell::new(entry.to_page_number),
            Cell::new(entry.page_count()),
            enabled_cell(entry.is_enabled),
            Cell::new(entry.created_at.format(TIMESTAMP_FORMAT)),
        ]);
    }
    table
}

/// `12.5%` style percentage.
pub fn format_percent(percent: f64) -> String {
    format!("{percent:.1}%")
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn progress_cell(percent: f64) -> Cell {
    let cell = Cell::new(format_percent(percent));
    if percent >= 100.0 {
        cell.fg(Color::Green).add_attribute(Attribute::Bold)
    } else if percent > 0.0 {
        cell
    } else {
        cell.fg(Color::DarkGrey)
    }
}

fn enabled_cell(is_enabled: bool) -> Cell {
    if is_enabled {
        Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
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
