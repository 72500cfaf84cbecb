//! Console tables for rosters, people and attendance counts.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rollcall_core::{AttendanceSummary, summarize};
use rollcall_model::{Person, Roster};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One row per stored roster.
pub fn rosters_table(rosters: &[Roster]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Id"),
        header_cell("People"),
        header_cell("Present"),
        header_cell("Created"),
        header_cell("Modified"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for roster in rosters {
        let summary = summarize(roster);
        table.add_row(vec![
            Cell::new(roster.name())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            dim_cell(roster.id()),
            Cell::new(summary.total),
            count_cell(summary.present, Color::Green),
            Cell::new(roster.created_at().format(DATE_FORMAT)),
            Cell::new(roster.modified_at().format(DATE_FORMAT)),
        ]);
    }
    table
}

/// People in the order given.
pub fn people_table(people: &[&Person]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Id"),
        header_cell("Given"),
        header_cell("Family"),
        header_cell("National ID"),
        header_cell("Phone"),
        header_cell("Status"),
        header_cell("Origin"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Center);
    for (index, person) in people.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            dim_cell(person.id()),
            Cell::new(person.given_name()),
            Cell::new(person.family_name()),
            optional_cell(person.national_id()),
            optional_cell(person.phone()),
            status_cell(person.present()),
            Cell::new(person.origin().label()),
        ]);
    }
    table
}

/// Attendance counts split by origin.
pub fn summary_table(summary: &AttendanceSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(""),
        header_cell("Imported"),
        header_cell("Manual"),
        header_cell("Total"),
    ]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for index in 1..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new("Present").fg(Color::Green),
        Cell::new(summary.present_from_import),
        Cell::new(summary.present_manual),
        count_cell(summary.present, Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Absent").fg(Color::Red),
        Cell::new(summary.absent_from_import),
        Cell::new(summary.absent_manual),
        count_cell(summary.absent, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.imported()).add_attribute(Attribute::Bold),
        Cell::new(summary.manual()).add_attribute(Attribute::Bold),
        Cell::new(summary.total).add_attribute(Attribute::Bold),
    ]);
    table
}

/// Attendance rate as a percentage, e.g. `60.0%`.
pub fn format_rate(summary: &AttendanceSummary) -> String {
    format!("{:.1}%", summary.attendance_rate())
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn status_cell(present: bool) -> Cell {
    if present {
        Cell::new("present").fg(Color::Green)
    } else {
        Cell::new("absent").fg(Color::Red)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
