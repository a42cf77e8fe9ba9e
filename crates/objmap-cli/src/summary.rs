use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use objmap_suggest::{Candidate, MatchKind, Suggestion};

/// Prints the review outcome to stderr.
pub fn print_summary(suggestion: &Suggestion) {
    eprintln!(
        "Mapping: {} -> {}",
        suggestion.entry.source_class, suggestion.entry.target_class
    );
    eprintln!("{}", summary_table(suggestion));
    eprintln!(
        "{} accepted, {} rejected, {} without candidate",
        suggestion.accepted.len(),
        suggestion.rejected.len(),
        suggestion.unmatched.len()
    );
}

/// One row per source field: accepted, rejected, then unmatched.
pub fn summary_table(suggestion: &Suggestion) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source field"),
        header_cell("Source type"),
        header_cell("Target field"),
        header_cell("Target type"),
        header_cell("Match"),
        header_cell("Decision"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Center);
    align_column(&mut table, 5, CellAlignment::Center);

    for candidate in &suggestion.accepted {
        table.add_row(candidate_row(
            candidate,
            Cell::new("accepted")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ));
    }
    for candidate in &suggestion.rejected {
        table.add_row(candidate_row(candidate, Cell::new("rejected").fg(Color::Yellow)));
    }
    for field in &suggestion.unmatched {
        table.add_row(vec![
            Cell::new(&field.name),
            Cell::new(&field.type_name),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("no match"),
        ]);
    }
    table
}

fn candidate_row(candidate: &Candidate, decision: Cell) -> Vec<Cell> {
    vec![
        Cell::new(&candidate.source.name),
        Cell::new(&candidate.source.type_name),
        Cell::new(&candidate.target.name),
        Cell::new(&candidate.target.type_name),
        match_cell(candidate.kind),
        decision,
    ]
}

fn match_cell(kind: MatchKind) -> Cell {
    match kind {
        MatchKind::Exact => Cell::new("exact").fg(Color::Green),
        MatchKind::Fuzzy { distance } => Cell::new(format!("distance {distance}")),
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
