//! Output formatting utilities for CLI commands
//!
//! Consistent terminal rendering for filepath tables.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use nistage::FilepathTable;

/// Print a table with headers and rows
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        table.add_row(row);
    }

    println!("{}", table);
}

/// Print a filepath table, absent cells shown as "-". Rows beyond `limit`
/// are elided with a trailer line.
pub fn print_filepath_table(table: &FilepathTable, limit: usize) {
    let headers: Vec<&str> = table.columns().iter().map(String::as_str).collect();

    let rows: Vec<Vec<String>> = table
        .rows()
        .take(limit)
        .map(|row| {
            row.iter()
                .map(|cell| cell.clone().unwrap_or_else(|| "-".to_string()))
                .collect()
        })
        .collect();

    print_table(&headers, rows);

    if table.len() > limit {
        println!("... {} more rows (raise --limit to see them)", table.len() - limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_filepath_table_smoke() {
        let mut table = FilepathTable::new(["subject_id", "path"]);
        table
            .push_row(vec![
                Some("S1".to_string()),
                Some("/data/scan.nii".to_string()),
            ])
            .unwrap();
        table
            .push_row(vec![None, Some("/data/other.nii".to_string())])
            .unwrap();

        // Rendering must not panic, with or without truncation
        print_filepath_table(&table, 10);
        print_filepath_table(&table, 1);
    }
}
