use crate::grid::Grid;
use serde::Serialize;

/// Rows rendered per sheet, header row included.
pub const DISPLAY_ROW_LIMIT: usize = 100;

pub const TRUNCATED_NOTICE: &str = "Display limited to the first 100 rows for performance";

/// What the editor renders for the active sheet.
///
/// Only the view is capped; the grid keeps every row and exports all of them.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GridView {
    pub sheet: String,
    pub sheet_names: Vec<String>,
    pub headers: Vec<String>,
    /// Body rows, starting at grid row 1, padded to the column count.
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
    pub truncated: bool,
    pub notice: Option<String>,
    pub dirty: bool,
}

impl GridView {
    pub fn build(grid: &Grid, sheet: &str, sheet_names: &[String], dirty: bool) -> Self {
        let columns = grid.column_count();
        let total_rows = grid.row_count();
        let truncated = total_rows > DISPLAY_ROW_LIMIT;

        let headers = (0..columns)
            .map(|c| {
                let label = grid.read_cell(0, c);
                if label.is_empty() {
                    format!("Col {}", c + 1)
                } else {
                    label
                }
            })
            .collect();

        let rows = (1..total_rows.min(DISPLAY_ROW_LIMIT))
            .map(|r| (0..columns).map(|c| grid.read_cell(r, c)).collect())
            .collect();

        GridView {
            sheet: sheet.to_string(),
            sheet_names: sheet_names.to_vec(),
            headers,
            rows,
            total_rows,
            truncated,
            notice: truncated.then(|| TRUNCATED_NOTICE.to_string()),
            dirty,
        }
    }

    /// Plain-text table for terminals.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("     {}\n", self.headers.join(" | ")));
        for (i, row) in self.rows.iter().enumerate() {
            out.push_str(&format!("{:>4} {}\n", i + 2, row.join(" | ")));
        }
        if let Some(notice) = &self.notice {
            out.push_str(notice);
            out.push('\n');
        }
        out
    }
}

/// Human-readable size: `512 B`, `3 KB`, `2 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{} KB", (bytes as f64 / KB as f64).round() as u64)
    } else {
        format!("{} MB", (bytes as f64 / MB as f64).round() as u64)
    }
}
