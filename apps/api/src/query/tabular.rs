//! Tabular query results and their plain-text rendering.

use serde::Serialize;
use serde_json::{Map, Value};

/// Cells longer than this are cut in the text rendering.
const MAX_CELL_CHARS: usize = 60;
/// Rows beyond this are elided from the text rendering.
const MAX_TEXT_ROWS: usize = 50;

/// Rows returned by the store: ordered column names plus one value per column per row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TabularResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl TabularResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// One `column -> value` object per row, columns in result order.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect::<Map<String, Value>>()
            })
            .collect()
    }

    /// Renders an aligned plain-text table for the summarization prompt.
    pub fn to_text_table(&self) -> String {
        if self.columns.is_empty() {
            return "(no rows)".to_string();
        }

        let shown = self.rows.len().min(MAX_TEXT_ROWS);
        let cells: Vec<Vec<String>> = self.rows[..shown]
            .iter()
            .map(|row| row.iter().map(render_cell).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = vec![format_line(&self.columns, &widths)];
        lines.extend(cells.iter().map(|row| format_line(row, &widths)));

        if self.is_empty() {
            lines.push("(no rows)".to_string());
        } else if self.rows.len() > shown {
            lines.push(format!("... ({} more rows)", self.rows.len() - shown));
        }

        lines.join("\n")
    }
}

fn render_cell(value: &Value) -> String {
    let text = match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.replace('\n', " "),
        other => other.to_string(),
    };

    if text.chars().count() > MAX_CELL_CHARS {
        let cut: String = text.chars().take(MAX_CELL_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        text
    }
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
