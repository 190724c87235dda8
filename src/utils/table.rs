//! Table rendering utilities for CLI outputs.

use regex::Regex;

pub struct Column {
    pub header: String,
    pub width: usize,
}

impl Column {
    pub fn new(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            width,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

/// Printable width of `s`, ANSI escapes excluded.
fn visible_len(s: &str) -> usize {
    match Regex::new(r"\x1B\[[0-9;]*[mK]") {
        Ok(re) => re.replace_all(s, "").chars().count(),
        Err(_) => s.chars().count(),
    }
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(visible_len(cell));
    format!("{cell}{} ", " ".repeat(fill))
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        for col in &self.columns {
            out.push_str(&pad(&col.header, col.width));
        }
        out.push('\n');

        let total: usize = self.columns.iter().map(|c| c.width + 1).sum();
        out.push_str(&"-".repeat(total.saturating_sub(1)));
        out.push('\n');

        for row in &self.rows {
            for (i, col) in self.columns.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                out.push_str(&pad(cell, col.width));
            }
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colored_cells_keep_alignment() {
        let mut t = Table::new(vec![Column::new("A", 4), Column::new("B", 2)]);
        t.add_row(vec!["\x1b[32mok\x1b[0m".into(), "x".into()]);
        t.add_row(vec!["long".into()]);

        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "A    B  ");
        assert_eq!(lines[1], "-------");
        assert_eq!(lines[2], "\x1b[32mok\x1b[0m   x  ");
        assert_eq!(lines[3], "long    ");
    }
}
