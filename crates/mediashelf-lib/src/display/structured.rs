//! Structured output (tables, key-value pairs)

use super::styling::StyleManager;
use console::{Alignment, measure_text_width, pad_str};
use std::cmp;

const COLUMN_GAP: &str = "  ";

/// Structured display bound to a style manager
pub struct StructuredDisplay<'a> {
    styling: &'a StyleManager,
    max_width: Option<usize>,
}

impl<'a> StructuredDisplay<'a> {
    pub(crate) fn new(styling: &'a StyleManager, max_width: Option<usize>) -> Self {
        Self { styling, max_width }
    }

    pub fn table(&self) -> TableDisplay<'a> {
        TableDisplay {
            styling: self.styling,
            headers: Vec::new(),
            rows: Vec::new(),
            max_width: self.max_width,
        }
    }

    /// Render aligned `key  value` lines
    pub fn render_pairs(&self, pairs: &[(&str, &str)]) -> Vec<String> {
        let key_width = pairs
            .iter()
            .map(|(key, _)| measure_text_width(key))
            .max()
            .unwrap_or(0);

        pairs
            .iter()
            .map(|(key, value)| {
                let key = pad_str(key, key_width, Alignment::Left, None);
                format!("{}{}{}", self.styling.style_subtle(&key), COLUMN_GAP, value)
            })
            .collect()
    }

    pub fn pairs(&self, pairs: &[(&str, &str)]) {
        for line in self.render_pairs(pairs) {
            println!("{}", line);
        }
    }
}

/// Table builder
pub struct TableDisplay<'a> {
    styling: &'a StyleManager,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    max_width: Option<usize>,
}

impl<'a> TableDisplay<'a> {
    pub fn header(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn row<S: AsRef<str>>(mut self, cells: &[S]) -> Self {
        self.rows
            .push(cells.iter().map(|s| s.as_ref().to_string()).collect());
        self
    }

    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    fn column_widths(&self) -> Vec<usize> {
        let columns = cmp::max(
            self.headers.len(),
            self.rows.iter().map(Vec::len).max().unwrap_or(0),
        );
        let mut widths = vec![0; columns];
        for line in std::iter::once(&self.headers).chain(self.rows.iter()) {
            for (i, cell) in line.iter().enumerate() {
                widths[i] = cmp::max(widths[i], measure_text_width(cell));
            }
        }

        // Shrink the widest column first until the row fits
        if let Some(limit) = self.max_width {
            let gaps = COLUMN_GAP.len() * columns.saturating_sub(1);
            while widths.iter().sum::<usize>() + gaps > limit {
                let Some((widest, width)) = widths
                    .iter()
                    .copied()
                    .enumerate()
                    .max_by_key(|(_, width)| *width)
                else {
                    break;
                };
                if width <= 4 {
                    break;
                }
                widths[widest] = width - 1;
            }
        }
        widths
    }

    fn render_line(&self, cells: &[String], widths: &[usize], header: bool) -> String {
        let line = widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let cell = pad_str(cell, *width, Alignment::Left, Some("..."));
                if header {
                    self.styling.style_emphasis(&cell)
                } else {
                    cell.into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        line.trim_end().to_string()
    }

    pub fn render_lines(&self) -> Vec<String> {
        if self.headers.is_empty() && self.rows.is_empty() {
            return Vec::new();
        }
        let widths = self.column_widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        if !self.headers.is_empty() {
            lines.push(self.render_line(&self.headers, &widths, true));
        }
        for row in &self.rows {
            lines.push(self.render_line(row, &widths, false));
        }
        lines
    }

    pub fn render(self) {
        for line in self.render_lines() {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    include!("structured.test.rs");
}
