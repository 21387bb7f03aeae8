//! Live display provider writing to the terminal

use super::providers::*;
use super::status::StatusDisplay;
use super::structured::StructuredDisplay;
use super::styling::StyleManager;
use console::Term;

/// Terminal-backed display provider
pub struct LiveDisplayProvider {
    styling: StyleManager,
    max_width: Option<usize>,
}

impl LiveDisplayProvider {
    pub fn new(color: bool) -> Self {
        let term = Term::stdout();
        let max_width = if term.is_term() {
            Some(term.size().1 as usize)
        } else {
            None
        };
        Self {
            styling: StyleManager::new(color),
            max_width,
        }
    }

    pub fn styling(&self) -> &StyleManager {
        &self.styling
    }
}

impl DisplayProvider for LiveDisplayProvider {
    fn status(&self) -> Box<dyn StatusProvider + '_> {
        Box::new(LiveStatusProvider {
            status: StatusDisplay::new(&self.styling),
        })
    }

    fn table(&self) -> Box<dyn StructuredProvider + '_> {
        Box::new(LiveStructuredProvider {
            structured: StructuredDisplay::new(&self.styling, self.max_width),
        })
    }
}

struct LiveStatusProvider<'a> {
    status: StatusDisplay<'a>,
}

impl StatusProvider for LiveStatusProvider<'_> {
    fn success(&self, item: &str, details: &str) {
        self.status.success(item, details);
    }

    fn error(&self, item: &str, details: &str) {
        self.status.error(item, details);
    }

    fn warning(&self, message: &str) {
        self.status.warning(message);
    }

    fn info(&self, message: &str) {
        self.status.info(message);
    }

    fn message(&self, text: &str) {
        self.status.message(text);
    }

    fn emphasis(&self, text: &str) {
        self.status.emphasis(text);
    }

    fn subtle(&self, text: &str) {
        self.status.subtle(text);
    }

    fn list(&self, items: &[&str]) {
        self.status.list(items);
    }

    fn section(&self, title: &str) {
        self.status.section(title);
    }
}

struct LiveStructuredProvider<'a> {
    structured: StructuredDisplay<'a>,
}

impl StructuredProvider for LiveStructuredProvider<'_> {
    fn table(&self, headers: &[&str], rows: &[Vec<String>]) {
        let mut table = self.structured.table().header(headers);
        for row in rows {
            table = table.row(row.as_slice());
        }
        table.render();
    }

    fn properties(&self, pairs: &[(&str, &str)]) {
        self.structured.pairs(pairs);
    }
}
