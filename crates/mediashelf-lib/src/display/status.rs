//! Status lines for user feedback
//!
//! Every line is rendered to a `String` first so formatting can be checked
//! without capturing stdout.

use super::styling::StyleManager;

/// Status display bound to a style manager
pub struct StatusDisplay<'a> {
    styling: &'a StyleManager,
}

impl<'a> StatusDisplay<'a> {
    pub(crate) fn new(styling: &'a StyleManager) -> Self {
        Self { styling }
    }

    fn labelled(item: &str, details: &str) -> String {
        if details.is_empty() {
            item.to_string()
        } else {
            format!("{}: {}", item, details)
        }
    }

    /// `✓ Added: Dune`
    pub fn render_success(&self, item: &str, details: &str) -> String {
        self.styling.format_success(&Self::labelled(item, details))
    }

    /// `✗ add: no matches`
    pub fn render_error(&self, item: &str, details: &str) -> String {
        self.styling.format_error(&Self::labelled(item, details))
    }

    pub fn render_warning(&self, message: &str) -> String {
        self.styling.format_warning(message)
    }

    pub fn render_info(&self, message: &str) -> String {
        self.styling.format_info(message)
    }

    pub fn render_list(&self, items: &[&str]) -> Vec<String> {
        items
            .iter()
            .map(|item| self.styling.format_bullet(item))
            .collect()
    }

    pub fn success(&self, item: &str, details: &str) {
        println!("{}", self.render_success(item, details));
    }

    pub fn error(&self, item: &str, details: &str) {
        eprintln!("{}", self.render_error(item, details));
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.render_warning(message));
    }

    pub fn info(&self, message: &str) {
        println!("{}", self.render_info(message));
    }

    pub fn message(&self, text: &str) {
        println!("{}", text);
    }

    pub fn emphasis(&self, text: &str) {
        println!("{}", self.styling.style_emphasis(text));
    }

    pub fn subtle(&self, text: &str) {
        println!("{}", self.styling.style_subtle(text));
    }

    pub fn list(&self, items: &[&str]) {
        for line in self.render_list(items) {
            println!("{}", line);
        }
    }

    pub fn section(&self, title: &str) {
        println!();
        println!("{}", self.styling.style_emphasis(title));
    }
}

#[cfg(test)]
mod tests {
    include!("status.test.rs");
}
