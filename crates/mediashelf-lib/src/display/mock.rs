//! Mock display provider that records every call for assertions

use super::providers::*;
use std::sync::{Arc, Mutex};

/// Recorded display call
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    StatusSuccess { item: String, details: String },
    StatusError { item: String, details: String },
    StatusWarning { message: String },
    StatusInfo { message: String },
    StatusMessage { text: String },
    StatusEmphasis { text: String },
    StatusSubtle { text: String },
    StatusList { items: Vec<String> },
    StatusSection { title: String },
    StructuredTable { headers: Vec<String>, rows: Vec<Vec<String>> },
    StructuredProperties { pairs: Vec<(String, String)> },
}

impl DisplayCall {
    pub fn call_type(&self) -> &'static str {
        match self {
            DisplayCall::StatusSuccess { .. } => "status_success",
            DisplayCall::StatusError { .. } => "status_error",
            DisplayCall::StatusWarning { .. } => "status_warning",
            DisplayCall::StatusInfo { .. } => "status_info",
            DisplayCall::StatusMessage { .. } => "status_message",
            DisplayCall::StatusEmphasis { .. } => "status_emphasis",
            DisplayCall::StatusSubtle { .. } => "status_subtle",
            DisplayCall::StatusList { .. } => "status_list",
            DisplayCall::StatusSection { .. } => "status_section",
            DisplayCall::StructuredTable { .. } => "structured_table",
            DisplayCall::StructuredProperties { .. } => "structured_properties",
        }
    }

    /// Every piece of text the call would have shown
    pub fn text(&self) -> String {
        match self {
            DisplayCall::StatusSuccess { item, details }
            | DisplayCall::StatusError { item, details } => format!("{} {}", item, details),
            DisplayCall::StatusWarning { message } | DisplayCall::StatusInfo { message } => {
                message.clone()
            }
            DisplayCall::StatusMessage { text }
            | DisplayCall::StatusEmphasis { text }
            | DisplayCall::StatusSubtle { text } => text.clone(),
            DisplayCall::StatusList { items } => items.join("\n"),
            DisplayCall::StatusSection { title } => title.clone(),
            DisplayCall::StructuredTable { headers, rows } => {
                let mut lines = vec![headers.join(" ")];
                lines.extend(rows.iter().map(|row| row.join(" ")));
                lines.join("\n")
            }
            DisplayCall::StructuredProperties { pairs } => pairs
                .iter()
                .map(|(key, value)| format!("{} {}", key, value))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Display provider that records calls instead of printing
#[derive(Clone, Default)]
pub struct MockDisplayProvider {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl MockDisplayProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_calls(&self) -> Vec<DisplayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn has_call(&self, expected: &DisplayCall) -> bool {
        self.get_calls().contains(expected)
    }

    pub fn count_calls(&self, call_type: &str) -> usize {
        self.get_calls()
            .iter()
            .filter(|call| call.call_type() == call_type)
            .count()
    }

    /// True when any recorded call showed text containing `needle`
    pub fn shows(&self, needle: &str) -> bool {
        self.get_calls().iter().any(|call| call.text().contains(needle))
    }

    fn record(&self, call: DisplayCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl DisplayProvider for MockDisplayProvider {
    fn status(&self) -> Box<dyn StatusProvider + '_> {
        Box::new(self.clone())
    }

    fn table(&self) -> Box<dyn StructuredProvider + '_> {
        Box::new(self.clone())
    }
}

impl StatusProvider for MockDisplayProvider {
    fn success(&self, item: &str, details: &str) {
        self.record(DisplayCall::StatusSuccess {
            item: item.to_string(),
            details: details.to_string(),
        });
    }

    fn error(&self, item: &str, details: &str) {
        self.record(DisplayCall::StatusError {
            item: item.to_string(),
            details: details.to_string(),
        });
    }

    fn warning(&self, message: &str) {
        self.record(DisplayCall::StatusWarning {
            message: message.to_string(),
        });
    }

    fn info(&self, message: &str) {
        self.record(DisplayCall::StatusInfo {
            message: message.to_string(),
        });
    }

    fn message(&self, text: &str) {
        self.record(DisplayCall::StatusMessage {
            text: text.to_string(),
        });
    }

    fn emphasis(&self, text: &str) {
        self.record(DisplayCall::StatusEmphasis {
            text: text.to_string(),
        });
    }

    fn subtle(&self, text: &str) {
        self.record(DisplayCall::StatusSubtle {
            text: text.to_string(),
        });
    }

    fn list(&self, items: &[&str]) {
        self.record(DisplayCall::StatusList {
            items: items.iter().map(|s| s.to_string()).collect(),
        });
    }

    fn section(&self, title: &str) {
        self.record(DisplayCall::StatusSection {
            title: title.to_string(),
        });
    }
}

impl StructuredProvider for MockDisplayProvider {
    fn table(&self, headers: &[&str], rows: &[Vec<String>]) {
        self.record(DisplayCall::StructuredTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows.to_vec(),
        });
    }

    fn properties(&self, pairs: &[(&str, &str)]) {
        self.record(DisplayCall::StructuredProperties {
            pairs: pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        });
    }
}

#[cfg(test)]
mod tests {
    include!("mock.test.rs");
}
