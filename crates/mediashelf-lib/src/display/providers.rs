//! Display provider traits for dependency injection
//!
//! Commands talk to the user only through these traits, so their output can
//! be recorded and asserted in tests.

/// Provider trait for all user-facing communication
pub trait DisplayProvider {
    /// Status lines with semantic meaning
    fn status(&self) -> Box<dyn StatusProvider + '_>;

    /// Tables and key-value output
    fn table(&self) -> Box<dyn StructuredProvider + '_>;
}

/// Provider trait for status updates and user feedback
pub trait StatusProvider {
    fn success(&self, item: &str, details: &str);

    fn error(&self, item: &str, details: &str);

    fn warning(&self, message: &str);

    fn info(&self, message: &str);

    /// A line without a status symbol
    fn message(&self, text: &str);

    fn emphasis(&self, text: &str);

    /// Secondary text such as hints
    fn subtle(&self, text: &str);

    fn list(&self, items: &[&str]);

    fn section(&self, title: &str);
}

/// Provider trait for structured output
pub trait StructuredProvider {
    fn table(&self, headers: &[&str], rows: &[Vec<String>]);

    fn properties(&self, pairs: &[(&str, &str)]);
}
