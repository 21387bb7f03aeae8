//! Semantic styling for user-facing output
//!
//! Wraps `console::Style` so commands speak in intents (success, warning,
//! subtle) instead of colors. When color is off the symbols fall back to
//! plain ASCII.

use console::Style;

/// Symbols used in front of status lines
#[derive(Debug, Clone, Copy)]
pub struct Symbols {
    pub success: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub info: &'static str,
    pub bullet: &'static str,
    pub ghost: &'static str,
}

const UNICODE_SYMBOLS: Symbols = Symbols {
    success: "✓",
    error: "✗",
    warning: "!",
    info: "·",
    bullet: "•",
    ghost: "→",
};

const ASCII_SYMBOLS: Symbols = Symbols {
    success: "+",
    error: "x",
    warning: "!",
    info: "-",
    bullet: "*",
    ghost: ">",
};

/// Style manager resolved once per session
#[derive(Debug, Clone)]
pub struct StyleManager {
    color: bool,
    symbols: Symbols,
    success: Style,
    error: Style,
    warning: Style,
    info: Style,
    emphasis: Style,
    subtle: Style,
}

impl StyleManager {
    pub fn new(color: bool) -> Self {
        let style = |s: Style| s.force_styling(color);
        Self {
            color,
            symbols: if color { UNICODE_SYMBOLS } else { ASCII_SYMBOLS },
            success: style(Style::new().green()),
            error: style(Style::new().red().bold()),
            warning: style(Style::new().yellow()),
            info: style(Style::new().cyan()),
            emphasis: style(Style::new().bold()),
            subtle: style(Style::new().dim()),
        }
    }

    /// Uncolored ASCII styling, used by tests and piped output
    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    pub fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    pub fn style_success(&self, text: &str) -> String {
        self.success.apply_to(text).to_string()
    }

    pub fn style_error(&self, text: &str) -> String {
        self.error.apply_to(text).to_string()
    }

    pub fn style_warning(&self, text: &str) -> String {
        self.warning.apply_to(text).to_string()
    }

    pub fn style_info(&self, text: &str) -> String {
        self.info.apply_to(text).to_string()
    }

    pub fn style_emphasis(&self, text: &str) -> String {
        self.emphasis.apply_to(text).to_string()
    }

    pub fn style_subtle(&self, text: &str) -> String {
        self.subtle.apply_to(text).to_string()
    }

    pub fn format_success(&self, message: &str) -> String {
        format!("{} {}", self.style_success(self.symbols.success), message)
    }

    pub fn format_error(&self, message: &str) -> String {
        format!("{} {}", self.style_error(self.symbols.error), message)
    }

    pub fn format_warning(&self, message: &str) -> String {
        format!("{} {}", self.style_warning(self.symbols.warning), message)
    }

    pub fn format_info(&self, message: &str) -> String {
        format!("{} {}", self.style_info(self.symbols.info), message)
    }

    pub fn format_bullet(&self, item: &str) -> String {
        format!("  {} {}", self.symbols.bullet, item)
    }
}

#[cfg(test)]
mod tests {
    include!("styling.test.rs");
}
