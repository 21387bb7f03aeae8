//! Standard color environment variables
//!
//! Read with `envy` so that the conventional variables (`NO_COLOR`,
//! `FORCE_COLOR`, `CLICOLOR`, `CI`, `TERM`) adjust the color intent before
//! CLI flags are applied.

use crate::primitives::{ColorIntent, ConfigError};
use serde::Deserialize;

/// Color-related variables from the process environment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentConfig {
    pub no_color: Option<String>,
    pub force_color: Option<String>,
    pub clicolor: Option<String>,
    pub ci: Option<String>,
    pub term: Option<String>,
}

impl EnvironmentConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(envy::from_env()?)
    }

    /// Explicit `FORCE_COLOR` value, if it parses
    fn forced(&self) -> Option<ColorIntent> {
        match self.force_color.as_deref()? {
            "0" | "false" => Some(ColorIntent::Never),
            "1" | "2" | "3" | "true" => Some(ColorIntent::Always),
            _ => None,
        }
    }

    fn suppressed(&self) -> bool {
        self.ci.is_some()
            || self.term.as_deref() == Some("dumb")
            || self.clicolor.as_deref() == Some("0")
            || self.no_color.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Adjust `color` for the environment
    ///
    /// `FORCE_COLOR` wins over everything; otherwise CI, a dumb terminal,
    /// `CLICOLOR=0` and a non-empty `NO_COLOR` each turn color off.
    pub fn apply_color_config(&self, color: ColorIntent) -> ColorIntent {
        if let Some(forced) = self.forced() {
            return forced;
        }
        if self.suppressed() {
            return ColorIntent::Never;
        }
        color
    }
}

#[cfg(test)]
mod tests {
    include!("env.test.rs");
}
