#![forbid(unsafe_code)]

//! Viewer configuration.
//!
//! Hosts pass configuration as a JSON object with camelCase keys; every key is
//! optional and falls back to [`ViewerConfig::default`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default page heading.
pub const DEFAULT_HEADING: &str = "Content Editable Keyboard Event Viewer";

/// Default explanatory text shown under the heading.
pub const DEFAULT_DESCRIPTION: &str = "Type in the content editable area below to see the \
keyboard, input and composition events it fires.";

/// Presentation options for a viewer session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub heading: String,
    pub description: String,
    /// Show the host identification string (user agent) above the log.
    pub show_user_agent: bool,
    /// Tag `keydown` and `input` rows with a tone class.
    pub highlight_rows: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            heading: DEFAULT_HEADING.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            show_user_agent: true,
            highlight_rows: true,
        }
    }
}

impl ViewerConfig {
    /// Parse a JSON options object. Missing keys use their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Parse)
    }

    #[must_use]
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = heading.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, show: bool) -> Self {
        self.show_user_agent = show;
        self
    }

    #[must_use]
    pub fn with_row_highlight(mut self, highlight: bool) -> Self {
        self.highlight_rows = highlight;
        self
    }
}

/// Configuration loading error.
#[derive(Debug)]
pub enum ConfigError {
    /// The options object was not valid JSON or had mistyped keys.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid viewer options: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
        }
    }
}
