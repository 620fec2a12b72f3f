#![forbid(unsafe_code)]

use core::fmt;

use keyview_core::{ConfigError, ViewerConfig};

/// Errors surfaced to JS callers.
#[derive(Debug)]
pub enum WebError {
    /// Options object could not be turned into a [`ViewerConfig`].
    Config(ConfigError),
    /// A DOM call failed; carries the stringified JS exception.
    Dom(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Dom(msg) => write!(f, "dom: {msg}"),
        }
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Dom(_) => None,
        }
    }
}

impl From<ConfigError> for WebError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Build the viewer configuration from an options object encoded as JSON.
///
/// `None` (JS `undefined`/`null`) yields the defaults.
pub fn parse_options(json: Option<&str>) -> Result<ViewerConfig, WebError> {
    match json {
        None => Ok(ViewerConfig::default()),
        Some(json) => Ok(ViewerConfig::from_json_str(json)?),
    }
}
