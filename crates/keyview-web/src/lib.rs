#![forbid(unsafe_code)]

//! WASM frontend for KeyView.
//!
//! Exposes a `wasm-bindgen` handle ([`KeyViewWeb`]) that:
//! - listens for key, input and composition events on a `contenteditable`
//!   element,
//! - feeds them through `keyview-core` normalization into the event log,
//! - prepends one `<tr>` per recorded event to a host-provided `<tbody>`,
//! - hands the log to JS as JSON on request.
//!
//! Styling is left to the host page; rows and cells only carry class names.

pub mod error;
pub mod events;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use error::{WebError, parse_options};

#[cfg(target_arch = "wasm32")]
pub use wasm::KeyViewWeb;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct KeyViewWeb {
    viewer: keyview_core::Viewer,
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyViewWeb {
    /// Create a session from an options object already encoded as JSON.
    pub fn new(options: Option<&str>) -> Result<Self, WebError> {
        let config = parse_options(options)?;
        Ok(Self {
            viewer: keyview_core::Viewer::new(config, ""),
        })
    }

    #[must_use]
    pub const fn viewer(&self) -> &keyview_core::Viewer {
        &self.viewer
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn native_stub_applies_options() {
        let web = KeyViewWeb::new(Some(r#"{"highlightRows":false}"#)).expect("options");
        assert!(!web.viewer().config().highlight_rows);
        assert!(web.viewer().log().is_empty());
    }
}
