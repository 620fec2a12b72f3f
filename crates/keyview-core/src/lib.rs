#![forbid(unsafe_code)]

//! Core of the KeyView keyboard/IME event viewer.
//!
//! Native keyboard, input and composition events are normalized into one
//! [`record::EventRecord`] shape and prepended to a persistent, newest-first
//! [`log::EventLog`]. Everything here is host-agnostic: DOM bindings live in
//! `keyview-web`, which implements the [`normalize`] traits.

pub mod config;
pub mod log;
pub mod logging;
pub mod normalize;
pub mod record;
pub mod session;
pub mod view;
pub mod wire;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};

pub use config::{ConfigError, ViewerConfig};
pub use log::EventLog;
pub use normalize::{NativeEvent, NativeInputEvent, NativeKeyEvent, TextSurface};
pub use record::{EventName, EventRecord, KeyLocation, LockModifier, RecordDraft};
pub use session::Viewer;
