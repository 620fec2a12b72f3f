#![forbid(unsafe_code)]

//! One viewer session: the current log snapshot plus host identification.
//!
//! The session is single-writer. Each [`Viewer::dispatch`] runs normalize →
//! append → replace synchronously, so there is never more than one append in
//! flight and ids follow delivery order exactly. Snapshots handed out by
//! [`Viewer::snapshot`] are immutable and stay valid after later dispatches.

use crate::config::ViewerConfig;
use crate::log::EventLog;
use crate::normalize::{NativeEvent, TextSurface, normalize};
use crate::record::EventRecord;

#[derive(Debug, Clone, Default)]
pub struct Viewer {
    config: ViewerConfig,
    host_id: String,
    log: EventLog,
}

impl Viewer {
    /// A session with an empty log.
    ///
    /// `host_id` is displayed as-is (typically the browser user agent).
    #[must_use]
    pub fn new(config: ViewerConfig, host_id: impl Into<String>) -> Self {
        let host_id = host_id.into();
        crate::debug!(host = %host_id, "viewer session started");
        Self {
            config,
            host_id,
            log: EventLog::new(),
        }
    }

    /// Normalize `event`, append it, and return the new record.
    pub fn dispatch(
        &mut self,
        event: NativeEvent<'_>,
        surface: &(impl TextSurface + ?Sized),
    ) -> &EventRecord {
        self.log.push(normalize(event, surface))
    }

    /// Current immutable log snapshot.
    #[must_use]
    pub fn snapshot(&self) -> EventLog {
        self.log.clone()
    }

    #[must_use]
    pub const fn log(&self) -> &EventLog {
        &self.log
    }

    #[must_use]
    pub const fn next_id(&self) -> u64 {
        self.log.next_id()
    }

    #[must_use]
    pub fn host_id(&self) -> &str {
        &self.host_id
    }

    #[must_use]
    pub const fn config(&self) -> &ViewerConfig {
        &self.config
    }
}
