#![forbid(unsafe_code)]

//! Append-only, newest-first event log with persistent snapshots.
//!
//! Records are shared, never mutated. [`EventLog::append`] returns a new log
//! that shares every existing record with its predecessor and adds one node at
//! the head, so a renderer holding an older snapshot keeps seeing exactly what
//! it saw before. The id counter lives inside the same value, which makes each
//! state transition a single value replacement.
//!
//! There is no capacity bound and no rejection path: append always succeeds.

use std::sync::Arc;

use crate::record::{EventRecord, RecordDraft};

struct Node {
    record: EventRecord,
    next: Option<Arc<Node>>,
}

/// `{events, nextId}` state of the viewer.
#[derive(Clone, Default)]
pub struct EventLog {
    head: Option<Arc<Node>>,
    len: usize,
    next_id: u64,
}

impl EventLog {
    /// An empty log whose first record will get id `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head: None,
            len: 0,
            next_id: 0,
        }
    }

    /// Assign the next id to `draft` and return the resulting log.
    ///
    /// `self` is left untouched.
    #[must_use]
    pub fn append(&self, draft: RecordDraft) -> Self {
        let mut next = self.clone();
        next.push(draft);
        next
    }

    /// Same as `*self = self.append(draft)`, returning the new record.
    ///
    /// Clones taken earlier keep their own head and are not affected.
    pub fn push(&mut self, draft: RecordDraft) -> &EventRecord {
        let record = draft.with_id(self.next_id);
        crate::trace!(
            id = record.id(),
            event = %record.event_name(),
            "appended event record"
        );
        self.len += 1;
        self.next_id += 1;
        let next = self.head.take();
        &self.head.insert(Arc::new(Node { record, next })).record
    }

    /// Id the next appended record will receive.
    #[must_use]
    pub const fn next_id(&self) -> u64 {
        self.next_id
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recently appended record.
    #[must_use]
    pub fn newest(&self) -> Option<&EventRecord> {
        self.head.as_deref().map(|node| &node.record)
    }

    /// Records, newest first.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
            remaining: self.len,
        }
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&EventRecord> {
        if id >= self.next_id {
            return None;
        }
        // Ids are contiguous and the newest id is `next_id - 1`.
        let depth = usize::try_from(self.next_id - 1 - id).ok()?;
        self.iter().nth(depth)
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("len", &self.len)
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl PartialEq for EventLog {
    fn eq(&self, other: &Self) -> bool {
        self.next_id == other.next_id && self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for EventLog {}

// Unlink iteratively so very long sessions do not recurse once per node on drop.
impl Drop for EventLog {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut owned) => next = owned.next.take(),
                Err(_) => break,
            }
        }
    }
}

/// Newest-first iterator over an [`EventLog`].
pub struct Iter<'a> {
    next: Option<&'a Node>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a EventRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a EventRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
