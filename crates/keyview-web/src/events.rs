#![forbid(unsafe_code)]

//! DOM event types the viewer listens to on the editable surface.

/// Which normalization path a DOM event type takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Key,
    Input,
}

/// Listened event types, in registration order.
pub const LISTENED_EVENTS: [(&str, EventCategory); 7] = [
    ("keydown", EventCategory::Key),
    ("keyup", EventCategory::Key),
    ("input", EventCategory::Input),
    ("beforeinput", EventCategory::Input),
    ("compositionstart", EventCategory::Input),
    ("compositionupdate", EventCategory::Input),
    ("compositionend", EventCategory::Input),
];

/// Category for an arbitrary DOM type string. Anything that is not
/// `keydown`/`keyup` is treated as an input-shaped event.
#[must_use]
pub fn category_of(event_type: &str) -> EventCategory {
    match event_type {
        "keydown" | "keyup" => EventCategory::Key,
        _ => EventCategory::Input,
    }
}

/// Registered handles, one per entry of [`LISTENED_EVENTS`].
pub type Registrations<T> = Vec<(&'static str, T)>;

/// Register a handler for every listened event type.
///
/// If a registration fails, every handle registered before it is passed to
/// `rollback` (newest first) and the error is returned, so no partial set is
/// left installed.
pub fn register_all<T, E>(
    mut register: impl FnMut(&'static str, EventCategory) -> Result<T, E>,
    mut rollback: impl FnMut(&'static str, T),
) -> Result<Registrations<T>, E> {
    let mut done = Vec::with_capacity(LISTENED_EVENTS.len());
    for (event_type, category) in LISTENED_EVENTS {
        match register(event_type, category) {
            Ok(handle) => done.push((event_type, handle)),
            Err(err) => {
                while let Some((event_type, handle)) = done.pop() {
                    rollback(event_type, handle);
                }
                return Err(err);
            }
        }
    }
    Ok(done)
}
