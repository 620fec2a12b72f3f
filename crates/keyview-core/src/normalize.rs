#![forbid(unsafe_code)]

//! Native event → [`RecordDraft`] normalization.
//!
//! The host environment is reached only through the traits in this module:
//! - [`NativeKeyEvent`] for `keydown`/`keyup`,
//! - [`NativeInputEvent`] for `input`, `beforeinput` and the composition
//!   phases, which all share one normalization path,
//! - [`TextSurface`] for the editable element's current text.
//!
//! Normalization is pure: it reads fields and never mutates the event or the
//! surface. Missing host fields stay absent in the draft rather than failing.

use crate::record::{
    EventName, InputFields, KeyFields, KeyLocation, LockModifier, Modifiers, RecordDraft,
    RecordPayload,
};

/// Read-only view of a DOM `KeyboardEvent`.
pub trait NativeKeyEvent {
    /// DOM `type`, e.g. `keydown`.
    fn event_type(&self) -> String;
    fn shift_key(&self) -> bool;
    fn ctrl_key(&self) -> bool;
    fn alt_key(&self) -> bool;
    fn meta_key(&self) -> bool;
    fn key(&self) -> String;
    fn code(&self) -> String;
    /// Raw `location` (0 standard, 1 left, 2 right, 3 numpad).
    fn location(&self) -> u32;
    fn repeat(&self) -> bool;
    fn is_composing(&self) -> bool;
    /// `getModifierState(lock)`.
    fn modifier_state(&self, lock: LockModifier) -> bool;
}

/// Read-only view of a DOM `InputEvent` or `CompositionEvent`.
pub trait NativeInputEvent {
    fn event_type(&self) -> String;
    fn input_type(&self) -> Option<String>;
    fn data(&self) -> Option<String>;
    fn detail(&self) -> Option<i32>;
}

/// The editable surface the events were fired on.
pub trait TextSurface {
    /// Full visible text content at the moment of the query.
    fn inner_text(&self) -> String;
}

impl TextSurface for str {
    fn inner_text(&self) -> String {
        self.to_owned()
    }
}

impl TextSurface for String {
    fn inner_text(&self) -> String {
        self.clone()
    }
}

impl<T: TextSurface + ?Sized> TextSurface for &T {
    fn inner_text(&self) -> String {
        (**self).inner_text()
    }
}

/// A native event of either category.
#[derive(Clone, Copy)]
pub enum NativeEvent<'a> {
    Key(&'a dyn NativeKeyEvent),
    Input(&'a dyn NativeInputEvent),
}

impl NativeEvent<'_> {
    #[must_use]
    pub fn event_type(&self) -> String {
        match self {
            Self::Key(ev) => ev.event_type(),
            Self::Input(ev) => ev.event_type(),
        }
    }
}

impl std::fmt::Debug for NativeEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Key(_) => "Key",
            Self::Input(_) => "Input",
        };
        f.debug_tuple(kind).field(&self.event_type()).finish()
    }
}

/// Lock modifier reported for a key event.
///
/// CapsLock wins over NumLock, which wins over ScrollLock; the other active
/// locks are not recorded.
#[must_use]
pub fn resolve_modifier_state(event: &(impl NativeKeyEvent + ?Sized)) -> Option<LockModifier> {
    LockModifier::first_active(|lock| event.modifier_state(lock))
}

/// Normalize a `keydown`/`keyup` event.
#[must_use]
pub fn from_key_event(
    event: &(impl NativeKeyEvent + ?Sized),
    surface: &(impl TextSurface + ?Sized),
) -> RecordDraft {
    RecordDraft {
        event_name: EventName::parse(&event.event_type()),
        payload: RecordPayload::Key(KeyFields {
            modifier_state: resolve_modifier_state(event),
            mods: Modifiers::from_keys(
                event.shift_key(),
                event.ctrl_key(),
                event.alt_key(),
                event.meta_key(),
            ),
            key: event.key(),
            code: event.code(),
            location: KeyLocation(event.location()),
            repeat: event.repeat(),
            is_composing: event.is_composing(),
        }),
        inner_text: surface.inner_text(),
    }
}

/// Normalize an `input`, `beforeinput` or composition event.
///
/// Key-only fields are zeroed by the record accessors; `isComposing` stays
/// `false` even for `compositionstart`/`compositionupdate`.
#[must_use]
pub fn from_input_event(
    event: &(impl NativeInputEvent + ?Sized),
    surface: &(impl TextSurface + ?Sized),
) -> RecordDraft {
    RecordDraft {
        event_name: EventName::parse(&event.event_type()),
        payload: RecordPayload::Input(InputFields {
            input_type: event.input_type(),
            data: event.data(),
            detail: event.detail(),
        }),
        inner_text: surface.inner_text(),
    }
}

/// Route a native event to the matching normalization path.
#[must_use]
pub fn normalize(event: NativeEvent<'_>, surface: &(impl TextSurface + ?Sized)) -> RecordDraft {
    match event {
        NativeEvent::Key(ev) => from_key_event(ev, surface),
        NativeEvent::Input(ev) => from_input_event(ev, surface),
    }
}
