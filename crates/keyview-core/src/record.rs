#![forbid(unsafe_code)]

//! Uniform record shape for every observed keyboard/input/composition event.
//!
//! A record is a tagged variant over the two native event categories
//! ([`RecordPayload::Key`] and [`RecordPayload::Input`]). Renderers that want
//! the flat, table-shaped view use the accessor methods on [`EventRecord`],
//! which return neutral values (`false`, `""`, `0`) for fields that carry no
//! information in the other category. A record therefore can never be a
//! hybrid of both categories.

use std::borrow::Cow;
use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Held modifier keys reported on a key event.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

impl Modifiers {
    /// Build the set from the four DOM booleans.
    #[must_use]
    pub fn from_keys(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        let mut mods = Self::empty();
        mods.set(Self::SHIFT, shift);
        mods.set(Self::CTRL, ctrl);
        mods.set(Self::ALT, alt);
        mods.set(Self::META, meta);
        mods
    }
}

bitflags! {
    /// Toggled lock states active at the time of a key event.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LockState: u8 {
        const CAPS_LOCK   = 0b001;
        const NUM_LOCK    = 0b010;
        const SCROLL_LOCK = 0b100;
    }
}

/// A single lock modifier, as named by `getModifierState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockModifier {
    CapsLock,
    NumLock,
    ScrollLock,
}

impl LockModifier {
    /// Lookup order used when several locks are active at once.
    ///
    /// Only the first active entry is reported.
    pub const PRIORITY: [Self; 3] = [Self::CapsLock, Self::NumLock, Self::ScrollLock];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CapsLock => "CapsLock",
            Self::NumLock => "NumLock",
            Self::ScrollLock => "ScrollLock",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "CapsLock" => Some(Self::CapsLock),
            "NumLock" => Some(Self::NumLock),
            "ScrollLock" => Some(Self::ScrollLock),
            _ => None,
        }
    }

    #[must_use]
    pub const fn flag(self) -> LockState {
        match self {
            Self::CapsLock => LockState::CAPS_LOCK,
            Self::NumLock => LockState::NUM_LOCK,
            Self::ScrollLock => LockState::SCROLL_LOCK,
        }
    }

    /// Set of locks named in `names`; unknown names are ignored.
    #[must_use]
    pub fn parse_set<'a>(names: impl IntoIterator<Item = &'a str>) -> LockState {
        names
            .into_iter()
            .filter_map(Self::from_name)
            .map(Self::flag)
            .collect()
    }

    /// First active lock in [`Self::PRIORITY`] order, if any.
    #[must_use]
    pub fn first_active(is_active: impl Fn(Self) -> bool) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|&lock| is_active(lock))
    }
}

impl fmt::Display for LockModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DOM event type string for a recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventName {
    KeyDown,
    KeyUp,
    Input,
    BeforeInput,
    CompositionStart,
    CompositionUpdate,
    CompositionEnd,
    /// Any other type string, kept verbatim.
    Other(Box<str>),
}

impl EventName {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "keydown" => Self::KeyDown,
            "keyup" => Self::KeyUp,
            "input" => Self::Input,
            "beforeinput" => Self::BeforeInput,
            "compositionstart" => Self::CompositionStart,
            "compositionupdate" => Self::CompositionUpdate,
            "compositionend" => Self::CompositionEnd,
            other => Self::Other(other.into()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::Input => "input",
            Self::BeforeInput => "beforeinput",
            Self::CompositionStart => "compositionstart",
            Self::CompositionUpdate => "compositionupdate",
            Self::CompositionEnd => "compositionend",
            Self::Other(raw) => raw,
        }
    }

    /// `true` for `keydown`/`keyup`.
    #[must_use]
    pub const fn is_key(&self) -> bool {
        matches!(self, Self::KeyDown | Self::KeyUp)
    }

    /// `true` for the three composition phases.
    #[must_use]
    pub const fn is_composition(&self) -> bool {
        matches!(
            self,
            Self::CompositionStart | Self::CompositionUpdate | Self::CompositionEnd
        )
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw `KeyboardEvent.location` value.
///
/// The stored value is never decoded; [`KeyLocation::label`] is a display-time
/// mapping only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyLocation(pub u32);

impl KeyLocation {
    pub const STANDARD: Self = Self(0);
    pub const LEFT: Self = Self(1);
    pub const RIGHT: Self = Self(2);
    pub const NUMPAD: Self = Self(3);

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// `LEFT`, `RIGHT`, `NUMPAD`, or the raw number for anything else.
    #[must_use]
    pub fn label(self) -> Cow<'static, str> {
        match self {
            Self::LEFT => Cow::Borrowed("LEFT"),
            Self::RIGHT => Cow::Borrowed("RIGHT"),
            Self::NUMPAD => Cow::Borrowed("NUMPAD"),
            Self(raw) => Cow::Owned(raw.to_string()),
        }
    }
}

impl fmt::Display for KeyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Fields read from a `keydown`/`keyup` event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyFields {
    pub modifier_state: Option<LockModifier>,
    pub mods: Modifiers,
    pub key: String,
    pub code: String,
    pub location: KeyLocation,
    pub repeat: bool,
    pub is_composing: bool,
}

/// Fields read from an input, beforeinput or composition event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InputFields {
    pub input_type: Option<String>,
    /// `None` when the host reported `null` or omitted the field.
    pub data: Option<String>,
    pub detail: Option<i32>,
}

/// Category-specific part of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordPayload {
    Key(KeyFields),
    Input(InputFields),
}

/// A normalized record that has not been assigned an id yet.
///
/// [`crate::log::EventLog::append`] assigns the next id from the log's
/// counter; [`RecordDraft::with_id`] attaches an arbitrary one and is meant for
/// building standalone records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordDraft {
    pub event_name: EventName,
    pub payload: RecordPayload,
    pub inner_text: String,
}

impl RecordDraft {
    /// Attach an id, producing the final immutable record.
    #[must_use]
    pub fn with_id(self, id: u64) -> EventRecord {
        EventRecord {
            id,
            event_name: self.event_name,
            payload: self.payload,
            inner_text: self.inner_text,
        }
    }
}

/// One observed event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventRecord {
    id: u64,
    event_name: EventName,
    payload: RecordPayload,
    inner_text: String,
}

impl EventRecord {
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub const fn event_name(&self) -> &EventName {
        &self.event_name
    }

    #[must_use]
    pub const fn payload(&self) -> &RecordPayload {
        &self.payload
    }

    #[must_use]
    pub fn inner_text(&self) -> &str {
        &self.inner_text
    }

    const fn key_fields(&self) -> Option<&KeyFields> {
        match &self.payload {
            RecordPayload::Key(fields) => Some(fields),
            RecordPayload::Input(_) => None,
        }
    }

    const fn input_fields(&self) -> Option<&InputFields> {
        match &self.payload {
            RecordPayload::Input(fields) => Some(fields),
            RecordPayload::Key(_) => None,
        }
    }

    #[must_use]
    pub fn modifier_state(&self) -> Option<LockModifier> {
        self.key_fields().and_then(|k| k.modifier_state)
    }

    /// Lock name as displayed, empty when none was active.
    #[must_use]
    pub fn modifier_state_str(&self) -> &'static str {
        self.modifier_state().map_or("", LockModifier::as_str)
    }

    #[must_use]
    pub fn mods(&self) -> Modifiers {
        self.key_fields().map_or(Modifiers::empty(), |k| k.mods)
    }

    #[must_use]
    pub fn shift(&self) -> bool {
        self.mods().contains(Modifiers::SHIFT)
    }

    #[must_use]
    pub fn ctrl(&self) -> bool {
        self.mods().contains(Modifiers::CTRL)
    }

    #[must_use]
    pub fn alt(&self) -> bool {
        self.mods().contains(Modifiers::ALT)
    }

    #[must_use]
    pub fn meta(&self) -> bool {
        self.mods().contains(Modifiers::META)
    }

    #[must_use]
    pub fn key(&self) -> &str {
        self.key_fields().map_or("", |k| k.key.as_str())
    }

    #[must_use]
    pub fn code(&self) -> &str {
        self.key_fields().map_or("", |k| k.code.as_str())
    }

    #[must_use]
    pub fn location(&self) -> KeyLocation {
        self.key_fields().map_or(KeyLocation::STANDARD, |k| k.location)
    }

    #[must_use]
    pub fn repeat(&self) -> bool {
        self.key_fields().is_some_and(|k| k.repeat)
    }

    /// Read from key events only; always `false` on input and composition
    /// records, including `compositionstart`/`compositionupdate`.
    #[must_use]
    pub fn is_composing(&self) -> bool {
        self.key_fields().is_some_and(|k| k.is_composing)
    }

    /// `None` on key records, and on input records whose host omitted it.
    #[must_use]
    pub fn input_type(&self) -> Option<&str> {
        self.input_fields().and_then(|i| i.input_type.as_deref())
    }

    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.input_fields().and_then(|i| i.data.as_deref())
    }

    #[must_use]
    pub fn detail(&self) -> Option<i32> {
        self.input_fields().and_then(|i| i.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_labels() {
        assert_eq!(KeyLocation(0).label(), "0");
        assert_eq!(KeyLocation(1).label(), "LEFT");
        assert_eq!(KeyLocation(2).label(), "RIGHT");
        assert_eq!(KeyLocation(3).label(), "NUMPAD");
        assert_eq!(KeyLocation(7).label(), "7");
        assert_eq!(KeyLocation::NUMPAD.raw(), 3);
    }

    #[test]
    fn lock_priority_prefers_caps_lock() {
        let active = LockState::CAPS_LOCK | LockState::SCROLL_LOCK;
        let picked = LockModifier::first_active(|lock| active.contains(lock.flag()));
        assert_eq!(picked, Some(LockModifier::CapsLock));

        let picked = LockModifier::first_active(|lock| {
            (LockState::NUM_LOCK | LockState::SCROLL_LOCK).contains(lock.flag())
        });
        assert_eq!(picked, Some(LockModifier::NumLock));

        assert_eq!(LockModifier::first_active(|_| false), None);
    }

    #[test]
    fn lock_names_parse_into_flags() {
        let locks = LockModifier::parse_set(["ScrollLock", "Shift", "NumLock"]);
        assert_eq!(locks, LockState::NUM_LOCK | LockState::SCROLL_LOCK);
        assert_eq!(LockModifier::parse_set(std::iter::empty()), LockState::empty());
        assert_eq!(LockModifier::from_name("capslock"), None);
    }

    #[test]
    fn event_name_keeps_unknown_types_verbatim() {
        for raw in [
            "keydown",
            "keyup",
            "input",
            "beforeinput",
            "compositionstart",
            "compositionupdate",
            "compositionend",
            "textInput",
        ] {
            assert_eq!(EventName::parse(raw).as_str(), raw);
        }
        assert_eq!(
            EventName::parse("textInput"),
            EventName::Other("textInput".into())
        );
    }

    #[test]
    fn input_record_reports_neutral_key_fields() {
        let record = RecordDraft {
            event_name: EventName::CompositionUpdate,
            payload: RecordPayload::Input(InputFields {
                input_type: None,
                data: Some("か".to_string()),
                detail: Some(0),
            }),
            inner_text: "か".to_string(),
        }
        .with_id(4);

        assert_eq!(record.id(), 4);
        assert!(!record.shift() && !record.ctrl() && !record.alt() && !record.meta());
        assert_eq!(record.key(), "");
        assert_eq!(record.code(), "");
        assert_eq!(record.location(), KeyLocation::STANDARD);
        assert!(!record.repeat());
        assert!(!record.is_composing());
        assert_eq!(record.modifier_state_str(), "");
        assert_eq!(record.data(), Some("か"));
    }

    #[test]
    fn key_record_has_no_input_fields() {
        let record = RecordDraft {
            event_name: EventName::KeyDown,
            payload: RecordPayload::Key(KeyFields {
                modifier_state: Some(LockModifier::NumLock),
                mods: Modifiers::from_keys(false, true, false, true),
                key: "v".to_string(),
                code: "KeyV".to_string(),
                location: KeyLocation::STANDARD,
                repeat: true,
                is_composing: false,
            }),
            inner_text: String::new(),
        }
        .with_id(0);

        assert!(record.ctrl() && record.meta());
        assert!(!record.shift() && !record.alt());
        assert!(record.repeat());
        assert_eq!(record.modifier_state_str(), "NumLock");
        assert_eq!(record.input_type(), None);
        assert_eq!(record.data(), None);
        assert_eq!(record.detail(), None);
    }
}
