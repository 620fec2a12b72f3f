#![forbid(unsafe_code)]

//! JSON-friendly shapes at the host boundary.
//!
//! Two directions:
//! - **In**: [`KeyEventJson`] / [`InputEventJson`] mirror the DOM field names
//!   and implement the native event traits, so hosts without DOM bindings
//!   (tests, captured traces) use the same normalization path.
//! - **Out**: [`EventRecord`] and [`EventLog`] serialize to the flat camelCase
//!   record shape renderers consume. `inputType`, `data` and `detail` appear
//!   only on input records; `data` may be `null`.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::log::EventLog;
use crate::normalize::{NativeEvent, NativeInputEvent, NativeKeyEvent};
use crate::record::{EventName, EventRecord, LockModifier, LockState, RecordPayload};

/// Host-side `KeyboardEvent` snapshot.
///
/// Missing or `null` booleans default to `false`, strings to `""` and
/// `location` to `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyEventJson {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub event_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shift_key: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub ctrl_key: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub alt_key: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub meta_key: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub repeat: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_composing: bool,
    /// Active lock modifiers, on the wire as a list of names (`CapsLock`,
    /// `NumLock`, `ScrollLock`). Unknown names are dropped.
    #[serde(with = "lock_names", skip_serializing_if = "LockState::is_empty")]
    pub modifier_locks: LockState,
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

mod lock_names {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::record::{LockModifier, LockState};

    pub(super) fn serialize<S>(locks: &LockState, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(
            LockModifier::PRIORITY
                .into_iter()
                .filter(|lock| locks.contains(lock.flag()))
                .map(LockModifier::as_str),
        )
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<LockState, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(LockModifier::parse_set(names.iter().map(String::as_str)))
    }
}

impl NativeKeyEvent for KeyEventJson {
    fn event_type(&self) -> String {
        self.event_type.clone()
    }

    fn shift_key(&self) -> bool {
        self.shift_key
    }

    fn ctrl_key(&self) -> bool {
        self.ctrl_key
    }

    fn alt_key(&self) -> bool {
        self.alt_key
    }

    fn meta_key(&self) -> bool {
        self.meta_key
    }

    fn key(&self) -> String {
        self.key.clone()
    }

    fn code(&self) -> String {
        self.code.clone()
    }

    fn location(&self) -> u32 {
        self.location
    }

    fn repeat(&self) -> bool {
        self.repeat
    }

    fn is_composing(&self) -> bool {
        self.is_composing
    }

    fn modifier_state(&self, lock: LockModifier) -> bool {
        self.modifier_locks.contains(lock.flag())
    }
}

/// Host-side `InputEvent`/`CompositionEvent` snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputEventJson {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<i32>,
}

impl NativeInputEvent for InputEventJson {
    fn event_type(&self) -> String {
        self.event_type.clone()
    }

    fn input_type(&self) -> Option<String> {
        self.input_type.clone()
    }

    fn data(&self) -> Option<String> {
        self.data.clone()
    }

    fn detail(&self) -> Option<i32> {
        self.detail
    }
}

/// Either host event shape, chosen by the `type` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEventJson {
    Key(KeyEventJson),
    Input(InputEventJson),
}

#[derive(Deserialize)]
struct TypeTag {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    event_type: String,
}

impl HostEventJson {
    /// Decode one host event. `keydown`/`keyup` take the key shape; every
    /// other type (including unknown ones) takes the input shape.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        let tag = TypeTag::deserialize(&value)?;
        if EventName::parse(&tag.event_type).is_key() {
            Ok(Self::Key(KeyEventJson::deserialize(&value)?))
        } else {
            Ok(Self::Input(InputEventJson::deserialize(&value)?))
        }
    }

    #[must_use]
    pub fn as_native(&self) -> NativeEvent<'_> {
        match self {
            Self::Key(ev) => NativeEvent::Key(ev),
            Self::Input(ev) => NativeEvent::Input(ev),
        }
    }
}

impl Serialize for EventRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let input = match self.payload() {
            RecordPayload::Input(fields) => Some(fields),
            RecordPayload::Key(_) => None,
        };
        let field_count = if input.is_some() { 16 } else { 13 };

        let mut st = serializer.serialize_struct("EventRecord", field_count)?;
        st.serialize_field("id", &self.id())?;
        st.serialize_field("eventName", self.event_name().as_str())?;
        st.serialize_field("modifierState", self.modifier_state_str())?;
        st.serialize_field("shift", &self.shift())?;
        st.serialize_field("ctrl", &self.ctrl())?;
        st.serialize_field("alt", &self.alt())?;
        st.serialize_field("meta", &self.meta())?;
        st.serialize_field("key", self.key())?;
        st.serialize_field("code", self.code())?;
        st.serialize_field("location", &self.location().raw())?;
        st.serialize_field("repeat", &self.repeat())?;
        st.serialize_field("isComposing", &self.is_composing())?;
        match input {
            Some(fields) => {
                match fields.input_type.as_deref() {
                    Some(input_type) => st.serialize_field("inputType", input_type)?,
                    None => st.skip_field("inputType")?,
                }
                st.serialize_field("data", &fields.data)?;
                match fields.detail {
                    Some(detail) => st.serialize_field("detail", &detail)?,
                    None => st.skip_field("detail")?,
                }
            }
            None => {
                st.skip_field("inputType")?;
                st.skip_field("data")?;
                st.skip_field("detail")?;
            }
        }
        st.serialize_field("innerText", self.inner_text())?;
        st.end()
    }
}

/// `{ "events": [...newest first], "nextId": n }`.
impl Serialize for EventLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let events: Vec<&EventRecord> = self.iter().collect();
        let mut st = serializer.serialize_struct("LogSnapshot", 2)?;
        st.serialize_field("events", &events)?;
        st.serialize_field("nextId", &self.next_id())?;
        st.end()
    }
}

/// Encode the whole log as the renderer-facing JSON snapshot.
pub fn snapshot_json(log: &EventLog) -> Result<String, serde_json::Error> {
    serde_json::to_string(log)
}
