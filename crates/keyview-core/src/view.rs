#![forbid(unsafe_code)]

//! Table-shaped presentation of an [`EventLog`].
//!
//! Renderers (DOM, terminal, test snapshots) draw from [`TableRow`] values and
//! never look at record internals. Everything here is a pure function of the
//! record.

use std::borrow::Cow;

use crate::log::EventLog;
use crate::record::{EventName, EventRecord};

/// Column headers, in display order.
pub const COLUMNS: [&str; 15] = [
    "no",
    "eventName",
    "modifierState",
    "shift",
    "ctrl",
    "alt",
    "meta",
    "key",
    "code",
    "location",
    "repeat",
    "isComposing",
    "inputType",
    "data",
    "innerText",
];

/// Tri-state boolean cell glyph.
#[must_use]
pub const fn bool_glyph(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "✓",
        Some(false) => "✗",
        None => "-",
    }
}

/// Background tone for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowTone {
    Keydown,
    Input,
    Plain,
}

impl RowTone {
    #[must_use]
    pub const fn for_event(name: &EventName) -> Self {
        match name {
            EventName::KeyDown => Self::Keydown,
            EventName::Input => Self::Input,
            _ => Self::Plain,
        }
    }

    /// CSS class for the tone, `None` for plain rows.
    #[must_use]
    pub const fn class_name(self) -> Option<&'static str> {
        match self {
            Self::Keydown => Some("row-keydown"),
            Self::Input => Some("row-input"),
            Self::Plain => None,
        }
    }
}

/// Kind of a cell, for renderers that color booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Text,
    Flag(bool),
}

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell<'a> {
    pub kind: CellKind,
    pub text: Cow<'a, str>,
}

impl<'a> Cell<'a> {
    fn text(text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            kind: CellKind::Text,
            text: text.into(),
        }
    }

    fn flag(value: bool) -> Self {
        Self {
            kind: CellKind::Flag(value),
            text: Cow::Borrowed(bool_glyph(Some(value))),
        }
    }

    /// CSS class for flag cells (`flag-on`, `flag-off`).
    #[must_use]
    pub const fn class_name(&self) -> Option<&'static str> {
        match self.kind {
            CellKind::Text => None,
            CellKind::Flag(true) => Some("flag-on"),
            CellKind::Flag(false) => Some("flag-off"),
        }
    }
}

/// One table row, cells in [`COLUMNS`] order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRow<'a> {
    pub id: u64,
    pub tone: RowTone,
    pub cells: [Cell<'a>; 15],
}

impl<'a> TableRow<'a> {
    #[must_use]
    pub fn from_record(record: &'a EventRecord) -> Self {
        Self {
            id: record.id(),
            tone: RowTone::for_event(record.event_name()),
            cells: [
                Cell::text(record.id().to_string()),
                Cell::text(record.event_name().as_str()),
                Cell::text(record.modifier_state_str()),
                Cell::flag(record.shift()),
                Cell::flag(record.ctrl()),
                Cell::flag(record.alt()),
                Cell::flag(record.meta()),
                Cell::text(record.key()),
                Cell::text(record.code()),
                Cell::text(record.location().label().into_owned()),
                Cell::flag(record.repeat()),
                Cell::flag(record.is_composing()),
                Cell::text(record.input_type().unwrap_or_default()),
                Cell::text(record.data().unwrap_or_default()),
                Cell::text(record.inner_text()),
            ],
        }
    }

    /// Cell text in column order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|cell| cell.text.as_ref())
    }
}

/// Rows for every record, newest first.
pub fn rows(log: &EventLog) -> impl Iterator<Item = TableRow<'_>> {
    log.iter().map(TableRow::from_record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{NativeEvent, normalize};
    use crate::wire::{InputEventJson, KeyEventJson};
    use pretty_assertions::assert_eq;

    #[test]
    fn glyphs() {
        assert_eq!(bool_glyph(Some(true)), "✓");
        assert_eq!(bool_glyph(Some(false)), "✗");
        assert_eq!(bool_glyph(None), "-");
    }

    #[test]
    fn key_row_cells() {
        let ev = KeyEventJson {
            event_type: "keydown".to_string(),
            alt_key: true,
            key: "Alt".to_string(),
            code: "AltLeft".to_string(),
            location: 1,
            ..KeyEventJson::default()
        };
        let record = normalize(NativeEvent::Key(&ev), "").with_id(12);
        let row = TableRow::from_record(&record);
        let texts: Vec<&str> = row.texts().collect();
        assert_eq!(
            texts,
            vec![
                "12", "keydown", "", "✗", "✗", "✓", "✗", "Alt", "AltLeft", "LEFT", "✗", "✗",
                "", "", ""
            ]
        );
        assert_eq!(row.tone, RowTone::Keydown);
        assert_eq!(row.tone.class_name(), Some("row-keydown"));
        assert_eq!(row.cells[5].class_name(), Some("flag-on"));
        assert_eq!(row.cells[3].kind, CellKind::Flag(false));
        assert_eq!(row.cells[3].class_name(), Some("flag-off"));
        assert_eq!(row.cells[7].class_name(), None);
    }

    #[test]
    fn input_row_cells() {
        let ev = InputEventJson {
            event_type: "input".to_string(),
            input_type: Some("insertText".to_string()),
            data: Some("a".to_string()),
            detail: Some(0),
        };
        let record = normalize(NativeEvent::Input(&ev), "a").with_id(1);
        let row = TableRow::from_record(&record);
        let texts: Vec<&str> = row.texts().collect();
        assert_eq!(texts[9], "0");
        assert_eq!(texts[12], "insertText");
        assert_eq!(texts[13], "a");
        assert_eq!(texts[14], "a");
        assert_eq!(row.tone, RowTone::Input);
    }

    #[test]
    fn keyup_and_composition_rows_are_plain() {
        for name in ["keyup", "compositionend", "beforeinput"] {
            assert_eq!(RowTone::for_event(&EventName::parse(name)), RowTone::Plain);
        }
        assert_eq!(RowTone::Plain.class_name(), None);
    }

    #[test]
    fn rows_follow_log_order() {
        let ev = InputEventJson {
            event_type: "input".to_string(),
            ..InputEventJson::default()
        };
        let log = EventLog::new()
            .append(normalize(NativeEvent::Input(&ev), ""))
            .append(normalize(NativeEvent::Input(&ev), ""));
        let ids: Vec<u64> = rows(&log).map(|row| row.id).collect();
        assert_eq!(ids, vec![1, 0]);
        assert_eq!(COLUMNS.len(), 15);
    }
}
