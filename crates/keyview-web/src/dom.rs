#![forbid(unsafe_code)]

//! web-sys adapters for the core normalization traits, plus the table
//! renderer.

use keyview_core::EventLog;
use keyview_core::normalize::{NativeInputEvent, NativeKeyEvent, TextSurface};
use keyview_core::record::LockModifier;
use keyview_core::view::TableRow;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CompositionEvent, Document, Element, HtmlElement, InputEvent, KeyboardEvent, UiEvent};

use crate::error::WebError;

/// `keydown`/`keyup`. A plain `Event` carrying a key type (e.g. a synthetic
/// `new Event("keydown")`) reads as a key event with default fields.
pub(crate) struct DomKeyEvent<'a>(pub &'a web_sys::Event);

impl DomKeyEvent<'_> {
    fn keyboard(&self) -> Option<&KeyboardEvent> {
        self.0.dyn_ref::<KeyboardEvent>()
    }

    fn flag(&self, read: impl Fn(&KeyboardEvent) -> bool) -> bool {
        self.keyboard().is_some_and(read)
    }
}

impl NativeKeyEvent for DomKeyEvent<'_> {
    fn event_type(&self) -> String {
        self.0.type_()
    }

    fn shift_key(&self) -> bool {
        self.flag(KeyboardEvent::shift_key)
    }

    fn ctrl_key(&self) -> bool {
        self.flag(KeyboardEvent::ctrl_key)
    }

    fn alt_key(&self) -> bool {
        self.flag(KeyboardEvent::alt_key)
    }

    fn meta_key(&self) -> bool {
        self.flag(KeyboardEvent::meta_key)
    }

    fn key(&self) -> String {
        self.keyboard().map(KeyboardEvent::key).unwrap_or_default()
    }

    fn code(&self) -> String {
        self.keyboard().map(KeyboardEvent::code).unwrap_or_default()
    }

    fn location(&self) -> u32 {
        self.keyboard().map_or(0, KeyboardEvent::location)
    }

    fn repeat(&self) -> bool {
        self.flag(KeyboardEvent::repeat)
    }

    fn is_composing(&self) -> bool {
        self.flag(KeyboardEvent::is_composing)
    }

    fn modifier_state(&self, lock: LockModifier) -> bool {
        self.flag(|ev| ev.get_modifier_state(lock.as_str()))
    }
}

/// `input`, `beforeinput` or a composition event, read through whichever
/// interface the runtime object actually implements.
pub(crate) struct DomInputEvent<'a>(pub &'a web_sys::Event);

impl NativeInputEvent for DomInputEvent<'_> {
    fn event_type(&self) -> String {
        self.0.type_()
    }

    fn input_type(&self) -> Option<String> {
        self.0.dyn_ref::<InputEvent>().map(InputEvent::input_type)
    }

    fn data(&self) -> Option<String> {
        if let Some(input) = self.0.dyn_ref::<InputEvent>() {
            return input.data();
        }
        self.0.dyn_ref::<CompositionEvent>().and_then(CompositionEvent::data)
    }

    fn detail(&self) -> Option<i32> {
        self.0.dyn_ref::<UiEvent>().map(UiEvent::detail)
    }
}

/// Text of the element an event fired on; empty when there is none.
pub(crate) struct TargetText(pub Option<HtmlElement>);

impl TextSurface for TargetText {
    fn inner_text(&self) -> String {
        self.0.as_ref().map(HtmlElement::inner_text).unwrap_or_default()
    }
}

fn dom_err(err: JsValue) -> WebError {
    WebError::Dom(format!("{err:?}"))
}

/// Incremental renderer: the log only ever grows at its head, so rows for
/// records newer than the last render are prepended to `<tbody>`.
pub(crate) struct TableRenderer {
    document: Document,
    tbody: HtmlElement,
    highlight: bool,
    rendered_next_id: u64,
}

impl TableRenderer {
    pub(crate) fn new(document: Document, tbody: HtmlElement, highlight: bool) -> Self {
        Self {
            document,
            tbody,
            highlight,
            rendered_next_id: 0,
        }
    }

    /// Drop every row and draw `log` from scratch.
    pub(crate) fn reset(&mut self, log: &EventLog) -> Result<(), WebError> {
        self.tbody.set_text_content(None);
        self.rendered_next_id = 0;
        self.sync(log)
    }

    /// Prepend rows for records appended since the last call.
    pub(crate) fn sync(&mut self, log: &EventLog) -> Result<(), WebError> {
        let fresh: Vec<_> = log
            .iter()
            .take_while(|record| record.id() >= self.rendered_next_id)
            .collect();
        // Oldest first, so the newest row ends up on top.
        for record in fresh.into_iter().rev() {
            let tr = self.row_element(&TableRow::from_record(record))?;
            self.tbody.prepend_with_node_1(&tr).map_err(dom_err)?;
        }
        self.rendered_next_id = log.next_id();
        Ok(())
    }

    fn row_element(&self, row: &TableRow<'_>) -> Result<Element, WebError> {
        let tr = self.document.create_element("tr").map_err(dom_err)?;
        if self.highlight
            && let Some(class) = row.tone.class_name()
        {
            tr.set_class_name(class);
        }
        let last = row.cells.len() - 1;
        for (idx, cell) in row.cells.iter().enumerate() {
            let td = self.document.create_element("td").map_err(dom_err)?;
            td.set_text_content(Some(cell.text.as_ref()));
            if let Some(class) = cell.class_name() {
                td.set_class_name(class);
            } else if idx == last {
                td.set_class_name("cell-inner-text");
            }
            tr.append_child(&td).map_err(dom_err)?;
        }
        Ok(tr)
    }
}
