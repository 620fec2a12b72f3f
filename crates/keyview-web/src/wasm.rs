#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use keyview_core::normalize::NativeEvent;
use keyview_core::wire::snapshot_json;
use keyview_core::{Viewer, ViewerConfig};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, KeyboardEvent};

use crate::dom::{DomInputEvent, DomKeyEvent, TableRenderer, TargetText};
use crate::error::{WebError, parse_options};
use crate::events::{EventCategory, Registrations, category_of, register_all};

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// Session state shared between the JS-facing handle and the DOM listeners.
///
/// Listeners run one at a time on the browser's event loop, so a `RefCell`
/// borrow is never contended.
struct Shared {
    viewer: Viewer,
    surface: Option<HtmlElement>,
    renderer: Option<TableRenderer>,
}

impl Shared {
    fn dispatch(&mut self, event: &web_sys::Event, category: EventCategory) -> Result<(), WebError> {
        // The event's own target is the editable host; manual feeding without a
        // DOM target falls back to the attached surface.
        let target = event
            .target()
            .and_then(|t| t.dyn_into::<HtmlElement>().ok())
            .or_else(|| self.surface.clone());
        let surface = TargetText(target);
        match category {
            EventCategory::Key => {
                self.viewer.dispatch(NativeEvent::Key(&DomKeyEvent(event)), &surface);
            }
            EventCategory::Input => {
                self.viewer.dispatch(NativeEvent::Input(&DomInputEvent(event)), &surface);
            }
        }
        self.render()
    }

    fn render(&mut self) -> Result<(), WebError> {
        match self.renderer.as_mut() {
            Some(renderer) => renderer.sync(self.viewer.log()),
            None => Ok(()),
        }
    }
}

type Listener = Closure<dyn FnMut(web_sys::Event)>;

/// Registered listeners, removed again on drop.
struct Listeners {
    target: HtmlElement,
    closures: Registrations<Listener>,
}

impl Listeners {
    fn install(target: &HtmlElement, shared: &Rc<RefCell<Shared>>) -> Result<Self, WebError> {
        let closures = register_all(
            |event_type, category| -> Result<Listener, WebError> {
                let shared = Rc::clone(shared);
                let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
                    if let Err(err) = shared.borrow_mut().dispatch(&event, category) {
                        warn!(error = %err, event = event_type, "failed to record event");
                    }
                }) as Box<dyn FnMut(_)>);
                target
                    .add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
                    .map_err(|err| WebError::Dom(format!("add {event_type} listener: {err:?}")))?;
                Ok(closure)
            },
            |event_type, closure| remove_listener(target, event_type, &closure),
        )?;
        Ok(Self {
            target: target.clone(),
            closures,
        })
    }
}

fn remove_listener(target: &HtmlElement, event_type: &str, closure: &Listener) {
    if target
        .remove_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
        .is_err()
    {
        warn!(event = event_type, "failed to remove listener");
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        for (event_type, closure) in &self.closures {
            remove_listener(&self.target, event_type, closure);
        }
    }
}

/// JS handle for one viewer session.
///
/// Typical host wiring:
///
/// ```js
/// const viewer = new KeyViewWeb({ heading: "IME lab" });
/// viewer.attach(document.querySelector("[contenteditable]"), document.querySelector("tbody"));
/// ```
#[wasm_bindgen]
pub struct KeyViewWeb {
    shared: Rc<RefCell<Shared>>,
    listeners: Option<Listeners>,
}

#[wasm_bindgen]
impl KeyViewWeb {
    /// Create a session. `options` is a plain object with camelCase
    /// [`ViewerConfig`] keys; omitted keys use their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<JsValue>) -> Result<KeyViewWeb, JsValue> {
        let config = config_from_options(options)?;
        let user_agent = web_sys::window()
            .and_then(|w| w.navigator().user_agent().ok())
            .unwrap_or_default();
        Ok(Self {
            shared: Rc::new(RefCell::new(Shared {
                viewer: Viewer::new(config, user_agent),
                surface: None,
                renderer: None,
            })),
            listeners: None,
        })
    }

    /// Start listening on `editable` and render rows into `tbody`.
    ///
    /// Re-attaching replaces the previous listeners and redraws every
    /// recorded row into the new `tbody`.
    pub fn attach(&mut self, editable: HtmlElement, tbody: HtmlElement) -> Result<(), JsValue> {
        self.detach();
        let document = editable
            .owner_document()
            .ok_or_else(|| WebError::Dom("editable element has no document".to_string()))?;
        let renderer = {
            let shared = self.shared.borrow();
            let mut renderer =
                TableRenderer::new(document, tbody, shared.viewer.config().highlight_rows);
            renderer.reset(shared.viewer.log())?;
            renderer
        };
        // Shared state only changes once every listener is in place.
        let listeners = Listeners::install(&editable, &self.shared)?;
        {
            let mut shared = self.shared.borrow_mut();
            shared.renderer = Some(renderer);
            shared.surface = Some(editable);
        }
        self.listeners = Some(listeners);
        debug!("viewer attached");
        Ok(())
    }

    /// Remove all listeners. Recorded events are kept.
    pub fn detach(&mut self) {
        if self.listeners.take().is_some() {
            let mut shared = self.shared.borrow_mut();
            shared.surface = None;
            shared.renderer = None;
            debug!("viewer detached");
        }
    }

    /// Record a keyboard event delivered by the host.
    #[wasm_bindgen(js_name = keyEvent)]
    pub fn key_event(&mut self, event: KeyboardEvent) -> Result<(), JsValue> {
        let category = category_of(&event.type_());
        self.shared
            .borrow_mut()
            .dispatch(&event, category)
            .map_err(Into::into)
    }

    /// Record an input, beforeinput or composition event delivered by the host.
    #[wasm_bindgen(js_name = inputEvent)]
    pub fn input_event(&mut self, event: web_sys::Event) -> Result<(), JsValue> {
        self.shared
            .borrow_mut()
            .dispatch(&event, EventCategory::Input)
            .map_err(Into::into)
    }

    /// Newest-first log as `{ events, nextId }` JSON.
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        let log = self.shared.borrow().viewer.snapshot();
        snapshot_json(&log).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.shared.borrow().viewer.log().len()
    }

    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.shared.borrow().viewer.log().is_empty()
    }

    /// Id the next recorded event will receive.
    #[wasm_bindgen(js_name = nextId)]
    pub fn next_id(&self) -> f64 {
        self.shared.borrow().viewer.next_id() as f64
    }

    #[wasm_bindgen(js_name = userAgent)]
    pub fn user_agent(&self) -> String {
        self.shared.borrow().viewer.host_id().to_string()
    }

    pub fn heading(&self) -> String {
        self.shared.borrow().viewer.config().heading.clone()
    }

    pub fn description(&self) -> String {
        self.shared.borrow().viewer.config().description.clone()
    }

    #[wasm_bindgen(js_name = showUserAgent)]
    pub fn show_user_agent(&self) -> bool {
        self.shared.borrow().viewer.config().show_user_agent
    }

    /// Explicit teardown for JS callers.
    pub fn destroy(&mut self) {
        self.detach();
    }
}

fn config_from_options(options: Option<JsValue>) -> Result<ViewerConfig, WebError> {
    let json = match options {
        Some(value) if !value.is_undefined() && !value.is_null() => Some(
            js_sys::JSON::stringify(&value)
                .map(String::from)
                .map_err(|err| WebError::Dom(format!("stringify options: {err:?}")))?,
        ),
        _ => None,
    };
    parse_options(json.as_deref())
}
