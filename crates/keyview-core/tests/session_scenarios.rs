//! End-to-end viewer scenarios driven through the JSON host schema.

use keyview_core::record::RecordPayload;
use keyview_core::view::{TableRow, rows};
use keyview_core::wire::{HostEventJson, snapshot_json};
use keyview_core::{EventName, LockModifier, Viewer, ViewerConfig};
use pretty_assertions::assert_eq;
use serde_json::json;

fn dispatch_json(viewer: &mut Viewer, raw: &str, inner_text: &str) -> u64 {
    let event = HostEventJson::from_json_str(raw).expect("host event");
    viewer.dispatch(event.as_native(), inner_text).id()
}

#[test]
fn keydown_then_input() {
    let mut viewer = Viewer::new(ViewerConfig::default(), "Mozilla/5.0 (test)");

    let id = dispatch_json(
        &mut viewer,
        r#"{"type":"keydown","key":"a","code":"KeyA","shiftKey":true,"location":0}"#,
        "",
    );
    assert_eq!(id, 0);
    {
        let log = viewer.log();
        assert_eq!(log.len(), 1);
        let record = log.newest().expect("record");
        assert_eq!(record.id(), 0);
        assert_eq!(record.event_name(), &EventName::KeyDown);
        assert!(record.shift());
        assert_eq!(record.key(), "a");
        assert_eq!(record.code(), "KeyA");
        assert_eq!(record.location().raw(), 0);
        assert_eq!(record.location().label(), "0");
        assert_eq!(record.modifier_state_str(), "");
    }

    let id = dispatch_json(
        &mut viewer,
        r#"{"type":"input","inputType":"insertText","data":"a","detail":0}"#,
        "a",
    );
    assert_eq!(id, 1);

    let log = viewer.snapshot();
    let ids: Vec<u64> = log.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![1, 0]);

    let newest = log.newest().expect("record");
    assert_eq!(newest.event_name().as_str(), "input");
    assert_eq!(newest.input_type(), Some("insertText"));
    assert_eq!(newest.data(), Some("a"));
    assert!(!newest.shift() && !newest.ctrl() && !newest.alt() && !newest.meta());
    assert!(!newest.repeat() && !newest.is_composing());

    let value: serde_json::Value =
        serde_json::from_str(&snapshot_json(&log).expect("encode")).expect("decode");
    assert_eq!(
        value,
        json!({
            "events": [
                {
                    "id": 1,
                    "eventName": "input",
                    "modifierState": "",
                    "shift": false,
                    "ctrl": false,
                    "alt": false,
                    "meta": false,
                    "key": "",
                    "code": "",
                    "location": 0,
                    "repeat": false,
                    "isComposing": false,
                    "inputType": "insertText",
                    "data": "a",
                    "detail": 0,
                    "innerText": "a",
                },
                {
                    "id": 0,
                    "eventName": "keydown",
                    "modifierState": "",
                    "shift": true,
                    "ctrl": false,
                    "alt": false,
                    "meta": false,
                    "key": "a",
                    "code": "KeyA",
                    "location": 0,
                    "repeat": false,
                    "isComposing": false,
                    "innerText": "",
                },
            ],
            "nextId": 2,
        })
    );
}

#[test]
fn ime_composition_session() {
    // Typical Japanese IME sequence: the key events report isComposing, the
    // composition events themselves do not.
    let mut viewer = Viewer::default();
    let stream = [
        (r#"{"type":"keydown","key":"Process","code":"KeyK","isComposing":false}"#, ""),
        (r#"{"type":"compositionstart","data":"","detail":0}"#, ""),
        (r#"{"type":"beforeinput","inputType":"insertCompositionText","data":"k"}"#, ""),
        (r#"{"type":"compositionupdate","data":"k","detail":0}"#, ""),
        (r#"{"type":"input","inputType":"insertCompositionText","data":"k"}"#, "k"),
        (r#"{"type":"keyup","key":"k","code":"KeyK","isComposing":true}"#, "k"),
        (r#"{"type":"compositionend","data":"か","detail":0}"#, "か"),
    ];
    for (raw, text) in stream {
        let _ = dispatch_json(&mut viewer, raw, text);
    }

    let log = viewer.snapshot();
    assert_eq!(log.len(), stream.len());
    let names: Vec<&str> = log.iter().map(|r| r.event_name().as_str()).collect();
    assert_eq!(
        names,
        vec![
            "compositionend",
            "keyup",
            "input",
            "compositionupdate",
            "beforeinput",
            "compositionstart",
            "keydown",
        ]
    );

    let keyup = log.get(5).expect("keyup");
    assert!(keyup.is_composing());
    for id in [1, 3, 6] {
        let record = log.get(id).expect("composition record");
        assert!(record.event_name().is_composition());
        assert!(!record.is_composing());
        assert_eq!(record.input_type(), None);
    }
    assert_eq!(log.get(6).and_then(|r| r.data()), Some("か"));
}

#[test]
fn simultaneous_locks_report_caps_lock() {
    let mut viewer = Viewer::default();
    let _ = dispatch_json(
        &mut viewer,
        r#"{"type":"keydown","key":"A","code":"KeyA","modifierLocks":["ScrollLock","CapsLock"]}"#,
        "A",
    );
    let record = viewer.log().newest().expect("record");
    assert_eq!(record.modifier_state(), Some(LockModifier::CapsLock));
}

#[test]
fn sparse_host_events_are_recorded_as_is() {
    let mut viewer = Viewer::default();
    let _ = dispatch_json(&mut viewer, r#"{"type":"keydown"}"#, "");
    let _ = dispatch_json(&mut viewer, r#"{"type":"input"}"#, "");
    let _ = dispatch_json(&mut viewer, r#"{"type":"selectionchange"}"#, "");

    let log = viewer.snapshot();
    assert_eq!(log.len(), 3);

    let unknown = log.get(2).expect("record");
    assert_eq!(unknown.event_name(), &EventName::Other("selectionchange".into()));
    assert_eq!(unknown.input_type(), None);
    assert_eq!(unknown.data(), None);
    assert_eq!(unknown.detail(), None);

    let bare_key = log.get(0).expect("record");
    assert!(matches!(bare_key.payload(), RecordPayload::Key(_)));
    assert_eq!(bare_key.key(), "");
    assert!(!bare_key.shift());
}

#[test]
fn null_fields_are_recorded_like_missing_ones() {
    let mut viewer = Viewer::default();
    let id = dispatch_json(
        &mut viewer,
        r#"{"type":"keyup","key":null,"code":"KeyQ","location":null,"repeat":null,"modifierLocks":["NumLock"]}"#,
        "q",
    );
    assert_eq!(id, 0);

    let record = viewer.log().newest().expect("record");
    assert_eq!(record.event_name(), &EventName::KeyUp);
    assert_eq!(record.key(), "");
    assert_eq!(record.code(), "KeyQ");
    assert_eq!(record.location().raw(), 0);
    assert!(!record.repeat());
    assert_eq!(record.modifier_state(), Some(LockModifier::NumLock));
    assert_eq!(record.inner_text(), "q");
}

#[test]
fn table_rows_for_a_right_shift() {
    let mut viewer = Viewer::default();
    let _ = dispatch_json(
        &mut viewer,
        r#"{"type":"keydown","key":"Shift","code":"ShiftRight","shiftKey":true,"location":2}"#,
        "",
    );
    let log = viewer.snapshot();
    let row: Vec<TableRow<'_>> = rows(&log).collect();
    assert_eq!(row.len(), 1);
    let texts: Vec<&str> = row[0].texts().collect();
    assert_eq!(texts[3], "✓");
    assert_eq!(texts[9], "RIGHT");
    assert_eq!(log.newest().map(|r| r.location().raw()), Some(2));
}
