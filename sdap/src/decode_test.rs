use super::*;
use crate::CellPointer;

#[test]
fn decode_rejects_malformed_json() {
    let err = decode("{not json").expect_err("should fail");
    assert!(matches!(err, CodecError::Json(_)));
}

#[test]
fn decode_rejects_non_object_and_missing_type() {
    assert!(matches!(decode("[1,2]"), Err(CodecError::NotAnObject)));
    assert!(matches!(decode(r#"{"name":"alpha"}"#), Err(CodecError::MissingType)));
    assert!(matches!(decode(r#"{"type":7}"#), Err(CodecError::MissingType)));
}

#[test]
fn decode_unknown_type_is_unhandled_not_error() {
    let event = decode(r#"{"type":"presence","who":"x"}"#).expect("decode");
    assert_eq!(event, Event::Unhandled { kind: "presence".to_owned() });
    assert_eq!(event.room(), None);
}

#[test]
fn decode_hello_reads_new_username() {
    let event = decode(r#"{"type":"hello","newUsername":"ada-2"}"#).expect("decode");
    assert_eq!(event, Event::HelloAck { new_username: "ada-2".to_owned() });
}

#[test]
fn decode_create_reads_created_name_with_id_fallback() {
    let event = decode(r#"{"type":"create","created":{"name":"alpha"}}"#).expect("decode");
    assert_eq!(event, Event::RoomCreated { name: "alpha".to_owned() });

    let event = decode(r#"{"type":"create","created":{"id":"beta"}}"#).expect("decode");
    assert_eq!(event, Event::RoomCreated { name: "beta".to_owned() });
}

#[test]
fn decode_create_without_name_is_missing_field() {
    let err = decode(r#"{"type":"create","created":{}}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::MissingField("created.name")));
}

#[test]
fn decode_get_reads_snapshot_and_watermark() {
    let event = decode(
        r#"{"type":"get","name":"alpha","value":[[2,0],[0,1]],"lastChangeId":"c1","lastChangeAt":1700000000}"#,
    )
    .expect("decode");
    assert_eq!(
        event,
        Event::RoomFetched {
            name: "alpha".to_owned(),
            value: vec![vec![ColorCode::BLUE, ColorCode::WHITE], vec![ColorCode::WHITE, ColorCode::RED]],
            last_change_id: Some("c1".to_owned()),
            last_change_at: Some("1700000000".to_owned()),
        }
    );
}

#[test]
fn decode_get_maps_invalid_cells_to_background() {
    let event = decode(r#"{"type":"get","name":"alpha","value":[[1,"x",null,999]]}"#).expect("decode");
    let Event::RoomFetched { value, last_change_id, .. } = event else {
        panic!("expected RoomFetched");
    };
    assert_eq!(value, vec![vec![ColorCode::RED, ColorCode::BACKGROUND, ColorCode::BACKGROUND, ColorCode::BACKGROUND]]);
    assert_eq!(last_change_id, None);
}

#[test]
fn decode_get_rejects_non_array_value() {
    let err = decode(r#"{"type":"get","name":"alpha","value":null}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::InvalidField("value")));
}

#[test]
fn decode_update_reads_results_with_legacy_fallback() {
    let event = decode(
        r#"{"type":"update","name":"alpha","results":[{"changeId":"c7","changeTime":"t7"}]}"#,
    )
    .expect("decode");
    assert_eq!(
        event,
        Event::RoomUpdated {
            name: "alpha".to_owned(),
            results: vec![UpdateResult { change_id: "c7".to_owned(), change_time: "t7".to_owned() }],
        }
    );

    let event = decode(r#"{"type":"update","id":"alpha","updates":[{"changeId":8}]}"#).expect("decode");
    let Event::RoomUpdated { name, results } = event else {
        panic!("expected RoomUpdated");
    };
    assert_eq!(name, "alpha");
    assert_eq!(results[0].change_id, "8");
    assert_eq!(results[0].change_time, "");
}

#[test]
fn decode_subscribe_and_unsubscribe_read_success() {
    let event = decode(r#"{"type":"subscribe","name":"alpha","success":true}"#).expect("decode");
    assert_eq!(event, Event::Subscribed { name: "alpha".to_owned(), success: true });

    let event = decode(r#"{"type":"unsubscribe","name":"alpha"}"#).expect("decode");
    assert_eq!(event, Event::Unsubscribed { name: "alpha".to_owned(), success: false });
}

#[test]
fn decode_subscribe_without_name_is_missing_field() {
    let err = decode(r#"{"type":"subscribe","success":true}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::MissingField("name")));
}

#[test]
fn decode_changes_keeps_reserved_kinds_and_raw_pointers() {
    let event = decode(
        r#"{"type":"changes","name":"alpha","changes":[
            {"changeId":"c2","changeTime":"t2","ops":{
                "/2/5":{"type":"set","value":1},
                "/3/3":{"type":"splice","value":[1]},
                "bad":{"type":"set","value":2}
            }}
        ]}"#,
    )
    .expect("decode");
    let Event::ChangesBroadcast { name, changes } = event else {
        panic!("expected ChangesBroadcast");
    };
    assert_eq!(name, "alpha");
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].change_id, "c2");
    assert_eq!(changes[0].change_time, "t2");
    assert_eq!(
        changes[0].ops,
        vec![
            RemoteOp { pointer: "/2/5".to_owned(), op: CellOp::Set { value: ColorCode::RED } },
            RemoteOp { pointer: "/3/3".to_owned(), op: CellOp::Reserved { kind: "splice".to_owned() } },
            RemoteOp { pointer: "bad".to_owned(), op: CellOp::Set { value: ColorCode::BLUE } },
        ]
    );
    assert_eq!(CellPointer::parse(&changes[0].ops[0].pointer), Some(CellPointer::new(5, 2)));
    assert_eq!(CellPointer::parse(&changes[0].ops[2].pointer), None);
}

#[test]
fn decode_changes_drops_set_without_integer_value() {
    let event = decode(
        r#"{"type":"changes","name":"alpha","changes":[{"changeId":"c3","ops":{"/0/0":{"type":"set"},"/0/1":{"value":1}}}]}"#,
    )
    .expect("decode");
    let Event::ChangesBroadcast { changes, .. } = event else {
        panic!("expected ChangesBroadcast");
    };
    assert!(changes[0].ops.is_empty());
}

#[test]
fn event_room_reports_room_for_room_events() {
    let event = Event::ChangesBroadcast { name: "alpha".to_owned(), changes: Vec::new() };
    assert_eq!(event.room(), Some("alpha"));
    let event = Event::HelloAck { new_username: "u".to_owned() };
    assert_eq!(event.room(), None);
}
