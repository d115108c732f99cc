#![allow(clippy::unwrap_used, clippy::expect_used)]

use moredata_core::errors::{ExError, ExErrorKind, MoreDataError};
use moredata_core::logging_facility::test_capture::init_test_capture;
use moredata_core::{log_op_end, log_op_error, log_op_start};
use moredata_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE, FIELD_ERR_KIND,
};

#[test]
fn test_start_and_end_pair() {
    let capture = init_test_capture();
    let op_name = "logging_pair_unique_1";

    log_op_start!(op_name, entity = "Member");
    log_op_end!(op_name, duration_ms = 42);

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    let ends: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(starts, 1);
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].fields.get("duration_ms"), Some(&"42".to_string()));
}

#[test]
fn test_start_carries_extra_fields() {
    let capture = init_test_capture();
    let op_name = "logging_fields_unique_2";

    log_op_start!(op_name, entity = "Member", result_set_id = "rs-1");

    let start = capture
        .events()
        .into_iter()
        .find(|e| e.op.as_deref() == Some(op_name))
        .expect("Should have start event");
    assert_eq!(start.fields.get("entity"), Some(&"Member".to_string()));
    assert_eq!(start.fields.get("result_set_id"), Some(&"rs-1".to_string()));
    assert!(start.component.is_some());
}

#[test]
fn test_error_event_includes_code_and_kind() {
    let capture = init_test_capture();
    let op_name = "logging_error_unique_3";

    let err = MoreDataError::UnknownField {
        entity: "Member".into(),
        field: "shoe_size".into(),
    };
    log_op_error!(op_name, err.clone(), duration_ms = 5);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let event = capture
        .events()
        .into_iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");

    assert_eq!(
        event.fields.get(FIELD_ERR_CODE),
        Some(&"ERR_UNKNOWN_FIELD".to_string())
    );
    assert_eq!(
        event.fields.get(FIELD_ERR_KIND),
        Some(&"UnknownField".to_string())
    );

    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::UnknownField);
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_assert_event_exists_fails_for_missing_op() {
    let capture = init_test_capture();
    capture.assert_event_exists("logging_nonexistent_unique_999", EVENT_START);
}
