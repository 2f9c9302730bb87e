//! Response Decoding Tests
//!
//! Tests for status checking and shape-driven reply decoding.

use bytes::Bytes;
use ssdb_client::protocol::{decode_frame, decode_reply, CommandType, Reply, ReplyShape};
use ssdb_client::SsdbError;

fn decode(shape: ReplyShape, frame: &'static [u8]) -> Result<Reply, SsdbError> {
    decode_reply(shape, decode_frame(Bytes::from_static(frame))?)
}

fn b(s: &'static str) -> Bytes {
    Bytes::from_static(s.as_bytes())
}

// =============================================================================
// Status Tests
// =============================================================================

#[test]
fn test_void_ok() {
    assert_eq!(decode(ReplyShape::Void, b"2\nok\n\n").unwrap(), Reply::Void);
}

#[test]
fn test_status_is_case_insensitive() {
    assert_eq!(decode(ReplyShape::Void, b"2\nOK\n\n").unwrap(), Reply::Void);
    assert_eq!(decode(ReplyShape::Void, b"2\nOk\n\n").unwrap(), Reply::Void);
}

#[test]
fn test_void_ignores_trailing_fields() {
    assert_eq!(decode(ReplyShape::Void, b"2\nok\n1\n1\n\n").unwrap(), Reply::Void);
}

#[test]
fn test_not_found_status() {
    let err = decode(ReplyShape::Scalar, b"9\nnot_found\n\n").unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_transport());
    match err {
        SsdbError::Server { status, message } => {
            assert_eq!(status, "not_found");
            assert_eq!(message, None);
        }
        other => panic!("Expected server error, got {:?}", other),
    }
}

#[test]
fn test_error_status_carries_message() {
    let err = decode(ReplyShape::Void, b"5\nerror\n14\nvalue too long\n\n").unwrap_err();
    match err {
        SsdbError::Server { status, message } => {
            assert_eq!(status, "error");
            assert_eq!(message.as_deref(), Some("value too long"));
        }
        other => panic!("Expected server error, got {:?}", other),
    }
}

#[test]
fn test_missing_status_is_protocol_error() {
    let err = decode(ReplyShape::Void, b"\n").unwrap_err();
    assert!(matches!(err, SsdbError::Protocol(_)));
}

#[test]
fn test_server_error_checked_before_shape() {
    // Odd field count would be a protocol error, but the status wins
    let err = decode(ReplyShape::Map, b"4\nfail\n1\nx\n\n").unwrap_err();
    assert!(matches!(err, SsdbError::Server { .. }));
}

// =============================================================================
// Shape Tests
// =============================================================================

#[test]
fn test_scalar() {
    assert_eq!(
        decode(ReplyShape::Scalar, b"2\nok\n3\n456\n\n").unwrap(),
        Reply::Scalar(b("456"))
    );
}

#[test]
fn test_scalar_empty_value() {
    assert_eq!(
        decode(ReplyShape::Scalar, b"2\nok\n0\n\n\n").unwrap(),
        Reply::Scalar(Bytes::new())
    );
}

#[test]
fn test_scalar_wrong_field_count() {
    let none = decode(ReplyShape::Scalar, b"2\nok\n\n").unwrap_err();
    assert!(matches!(none, SsdbError::Decode(_)));

    let two = decode(ReplyShape::Scalar, b"2\nok\n1\na\n1\nb\n\n").unwrap_err();
    assert!(matches!(two, SsdbError::Decode(_)));
}

#[test]
fn test_integer() {
    assert_eq!(
        decode(ReplyShape::Integer, b"2\nok\n3\n-42\n\n").unwrap(),
        Reply::Integer(-42)
    );
}

#[test]
fn test_unparsable_integer_is_decode_error() {
    let err = decode(ReplyShape::Integer, b"2\nok\n3\nabc\n\n").unwrap_err();
    assert!(matches!(err, SsdbError::Decode(_)));
}

#[test]
fn test_list() {
    assert_eq!(
        decode(ReplyShape::List, b"2\nok\n1\na\n1\nb\n1\nc\n\n").unwrap(),
        Reply::List(vec![b("a"), b("b"), b("c")])
    );
    assert_eq!(decode(ReplyShape::List, b"2\nok\n\n").unwrap(), Reply::List(vec![]));
}

#[test]
fn test_map_preserves_wire_order() {
    assert_eq!(
        decode(ReplyShape::Map, b"2\nok\n1\nz\n1\n1\n1\na\n1\n2\n\n").unwrap(),
        Reply::Map(vec![(b("z"), b("1")), (b("a"), b("2"))])
    );
}

#[test]
fn test_map_odd_count_is_protocol_error() {
    let err = decode(ReplyShape::Map, b"2\nok\n1\nk\n1\nv\n1\nx\n\n").unwrap_err();
    assert!(matches!(err, SsdbError::Protocol(_)));
}

#[test]
fn test_score_map() {
    assert_eq!(
        decode(ReplyShape::ScoreMap, b"2\nok\n1\na\n3\n100\n1\nb\n2\n-7\n\n").unwrap(),
        Reply::ScoreMap(vec![(b("a"), 100), (b("b"), -7)])
    );
}

#[test]
fn test_score_map_odd_count_returns_no_partial_mapping() {
    let err = decode(ReplyShape::ScoreMap, b"2\nok\n1\na\n1\n1\n1\nb\n\n").unwrap_err();
    assert!(matches!(err, SsdbError::Protocol(_)));
}

#[test]
fn test_score_map_bad_score_is_decode_error() {
    let err = decode(ReplyShape::ScoreMap, b"2\nok\n1\na\n3\n1.5\n\n").unwrap_err();
    assert!(matches!(err, SsdbError::Decode(_)));
}

// =============================================================================
// Command Shape Tests
// =============================================================================

#[test]
fn test_command_shapes() {
    assert_eq!(CommandType::Set.shape(), ReplyShape::Void);
    assert_eq!(CommandType::Incr.shape(), ReplyShape::Void);
    assert_eq!(CommandType::Get.shape(), ReplyShape::Scalar);
    assert_eq!(CommandType::Hget.shape(), ReplyShape::Scalar);
    assert_eq!(CommandType::Keys.shape(), ReplyShape::List);
    assert_eq!(CommandType::Scan.shape(), ReplyShape::Map);
    assert_eq!(CommandType::MultiGet.shape(), ReplyShape::Map);
    assert_eq!(CommandType::Zrscan.shape(), ReplyShape::ScoreMap);
    assert_eq!(CommandType::Zget.shape(), ReplyShape::Integer);
}

// =============================================================================
// Accessor Tests
// =============================================================================

#[test]
fn test_typed_accessors() {
    assert_eq!(Reply::Scalar(b("v")).into_bytes().unwrap(), b("v"));
    assert_eq!(Reply::Scalar(b("12")).into_int().unwrap(), 12);
    assert_eq!(
        Reply::Map(vec![(b("m"), b("3"))]).into_scores().unwrap(),
        vec![(b("m"), 3)]
    );

    let err = Reply::Void.into_list().unwrap_err();
    assert!(matches!(err, SsdbError::Decode(_)));
}
