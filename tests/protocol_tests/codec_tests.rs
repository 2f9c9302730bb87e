//! Codec Tests
//!
//! Tests for request frame encoding and frame decoding.

use bytes::Bytes;
use ssdb_client::protocol::{decode_frame, encode_frame, Command, FrameEncoder, ZRange};
use ssdb_client::SsdbError;

fn fields(frame: &[u8]) -> Vec<Vec<u8>> {
    decode_frame(Bytes::copy_from_slice(frame))
        .unwrap()
        .into_iter()
        .map(|f| f.to_vec())
        .collect()
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_set() {
    let frame = encode_frame(&["set", "test", "456"]);
    assert_eq!(&frame[..], b"3\nset\n4\ntest\n3\n456\n\n");
}

#[test]
fn test_encode_empty_argument() {
    let frame = encode_frame(&["get", ""]);
    assert_eq!(&frame[..], b"3\nget\n0\n\n\n");
}

#[test]
fn test_encode_no_arguments() {
    let frame = encode_frame::<&str>(&[]);
    assert_eq!(&frame[..], b"\n");
}

#[test]
fn test_encode_embedded_newline_is_not_escaped() {
    let frame = encode_frame(&["set", "k", "a\nb"]);
    assert_eq!(&frame[..], b"3\nset\n1\nk\n3\na\nb\n\n");
}

#[test]
fn test_frame_encoder_integers() {
    let frame = FrameEncoder::new()
        .arg("zscan")
        .int(-5)
        .uint(10)
        .opt_int(None)
        .opt_int(Some(7))
        .finish();
    assert_eq!(&frame[..], b"5\nzscan\n2\n-5\n2\n10\n0\n\n1\n7\n\n");
}

#[test]
fn test_command_encode_incr() {
    let cmd = Command::Incr {
        key: b"test".to_vec(),
        by: 100,
    };
    assert_eq!(&cmd.encode()[..], b"4\nincr\n4\ntest\n3\n100\n\n");
}

#[test]
fn test_command_encode_zrscan_open_bounds() {
    let cmd = Command::Zrscan(ZRange {
        name: b"z".to_vec(),
        key_start: Vec::new(),
        score_start: None,
        score_end: Some(100),
        limit: 10,
    });
    assert_eq!(
        fields(&cmd.encode()),
        vec![
            b"zrscan".to_vec(),
            b"z".to_vec(),
            vec![],
            vec![],
            b"100".to_vec(),
            b"10".to_vec(),
        ]
    );
}

#[test]
fn test_command_encode_multi_get() {
    let cmd = Command::MultiGet {
        keys: vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()],
    };
    assert_eq!(
        fields(&cmd.encode()),
        vec![b"multi_get".to_vec(), b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]
    );
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_get_reply() {
    assert_eq!(fields(b"2\nok\n3\n456\n\n"), vec![b"ok".to_vec(), b"456".to_vec()]);
}

#[test]
fn test_decode_honours_length_prefix() {
    // A naive newline split would produce four fields here
    assert_eq!(
        fields(b"2\nok\n5\na\n\nbc\n\n"),
        vec![b"ok".to_vec(), b"a\n\nbc".to_vec()]
    );
}

#[test]
fn test_decode_stops_at_blank_line() {
    assert_eq!(fields(b"2\nok\n\n1\nx\n\n"), vec![b"ok".to_vec()]);
}

#[test]
fn test_decode_tolerates_crlf() {
    assert_eq!(
        fields(b"2\r\nok\r\n1\r\nx\r\n\r\n"),
        vec![b"ok".to_vec(), b"x".to_vec()]
    );
}

#[test]
fn test_decode_truncated_frame() {
    let err = decode_frame(Bytes::from_static(b"2\nok\n3\n45")).unwrap_err();
    assert!(matches!(err, SsdbError::Protocol(_)));
}

#[test]
fn test_decode_missing_terminator() {
    let err = decode_frame(Bytes::from_static(b"2\nok\n")).unwrap_err();
    assert!(matches!(err, SsdbError::Protocol(_)));
}

#[test]
fn test_decode_invalid_length_prefix() {
    let err = decode_frame(Bytes::from_static(b"xx\nok\n\n")).unwrap_err();
    assert!(matches!(err, SsdbError::Protocol(_)));
}

#[test]
fn test_decode_length_mismatch() {
    // Declared 2 bytes, but the byte after them is not a newline
    let err = decode_frame(Bytes::from_static(b"2\nokay\n\n")).unwrap_err();
    assert!(matches!(err, SsdbError::Protocol(_)));
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_round_trip_awkward_arguments() {
    let args: Vec<Vec<u8>> = vec![
        b"set".to_vec(),
        Vec::new(),
        b"\n".to_vec(),
        b"\n\n".to_vec(),
        b"12\n3\n".to_vec(),
        b"\r\n".to_vec(),
        b"plain".to_vec(),
    ];
    let decoded = decode_frame(encode_frame(&args)).unwrap();
    assert_eq!(decoded, args);
}

#[test]
fn test_round_trip_binary_data() {
    let binary_key: Vec<u8> = vec![0x00, 0x01, 0xFF, 0xFE, 0x80];
    let binary_value: Vec<u8> = (0..=255).collect();

    let args = vec![b"set".to_vec(), binary_key, binary_value];
    let decoded = decode_frame(encode_frame(&args)).unwrap();
    assert_eq!(decoded, args);
}

#[test]
fn test_round_trip_large_value() {
    let value = vec![b'\n'; 100_000];
    let args = vec![b"set".to_vec(), b"big".to_vec(), value];
    let decoded = decode_frame(encode_frame(&args)).unwrap();
    assert_eq!(decoded, args);
}
