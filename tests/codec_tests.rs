//! Codec Tests
//!
//! Tests for TSV encoding/decoding and the wire-format encodings.

use tycoonkv::protocol::{
    decode_records, encode_records, encode_rest_path, ColumnEncoding, FieldEncoding, Record,
};
use tycoonkv::TycoonError;

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_printable_uses_identity() {
    let records = [Record::new("k", "v")];
    let (body, encoding) = encode_records(&records);

    assert_eq!(encoding, FieldEncoding::Identity);
    assert_eq!(body, b"k\tv\n");
}

#[test]
fn test_encode_control_byte_forces_base64() {
    // 0x00 < 0x20, so the whole batch must switch to base64
    let records = [Record::new("k", vec![0x00])];
    let (body, encoding) = encode_records(&records);

    assert_eq!(encoding, FieldEncoding::Base64);
    assert_eq!(body, b"aw==\tAA==\n");
}

#[test]
fn test_encode_high_byte_forces_base64() {
    let records = [Record::new(vec![0xFFu8], "v")];
    let (_, encoding) = encode_records(&records);

    assert_eq!(encoding, FieldEncoding::Base64);
}

#[test]
fn test_encode_binary_anywhere_encodes_whole_batch() {
    // The second record is binary; the first must still be base64-encoded
    let records = [Record::new("a", "b"), Record::new("c", vec![0x01])];
    let (body, encoding) = encode_records(&records);

    assert_eq!(encoding, FieldEncoding::Base64);
    assert_eq!(body, b"YQ==\tYg==\nYw==\tAQ==\n");
}

#[test]
fn test_encode_boundary_bytes_stay_identity() {
    // 0x20 and 0x7E are the printable boundaries, both inclusive
    let records = [Record::new(vec![0x20u8], vec![0x7Eu8])];
    let (body, encoding) = encode_records(&records);

    assert_eq!(encoding, FieldEncoding::Identity);
    assert_eq!(body, b" \t~\n");
}

#[test]
fn test_encode_empty_batch() {
    let (body, encoding) = encode_records(&[]);

    assert!(body.is_empty());
    assert_eq!(encoding, FieldEncoding::Identity);
}

#[test]
fn test_encode_empty_fields() {
    let records = [Record::new("", "")];
    let (body, encoding) = encode_records(&records);

    assert_eq!(encoding, FieldEncoding::Identity);
    assert_eq!(body, b"\t\n");
}

#[test]
fn test_content_type_per_encoding() {
    assert_eq!(
        FieldEncoding::Identity.content_type(),
        "text/tab-separated-values"
    );
    assert_eq!(
        FieldEncoding::Base64.content_type(),
        "text/tab-separated-values; colenc=B"
    );
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_round_trip_printable() {
    let records = vec![
        Record::new("alpha", "one"),
        Record::new("beta", "two"),
        Record::new("gamma", ""),
    ];
    let (body, encoding) = encode_records(&records);
    let decoded = decode_records(&body, encoding.content_type()).unwrap();

    assert_eq!(decoded, records);
}

#[test]
fn test_round_trip_arbitrary_bytes() {
    let every_byte: Vec<u8> = (0..=255).collect();
    let records = vec![
        Record::new(vec![0x00u8, 0x09, 0x0A, 0xFF], every_byte),
        Record::new("plain", vec![0x7Fu8]),
    ];
    let (body, encoding) = encode_records(&records);
    assert_eq!(encoding, FieldEncoding::Base64);

    let decoded = decode_records(&body, encoding.content_type()).unwrap();
    assert_eq!(decoded, records);
}

// =============================================================================
// Decoder Selection Tests
// =============================================================================

#[test]
fn test_decoder_selection_by_suffix() {
    assert_eq!(
        ColumnEncoding::from_content_type("text/tab-separated-values").unwrap(),
        ColumnEncoding::Identity
    );
    assert_eq!(
        ColumnEncoding::from_content_type("text/tab-separated-values; colenc=B").unwrap(),
        ColumnEncoding::Base64
    );
    assert_eq!(
        ColumnEncoding::from_content_type("text/tab-separated-values; colenc=U").unwrap(),
        ColumnEncoding::Url
    );
}

#[test]
fn test_unknown_suffix_is_rejected() {
    let result = ColumnEncoding::from_content_type("text/tab-separated-values; colenc=Z");
    match result {
        Err(TycoonError::UnknownContentType(ct)) => {
            assert!(ct.contains("colenc=Z"));
        }
        other => panic!("Expected UnknownContentType, got {:?}", other),
    }
}

#[test]
fn test_decode_unknown_content_type_fails() {
    let result = decode_records(b"a\tb\n", "application/json");
    assert!(matches!(result, Err(TycoonError::UnknownContentType(_))));
}

#[test]
fn test_decode_empty_content_type_fails() {
    let result = decode_records(b"a\tb\n", "");
    assert!(matches!(result, Err(TycoonError::UnknownContentType(_))));
}

#[test]
fn test_decode_empty_body_skips_content_type() {
    // An empty body decodes to zero records before the content type is
    // even looked at, so garbage there must not matter.
    let records = decode_records(b"", "application/json").unwrap();
    assert!(records.is_empty());
}

// =============================================================================
// Parse Loop Tests
// =============================================================================

#[test]
fn test_decode_no_tab_yields_nothing() {
    let records = decode_records(b"ab", "text/tab-separated-values").unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_decode_missing_trailing_newline_takes_remainder() {
    // Stream ended mid-record: the remainder after the tab is the value
    let records = decode_records(b"a\tb", "text/tab-separated-values").unwrap();
    assert_eq!(records, vec![Record::new("a", "b")]);
}

#[test]
fn test_decode_tab_at_end_yields_nothing() {
    // Key completed but no value bytes at all
    let records = decode_records(b"k\t", "text/tab-separated-values").unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_decode_empty_value_with_newline_is_a_record() {
    let records = decode_records(b"k\t\n", "text/tab-separated-values").unwrap();
    assert_eq!(records, vec![Record::new("k", "")]);
}

#[test]
fn test_decode_stops_after_last_separator() {
    // Trailing bytes with no tab are normal end of stream, not an error
    let records = decode_records(b"a\t1\ntrailing", "text/tab-separated-values").unwrap();
    assert_eq!(records, vec![Record::new("a", "1")]);
}

#[test]
fn test_decode_preserves_record_order() {
    let body = b"z\t1\na\t2\nm\t3\n";
    let records = decode_records(body, "text/tab-separated-values").unwrap();
    assert_eq!(
        records,
        vec![
            Record::new("z", "1"),
            Record::new("a", "2"),
            Record::new("m", "3"),
        ]
    );
}

// =============================================================================
// Field Decoder Tests
// =============================================================================

#[test]
fn test_base64_fields_decode() {
    let body = b"aw==\tAA==\n";
    let records = decode_records(body, "text/tab-separated-values; colenc=B").unwrap();
    assert_eq!(records, vec![Record::new("k", vec![0x00])]);
}

#[test]
fn test_invalid_base64_propagates() {
    let body = b"!!!not-base64!!!\tAA==\n";
    let result = decode_records(body, "text/tab-separated-values; colenc=B");
    assert!(matches!(result, Err(TycoonError::Base64(_))));
}

#[test]
fn test_url_fields_decode() {
    let body = b"a%20b\tc%2Fd\n";
    let records = decode_records(body, "text/tab-separated-values; colenc=U").unwrap();
    assert_eq!(records, vec![Record::new("a b", "c/d")]);
}

#[test]
fn test_url_decode_is_case_insensitive() {
    let body = b"k\t%2f%2F\n";
    let records = decode_records(body, "text/tab-separated-values; colenc=U").unwrap();
    assert_eq!(records, vec![Record::new("k", "//")]);
}

#[test]
fn test_url_decode_malformed_escape_degrades_to_zero() {
    // Historical behavior: non-hex escape characters decode as nibble 0
    let body = b"k\t%ZZ\n";
    let records = decode_records(body, "text/tab-separated-values; colenc=U").unwrap();
    assert_eq!(records, vec![Record::new("k", vec![0x00])]);
}

#[test]
fn test_url_decode_truncated_escape_does_not_panic() {
    let body = b"k\tab%";
    let records = decode_records(body, "text/tab-separated-values; colenc=U").unwrap();
    assert_eq!(records, vec![Record::new("k", vec![b'a', b'b', 0x00])]);
}

// =============================================================================
// REST Path Escaping Tests
// =============================================================================

#[test]
fn test_rest_path_plain_key() {
    assert_eq!(encode_rest_path("hello"), "/hello");
}

#[test]
fn test_rest_path_unreserved_characters() {
    assert_eq!(encode_rest_path("A-z_0.9~"), "/A-z_0.9~");
}

#[test]
fn test_rest_path_space_becomes_plus() {
    assert_eq!(encode_rest_path("a b"), "/a+b");
}

#[test]
fn test_rest_path_escapes_reserved_bytes() {
    assert_eq!(encode_rest_path("a/b?c=d"), "/a%2Fb%3Fc%3Dd");
}

#[test]
fn test_rest_path_escapes_multibyte_utf8() {
    // Each UTF-8 byte is escaped individually with uppercase hex
    assert_eq!(encode_rest_path("é"), "/%C3%A9");
}

#[test]
fn test_rest_path_empty_key() {
    assert_eq!(encode_rest_path(""), "/");
}
