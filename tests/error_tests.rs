//! Tests for the Error type

use ods::{Error, TagID};
use std::io;

#[test]
fn test_error_display_truncated_data() {
    let error = Error::TruncatedData;
    assert_eq!(format!("{}", error), "unexpected end of input");
}

#[test]
fn test_error_display_trailing_data() {
    let error = Error::TrailingData(42);
    assert_eq!(
        format!("{}", error),
        "trailing data after value: 42 bytes remaining"
    );
}

#[test]
fn test_error_display_unknown_tag_type() {
    let error = Error::UnknownTagType(0xFF);
    assert_eq!(format!("{}", error), "unknown ODS tag type: 0xff");
}

#[test]
fn test_error_display_key_errors() {
    assert_eq!(
        Error::InvalidKey("a..b".into()).to_string(),
        "invalid key: \"a..b\""
    );
    assert_eq!(
        Error::KeyNotFound("Car.color".into()).to_string(),
        "key not found: Car.color"
    );
    assert_eq!(
        Error::NotAContainer("Car.type".into()).to_string(),
        "`Car.type` is not a container"
    );
    assert!(
        Error::CompressedObjectTraversal("Packed".into())
            .to_string()
            .contains("`Packed`")
    );
}

#[test]
fn test_error_display_tag_mismatch() {
    let error = Error::TagMismatch {
        expected: TagID::Int,
        found: Some(TagID::String),
    };
    assert_eq!(
        error.to_string(),
        "tag type mismatch: expected Int, got Some(String)"
    );
}

#[test]
fn test_error_display_io() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let error = Error::Io(io_error);
    assert!(format!("{}", error).contains("file not found"));
}

#[test]
fn test_error_from_io() {
    let error: Error = io::Error::other("boom").into();
    assert!(matches!(error, Error::Io(_)));
}

#[test]
fn test_error_from_utf8() {
    let bytes = [0xC3u8, 0x28];
    let error: Error = std::str::from_utf8(&bytes).unwrap_err().into();
    assert!(matches!(error, Error::Utf8(_)));
    assert!(error.to_string().starts_with("invalid UTF-8"));
}

#[test]
fn test_error_debug() {
    let error = Error::TruncatedData;
    let debug_str = format!("{:?}", error);
    assert!(debug_str.contains("TruncatedData"));
}

#[test]
fn test_error_is_std_error() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
    assert_error::<Error>();
}
