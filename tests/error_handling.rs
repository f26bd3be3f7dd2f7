//! Error handling integration tests.
//!
//! These verify that each failure point surfaces its own error kind. Most
//! cases need no media fixtures; the codec-mismatch cases use the optional
//! fixtures described in `tests/fixtures/README.md`.

use std::path::Path;

use gopseek::{GopSeekError, IntervalDecoder, KeyframeIndexer};

#[test]
fn empty_path_is_missing_file() {
    let result = KeyframeIndexer::open("");
    assert!(matches!(result, Err(GopSeekError::MissingFile)));

    let result = IntervalDecoder::open("");
    assert!(matches!(result, Err(GopSeekError::MissingFile)));
}

#[test]
fn nonexistent_file_is_an_open_failure() {
    let result = KeyframeIndexer::open("this_file_does_not_exist.mp4");
    let error = result.err().expect("expected an error");
    assert!(matches!(error, GopSeekError::OpenFailure { .. }));

    let message = error.to_string();
    assert!(
        message.contains("Failed to open input"),
        "error message should mention the failed open: {message}",
    );
}

#[test]
fn garbage_input_is_rejected() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let garbage_path = temporary_directory.path().join("garbage.mp4");
    std::fs::write(&garbage_path, b"this is not a media file")
        .expect("Failed to write garbage file");

    let result = KeyframeIndexer::open(&garbage_path);
    assert!(result.is_err(), "expected an error for a non-media file");
}

#[test]
fn empty_wanted_set_is_rejected_by_the_decoder() {
    let path = "tests/fixtures/gop12.mp4";
    if !Path::new(path).exists() {
        return;
    }

    let table = gopseek::index_keyframes(path).expect("index");

    let mut decoder = IntervalDecoder::open(path).expect("open");
    let result = decoder.set_interval_map(&table, &[]);
    assert!(matches!(result, Err(GopSeekError::EmptyInput)));
}

#[test]
fn non_h264_video_is_an_unsupported_codec() {
    let path = "tests/fixtures/not_h264.webm";
    if !Path::new(path).exists() {
        return;
    }

    let result = KeyframeIndexer::open(path);
    assert!(matches!(
        result,
        Err(GopSeekError::UnsupportedCodec { .. })
    ));
}

#[test]
fn audio_only_input_has_no_video_stream() {
    let path = "tests/fixtures/audio_only.m4a";
    if !Path::new(path).exists() {
        return;
    }

    let result = KeyframeIndexer::open(path);
    assert!(matches!(result, Err(GopSeekError::NoVideoStream)));

    let result = IntervalDecoder::open(path);
    assert!(matches!(result, Err(GopSeekError::NoVideoStream)));
}
