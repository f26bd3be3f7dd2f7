//! Native FFmpeg log control.
//!
//! FFmpeg writes its own diagnostics to stderr, independently of the Rust
//! [`log`](https://crates.io/crates/log) facade. The packet walk performed by
//! [`KeyframeIndexer::parse`](crate::KeyframeIndexer::parse) is extremely
//! noisy under the default level on perfectly valid inputs, so the indexer
//! drops the level to [`NativeLogLevel::Quiet`] once its input is open.
//!
//! The level is process-global: every user of the linked FFmpeg libraries in
//! the same process observes the change. [`set_native_log_level`] is public
//! so embedders can re-tune it afterwards.

use ffmpeg_next::util::log::Level;

/// FFmpeg's own log verbosity, mirroring the `AV_LOG_*` constants.
///
/// Ordered from most quiet to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeLogLevel {
    /// Print nothing at all.
    Quiet,
    /// Conditions the process cannot survive.
    Panic,
    /// Unrecoverable errors; the context becomes unusable.
    Fatal,
    /// Recoverable errors.
    Error,
    /// Warnings (FFmpeg's default level).
    Warning,
    /// Informational messages.
    Info,
    /// Verbose informational messages.
    Verbose,
    /// Debugging output.
    Debug,
    /// Extremely verbose tracing output.
    Trace,
}

impl NativeLogLevel {
    fn to_level(self) -> Level {
        match self {
            NativeLogLevel::Quiet => Level::Quiet,
            NativeLogLevel::Panic => Level::Panic,
            NativeLogLevel::Fatal => Level::Fatal,
            NativeLogLevel::Error => Level::Error,
            NativeLogLevel::Warning => Level::Warning,
            NativeLogLevel::Info => Level::Info,
            NativeLogLevel::Verbose => Level::Verbose,
            NativeLogLevel::Debug => Level::Debug,
            NativeLogLevel::Trace => Level::Trace,
        }
    }
}

/// Set the process-global FFmpeg log level.
///
/// Controls only what the native libraries print to stderr; Rust-side `log`
/// output is unaffected.
pub fn set_native_log_level(level: NativeLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_level());
}
