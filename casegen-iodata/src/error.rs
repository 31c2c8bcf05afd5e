use thiserror::Error;

use crate::data::ScalarKind;

/// The errors produced by the codec and by the raw-buffer bridge.
///
/// Every error is raised at the point of detection and propagates to the
/// caller untouched: the codec never retries nor recovers. The process
/// orchestrator is the one mapping these to a verdict.
#[derive(Debug, Error)]
pub enum IoDataError {
    /// A scalar token could not be parsed with the expected kind.
    #[error("malformed {kind} token {token:?}")]
    Parse {
        /// The kind the token was parsed as.
        kind: ScalarKind,
        /// The offending token.
        token: String,
    },
    /// A length prefix was negative.
    #[error("negative length prefix {0}")]
    InvalidSize(i64),
    /// A text character code was outside `[0, 255]`.
    #[error("character code {0} is outside [0, 255]")]
    NonAsciiChar(i64),
    /// Sub-arrays at the same depth have different lengths.
    #[error("array is not a rectangle")]
    RectangleMismatch,
    /// A type name in the task configuration is not known.
    #[error("unknown data type {0:?}")]
    UnknownKind(String),
    /// The raw-buffer bridge failed to allocate.
    #[error("raw buffer allocation failed")]
    AllocationFailure,
    /// Text holding an interior NUL byte cannot cross the raw boundary,
    /// where text is NUL-terminated.
    #[error("text with an interior NUL byte has no raw representation")]
    EmbeddedNul,
    /// The value handed to the bridge does not match the declared shape.
    #[error("value does not match the declared shape")]
    ShapeMismatch,
    /// The stream ended in the middle of a value.
    #[error("unexpected end of stream")]
    UnexpectedEof,
    /// The underlying stream failed.
    #[error("stream error")]
    Io(#[from] std::io::Error),
}
