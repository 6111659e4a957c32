//! Error types for pluglib.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Text-document parsing, reference
//! linking, binary codec, and transport errors are all captured here.
//!
//! Contract violations in the binary layer (an out-of-range slot index, a
//! memory access outside any allocated image element) are *not* represented
//! as `Error` values: layout offsets are compile-time constants, so such a
//! condition is a bug in a codec and panics instead.

/// The error type for all pluglib operations.
///
/// The `location` carried by the structured variants is a human-readable
/// path into the offending document or record, e.g. `channels[3].groupList`
/// or `zone bank, slot 12, member 4`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A structural error in the text document (wrong node type, missing
    /// required key, malformed scalar). Aborts the whole read.
    #[error("parse error at {location}: {reason}")]
    Parse {
        /// Path or position of the offending node.
        location: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A textual id or binary index reference did not resolve to an
    /// existing object of the expected kind.
    #[error("link error at {location}: {reason}")]
    Link {
        /// Which record and field held the reference.
        location: String,
        /// Why it did not resolve.
        reason: String,
    },

    /// A binary record could not be decoded into a generic object.
    #[error("decode error at {location}: {reason}")]
    Decode {
        /// Which bank/record failed.
        location: String,
        /// Why it failed.
        reason: String,
    },

    /// A generic object could not be encoded into the binary layout
    /// (bank overflow, value outside the field domain, missing index
    /// assignment for a referenced object).
    #[error("encode error at {location}: {reason}")]
    Encode {
        /// Which record or bank failed.
        location: String,
        /// Why it failed.
        reason: String,
    },

    /// A transport-level error while reading or writing device memory.
    #[error("transport error: {0}")]
    Transport(String),

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Construct a [`Error::Parse`] from anything stringly.
    pub fn parse(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Parse {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Construct a [`Error::Link`] from anything stringly.
    pub fn link(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Link {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Construct a [`Error::Decode`] from anything stringly.
    pub fn decode(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Decode {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Construct a [`Error::Encode`] from anything stringly.
    pub fn encode(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Encode {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
