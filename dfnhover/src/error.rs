//! Library error type.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DfnError>;

#[derive(Debug, Error)]
pub enum DfnError {
    /// A field key that is neither interpreted nor explicitly ignored.
    #[error("unknown field `{key}` in section:\n{section}")]
    UnknownField { key: String, section: String },

    /// `name` or `block` absent from a regular section.
    #[error("missing required field `{field}` in section:\n{section}")]
    MissingField {
        field: &'static str,
        section: String,
    },

    #[error("no common description for `{0}`")]
    MissingCommon(String),

    #[error("malformed REPLACE payload `{payload}`: {reason}")]
    MalformedPayload { payload: String, reason: String },

    #[error("invalid glob pattern")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
