use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed HAR input at {path}: {reason}")]
    MalformedInput { path: String, reason: String },

    #[error("Type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },

    #[error("Invalid timestamp at {path}: {raw:?}")]
    InvalidTimestamp { path: String, raw: String },

    #[error("Cannot encode {path}: {reason}")]
    UnencodableValue { path: String, reason: String },

    #[error("Failed to read or write HAR file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize HAR: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to decode {encoding} content: {reason}")]
    ContentEncoding { encoding: String, reason: String },
}

/// Coarse classification of an [`Error`], handy for matching in callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    TypeMismatch,
    InvalidTimestamp,
    UnencodableValue,
    Io,
    Json,
    ContentEncoding,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedInput { .. } => ErrorKind::MalformedInput,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::InvalidTimestamp { .. } => ErrorKind::InvalidTimestamp,
            Error::UnencodableValue { .. } => ErrorKind::UnencodableValue,
            Error::Io(_) => ErrorKind::Io,
            Error::Json(_) => ErrorKind::Json,
            Error::ContentEncoding { .. } => ErrorKind::ContentEncoding,
        }
    }

    /// Field path of the offending value, e.g. `log.entries[3].request.headersSize`
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::MalformedInput { path, .. }
            | Error::TypeMismatch { path, .. }
            | Error::InvalidTimestamp { path, .. }
            | Error::UnencodableValue { path, .. } => Some(path),
            _ => None,
        }
    }

    pub(crate) fn missing(path: String) -> Self {
        Error::MalformedInput {
            path,
            reason: "required field is missing".to_string(),
        }
    }

    pub(crate) fn unencodable(path: impl Into<String>, reason: &str) -> Self {
        Error::UnencodableValue {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
