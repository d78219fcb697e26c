use super::BinaryName;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by hierarchy queries
#[derive(Debug)]
pub enum Error {
    /// The metadata source could not produce an edge for the named type
    ///
    /// There is no safe default for an unknown supertype, so this always reaches the caller.
    MetadataUnavailable { name: BinaryName, cause: SourceError },

    /// A query received something that isn't a well-formed type, or the metadata describes an
    /// impossible hierarchy (self loops, cycles, edges for the wrong type)
    InvariantViolation(String),
}

/// Failure to read the edge of one type from a metadata source
#[derive(Debug)]
pub enum SourceError {
    /// No metadata exists for this type
    NotFound(BinaryName),

    /// Metadata exists but could not be understood
    Malformed { name: BinaryName, message: String },

    /// Reading the metadata failed
    IoError(std::io::Error),
}

impl Error {
    pub fn invariant(message: impl Into<String>) -> Error {
        Error::InvariantViolation(message.into())
    }

    /// Is this a missing-metadata error (as opposed to a malformed query)?
    pub fn is_metadata_unavailable(&self) -> bool {
        matches!(self, Error::MetadataUnavailable { .. })
    }
}

impl SourceError {
    pub fn malformed(name: &BinaryName, message: impl Into<String>) -> SourceError {
        SourceError::Malformed {
            name: name.clone(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MetadataUnavailable { name, cause } => {
                write!(f, "metadata unavailable for '{}': {}", name, cause)
            }
            Error::InvariantViolation(msg) => write!(f, "invariant violation: {}", msg),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NotFound(name) => write!(f, "class '{}' not found", name),
            SourceError::Malformed { name, message } => {
                write!(f, "malformed class '{}': {}", name, message)
            }
            SourceError::IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MetadataUnavailable { cause, .. } => Some(cause),
            Error::InvariantViolation(_) => None,
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> SourceError {
        SourceError::IoError(err)
    }
}
