//! Error types for geomem

use thiserror::Error;

/// Result type alias using [`GeomemError`]
pub type Result<T> = std::result::Result<T, GeomemError>;

/// Errors raised by the codec, the geometry engine and the index.
///
/// All of them are local input-validation failures; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomemError {
    /// An argument violated a precondition (lengths, box orientation, caps)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A character outside the base32 alphabet
    #[error("Invalid character: '{0}'")]
    InvalidCharacter(char),

    /// Adjacency of the zero-length hash
    #[error("Adjacent hash of an empty hash is undefined")]
    EmptyHash,

    /// A packed hash whose length field is outside 1..=12
    #[error("Invalid packed hash: {0:#018x}")]
    InvalidPackedHash(u64),

    /// Configuration failed validation or parsing
    #[error("Config error: {0}")]
    Config(String),
}

impl GeomemError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        GeomemError::InvalidArgument(msg.into())
    }
}
