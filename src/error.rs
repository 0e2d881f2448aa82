//! Error types for the signature surface

use thiserror::Error;

/// Result type alias for surface operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur inside the signature surface.
///
/// None of these cross the controller boundary as failures visible to the
/// host: every operation recovers to "blank or unchanged surface". The
/// variants exist so internal layers (codec, decode worker, CLI) can report
/// precisely what went wrong.
#[derive(Error, Debug)]
pub enum Error {
    /// A serialized signature could not be decoded back into a bitmap
    #[error("Signature decode failed: {0}")]
    DecodeError(String),

    /// The canvas contents could not be exported as an encoded image
    #[error("Signature encode failed: {0}")]
    EncodeError(String),

    /// The decode worker is gone (its channel hung up)
    #[error("Decode worker unavailable: {0}")]
    WorkerError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
