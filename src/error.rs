//! Error handling for areena-rtmp.
//!
//! Errors carry a gRPC-style [`ErrorKind`] and the underlying details.
//!
//! # Error Categories
//!
//! The session protocol only ever fails in a handful of ways:
//! * Message encoding overflow (`OutOfRange`)
//! * Missing or unusable stream descriptor (`NotFound`, `InvalidArgument`)
//! * Server-reported RPC failures (`Aborted`)
//! * Malformed AMF data (`DataLoss`, `Internal`)
//!
//! Any error returned from a protocol step stops the session. Errors from the
//! host transport pass through unchanged, and the host decides how to tear
//! down the connection.
//!
//! # Example
//!
//! ```rust
//! use areena_rtmp::error::{Error, ErrorKind, Result};
//!
//! fn playpath(url: Option<&str>) -> Result<&str> {
//!     url.ok_or_else(|| Error::not_found("descriptor has no url"))
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Main error type combining error kind and details.
#[derive(Debug)]
pub struct Error {
    /// Classification of the error
    pub kind: ErrorKind,

    /// Details of the underlying error
    pub error: Box<dyn std::error::Error + Send + Sync>,
}

/// Standard result type for areena-rtmp operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories based on gRPC status codes.
///
/// See [gRPC status codes](https://github.com/googleapis/googleapis/blob/master/google/rpc/code.proto)
/// for the original definitions.
#[expect(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u32)]
pub enum ErrorKind {
    /// Input could not be interpreted, such as an unparsable stream URL.
    #[error("invalid argument specified")]
    InvalidArgument = 3,

    /// A required field was absent, such as the `url` of a descriptor.
    #[error("not found")]
    NotFound = 5,

    /// The server rejected the operation with `rpcError`.
    #[error("operation aborted")]
    Aborted = 10,

    /// An outbound message did not fit the packet buffer.
    #[error("out of range")]
    OutOfRange = 11,

    /// The AMF serializer rejected a value built by this crate.
    #[error("internal error")]
    Internal = 13,

    /// Inbound data was truncated or could not be decoded.
    #[error("unrecoverable data loss or corruption")]
    DataLoss = 15,
}

impl Error {
    /// Creates a new error with specified kind and details.
    ///
    /// Hosts use this to report their own transport failures.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let err = Error::new(ErrorKind::Aborted, "connection closed");
    /// assert_eq!(err.kind, ErrorKind::Aborted);
    /// ```
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            kind,
            error: error.into(),
        }
    }

    /// Creates an error for operations the server refused to complete.
    pub fn aborted<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Aborted, error)
    }

    /// Creates an error for truncated or undecodable data.
    pub fn data_loss<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::DataLoss, error)
    }

    pub fn internal<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Internal, error)
    }

    /// Creates an error for input that cannot be interpreted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let err = Error::invalid_argument("stream url has no scheme");
    /// assert_eq!(err.kind, ErrorKind::InvalidArgument);
    /// ```
    pub fn invalid_argument<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::InvalidArgument, error)
    }

    pub fn not_found<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::NotFound, error)
    }

    /// Creates an error for a message that does not fit the packet buffer.
    pub fn out_of_range<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::OutOfRange, error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.error.source()
    }
}

/// Formats the error as "{kind}: {details}".
impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}: ", self.kind)?;
        self.error.fmt(fmt)
    }
}

/// Converts AMF0 serialization errors.
///
/// The serializer only fails on values we built ourselves, such as a string
/// that exceeds the 16-bit AMF0 length prefix.
impl From<rml_amf0::Amf0SerializationError> for Error {
    fn from(e: rml_amf0::Amf0SerializationError) -> Self {
        Self::internal(format!("amf0 serialization failed: {e}"))
    }
}

/// Converts AMF0 deserialization errors.
impl From<rml_amf0::Amf0DeserializationError> for Error {
    fn from(e: rml_amf0::Amf0DeserializationError) -> Self {
        Self::data_loss(format!("amf0 deserialization failed: {e}"))
    }
}
