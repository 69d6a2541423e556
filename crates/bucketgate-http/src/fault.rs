//! Failure taxonomy of the request pipeline.

use crate::backend::BackendError;

/// A fault detected locally, before any backend call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientFault {
    /// A PUT that requires a document arrived with no body.
    #[error("empty body, expected {document}")]
    EmptyBody {
        /// Root element of the missing document.
        document: &'static str,
    },
    /// The body is not well-formed XML or violates the document schema.
    #[error("malformed XML: {0}")]
    MalformedXml(String),
    /// The policy body is not a JSON object.
    #[error("malformed policy: {0}")]
    MalformedPolicy(String),
    /// The bucket name breaks the naming rules.
    #[error("invalid bucket name: {0}")]
    InvalidBucketName(String),
    /// A header or query value is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The document is well-formed but describes something unsupported.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// A tag set breaks the tagging rules.
    #[error("invalid tag: {0}")]
    InvalidTag(String),
    /// A body was sent where the headers already carry the content.
    #[error("unexpected content: {0}")]
    UnexpectedContent(String),
    /// `Content-MD5` is not a base64 MD5 digest.
    #[error("invalid Content-MD5")]
    InvalidDigest,
    /// `Content-MD5` does not match the body.
    #[error("Content-MD5 mismatch")]
    BadDigest,
    /// `x-amz-content-sha256` is invalid or does not match the body.
    #[error("content SHA256 mismatch: {0}")]
    ContentSha256Mismatch(String),
    /// The body exceeds the configured size limit.
    #[error("body exceeds {limit} bytes")]
    BodyTooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },
    /// The sub-resource exists but does not accept this method.
    #[error("method not supported by {operation}")]
    UnsupportedMethod {
        /// Name of the addressed operation, e.g. `PostBucketVersioning`.
        operation: String,
    },
}

/// Any failure a handler or the pipeline can produce.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Locally detected fault; no backend call was made.
    #[error(transparent)]
    Client(#[from] ClientFault),
    /// Failure reported by the backend.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// The operation is routed but intentionally not implemented.
    #[error("{operation} is not implemented")]
    NotImplemented {
        /// Name of the stubbed operation.
        operation: String,
    },
}

impl GatewayError {
    /// A stubbed operation.
    #[must_use]
    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::NotImplemented {
            operation: operation.into(),
        }
    }
}

/// Result alias used by handlers.
pub type GatewayResult<T> = Result<T, GatewayError>;
