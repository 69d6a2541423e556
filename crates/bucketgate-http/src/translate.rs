//! Error translator: maps every gateway failure to an S3 error response.
//!
//! The mapping is a pure, total function of the failure; logging happens in
//! [`error_response`] so the mapping itself stays side-effect free.

use bucketgate_model::error::{S3Error, S3ErrorCode};
use bytes::Bytes;
use http_body_util::Full;
use tracing::{debug, error, warn};

use crate::backend::{BackendError, ConfigKind};
use crate::fault::{ClientFault, GatewayError};

/// Content type of XML error envelopes.
pub const XML_CONTENT_TYPE: &str = "application/xml";
/// Content type of locally detected bad requests.
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

/// An S3 error together with the content type it is sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// The wire error.
    pub error: S3Error,
    /// `Content-Type` of the response.
    pub content_type: &'static str,
}

/// Map a failure on `bucket` to its S3 error.
#[must_use]
pub fn translate(err: &GatewayError, bucket: &str) -> Translation {
    let resource = format!("/{bucket}");
    match err {
        GatewayError::Client(fault) => translate_client(fault, resource),
        GatewayError::Backend(backend) => Translation {
            error: translate_backend(backend, resource),
            content_type: XML_CONTENT_TYPE,
        },
        GatewayError::NotImplemented { operation } => Translation {
            error: S3Error::not_implemented(operation),
            content_type: XML_CONTENT_TYPE,
        },
    }
}

fn translate_client(fault: &ClientFault, resource: String) -> Translation {
    let error = match fault {
        ClientFault::EmptyBody { document } => S3Error::with_message(
            S3ErrorCode::MalformedXML,
            format!("The request body is empty: missing {document} configuration"),
        ),
        ClientFault::MalformedXml(_) => S3Error::new(S3ErrorCode::MalformedXML),
        ClientFault::MalformedPolicy(detail) => {
            S3Error::with_message(S3ErrorCode::MalformedPolicy, detail.clone())
        }
        ClientFault::InvalidBucketName(detail) => {
            S3Error::with_message(S3ErrorCode::InvalidBucketName, detail.clone())
        }
        ClientFault::InvalidArgument(detail) => {
            S3Error::with_message(S3ErrorCode::InvalidArgument, detail.clone())
        }
        ClientFault::InvalidRequest(detail) => {
            S3Error::with_message(S3ErrorCode::InvalidRequest, detail.clone())
        }
        ClientFault::InvalidTag(detail) => {
            S3Error::with_message(S3ErrorCode::InvalidTag, detail.clone())
        }
        ClientFault::UnexpectedContent(detail) => {
            S3Error::with_message(S3ErrorCode::UnexpectedContent, detail.clone())
        }
        ClientFault::InvalidDigest => S3Error::new(S3ErrorCode::InvalidDigest),
        ClientFault::BadDigest => S3Error::new(S3ErrorCode::BadDigest),
        ClientFault::ContentSha256Mismatch(detail) => {
            S3Error::with_message(S3ErrorCode::XAmzContentSHA256Mismatch, detail.clone())
        }
        ClientFault::BodyTooLarge { limit } => S3Error::with_message(
            S3ErrorCode::MaxMessageLengthExceeded,
            format!("Your request was too big; the limit is {limit} bytes"),
        ),
        ClientFault::UnsupportedMethod { operation } => {
            return Translation {
                error: S3Error::not_implemented(operation),
                content_type: XML_CONTENT_TYPE,
            };
        }
    };
    Translation {
        error: error.with_resource(resource),
        content_type: TEXT_CONTENT_TYPE,
    }
}

fn translate_backend(err: &BackendError, resource: String) -> S3Error {
    let error = match err {
        BackendError::BucketNotFound(_) | BackendError::AccessDenied(_) => {
            S3Error::new(S3ErrorCode::NoSuchBucket)
        }
        BackendError::BucketAlreadyExists(_) => S3Error::new(S3ErrorCode::BucketAlreadyExists),
        BackendError::BucketAlreadyOwnedByCaller(_) => {
            S3Error::new(S3ErrorCode::BucketAlreadyOwnedByYou)
        }
        BackendError::KeyNotFound(_) => S3Error::new(S3ErrorCode::NoSuchKey),
        BackendError::BucketNotEmpty(_) => S3Error::new(S3ErrorCode::BucketNotEmpty),
        BackendError::NoSuchConfiguration(kind) => S3Error::new(missing_configuration_code(*kind)),
        BackendError::InvalidArgument(detail) => {
            S3Error::with_message(S3ErrorCode::InvalidArgument, detail.clone())
        }
        BackendError::Unsupported(operation) => return S3Error::not_implemented(operation),
        BackendError::Cancelled(operation) => S3Error::with_message(
            S3ErrorCode::ServiceUnavailable,
            format!("The backend did not complete {operation} in time"),
        ),
        BackendError::Unknown(message) => S3Error::internal_error(message.clone()),
    };
    error.with_resource(resource)
}

fn missing_configuration_code(kind: ConfigKind) -> S3ErrorCode {
    match kind {
        ConfigKind::Cors => S3ErrorCode::NoSuchCORSConfiguration,
        ConfigKind::Policy => S3ErrorCode::NoSuchBucketPolicy,
        ConfigKind::Tagging => S3ErrorCode::NoSuchTagSet,
        ConfigKind::Lifecycle => S3ErrorCode::NoSuchLifecycleConfiguration,
        ConfigKind::Website => S3ErrorCode::NoSuchWebsiteConfiguration,
        ConfigKind::Replication => S3ErrorCode::ReplicationConfigurationNotFoundError,
    }
}

/// Translate, log and render a failure as a complete HTTP response.
///
/// NotImplemented outcomes are logged at `warn` so routed-but-missing
/// operations show up in telemetry.
#[must_use]
pub fn error_response(
    err: &GatewayError,
    bucket: &str,
    request_id: &str,
) -> http::Response<Full<Bytes>> {
    let Translation {
        error: s3_error,
        content_type,
    } = translate(err, bucket);

    match s3_error.code {
        S3ErrorCode::NotImplemented => {
            warn!(bucket, request_id, resource = ?s3_error.resource, "operation not implemented");
        }
        S3ErrorCode::InternalError | S3ErrorCode::ServiceUnavailable => {
            error!(bucket, request_id, error = %err, "backend failure");
        }
        _ => debug!(bucket, request_id, error = %err, code = %s3_error.code, "request failed"),
    }

    let s3_error = s3_error.with_request_id(request_id);
    render_error(&s3_error, content_type)
}

/// Render an already translated error as the `<Error>` envelope.
#[must_use]
pub fn render_error(err: &S3Error, content_type: &'static str) -> http::Response<Full<Bytes>> {
    let xml = bucketgate_xml::error_to_xml(
        err.code.as_str(),
        &err.message,
        err.resource.as_deref().unwrap_or_default(),
        err.request_id.as_deref().unwrap_or_default(),
    );

    let mut response = http::Response::new(Full::new(Bytes::from(xml)));
    *response.status_mut() = err.status_code;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static(content_type),
    );
    response
}
