//! The gateway's HTTP service implementing hyper's `Service` trait.
//!
//! [`GatewayService`] turns a hyper request into an [`IncomingRequest`] and
//! hands it to the [`Gateway`]. It handles:
//!
//! 1. Health check interception (`GET /_health`, `GET /health`)
//! 2. Bucket resolution from the path or the `Host` header
//! 3. Request body collection under a size limit
//! 4. `Content-MD5` and `x-amz-content-sha256` validation
//! 5. The backend deadline
//! 6. Common response headers (`x-amz-request-id`, `x-amz-id-2`, `Server`)

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Incoming;
use hyper::service::Service;
use md5::Md5;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::fault::{ClientFault, GatewayError};
use crate::gateway::Gateway;
use crate::request::{IncomingRequest, PathTarget, parse_query_params, resolve_target};
use crate::translate::error_response;

/// Configuration for the HTTP service.
#[derive(Debug, Clone)]
pub struct GatewayHttpConfig {
    /// The base domain for virtual-hosted-style requests (e.g., `s3.localhost`).
    pub domain: String,
    /// Whether to take the bucket from the `Host` header.
    pub virtual_hosting: bool,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
    /// How long a backend call may take; `None`, or a timeout too large to
    /// represent, waits indefinitely.
    pub backend_timeout: Option<Duration>,
}

impl Default for GatewayHttpConfig {
    fn default() -> Self {
        Self {
            domain: "s3.localhost".to_owned(),
            virtual_hosting: false,
            max_body_bytes: 1024 * 1024,
            backend_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// The gateway HTTP service.
#[derive(Debug, Clone)]
pub struct GatewayService {
    gateway: Arc<Gateway>,
    config: Arc<GatewayHttpConfig>,
}

impl GatewayService {
    /// Create a service serving `gateway` with the given configuration.
    #[must_use]
    pub fn new(gateway: Gateway, config: GatewayHttpConfig) -> Self {
        Self {
            gateway: Arc::new(gateway),
            config: Arc::new(config),
        }
    }
}

impl Service<http::Request<Incoming>> for GatewayService {
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let gateway = Arc::clone(&self.gateway);
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let response = process_request(req, &gateway, &config, &request_id).await;
            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Process one request through the gateway pipeline.
///
/// Generic over the body so tests can drive it with in-memory bodies.
pub async fn process_request<B>(
    req: http::Request<B>,
    gateway: &Gateway,
    config: &GatewayHttpConfig,
    request_id: &str,
) -> http::Response<Full<Bytes>>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing request");

    if is_health_check(&method, uri.path()) {
        return health_check_response();
    }

    let bucket = match resolve_target(
        req.headers(),
        uri.path(),
        &config.domain,
        config.virtual_hosting,
    ) {
        PathTarget::Bucket(bucket) => bucket,
        PathTarget::Service => {
            let operation = if method == http::Method::GET {
                "ListBuckets".to_owned()
            } else {
                format!("{}Service", verb(&method))
            };
            return error_response(&GatewayError::not_implemented(operation), "", request_id);
        }
        PathTarget::Object { bucket, key } => {
            warn!(%bucket, %key, request_id, "object operations are not served");
            let operation = format!("{}Object", verb(&method));
            return error_response(&GatewayError::not_implemented(operation), &bucket, request_id);
        }
    };

    info!(%method, %bucket, query = uri.query().unwrap_or_default(), request_id, "routed bucket request");

    let (parts, body) = req.into_parts();
    let body = match collect_body(body, config.max_body_bytes).await {
        Ok(body) => body,
        Err(fault) => {
            warn!(%bucket, request_id, error = %fault, "failed to read request body");
            return error_response(&fault.into(), &bucket, request_id);
        }
    };

    if let Err(fault) = validate_content_md5(&parts.headers, &body)
        .and_then(|()| validate_content_sha256(&parts.headers, &body))
    {
        warn!(%bucket, request_id, error = %fault, "body integrity check failed");
        return error_response(&fault.into(), &bucket, request_id);
    }

    let mut incoming = IncomingRequest::new(parts.method, bucket);
    incoming.query = parse_query_params(uri.query().unwrap_or_default());
    incoming.headers = parts.headers;
    incoming.body = body;
    incoming.request_id = request_id.to_owned();
    // A timeout past the clock's range means no deadline.
    incoming.deadline = config
        .backend_timeout
        .and_then(|timeout| tokio::time::Instant::now().checked_add(timeout));

    gateway.handle(incoming).await
}

/// `Get`, `Put`, ... as used in operation names.
fn verb(method: &http::Method) -> String {
    let lower = method.as_str().to_ascii_lowercase();
    let mut chars = lower.chars();
    chars
        .next()
        .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
        .unwrap_or_default()
}

/// Collect the full body, failing once it grows past `limit` bytes.
async fn collect_body<B>(body: B, limit: usize) -> Result<Bytes, ClientFault>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.is::<http_body_util::LengthLimitError>() => {
            Err(ClientFault::BodyTooLarge { limit })
        }
        Err(err) => Err(ClientFault::InvalidRequest(format!(
            "failed to read request body: {err}"
        ))),
    }
}

/// Validate `Content-MD5`, when sent, against the body.
fn validate_content_md5(headers: &http::HeaderMap, body: &[u8]) -> Result<(), ClientFault> {
    let Some(value) = headers.get("content-md5") else {
        return Ok(());
    };
    let expected = value
        .to_str()
        .ok()
        .and_then(|v| BASE64.decode(v.trim()).ok())
        .filter(|digest| digest.len() == 16)
        .ok_or(ClientFault::InvalidDigest)?;

    if Md5::digest(body).as_slice() != expected.as_slice() {
        return Err(ClientFault::BadDigest);
    }
    Ok(())
}

/// Validate the `X-Amz-Content-Sha256` header against the request body.
///
/// Streaming and unsigned placeholders are accepted as-is; any other value
/// must be the hex SHA-256 of the body.
fn validate_content_sha256(headers: &http::HeaderMap, body: &[u8]) -> Result<(), ClientFault> {
    let Some(header_value) = headers.get("x-amz-content-sha256") else {
        return Ok(());
    };

    let hash_str = header_value.to_str().map_err(|_| {
        ClientFault::ContentSha256Mismatch(
            "Invalid X-Amz-Content-Sha256 header encoding".to_owned(),
        )
    })?;

    if matches!(
        hash_str,
        "UNSIGNED-PAYLOAD"
            | "STREAMING-AWS4-HMAC-SHA256-PAYLOAD"
            | "STREAMING-AWS4-HMAC-SHA256-PAYLOAD-TRAILER"
            | "STREAMING-UNSIGNED-PAYLOAD-TRAILER"
    ) {
        return Ok(());
    }

    if hash_str.len() != 64 || !hash_str.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ClientFault::ContentSha256Mismatch(format!(
            "The provided 'x-amz-content-sha256' header is not valid: {hash_str}"
        )));
    }

    let actual = hex::encode(Sha256::digest(body));
    if !actual.eq_ignore_ascii_case(hash_str) {
        return Err(ClientFault::ContentSha256Mismatch(
            "The provided 'x-amz-content-sha256' header does not match what was computed"
                .to_owned(),
        ));
    }
    Ok(())
}

fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/_health" || path == "/health")
}

fn health_check_response() -> http::Response<Full<Bytes>> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(
            br#"{"status":"running","service":"bucketgate"}"#,
        )))
        .expect("static health response should be valid")
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<Full<Bytes>>,
    request_id: &str,
) -> http::Response<Full<Bytes>> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.insert("x-amz-request-id", hv.clone());
        headers.insert("x-amz-id-2", hv);
    }
    headers.insert(
        http::header::SERVER,
        http::HeaderValue::from_static("Bucketgate"),
    );

    response
}
