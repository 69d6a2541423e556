//! The per-call request value and URI parsing helpers.

use bytes::Bytes;
use percent_encoding::percent_decode_str;
use tokio::time::Instant;

/// Header carrying a canned ACL.
pub const AMZ_ACL: &str = "x-amz-acl";
/// Header naming the account expected to own the bucket.
pub const AMZ_EXPECTED_BUCKET_OWNER: &str = "x-amz-expected-bucket-owner";

/// One bucket-level request, fully read and immutable.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    /// HTTP method.
    pub method: http::Method,
    /// Bucket the request addresses.
    pub bucket: String,
    /// Decoded query parameters in request order; key-only params have an empty value.
    pub query: Vec<(String, String)>,
    /// Request headers.
    pub headers: http::HeaderMap,
    /// The whole request body.
    pub body: Bytes,
    /// Identifier echoed in headers and error envelopes.
    pub request_id: String,
    /// Point after which the backend call is abandoned.
    pub deadline: Option<Instant>,
}

impl IncomingRequest {
    /// A request with no query, headers, body or deadline.
    #[must_use]
    pub fn new(method: http::Method, bucket: impl Into<String>) -> Self {
        Self {
            method,
            bucket: bucket.into(),
            query: Vec::new(),
            headers: http::HeaderMap::new(),
            body: Bytes::new(),
            request_id: String::new(),
            deadline: None,
        }
    }

    /// Replace the query with the parsed form of `query`.
    #[must_use]
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = parse_query_params(query);
        self
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a header. Invalid names or values are ignored.
    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(v) = http::HeaderValue::from_str(value) {
            self.headers.insert(name, v);
        }
        self
    }

    /// Set the request id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Set the backend deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The value of the first query parameter named `key`.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        query_value(&self.query, key)
    }

    /// A header as UTF-8 text, if present and valid.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `x-amz-expected-bucket-owner` header.
    #[must_use]
    pub fn expected_bucket_owner(&self) -> Option<String> {
        self.header(AMZ_EXPECTED_BUCKET_OWNER).map(str::to_owned)
    }
}

/// Where a request path points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathTarget {
    /// `/`: the service root.
    Service,
    /// `/{bucket}`.
    Bucket(String),
    /// `/{bucket}/{key}`.
    Object {
        /// Bucket segment.
        bucket: String,
        /// Remaining path.
        key: String,
    },
}

/// Resolve the target of a request, taking the bucket from `Host` when
/// virtual hosting is enabled and the host is a subdomain of `domain`.
#[must_use]
pub fn resolve_target(
    headers: &http::HeaderMap,
    path: &str,
    domain: &str,
    virtual_hosting: bool,
) -> PathTarget {
    if virtual_hosting {
        if let Some(bucket) = extract_virtual_host_bucket(headers, domain) {
            let key = path.strip_prefix('/').unwrap_or(path);
            return if key.is_empty() {
                PathTarget::Bucket(bucket)
            } else {
                PathTarget::Object {
                    bucket,
                    key: decode_uri_component(key),
                }
            };
        }
    }
    parse_path(path)
}

/// Extract the bucket from a virtual-hosted-style `Host` header, e.g.
/// `mybucket.s3.localhost:4566` with domain `s3.localhost`.
fn extract_virtual_host_bucket(headers: &http::HeaderMap, domain: &str) -> Option<String> {
    let host = headers
        .get(http::header::HOST)
        .and_then(|v| v.to_str().ok())?;
    let host_without_port = host.split(':').next().unwrap_or(host);

    let bucket = host_without_port.strip_suffix(domain)?.strip_suffix('.')?;
    (!bucket.is_empty()).then(|| bucket.to_owned())
}

/// Parse a path-style URI path.
fn parse_path(path: &str) -> PathTarget {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return PathTarget::Service;
    }

    match trimmed.split_once('/') {
        Some((bucket, key)) if !key.is_empty() => PathTarget::Object {
            bucket: decode_uri_component(bucket),
            key: decode_uri_component(key),
        },
        Some((bucket, _)) => PathTarget::Bucket(decode_uri_component(bucket)),
        None => PathTarget::Bucket(decode_uri_component(trimmed)),
    }
}

/// Decode a percent-encoded URI component.
fn decode_uri_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Parse a query string into key-value pairs, preserving order.
#[must_use]
pub fn parse_query_params(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode_uri_component(key), decode_uri_component(value)),
            None => (decode_uri_component(pair), String::new()),
        })
        .collect()
}

/// Whether a query parameter named `key` is present.
#[must_use]
pub fn query_has_key(params: &[(String, String)], key: &str) -> bool {
    params.iter().any(|(k, _)| k == key)
}

/// The value of the first query parameter named `key`.
#[must_use]
pub fn query_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(value: &str) -> http::HeaderMap {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::HOST,
            http::HeaderValue::from_str(value).expect("valid host"),
        );
        headers
    }

    #[test]
    fn test_should_parse_key_only_and_valued_params() {
        let params = parse_query_params("acl&prefix=a%2Fb&max-keys=5");
        assert_eq!(
            params,
            vec![
                ("acl".to_owned(), String::new()),
                ("prefix".to_owned(), "a/b".to_owned()),
                ("max-keys".to_owned(), "5".to_owned()),
            ]
        );
        assert!(query_has_key(&params, "acl"));
        assert_eq!(query_value(&params, "max-keys"), Some("5"));
        assert_eq!(query_value(&params, "marker"), None);
    }

    #[test]
    fn test_should_parse_path_targets() {
        assert_eq!(parse_path("/"), PathTarget::Service);
        assert_eq!(parse_path("/mybucket"), PathTarget::Bucket("mybucket".to_owned()));
        assert_eq!(parse_path("/mybucket/"), PathTarget::Bucket("mybucket".to_owned()));
        assert_eq!(
            parse_path("/mybucket/a%20b/c"),
            PathTarget::Object {
                bucket: "mybucket".to_owned(),
                key: "a b/c".to_owned(),
            }
        );
    }

    #[test]
    fn test_should_extract_bucket_from_virtual_host() {
        let target = resolve_target(&host("photos.s3.localhost:4566"), "/", "s3.localhost", true);
        assert_eq!(target, PathTarget::Bucket("photos".to_owned()));
    }

    #[test]
    fn test_should_ignore_virtual_host_when_disabled() {
        let target = resolve_target(
            &host("photos.s3.localhost:4566"),
            "/other",
            "s3.localhost",
            false,
        );
        assert_eq!(target, PathTarget::Bucket("other".to_owned()));
    }

    #[test]
    fn test_should_fall_back_to_path_for_bare_domain() {
        let target = resolve_target(&host("s3.localhost:4566"), "/b", "s3.localhost", true);
        assert_eq!(target, PathTarget::Bucket("b".to_owned()));
    }
}
