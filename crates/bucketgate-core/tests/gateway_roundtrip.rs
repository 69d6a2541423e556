//! End-to-end tests driving the HTTP pipeline against the in-memory backend.

use bucketgate_core::build_gateway;
use bucketgate_core::config::{BackendKind, GatewayConfig};
use bucketgate_http::Gateway;
use bucketgate_http::service::{GatewayHttpConfig, process_request};
use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};

struct Harness {
    gateway: Gateway,
    http: GatewayHttpConfig,
}

impl Harness {
    fn new(config: &GatewayConfig) -> Self {
        Self {
            gateway: build_gateway(config),
            http: config.http_config(),
        }
    }

    fn memory() -> Self {
        Self::new(&GatewayConfig::default())
    }

    async fn send(&self, method: Method, uri: &str, body: &str) -> Response<Full<Bytes>> {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("host", "localhost:4566")
            .body(Full::new(Bytes::from(body.to_owned())))
            .expect("valid request");
        process_request(req, &self.gateway, &self.http, "test-request").await
    }
}

async fn text(response: Response<Full<Bytes>>) -> String {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

#[tokio::test]
async fn test_should_create_list_and_delete_bucket() {
    let h = Harness::memory();

    let created = h.send(Method::PUT, "/photos", "").await;
    assert_eq!(created.status(), StatusCode::OK);
    assert_eq!(
        created.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/photos")
    );

    let head = h.send(Method::HEAD, "/photos", "").await;
    assert_eq!(head.status(), StatusCode::OK);

    let listed = text(h.send(Method::GET, "/photos", "").await).await;
    assert!(listed.contains("<Name>photos</Name>"));
    assert!(listed.contains("<MaxKeys>1000</MaxKeys>"));

    let deleted = h.send(Method::DELETE, "/photos", "").await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = h.send(Method::HEAD, "/photos", "").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(text(missing).await.is_empty());
}

#[tokio::test]
async fn test_should_reject_duplicate_and_invalid_buckets() {
    let h = Harness::memory();
    h.send(Method::PUT, "/photos", "").await;

    let again = h.send(Method::PUT, "/photos", "").await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    assert!(text(again).await.contains("<Code>BucketAlreadyOwnedByYou</Code>"));

    let invalid = h.send(Method::PUT, "/Bad_Name", "").await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_should_round_trip_tagging() {
    let h = Harness::memory();
    h.send(Method::PUT, "/photos", "").await;

    let missing = h.send(Method::GET, "/photos?tagging", "").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(text(missing).await.contains("<Code>NoSuchTagSet</Code>"));

    let body = "<Tagging><TagSet><Tag><Key>env</Key><Value>prod</Value></Tag></TagSet></Tagging>";
    let put = h.send(Method::PUT, "/photos?tagging", body).await;
    assert_eq!(put.status(), StatusCode::NO_CONTENT);

    let got = text(h.send(Method::GET, "/photos?tagging", "").await).await;
    assert!(got.contains("<Key>env</Key>"));
    assert!(got.contains("<Value>prod</Value>"));

    let deleted = h.send(Method::DELETE, "/photos?tagging", "").await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    let gone = h.send(Method::GET, "/photos?tagging", "").await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_should_round_trip_policy_as_json() {
    let h = Harness::memory();
    h.send(Method::PUT, "/photos", "").await;

    let policy = r#"{"Version":"2012-10-17","Statement":[]}"#;
    let put = h.send(Method::PUT, "/photos?policy", policy).await;
    assert_eq!(put.status(), StatusCode::NO_CONTENT);

    let got = h.send(Method::GET, "/photos?policy", "").await;
    assert_eq!(got.status(), StatusCode::OK);
    assert_eq!(
        got.headers().get("content-type").and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    assert_eq!(text(got).await, policy);
}

#[tokio::test]
async fn test_should_prefer_earlier_sub_resource() {
    let h = Harness::memory();
    h.send(Method::PUT, "/photos", "").await;

    let response = h.send(Method::GET, "/photos?versioning&acl", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("<AccessControlPolicy"));
}

#[tokio::test]
async fn test_should_report_missing_bucket_for_sub_resource() {
    let h = Harness::memory();
    let response = h.send(Method::GET, "/nope?cors", "").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = text(response).await;
    assert!(body.starts_with("<?xml"));
    assert!(body.contains("<Code>NoSuchBucket</Code>"));
}

#[tokio::test]
async fn test_should_enable_versioning() {
    let h = Harness::memory();
    h.send(Method::PUT, "/photos", "").await;

    let body = "<VersioningConfiguration><Status>Enabled</Status></VersioningConfiguration>";
    let put = h.send(Method::PUT, "/photos?versioning", body).await;
    assert_eq!(put.status(), StatusCode::OK);

    let got = text(h.send(Method::GET, "/photos?versioning", "").await).await;
    assert!(got.contains("<Status>Enabled</Status>"));
}

#[tokio::test]
async fn test_should_report_location_of_regional_bucket() {
    let h = Harness::memory();
    let body = "<CreateBucketConfiguration><LocationConstraint>eu-west-1</LocationConstraint></CreateBucketConfiguration>";
    h.send(Method::PUT, "/europe", body).await;

    let got = text(h.send(Method::GET, "/europe?location", "").await).await;
    assert!(got.contains(">eu-west-1</LocationConstraint>"));
}

#[tokio::test]
async fn test_should_serve_defaults_without_backend() {
    let config = GatewayConfig::builder().backend(BackendKind::None).build();
    let h = Harness::new(&config);

    let versioning = h.send(Method::GET, "/photos?versioning", "").await;
    assert_eq!(versioning.status(), StatusCode::OK);
    assert_eq!(text(versioning).await, bucketgate_http::DEFAULT_VERSIONING);

    let list = h.send(Method::GET, "/photos", "").await;
    assert_eq!(list.status(), StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn test_should_answer_health_check() {
    let h = Harness::memory();
    let response = h.send(Method::GET, "/_health", "").await;
    assert_eq!(response.status(), StatusCode::OK);
}
