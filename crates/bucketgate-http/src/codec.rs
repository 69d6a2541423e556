//! Response codec: renders a [`BucketOutput`] as exactly one HTTP response.

use bucketgate_model::BucketOutput;
use bucketgate_xml::{S3Serialize, XmlError, to_xml};
use bytes::Bytes;
use http::{StatusCode, header};
use http_body_util::Full;

use crate::translate::XML_CONTENT_TYPE;

/// Content type of bucket policies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Render a successful outcome.
///
/// # Errors
///
/// Returns `XmlError` if a document cannot be serialized.
pub fn encode(output: BucketOutput) -> Result<http::Response<Full<Bytes>>, XmlError> {
    match output {
        BucketOutput::Acl(policy) => xml("AccessControlPolicy", &policy),
        BucketOutput::Cors(config) => xml("CORSConfiguration", &config),
        BucketOutput::Policy(json) => Ok(body(StatusCode::OK, JSON_CONTENT_TYPE, json.into())),
        BucketOutput::Location(location) => xml("LocationConstraint", &location),
        BucketOutput::Logging(status) => xml("BucketLoggingStatus", &status),
        BucketOutput::Versioning(config) => xml("VersioningConfiguration", &config),
        BucketOutput::Tagging(tagging) => xml("Tagging", &tagging),
        BucketOutput::Notification(config) => xml("NotificationConfiguration", &config),
        BucketOutput::Lifecycle(config) => xml("LifecycleConfiguration", &config),
        BucketOutput::Replication(config) => xml("ReplicationConfiguration", &config),
        BucketOutput::Website(config) => xml("WebsiteConfiguration", &config),
        BucketOutput::Accelerate(config) => xml("AccelerateConfiguration", &config),
        BucketOutput::RequestPayment(config) => xml("RequestPaymentConfiguration", &config),
        BucketOutput::ListObjects(listing) => xml("ListBucketResult", &listing),
        BucketOutput::Created { location } => {
            let mut response = empty(StatusCode::OK);
            if let Ok(value) = http::HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, value);
            }
            Ok(response)
        }
        BucketOutput::Ok => Ok(empty(StatusCode::OK)),
        BucketOutput::NoContent => Ok(empty(StatusCode::NO_CONTENT)),
        BucketOutput::Literal(document) => Ok(body(
            StatusCode::OK,
            XML_CONTENT_TYPE,
            Bytes::from_static(document.as_bytes()),
        )),
    }
}

fn xml<T: S3Serialize>(root: &str, value: &T) -> Result<http::Response<Full<Bytes>>, XmlError> {
    let document = to_xml(root, value)?;
    Ok(body(StatusCode::OK, XML_CONTENT_TYPE, document.into()))
}

fn body(status: StatusCode, content_type: &'static str, bytes: Bytes) -> http::Response<Full<Bytes>> {
    let mut response = http::Response::new(Full::new(bytes));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        http::HeaderValue::from_static(content_type),
    );
    response
}

fn empty(status: StatusCode) -> http::Response<Full<Bytes>> {
    let mut response = http::Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}
