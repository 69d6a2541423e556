//! Operation handlers, one module per sub-resource.
//!
//! Every handler is a straight line: read and validate the body, build the
//! typed input, make one deadline-bounded backend call and return the output.
//! Faults in the body short-circuit before the backend is touched.

use std::future::Future;

use bucketgate_model::BucketOperation;
use bucketgate_model::SubResource;
use bucketgate_model::input::{BucketInput, PutConfigurationInput};
use bucketgate_xml::{S3Deserialize, from_xml};
use tokio::time::Instant;
use tracing::debug;

use crate::backend::{BackendError, BackendResult};
use crate::fault::{ClientFault, GatewayResult};
use crate::request::IncomingRequest;
use crate::router::MethodTable;

pub(crate) mod accelerate;
pub(crate) mod acl;
pub(crate) mod bucket;
pub(crate) mod cors;
pub(crate) mod lifecycle;
pub(crate) mod location;
pub(crate) mod logging;
pub(crate) mod notification;
pub(crate) mod policy;
pub(crate) mod replication;
pub(crate) mod request_payment;
pub(crate) mod tagging;
pub(crate) mod versioning;
pub(crate) mod website;

/// Method table of a sub-resource.
#[must_use]
pub(crate) fn methods_for(sub_resource: SubResource) -> MethodTable {
    match sub_resource {
        SubResource::Acl => acl::methods(),
        SubResource::Cors => cors::methods(),
        SubResource::Policy => policy::methods(),
        SubResource::Location => location::methods(),
        SubResource::Logging => logging::methods(),
        SubResource::Versioning => versioning::methods(),
        SubResource::Tagging => tagging::methods(),
        SubResource::Notification => notification::methods(),
        SubResource::Lifecycle => lifecycle::methods(),
        SubResource::Replication => replication::methods(),
        SubResource::Website => website::methods(),
        SubResource::Accelerate => accelerate::methods(),
        SubResource::RequestPayment => request_payment::methods(),
    }
}

/// The body, or `EmptyBody` naming the expected document.
pub(crate) fn require_body<'a>(
    req: &'a IncomingRequest,
    document: &'static str,
) -> Result<&'a [u8], ClientFault> {
    if req.body.is_empty() {
        Err(ClientFault::EmptyBody { document })
    } else {
        Ok(&req.body)
    }
}

/// Decode a required XML body whose root element is `document`.
pub(crate) fn decode_document<T: S3Deserialize>(
    req: &IncomingRequest,
    document: &'static str,
) -> Result<T, ClientFault> {
    let body = require_body(req, document)?;
    from_xml(body, document).map_err(|e| {
        debug!(document, error = %e, request_id = %req.request_id, "rejecting malformed document");
        ClientFault::MalformedXml(e.to_string())
    })
}

pub(crate) fn bucket_input(req: &IncomingRequest) -> BucketInput {
    BucketInput {
        bucket: req.bucket.clone(),
        expected_bucket_owner: req.expected_bucket_owner(),
    }
}

pub(crate) fn put_input<T>(req: &IncomingRequest, configuration: T) -> PutConfigurationInput<T> {
    PutConfigurationInput {
        bucket: req.bucket.clone(),
        expected_bucket_owner: req.expected_bucket_owner(),
        configuration,
    }
}

/// Await one backend call, abandoning it once `deadline` passes.
pub(crate) async fn call_backend<T, F>(
    deadline: Option<Instant>,
    operation: BucketOperation,
    call: F,
) -> GatewayResult<T>
where
    F: Future<Output = BackendResult<T>>,
{
    debug!(%operation, "calling backend");
    let result = match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, call)
            .await
            .map_err(|_| BackendError::Cancelled(operation.as_str().to_owned()))?,
        None => call.await,
    };
    Ok(result?)
}
