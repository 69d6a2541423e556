//! `?policy`: Get/Put/DeleteBucketPolicy. Policies are opaque JSON.

use bucketgate_model::{BucketOperation, BucketOutput};

use super::{bucket_input, call_backend, put_input, require_body};
use crate::fault::{ClientFault, GatewayResult};
use crate::request::IncomingRequest;
use crate::router::{HandlerContext, MethodTable, handler};

pub(crate) fn methods() -> MethodTable {
    MethodTable {
        get: handler!(get_bucket_policy),
        put: handler!(put_bucket_policy),
        delete: handler!(delete_bucket_policy),
        ..MethodTable::default()
    }
}

async fn get_bucket_policy(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::GetBucketPolicy.as_str())?;
    let policy = call_backend(
        req.deadline,
        BucketOperation::GetBucketPolicy,
        backend.get_bucket_policy(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::Policy(policy))
}

async fn put_bucket_policy(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::PutBucketPolicy.as_str())?;
    let policy = parse_policy(require_body(&req, "Policy")?)?;
    call_backend(
        req.deadline,
        BucketOperation::PutBucketPolicy,
        backend.put_bucket_policy(put_input(&req, policy)),
    )
    .await?;
    Ok(BucketOutput::NoContent)
}

async fn delete_bucket_policy(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::DeleteBucketPolicy.as_str())?;
    call_backend(
        req.deadline,
        BucketOperation::DeleteBucketPolicy,
        backend.delete_bucket_policy(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::NoContent)
}

/// The body as text, provided it is a JSON object. The text is stored as sent.
fn parse_policy(body: &[u8]) -> Result<String, ClientFault> {
    let text = std::str::from_utf8(body)
        .map_err(|_| ClientFault::MalformedPolicy("Policies must be valid UTF-8".to_owned()))?;
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Object(_)) => Ok(text.to_owned()),
        Ok(_) => Err(ClientFault::MalformedPolicy(
            "Policies must be JSON objects".to_owned(),
        )),
        Err(e) => Err(ClientFault::MalformedPolicy(format!(
            "Policies must be valid JSON: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::Method;

    use super::*;
    use crate::fault::GatewayError;
    use crate::ops::test_support::{RecordingBackend, context};

    #[test]
    fn test_should_keep_policy_text_verbatim() {
        let body = br#"{ "Version": "2012-10-17", "Statement": [] }"#;
        assert_eq!(
            parse_policy(body).expect("valid"),
            r#"{ "Version": "2012-10-17", "Statement": [] }"#
        );
    }

    #[test]
    fn test_should_reject_non_object_json() {
        assert!(matches!(
            parse_policy(b"[1, 2]"),
            Err(ClientFault::MalformedPolicy(_))
        ));
    }

    #[test]
    fn test_should_reject_invalid_json() {
        match parse_policy(b"{not json") {
            Err(ClientFault::MalformedPolicy(message)) => {
                assert!(message.starts_with("Policies must be valid JSON"));
            }
            other => panic!("expected MalformedPolicy, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_should_reject_empty_body_as_missing_document() {
        let backend = Arc::new(RecordingBackend::default());
        let req = IncomingRequest::new(Method::PUT, "photos").with_query("policy");

        let err = put_bucket_policy(context(&backend), req).await.expect_err("empty body");
        assert!(matches!(
            err,
            GatewayError::Client(ClientFault::EmptyBody { document: "Policy" })
        ));
        assert_eq!(backend.total_calls(), 0);
    }
}
