//! `?logging`: GetBucketLogging and PutBucketLogging.

use bucketgate_model::types::BucketLoggingStatus;
use bucketgate_model::{BucketOperation, BucketOutput};

use super::{bucket_input, call_backend, decode_document, put_input};
use crate::fault::{ClientFault, GatewayResult};
use crate::request::IncomingRequest;
use crate::router::{HandlerContext, MethodTable, handler};

/// Logging status served when no backend is configured: logging disabled.
pub const DEFAULT_LOGGING: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<BucketLoggingStatus xmlns="http://s3.amazonaws.com/doc/2006-03-01/"/>"#,
);

pub(crate) fn methods() -> MethodTable {
    MethodTable {
        get: handler!(get_bucket_logging),
        put: handler!(put_bucket_logging),
        ..MethodTable::default()
    }
}

async fn get_bucket_logging(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let Some(backend) = ctx.backend() else {
        return Ok(BucketOutput::Literal(DEFAULT_LOGGING));
    };
    let status = call_backend(
        req.deadline,
        BucketOperation::GetBucketLogging,
        backend.get_bucket_logging(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::Logging(status))
}

async fn put_bucket_logging(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::PutBucketLogging.as_str())?;
    let status: BucketLoggingStatus = decode_document(&req, "BucketLoggingStatus")?;
    if status
        .logging_enabled
        .as_ref()
        .is_some_and(|target| target.target_bucket.is_empty())
    {
        return Err(ClientFault::MalformedXml("TargetBucket must not be empty".to_owned()).into());
    }
    call_backend(
        req.deadline,
        BucketOperation::PutBucketLogging,
        backend.put_bucket_logging(put_input(&req, status)),
    )
    .await?;
    Ok(BucketOutput::Ok)
}
