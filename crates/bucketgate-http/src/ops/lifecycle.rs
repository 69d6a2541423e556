//! `?lifecycle`: Get/Put/DeleteBucketLifecycle.

use bucketgate_model::types::LifecycleConfiguration;
use bucketgate_model::{BucketOperation, BucketOutput};

use super::{bucket_input, call_backend, decode_document, put_input};
use crate::fault::{ClientFault, GatewayResult};
use crate::request::IncomingRequest;
use crate::router::{HandlerContext, MethodTable, handler};

pub(crate) fn methods() -> MethodTable {
    MethodTable {
        get: handler!(get_bucket_lifecycle),
        put: handler!(put_bucket_lifecycle),
        delete: handler!(delete_bucket_lifecycle),
        ..MethodTable::default()
    }
}

async fn get_bucket_lifecycle(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::GetBucketLifecycle.as_str())?;
    let config = call_backend(
        req.deadline,
        BucketOperation::GetBucketLifecycle,
        backend.get_bucket_lifecycle(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::Lifecycle(config))
}

async fn put_bucket_lifecycle(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::PutBucketLifecycle.as_str())?;
    let config: LifecycleConfiguration = decode_document(&req, "LifecycleConfiguration")?;
    if config.rules.is_empty() {
        return Err(ClientFault::MalformedXml("at least one Rule is required".to_owned()).into());
    }
    call_backend(
        req.deadline,
        BucketOperation::PutBucketLifecycle,
        backend.put_bucket_lifecycle(put_input(&req, config)),
    )
    .await?;
    Ok(BucketOutput::Ok)
}

async fn delete_bucket_lifecycle(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::DeleteBucketLifecycle.as_str())?;
    call_backend(
        req.deadline,
        BucketOperation::DeleteBucketLifecycle,
        backend.delete_bucket_lifecycle(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::NoContent)
}
