//! `?replication`: Get and DeleteBucketReplication; PUT is stubbed.

use bucketgate_model::{BucketOperation, BucketOutput};

use super::{bucket_input, call_backend};
use crate::fault::GatewayResult;
use crate::request::IncomingRequest;
use crate::router::{HandlerContext, MethodTable, handler, stub};

pub(crate) fn methods() -> MethodTable {
    MethodTable {
        get: handler!(get_bucket_replication),
        put: stub!(BucketOperation::PutBucketReplication),
        delete: handler!(delete_bucket_replication),
        ..MethodTable::default()
    }
}

async fn get_bucket_replication(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::GetBucketReplication.as_str())?;
    let config = call_backend(
        req.deadline,
        BucketOperation::GetBucketReplication,
        backend.get_bucket_replication(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::Replication(config))
}

async fn delete_bucket_replication(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::DeleteBucketReplication.as_str())?;
    call_backend(
        req.deadline,
        BucketOperation::DeleteBucketReplication,
        backend.delete_bucket_replication(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::NoContent)
}
