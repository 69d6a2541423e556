//! `?notification`: GetBucketNotification; the PUT side is stubbed.

use bucketgate_model::{BucketOperation, BucketOutput};

use super::{bucket_input, call_backend};
use crate::fault::GatewayResult;
use crate::request::IncomingRequest;
use crate::router::{HandlerContext, MethodTable, handler, stub};

pub(crate) fn methods() -> MethodTable {
    MethodTable {
        get: handler!(get_bucket_notification),
        put: stub!(BucketOperation::PutBucketNotification),
        ..MethodTable::default()
    }
}

async fn get_bucket_notification(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::GetBucketNotification.as_str())?;
    let config = call_backend(
        req.deadline,
        BucketOperation::GetBucketNotification,
        backend.get_bucket_notification(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::Notification(config))
}
