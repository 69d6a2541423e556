//! `?accelerate`: GetBucketAccelerateConfiguration. GET only.

use bucketgate_model::{BucketOperation, BucketOutput};

use super::{bucket_input, call_backend};
use crate::fault::GatewayResult;
use crate::request::IncomingRequest;
use crate::router::{HandlerContext, MethodTable, handler};

/// Accelerate state served when no backend is configured.
pub const DEFAULT_ACCELERATE: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<AccelerateConfiguration xmlns="http://s3.amazonaws.com/doc/2006-03-01/"/>"#,
);

pub(crate) fn methods() -> MethodTable {
    MethodTable {
        get: handler!(get_bucket_accelerate),
        ..MethodTable::default()
    }
}

async fn get_bucket_accelerate(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let Some(backend) = ctx.backend() else {
        return Ok(BucketOutput::Literal(DEFAULT_ACCELERATE));
    };
    let config = call_backend(
        req.deadline,
        BucketOperation::GetBucketAccelerate,
        backend.get_bucket_accelerate(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::Accelerate(config))
}
