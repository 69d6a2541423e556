//! `?location`: GetBucketLocation.

use bucketgate_model::{BucketOperation, BucketOutput};

use super::{bucket_input, call_backend};
use crate::fault::GatewayResult;
use crate::request::IncomingRequest;
use crate::router::{HandlerContext, MethodTable, handler};

/// Location served when no backend is configured: the classic region.
pub const DEFAULT_LOCATION: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<LocationConstraint xmlns="http://s3.amazonaws.com/doc/2006-03-01/"/>"#,
);

pub(crate) fn methods() -> MethodTable {
    MethodTable {
        get: handler!(get_bucket_location),
        ..MethodTable::default()
    }
}

async fn get_bucket_location(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let Some(backend) = ctx.backend() else {
        return Ok(BucketOutput::Literal(DEFAULT_LOCATION));
    };
    let location = call_backend(
        req.deadline,
        BucketOperation::GetBucketLocation,
        backend.get_bucket_location(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::Location(location))
}
