//! `?requestPayment`: GetBucketRequestPayment; PUT is stubbed.

use bucketgate_model::{BucketOperation, BucketOutput};

use super::{bucket_input, call_backend};
use crate::fault::GatewayResult;
use crate::request::IncomingRequest;
use crate::router::{HandlerContext, MethodTable, handler, stub};

/// Payment configuration served when no backend is configured.
pub const DEFAULT_REQUEST_PAYMENT: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<RequestPaymentConfiguration xmlns="http://s3.amazonaws.com/doc/2006-03-01/">"#,
    "<Payer>BucketOwner</Payer></RequestPaymentConfiguration>",
);

pub(crate) fn methods() -> MethodTable {
    MethodTable {
        get: handler!(get_bucket_request_payment),
        put: stub!(BucketOperation::PutBucketRequestPayment),
        ..MethodTable::default()
    }
}

async fn get_bucket_request_payment(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let Some(backend) = ctx.backend() else {
        return Ok(BucketOutput::Literal(DEFAULT_REQUEST_PAYMENT));
    };
    let config = call_backend(
        req.deadline,
        BucketOperation::GetBucketRequestPayment,
        backend.get_bucket_request_payment(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::RequestPayment(config))
}
