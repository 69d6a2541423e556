//! `?website`: Get/Put/DeleteBucketWebsite.

use bucketgate_model::types::WebsiteConfiguration;
use bucketgate_model::{BucketOperation, BucketOutput};

use super::{bucket_input, call_backend, decode_document, put_input};
use crate::fault::{ClientFault, GatewayResult};
use crate::request::IncomingRequest;
use crate::router::{HandlerContext, MethodTable, handler};

pub(crate) fn methods() -> MethodTable {
    MethodTable {
        get: handler!(get_bucket_website),
        put: handler!(put_bucket_website),
        delete: handler!(delete_bucket_website),
        ..MethodTable::default()
    }
}

async fn get_bucket_website(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::GetBucketWebsite.as_str())?;
    let config = call_backend(
        req.deadline,
        BucketOperation::GetBucketWebsite,
        backend.get_bucket_website(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::Website(config))
}

async fn put_bucket_website(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::PutBucketWebsite.as_str())?;
    let config: WebsiteConfiguration = decode_document(&req, "WebsiteConfiguration")?;
    validate(&config)?;
    call_backend(
        req.deadline,
        BucketOperation::PutBucketWebsite,
        backend.put_bucket_website(put_input(&req, config)),
    )
    .await?;
    Ok(BucketOutput::Ok)
}

async fn delete_bucket_website(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::DeleteBucketWebsite.as_str())?;
    call_backend(
        req.deadline,
        BucketOperation::DeleteBucketWebsite,
        backend.delete_bucket_website(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::NoContent)
}

/// A site either serves an index document or redirects every request.
fn validate(config: &WebsiteConfiguration) -> Result<(), ClientFault> {
    match (&config.index_document_suffix, &config.redirect_all_requests_to) {
        (None, None) => Err(ClientFault::MalformedXml(
            "WebsiteConfiguration needs IndexDocument or RedirectAllRequestsTo".to_owned(),
        )),
        (Some(suffix), _) if suffix.is_empty() || suffix.contains('/') => {
            Err(ClientFault::InvalidArgument(
                "The IndexDocument Suffix is not well formed".to_owned(),
            ))
        }
        _ => Ok(()),
    }
}
