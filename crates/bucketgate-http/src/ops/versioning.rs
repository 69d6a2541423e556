//! `?versioning`: GetBucketVersioning and PutBucketVersioning.

use bucketgate_model::types::VersioningConfiguration;
use bucketgate_model::{BucketOperation, BucketOutput};

use super::{bucket_input, call_backend, decode_document, put_input};
use crate::fault::{ClientFault, GatewayResult};
use crate::request::IncomingRequest;
use crate::router::{HandlerContext, MethodTable, handler};

/// Versioning state served when no backend is configured: never enabled.
pub const DEFAULT_VERSIONING: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<VersioningConfiguration xmlns="http://s3.amazonaws.com/doc/2006-03-01/"/>"#,
);

pub(crate) fn methods() -> MethodTable {
    MethodTable {
        get: handler!(get_bucket_versioning),
        put: handler!(put_bucket_versioning),
        ..MethodTable::default()
    }
}

async fn get_bucket_versioning(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let Some(backend) = ctx.backend() else {
        return Ok(BucketOutput::Literal(DEFAULT_VERSIONING));
    };
    let config = call_backend(
        req.deadline,
        BucketOperation::GetBucketVersioning,
        backend.get_bucket_versioning(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::Versioning(config))
}

async fn put_bucket_versioning(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::PutBucketVersioning.as_str())?;
    let config: VersioningConfiguration = decode_document(&req, "VersioningConfiguration")?;
    // The decoder already restricts Status to Enabled/Suspended; it must also be present.
    if config.status.is_none() {
        return Err(ClientFault::MalformedXml("missing Status".to_owned()).into());
    }
    call_backend(
        req.deadline,
        BucketOperation::PutBucketVersioning,
        backend.put_bucket_versioning(put_input(&req, config)),
    )
    .await?;
    Ok(BucketOutput::Ok)
}
