//! `?cors`: Get/Put/DeleteBucketCors.

use bucketgate_model::types::CORSConfiguration;
use bucketgate_model::{BucketOperation, BucketOutput};

use super::{bucket_input, call_backend, decode_document, put_input};
use crate::fault::{ClientFault, GatewayResult};
use crate::request::IncomingRequest;
use crate::router::{HandlerContext, MethodTable, handler};

const MAX_RULES: usize = 100;
const ALLOWED_METHODS: [&str; 5] = ["GET", "PUT", "POST", "DELETE", "HEAD"];

pub(crate) fn methods() -> MethodTable {
    MethodTable {
        get: handler!(get_bucket_cors),
        put: handler!(put_bucket_cors),
        delete: handler!(delete_bucket_cors),
        ..MethodTable::default()
    }
}

async fn get_bucket_cors(ctx: HandlerContext, req: IncomingRequest) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::GetBucketCors.as_str())?;
    let config = call_backend(
        req.deadline,
        BucketOperation::GetBucketCors,
        backend.get_bucket_cors(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::Cors(config))
}

async fn put_bucket_cors(ctx: HandlerContext, req: IncomingRequest) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::PutBucketCors.as_str())?;
    let config: CORSConfiguration = decode_document(&req, "CORSConfiguration")?;
    validate(&config)?;
    call_backend(
        req.deadline,
        BucketOperation::PutBucketCors,
        backend.put_bucket_cors(put_input(&req, config)),
    )
    .await?;
    Ok(BucketOutput::Ok)
}

async fn delete_bucket_cors(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::DeleteBucketCors.as_str())?;
    call_backend(
        req.deadline,
        BucketOperation::DeleteBucketCors,
        backend.delete_bucket_cors(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::NoContent)
}

fn validate(config: &CORSConfiguration) -> Result<(), ClientFault> {
    let rules = config.cors_rules.len();
    if rules == 0 || rules > MAX_RULES {
        return Err(ClientFault::MalformedXml(format!(
            "expected 1 to {MAX_RULES} CORSRule elements, got {rules}"
        )));
    }
    for rule in &config.cors_rules {
        if rule.allowed_methods.is_empty() || rule.allowed_origins.is_empty() {
            return Err(ClientFault::MalformedXml(
                "CORSRule needs an AllowedMethod and an AllowedOrigin".to_owned(),
            ));
        }
        if let Some(method) = rule
            .allowed_methods
            .iter()
            .find(|m| !ALLOWED_METHODS.contains(&m.as_str()))
        {
            return Err(ClientFault::MalformedXml(format!(
                "unsupported AllowedMethod '{method}'"
            )));
        }
    }
    Ok(())
}
