//! Base bucket operations, selected when no sub-resource key is present.
//!
//! `GET` lists objects, `HEAD` checks existence with a zero-key listing,
//! `PUT` creates the bucket and `DELETE` removes it.

use std::net::Ipv4Addr;

use bucketgate_model::input::{CreateBucketInput, ListObjectsInput};
use bucketgate_model::types::{CannedAcl, CreateBucketConfiguration};
use bucketgate_model::{BucketOperation, BucketOutput};

use super::{bucket_input, call_backend, decode_document};
use crate::fault::{ClientFault, GatewayResult};
use crate::request::{AMZ_ACL, IncomingRequest};
use crate::router::{HandlerContext, MethodTable, handler};

const MIN_BUCKET_NAME_LEN: usize = 3;
const MAX_BUCKET_NAME_LEN: usize = 63;

pub(crate) fn methods() -> MethodTable {
    MethodTable {
        get: handler!(list_objects),
        put: handler!(create_bucket),
        delete: handler!(delete_bucket),
        head: handler!(head_bucket),
    }
}

async fn list_objects(ctx: HandlerContext, req: IncomingRequest) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::ListObjects.as_str())?;
    let input = list_input(&req)?;
    let listing = call_backend(
        req.deadline,
        BucketOperation::ListObjects,
        backend.list_objects(input),
    )
    .await?;
    Ok(BucketOutput::ListObjects(listing))
}

async fn head_bucket(ctx: HandlerContext, req: IncomingRequest) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::HeadBucket.as_str())?;
    let input = ListObjectsInput {
        max_keys: 0,
        ..list_input(&req)?
    };
    call_backend(
        req.deadline,
        BucketOperation::HeadBucket,
        backend.list_objects(input),
    )
    .await?;
    Ok(BucketOutput::Ok)
}

async fn create_bucket(ctx: HandlerContext, req: IncomingRequest) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::CreateBucket.as_str())?;
    validate_bucket_name(&req.bucket)?;

    let acl = req
        .header(AMZ_ACL)
        .map(|canned| {
            CannedAcl::parse(canned).ok_or_else(|| {
                ClientFault::InvalidArgument(format!("unknown canned ACL '{canned}'"))
            })
        })
        .transpose()?;
    // The configuration document is optional; without it the backend picks the region.
    let location_constraint = if req.body.is_empty() {
        None
    } else {
        let config: CreateBucketConfiguration =
            decode_document(&req, "CreateBucketConfiguration")?;
        config.location_constraint.filter(|region| !region.is_empty())
    };

    let input = CreateBucketInput {
        bucket: req.bucket.clone(),
        location_constraint,
        acl,
    };
    call_backend(
        req.deadline,
        BucketOperation::CreateBucket,
        backend.create_bucket(input),
    )
    .await?;
    Ok(BucketOutput::Created {
        location: format!("/{}", req.bucket),
    })
}

async fn delete_bucket(ctx: HandlerContext, req: IncomingRequest) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::DeleteBucket.as_str())?;
    call_backend(
        req.deadline,
        BucketOperation::DeleteBucket,
        backend.delete_bucket(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::NoContent)
}

fn list_input(req: &IncomingRequest) -> Result<ListObjectsInput, ClientFault> {
    let max_keys = match req.query_value("max-keys") {
        None => ListObjectsInput::MAX_KEYS,
        Some(raw) => raw
            .parse::<i32>()
            .ok()
            .filter(|n| *n >= 0)
            .map(|n| n.min(ListObjectsInput::MAX_KEYS))
            .ok_or_else(|| {
                ClientFault::InvalidArgument(format!(
                    "Provided max-keys not an integer or within integer range: '{raw}'"
                ))
            })?,
    };
    let text = |key: &str| req.query_value(key).map(str::to_owned);
    Ok(ListObjectsInput {
        bucket: req.bucket.clone(),
        expected_bucket_owner: req.expected_bucket_owner(),
        prefix: text("prefix"),
        delimiter: text("delimiter"),
        marker: text("marker"),
        max_keys,
    })
}

/// Bucket naming rules for new buckets.
fn validate_bucket_name(name: &str) -> Result<(), ClientFault> {
    let invalid = |reason: &str| Err(ClientFault::InvalidBucketName(format!("{name}: {reason}")));

    if !(MIN_BUCKET_NAME_LEN..=MAX_BUCKET_NAME_LEN).contains(&name.len()) {
        return invalid("must be between 3 and 63 characters long");
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return invalid("must only contain lowercase letters, numbers, hyphens, and dots");
    }
    let alnum = |b: Option<&u8>| b.is_some_and(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
    if !alnum(name.as_bytes().first()) || !alnum(name.as_bytes().last()) {
        return invalid("must start and end with a letter or number");
    }
    if name.contains("..") {
        return invalid("must not contain consecutive dots");
    }
    if name.parse::<Ipv4Addr>().is_ok() {
        return invalid("must not be formatted as an IP address");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use http::Method;

    use super::*;

    fn get(query: &str) -> IncomingRequest {
        IncomingRequest::new(Method::GET, "b").with_query(query)
    }

    #[test]
    fn test_should_default_and_cap_max_keys() {
        assert_eq!(list_input(&get("")).expect("input").max_keys, 1000);
        assert_eq!(list_input(&get("max-keys=5")).expect("input").max_keys, 5);
        assert_eq!(list_input(&get("max-keys=0")).expect("input").max_keys, 0);
        assert_eq!(list_input(&get("max-keys=5000")).expect("input").max_keys, 1000);
    }

    #[test]
    fn test_should_reject_bad_max_keys() {
        for raw in ["max-keys=-1", "max-keys=ten", "max-keys=", "max-keys=99999999999"] {
            assert!(
                matches!(list_input(&get(raw)), Err(ClientFault::InvalidArgument(_))),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_should_pass_listing_params() {
        let input = list_input(&get("prefix=logs%2F&delimiter=%2F&marker=logs%2Fa")).expect("input");
        assert_eq!(input.prefix.as_deref(), Some("logs/"));
        assert_eq!(input.delimiter.as_deref(), Some("/"));
        assert_eq!(input.marker.as_deref(), Some("logs/a"));
    }

    #[test]
    fn test_should_validate_bucket_names() {
        for ok in ["my-bucket", "abc", "logs.example.com", "123"] {
            assert!(validate_bucket_name(ok).is_ok(), "{ok}");
        }
        for bad in ["ab", "My-Bucket", "-bucket", "bucket-", "a..b", "192.168.0.1", "under_score"] {
            assert!(validate_bucket_name(bad).is_err(), "{bad}");
        }
    }
}
