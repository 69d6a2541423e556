//! `?tagging`: Get/Put/DeleteBucketTagging.

use std::collections::HashSet;

use bucketgate_model::types::Tagging;
use bucketgate_model::{BucketOperation, BucketOutput};

use super::{bucket_input, call_backend, decode_document, put_input};
use crate::fault::{ClientFault, GatewayResult};
use crate::request::IncomingRequest;
use crate::router::{HandlerContext, MethodTable, handler};

const MAX_TAGS: usize = 50;
const MAX_KEY_CHARS: usize = 128;
const MAX_VALUE_CHARS: usize = 256;

pub(crate) fn methods() -> MethodTable {
    MethodTable {
        get: handler!(get_bucket_tagging),
        put: handler!(put_bucket_tagging),
        delete: handler!(delete_bucket_tagging),
        ..MethodTable::default()
    }
}

async fn get_bucket_tagging(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::GetBucketTagging.as_str())?;
    let tagging = call_backend(
        req.deadline,
        BucketOperation::GetBucketTagging,
        backend.get_bucket_tagging(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::Tagging(tagging))
}

async fn put_bucket_tagging(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::PutBucketTagging.as_str())?;
    let tagging: Tagging = decode_document(&req, "Tagging")?;
    validate(&tagging)?;
    call_backend(
        req.deadline,
        BucketOperation::PutBucketTagging,
        backend.put_bucket_tagging(put_input(&req, tagging)),
    )
    .await?;
    Ok(BucketOutput::NoContent)
}

async fn delete_bucket_tagging(
    ctx: HandlerContext,
    req: IncomingRequest,
) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::DeleteBucketTagging.as_str())?;
    call_backend(
        req.deadline,
        BucketOperation::DeleteBucketTagging,
        backend.delete_bucket_tagging(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::NoContent)
}

fn validate(tagging: &Tagging) -> Result<(), ClientFault> {
    if tagging.tag_set.len() > MAX_TAGS {
        return Err(ClientFault::InvalidTag(format!(
            "Bucket tag count cannot be greater than {MAX_TAGS}"
        )));
    }
    let mut seen = HashSet::with_capacity(tagging.tag_set.len());
    for tag in &tagging.tag_set {
        let key_chars = tag.key.chars().count();
        if key_chars == 0 || key_chars > MAX_KEY_CHARS {
            return Err(ClientFault::InvalidTag(format!(
                "The TagKey you have provided is invalid: '{}'",
                tag.key
            )));
        }
        if tag.value.chars().count() > MAX_VALUE_CHARS {
            return Err(ClientFault::InvalidTag(format!(
                "The TagValue you have provided is too long for key '{}'",
                tag.key
            )));
        }
        if !seen.insert(tag.key.as_str()) {
            return Err(ClientFault::InvalidTag(format!(
                "Cannot provide multiple Tags with the same key '{}'",
                tag.key
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use bucketgate_model::types::Tag;

    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tagging {
        Tagging {
            tag_set: pairs
                .iter()
                .map(|(k, v)| Tag {
                    key: (*k).to_owned(),
                    value: (*v).to_owned(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_should_accept_empty_and_valid_tag_sets() {
        assert!(validate(&tags(&[])).is_ok());
        assert!(validate(&tags(&[("env", "prod"), ("team", "")])).is_ok());
    }

    #[test]
    fn test_should_reject_duplicate_keys() {
        let err = validate(&tags(&[("env", "a"), ("env", "b")])).unwrap_err();
        assert!(matches!(err, ClientFault::InvalidTag(_)));
    }

    #[test]
    fn test_should_enforce_length_limits() {
        let long_key = "k".repeat(MAX_KEY_CHARS + 1);
        let long_value = "v".repeat(MAX_VALUE_CHARS + 1);
        assert!(validate(&tags(&[("", "v")])).is_err());
        assert!(validate(&tags(&[(long_key.as_str(), "v")])).is_err());
        assert!(validate(&tags(&[("k", long_value.as_str())])).is_err());
    }

    #[test]
    fn test_should_limit_tag_count() {
        let keys: Vec<String> = (0..=MAX_TAGS).map(|i| format!("k{i}")).collect();
        let pairs: Vec<(&str, &str)> = keys.iter().map(|k| (k.as_str(), "v")).collect();
        assert!(validate(&tags(&pairs)).is_err());
        assert!(validate(&tags(&pairs[..MAX_TAGS])).is_ok());
    }
}
