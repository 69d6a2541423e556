//! `?acl`: GetBucketAcl and PutBucketAcl.

use bucketgate_model::input::AclSource;
use bucketgate_model::types::{AccessControlPolicy, CannedAcl};
use bucketgate_model::{BucketOperation, BucketOutput};

use super::{bucket_input, call_backend, decode_document, put_input};
use crate::fault::{ClientFault, GatewayResult};
use crate::request::{AMZ_ACL, IncomingRequest};
use crate::router::{HandlerContext, MethodTable, handler};

/// ACL served when no backend is configured: the owner holds `FULL_CONTROL`.
pub const DEFAULT_ACL: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<AccessControlPolicy xmlns="http://s3.amazonaws.com/doc/2006-03-01/">"#,
    "<Owner><ID>75aa57f09aa0c8caeab4f8c24e99d10f8e7faeebf76c078efc7c6caea54ba06a</ID>",
    "<DisplayName>bucketgate</DisplayName></Owner>",
    "<AccessControlList><Grant>",
    r#"<Grantee xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="CanonicalUser">"#,
    "<ID>75aa57f09aa0c8caeab4f8c24e99d10f8e7faeebf76c078efc7c6caea54ba06a</ID>",
    "<DisplayName>bucketgate</DisplayName></Grantee>",
    "<Permission>FULL_CONTROL</Permission>",
    "</Grant></AccessControlList></AccessControlPolicy>",
);

pub(crate) fn methods() -> MethodTable {
    MethodTable {
        get: handler!(get_bucket_acl),
        put: handler!(put_bucket_acl),
        ..MethodTable::default()
    }
}

async fn get_bucket_acl(ctx: HandlerContext, req: IncomingRequest) -> GatewayResult<BucketOutput> {
    let Some(backend) = ctx.backend() else {
        return Ok(BucketOutput::Literal(DEFAULT_ACL));
    };
    let policy = call_backend(
        req.deadline,
        BucketOperation::GetBucketAcl,
        backend.get_bucket_acl(bucket_input(&req)),
    )
    .await?;
    Ok(BucketOutput::Acl(policy))
}

async fn put_bucket_acl(ctx: HandlerContext, req: IncomingRequest) -> GatewayResult<BucketOutput> {
    let backend = ctx.require_backend(BucketOperation::PutBucketAcl.as_str())?;
    let source = acl_source(&req)?;
    call_backend(
        req.deadline,
        BucketOperation::PutBucketAcl,
        backend.put_bucket_acl(put_input(&req, source)),
    )
    .await?;
    Ok(BucketOutput::Ok)
}

/// The new ACL comes from exactly one of the canned header and the body.
fn acl_source(req: &IncomingRequest) -> Result<AclSource, ClientFault> {
    match req.header(AMZ_ACL) {
        Some(_) if !req.body.is_empty() => Err(ClientFault::UnexpectedContent(
            "This request does not support content when x-amz-acl is set".to_owned(),
        )),
        Some(canned) => CannedAcl::parse(canned)
            .map(AclSource::Canned)
            .ok_or_else(|| ClientFault::InvalidArgument(format!("unknown canned ACL '{canned}'"))),
        None => {
            let policy: AccessControlPolicy = decode_document(req, "AccessControlPolicy")?;
            Ok(AclSource::Policy(policy))
        }
    }
}

#[cfg(test)]
mod tests {
    use http::Method;

    use super::*;

    fn put() -> IncomingRequest {
        IncomingRequest::new(Method::PUT, "b").with_query("acl")
    }

    #[test]
    fn test_should_accept_canned_header() {
        let source = acl_source(&put().with_header(AMZ_ACL, "public-read")).expect("source");
        assert_eq!(source, AclSource::Canned(CannedAcl::PublicRead));
    }

    #[test]
    fn test_should_reject_unknown_canned_value() {
        let err = acl_source(&put().with_header(AMZ_ACL, "world-writable")).unwrap_err();
        assert!(matches!(err, ClientFault::InvalidArgument(_)));
    }

    #[test]
    fn test_should_reject_header_and_body_together() {
        let req = put()
            .with_header(AMZ_ACL, "private")
            .with_body("<AccessControlPolicy/>");
        assert!(matches!(
            acl_source(&req),
            Err(ClientFault::UnexpectedContent(_))
        ));
    }

    #[test]
    fn test_should_require_body_without_header() {
        assert_eq!(
            acl_source(&put()),
            Err(ClientFault::EmptyBody {
                document: "AccessControlPolicy"
            })
        );
    }

    #[test]
    fn test_should_decode_policy_body() {
        let body = r#"<AccessControlPolicy xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
            <Owner><ID>abc</ID></Owner>
            <AccessControlList>
              <Grant>
                <Grantee xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="CanonicalUser"><ID>abc</ID></Grantee>
                <Permission>READ</Permission>
              </Grant>
            </AccessControlList>
          </AccessControlPolicy>"#;
        let AclSource::Policy(policy) = acl_source(&put().with_body(body)).expect("source") else {
            panic!("expected policy source");
        };
        assert_eq!(policy.grants.len(), 1);
    }

    #[test]
    fn test_should_grant_owner_full_control_in_default_acl() {
        assert!(DEFAULT_ACL.contains("<Permission>FULL_CONTROL</Permission>"));
        assert!(DEFAULT_ACL.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    }
}
