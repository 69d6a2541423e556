//! Typed inputs handed to the backend, one per backend call shape.

use crate::types::{AccessControlPolicy, CannedAcl};

/// Input for calls that only address a bucket (the GET and DELETE calls).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketInput {
    pub bucket: String,
    /// Value of `x-amz-expected-bucket-owner`, if sent.
    pub expected_bucket_owner: Option<String>,
}

impl BucketInput {
    /// Input for the named bucket with no ownership expectation.
    #[must_use]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            expected_bucket_owner: None,
        }
    }
}

/// Input for calls that replace one configuration document of a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutConfigurationInput<T> {
    pub bucket: String,
    pub expected_bucket_owner: Option<String>,
    pub configuration: T,
}

/// Where a new bucket ACL comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AclSource {
    /// A canned ACL from the `x-amz-acl` header.
    Canned(CannedAcl),
    /// An explicit `AccessControlPolicy` document.
    Policy(AccessControlPolicy),
}

/// Input for CreateBucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateBucketInput {
    pub bucket: String,
    /// Region requested in `CreateBucketConfiguration`; `None` means the
    /// backend default.
    pub location_constraint: Option<String>,
    pub acl: Option<CannedAcl>,
}

/// Input for ListObjects (and the HeadBucket existence check, with `max_keys == 0`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListObjectsInput {
    pub bucket: String,
    pub expected_bucket_owner: Option<String>,
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    pub marker: Option<String>,
    pub max_keys: i32,
}

impl ListObjectsInput {
    /// Default and upper bound for `max-keys`.
    pub const MAX_KEYS: i32 = 1000;
}
