//! Success payloads returned by the backend and rendered by the response codec.

use crate::types::{
    AccelerateConfiguration, AccessControlPolicy, BucketLoggingStatus, CORSConfiguration,
    CommonPrefix, LifecycleConfiguration, NotificationConfiguration, Object,
    ReplicationConfiguration, RequestPaymentConfiguration, Tagging, VersioningConfiguration,
    WebsiteConfiguration,
};

/// S3 ListBucketResult.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListObjectsOutput {
    pub name: String,
    pub prefix: Option<String>,
    pub marker: Option<String>,
    pub delimiter: Option<String>,
    pub max_keys: i32,
    pub is_truncated: bool,
    pub next_marker: Option<String>,
    pub contents: Vec<Object>,
    pub common_prefixes: Vec<CommonPrefix>,
}

/// Result of GetBucketLocation. `None` is the classic `us-east-1` region,
/// rendered as an empty `LocationConstraint`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationOutput {
    pub location_constraint: Option<String>,
}

/// Every successful outcome of a bucket operation.
///
/// Each variant has exactly one rendering in the response codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketOutput {
    /// `200` with an `AccessControlPolicy` document.
    Acl(AccessControlPolicy),
    /// `200` with a `CORSConfiguration` document.
    Cors(CORSConfiguration),
    /// `200` with the raw policy JSON.
    Policy(String),
    /// `200` with a `LocationConstraint` document.
    Location(LocationOutput),
    /// `200` with a `BucketLoggingStatus` document.
    Logging(BucketLoggingStatus),
    /// `200` with a `VersioningConfiguration` document.
    Versioning(VersioningConfiguration),
    /// `200` with a `Tagging` document.
    Tagging(Tagging),
    /// `200` with a `NotificationConfiguration` document.
    Notification(NotificationConfiguration),
    /// `200` with a `LifecycleConfiguration` document.
    Lifecycle(LifecycleConfiguration),
    /// `200` with a `ReplicationConfiguration` document.
    Replication(ReplicationConfiguration),
    /// `200` with a `WebsiteConfiguration` document.
    Website(WebsiteConfiguration),
    /// `200` with an `AccelerateConfiguration` document.
    Accelerate(AccelerateConfiguration),
    /// `200` with a `RequestPaymentConfiguration` document.
    RequestPayment(RequestPaymentConfiguration),
    /// `200` with a `ListBucketResult` document.
    ListObjects(ListObjectsOutput),
    /// `200` with a `Location` header naming the new bucket.
    Created {
        /// Value of the `Location` header.
        location: String,
    },
    /// `200` with an empty body.
    Ok,
    /// `204` with an empty body.
    NoContent,
    /// `200` with a fixed XML document.
    Literal(&'static str),
}
