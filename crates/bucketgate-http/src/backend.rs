//! The backend port: the injected store that owns bucket state.
//!
//! Every handler performs exactly one call on this trait. Implementations
//! report failures with [`BackendError`]; the gateway never retries.

use std::fmt;

use async_trait::async_trait;
use bucketgate_model::input::{
    AclSource, BucketInput, CreateBucketInput, ListObjectsInput, PutConfigurationInput,
};
use bucketgate_model::output::{ListObjectsOutput, LocationOutput};
use bucketgate_model::types::{
    AccelerateConfiguration, AccessControlPolicy, BucketLoggingStatus, CORSConfiguration,
    LifecycleConfiguration, NotificationConfiguration, ReplicationConfiguration,
    RequestPaymentConfiguration, Tagging, VersioningConfiguration, WebsiteConfiguration,
};

/// Configuration documents a bucket may lack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKind {
    /// CORS configuration.
    Cors,
    /// Bucket policy.
    Policy,
    /// Tag set.
    Tagging,
    /// Lifecycle configuration.
    Lifecycle,
    /// Website configuration.
    Website,
    /// Replication configuration.
    Replication,
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cors => "cors",
            Self::Policy => "policy",
            Self::Tagging => "tagging",
            Self::Lifecycle => "lifecycle",
            Self::Website => "website",
            Self::Replication => "replication",
        })
    }
}

/// Failures reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The bucket does not exist.
    #[error("bucket not found: {0}")]
    BucketNotFound(String),
    /// The bucket name is taken by another account.
    #[error("bucket already exists: {0}")]
    BucketAlreadyExists(String),
    /// The caller already owns a bucket with this name.
    #[error("bucket already owned by caller: {0}")]
    BucketAlreadyOwnedByCaller(String),
    /// The addressed key does not exist.
    #[error("key not found: {0}")]
    KeyNotFound(String),
    /// The caller may not see the bucket.
    #[error("access denied: {0}")]
    AccessDenied(String),
    /// The bucket still holds objects.
    #[error("bucket not empty: {0}")]
    BucketNotEmpty(String),
    /// The bucket has no document of this kind.
    #[error("no {0} configuration")]
    NoSuchConfiguration(ConfigKind),
    /// The backend rejected an argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The backend does not support the operation.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    /// The call was abandoned because its deadline elapsed.
    #[error("backend call cancelled: {0}")]
    Cancelled(String),
    /// Anything else; the message is passed through to the client.
    #[error("{0}")]
    Unknown(String),
}

/// Result alias for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// An S3-compatible store holding bucket state.
///
/// Methods a backend does not support may keep the default implementation,
/// which reports [`BackendError::Unsupported`].
#[async_trait]
pub trait BucketBackend: Send + Sync + fmt::Debug + 'static {
    /// List objects in a bucket. A `max_keys` of zero is an existence check.
    async fn list_objects(&self, input: ListObjectsInput) -> BackendResult<ListObjectsOutput>;

    /// Create a bucket.
    async fn create_bucket(&self, input: CreateBucketInput) -> BackendResult<()>;

    /// Delete an empty bucket.
    async fn delete_bucket(&self, input: BucketInput) -> BackendResult<()>;

    /// Fetch the bucket ACL.
    async fn get_bucket_acl(&self, input: BucketInput) -> BackendResult<AccessControlPolicy>;

    /// Replace the bucket ACL.
    async fn put_bucket_acl(&self, input: PutConfigurationInput<AclSource>) -> BackendResult<()>;

    /// Fetch the CORS configuration.
    async fn get_bucket_cors(&self, input: BucketInput) -> BackendResult<CORSConfiguration>;

    /// Replace the CORS configuration.
    async fn put_bucket_cors(
        &self,
        input: PutConfigurationInput<CORSConfiguration>,
    ) -> BackendResult<()>;

    /// Remove the CORS configuration.
    async fn delete_bucket_cors(&self, input: BucketInput) -> BackendResult<()>;

    /// Fetch the raw policy JSON.
    async fn get_bucket_policy(&self, input: BucketInput) -> BackendResult<String>;

    /// Replace the policy with the given JSON text.
    async fn put_bucket_policy(&self, input: PutConfigurationInput<String>) -> BackendResult<()>;

    /// Remove the policy.
    async fn delete_bucket_policy(&self, input: BucketInput) -> BackendResult<()>;

    /// Fetch the bucket region.
    async fn get_bucket_location(&self, input: BucketInput) -> BackendResult<LocationOutput>;

    /// Fetch the access-logging status.
    async fn get_bucket_logging(&self, input: BucketInput) -> BackendResult<BucketLoggingStatus>;

    /// Replace the access-logging status.
    async fn put_bucket_logging(
        &self,
        input: PutConfigurationInput<BucketLoggingStatus>,
    ) -> BackendResult<()>;

    /// Fetch the versioning state.
    async fn get_bucket_versioning(
        &self,
        input: BucketInput,
    ) -> BackendResult<VersioningConfiguration>;

    /// Change the versioning state.
    async fn put_bucket_versioning(
        &self,
        input: PutConfigurationInput<VersioningConfiguration>,
    ) -> BackendResult<()>;

    /// Fetch the tag set.
    async fn get_bucket_tagging(&self, input: BucketInput) -> BackendResult<Tagging>;

    /// Replace the tag set.
    async fn put_bucket_tagging(&self, input: PutConfigurationInput<Tagging>)
    -> BackendResult<()>;

    /// Remove the tag set.
    async fn delete_bucket_tagging(&self, input: BucketInput) -> BackendResult<()>;

    /// Fetch the event notification configuration.
    async fn get_bucket_notification(
        &self,
        input: BucketInput,
    ) -> BackendResult<NotificationConfiguration> {
        let _ = input;
        Err(BackendError::Unsupported("GetBucketNotification".to_owned()))
    }

    /// Fetch the lifecycle configuration.
    async fn get_bucket_lifecycle(&self, input: BucketInput)
    -> BackendResult<LifecycleConfiguration>;

    /// Replace the lifecycle configuration.
    async fn put_bucket_lifecycle(
        &self,
        input: PutConfigurationInput<LifecycleConfiguration>,
    ) -> BackendResult<()>;

    /// Remove the lifecycle configuration.
    async fn delete_bucket_lifecycle(&self, input: BucketInput) -> BackendResult<()>;

    /// Fetch the replication configuration.
    async fn get_bucket_replication(
        &self,
        input: BucketInput,
    ) -> BackendResult<ReplicationConfiguration> {
        let _ = input;
        Err(BackendError::Unsupported("GetBucketReplication".to_owned()))
    }

    /// Remove the replication configuration.
    async fn delete_bucket_replication(&self, input: BucketInput) -> BackendResult<()> {
        let _ = input;
        Err(BackendError::Unsupported("DeleteBucketReplication".to_owned()))
    }

    /// Fetch the static website configuration.
    async fn get_bucket_website(&self, input: BucketInput) -> BackendResult<WebsiteConfiguration>;

    /// Replace the static website configuration.
    async fn put_bucket_website(
        &self,
        input: PutConfigurationInput<WebsiteConfiguration>,
    ) -> BackendResult<()>;

    /// Remove the static website configuration.
    async fn delete_bucket_website(&self, input: BucketInput) -> BackendResult<()>;

    /// Fetch the transfer acceleration state.
    async fn get_bucket_accelerate(
        &self,
        input: BucketInput,
    ) -> BackendResult<AccelerateConfiguration> {
        let _ = input;
        Err(BackendError::Unsupported("GetBucketAccelerate".to_owned()))
    }

    /// Fetch who pays for requests.
    async fn get_bucket_request_payment(
        &self,
        input: BucketInput,
    ) -> BackendResult<RequestPaymentConfiguration> {
        let _ = input;
        Err(BackendError::Unsupported("GetBucketRequestPayment".to_owned()))
    }
}
