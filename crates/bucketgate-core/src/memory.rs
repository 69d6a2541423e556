//! In-process [`BucketBackend`] keeping all state in memory.
//!
//! [`InMemoryBackend`] manages the collection of buckets and enforces global
//! bucket-name uniqueness. All operations are thread-safe via `DashMap`, and
//! no lock is held across an `.await`.

use std::sync::Arc;

use async_trait::async_trait;
use bucketgate_http::backend::{BackendError, BackendResult, BucketBackend, ConfigKind};
use bucketgate_model::input::{
    AclSource, BucketInput, CreateBucketInput, ListObjectsInput, PutConfigurationInput,
};
use bucketgate_model::output::{ListObjectsOutput, LocationOutput};
use bucketgate_model::types::{
    AccelerateConfiguration, AccessControlPolicy, BucketLoggingStatus, CORSConfiguration,
    CannedAcl, LifecycleConfiguration, NotificationConfiguration, Owner,
    ReplicationConfiguration, RequestPaymentConfiguration, Tagging, VersioningConfiguration,
    WebsiteConfiguration,
};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};

use crate::state::{BucketRecord, ObjectRecord, to_common_prefixes};

/// Region reported as an empty `LocationConstraint`.
const CLASSIC_REGION: &str = "us-east-1";

/// Bucket state held in process memory.
///
/// Bucket names are globally unique across accounts, enforced by
/// `global_bucket_owner`. Buckets are shared as `Arc`s so a handle can
/// outlive the map guard it was cloned from.
pub struct InMemoryBackend {
    /// Bucket name to record mapping.
    buckets: DashMap<String, Arc<BucketRecord>>,
    /// Bucket name to owning account ID (enforces global uniqueness).
    global_bucket_owner: DashMap<String, String>,
    /// Owner of buckets created through this backend.
    owner: Owner,
    /// Region used when CreateBucket names none.
    default_region: String,
}

impl std::fmt::Debug for InMemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBackend")
            .field("bucket_count", &self.buckets.len())
            .field("default_region", &self.default_region)
            .finish_non_exhaustive()
    }
}

impl InMemoryBackend {
    /// An empty backend creating buckets for `owner` in `default_region`.
    #[must_use]
    pub fn new(owner: Owner, default_region: impl Into<String>) -> Self {
        Self {
            buckets: DashMap::new(),
            global_bucket_owner: DashMap::new(),
            owner,
            default_region: default_region.into(),
        }
    }

    /// Register a bucket owned by another account, so creating it fails
    /// with `BucketAlreadyExists`.
    pub fn seed_foreign_bucket(&self, name: &str, owner: Owner) {
        let account = owner.id.clone().unwrap_or_default();
        let acl = AccessControlPolicy::from_canned(CannedAcl::Private, &owner);
        let record = BucketRecord::new(name.to_owned(), self.default_region.clone(), owner, acl);
        self.buckets.insert(name.to_owned(), Arc::new(record));
        self.global_bucket_owner.insert(name.to_owned(), account);
    }

    /// Store an object so listings and deletes can see it.
    pub fn put_object(&self, bucket: &str, key: &str, content: &[u8]) -> BackendResult<()> {
        let record = self.bucket(bucket, None)?;
        record
            .objects
            .write()
            .insert(key.to_owned(), ObjectRecord::new(key, content));
        debug!(bucket, key, size = content.len(), "object stored");
        Ok(())
    }

    /// Whether a bucket with this name exists.
    #[must_use]
    pub fn bucket_exists(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }

    /// Remove every bucket.
    pub fn reset(&self) {
        debug!("resetting in-memory bucket state");
        self.buckets.clear();
        self.global_bucket_owner.clear();
    }

    /// Look up a bucket, checking `x-amz-expected-bucket-owner` when given.
    fn bucket(&self, name: &str, expected_owner: Option<&str>) -> BackendResult<Arc<BucketRecord>> {
        let record = self
            .buckets
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| BackendError::BucketNotFound(name.to_owned()))?;
        if !record.is_owned_by(expected_owner) {
            return Err(BackendError::AccessDenied(name.to_owned()));
        }
        Ok(record)
    }

    fn addressed(&self, input: &BucketInput) -> BackendResult<Arc<BucketRecord>> {
        self.bucket(&input.bucket, input.expected_bucket_owner.as_deref())
    }

    fn target<T>(&self, input: &PutConfigurationInput<T>) -> BackendResult<Arc<BucketRecord>> {
        self.bucket(&input.bucket, input.expected_bucket_owner.as_deref())
    }
}

fn required<T: Clone>(value: Option<&T>, kind: ConfigKind) -> BackendResult<T> {
    value.cloned().ok_or(BackendError::NoSuchConfiguration(kind))
}

#[async_trait]
impl BucketBackend for InMemoryBackend {
    async fn list_objects(&self, input: ListObjectsInput) -> BackendResult<ListObjectsOutput> {
        let record = self.bucket(&input.bucket, input.expected_bucket_owner.as_deref())?;
        let max_keys = usize::try_from(input.max_keys)
            .map_err(|_| BackendError::InvalidArgument(format!("max-keys {}", input.max_keys)))?;

        let listed = record.list_objects(
            input.prefix.as_deref().unwrap_or_default(),
            input.delimiter.as_deref().unwrap_or_default(),
            input.marker.as_deref().unwrap_or_default(),
            max_keys,
        );
        let next_marker = listed.next_marker.filter(|_| input.delimiter.is_some());

        Ok(ListObjectsOutput {
            name: record.name.clone(),
            prefix: input.prefix,
            marker: input.marker,
            delimiter: input.delimiter,
            max_keys: input.max_keys,
            is_truncated: listed.is_truncated,
            next_marker,
            contents: listed
                .objects
                .iter()
                .map(|obj| obj.to_listing(&record.owner))
                .collect(),
            common_prefixes: to_common_prefixes(listed.common_prefixes),
        })
    }

    async fn create_bucket(&self, input: CreateBucketInput) -> BackendResult<()> {
        let account = self.owner.id.clone().unwrap_or_default();
        match self.global_bucket_owner.entry(input.bucket.clone()) {
            Entry::Occupied(existing) => {
                if *existing.get() == account {
                    return Err(BackendError::BucketAlreadyOwnedByCaller(input.bucket));
                }
                Err(BackendError::BucketAlreadyExists(input.bucket))
            }
            Entry::Vacant(slot) => {
                let region = input
                    .location_constraint
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| self.default_region.clone());
                let acl = AccessControlPolicy::from_canned(
                    input.acl.unwrap_or(CannedAcl::Private),
                    &self.owner,
                );
                let record =
                    BucketRecord::new(input.bucket.clone(), region, self.owner.clone(), acl);
                slot.insert(account);
                self.buckets.insert(input.bucket.clone(), Arc::new(record));
                info!(bucket = %input.bucket, "bucket created");
                Ok(())
            }
        }
    }

    async fn delete_bucket(&self, input: BucketInput) -> BackendResult<()> {
        let record = self.addressed(&input)?;
        if !record.is_empty() {
            return Err(BackendError::BucketNotEmpty(input.bucket));
        }
        drop(record);

        let removed = self
            .buckets
            .remove_if(&input.bucket, |_, record| record.is_empty());
        if removed.is_none() {
            return Err(BackendError::BucketNotEmpty(input.bucket));
        }
        self.global_bucket_owner.remove(&input.bucket);
        info!(bucket = %input.bucket, "bucket deleted");
        Ok(())
    }

    async fn get_bucket_acl(&self, input: BucketInput) -> BackendResult<AccessControlPolicy> {
        Ok(self.addressed(&input)?.acl.read().clone())
    }

    async fn put_bucket_acl(&self, input: PutConfigurationInput<AclSource>) -> BackendResult<()> {
        let record = self.target(&input)?;
        let acl = match input.configuration {
            AclSource::Canned(canned) => AccessControlPolicy::from_canned(canned, &record.owner),
            AclSource::Policy(mut policy) => {
                if policy.owner.is_none() {
                    policy.owner = Some(record.owner.clone());
                }
                policy
            }
        };
        *record.acl.write() = acl;
        Ok(())
    }

    async fn get_bucket_cors(&self, input: BucketInput) -> BackendResult<CORSConfiguration> {
        let record = self.addressed(&input)?;
        required(record.cors.read().as_ref(), ConfigKind::Cors)
    }

    async fn put_bucket_cors(
        &self,
        input: PutConfigurationInput<CORSConfiguration>,
    ) -> BackendResult<()> {
        let record = self.target(&input)?;
        *record.cors.write() = Some(input.configuration);
        Ok(())
    }

    async fn delete_bucket_cors(&self, input: BucketInput) -> BackendResult<()> {
        *self.addressed(&input)?.cors.write() = None;
        Ok(())
    }

    async fn get_bucket_policy(&self, input: BucketInput) -> BackendResult<String> {
        let record = self.addressed(&input)?;
        required(record.policy.read().as_ref(), ConfigKind::Policy)
    }

    async fn put_bucket_policy(&self, input: PutConfigurationInput<String>) -> BackendResult<()> {
        let record = self.target(&input)?;
        *record.policy.write() = Some(input.configuration);
        Ok(())
    }

    async fn delete_bucket_policy(&self, input: BucketInput) -> BackendResult<()> {
        *self.addressed(&input)?.policy.write() = None;
        Ok(())
    }

    async fn get_bucket_location(&self, input: BucketInput) -> BackendResult<LocationOutput> {
        let record = self.addressed(&input)?;
        Ok(LocationOutput {
            location_constraint: (record.region != CLASSIC_REGION).then(|| record.region.clone()),
        })
    }

    async fn get_bucket_logging(&self, input: BucketInput) -> BackendResult<BucketLoggingStatus> {
        Ok(self.addressed(&input)?.logging.read().clone())
    }

    async fn put_bucket_logging(
        &self,
        input: PutConfigurationInput<BucketLoggingStatus>,
    ) -> BackendResult<()> {
        // Resolve the target first; holding one map guard while taking another can deadlock.
        if let Some(enabled) = &input.configuration.logging_enabled {
            if !self.bucket_exists(&enabled.target_bucket) {
                return Err(BackendError::InvalidArgument(format!(
                    "The target bucket for logging does not exist: {}",
                    enabled.target_bucket
                )));
            }
        }
        let record = self.target(&input)?;
        *record.logging.write() = input.configuration;
        Ok(())
    }

    async fn get_bucket_versioning(
        &self,
        input: BucketInput,
    ) -> BackendResult<VersioningConfiguration> {
        Ok(self.addressed(&input)?.versioning.read().clone())
    }

    async fn put_bucket_versioning(
        &self,
        input: PutConfigurationInput<VersioningConfiguration>,
    ) -> BackendResult<()> {
        let record = self.target(&input)?;
        let mut versioning = record.versioning.write();
        versioning.status = input.configuration.status;
        if input.configuration.mfa_delete.is_some() {
            versioning.mfa_delete = input.configuration.mfa_delete;
        }
        Ok(())
    }

    async fn get_bucket_tagging(&self, input: BucketInput) -> BackendResult<Tagging> {
        let record = self.addressed(&input)?;
        required(record.tagging.read().as_ref(), ConfigKind::Tagging)
    }

    async fn put_bucket_tagging(&self, input: PutConfigurationInput<Tagging>) -> BackendResult<()> {
        let record = self.target(&input)?;
        *record.tagging.write() = Some(input.configuration);
        Ok(())
    }

    async fn delete_bucket_tagging(&self, input: BucketInput) -> BackendResult<()> {
        *self.addressed(&input)?.tagging.write() = None;
        Ok(())
    }

    async fn get_bucket_notification(
        &self,
        input: BucketInput,
    ) -> BackendResult<NotificationConfiguration> {
        Ok(self.addressed(&input)?.notification.read().clone())
    }

    async fn get_bucket_lifecycle(
        &self,
        input: BucketInput,
    ) -> BackendResult<LifecycleConfiguration> {
        let record = self.addressed(&input)?;
        required(record.lifecycle.read().as_ref(), ConfigKind::Lifecycle)
    }

    async fn put_bucket_lifecycle(
        &self,
        input: PutConfigurationInput<LifecycleConfiguration>,
    ) -> BackendResult<()> {
        let record = self.target(&input)?;
        *record.lifecycle.write() = Some(input.configuration);
        Ok(())
    }

    async fn delete_bucket_lifecycle(&self, input: BucketInput) -> BackendResult<()> {
        *self.addressed(&input)?.lifecycle.write() = None;
        Ok(())
    }

    async fn get_bucket_replication(
        &self,
        input: BucketInput,
    ) -> BackendResult<ReplicationConfiguration> {
        let record = self.addressed(&input)?;
        required(record.replication.read().as_ref(), ConfigKind::Replication)
    }

    async fn delete_bucket_replication(&self, input: BucketInput) -> BackendResult<()> {
        *self.addressed(&input)?.replication.write() = None;
        Ok(())
    }

    async fn get_bucket_website(&self, input: BucketInput) -> BackendResult<WebsiteConfiguration> {
        let record = self.addressed(&input)?;
        required(record.website.read().as_ref(), ConfigKind::Website)
    }

    async fn put_bucket_website(
        &self,
        input: PutConfigurationInput<WebsiteConfiguration>,
    ) -> BackendResult<()> {
        let record = self.target(&input)?;
        *record.website.write() = Some(input.configuration);
        Ok(())
    }

    async fn delete_bucket_website(&self, input: BucketInput) -> BackendResult<()> {
        *self.addressed(&input)?.website.write() = None;
        Ok(())
    }

    async fn get_bucket_accelerate(
        &self,
        input: BucketInput,
    ) -> BackendResult<AccelerateConfiguration> {
        Ok(self.addressed(&input)?.accelerate.read().clone())
    }

    async fn get_bucket_request_payment(
        &self,
        input: BucketInput,
    ) -> BackendResult<RequestPaymentConfiguration> {
        Ok(self.addressed(&input)?.request_payment.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use bucketgate_model::types::{
        BucketVersioningStatus, LoggingEnabled, Permission, Tag,
    };

    use super::*;

    fn owner() -> Owner {
        Owner {
            id: Some("owner-1".to_owned()),
            display_name: Some("owner".to_owned()),
        }
    }

    fn backend() -> InMemoryBackend {
        InMemoryBackend::new(owner(), "us-east-1")
    }

    fn create(bucket: &str) -> CreateBucketInput {
        CreateBucketInput {
            bucket: bucket.to_owned(),
            ..CreateBucketInput::default()
        }
    }

    fn put<T>(bucket: &str, configuration: T) -> PutConfigurationInput<T> {
        PutConfigurationInput {
            bucket: bucket.to_owned(),
            expected_bucket_owner: None,
            configuration,
        }
    }

    fn list(bucket: &str, max_keys: i32) -> ListObjectsInput {
        ListObjectsInput {
            bucket: bucket.to_owned(),
            expected_bucket_owner: None,
            prefix: None,
            delimiter: None,
            marker: None,
            max_keys,
        }
    }

    #[tokio::test]
    async fn test_should_create_and_delete_bucket() {
        let backend = backend();
        backend.create_bucket(create("photos")).await.expect("create");
        assert!(backend.bucket_exists("photos"));

        backend
            .delete_bucket(BucketInput::new("photos"))
            .await
            .expect("delete");
        assert!(!backend.bucket_exists("photos"));
    }

    #[tokio::test]
    async fn test_should_distinguish_own_and_foreign_buckets() {
        let backend = backend();
        backend.create_bucket(create("mine")).await.expect("create");
        backend.seed_foreign_bucket(
            "theirs",
            Owner {
                id: Some("other".to_owned()),
                display_name: None,
            },
        );

        assert_eq!(
            backend.create_bucket(create("mine")).await,
            Err(BackendError::BucketAlreadyOwnedByCaller("mine".to_owned()))
        );
        assert_eq!(
            backend.create_bucket(create("theirs")).await,
            Err(BackendError::BucketAlreadyExists("theirs".to_owned()))
        );
    }

    #[tokio::test]
    async fn test_should_refuse_to_delete_non_empty_bucket() {
        let backend = backend();
        backend.create_bucket(create("photos")).await.expect("create");
        backend.put_object("photos", "a.jpg", b"jpeg").expect("put");

        assert_eq!(
            backend.delete_bucket(BucketInput::new("photos")).await,
            Err(BackendError::BucketNotEmpty("photos".to_owned()))
        );
    }

    #[tokio::test]
    async fn test_should_deny_mismatched_expected_owner() {
        let backend = backend();
        backend.create_bucket(create("photos")).await.expect("create");
        let input = BucketInput {
            bucket: "photos".to_owned(),
            expected_bucket_owner: Some("someone-else".to_owned()),
        };
        assert_eq!(
            backend.get_bucket_acl(input).await,
            Err(BackendError::AccessDenied("photos".to_owned()))
        );
    }

    #[tokio::test]
    async fn test_should_report_missing_bucket() {
        let backend = backend();
        assert_eq!(
            backend.get_bucket_versioning(BucketInput::new("nope")).await,
            Err(BackendError::BucketNotFound("nope".to_owned()))
        );
    }

    #[tokio::test]
    async fn test_should_report_classic_region_as_empty_location() {
        let backend = backend();
        backend.create_bucket(create("classic")).await.expect("create");
        backend
            .create_bucket(CreateBucketInput {
                location_constraint: Some("eu-west-1".to_owned()),
                ..create("europe")
            })
            .await
            .expect("create");

        let classic = backend
            .get_bucket_location(BucketInput::new("classic"))
            .await
            .expect("location");
        assert_eq!(classic.location_constraint, None);

        let europe = backend
            .get_bucket_location(BucketInput::new("europe"))
            .await
            .expect("location");
        assert_eq!(europe.location_constraint.as_deref(), Some("eu-west-1"));
    }

    #[tokio::test]
    async fn test_should_expand_canned_acl() {
        let backend = backend();
        backend.create_bucket(create("photos")).await.expect("create");
        backend
            .put_bucket_acl(put("photos", AclSource::Canned(CannedAcl::PublicRead)))
            .await
            .expect("put acl");

        let acl = backend
            .get_bucket_acl(BucketInput::new("photos"))
            .await
            .expect("acl");
        assert_eq!(acl.grants.len(), 2);
        assert_eq!(acl.grants[1].permission, Permission::Read);
        assert_eq!(acl.owner, Some(owner()));
    }

    #[tokio::test]
    async fn test_should_report_missing_configuration_until_put() {
        let backend = backend();
        backend.create_bucket(create("photos")).await.expect("create");

        assert_eq!(
            backend.get_bucket_tagging(BucketInput::new("photos")).await,
            Err(BackendError::NoSuchConfiguration(ConfigKind::Tagging))
        );

        let tagging = Tagging {
            tag_set: vec![Tag {
                key: "env".to_owned(),
                value: "prod".to_owned(),
            }],
        };
        backend
            .put_bucket_tagging(put("photos", tagging.clone()))
            .await
            .expect("put tagging");
        assert_eq!(
            backend.get_bucket_tagging(BucketInput::new("photos")).await,
            Ok(tagging)
        );

        backend
            .delete_bucket_tagging(BucketInput::new("photos"))
            .await
            .expect("delete tagging");
        assert!(
            backend
                .get_bucket_tagging(BucketInput::new("photos"))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_should_require_existing_logging_target() {
        let backend = backend();
        backend.create_bucket(create("photos")).await.expect("create");
        let status = BucketLoggingStatus {
            logging_enabled: Some(LoggingEnabled {
                target_bucket: "logs".to_owned(),
                target_prefix: "photos/".to_owned(),
            }),
        };

        assert!(matches!(
            backend.put_bucket_logging(put("photos", status.clone())).await,
            Err(BackendError::InvalidArgument(_))
        ));

        backend.create_bucket(create("logs")).await.expect("create");
        backend
            .put_bucket_logging(put("photos", status.clone()))
            .await
            .expect("put logging");
        assert_eq!(
            backend.get_bucket_logging(BucketInput::new("photos")).await,
            Ok(status)
        );
    }

    #[tokio::test]
    async fn test_should_keep_mfa_delete_when_omitted() {
        let backend = backend();
        backend.create_bucket(create("photos")).await.expect("create");
        backend
            .put_bucket_versioning(put(
                "photos",
                VersioningConfiguration {
                    status: Some(BucketVersioningStatus::Enabled),
                    mfa_delete: None,
                },
            ))
            .await
            .expect("put versioning");

        let versioning = backend
            .get_bucket_versioning(BucketInput::new("photos"))
            .await
            .expect("versioning");
        assert_eq!(versioning.status, Some(BucketVersioningStatus::Enabled));
        assert_eq!(versioning.mfa_delete, None);
    }

    #[tokio::test]
    async fn test_should_list_and_check_existence() {
        let backend = backend();
        backend.create_bucket(create("photos")).await.expect("create");
        for key in ["a", "b", "c"] {
            backend.put_object("photos", key, b"x").expect("put");
        }

        let page = backend.list_objects(list("photos", 2)).await.expect("list");
        assert_eq!(page.name, "photos");
        assert_eq!(page.contents.len(), 2);
        assert!(page.is_truncated);
        assert_eq!(page.next_marker, None);

        let existence = backend.list_objects(list("photos", 0)).await.expect("existence");
        assert!(existence.contents.is_empty());
    }

    #[tokio::test]
    async fn test_should_serve_default_documents_for_new_bucket() {
        let backend = backend();
        backend.create_bucket(create("photos")).await.expect("create");
        let input = || BucketInput::new("photos");

        assert_eq!(
            backend.get_bucket_accelerate(input()).await,
            Ok(AccelerateConfiguration::default())
        );
        assert_eq!(
            backend.get_bucket_request_payment(input()).await,
            Ok(RequestPaymentConfiguration::default())
        );
        assert_eq!(
            backend.get_bucket_notification(input()).await,
            Ok(NotificationConfiguration::default())
        );
        assert_eq!(
            backend.get_bucket_replication(input()).await,
            Err(BackendError::NoSuchConfiguration(ConfigKind::Replication))
        );
    }
}
