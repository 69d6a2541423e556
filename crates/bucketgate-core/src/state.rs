//! Per-bucket state held by the in-memory backend.
//!
//! A [`BucketRecord`] holds one bucket's objects and configuration documents.
//! Interior mutability is achieved through `parking_lot::RwLock`, one lock
//! per field, so readers of one document never wait on writers of another.

use std::collections::BTreeMap;
use std::collections::HashSet;

use bucketgate_model::types::{
    AccelerateConfiguration, AccessControlPolicy, BucketLoggingStatus, CORSConfiguration,
    CommonPrefix, LifecycleConfiguration, NotificationConfiguration, Object, Owner,
    ReplicationConfiguration, RequestPaymentConfiguration, Tagging, VersioningConfiguration,
    WebsiteConfiguration,
};
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use parking_lot::RwLock;

/// One stored object; only the metadata a listing needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    /// Object key.
    pub key: String,
    /// Size in bytes.
    pub size: i64,
    /// Quoted hex MD5 of the content.
    pub e_tag: String,
    /// Last write time.
    pub last_modified: DateTime<Utc>,
}

impl ObjectRecord {
    /// Record an object with the given content.
    #[must_use]
    pub fn new(key: impl Into<String>, content: &[u8]) -> Self {
        Self {
            key: key.into(),
            size: i64::try_from(content.len()).unwrap_or(i64::MAX),
            e_tag: format!("\"{}\"", hex::encode(Md5::digest(content))),
            last_modified: Utc::now(),
        }
    }
}

/// Result of listing a bucket.
#[derive(Debug, Clone, Default)]
pub struct ListResult {
    /// Objects that match, in key order.
    pub objects: Vec<ObjectRecord>,
    /// Common prefixes when a delimiter is used.
    pub common_prefixes: Vec<String>,
    /// Whether more keys are available.
    pub is_truncated: bool,
    /// Last key or common prefix returned when truncated.
    pub next_marker: Option<String>,
}

/// A bucket and all of its configuration.
#[derive(Debug)]
#[allow(missing_docs)]
pub struct BucketRecord {
    pub name: String,
    /// Region the bucket was created in.
    pub region: String,
    pub creation_date: DateTime<Utc>,
    pub owner: Owner,
    /// Objects keyed by name; the map keeps listings ordered.
    pub objects: RwLock<BTreeMap<String, ObjectRecord>>,
    pub acl: RwLock<AccessControlPolicy>,
    pub cors: RwLock<Option<CORSConfiguration>>,
    pub policy: RwLock<Option<String>>,
    pub logging: RwLock<BucketLoggingStatus>,
    pub versioning: RwLock<VersioningConfiguration>,
    pub tagging: RwLock<Option<Tagging>>,
    pub notification: RwLock<NotificationConfiguration>,
    pub lifecycle: RwLock<Option<LifecycleConfiguration>>,
    pub replication: RwLock<Option<ReplicationConfiguration>>,
    pub website: RwLock<Option<WebsiteConfiguration>>,
    pub accelerate: RwLock<AccelerateConfiguration>,
    pub request_payment: RwLock<RequestPaymentConfiguration>,
}

impl BucketRecord {
    /// Create a bucket with the given name, region, owner and ACL.
    ///
    /// All other configuration starts at its default.
    #[must_use]
    pub fn new(name: String, region: String, owner: Owner, acl: AccessControlPolicy) -> Self {
        Self {
            name,
            region,
            creation_date: Utc::now(),
            owner,
            objects: RwLock::new(BTreeMap::new()),
            acl: RwLock::new(acl),
            cors: RwLock::new(None),
            policy: RwLock::new(None),
            logging: RwLock::new(BucketLoggingStatus::default()),
            versioning: RwLock::new(VersioningConfiguration::default()),
            tagging: RwLock::new(None),
            notification: RwLock::new(NotificationConfiguration::default()),
            lifecycle: RwLock::new(None),
            replication: RwLock::new(None),
            website: RwLock::new(None),
            accelerate: RwLock::new(AccelerateConfiguration::default()),
            request_payment: RwLock::new(RequestPaymentConfiguration::default()),
        }
    }

    /// Whether the bucket holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Whether `expected`, when given, names this bucket's owner.
    #[must_use]
    pub fn is_owned_by(&self, expected: Option<&str>) -> bool {
        expected.is_none_or(|id| self.owner.id.as_deref() == Some(id))
    }

    /// List objects after `marker` under `prefix`, grouping on `delimiter`.
    ///
    /// Objects and common prefixes both count against `max_keys`; the next
    /// marker is the last entry of either kind.
    #[must_use]
    pub fn list_objects(
        &self,
        prefix: &str,
        delimiter: &str,
        marker: &str,
        max_keys: usize,
    ) -> ListResult {
        let objects = self.objects.read();
        let use_delim = !delimiter.is_empty();
        let mut result = ListResult::default();
        let mut seen_prefixes = HashSet::new();
        let mut last_entry = None;

        for obj in objects.values() {
            if !marker.is_empty() && obj.key.as_str() <= marker {
                continue;
            }
            if !obj.key.starts_with(prefix) {
                continue;
            }

            let common_prefix = if use_delim {
                let after_prefix = &obj.key[prefix.len()..];
                after_prefix
                    .find(delimiter)
                    .map(|pos| format!("{prefix}{}{delimiter}", &after_prefix[..pos]))
            } else {
                None
            };

            if let Some(cp) = &common_prefix {
                // A marker naming a rolled-up prefix skips its whole group.
                if (!marker.is_empty() && cp.as_str() <= marker) || seen_prefixes.contains(cp) {
                    continue;
                }
            }

            if result.objects.len() + result.common_prefixes.len() >= max_keys {
                result.is_truncated = true;
                break;
            }

            match common_prefix {
                Some(cp) => {
                    seen_prefixes.insert(cp.clone());
                    last_entry = Some(cp.clone());
                    result.common_prefixes.push(cp);
                }
                None => {
                    last_entry = Some(obj.key.clone());
                    result.objects.push(obj.clone());
                }
            }
        }

        if result.is_truncated {
            result.next_marker = last_entry;
        }
        result
    }
}

impl ObjectRecord {
    /// The listing entry for this object.
    #[must_use]
    pub fn to_listing(&self, owner: &Owner) -> Object {
        Object {
            key: self.key.clone(),
            last_modified: self.last_modified,
            e_tag: self.e_tag.clone(),
            size: self.size,
            storage_class: "STANDARD".to_owned(),
            owner: Some(owner.clone()),
        }
    }
}

/// Wrap prefix strings as listing entries.
#[must_use]
pub fn to_common_prefixes(prefixes: Vec<String>) -> Vec<CommonPrefix> {
    prefixes
        .into_iter()
        .map(|prefix| CommonPrefix { prefix })
        .collect()
}
