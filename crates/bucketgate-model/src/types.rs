//! Bucket configuration documents exchanged with clients and backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declares a closed string enum with `as_str`, `parse` and `Display`.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                #[doc = concat!("`", $value, "`")]
                $variant,
            )+
        }

        impl $name {
            /// Returns the wire value of this variant.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            /// Parses a wire value, returning `None` for anything unknown.
            #[must_use]
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(
    /// S3 ACL permission.
    Permission {
        FullControl => "FULL_CONTROL",
        Read => "READ",
        Write => "WRITE",
        ReadAcp => "READ_ACP",
        WriteAcp => "WRITE_ACP",
    }
);

string_enum!(
    /// Kind of ACL grantee, carried in `xsi:type`.
    GranteeType {
        CanonicalUser => "CanonicalUser",
        Group => "Group",
        AmazonCustomerByEmail => "AmazonCustomerByEmail",
    }
);

string_enum!(
    /// Canned ACL accepted in the `x-amz-acl` header.
    CannedAcl {
        Private => "private",
        PublicRead => "public-read",
        PublicReadWrite => "public-read-write",
        AuthenticatedRead => "authenticated-read",
    }
);

string_enum!(
    /// S3 BucketVersioningStatus enum.
    BucketVersioningStatus {
        Enabled => "Enabled",
        Suspended => "Suspended",
    }
);

string_enum!(
    /// S3 MFADeleteStatus enum.
    MfaDeleteStatus {
        Enabled => "Enabled",
        Disabled => "Disabled",
    }
);

string_enum!(
    /// S3 ExpirationStatus enum, used by lifecycle and replication rules.
    ExpirationStatus {
        Enabled => "Enabled",
        Disabled => "Disabled",
    }
);

string_enum!(
    /// S3 BucketAccelerateStatus enum.
    BucketAccelerateStatus {
        Enabled => "Enabled",
        Suspended => "Suspended",
    }
);

string_enum!(
    /// S3 Payer enum.
    Payer {
        BucketOwner => "BucketOwner",
        Requester => "Requester",
    }
);

/// URI of the `AllUsers` group grantee.
pub const ALL_USERS_URI: &str = "http://acs.amazonaws.com/groups/global/AllUsers";
/// URI of the `AuthenticatedUsers` group grantee.
pub const AUTHENTICATED_USERS_URI: &str =
    "http://acs.amazonaws.com/groups/global/AuthenticatedUsers";

/// S3 Owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Owner {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

/// S3 Grantee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grantee {
    pub grantee_type: GranteeType,
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub email_address: Option<String>,
    pub uri: Option<String>,
}

impl Grantee {
    /// A canonical-user grantee for the given owner.
    #[must_use]
    pub fn canonical_user(owner: &Owner) -> Self {
        Self {
            grantee_type: GranteeType::CanonicalUser,
            id: owner.id.clone(),
            display_name: owner.display_name.clone(),
            email_address: None,
            uri: None,
        }
    }

    /// A group grantee identified by URI.
    #[must_use]
    pub fn group(uri: &str) -> Self {
        Self {
            grantee_type: GranteeType::Group,
            id: None,
            display_name: None,
            email_address: None,
            uri: Some(uri.to_owned()),
        }
    }
}

/// S3 Grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub grantee: Grantee,
    pub permission: Permission,
}

/// S3 AccessControlPolicy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessControlPolicy {
    pub owner: Option<Owner>,
    pub grants: Vec<Grant>,
}

impl AccessControlPolicy {
    /// Expand a canned ACL into the grants it stands for.
    #[must_use]
    pub fn from_canned(acl: CannedAcl, owner: &Owner) -> Self {
        let mut grants = vec![Grant {
            grantee: Grantee::canonical_user(owner),
            permission: Permission::FullControl,
        }];
        match acl {
            CannedAcl::Private => {}
            CannedAcl::PublicRead => grants.push(Grant {
                grantee: Grantee::group(ALL_USERS_URI),
                permission: Permission::Read,
            }),
            CannedAcl::PublicReadWrite => {
                grants.push(Grant {
                    grantee: Grantee::group(ALL_USERS_URI),
                    permission: Permission::Read,
                });
                grants.push(Grant {
                    grantee: Grantee::group(ALL_USERS_URI),
                    permission: Permission::Write,
                });
            }
            CannedAcl::AuthenticatedRead => grants.push(Grant {
                grantee: Grantee::group(AUTHENTICATED_USERS_URI),
                permission: Permission::Read,
            }),
        }
        Self {
            owner: Some(owner.clone()),
            grants,
        }
    }
}

/// S3 CORSRule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CORSRule {
    pub id: Option<String>,
    pub allowed_headers: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub expose_headers: Vec<String>,
    pub max_age_seconds: Option<i32>,
}

/// S3 CORSConfiguration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CORSConfiguration {
    pub cors_rules: Vec<CORSRule>,
}

/// S3 Tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// S3 Tagging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tagging {
    pub tag_set: Vec<Tag>,
}

/// S3 LoggingEnabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingEnabled {
    pub target_bucket: String,
    pub target_prefix: String,
}

/// S3 BucketLoggingStatus. An absent `logging_enabled` means logging is off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketLoggingStatus {
    pub logging_enabled: Option<LoggingEnabled>,
}

/// S3 VersioningConfiguration. A bucket that never had versioning set has
/// neither field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersioningConfiguration {
    pub status: Option<BucketVersioningStatus>,
    pub mfa_delete: Option<MfaDeleteStatus>,
}

/// S3 FilterRule for notification key filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRule {
    pub name: String,
    pub value: String,
}

/// One notification destination (topic, queue or function).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationTarget {
    pub id: Option<String>,
    pub arn: String,
    pub events: Vec<String>,
    pub filter_rules: Vec<FilterRule>,
}

/// S3 NotificationConfiguration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationConfiguration {
    pub topic_configurations: Vec<NotificationTarget>,
    pub queue_configurations: Vec<NotificationTarget>,
    pub lambda_function_configurations: Vec<NotificationTarget>,
}

/// S3 LifecycleExpiration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleExpiration {
    pub date: Option<String>,
    pub days: Option<i32>,
    pub expired_object_delete_marker: Option<bool>,
}

/// S3 Transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    pub date: Option<String>,
    pub days: Option<i32>,
    pub storage_class: Option<String>,
}

/// S3 LifecycleRuleFilter, reduced to the prefix form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleRuleFilter {
    pub prefix: Option<String>,
}

/// S3 LifecycleRule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleRule {
    pub id: Option<String>,
    pub prefix: Option<String>,
    pub filter: Option<LifecycleRuleFilter>,
    pub status: ExpirationStatus,
    pub expiration: Option<LifecycleExpiration>,
    pub transitions: Vec<Transition>,
    pub noncurrent_version_expiration_days: Option<i32>,
    pub abort_incomplete_multipart_upload_days: Option<i32>,
}

/// S3 BucketLifecycleConfiguration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleConfiguration {
    pub rules: Vec<LifecycleRule>,
}

/// S3 Destination of a replication rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicationDestination {
    pub bucket: String,
    pub account: Option<String>,
    pub storage_class: Option<String>,
}

/// S3 ReplicationRule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationRule {
    pub id: Option<String>,
    pub priority: Option<i32>,
    pub prefix: Option<String>,
    pub status: ExpirationStatus,
    pub destination: ReplicationDestination,
}

/// S3 ReplicationConfiguration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicationConfiguration {
    pub role: String,
    pub rules: Vec<ReplicationRule>,
}

/// S3 RedirectAllRequestsTo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectAllRequestsTo {
    pub host_name: String,
    pub protocol: Option<String>,
}

/// S3 Condition of a website routing rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingCondition {
    pub http_error_code_returned_equals: Option<String>,
    pub key_prefix_equals: Option<String>,
}

/// S3 Redirect of a website routing rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirect {
    pub host_name: Option<String>,
    pub http_redirect_code: Option<String>,
    pub protocol: Option<String>,
    pub replace_key_prefix_with: Option<String>,
    pub replace_key_with: Option<String>,
}

/// S3 RoutingRule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingRule {
    pub condition: Option<RoutingCondition>,
    pub redirect: Redirect,
}

/// S3 WebsiteConfiguration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebsiteConfiguration {
    pub index_document_suffix: Option<String>,
    pub error_document_key: Option<String>,
    pub redirect_all_requests_to: Option<RedirectAllRequestsTo>,
    pub routing_rules: Vec<RoutingRule>,
}

/// S3 AccelerateConfiguration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccelerateConfiguration {
    pub status: Option<BucketAccelerateStatus>,
}

/// S3 RequestPaymentConfiguration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPaymentConfiguration {
    pub payer: Payer,
}

impl Default for RequestPaymentConfiguration {
    fn default() -> Self {
        Self {
            payer: Payer::BucketOwner,
        }
    }
}

/// S3 CreateBucketConfiguration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateBucketConfiguration {
    pub location_constraint: Option<String>,
}

/// S3 Object entry of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub key: String,
    pub last_modified: DateTime<Utc>,
    pub e_tag: String,
    pub size: i64,
    pub storage_class: String,
    pub owner: Option<Owner>,
}

/// S3 CommonPrefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonPrefix {
    pub prefix: String,
}
