//! Bucket sub-resources selected by a query-string key.

use std::fmt;

/// A bucket configuration sub-resource, named by the query key that selects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubResource {
    /// `?acl`
    Acl,
    /// `?cors`
    Cors,
    /// `?policy`
    Policy,
    /// `?location`
    Location,
    /// `?logging`
    Logging,
    /// `?versioning`
    Versioning,
    /// `?tagging`
    Tagging,
    /// `?notification`
    Notification,
    /// `?lifecycle`
    Lifecycle,
    /// `?replication`
    Replication,
    /// `?website`
    Website,
    /// `?accelerate`
    Accelerate,
    /// `?requestPayment`
    RequestPayment,
}

impl SubResource {
    /// Match order used when a request carries more than one sub-resource key.
    /// The first key present wins.
    pub const PRECEDENCE: [Self; 13] = [
        Self::Acl,
        Self::Cors,
        Self::Policy,
        Self::Location,
        Self::Logging,
        Self::Versioning,
        Self::Tagging,
        Self::Notification,
        Self::Lifecycle,
        Self::Replication,
        Self::Website,
        Self::Accelerate,
        Self::RequestPayment,
    ];

    /// The query-string key that selects this sub-resource.
    #[must_use]
    pub fn query_key(&self) -> &'static str {
        match self {
            Self::Acl => "acl",
            Self::Cors => "cors",
            Self::Policy => "policy",
            Self::Location => "location",
            Self::Logging => "logging",
            Self::Versioning => "versioning",
            Self::Tagging => "tagging",
            Self::Notification => "notification",
            Self::Lifecycle => "lifecycle",
            Self::Replication => "replication",
            Self::Website => "website",
            Self::Accelerate => "accelerate",
            Self::RequestPayment => "requestPayment",
        }
    }

    /// The suffix used in operation names, e.g. `Cors` in `PutBucketCors`.
    #[must_use]
    pub fn operation_suffix(&self) -> &'static str {
        match self {
            Self::Acl => "Acl",
            Self::Cors => "Cors",
            Self::Policy => "Policy",
            Self::Location => "Location",
            Self::Logging => "Logging",
            Self::Versioning => "Versioning",
            Self::Tagging => "Tagging",
            Self::Notification => "Notification",
            Self::Lifecycle => "Lifecycle",
            Self::Replication => "Replication",
            Self::Website => "Website",
            Self::Accelerate => "Accelerate",
            Self::RequestPayment => "RequestPayment",
        }
    }
}

impl fmt::Display for SubResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_list_every_sub_resource_once() {
        let mut keys: Vec<_> = SubResource::PRECEDENCE.iter().map(SubResource::query_key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), SubResource::PRECEDENCE.len());
    }
}
