//! Names of the bucket operations the gateway serves.

use http::Method;

use crate::subresource::SubResource;

/// Every bucket operation with a handler, stubbed or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketOperation {
    /// The ListObjects operation.
    ListObjects,
    /// The HeadBucket operation.
    HeadBucket,
    /// The CreateBucket operation.
    CreateBucket,
    /// The DeleteBucket operation.
    DeleteBucket,
    /// The GetBucketAcl operation.
    GetBucketAcl,
    /// The PutBucketAcl operation.
    PutBucketAcl,
    /// The GetBucketCors operation.
    GetBucketCors,
    /// The PutBucketCors operation.
    PutBucketCors,
    /// The DeleteBucketCors operation.
    DeleteBucketCors,
    /// The GetBucketPolicy operation.
    GetBucketPolicy,
    /// The PutBucketPolicy operation.
    PutBucketPolicy,
    /// The DeleteBucketPolicy operation.
    DeleteBucketPolicy,
    /// The GetBucketLocation operation.
    GetBucketLocation,
    /// The GetBucketLogging operation.
    GetBucketLogging,
    /// The PutBucketLogging operation.
    PutBucketLogging,
    /// The GetBucketVersioning operation.
    GetBucketVersioning,
    /// The PutBucketVersioning operation.
    PutBucketVersioning,
    /// The GetBucketTagging operation.
    GetBucketTagging,
    /// The PutBucketTagging operation.
    PutBucketTagging,
    /// The DeleteBucketTagging operation.
    DeleteBucketTagging,
    /// The GetBucketNotification operation.
    GetBucketNotification,
    /// The PutBucketNotification operation.
    PutBucketNotification,
    /// The GetBucketLifecycle operation.
    GetBucketLifecycle,
    /// The PutBucketLifecycle operation.
    PutBucketLifecycle,
    /// The DeleteBucketLifecycle operation.
    DeleteBucketLifecycle,
    /// The GetBucketReplication operation.
    GetBucketReplication,
    /// The PutBucketReplication operation.
    PutBucketReplication,
    /// The DeleteBucketReplication operation.
    DeleteBucketReplication,
    /// The GetBucketWebsite operation.
    GetBucketWebsite,
    /// The PutBucketWebsite operation.
    PutBucketWebsite,
    /// The DeleteBucketWebsite operation.
    DeleteBucketWebsite,
    /// The GetBucketAccelerate operation.
    GetBucketAccelerate,
    /// The GetBucketRequestPayment operation.
    GetBucketRequestPayment,
    /// The PutBucketRequestPayment operation.
    PutBucketRequestPayment,
}

impl BucketOperation {
    /// Returns the operation name as a static string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListObjects => "ListObjects",
            Self::HeadBucket => "HeadBucket",
            Self::CreateBucket => "CreateBucket",
            Self::DeleteBucket => "DeleteBucket",
            Self::GetBucketAcl => "GetBucketAcl",
            Self::PutBucketAcl => "PutBucketAcl",
            Self::GetBucketCors => "GetBucketCors",
            Self::PutBucketCors => "PutBucketCors",
            Self::DeleteBucketCors => "DeleteBucketCors",
            Self::GetBucketPolicy => "GetBucketPolicy",
            Self::PutBucketPolicy => "PutBucketPolicy",
            Self::DeleteBucketPolicy => "DeleteBucketPolicy",
            Self::GetBucketLocation => "GetBucketLocation",
            Self::GetBucketLogging => "GetBucketLogging",
            Self::PutBucketLogging => "PutBucketLogging",
            Self::GetBucketVersioning => "GetBucketVersioning",
            Self::PutBucketVersioning => "PutBucketVersioning",
            Self::GetBucketTagging => "GetBucketTagging",
            Self::PutBucketTagging => "PutBucketTagging",
            Self::DeleteBucketTagging => "DeleteBucketTagging",
            Self::GetBucketNotification => "GetBucketNotification",
            Self::PutBucketNotification => "PutBucketNotification",
            Self::GetBucketLifecycle => "GetBucketLifecycle",
            Self::PutBucketLifecycle => "PutBucketLifecycle",
            Self::DeleteBucketLifecycle => "DeleteBucketLifecycle",
            Self::GetBucketReplication => "GetBucketReplication",
            Self::PutBucketReplication => "PutBucketReplication",
            Self::DeleteBucketReplication => "DeleteBucketReplication",
            Self::GetBucketWebsite => "GetBucketWebsite",
            Self::PutBucketWebsite => "PutBucketWebsite",
            Self::DeleteBucketWebsite => "DeleteBucketWebsite",
            Self::GetBucketAccelerate => "GetBucketAccelerate",
            Self::GetBucketRequestPayment => "GetBucketRequestPayment",
            Self::PutBucketRequestPayment => "PutBucketRequestPayment",
        }
    }
}

impl std::fmt::Display for BucketOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the operation a method/sub-resource pair addresses, whether or
/// not the gateway serves it.
///
/// `POST ?versioning` is `PostBucketVersioning`; an unrecognized method on
/// the bare bucket is `{Method}Bucket`.
#[must_use]
pub fn operation_name(method: &Method, sub_resource: Option<SubResource>) -> String {
    let verb = method_verb(method);
    match sub_resource {
        Some(sub) => format!("{verb}Bucket{}", sub.operation_suffix()),
        None => match *method {
            Method::GET => BucketOperation::ListObjects.as_str().to_owned(),
            Method::HEAD => BucketOperation::HeadBucket.as_str().to_owned(),
            Method::PUT => BucketOperation::CreateBucket.as_str().to_owned(),
            Method::DELETE => BucketOperation::DeleteBucket.as_str().to_owned(),
            _ => format!("{verb}Bucket"),
        },
    }
}

fn method_verb(method: &Method) -> String {
    let lower = method.as_str().to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
