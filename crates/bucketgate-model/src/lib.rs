//! Data model for the Bucketgate S3 bucket-configuration gateway.
//!
//! Holds the configuration documents, the typed backend inputs and outputs,
//! the sub-resource table and the S3 error codes. Nothing here performs I/O.
#![allow(missing_docs)]

pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod subresource;
pub mod types;

pub use error::{S3Error, S3ErrorCode};
pub use operations::{BucketOperation, operation_name};
pub use output::BucketOutput;
pub use subresource::SubResource;
