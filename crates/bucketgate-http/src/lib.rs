//! Bucket sub-resource routing, operation handlers, error translation and the
//! hyper service of the Bucketgate gateway.
//!
//! - **Routing** ([`router`]): an ordered, read-only registry mapping the first
//!   sub-resource key present in the query (`?acl`, `?cors`, ...) to a method
//!   table, with plain bucket CRUD as the fallthrough.
//!
//! - **Handlers** (`ops`): one module per sub-resource. Each handler validates
//!   the body, makes exactly one [`BucketBackend`](backend::BucketBackend) call
//!   and returns a [`BucketOutput`](bucketgate_model::BucketOutput).
//!
//! - **Codec** ([`codec`]) and **translator** ([`translate`]): render outputs
//!   and failures as S3 responses.
//!
//! - **Service** ([`service`]): the [`GatewayService`](service::GatewayService)
//!   hyper `Service`.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> GatewayService (hyper Service)
//!     -> Health check interception
//!     -> Bucket resolution (path-style or virtual-hosted)
//!     -> Body collection, Content-MD5 / x-amz-content-sha256 checks
//!     -> Gateway: OperationRegistry::resolve -> method gate -> handler
//!       -> BucketBackend (one call, deadline-bounded)
//!     -> codec::encode or translate::error_response
//!     -> Common response headers (x-amz-request-id, Server)
//!   <- HTTP Response
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use bucketgate_http::gateway::Gateway;
//! use bucketgate_http::service::{GatewayHttpConfig, GatewayService};
//!
//! // No backend: default documents for a few GETs, NotImplemented otherwise.
//! let gateway = Gateway::with_backend(None);
//! let service = GatewayService::new(gateway, GatewayHttpConfig::default());
//! // Use `service` with hyper server.
//! ```

pub mod backend;
pub mod codec;
pub mod fault;
pub mod gateway;
mod ops;
pub mod request;
pub mod router;
pub mod service;
pub mod translate;

pub use backend::{BackendError, BackendResult, BucketBackend, ConfigKind};
pub use fault::{ClientFault, GatewayError, GatewayResult};
pub use gateway::Gateway;
pub use ops::accelerate::DEFAULT_ACCELERATE;
pub use ops::acl::DEFAULT_ACL;
pub use ops::location::DEFAULT_LOCATION;
pub use ops::logging::DEFAULT_LOGGING;
pub use ops::request_payment::DEFAULT_REQUEST_PAYMENT;
pub use ops::versioning::DEFAULT_VERSIONING;
pub use request::IncomingRequest;
pub use router::{OperationDescriptor, OperationRegistry};
pub use service::{GatewayHttpConfig, GatewayService};
