//! Sub-resource router backed by an immutable operation registry.
//!
//! The registry is an ordered list of descriptors, one per sub-resource,
//! plus the base descriptor for plain bucket CRUD. It is built once at
//! startup and shared read-only; tests may build their own.

use std::sync::Arc;

use bucketgate_model::{BucketOutput, SubResource};
use futures::future::BoxFuture;
use tracing::debug;

use crate::backend::BucketBackend;
use crate::fault::{GatewayError, GatewayResult};
use crate::ops;
use crate::request::{IncomingRequest, query_has_key};

/// Future returned by every handler.
pub type HandlerFuture = BoxFuture<'static, GatewayResult<BucketOutput>>;

/// A handler entry point.
pub type HandlerFn = fn(HandlerContext, IncomingRequest) -> HandlerFuture;

/// Wrap an `async fn(HandlerContext, IncomingRequest)` as a [`HandlerFn`] table entry.
macro_rules! handler {
    ($f:path) => {{
        let handler: $crate::router::HandlerFn =
            |ctx, req| futures::FutureExt::boxed($f(ctx, req));
        Some(handler)
    }};
}

/// A table entry for an operation that is routed but not implemented.
macro_rules! stub {
    ($op:expr) => {{
        let handler: $crate::router::HandlerFn = |_, _| {
            futures::FutureExt::boxed(futures::future::ready(Err(
                $crate::fault::GatewayError::not_implemented($op.as_str()),
            )))
        };
        Some(handler)
    }};
}

pub(crate) use {handler, stub};

/// State shared by handlers: the backend, if one is configured.
#[derive(Debug, Clone, Default)]
pub struct HandlerContext {
    backend: Option<Arc<dyn BucketBackend>>,
}

impl HandlerContext {
    /// Context for the given backend; `None` selects default-configuration mode.
    #[must_use]
    pub fn new(backend: Option<Arc<dyn BucketBackend>>) -> Self {
        Self { backend }
    }

    /// The configured backend, if any.
    #[must_use]
    pub fn backend(&self) -> Option<&Arc<dyn BucketBackend>> {
        self.backend.as_ref()
    }

    /// The backend, or NotImplemented for `operation` when none is configured.
    pub fn require_backend(&self, operation: &str) -> GatewayResult<Arc<dyn BucketBackend>> {
        self.backend
            .clone()
            .ok_or_else(|| GatewayError::not_implemented(operation))
    }
}

/// Handlers for each method a sub-resource accepts.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodTable {
    /// GET handler.
    pub get: Option<HandlerFn>,
    /// PUT handler.
    pub put: Option<HandlerFn>,
    /// DELETE handler.
    pub delete: Option<HandlerFn>,
    /// HEAD handler.
    pub head: Option<HandlerFn>,
}

impl MethodTable {
    /// The handler for `method`, if the table accepts it.
    #[must_use]
    pub fn handler(&self, method: &http::Method) -> Option<HandlerFn> {
        match *method {
            http::Method::GET => self.get,
            http::Method::PUT => self.put,
            http::Method::DELETE => self.delete,
            http::Method::HEAD => self.head,
            _ => None,
        }
    }
}

/// One routable operation family.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    /// Selecting sub-resource; `None` for the base bucket operations.
    pub sub_resource: Option<SubResource>,
    /// Accepted methods.
    pub methods: MethodTable,
}

/// Ordered, read-only routing table.
#[derive(Debug, Clone)]
pub struct OperationRegistry {
    descriptors: Vec<OperationDescriptor>,
    base: OperationDescriptor,
}

impl OperationRegistry {
    /// Build a registry that scans `descriptors` in order and falls back to `base`.
    #[must_use]
    pub fn new(descriptors: Vec<OperationDescriptor>, base: OperationDescriptor) -> Self {
        Self { descriptors, base }
    }

    /// The gateway's registry: every sub-resource in [`SubResource::PRECEDENCE`]
    /// order, over the list/create/delete/head base.
    #[must_use]
    pub fn standard() -> Self {
        let descriptors = SubResource::PRECEDENCE
            .into_iter()
            .map(|sub| OperationDescriptor {
                sub_resource: Some(sub),
                methods: ops::methods_for(sub),
            })
            .collect();
        Self::new(
            descriptors,
            OperationDescriptor {
                sub_resource: None,
                methods: ops::bucket::methods(),
            },
        )
    }

    /// Select the descriptor for a query: the first registered sub-resource
    /// whose key is present wins; otherwise the base descriptor.
    #[must_use]
    pub fn resolve(&self, query: &[(String, String)]) -> &OperationDescriptor {
        let selected = self
            .descriptors
            .iter()
            .find(|d| d.sub_resource.is_some_and(|s| query_has_key(query, s.query_key())))
            .unwrap_or(&self.base);
        debug!(sub_resource = ?selected.sub_resource, "resolved bucket sub-resource");
        selected
    }

    /// Registered sub-resource descriptors in match order.
    pub fn descriptors(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.descriptors.iter()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
