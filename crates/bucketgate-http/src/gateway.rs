//! The request pipeline: resolve, gate on method, run the handler, render.

use std::sync::Arc;

use bucketgate_model::{BucketOutput, S3Error, operation_name};
use bytes::Bytes;
use http_body_util::Full;
use tracing::{debug, error};

use crate::backend::BucketBackend;
use crate::codec;
use crate::fault::{ClientFault, GatewayResult};
use crate::request::IncomingRequest;
use crate::router::{HandlerContext, OperationRegistry};
use crate::translate::{XML_CONTENT_TYPE, error_response, render_error};

/// Serves bucket-level requests against an optional backend.
#[derive(Debug, Clone)]
pub struct Gateway {
    registry: Arc<OperationRegistry>,
    context: HandlerContext,
}

impl Gateway {
    /// A gateway over `registry`. Without a backend, GETs with a default
    /// document return it and every other operation is NotImplemented.
    #[must_use]
    pub fn new(registry: Arc<OperationRegistry>, backend: Option<Arc<dyn BucketBackend>>) -> Self {
        Self {
            registry,
            context: HandlerContext::new(backend),
        }
    }

    /// A gateway over the standard registry.
    #[must_use]
    pub fn with_backend(backend: Option<Arc<dyn BucketBackend>>) -> Self {
        Self::new(Arc::new(OperationRegistry::standard()), backend)
    }

    /// Resolve and run the handler for `req`, without rendering.
    pub async fn execute(&self, req: IncomingRequest) -> GatewayResult<BucketOutput> {
        let descriptor = self.registry.resolve(&req.query);
        let Some(handler) = descriptor.methods.handler(&req.method) else {
            let operation = operation_name(&req.method, descriptor.sub_resource);
            return Err(ClientFault::UnsupportedMethod { operation }.into());
        };
        debug!(
            method = %req.method,
            bucket = %req.bucket,
            request_id = %req.request_id,
            sub_resource = ?descriptor.sub_resource,
            "dispatching bucket request"
        );
        handler(self.context.clone(), req).await
    }

    /// Serve `req`, producing exactly one response.
    pub async fn handle(&self, req: IncomingRequest) -> http::Response<Full<Bytes>> {
        let bucket = req.bucket.clone();
        let request_id = req.request_id.clone();
        let is_head = req.method == http::Method::HEAD;

        let response = match self.execute(req).await {
            Ok(output) => codec::encode(output).unwrap_or_else(|err| {
                error!(%bucket, %request_id, error = %err, "failed to serialize response");
                let s3_error = S3Error::internal_error("Failed to serialize response")
                    .with_resource(format!("/{bucket}"))
                    .with_request_id(request_id.as_str());
                render_error(&s3_error, XML_CONTENT_TYPE)
            }),
            Err(err) => error_response(&err, &bucket, &request_id),
        };

        if is_head {
            let (parts, _) = response.into_parts();
            return http::Response::from_parts(parts, Full::new(Bytes::new()));
        }
        response
    }
}
