//! Configuration and the in-memory bucket backend for Bucketgate.
//!
//! - [`config`]: [`GatewayConfig`](config::GatewayConfig), loaded from the
//!   environment.
//! - [`memory`]: [`InMemoryBackend`](memory::InMemoryBackend), a
//!   [`BucketBackend`](bucketgate_http::BucketBackend) keeping buckets in a
//!   `DashMap`.
//! - [`state`]: per-bucket records and object listing.
//!
//! [`build_gateway`] wires the two together.

pub mod config;
pub mod memory;
pub mod state;

use std::sync::Arc;

use bucketgate_http::{BucketBackend, Gateway};
use tracing::info;

use crate::config::{BackendKind, GatewayConfig};
use crate::memory::InMemoryBackend;

/// Build a gateway over the backend `config` selects.
#[must_use]
pub fn build_gateway(config: &GatewayConfig) -> Gateway {
    let backend: Option<Arc<dyn BucketBackend>> = match config.backend {
        BackendKind::Memory => Some(Arc::new(InMemoryBackend::new(
            config.owner(),
            config.default_region.clone(),
        ))),
        BackendKind::None => None,
    };
    info!(backend = ?config.backend, "bucket backend selected");
    Gateway::with_backend(backend)
}
