//! Gateway configuration.
//!
//! Provides [`GatewayConfig`] for configuring the Bucketgate server.
//! Configuration values are loaded from environment variables.

use std::time::Duration;

use bucketgate_http::GatewayHttpConfig;
use bucketgate_model::types::Owner;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Canonical ID of the default bucket owner.
pub const DEFAULT_OWNER_ID: &str =
    "75aa57f09aa0c8caeab4f8c24e99d10f8e7faeebf76c078efc7c6caea54ba06a";

/// Display name of the default bucket owner.
pub const DEFAULT_OWNER_DISPLAY_NAME: &str = "bucketgate";

/// Which backend serves bucket state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The in-process [`InMemoryBackend`](crate::memory::InMemoryBackend).
    #[default]
    Memory,
    /// No backend: default documents and NotImplemented.
    None,
}

impl BackendKind {
    /// Parse `memory` or `none`, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// Gateway configuration.
///
/// All fields have defaults suitable for local development. Configuration
/// can be loaded from environment variables via [`GatewayConfig::from_env`].
///
/// # Examples
///
/// ```
/// use bucketgate_core::config::GatewayConfig;
///
/// let config = GatewayConfig::default();
/// assert_eq!(config.gateway_listen, "0.0.0.0:4566");
/// assert!(!config.virtual_hosting);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Bind address (e.g. `"0.0.0.0:4566"`).
    #[builder(default = String::from("0.0.0.0:4566"))]
    pub gateway_listen: String,

    /// Backend selection.
    #[builder(default)]
    pub backend: BackendKind,

    /// Domain for virtual-hosted-style bucket resolution.
    #[builder(default = String::from("s3.localhost"))]
    pub domain: String,

    /// Whether virtual-hosted-style addressing is enabled.
    #[builder(default = false)]
    pub virtual_hosting: bool,

    /// Region of buckets created without a location constraint.
    #[builder(default = String::from("us-east-1"))]
    pub default_region: String,

    /// Backend call timeout in milliseconds; `0` disables the deadline.
    #[builder(default = 30_000)]
    pub backend_timeout_ms: u64,

    /// Largest accepted request body in bytes.
    #[builder(default = 1_048_576)]
    pub max_body_bytes: usize,

    /// Canonical ID of the account that owns created buckets.
    #[builder(default = String::from(DEFAULT_OWNER_ID))]
    pub owner_id: String,

    /// Display name of that account.
    #[builder(default = String::from(DEFAULT_OWNER_DISPLAY_NAME))]
    pub owner_display_name: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Log output format, `text` or `json`.
    #[builder(default = String::from("text"))]
    pub log_format: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:4566` |
    /// | `GATEWAY_BACKEND` | `memory` |
    /// | `GATEWAY_DOMAIN` | `s3.localhost` |
    /// | `GATEWAY_VIRTUAL_HOSTING` | `false` |
    /// | `DEFAULT_REGION` | `us-east-1` |
    /// | `BACKEND_TIMEOUT_MS` | `30000` |
    /// | `MAX_BODY_BYTES` | `1048576` |
    /// | `OWNER_ID` | built-in canonical ID |
    /// | `OWNER_DISPLAY_NAME` | `bucketgate` |
    /// | `LOG_LEVEL` | `info` |
    /// | `LOG_FORMAT` | `text` |
    ///
    /// Unparseable numeric or backend values keep the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(kind) = lookup("GATEWAY_BACKEND").and_then(|v| BackendKind::parse(&v)) {
            config.backend = kind;
        }
        if let Some(v) = lookup("GATEWAY_DOMAIN") {
            config.domain = v;
        }
        if let Some(v) = lookup("GATEWAY_VIRTUAL_HOSTING") {
            config.virtual_hosting = parse_bool(&v);
        }
        if let Some(v) = lookup("DEFAULT_REGION") {
            config.default_region = v;
        }
        if let Some(n) = lookup("BACKEND_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            config.backend_timeout_ms = n;
        }
        if let Some(n) = lookup("MAX_BODY_BYTES").and_then(|v| v.parse().ok()) {
            config.max_body_bytes = n;
        }
        if let Some(v) = lookup("OWNER_ID") {
            config.owner_id = v;
        }
        if let Some(v) = lookup("OWNER_DISPLAY_NAME") {
            config.owner_display_name = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("LOG_FORMAT") {
            config.log_format = v;
        }

        config
    }

    /// The owner of buckets created through this gateway.
    #[must_use]
    pub fn owner(&self) -> Owner {
        Owner {
            id: Some(self.owner_id.clone()),
            display_name: Some(self.owner_display_name.clone()),
        }
    }

    /// Settings for the HTTP service.
    #[must_use]
    pub fn http_config(&self) -> GatewayHttpConfig {
        GatewayHttpConfig {
            domain: self.domain.clone(),
            virtual_hosting: self.virtual_hosting,
            max_body_bytes: self.max_body_bytes,
            backend_timeout: (self.backend_timeout_ms > 0)
                .then(|| Duration::from_millis(self.backend_timeout_ms)),
        }
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_vars(vars: &[(&str, &str)]) -> GatewayConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        GatewayConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_should_create_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.gateway_listen, "0.0.0.0:4566");
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.domain, "s3.localhost");
        assert!(!config.virtual_hosting);
        assert_eq!(config.default_region, "us-east-1");
        assert_eq!(config.backend_timeout_ms, 30_000);
        assert_eq!(config.max_body_bytes, 1_048_576);
        assert_eq!(config.owner_id, DEFAULT_OWNER_ID);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, "text");
    }

    #[test]
    fn test_should_load_from_variables() {
        let config = from_vars(&[
            ("GATEWAY_LISTEN", "127.0.0.1:9000"),
            ("GATEWAY_BACKEND", "NONE"),
            ("GATEWAY_VIRTUAL_HOSTING", "1"),
            ("DEFAULT_REGION", "eu-west-1"),
            ("BACKEND_TIMEOUT_MS", "0"),
            ("MAX_BODY_BYTES", "not-a-number"),
            ("LOG_FORMAT", "json"),
        ]);
        assert_eq!(config.gateway_listen, "127.0.0.1:9000");
        assert_eq!(config.backend, BackendKind::None);
        assert!(config.virtual_hosting);
        assert_eq!(config.default_region, "eu-west-1");
        assert_eq!(config.backend_timeout_ms, 0);
        assert_eq!(config.max_body_bytes, 1_048_576);
        assert_eq!(config.log_format, "json");
    }

    #[test]
    fn test_should_ignore_unknown_backend() {
        let config = from_vars(&[("GATEWAY_BACKEND", "s3")]);
        assert_eq!(config.backend, BackendKind::Memory);
    }

    #[test]
    fn test_should_load_from_env() {
        let config = GatewayConfig::from_env();
        assert!(!config.gateway_listen.is_empty());
    }

    #[test]
    fn test_should_build_with_typed_builder() {
        let config = GatewayConfig::builder()
            .gateway_listen("127.0.0.1:9999".into())
            .backend(BackendKind::None)
            .domain("custom.domain".into())
            .virtual_hosting(true)
            .backend_timeout_ms(250)
            .build();

        assert_eq!(config.gateway_listen, "127.0.0.1:9999");
        assert_eq!(config.backend, BackendKind::None);
        assert_eq!(config.domain, "custom.domain");
        assert!(config.virtual_hosting);
        assert_eq!(config.http_config().backend_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_should_disable_deadline_with_zero_timeout() {
        let config = GatewayConfig::builder().backend_timeout_ms(0).build();
        assert_eq!(config.http_config().backend_timeout, None);
    }

    #[test]
    fn test_should_serialize_to_camel_case_json() {
        let config = GatewayConfig::default();
        let json = serde_json::to_string(&config).expect("test serialization");
        assert!(json.contains("gatewayListen"));
        assert!(json.contains("backendTimeoutMs"));
        assert!(json.contains(r#""backend":"memory""#));
    }

    #[test]
    fn test_should_parse_bool_values() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }
}
