use std::fmt;

/// Service name embedded in the endpoint hostname.
pub const SERVICE: &str = "ec2";
/// Domain every regional endpoint lives under.
pub const BASE_HOST: &str = "amazonaws.com";
/// Query API version sent as `Version`.
pub const API_VERSION: &str = "2016-11-15";
/// Action used when none is configured.
pub const DEFAULT_ACTION: &str = "DescribeInstances";

/// Construction-time settings for a [`Client`](crate::Client).
///
/// Unset optional fields take their defaults when the client is built; region,
/// return format and signature settings are validated at that point.
#[derive(Clone, Default)]
pub struct ClientConfig {
    pub access_key: String,
    pub secret_key: String,
    /// Defaults to [`DEFAULT_REGION`](crate::DEFAULT_REGION).
    pub region: Option<String>,
    /// Defaults to [`DEFAULT_ACTION`].
    pub action: Option<String>,
    pub use_tls: bool,
    /// One of `xml`, `json`, `structured` (`perl`), `raw`. Defaults to `json`.
    pub return_format: Option<String>,
    /// Only `HmacSHA256` is accepted.
    pub signature_method: Option<String>,
    /// Only `2` is accepted.
    pub signature_version: Option<u32>,
    pub api_version: Option<String>,
}

impl ClientConfig {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field(
                "access_key",
                &crate::util::text::redact_value(&self.access_key),
            )
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("action", &self.action)
            .field("use_tls", &self.use_tls)
            .field("return_format", &self.return_format)
            .field("signature_method", &self.signature_method)
            .field("signature_version", &self.signature_version)
            .field("api_version", &self.api_version)
            .finish()
    }
}
