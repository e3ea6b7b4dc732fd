//! Credentials and client configuration.
//!
//! The credential pair is validated once, when the client is built, and is
//! immutable afterwards. Both service clients hold the same
//! `Arc<Credentials>`.

use crate::error::{AwsError, AwsResult};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Default API revision used for EC2 requests.
pub const EC2_API_REVISION: &str = "2011-12-15";
/// Default EC2 endpoint host.
pub const EC2_HOSTNAME: &str = "ec2.amazonaws.com";
/// Default API revision used for Route 53 requests.
pub const ROUTE53_API_REVISION: &str = "2011-05-05";
/// Default Route 53 base URI (revision and action are appended).
pub const ROUTE53_BASE_URI: &str = "https://route53.amazonaws.com/";

const NO_CREDENTIALS: &str = "Amazon AWS credentials are not provided";

/// Long-term access key pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    /// Both keys must be non-empty.
    pub fn new(access_key: &str, secret_key: &str) -> AwsResult<Self> {
        if access_key.is_empty() || secret_key.is_empty() {
            return Err(AwsError::config(NO_CREDENTIALS));
        }
        Ok(Self {
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: format!("aws-lite/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Client configuration, deserialisable from `{"accessKey": .., "secretKey": ..}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    #[serde(default)]
    pub http: HttpConfig,
}

impl ClientConfig {
    pub fn new(access_key: &str, secret_key: &str) -> Self {
        Self {
            access_key: Some(access_key.to_string()),
            secret_key: Some(secret_key.to_string()),
            http: HttpConfig::default(),
        }
    }

    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Validate and extract the credential pair.
    pub fn credentials(&self) -> AwsResult<Credentials> {
        match (self.access_key.as_deref(), self.secret_key.as_deref()) {
            (Some(access), Some(secret)) => Credentials::new(access, secret),
            _ => Err(AwsError::config(NO_CREDENTIALS)),
        }
    }
}
