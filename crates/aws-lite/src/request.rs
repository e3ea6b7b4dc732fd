//! Per-call request options and callback delivery.

use crate::error::{AwsError, AwsResult};
use crate::params::Params;
use crate::xml::XmlElement;
use reqwest::Method;
use std::fmt;
use std::future::Future;
use tokio::task::JoinHandle;

/// Receives the result of a request exactly once.
pub type Callback = Box<dyn FnOnce(AwsResult<XmlElement>) + Send + 'static>;

/// Options for a single EC2 or Route 53 call. Every field except `action`
/// (EC2) and `callback` (callback-style calls) falls back to a per-service
/// default when left unset.
#[derive(Default)]
pub struct RequestOptions {
    /// API action, e.g. `RunInstances` or `hostedzone`.
    pub action: Option<String>,
    pub method: Option<Method>,
    pub query: Params,
    pub data: Params,
    /// Replaces the default headers wholesale (EC2 only).
    pub headers: Option<Params>,
    pub api_revision: Option<String>,
    /// Host used in the EC2 signature and default base URI.
    pub hostname: Option<String>,
    pub base_uri: Option<String>,
    /// Structured Route 53 body; takes precedence over `data`.
    pub xml_body: Option<XmlElement>,
    pub callback: Option<Callback>,
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("action", &self.action)
            .field("method", &self.method)
            .field("query", &self.query)
            .field("data", &self.data)
            .field("headers", &self.headers)
            .field("api_revision", &self.api_revision)
            .field("hostname", &self.hostname)
            .field("base_uri", &self.base_uri)
            .field("xml_body", &self.xml_body)
            .field("callback", &self.callback.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl RequestOptions {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Self::default()
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.set(key, value);
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.set(key, value);
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.get_or_insert_with(Params::new).set(key, value);
        self
    }

    pub fn api_revision(mut self, revision: impl Into<String>) -> Self {
        self.api_revision = Some(revision.into());
        self
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    pub fn xml_body(mut self, body: XmlElement) -> Self {
        self.xml_body = Some(body);
        self
    }

    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(AwsResult<XmlElement>) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }
}

/// Run `work` on the current tokio runtime and hand its result to
/// `callback`. Fails without spawning anything when no runtime is active.
pub(crate) fn spawn_with_callback<F>(work: F, callback: Callback) -> AwsResult<JoinHandle<()>>
where
    F: Future<Output = AwsResult<XmlElement>> + Send + 'static,
{
    let handle = tokio::runtime::Handle::try_current()
        .map_err(|_| AwsError::usage("No async runtime available to issue the request"))?;
    Ok(handle.spawn(async move { callback(work.await) }))
}
