//! Amazon EC2 request builder.
//!
//! EC2 uses the Query API: every call is a form-encoded POST to the service
//! root, authenticated with a signature version 2 `Signature` parameter.
//!
//! Reference: <https://docs.aws.amazon.com/AWSEC2/latest/APIReference/Query-Requests.html>

use crate::config::{Credentials, EC2_API_REVISION, EC2_HOSTNAME};
use crate::error::{AwsError, AwsResult};
use crate::params::Params;
use crate::request::{spawn_with_callback, RequestOptions};
use crate::signing::{self, QuerySigner, SIGNATURE_METHOD, SIGNATURE_VERSION};
use crate::transport::{Failure, HttpRequest, Outcome, Transport};
use crate::xml::XmlElement;
use chrono::{DateTime, Utc};
use reqwest::Method;
use std::sync::Arc;
use tokio::task::JoinHandle;

const SERVICE: &str = "EC2";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// EC2 sub-client. Cheap to clone; shares credentials with its parent.
#[derive(Debug, Clone)]
pub struct Ec2Client {
    credentials: Arc<Credentials>,
    transport: Transport,
}

impl Ec2Client {
    pub(crate) fn new(credentials: Arc<Credentials>, transport: Transport) -> Self {
        Self { credentials, transport }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Issue a request and deliver the result to `opts.callback`.
    ///
    /// Missing `callback` or `action` fail here, before anything is sent.
    /// Otherwise the request is signed now and sent from a spawned task; the
    /// returned handle completes after the callback has run.
    pub fn request(&self, mut opts: RequestOptions) -> AwsResult<JoinHandle<()>> {
        let callback = opts
            .callback
            .take()
            .ok_or_else(|| AwsError::usage("No callback defined"))?;
        let prepared = self.prepare(&opts, Utc::now())?;
        let transport = self.transport.clone();
        spawn_with_callback(
            async move { classify(transport.execute(prepared).await) },
            callback,
        )
    }

    /// Issue a request and return the parsed response. Any callback in
    /// `opts` is ignored.
    pub async fn send(&self, opts: RequestOptions) -> AwsResult<XmlElement> {
        let prepared = self.prepare(&opts, Utc::now())?;
        classify(self.transport.execute(prepared).await)
    }

    /// Build the signed request for `opts` as of `timestamp`.
    pub fn prepare(&self, opts: &RequestOptions, timestamp: DateTime<Utc>) -> AwsResult<HttpRequest> {
        let action = opts
            .action
            .as_deref()
            .ok_or_else(|| AwsError::usage("No EC2 action defined"))?;

        let api_revision = opts.api_revision.as_deref().unwrap_or(EC2_API_REVISION);
        let hostname = opts.hostname.as_deref().unwrap_or(EC2_HOSTNAME);
        let base_uri = opts
            .base_uri
            .clone()
            .unwrap_or_else(|| format!("https://{}", hostname));
        let headers = opts
            .headers
            .clone()
            .unwrap_or_else(|| Params::new().with("Content-type", FORM_CONTENT_TYPE));
        let method = opts.method.clone().unwrap_or(Method::POST);

        let mut data = opts.data.clone();
        data.set("Action", action);
        data.set("Version", api_revision);
        data.set("AWSAccessKeyId", self.credentials.access_key());
        data.set("Timestamp", signing::iso8601(timestamp));
        data.set("SignatureMethod", SIGNATURE_METHOD);
        data.set("SignatureVersion", SIGNATURE_VERSION);

        let signed = QuerySigner::new(&self.credentials).sign(method.as_str(), hostname, "/", &data)?;

        log::debug!("EC2 {} {} {}", method, base_uri, action);

        Ok(HttpRequest {
            method,
            url: base_uri,
            headers,
            query: (!opts.query.is_empty()).then(|| opts.query.clone()),
            body: (!signed.params.is_empty()).then(|| signed.params.to_encoded_string()),
        })
    }
}

/// Collapse a transport outcome into the single result the caller sees.
pub fn classify(outcome: Outcome) -> AwsResult<XmlElement> {
    match outcome {
        Outcome::Success { status, body: Ok(doc) } => {
            log::debug!("EC2 request succeeded (HTTP {})", status);
            Ok(doc)
        }
        Outcome::Success { status, body: Err(e) } => {
            log::warn!("EC2 returned HTTP {} with an unreadable body: {}", status, e);
            Err(AwsError::InvalidResponse {
                service: SERVICE,
                message: e.to_string(),
            })
        }
        Outcome::Error(e) => {
            log::warn!("EC2 transport error: {}", e);
            Err(AwsError::Transport(e))
        }
        Outcome::Fail(failure) => {
            let err = failure_error(&failure);
            log::warn!("EC2 request failed (HTTP {}): {}", failure.status, err);
            Err(err)
        }
    }
}

/// Every `Errors/Error/Message` in the failure body, in document order.
pub fn error_messages(doc: &XmlElement) -> Vec<String> {
    doc.find_all("Errors")
        .into_iter()
        .flat_map(|errors| errors.children_named("Error"))
        .filter_map(|error| error.child_text("Message"))
        .map(str::to_string)
        .collect()
}

fn failure_error(failure: &Failure) -> AwsError {
    let messages = failure
        .document
        .as_ref()
        .map(error_messages)
        .unwrap_or_default();
    let detail = if messages.is_empty() {
        format!("HTTP {}", failure.status)
    } else {
        messages.join(" ")
    };
    AwsError::Api {
        service: SERVICE,
        status: failure.status,
        request_id: failure.request_id(),
        message: format!("[{}] {}", SERVICE, detail),
    }
}
