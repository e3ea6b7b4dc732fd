//! AWS Route 53 request builder.
//!
//! Route 53 is a REST+XML service with a single global endpoint. Requests go
//! to `{base_uri}{api_revision}/{action}` and are authenticated with the
//! AWS3-HTTPS scheme: an HMAC of the `Date` header carried in
//! `X-Amzn-Authorization`.
//!
//! Reference: <https://docs.aws.amazon.com/Route53/latest/APIReference/>

use crate::config::{Credentials, ROUTE53_API_REVISION, ROUTE53_BASE_URI};
use crate::error::{AwsError, AwsResult};
use crate::params::Params;
use crate::request::{spawn_with_callback, RequestOptions};
use crate::signing::{Aws3Signer, AWS3_AUTH_HEADER};
use crate::transport::{Failure, HttpRequest, Outcome, Transport};
use crate::xml::{self, XmlElement};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;

const SERVICE: &str = "Route53";

/// Route 53 sub-client. Cheap to clone; shares credentials with its parent.
#[derive(Debug, Clone)]
pub struct Route53Client {
    credentials: Arc<Credentials>,
    transport: Transport,
}

impl Route53Client {
    pub(crate) fn new(credentials: Arc<Credentials>, transport: Transport) -> Self {
        Self { credentials, transport }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Issue a request and deliver the result to `opts.callback`.
    ///
    /// A missing `callback` fails here, before anything is sent. `action` is
    /// not checked; see [`Route53Client::prepare`].
    pub fn request(&self, mut opts: RequestOptions) -> AwsResult<JoinHandle<()>> {
        let callback = opts
            .callback
            .take()
            .ok_or_else(|| AwsError::usage("No success callback defined"))?;
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
    ///
    /// Caller headers are discarded: the request carries exactly `Date` and
    /// `X-Amzn-Authorization`. A missing `action` leaves the path ending in
    /// `/` rather than failing.
    pub fn prepare(&self, opts: &RequestOptions, timestamp: DateTime<Utc>) -> AwsResult<HttpRequest> {
        let api_revision = opts.api_revision.as_deref().unwrap_or(ROUTE53_API_REVISION);
        let base_uri = opts.base_uri.as_deref().unwrap_or(ROUTE53_BASE_URI);
        let action = match opts.action.as_deref() {
            Some(action) => action,
            None => {
                log::warn!("Route53 request has no action; path will end at the API revision");
                ""
            }
        };
        let full_uri = format!("{}{}/{}", base_uri, api_revision, action);
        let method = opts.method.clone().unwrap_or(Method::GET);

        let signed = Aws3Signer::new(&self.credentials).sign(timestamp)?;
        let headers = Params::new()
            .with("Date", signed.date)
            .with(AWS3_AUTH_HEADER, signed.authorization);
        if opts.headers.is_some() {
            log::debug!("Route53 ignores caller-supplied headers");
        }

        let body = match (&opts.xml_body, opts.data.is_empty()) {
            (Some(doc), _) => Some(doc.to_document()),
            (None, false) => Some(xml::dump_params(&opts.data)),
            (None, true) => None,
        }
        .transpose()
        .map_err(|e| AwsError::Usage(format!("Route53 request body could not be written: {}", e)))?;

        log::debug!("Route53 {} {}", method, full_uri);

        Ok(HttpRequest {
            method,
            url: full_uri,
            headers,
            query: (!opts.query.is_empty()).then(|| opts.query.clone()),
            body,
        })
    }
}

/// Collapse a transport outcome into the single result the caller sees.
pub fn classify(outcome: Outcome) -> AwsResult<XmlElement> {
    match outcome {
        Outcome::Success { status, body: Ok(doc) } => {
            log::debug!("Route53 request succeeded (HTTP {})", status);
            Ok(doc)
        }
        Outcome::Success { status, body: Err(e) } => {
            log::warn!("Route53 returned HTTP {} with an unreadable body: {}", status, e);
            Err(AwsError::InvalidResponse {
                service: SERVICE,
                message: e.to_string(),
            })
        }
        Outcome::Error(e) => {
            log::warn!("Route53 transport error: {}", e);
            Err(AwsError::Transport(e))
        }
        Outcome::Fail(failure) => {
            let err = failure_error(&failure);
            log::warn!("Route53 request failed (HTTP {})", failure.status);
            Err(err)
        }
    }
}

/// JSON of the whole failure body: its XML projection when it parsed,
/// otherwise the raw text as a JSON string.
fn failure_error(failure: &Failure) -> AwsError {
    let payload = match failure.document {
        Some(ref doc) => doc.to_json(),
        None => Value::String(failure.raw.clone()),
    };
    AwsError::Api {
        service: SERVICE,
        status: failure.status,
        request_id: failure.request_id(),
        message: format!("[{}] {}", SERVICE, payload),
    }
}
