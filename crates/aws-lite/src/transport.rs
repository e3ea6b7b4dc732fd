//! HTTP layer.
//!
//! Sends one already-signed request and reports exactly one [`Outcome`]:
//! a 2xx response (with its body parsed as XML), a non-2xx rejection, or a
//! transport error. There are no retries; timeouts are the ones configured
//! on the underlying `reqwest` client.

use crate::config::HttpConfig;
use crate::error::{AwsError, AwsResult};
use crate::params::Params;
use crate::xml::{XmlElement, XmlError};
use reqwest::{Client, Method};

/// A fully signed request, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Target URI, without the query string.
    pub url: String,
    pub headers: Params,
    /// Query parameters; `None` when there are none.
    pub query: Option<Params>,
    /// Request body; `None` when there is nothing to send.
    pub body: Option<String>,
}

impl HttpRequest {
    /// `url` plus the encoded query string, if any.
    pub fn full_url(&self) -> String {
        match self.query {
            Some(ref query) if !query.is_empty() => {
                let sep = if self.url.contains('?') { '&' } else { '?' };
                format!("{}{}{}", self.url, sep, query.to_encoded_string())
            }
            _ => self.url.clone(),
        }
    }
}

/// A non-2xx response.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub status: u16,
    /// The parsed body, when it was well-formed XML.
    pub document: Option<XmlElement>,
    /// The raw body text.
    pub raw: String,
}

impl Failure {
    /// `RequestID` (EC2) or `RequestId` (Route 53) from the body.
    pub fn request_id(&self) -> Option<String> {
        let doc = self.document.as_ref()?;
        doc.child_text("RequestID")
            .or_else(|| doc.child_text("RequestId"))
            .map(str::to_string)
    }
}

/// The single result of issuing a request.
#[derive(Debug)]
pub enum Outcome {
    /// 2xx response; the body may still fail to parse.
    Success {
        status: u16,
        body: Result<XmlElement, XmlError>,
    },
    /// The service rejected the request.
    Fail(Failure),
    /// The request never produced a readable response.
    Error(reqwest::Error),
}

/// Shared HTTP client.
#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
}

impl Transport {
    pub fn new(config: &HttpConfig) -> AwsResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AwsError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http })
    }

    /// Issue the request and classify what came back.
    pub async fn execute(&self, request: HttpRequest) -> Outcome {
        let url = request.full_url();
        let mut req = self.http.request(request.method.clone(), &url);
        for (key, value) in request.headers.iter() {
            req = req.header(key, value);
        }
        if let Some(body) = request.body {
            req = req.body(body);
        }

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => return Outcome::Error(e),
        };
        let status = resp.status();
        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => return Outcome::Error(e),
        };

        if status.is_success() {
            Outcome::Success {
                status: status.as_u16(),
                body: XmlElement::parse(&text),
            }
        } else {
            Outcome::Fail(Failure {
                status: status.as_u16(),
                document: XmlElement::parse(&text).ok(),
                raw: text,
            })
        }
    }
}
