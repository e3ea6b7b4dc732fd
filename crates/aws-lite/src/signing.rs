//! Legacy AWS request signing.
//!
//! Two schemes are implemented, both HMAC-SHA256 with a base64 digest:
//!
//! * **Query API, signature version 2** (EC2). The string to sign is
//!
//!   ```text
//!   HTTPMethod + '\n' +
//!   lowercase(Host) + '\n' +
//!   Path + '\n' +
//!   CanonicalQueryString
//!   ```
//!
//!   where the canonical query string is every request parameter, sorted
//!   by key, RFC 3986 encoded and joined with `&`.
//!
//! * **AWS3-HTTPS** (Route 53). Only the `Date` header value is signed; the
//!   result travels in `X-Amzn-Authorization`.

use crate::config::Credentials;
use crate::error::{AwsError, AwsResult};
use crate::params::Params;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// `SignatureMethod` value for v2 requests.
pub const SIGNATURE_METHOD: &str = "HmacSHA256";
/// `SignatureVersion` value for v2 requests.
pub const SIGNATURE_VERSION: &str = "2";
/// Header carrying the AWS3-HTTPS signature.
pub const AWS3_AUTH_HEADER: &str = "X-Amzn-Authorization";

/// Everything except the RFC 3986 unreserved characters.
const RFC3986_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Signature version 2 signer for Query API requests.
#[derive(Debug, Clone, Copy)]
pub struct QuerySigner<'a> {
    credentials: &'a Credentials,
}

/// Output of [`QuerySigner::sign`].
#[derive(Debug, Clone, PartialEq)]
pub struct SignedQuery {
    /// The sorted input parameters followed by `Signature`.
    pub params: Params,
    /// The exact string that was signed.
    pub string_to_sign: String,
    /// Base64 HMAC-SHA256 of `string_to_sign`.
    pub signature: String,
}

impl<'a> QuerySigner<'a> {
    pub fn new(credentials: &'a Credentials) -> Self {
        Self { credentials }
    }

    /// Sign `params` for a request to `host` + `path`. The parameters must
    /// already include the authentication fields (`AWSAccessKeyId`,
    /// `Timestamp`, `SignatureMethod`, `SignatureVersion`).
    pub fn sign(&self, method: &str, host: &str, path: &str, params: &Params) -> AwsResult<SignedQuery> {
        let sorted = params.sorted();
        let string_to_sign = string_to_sign_v2(method, host, path, &sorted);
        let signature = hmac_sha256_base64(self.credentials.secret_key(), &string_to_sign)?;

        let mut signed = sorted;
        signed.set("Signature", signature.clone());

        Ok(SignedQuery {
            params: signed,
            string_to_sign,
            signature,
        })
    }
}

/// Build the v2 string to sign. `sorted` is encoded in the order given.
pub fn string_to_sign_v2(method: &str, host: &str, path: &str, sorted: &Params) -> String {
    [
        method.to_string(),
        host.to_lowercase(),
        path.to_string(),
        sorted.to_encoded_string(),
    ]
    .join("\n")
}

/// AWS3-HTTPS signer for Route 53 requests.
#[derive(Debug, Clone, Copy)]
pub struct Aws3Signer<'a> {
    credentials: &'a Credentials,
}

/// The two headers an AWS3-HTTPS request carries.
#[derive(Debug, Clone, PartialEq)]
pub struct Aws3Headers {
    /// Value of the `Date` header.
    pub date: String,
    /// Value of the `X-Amzn-Authorization` header.
    pub authorization: String,
}

impl<'a> Aws3Signer<'a> {
    pub fn new(credentials: &'a Credentials) -> Self {
        Self { credentials }
    }

    pub fn sign(&self, timestamp: DateTime<Utc>) -> AwsResult<Aws3Headers> {
        let date = http_date(timestamp);
        let signature = hmac_sha256_base64(self.credentials.secret_key(), &date)?;
        let authorization = format!(
            "AWS3-HTTPS AWSAccessKeyId={},Algorithm={},Signature={}",
            self.credentials.access_key(),
            SIGNATURE_METHOD,
            signature
        );
        Ok(Aws3Headers { date, authorization })
    }
}

// ── Helper functions ────────────────────────────────────────────────────

/// Base64 HMAC-SHA256 of `data` keyed with `key`.
pub fn hmac_sha256_base64(key: &str, data: &str) -> AwsResult<String> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| AwsError::Config(format!("invalid signing key: {}", e)))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// ISO 8601 with millisecond precision, e.g. `2011-12-15T10:00:00.000Z`.
pub fn iso8601(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// RFC 1123 HTTP date, e.g. `Thu, 15 Dec 2011 10:00:00 GMT`.
pub fn http_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, RFC3986_ENCODE_SET).to_string()
}
