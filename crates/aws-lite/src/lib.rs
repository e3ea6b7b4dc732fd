//! # aws-lite – minimal EC2 and Route 53 client
//!
//! Builds signed requests for two AWS APIs using their legacy signing
//! schemes, sends them with `reqwest`, and collapses every outcome into one
//! `AwsResult<XmlElement>`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │  AwsClient  (client.rs)                          │
//! │  ├── Arc<Credentials>  (validated once)          │
//! │  ├── Ec2Client      (ec2.rs)                     │
//! │  └── Route53Client  (route53.rs)                 │
//! ├──────────────────────────────────────────────────┤
//! │  RequestOptions / Callback  (request.rs)         │
//! ├──────────────────────────────────────────────────┤
//! │  QuerySigner (v2) · Aws3Signer  (signing.rs)     │
//! ├──────────────────────────────────────────────────┤
//! │  Transport → Outcome  (transport.rs)             │
//! │  XmlElement  (xml.rs)                            │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Signing schemes
//!
//! | Service  | Scheme                | Signed material                      |
//! |----------|-----------------------|--------------------------------------|
//! | EC2      | Query API, version 2  | method, host, path, sorted params    |
//! | Route 53 | AWS3-HTTPS            | the `Date` header only               |
//!
//! ## Example
//!
//! ```no_run
//! use aws_lite::{AwsClient, RequestOptions};
//!
//! # async fn run() -> aws_lite::AwsResult<()> {
//! let client = AwsClient::with_credentials("AKIDEXAMPLE", "secret")?;
//!
//! let reservations = client
//!     .ec2()
//!     .send(RequestOptions::new("DescribeInstances").data("InstanceId.1", "i-1234"))
//!     .await?;
//! println!("{:?}", reservations.child("reservationSet"));
//!
//! client.route53().request(
//!     RequestOptions::new("hostedzone").callback(|result| match result {
//!         Ok(zones) => println!("{}", zones.to_json()),
//!         Err(e) => eprintln!("{}", e),
//!     }),
//! )?;
//! # Ok(())
//! # }
//! ```

// ── Sub-modules ─────────────────────────────────────────────────────────

pub mod error;
pub mod config;
pub mod params;
pub mod xml;
pub mod signing;
pub mod transport;
pub mod request;

// Service builders
pub mod ec2;
pub mod route53;

pub mod client;

// ── Re-exports for ergonomic access ─────────────────────────────────────

pub use client::AwsClient;
pub use config::{ClientConfig, Credentials, HttpConfig};
pub use ec2::Ec2Client;
pub use error::{AwsError, AwsResult};
pub use params::Params;
pub use request::{Callback, RequestOptions};
pub use route53::Route53Client;
pub use xml::{XmlElement, XmlError};
