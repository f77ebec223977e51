//! A lean signed query-API client for EC2.
//!
//! Builds a signature-version-2 GET request, sends it over a blocking HTTP
//! transport, and converts the XML response into the configured format.
//!
//! ## Quick start
//!
//! ```no_run
//! # fn demo() -> Result<(), ec2_query::Error> {
//! use ec2_query::{Client, ResponseValue};
//!
//! let mut client = Client::builder("AKIDEXAMPLE", "secret")
//!     .region("eu-west-1")
//!     .use_tls(true)
//!     .return_format("structured")
//!     .build()?;
//!
//! client.set_action("DescribeRegions");
//! if let Some(ResponseValue::Structured(value)) = client.execute() {
//!     println!("{}", value["regionInfo"]);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`Client::execute`] reports every failure as `None`. Use [`Client::send`]
//! to get the underlying [`Error`].

/// Shared request/response types.
pub mod types;

mod auth;
mod client;
mod error;
mod format;
mod transport;
mod util;

pub use auth::{Credentials, DEFAULT_REGION, REGIONS, Region};
pub use client::{
    API_VERSION, BASE_HOST, Client, ClientBuilder, ClientConfig, DEFAULT_ACTION, SERVICE,
};
pub use error::{Error, Result};
pub use format::ReturnFormat;
pub use transport::{BlockingTransport, HttpResponse, Transport};
pub use types::{Endpoint, ResponseValue, SignedParams};

/// Signs `params` for a GET to `host` with `secret_key`.
///
/// Keys are sorted in byte order and both keys and values are percent-encoded
/// with the RFC 3986 unreserved set before hashing
/// `GET\n<host>\n/\n<canonical query>` with HMAC-SHA256. The result is the
/// base64 digest. `params` must not include `Signature`.
pub fn sign(
    params: &std::collections::BTreeMap<String, String>,
    secret_key: &str,
    host: &str,
) -> Result<String> {
    util::signing::sign(params, secret_key, host)
}

/// Canonical query string for `params`, as signed by [`sign`].
pub fn canonical_query_string(params: &std::collections::BTreeMap<String, String>) -> String {
    util::encode::canonical_query_string(params)
}
