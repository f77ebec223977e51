//! HTTP collaborator used by [`Client`](crate::Client) to issue the signed GET.

use http::StatusCode;
use url::Url;

use crate::error::{Error, Result};

mod blocking_transport;

pub use blocking_transport::BlockingTransport;

/// Status and body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Issues GET requests on behalf of the client.
///
/// Implementations return non-success statuses as responses; `Err` is reserved
/// for failures where no response was received.
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, url: &Url) -> Result<HttpResponse> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn get(&self, url: &Url) -> Result<HttpResponse> {
        (**self).get(url)
    }
}

pub(crate) fn response_error(status: StatusCode, body: &str) -> Error {
    let snippet = crate::util::text::truncate_snippet(body, 4096);

    match crate::util::xml::parse_error_xml(body) {
        Some(parsed) => Error::Api {
            status,
            code: parsed.code,
            message: parsed.message,
            request_id: parsed.request_id,
            body_snippet: Some(snippet),
        },
        None => Error::Api {
            status,
            code: None,
            message: None,
            request_id: None,
            body_snippet: Some(snippet),
        },
    }
}
