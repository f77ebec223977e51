use std::{io::Read as _, time::Duration};

#[cfg(feature = "metrics")]
use std::time::Instant;

use url::Url;

use crate::{
    error::{Error, Result},
    transport::{HttpResponse, Transport},
};

/// Default [`Transport`] backed by a `ureq` agent.
///
/// Sends one attempt per call. Without an explicit timeout the agent's own
/// defaults apply.
pub struct BlockingTransport {
    agent: ureq::Agent,
    timeout: Option<Duration>,
    user_agent: String,
}

impl BlockingTransport {
    pub fn new(user_agent: Option<String>, timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();

        Self {
            agent: ureq::Agent::new_with_config(config),
            timeout,
            user_agent: user_agent.unwrap_or_else(default_user_agent),
        }
    }
}

impl Default for BlockingTransport {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl std::fmt::Debug for BlockingTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingTransport")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl Transport for BlockingTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse> {
        #[cfg(feature = "tracing")]
        let _guard = tracing::debug_span!(
            "ec2.http",
            host = url.host_str().unwrap_or(""),
            scheme = url.scheme(),
        )
        .entered();
        #[cfg(feature = "metrics")]
        let start = Instant::now();

        let mut req = self
            .agent
            .get(url.as_str())
            .header(http::header::USER_AGENT, self.user_agent.as_str());
        if let Some(timeout) = self.timeout {
            req = req.config().timeout_global(Some(timeout)).build();
        }

        let resp = req.call().map_err(|err| {
            #[cfg(feature = "metrics")]
            metrics::counter!("ec2_query_errors_total", "kind" => "transport")
                .increment(1);

            Error::transport(
                format!("request failed: GET {}", request_context(url)),
                Some(Box::new(err)),
            )
        })?;

        let status = resp.status();
        let body = read_body_string(resp.into_body())?;

        #[cfg(feature = "metrics")]
        {
            metrics::counter!("ec2_query_responses_total", "class" => status_class(status))
                .increment(1);
            metrics::histogram!("ec2_query_request_duration_seconds")
                .record(start.elapsed().as_secs_f64());
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(status = %status, bytes = body.len(), "received response");

        Ok(HttpResponse { status, body })
    }
}

fn read_body_string(body: ureq::Body) -> Result<String> {
    let mut out = Vec::new();
    body.into_reader()
        .read_to_end(&mut out)
        .map_err(|e| Error::transport("failed to read response body", Some(Box::new(e))))?;
    String::from_utf8(out)
        .map_err(|e| Error::decode("response body is not valid UTF-8", Some(Box::new(e))))
}

// Host and path only; the query carries the signature.
fn request_context(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}{}", url.path()),
        (Some(host), None) => format!("{host}{}", url.path()),
        (None, _) => url.path().to_string(),
    }
}

#[cfg(feature = "metrics")]
fn status_class(status: http::StatusCode) -> &'static str {
    if status.is_success() {
        "2xx"
    } else if status.is_redirection() {
        "3xx"
    } else if status.is_client_error() {
        "4xx"
    } else if status.is_server_error() {
        "5xx"
    } else {
        "other"
    }
}

fn default_user_agent() -> String {
    format!("ec2-query/{}", env!("CARGO_PKG_VERSION"))
}
