use std::{collections::BTreeMap, fmt, time::Duration};

use time::OffsetDateTime;
use url::Url;

use crate::{
    auth::{Credentials, Region},
    client::config::{API_VERSION, BASE_HOST, ClientConfig, DEFAULT_ACTION, SERVICE},
    error::{Error, Result},
    format::ReturnFormat,
    transport::{self, BlockingTransport, Transport},
    types::{Endpoint, ResponseValue, SignedParams},
    util,
};

/// Signed query-API client. Owns its configuration; setters validate before
/// replacing a value.
pub struct Client {
    credentials: Credentials,
    region: Region,
    action: String,
    return_format: ReturnFormat,
    use_tls: bool,
    api_version: String,
    transport: Box<dyn Transport>,
}

/// Chainable construction of a [`Client`] over a [`ClientConfig`].
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Box<dyn Transport>>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// The signer only produces version 2 HmacSHA256 signatures.
fn check_signature_settings(method: Option<&str>, version: Option<u32>) -> Result<()> {
    if let Some(method) = method.filter(|m| m.trim() != util::signing::SIGNATURE_METHOD) {
        return Err(Error::configuration(format!(
            "signature method must be {}: {method}",
            util::signing::SIGNATURE_METHOD
        )));
    }
    if let Some(version) = version.filter(|v| *v != util::signing::SIGNATURE_VERSION) {
        return Err(Error::configuration(format!(
            "signature version must be {}: {version}",
            util::signing::SIGNATURE_VERSION
        )));
    }
    Ok(())
}

impl Client {
    /// Validates `config` and builds a client over the default `ureq` transport.
    ///
    /// Fails on empty credentials, an unknown region, an unknown return format
    /// or signature settings other than version 2 `HmacSHA256`. No request is
    /// made.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::from_parts(config, Box::new(BlockingTransport::default()))
    }

    /// Same as [`Client::new`] with a caller-supplied HTTP collaborator.
    pub fn with_transport(
        config: ClientConfig,
        transport: impl Transport + 'static,
    ) -> Result<Self> {
        Self::from_parts(config, Box::new(transport))
    }

    /// Starts a builder with the given key pair; everything else takes its default.
    pub fn builder(access_key: impl Into<String>, secret_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            config: ClientConfig::new(access_key, secret_key),
            transport: None,
            timeout: None,
            user_agent: None,
        }
    }

    fn from_parts(config: ClientConfig, transport: Box<dyn Transport>) -> Result<Self> {
        let credentials = Credentials::new(config.access_key, config.secret_key)?;
        check_signature_settings(
            non_empty(config.signature_method).as_deref(),
            config.signature_version,
        )?;

        let mut client = Self {
            credentials,
            region: Region::default(),
            action: non_empty(config.action)
                .unwrap_or_else(|| DEFAULT_ACTION.to_string()),
            return_format: ReturnFormat::default(),
            use_tls: config.use_tls,
            api_version: non_empty(config.api_version)
                .unwrap_or_else(|| API_VERSION.to_string()),
            transport,
        };

        if let Some(region) = non_empty(config.region) {
            client.set_region(region)?;
        }
        if let Some(format) = non_empty(config.return_format) {
            client.set_return_format(format)?;
        }

        Ok(client)
    }

    /// Replaces the region if it is in [`REGIONS`](crate::REGIONS).
    pub fn set_region(&mut self, region: impl AsRef<str>) -> Result<()> {
        self.region = Region::new(region)?;
        Ok(())
    }

    /// Replaces the return format; names are matched case-insensitively.
    pub fn set_return_format(&mut self, format: impl AsRef<str>) -> Result<()> {
        self.return_format = format.as_ref().parse()?;
        Ok(())
    }

    /// Replaces the action. Action names are passed through unchecked.
    pub fn set_action(&mut self, action: impl Into<String>) {
        self.action = action.into();
    }

    /// Returns the target region.
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Returns the format successful responses are converted to.
    pub fn return_format(&self) -> ReturnFormat {
        self.return_format
    }

    /// Returns the action sent as `Action`.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns the access key sent as `AWSAccessKeyId`.
    pub fn access_key(&self) -> &str {
        &self.credentials.access_key_id
    }

    /// Returns the API version sent as `Version`.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Returns `https` when TLS is enabled, `http` otherwise.
    pub fn scheme(&self) -> &'static str {
        self.endpoint().scheme
    }

    /// Returns the regional endpoint requests are sent to.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.use_tls, self.region.as_str(), SERVICE, BASE_HOST)
    }

    /// Builds the parameter set for a request issued at `now` and signs it.
    pub fn signed_params(&self, now: OffsetDateTime) -> Result<SignedParams> {
        let mut params = BTreeMap::new();
        params.insert(
            "AWSAccessKeyId".to_string(),
            self.credentials.access_key_id.clone(),
        );
        params.insert("Action".to_string(), self.action.clone());
        params.insert(
            "SignatureMethod".to_string(),
            util::signing::SIGNATURE_METHOD.to_string(),
        );
        params.insert(
            "SignatureVersion".to_string(),
            util::signing::SIGNATURE_VERSION.to_string(),
        );
        params.insert("Timestamp".to_string(), util::signing::timestamp(now));
        params.insert("Version".to_string(), self.api_version.clone());

        let host = self.endpoint().host;
        let signature = util::signing::sign(&params, &self.credentials.secret_access_key, &host)?;
        Ok(SignedParams::new(params, signature))
    }

    /// Full signed request URL for a request issued at `now`.
    pub fn request_url(&self, now: OffsetDateTime) -> Result<Url> {
        let params = self.signed_params(now)?;
        let endpoint = self.endpoint();
        Url::parse(&format!("{}?{}", endpoint.url(), params.query_string()))
            .map_err(|_| Error::configuration("failed to build request URL"))
    }

    /// Signs and sends the configured action, converting the response body.
    ///
    /// Non-success statuses become [`Error::Api`], failures without a response
    /// [`Error::Transport`], unparseable XML [`Error::Decode`].
    pub fn send(&self) -> Result<ResponseValue> {
        let url = self.request_url(OffsetDateTime::now_utc())?;

        #[cfg(feature = "tracing")]
        let _guard = tracing::info_span!(
            "ec2.request",
            action = %self.action,
            region = %self.region,
            host = url.host_str().unwrap_or(""),
        )
        .entered();
        #[cfg(feature = "metrics")]
        metrics::counter!("ec2_query_requests_total", "action" => self.action.clone())
            .increment(1);

        let resp = self.transport.get(&url)?;
        if !resp.status.is_success() {
            return Err(transport::response_error(resp.status, &resp.body));
        }

        ResponseValue::from_xml(self.return_format, resp.body)
    }

    /// Like [`Client::send`], but any failure yields `None`.
    pub fn execute(&self) -> Option<ResponseValue> {
        match self.send() {
            Ok(value) => Some(value),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, action = %self.action, "request returned no data");
                None
            }
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("credentials", &self.credentials)
            .field("region", &self.region)
            .field("action", &self.action)
            .field("return_format", &self.return_format)
            .field("use_tls", &self.use_tls)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    /// Sets the region; validated by [`ClientBuilder::build`].
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.region = Some(region.into());
        self
    }

    /// Sets the action.
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.config.action = Some(action.into());
        self
    }

    /// Selects `https` (`true`) or `http` (`false`).
    pub fn use_tls(mut self, use_tls: bool) -> Self {
        self.config.use_tls = use_tls;
        self
    }

    /// Sets the return format by name; validated by [`ClientBuilder::build`].
    pub fn return_format(mut self, format: impl Into<String>) -> Self {
        self.config.return_format = Some(format.into());
        self
    }

    /// Overrides the API version sent as `Version`.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = Some(version.into());
        self
    }

    /// Replaces the default `ureq` transport; `timeout` and `user_agent` are then ignored.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Sets a global timeout on the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the `User-Agent` of the default transport.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validates the configuration and builds the client.
    pub fn build(self) -> Result<Client> {
        let transport: Box<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Box::new(BlockingTransport::new(self.user_agent, self.timeout)),
        };
        Client::from_parts(self.config, transport)
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("custom_transport", &self.transport.is_some())
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
