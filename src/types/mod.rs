//! Shared request and response types.

use std::{collections::BTreeMap, fmt};

use serde_json::Value;

use crate::{
    error::{Error, Result},
    format::ReturnFormat,
    util,
};

/// Converted body of a successful response.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseValue {
    /// Body as received (`xml` and `raw` formats).
    Text(String),
    /// JSON serialization of the converted XML tree.
    Json(String),
    /// Converted XML tree.
    Structured(Value),
}

impl ResponseValue {
    /// Converts an XML body according to `format`.
    pub(crate) fn from_xml(format: ReturnFormat, body: String) -> Result<Self> {
        match format {
            ReturnFormat::Xml | ReturnFormat::Raw => Ok(Self::Text(body)),
            ReturnFormat::Structured => util::xml::to_value(&body).map(Self::Structured),
            ReturnFormat::Json => {
                let value = util::xml::to_value(&body)?;
                serde_json::to_string(&value)
                    .map(Self::Json)
                    .map_err(|e| Error::decode("failed to serialize response", Some(Box::new(e))))
            }
        }
    }

    /// Returns the text of a `Text` or `Json` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Json(s) => Some(s),
            Self::Structured(_) => None,
        }
    }

    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            Self::Structured(v) => Some(v),
            Self::Text(_) | Self::Json(_) => None,
        }
    }

    /// Renders the value as a string; structured values are serialized as JSON.
    pub fn into_string(self) -> String {
        match self {
            Self::Text(s) | Self::Json(s) => s,
            Self::Structured(v) => v.to_string(),
        }
    }
}

/// Scheme and hostname of a regional service endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: &'static str,
    pub host: String,
}

impl Endpoint {
    /// Builds `<region>.<service>.<base_host>`.
    pub fn new(use_tls: bool, region: &str, service: &str, base_host: &str) -> Self {
        Self {
            scheme: if use_tls { "https" } else { "http" },
            host: format!("{region}.{service}.{base_host}"),
        }
    }

    /// Returns `<scheme>://<host>/`.
    pub fn url(&self) -> String {
        format!("{}://{}/", self.scheme, self.host)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)
    }
}

/// Request parameters including `Signature`, ordered by key.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedParams {
    params: BTreeMap<String, String>,
}

impl SignedParams {
    pub(crate) fn new(mut params: BTreeMap<String, String>, signature: String) -> Self {
        params.insert("Signature".to_string(), signature);
        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn signature(&self) -> &str {
        self.get("Signature").unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Percent-encoded query for the request line.
    pub fn query_string(&self) -> String {
        util::encode::canonical_query_string(&self.params)
    }
}

impl fmt::Debug for SignedParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.params.iter().map(|(k, v)| {
                let shown = match k.as_str() {
                    "Signature" => "<redacted>".to_string(),
                    "AWSAccessKeyId" => util::text::redact_value(v),
                    _ => v.clone(),
                };
                (k.as_str(), shown)
            }))
            .finish()
    }
}
