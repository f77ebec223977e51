use std::{fmt, str::FromStr};

use crate::error::Error;

/// Output representation of a successful response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReturnFormat {
    /// Response body as received.
    Xml,
    /// XML converted to a structured value, then serialized as JSON text.
    #[default]
    Json,
    /// XML converted to a nested structured value.
    Structured,
    /// Response body as received.
    Raw,
}

impl ReturnFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
            Self::Structured => "structured",
            Self::Raw => "raw",
        }
    }
}

impl AsRef<str> for ReturnFormat {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ReturnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            "json" => Ok(Self::Json),
            "structured" | "perl" => Ok(Self::Structured),
            "raw" => Ok(Self::Raw),
            _ => Err(Error::configuration(format!(
                "return format must be one of xml, json, structured, raw: {value}"
            ))),
        }
    }
}

impl TryFrom<&str> for ReturnFormat {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
