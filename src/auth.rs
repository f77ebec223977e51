use std::{fmt, str::FromStr};

use crate::error::Error;

/// Region identifiers the client accepts.
pub const REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ca-central-1",
    "sa-east-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-central-1",
    "eu-north-1",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-southeast-1",
    "ap-southeast-2",
];

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// A region identifier from [`REGIONS`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Region(&'static str);

impl Region {
    /// Looks up `value` in the allow-list.
    pub fn new(value: impl AsRef<str>) -> Result<Self, Error> {
        let value = value.as_ref().trim();
        REGIONS
            .iter()
            .copied()
            .find(|r| *r == value)
            .map(Self)
            .ok_or_else(|| Error::configuration(format!("region is not supported: {value}")))
    }

    pub fn as_str(&self) -> &str {
        self.0
    }
}

impl Default for Region {
    fn default() -> Self {
        Self(DEFAULT_REGION)
    }
}

impl AsRef<str> for Region {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Region").field(&self.0).finish()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Region {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Access key pair used to sign requests.
#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub(crate) secret_access_key: String,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Result<Self, Error> {
        let access_key_id = access_key_id.into();
        let secret_access_key = secret_access_key.into();

        if access_key_id.trim().is_empty() {
            return Err(Error::configuration("access key must not be empty"));
        }
        if secret_access_key.trim().is_empty() {
            return Err(Error::configuration("secret key must not be empty"));
        }

        Ok(Self {
            access_key_id,
            secret_access_key,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "access_key_id",
                &crate::util::text::redact_value(&self.access_key_id),
            )
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}
