use std::collections::BTreeMap;

use base64::Engine as _;
use hmac::{Hmac, Mac as _};
use sha2::Sha256;
use time::{OffsetDateTime, UtcOffset};

use crate::{error::Error, util::encode};

type HmacSha256 = Hmac<Sha256>;

pub(crate) const SIGNATURE_METHOD: &str = "HmacSHA256";
pub(crate) const SIGNATURE_VERSION: u32 = 2;

/// Signs a GET query: HMAC-SHA256 over `GET\n<host>\n/\n<canonical query>`, base64-encoded.
///
/// `params` must not contain `Signature`.
pub(crate) fn sign(
    params: &BTreeMap<String, String>,
    secret_key: &str,
    host: &str,
) -> Result<String, Error> {
    let canonical = encode::canonical_query_string(params);
    let string_to_sign = string_to_sign(host, &canonical);
    let mac = hmac_sha256(secret_key.as_bytes(), string_to_sign.as_bytes())?;
    Ok(base64::engine::general_purpose::STANDARD.encode(mac))
}

pub(crate) fn string_to_sign(host: &str, canonical_query_string: &str) -> String {
    format!("GET\n{host}\n/\n{canonical_query_string}")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|_| Error::signing("invalid HMAC key"))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Formats `now` in UTC as `YYYY-MM-DDTHH:MM:SSZ`.
pub(crate) fn timestamp(now: OffsetDateTime) -> String {
    let now = now.to_offset(UtcOffset::UTC);
    let year = now.year();
    let month = now.month() as u8;
    let day = now.day();
    let hour = now.hour();
    let minute = now.minute();
    let second = now.second();
    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}Z")
}
