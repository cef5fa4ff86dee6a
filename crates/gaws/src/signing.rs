//! AWS Signature Version 4 implementation.
//!
//! Implements the SigV4 signing algorithm as documented at:
//! <https://docs.aws.amazon.com/general/latest/gr/sigv4_signing.html>
//!
//! The algorithm consists of four steps:
//!
//! 1. Create a canonical request
//! 2. Create the string to sign
//! 3. Calculate the signing key
//! 4. Add the signature to the request
//!
//! Only the headers present on the request when it is signed are covered
//! by the signature. The dispatcher adds `host` before signing.

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use http::{HeaderMap, HeaderValue, Method};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// The hashing algorithm used by SigV4.
const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Everything except RFC 3986 unreserved characters gets encoded.
const AWS_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Signs requests for one set of credentials in one region.
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
    region: String,
}

impl Signer {
    /// Create a signer.
    pub fn new(credentials: Credentials, region: impl Into<String>) -> Self {
        Self {
            credentials,
            region: region.into(),
        }
    }

    /// Region used in the credential scope.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sign a request in place.
    ///
    /// Adds `x-amz-date`, `x-amz-security-token` (with temporary
    /// credentials) and `authorization` to `headers`.
    pub fn sign(
        &self,
        service: &str,
        method: &Method,
        url: &Url,
        headers: &mut HeaderMap,
        body: &[u8],
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        let date_stamp = timestamp.format("%Y%m%d").to_string();
        let amz_date = timestamp.format("%Y%m%dT%H%M%SZ").to_string();

        headers.insert("x-amz-date", header_value(&amz_date)?);
        if let Some(token) = self.credentials.session_token() {
            headers.insert("x-amz-security-token", header_value(token)?);
        }

        let canonical = canonical_headers(headers)?;
        let signed_headers = canonical.keys().cloned().collect::<Vec<_>>().join(";");
        let canonical_headers: String = canonical
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value))
            .collect();

        // Step 1: canonical request
        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method.as_str(),
            canonical_uri(url),
            canonical_query(url),
            canonical_headers,
            signed_headers,
            sha256_hex(body)
        );

        // Step 2: string to sign
        let credential_scope = format!(
            "{}/{}/{}/aws4_request",
            date_stamp, self.region, service
        );
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            credential_scope,
            sha256_hex(canonical_request.as_bytes())
        );

        // Step 3: signing key
        let signing_key = derive_signing_key(
            self.credentials.secret_access_key(),
            &date_stamp,
            &self.region,
            service,
        )?;

        // Step 4: signature
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM,
            self.credentials.access_key_id(),
            credential_scope,
            signed_headers,
            signature
        );
        headers.insert(http::header::AUTHORIZATION, header_value(&authorization)?);

        Ok(())
    }
}

/// Derive the SigV4 signing key.
///
/// ```text
/// kSecret  = "AWS4" + SecretAccessKey
/// kDate    = HMAC-SHA256(kSecret, Date)
/// kRegion  = HMAC-SHA256(kDate, Region)
/// kService = HMAC-SHA256(kRegion, Service)
/// kSigning = HMAC-SHA256(kService, "aws4_request")
/// ```
pub fn derive_signing_key(
    secret_access_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>> {
    let k_secret = format!("AWS4{}", secret_access_key);
    let k_date = hmac_sha256(k_secret.as_bytes(), date_stamp.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

/// Compute SHA-256 of bytes and return it hex-encoded.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// URI-encode a string per SigV4 (RFC 3986 unreserved characters pass through).
pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, AWS_ENCODE_SET).to_string()
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| Error::Signing(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| Error::InvalidHeaderValue(value.to_string()))
}

/// Lowercased names mapped to trimmed values; repeated headers are joined with commas.
fn canonical_headers(headers: &HeaderMap) -> Result<BTreeMap<String, String>> {
    let mut canonical: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = value
            .to_str()
            .map_err(|_| Error::Signing(format!("header '{}' is not visible ASCII", name)))?;
        let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
        canonical
            .entry(name.as_str().to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    Ok(canonical)
}

fn canonical_uri(url: &Url) -> String {
    let path = url.path();
    if path.is_empty() || path == "/" {
        return "/".to_string();
    }
    path.split('/').map(uri_encode).collect::<Vec<_>>().join("/")
}

fn canonical_query(url: &Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (uri_encode(&k), uri_encode(&v)))
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}
