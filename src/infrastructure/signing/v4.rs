//! Canonical-request signer layered on top of [`ShaAkskSigner`].
//!
//! Used against gateways that verify a v4-style signature instead of (or in
//! addition to) the `X-Service-*` headers. The engine bootstrap does not
//! need it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderName, AUTHORIZATION};
use sha2::{Digest, Sha256};

use crate::domain::ports::{RequestSigner, SignError};

use super::sha_aksk::{header_value, hmac_sha256_hex, ShaAkskSigner};

/// Algorithm tag of the string to sign and the `Authorization` header.
pub const ALGORITHM: &str = "SDK-HMAC-SHA256";
/// Header carrying the signing timestamp.
pub const HEADER_SDK_DATE: &str = "X-Sdk-Date";

const SDK_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Header-injection signer followed by a canonical-request signature.
#[derive(Clone)]
pub struct V4Signer {
    headers: ShaAkskSigner,
    access_key: String,
    secret_key: String,
}

impl V4Signer {
    /// Signer for the given key pair and project.
    pub fn new(access_key: &str, secret_key: &str, project: &str) -> Result<Self, SignError> {
        Ok(Self {
            headers: ShaAkskSigner::new(access_key, secret_key, project)?,
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    /// Sign as of `now`.
    pub fn sign_at(
        &self,
        request: &mut reqwest::Request,
        now: DateTime<Utc>,
    ) -> Result<(), SignError> {
        self.headers.sign(request)?;

        let timestamp = now.format(SDK_DATE_FORMAT).to_string();
        request.headers_mut().insert(
            HeaderName::from_static("x-sdk-date"),
            header_value(HEADER_SDK_DATE, &timestamp)?,
        );
        request.headers_mut().remove(AUTHORIZATION);

        let (canonical, signed_headers) = canonical_request(request)?;
        let string_to_sign = format!(
            "{ALGORITHM}\n{timestamp}\n{}",
            hex::encode(Sha256::digest(canonical.as_bytes()))
        );
        let signature = hmac_sha256_hex(self.secret_key.as_bytes(), string_to_sign.as_bytes())?;

        let authorization = format!(
            "{ALGORITHM} Access={}, SignedHeaders={signed_headers}, Signature={signature}",
            self.access_key
        );
        let mut value = header_value("Authorization", &authorization)?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

impl RequestSigner for V4Signer {
    fn scheme(&self) -> &'static str {
        "sdk-hmac-sha256"
    }

    fn sign(&self, request: &mut reqwest::Request) -> Result<(), SignError> {
        self.sign_at(request, Utc::now())
    }
}

impl std::fmt::Debug for V4Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4Signer")
            .field("access_key", &self.access_key)
            .finish_non_exhaustive()
    }
}

/// Build the canonical request and the `;`-joined signed header list.
///
/// ```text
/// METHOD
/// /path
/// sorted&query=pairs
/// header:value\n...      (lowercase names, trimmed values, sorted)
/// signed;header;names
/// hex(sha256(body))
/// ```
fn canonical_request(request: &reqwest::Request) -> Result<(String, String), SignError> {
    let url = request.url();

    let mut query: Vec<&str> = url
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .collect();
    query.sort_unstable();

    let mut headers: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in request.headers() {
        if name == AUTHORIZATION {
            continue;
        }
        let value = value
            .to_str()
            .map_err(|_| SignError::InvalidHeaderValue { header: "canonical header" })?;
        headers
            .entry(name.as_str().to_string())
            .or_default()
            .push(value.trim().to_string());
    }
    if !headers.contains_key("host") {
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };
        headers.insert("host".to_string(), vec![host]);
    }

    let canonical_headers: String = headers
        .iter()
        .map(|(name, values)| format!("{name}:{}\n", values.join(",")))
        .collect();
    let signed_headers = headers.keys().cloned().collect::<Vec<_>>().join(";");

    let body: &[u8] = match request.body() {
        Some(body) => body.as_bytes().ok_or(SignError::StreamingBody)?,
        None => &[],
    };

    let canonical = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        request.method().as_str(),
        url.path(),
        query.join("&"),
        canonical_headers,
        signed_headers,
        hex::encode(Sha256::digest(body))
    );
    Ok((canonical, signed_headers))
}
