//! Header-injection AK/SK signer.
//!
//! Every request carries the access key, `hex(HMAC-SHA256(sk, ak))` and the
//! project. The signature is computed once, when the signer is built.

use hmac::{Hmac, Mac};
use reqwest::header::{HeaderName, HeaderValue};
use sha2::Sha256;

use crate::domain::models::Credential;
use crate::domain::ports::{RequestSigner, SignError};

/// Access key header.
pub const HEADER_SERVICE_AK: &str = "X-Service-AK";
/// Signature header.
pub const HEADER_SERVICE_SHA_AKSK: &str = "X-Service-ShaAKSK";
/// Project header.
pub const HEADER_SERVICE_PROJECT: &str = "X-Service-Project";

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex HMAC-SHA256 of `message` under `key`.
pub fn hmac_sha256_hex(key: &[u8], message: &[u8]) -> Result<String, SignError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| SignError::InvalidKey(e.to_string()))?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// The `X-Service-ShaAKSK` value: HMAC-SHA256 keyed with the secret key over
/// the access key.
pub fn sha_aksk_signature(secret_key: &str, access_key: &str) -> Result<String, SignError> {
    hmac_sha256_hex(secret_key.as_bytes(), access_key.as_bytes())
}

/// Signer injecting `X-Service-AK`, `X-Service-ShaAKSK` and
/// `X-Service-Project`.
#[derive(Clone)]
pub struct ShaAkskSigner {
    access_key: HeaderValue,
    signature: HeaderValue,
    project: HeaderValue,
}

impl ShaAkskSigner {
    /// Precompute the signature and validate the three header values.
    pub fn new(access_key: &str, secret_key: &str, project: &str) -> Result<Self, SignError> {
        let signature = sha_aksk_signature(secret_key, access_key)?;

        let mut signature = header_value(HEADER_SERVICE_SHA_AKSK, &signature)?;
        signature.set_sensitive(true);

        Ok(Self {
            access_key: header_value(HEADER_SERVICE_AK, access_key)?,
            signature,
            project: header_value(HEADER_SERVICE_PROJECT, project)?,
        })
    }

    /// Signer for a resolved credential.
    pub fn from_credential(credential: &Credential) -> Result<Self, SignError> {
        Self::new(
            &credential.access_key,
            &credential.secret_key,
            &credential.project,
        )
    }

    /// The precomputed signature.
    pub fn signature(&self) -> &str {
        // Built from a hex string, always visible ASCII.
        self.signature.to_str().unwrap_or_default()
    }
}

impl RequestSigner for ShaAkskSigner {
    fn scheme(&self) -> &'static str {
        "sha-aksk"
    }

    fn sign(&self, request: &mut reqwest::Request) -> Result<(), SignError> {
        let headers = request.headers_mut();
        headers.insert(
            HeaderName::from_static("x-service-ak"),
            self.access_key.clone(),
        );
        headers.insert(
            HeaderName::from_static("x-service-shaaksk"),
            self.signature.clone(),
        );
        headers.insert(
            HeaderName::from_static("x-service-project"),
            self.project.clone(),
        );
        Ok(())
    }
}

impl std::fmt::Debug for ShaAkskSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaAkskSigner")
            .field("access_key", &self.access_key)
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}

pub(crate) fn header_value(header: &'static str, value: &str) -> Result<HeaderValue, SignError> {
    HeaderValue::from_str(value).map_err(|_| SignError::InvalidHeaderValue { header })
}

#[cfg(test)]
mod tests {
    use reqwest::{Method, Request, Url};

    use super::*;

    fn request() -> Request {
        Request::new(
            Method::GET,
            Url::parse("https://cse.cn-north-1.myhuaweicloud.com/cseengine/v1/engine-metadata")
                .unwrap(),
        )
    }

    #[test]
    fn test_rfc4231_case_2_vector() {
        // RFC 4231 test case 2: key "Jefe", data "what do ya want for nothing?"
        let sig = hmac_sha256_hex(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            sig,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_signature_is_keyed_with_secret_over_access_key() {
        let sig = sha_aksk_signature("Jefe", "what do ya want for nothing?").unwrap();
        assert_eq!(
            sig,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_sign_sets_three_headers() {
        let signer = ShaAkskSigner::new("my-ak", "my-sk", "cn-north-1").unwrap();
        let mut req = request();
        signer.sign(&mut req).unwrap();

        let headers = req.headers();
        assert_eq!(headers.len(), 3);
        assert_eq!(headers[HEADER_SERVICE_AK], "my-ak");
        assert_eq!(
            headers[HEADER_SERVICE_SHA_AKSK],
            sha_aksk_signature("my-sk", "my-ak").unwrap().as_str()
        );
        assert_eq!(headers[HEADER_SERVICE_PROJECT], "cn-north-1");
        assert_eq!(signer.signature(), sha_aksk_signature("my-sk", "my-ak").unwrap());
    }

    #[test]
    fn test_resigning_is_idempotent() {
        let signer = ShaAkskSigner::new("my-ak", "my-sk", "proj").unwrap();
        let mut req = request();
        signer.sign(&mut req).unwrap();
        let first = req.headers().clone();
        signer.sign(&mut req).unwrap();

        assert_eq!(req.headers(), &first);
        assert_eq!(req.headers().get_all(HEADER_SERVICE_AK).iter().count(), 1);
    }

    #[test]
    fn test_sign_overwrites_existing_values() {
        let signer = ShaAkskSigner::new("my-ak", "my-sk", "proj").unwrap();
        let mut req = request();
        req.headers_mut()
            .insert("x-service-project", HeaderValue::from_static("stale"));
        signer.sign(&mut req).unwrap();

        assert_eq!(req.headers()[HEADER_SERVICE_PROJECT], "proj");
    }

    #[test]
    fn test_invalid_header_value_rejected_at_construction() {
        let err = ShaAkskSigner::new("ak\nwith-newline", "sk", "proj").unwrap_err();
        assert!(matches!(
            err,
            SignError::InvalidHeaderValue { header: HEADER_SERVICE_AK }
        ));
    }

    #[test]
    fn test_debug_omits_signature() {
        let signer = ShaAkskSigner::new("my-ak", "my-sk", "proj").unwrap();
        let rendered = format!("{signer:?}");
        assert!(!rendered.contains(signer.signature()));
    }
}
