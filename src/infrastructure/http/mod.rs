//! Shared outbound HTTP transport.
//!
//! A [`HttpTransport`] is built once at startup and cloned into every client
//! that talks to the control plane. Each request passes through the signer
//! installed at the time it is sent; installing a new signer swaps a single
//! reference and never mutates a signer in use.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::{Client, Method, Request, RequestBuilder, Response};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::models::HttpConfig;
use crate::domain::ports::{RequestSigner, SignError};

/// Errors raised while sending a request through the transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Error from the underlying HTTP client
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The installed signer rejected the request
    #[error("signing request failed: {0}")]
    Sign(#[from] SignError),
}

type SignerSlot = Arc<RwLock<Option<Arc<dyn RequestSigner>>>>;

/// `reqwest` client plus the currently installed request signer.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    signer: SignerSlot,
}

impl HttpTransport {
    /// Build a transport from `config`, without a signer.
    pub fn new(config: &HttpConfig) -> Result<Self, TransportError> {
        if config.insecure_skip_verify {
            warn!("TLS certificate verification disabled for control plane requests");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .build()?;

        Ok(Self {
            client,
            signer: Arc::new(RwLock::new(None)),
        })
    }

    /// Builder-style [`install_signer`](Self::install_signer).
    #[must_use]
    pub fn with_signer(self, signer: Arc<dyn RequestSigner>) -> Self {
        self.install_signer(signer);
        self
    }

    /// Install `signer` for all subsequent requests, returning the previous
    /// one. Requests already being signed keep the signer they started with.
    pub fn install_signer(&self, signer: Arc<dyn RequestSigner>) -> Option<Arc<dyn RequestSigner>> {
        debug!(scheme = signer.scheme(), "installing request signer");
        let mut slot = self.signer.write().unwrap_or_else(PoisonError::into_inner);
        slot.replace(signer)
    }

    /// Stop signing requests.
    pub fn clear_signer(&self) -> Option<Arc<dyn RequestSigner>> {
        self.signer
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// The currently installed signer.
    pub fn signer(&self) -> Option<Arc<dyn RequestSigner>> {
        self.signer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Start building an (unsigned) request; send it with
    /// [`send`](Self::send).
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Build, sign and send.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, TransportError> {
        let request = builder.build()?;
        self.execute(request).await
    }

    /// Sign `request` with the current signer, if any, and send it.
    pub async fn execute(&self, mut request: Request) -> Result<Response, TransportError> {
        self.sign(&mut request)?;
        Ok(self.client.execute(request).await?)
    }

    /// Sign `request` in place with the current signer, if any.
    pub fn sign(&self, request: &mut Request) -> Result<(), SignError> {
        match self.signer() {
            Some(signer) => signer.sign(request),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("signer", &self.signer().map(|s| s.scheme()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Url;

    use super::*;
    use crate::infrastructure::signing::{ShaAkskSigner, HEADER_SERVICE_AK};

    fn transport() -> HttpTransport {
        HttpTransport::new(&HttpConfig::default()).unwrap()
    }

    fn request() -> Request {
        Request::new(Method::GET, Url::parse("https://example.com/").unwrap())
    }

    #[test]
    fn test_unsigned_transport_leaves_request_alone() {
        let transport = transport();
        let mut req = request();
        transport.sign(&mut req).unwrap();
        assert!(req.headers().is_empty());
        assert!(transport.signer().is_none());
    }

    #[test]
    fn test_install_signer_is_shared_by_clones() {
        let transport = transport();
        let clone = transport.clone();
        transport.install_signer(Arc::new(ShaAkskSigner::new("ak-1", "sk", "p").unwrap()));

        let mut req = request();
        clone.sign(&mut req).unwrap();
        assert_eq!(req.headers()[HEADER_SERVICE_AK], "ak-1");
    }

    #[test]
    fn test_swapping_signer_affects_later_requests() {
        let transport = transport();
        transport.install_signer(Arc::new(ShaAkskSigner::new("ak-1", "sk", "p").unwrap()));
        let previous =
            transport.install_signer(Arc::new(ShaAkskSigner::new("ak-2", "sk", "p").unwrap()));
        assert_eq!(previous.map(|s| s.scheme()), Some("sha-aksk"));

        let mut req = request();
        transport.sign(&mut req).unwrap();
        assert_eq!(req.headers()[HEADER_SERVICE_AK], "ak-2");

        transport.clear_signer();
        let mut req = request();
        transport.sign(&mut req).unwrap();
        assert!(req.headers().is_empty());
    }
}
