//! Engine-manager metadata client.

use std::sync::Arc;

use reqwest::{Method, StatusCode, Url};
use tracing::{debug, info, instrument, warn};

use crate::domain::models::{EngineMetadata, EngineMetadataDocument, HttpConfig};
use crate::domain::ports::RequestSigner;
use crate::infrastructure::http::HttpTransport;

use super::error::EngineClientError;

/// Path of the engine metadata API, relative to the engine endpoint.
pub const ENGINE_METADATA_PATH: &str = "/cseengine/v1/engine-metadata";

/// HTTP client bound to one engine-manager endpoint.
#[derive(Debug, Clone)]
pub struct EngineClient {
    endpoint: String,
    transport: HttpTransport,
}

impl EngineClient {
    /// Client with its own transport; requests are signed by `signer` when
    /// given.
    pub fn new(
        endpoint: &str,
        signer: Option<Arc<dyn RequestSigner>>,
        http: &HttpConfig,
    ) -> Result<Self, EngineClientError> {
        let transport = match signer {
            Some(signer) => HttpTransport::new(http)?.with_signer(signer),
            None => HttpTransport::new(http)?,
        };
        Self::with_transport(endpoint, transport)
    }

    /// Client sharing an existing transport and whatever signer it holds.
    pub fn with_transport(
        endpoint: &str,
        transport: HttpTransport,
    ) -> Result<Self, EngineClientError> {
        let endpoint = endpoint.trim().trim_end_matches('/');
        Url::parse(endpoint).map_err(|e| EngineClientError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            transport,
        })
    }

    /// Base endpoint, without trailing `/`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `GET {endpoint}/cseengine/v1/engine-metadata?name={name}`
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn fetch_engine_metadata(
        &self,
        name: &str,
    ) -> Result<EngineMetadata, EngineClientError> {
        let mut url = Url::parse(&format!("{}{ENGINE_METADATA_PATH}", self.endpoint)).map_err(
            |e| EngineClientError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            },
        )?;
        url.query_pairs_mut().append_pair("name", name);

        debug!(url = %url, "fetching engine metadata");
        let response = self
            .transport
            .send(self.transport.request(Method::GET, url.as_str()))
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = %status, "engine metadata request rejected");
            return Err(EngineClientError::from_status(status));
        }

        let body = response.bytes().await?;
        let document: EngineMetadataDocument = serde_json::from_slice(&body)?;
        info!(
            private_endpoints = document.cse.private_endpoint.len(),
            public_endpoints = document.cse.public_endpoint.len(),
            "engine metadata fetched"
        );
        Ok(document.cse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let client =
            EngineClient::new("https://cse.cn-north-1.myhuaweicloud.com/", None, &HttpConfig::default())
                .unwrap();
        assert_eq!(client.endpoint(), "https://cse.cn-north-1.myhuaweicloud.com");
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let err = EngineClient::new("cse without scheme", None, &HttpConfig::default()).unwrap_err();
        assert!(matches!(err, EngineClientError::InvalidEndpoint { .. }));
    }
}
