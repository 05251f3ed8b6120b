//! Engine-manager client tests against a mock HTTP server.

use std::sync::Arc;

use engine_bootstrap::domain::models::HttpConfig;
use engine_bootstrap::infrastructure::signing::sha_aksk_signature;
use engine_bootstrap::{EngineClient, EngineClientError, ShaAkskSigner};
use mockito::{Matcher, Server};

const METADATA_BODY: &str = r#"{
  "CSE": {
    "PrivateEndpoint": {
      "serviceCenter": "https://192.168.0.10:30100",
      "configCenter": "https://192.168.0.10:30110",
      "dashboardService": "https://192.168.0.10:30120"
    },
    "PublicEndpoint": {
      "serviceCenter": "https://cse.cn-north-1.myhuaweicloud.com"
    }
  }
}"#;

#[tokio::test]
async fn test_fetch_metadata_signed_request() {
    let mut server = Server::new_async().await;
    let signature = sha_aksk_signature("SK-secret", "AK123").unwrap();
    let mock = server
        .mock("GET", "/cseengine/v1/engine-metadata")
        .match_query(Matcher::UrlEncoded("name".into(), "default".into()))
        .match_header("x-service-ak", "AK123")
        .match_header("x-service-shaaksk", signature.as_str())
        .match_header("x-service-project", "cn-north-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(METADATA_BODY)
        .create_async()
        .await;

    let signer = Arc::new(ShaAkskSigner::new("AK123", "SK-secret", "cn-north-1").unwrap());
    let client = EngineClient::new(&server.url(), Some(signer), &HttpConfig::default()).unwrap();
    let metadata = client.fetch_engine_metadata("default").await.unwrap();

    mock.assert_async().await;
    assert_eq!(
        metadata.private_endpoint["serviceCenter"],
        "https://192.168.0.10:30100"
    );
    assert_eq!(metadata.public_endpoint.len(), 1);

    let endpoints = metadata.private_endpoints().unwrap();
    assert_eq!(endpoints.config_center, "https://192.168.0.10:30110");
    assert_eq!(endpoints.dashboard_service, "https://192.168.0.10:30120");
}

#[tokio::test]
async fn test_engine_name_is_query_encoded() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/cseengine/v1/engine-metadata")
        .match_query(Matcher::UrlEncoded("name".into(), "my engine&co".into()))
        .with_status(200)
        .with_body(METADATA_BODY)
        .create_async()
        .await;

    let client = EngineClient::new(&format!("{}/", server.url()), None, &HttpConfig::default())
        .unwrap();
    client.fetch_engine_metadata("my engine&co").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_not_found_reports_status_text() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/cseengine/v1/engine-metadata")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body("engine not found")
        .create_async()
        .await;

    let client = EngineClient::new(&server.url(), None, &HttpConfig::default()).unwrap();
    let err = client.fetch_engine_metadata("missing").await.unwrap_err();

    assert!(matches!(err, EngineClientError::BadStatus { .. }));
    assert!(err.to_string().contains("404 Not Found"), "got: {err}");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/cseengine/v1/engine-metadata")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{\"CSE\": [")
        .create_async()
        .await;

    let client = EngineClient::new(&server.url(), None, &HttpConfig::default()).unwrap();
    let err = client.fetch_engine_metadata("default").await.unwrap_err();

    assert!(matches!(err, EngineClientError::Decode(_)));
}

#[tokio::test]
async fn test_unsigned_client_sends_no_auth_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/cseengine/v1/engine-metadata")
        .match_query(Matcher::Any)
        .match_header("x-service-ak", Matcher::Missing)
        .match_header("x-service-shaaksk", Matcher::Missing)
        .with_status(200)
        .with_body(METADATA_BODY)
        .create_async()
        .await;

    let client = EngineClient::new(&server.url(), None, &HttpConfig::default()).unwrap();
    client.fetch_engine_metadata("default").await.unwrap();

    mock.assert_async().await;
}
