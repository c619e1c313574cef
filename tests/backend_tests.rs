use serde_json::json;
use std::time::Duration;
use toolbridge::backend::{BackendClient, BackendError, LoginRequest, QueryRequest};
use toolbridge::options::TransportOptions;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> BackendClient {
    BackendClient::new(server.uri(), TransportOptions::default()).unwrap()
}

#[tokio::test]
async fn test_login_posts_name_and_age() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"name": "Alice", "age": 30})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .login(&LoginRequest {
            name: "Alice".to_string(),
            age: 30,
        })
        .await
        .unwrap();

    assert_eq!(response, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_query_sends_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_json(json!({"query": "what is Lomaa", "top_k": 5, "min_score": 0.5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .query(&QueryRequest::new("what is Lomaa"))
        .await
        .unwrap();

    assert_eq!(response["results"], json!([]));
}

#[tokio::test]
async fn test_server_error_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(500).set_body_string("index offline"))
        .mount(&server)
        .await;

    let err = client(&server)
        .query(&QueryRequest::new("anything"))
        .await
        .unwrap_err();

    match err {
        BackendError::Status { endpoint, status, body } => {
            assert_eq!(endpoint, "query");
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "index offline");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .login(&LoginRequest {
            name: "Bob".to_string(),
            age: 41,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    let backend = BackendClient::new(
        "http://127.0.0.1:9",
        TransportOptions::new().with_timeout(Duration::from_secs(2)),
    )
    .unwrap();

    let err = backend
        .query(&QueryRequest::new("anything"))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Network(_)));
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let backend =
        BackendClient::new(format!("{}/", server.uri()), TransportOptions::default()).unwrap();
    backend.query(&QueryRequest::new("q")).await.unwrap();
}
