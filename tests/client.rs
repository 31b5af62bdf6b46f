//! End-to-end tests against a local mock server.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mockito::Matcher;
use serde_json::json;

use fetch_client::{
    ApiTopic, ClientBase, FetchClient, FetchError, Payload, RequestParams, ResponseReader,
    TransportError,
};

#[tokio::test]
async fn get_resolves_json_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Hello World!"}"#)
        .create_async()
        .await;

    let client = FetchClient::new(&server.url());
    let payload = client.get("/", RequestParams::new()).await.unwrap();

    assert_eq!(payload, Payload::Json(json!({ "message": "Hello World!" })));
    mock.assert_async().await;
}

#[tokio::test]
async fn query_string_is_flattened() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/users")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("active".into(), "true".into()),
            Matcher::UrlEncoded("id".into(), "1".into()),
            Matcher::UrlEncoded("id".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = FetchClient::new(&server.url());
    client
        .get(
            "/users",
            RequestParams::new()
                .with_query("active", true)
                .with_query("id", vec![1, 2]),
        )
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn default_and_override_headers_are_sent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/users")
        .match_header("accept", "application/json")
        .match_header("x-tenant", "acme")
        .match_header("x-trace", "per-call")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = FetchClient::new(&server.url()).with_headers([("X-Tenant", "acme")]);
    client
        .get(
            "/users",
            RequestParams::new().with_header("X-Trace", "per-call"),
        )
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn auth_callback_injects_authorization() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/token")
        .match_header("authorization", "Bearer 1234")
        .with_status(200)
        .with_body(r#"{"token":"1234"}"#)
        .create_async()
        .await;

    let client = FetchClient::new(&server.url())
        .with_auth_callback(|| async { Ok::<_, TransportError>("Bearer 1234".to_string()) });
    let payload = client.get("/token", RequestParams::new()).await.unwrap();

    assert_eq!(payload, Payload::Json(json!({ "token": "1234" })));
    mock.assert_async().await;
}

#[tokio::test]
async fn auth_callback_failure_surfaces() {
    let server = mockito::Server::new_async().await;

    let client = FetchClient::new(&server.url())
        .with_auth_callback(|| async { Err::<String, _>("token store locked".into()) });
    let err = client.get("/", RequestParams::new()).await.unwrap_err();

    assert!(matches!(err, FetchError::Auth { .. }));
    assert_eq!(err.status(), 0);
    assert!(err.to_string().contains("token store locked"));
}

#[tokio::test]
async fn server_error_uses_payload_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/users/7")
        .with_status(404)
        .with_body(r#"{"message":"not found"}"#)
        .create_async()
        .await;

    let client = FetchClient::new(&server.url());
    let err = client.get("/users/7", RequestParams::new()).await.unwrap_err();

    assert!(matches!(err, FetchError::Server { .. }));
    assert_eq!(err.status(), 404);
    assert_eq!(err.to_string(), "not found");
    let diagnostic = err.diagnostic();
    assert!(diagnostic.starts_with("GET "));
    assert!(diagnostic.ends_with("/users/7 => 404: not found"));
}

#[tokio::test]
async fn server_error_without_message_field() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/broken")
        .with_status(500)
        .with_body(r#"{"code":3}"#)
        .create_async()
        .await;

    let client = FetchClient::new(&server.url());
    let err = client.get("/broken", RequestParams::new()).await.unwrap_err();

    assert_eq!(err.status(), 500);
    assert_eq!(err.to_string(), "Server Error: 500");
    assert_eq!(
        err.payload().and_then(Payload::as_json),
        Some(&json!({ "code": 3 }))
    );
}

#[tokio::test]
async fn connection_refused_maps_to_status_zero() {
    // Port 1 is never listening.
    let client = FetchClient::new("http://127.0.0.1:1");
    let err = client.get("/users", RequestParams::new()).await.unwrap_err();

    assert!(matches!(err, FetchError::Connection { .. }));
    assert_eq!(err.status(), 0);
    assert!(err.to_string().starts_with("Failed to connect to server:"));
    assert_eq!(err.request().unwrap().url, "http://127.0.0.1:1/users");
}

#[tokio::test]
async fn malformed_json_success_becomes_diagnostic_payload() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_body("OK")
        .create_async()
        .await;

    let client = FetchClient::new(&server.url());
    let payload = client.get("/health", RequestParams::new()).await.unwrap();

    let value = payload.as_json().expect("diagnostic object");
    assert_eq!(value["error"], "Not a valid JSON payload");
    assert_eq!(value["status"], 200);
    assert_eq!(value["text"], "OK");
}

#[tokio::test]
async fn post_serializes_json_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/users")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({ "name": "bob" })))
        .with_status(201)
        .with_body(r#"{"id":1,"name":"bob"}"#)
        .create_async()
        .await;

    let client = FetchClient::new(&server.url());
    let payload = client
        .post(
            "/users",
            RequestParams::new().with_payload(json!({ "name": "bob" })),
        )
        .await
        .unwrap();

    assert_eq!(payload, Payload::Json(json!({ "id": 1, "name": "bob" })));
    mock.assert_async().await;
}

#[tokio::test]
async fn string_body_passes_through() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/notes/1")
        .match_header("content-type", "text/plain")
        .match_body("plain note")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = FetchClient::new(&server.url());
    client
        .put(
            "/notes/1",
            RequestParams::new()
                .with_payload("plain note")
                .with_header("content-type", "text/plain"),
        )
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_with_empty_body_resolves_empty() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/users/7")
        .with_status(204)
        .create_async()
        .await;

    let client = FetchClient::new(&server.url());
    let payload = client.delete("/users/7", RequestParams::new()).await.unwrap();

    assert!(payload.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn text_reader_returns_text() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/version")
        .with_status(200)
        .with_body("1.2.3")
        .create_async()
        .await;

    let client = FetchClient::new(&server.url());
    let payload = client
        .get(
            "/version",
            RequestParams::new().with_reader(ResponseReader::Text),
        )
        .await
        .unwrap();

    assert_eq!(payload.as_text(), Some("1.2.3"));
}

#[tokio::test]
async fn topic_prefixes_paths_and_shares_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/users/42")
        .match_header("x-tenant", "acme")
        .with_status(200)
        .with_body(r#"{"id":42}"#)
        .create_async()
        .await;

    let client = Arc::new(FetchClient::new(&format!("{}/api", server.url())));
    let users = ApiTopic::new(client.clone(), "/users");

    // Mutation on the facade after the topic exists is observed by it.
    client.set_header("x-tenant", Some("acme"));

    let payload = users.get("/42", RequestParams::new()).await.unwrap();
    assert_eq!(payload, Payload::Json(json!({ "id": 42 })));
    mock.assert_async().await;
}

#[tokio::test]
async fn topic_uses_parent_auth() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/users")
        .match_header("authorization", "Bearer shared")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = Arc::new(
        FetchClient::new(&server.url())
            .with_auth_callback(|| async { Ok::<_, TransportError>("Bearer shared".to_string()) }),
    );
    let users = ApiTopic::new(client, "/users");
    users.get("/", RequestParams::new()).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn last_response_reflects_most_recent_call() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/first")
        .with_status(200)
        .with_header("x-request-id", "one")
        .with_body("{}")
        .create_async()
        .await;
    server
        .mock("GET", "/second")
        .with_status(200)
        .with_header("x-request-id", "two")
        .with_body("{}")
        .create_async()
        .await;

    let client = FetchClient::new(&server.url());
    assert!(client.last_response().is_none());

    client.get("/first", RequestParams::new()).await.unwrap();
    let first = client.last_response().unwrap();
    assert_eq!(first.header("x-request-id"), Some("one"));

    client.get("/second", RequestParams::new()).await.unwrap();
    let second = client.last_response().unwrap();
    assert_eq!(second.header("x-request-id"), Some("two"));
}

#[tokio::test]
async fn last_response_recorded_for_server_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/missing")
        .with_status(404)
        .with_body(r#"{"message":"gone"}"#)
        .create_async()
        .await;

    let client = FetchClient::new(&server.url());
    client.get("/missing", RequestParams::new()).await.unwrap_err();

    let last = client.last_response().unwrap();
    assert_eq!(last.status(), 404);
    assert!(!last.ok());
}

#[tokio::test]
async fn observers_fire_once_per_call() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/watched")
        .with_status(200)
        .with_body("{}")
        .expect(2)
        .create_async()
        .await;

    let requests = Arc::new(AtomicUsize::new(0));
    let responses = Arc::new(AtomicUsize::new(0));
    let seen_headers = Arc::new(parking_lot::Mutex::new(BTreeMap::new()));

    let client = {
        let requests = requests.clone();
        let responses = responses.clone();
        let seen_headers = seen_headers.clone();
        FetchClient::new(&server.url())
            .with_request_observer(move |init| {
                requests.fetch_add(1, Ordering::SeqCst);
                *seen_headers.lock() = init.headers.clone();
            })
            .with_response_observer(move |response| {
                responses.fetch_add(1, Ordering::SeqCst);
                assert_eq!(response.status(), 200);
            })
    };

    client.get("/watched", RequestParams::new()).await.unwrap();
    client.get("/watched", RequestParams::new()).await.unwrap();

    assert_eq!(requests.load(Ordering::SeqCst), 2);
    assert_eq!(responses.load(Ordering::SeqCst), 2);
    assert_eq!(
        seen_headers.lock().get("accept").map(String::as_str),
        Some("application/json")
    );
}
