use super::*;
use axum::{
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

async fn spawn_server(app: Router) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(json!({ "received": body, "content_type": content_type }))
}

fn test_router() -> Router {
    Router::new()
        .route("/echo", post(echo))
        .route(
            "/boom",
            post(|| async { (StatusCode::BAD_REQUEST, Json(json!({ "error": "boom" }))) }),
        )
        .route(
            "/garbage-error",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        )
        .route("/garbage-ok", post(|| async { (StatusCode::OK, "<html>") }))
        .route(
            "/api/meta/crates",
            get(|| async { Json(json!({ "crates": [] })) }),
        )
}

#[tokio::test]
async fn success_resolves_with_decoded_body() {
    let base = spawn_server(test_router()).await.expect("spawn server");
    let transport = HttpTransport::new(&base, None).expect("transport");

    let body = transport
        .send(Method::Post, "/echo", Some(json!({ "code": "fn main() {}" })))
        .await
        .expect("success");

    assert_eq!(body["received"]["code"], "fn main() {}");
    assert_eq!(body["content_type"], "application/json");
}

#[tokio::test]
async fn error_status_rejects_with_backend_error_text() {
    let base = spawn_server(test_router()).await.expect("spawn server");
    let transport = HttpTransport::new(&base, None).expect("transport");

    let err = transport
        .send(Method::Post, "/boom", Some(json!({})))
        .await
        .expect_err("must fail");

    match &err {
        TransportError::Backend { status, body } => {
            assert_eq!(*status, 400);
            assert_eq!(body["error"], "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.failure_message().as_deref(), Some("boom"));
}

#[tokio::test]
async fn unparsable_error_body_gets_synthetic_description() {
    let base = spawn_server(test_router()).await.expect("spawn server");
    let transport = HttpTransport::new(&base, None).expect("transport");

    let err = transport
        .send(Method::Post, "/garbage-error", Some(json!({})))
        .await
        .expect_err("must fail");

    let TransportError::Backend { status, body } = &err else {
        panic!("expected backend error, got {err:?}");
    };
    assert_eq!(*status, 500);
    let synthetic: ErrorBody = serde_json::from_value(body.clone()).expect("error body shape");
    let message = err.failure_message().expect("synthetic message");
    assert!(!message.is_empty());
    assert_eq!(synthetic.error.as_deref(), Some(message.as_str()));
}

#[tokio::test]
async fn unparsable_success_body_is_malformed() {
    let base = spawn_server(test_router()).await.expect("spawn server");
    let transport = HttpTransport::new(&base, None).expect("transport");

    let err = transport
        .send(Method::Post, "/garbage-ok", Some(json!({})))
        .await
        .expect_err("must fail");

    assert!(matches!(err, TransportError::Malformed(_)), "{err:?}");
    assert!(err
        .failure_message()
        .is_some_and(|message| message.starts_with("malformed response")));
}

#[tokio::test]
async fn connection_failure_is_a_network_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let transport = HttpTransport::new(&format!("http://{addr}"), None).expect("transport");
    let err = transport
        .send(Method::Get, "/meta/crates", None)
        .await
        .expect_err("must fail");

    assert!(matches!(err, TransportError::Network(_)), "{err:?}");
    assert!(err.failure_message().is_some());
}

#[tokio::test]
async fn base_path_prefix_is_kept() {
    let base = spawn_server(test_router()).await.expect("spawn server");
    let transport = HttpTransport::new(&format!("{base}/api/"), None).expect("transport");

    let body = transport
        .send(Method::Get, "/meta/crates", None)
        .await
        .expect("success");
    assert_eq!(body, json!({ "crates": [] }));
}

#[test]
fn rejects_invalid_base_url() {
    assert!(HttpTransport::new("not a url", None).is_err());
}

#[test]
fn backend_error_without_error_field_has_no_message() {
    let err = TransportError::Backend {
        status: 502,
        body: json!({ "detail": "gateway" }),
    };
    assert_eq!(err.failure_message(), None);
}

#[tokio::test]
async fn missing_transport_always_fails() {
    let err = MissingTransport
        .send(Method::Post, "/execute", None)
        .await
        .expect_err("must fail");
    assert!(err.to_string().contains("/execute"));
}
