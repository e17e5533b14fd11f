use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use httpmock::{Method::POST, MockServer};
use serde_json::{Value, json};
use student_records::{
    api::{AppState, create_router},
    config::Config,
    students::StudentStore,
    summarization::OllamaSummaryClient,
};
use tower::ServiceExt;

fn router_for(server: &MockServer, store: Arc<StudentStore>) -> Router {
    let config = Config {
        generation_url: server.base_url(),
        ..Config::default()
    };
    let summarizer = OllamaSummaryClient::from_config(&config).expect("summary client");
    create_router(AppState::new(store, Arc::new(summarizer)))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).expect("request"))
        .await
        .expect("router response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn crud_lifecycle_never_reuses_ids() {
    let server = MockServer::start_async().await;
    let store = Arc::new(StudentStore::new());
    let app = router_for(&server, store.clone());

    let (status, first) = call(
        &app,
        Method::POST,
        "/students",
        Some(json!({ "name": "Ada", "age": 36, "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["id"], 1);

    let (_, second) = call(
        &app,
        Method::POST,
        "/students",
        Some(json!({ "name": "Linus", "age": 28, "email": "linus@example.com" })),
    )
    .await;
    assert_eq!(second["id"], 2);

    let (status, _) = call(&app, Method::DELETE, "/students/1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, third) = call(
        &app,
        Method::POST,
        "/students",
        Some(json!({ "name": "Grace", "age": 45, "email": "grace@example.com" })),
    )
    .await;
    assert_eq!(third["id"], 3);

    let (status, listed) = call(&app, Method::GET, "/students", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([second.clone(), third.clone()]));

    let (status, fetched) = call(&app, Method::GET, "/students/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, third);
}

#[tokio::test]
async fn summary_streams_from_generation_endpoint() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .body_contains("\"model\":\"llama3.2\"")
                .body_contains("Name: Rahul");
            then.status(200)
                .header("content-type", "application/x-ndjson")
                .body(
                    "{\"model\":\"llama3.2\",\"response\":\"Hi \",\"done\":false}\n\
                     {\"model\":\"llama3.2\",\"response\":\"there\",\"done\":true}\n\
                     {\"model\":\"llama3.2\",\"response\":\"!\",\"done\":false}\n",
                );
        })
        .await;
    let app = router_for(&server, Arc::new(StudentStore::with_seed_data()));

    let (status, body) = call(&app, Method::GET, "/students/1/summary", None).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "summary": "Hi there" }));
}

#[tokio::test]
async fn upstream_failure_becomes_generic_500() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(500).body("model not loaded");
        })
        .await;
    let app = router_for(&server, Arc::new(StudentStore::with_seed_data()));

    let (status, body) = call(&app, Method::GET, "/students/2/summary", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!("Failed to generate summary"));
}

#[tokio::test]
async fn invalid_email_never_mutates_store() {
    let server = MockServer::start_async().await;
    let store = Arc::new(StudentStore::with_seed_data());
    let app = router_for(&server, store.clone());
    let before = store.list().await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/students",
        Some(json!({ "name": "Eve", "age": 30, "email": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Invalid email format"));

    let (status, body) = call(
        &app,
        Method::PUT,
        "/students/1",
        Some(json!({ "name": "Eve", "age": 30, "email": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Invalid email format"));

    assert_eq!(store.list().await, before);
}
