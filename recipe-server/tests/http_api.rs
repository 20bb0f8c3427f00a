//! HTTP tests for the recipe API, driven in-process against the in-memory store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use recipe_server::{build_router, AppState};
use recipe_storage::{InMemoryStore, RecipeRepository};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let repo = RecipeRepository::new(Arc::new(InMemoryStore::new()));
    build_router(AppState::new(repo))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("response expected");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

fn as_json(body: &str) -> Value {
    serde_json::from_str(body).expect("body should be valid JSON")
}

#[tokio::test]
async fn create_then_get_pancake() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/recipe",
        Some(json!({
            "title": "PanCake",
            "difficulty": "easy",
            "prep_period": "10m",
            "categories": ["breakfast", "eastern"],
            "ingredients": ["eggs", "corn"],
            "images": ["url1", "url2"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(as_json(&body)["id"], 1);

    let (status, body) = send(&app, Method::GET, "/recipe/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        as_json(&body),
        json!({
            "id": 1,
            "title": "PanCake",
            "difficulty": "easy",
            "prep_period": "10m0s",
            "categories": ["breakfast", "eastern"],
            "ingredients": ["eggs", "corn"],
            "images": ["url1", "url2"]
        })
    );
}

#[tokio::test]
async fn create_ignores_client_supplied_id() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/recipe",
        Some(json!({ "id": 99, "title": "Sneaky" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(as_json(&body)["id"], 1);
}

#[tokio::test]
async fn update_keeps_lists_write_once() {
    let app = app();
    send(
        &app,
        Method::POST,
        "/recipe",
        Some(json!({ "title": "Soup", "categories": ["a", "b"] })),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/recipe/1",
        Some(json!({ "title": "Better Soup", "categories": ["x"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["id"], 1);

    let (_, body) = send(&app, Method::GET, "/recipe/1", None).await;
    let recipe = as_json(&body);
    assert_eq!(recipe["title"], "Better Soup");
    assert_eq!(recipe["categories"], json!(["a", "b"]));

    let (_, body) = send(&app, Method::GET, "/recipes?page=1", None).await;
    assert_eq!(as_json(&body), json!([{ "id": 1, "title": "Better Soup" }]));
}

#[tokio::test]
async fn list_pages_of_summaries() {
    let app = app();
    for i in 1..=5 {
        send(
            &app,
            Method::POST,
            "/recipe",
            Some(json!({ "title": format!("Dish {}", i), "method": "cook" })),
        )
        .await;
    }

    let (status, body) = send(&app, Method::GET, "/recipes?page=1", None).await;
    assert_eq!(status, StatusCode::OK);
    let expected: Vec<Value> = (1..=5)
        .map(|i| json!({ "id": i, "title": format!("Dish {}", i) }))
        .collect();
    assert_eq!(as_json(&body), Value::Array(expected));

    let (status, body) = send(&app, Method::GET, "/recipes?page=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!([]));

    let (status, body) = send(&app, Method::GET, "/recipes?page=9223372036854775807", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!([]));
}

#[tokio::test]
async fn errors_are_plain_text_bad_requests() {
    let app = app();

    let cases = [
        (Method::GET, "/recipe/0", None, "invalid id"),
        (Method::GET, "/recipe/-5", None, "invalid id"),
        (Method::GET, "/recipe/abc", None, "invalid id \"abc\""),
        (Method::GET, "/recipes", None, "missing page parameter"),
        (Method::GET, "/recipes?page=0", None, "invalid page"),
        (Method::GET, "/recipes?page=two", None, "invalid page \"two\""),
        (
            Method::PUT,
            "/recipe/0",
            Some(json!({ "title": "Nope" })),
            "invalid id",
        ),
    ];

    for (method, uri, body, expected) in cases {
        let (status, text) = send(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(text, expected, "{}", uri);
    }
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/recipe",
        Some(json!({ "title": "Slow", "prep_period": "forever" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/recipes?page=1", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_recipe_loads_empty() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/recipe/42", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({ "id": 42, "title": "" }));
}
