use axum::http::Method;
use serde_json::{Value, json};

use super::*;
use crate::routes::api_routes;
use crate::routes::test_support::send;
use crate::state::test_helpers::test_app_state;

#[test]
fn widget_error_to_status_maps_not_found() {
    let err = WidgetError::NotFound(Uuid::nil());
    assert_eq!(widget_error_to_status(&err), StatusCode::NOT_FOUND);
}

#[test]
fn widget_error_to_status_maps_missing_homepage_to_server_error() {
    assert_eq!(widget_error_to_status(&WidgetError::NoHomepage), StatusCode::INTERNAL_SERVER_ERROR);
}

async fn create(app: &axum::Router, kind: &str, title: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/widgets",
        Some(json!({ "type": kind, "properties": { "title": title, "url": "https://example.com" } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn create_returns_created_widget() {
    let (state, _dir) = test_app_state();
    let app = api_routes(state);

    let body = create(&app, "shortcut", "Docs").await;
    assert_eq!(body["type"], "shortcut");
    assert_eq!(body["position"], 0);
    assert_eq!(body["properties"]["title"], "Docs");
    assert!(body["id"].as_str().is_some());
    assert!(body["created_at"].as_str().is_some());
}

#[tokio::test]
async fn list_returns_widgets_in_position_order() {
    let (state, _dir) = test_app_state();
    let app = api_routes(state);
    let first = create(&app, "shortcut", "first").await;
    create(&app, "shortcut", "second").await;

    let id = first["id"].as_str().unwrap();
    let (status, _) = send(&app, Method::PATCH, &format!("/api/widgets/{id}/position"), Some(json!({ "position": 5 }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = send(&app, Method::GET, "/api/widgets", None).await;
    let titles: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["properties"]["title"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(titles, vec!["second", "first"]);
}

#[tokio::test]
async fn unknown_type_is_rejected() {
    let (state, _dir) = test_app_state();
    let app = api_routes(state);

    let (status, _) = send(&app, Method::POST, "/api/widgets", Some(json!({ "type": "clock", "properties": {} }))).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn negative_position_is_rejected() {
    let (state, _dir) = test_app_state();
    let app = api_routes(state);
    let widget = create(&app, "iframe", "Grafana").await;
    let id = widget["id"].as_str().unwrap();

    let (status, _) = send(&app, Method::PATCH, &format!("/api/widgets/{id}/position"), Some(json!({ "position": -1 }))).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn put_replaces_properties_only() {
    let (state, _dir) = test_app_state();
    let app = api_routes(state);
    let widget = create(&app, "shortcut", "Old").await;
    let id = widget["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/widgets/{id}"),
        Some(json!({ "properties": { "title": "New", "url": "https://example.org" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["properties"]["title"], "New");
    assert_eq!(body["position"], widget["position"]);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let (state, _dir) = test_app_state();
    let app = api_routes(state);
    let widget = create(&app, "query", "Search").await;
    let id = widget["id"].as_str().unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/api/widgets/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "deleted", "id": id }));

    let (status, body) = send(&app, Method::GET, &format!("/api/widgets/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("widget not found"));
}
