use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::grid::{DropPosition, EditMode, Grid, MemoryStore, ReorderOutcome};
use crate::routes::api_routes;
use crate::state::AppState;
use crate::storage::YamlStore;
use crate::widget::WidgetKind;

/// Serve the real router on an ephemeral port.
async fn spawn_server() -> (HttpBackend, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = YamlStore::open(dir.path().join("storage.yaml")).unwrap();
    let app = api_routes(AppState::new(store));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (HttpBackend::new(&format!("http://{addr}/")), dir)
}

fn shortcut(title: &str) -> NewWidget {
    let mut properties = Properties::new();
    properties.insert("title".into(), json!(title));
    properties.insert("url".into(), json!(format!("https://{title}.example")));
    NewWidget { kind: WidgetKind::Shortcut, properties, position: None }
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    assert_eq!(HttpBackend::new("http://localhost:8000/").base_url(), "http://localhost:8000");
}

#[tokio::test]
async fn health_reports_service() {
    let (backend, _dir) = spawn_server().await;
    let health = backend.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.service, "good-neighbor");
}

#[tokio::test]
async fn created_widget_appears_in_list() {
    let (backend, _dir) = spawn_server().await;
    let request = shortcut("docs");

    let created = backend.create(request.clone()).await.unwrap();
    let listed = backend.list().await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(listed[0].kind, WidgetKind::Shortcut);
    assert_eq!(listed[0].properties, request.properties);
}

#[tokio::test]
async fn update_and_position_are_independent() {
    let (backend, _dir) = spawn_server().await;
    let created = backend.create(shortcut("a")).await.unwrap();

    let moved = backend.update_position(created.id, 4).await.unwrap();
    assert_eq!(moved.properties, created.properties);

    let mut properties = Properties::new();
    properties.insert("title".into(), json!("b"));
    let updated = backend.update(created.id, properties.clone()).await.unwrap();
    assert_eq!(updated.position, 4);
    assert_eq!(updated.properties, properties);
}

#[tokio::test]
async fn missing_widget_maps_to_not_found() {
    let (backend, _dir) = spawn_server().await;
    let err = backend.delete(Uuid::new_v4()).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("widget not found"));
}

#[tokio::test]
async fn homepage_calls_round_trip() {
    let (backend, _dir) = spawn_server().await;

    let work = backend.create_homepage("Work", false).await.unwrap();
    let renamed = backend.rename_homepage(work.id, "Office").await.unwrap();
    assert_eq!(renamed.name, "Office");

    let promoted = backend.set_default_homepage(work.id).await.unwrap();
    assert!(promoted.is_default);

    let homepages = backend.list_homepages().await.unwrap();
    assert_eq!(homepages.len(), 2);
    let home = homepages.iter().find(|hp| hp.id != work.id).unwrap();
    backend.delete_homepage(home.id).await.unwrap();

    let err = backend.delete_homepage(work.id).await.unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 400, .. }));
}

#[tokio::test]
async fn grid_reorder_persists_dense_positions_end_to_end() {
    let (backend, _dir) = spawn_server().await;
    let a = backend.create(shortcut("a")).await.unwrap();
    let b = backend.create(shortcut("b")).await.unwrap();
    let c = backend.create(shortcut("c")).await.unwrap();
    backend.update_position(b.id, 10).await.unwrap();
    backend.update_position(c.id, 20).await.unwrap();

    let mut grid = Grid::new(backend.clone(), MemoryStore::new(), EditMode::new(true));
    grid.load().await;

    let outcome = grid.drop_widget(c.id, a.id, DropPosition::Before).await;
    assert_eq!(outcome, ReorderOutcome::Persisted);

    let listed: Vec<(Uuid, u32)> = backend.list().await.unwrap().iter().map(|w| (w.id, w.position)).collect();
    assert_eq!(listed, vec![(c.id, 0), (a.id, 1), (b.id, 2)]);
}
