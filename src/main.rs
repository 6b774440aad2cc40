use good_neighbor::config::ServerConfig;
use good_neighbor::routes;
use good_neighbor::state::AppState;
use good_neighbor::storage::YamlStore;

#[tokio::main]
async fn main() {
    // Missing .env is fine; real env vars take precedence either way.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env().expect("invalid server configuration");
    let store = YamlStore::open(&config.storage_path).expect("storage init failed");
    tracing::info!(path = %config.storage_path.display(), "storage opened");

    let state = AppState::new(store);
    let app = routes::app(state, &config);
    let listener = tokio::net::TcpListener::bind(config.socket_addr())
        .await
        .expect("failed to bind");

    tracing::info!(addr = %config.socket_addr(), cors_origin = %config.cors_origin, "good-neighbor listening");
    axum::serve(listener, app).await.expect("server failed");
}
