use laminator::{router, AppConfig, AppState, CloudinaryStore, TagService};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    tracing_subscriber::fmt::init();

    let store = CloudinaryStore::new(
        &config.cloud_name,
        &config.api_key,
        &config.api_secret,
        &config.folder,
    );
    let tags = TagService::new(store, config.frame_id.clone());

    let state = AppState {
        tags: Arc::new(tags),
        frame_asset: config.badge_frame_path.clone(),
    };

    let app = router(state, config.is_test);
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", config.addr, config.port))
        .await
        .expect("Failed to bind TCP listener");
    info!("Listening at {}:{}", config.addr, config.port);
    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
