use backend::{app, AppState};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "backend=info,tower_http=info".to_string()),
        )
        .init();

    let state = if let Ok(path) = env::var("PERSIST_PATH") {
        AppState::with_persistence(path).await
    } else {
        AppState::default()
    };

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    info!(%bind_addr, "starting Valentine's Week backend");
    axum::serve(
        tokio::net::TcpListener::bind(&bind_addr)
            .await
            .expect("bind"),
        app(state),
    )
    .await
    .expect("server error");
}
