use userauth_api::app::{AppOptions, build_app};
use userauth_api::config::ServerConfig;

#[tokio::main]
async fn main() {
    userauth_observability::init();

    let config = ServerConfig::from_env();
    let app = build_app(AppOptions::from_config(&config));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    match listener.local_addr() {
        Ok(addr) => tracing::info!("listening on {addr}"),
        Err(_) => tracing::info!("listening on {}", config.bind_addr),
    }

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server exited: {e}");
    }
}
