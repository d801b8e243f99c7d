use serde::Deserialize;
use shopkit_core::config::{self, ServerConfig};
use shopkit_core::{default_trace, init_tracing, shutdown_signal};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct RegistryServerConfig {
    server: ServerConfig,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config: RegistryServerConfig = config::load("dev").unwrap_or_else(|err| {
        warn!(%err, "No usable configuration found, using defaults");
        RegistryServerConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8761,
            },
        }
    });

    let app = shopkit_registry::router().layer(default_trace());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind registry listener");
    info!(%addr, "Registry server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("registry server failed");

    info!("Registry server stopped");
}
