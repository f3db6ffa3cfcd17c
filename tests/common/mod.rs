//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use midway::config::{ServerConfig, TokenConfig};
use midway::http::HttpServer;
use midway::lifecycle::Shutdown;
use midway::routing::Router;
use midway::security::StaticTokens;

/// Serve `router` on an ephemeral loopback port. Trigger the returned
/// `Shutdown` to stop the server.
pub async fn start_server(router: Router, config: ServerConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let tokens = Arc::new(StaticTokens::from_config(&config.auth));
    let server = HttpServer::new(config, router, tokens);

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

/// A token table entry for tests.
#[allow(dead_code)]
pub fn token(token: &str, id: i64, role: &str, employee_id: Option<i64>) -> TokenConfig {
    TokenConfig {
        token: token.into(),
        id,
        email: format!("{role}{id}@park.example"),
        role: role.into(),
        employee_id,
    }
}

/// Client that never goes through a proxy and gives up after a few seconds.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}
