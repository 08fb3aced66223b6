use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::StatusCode;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;

use crate::api::{self, SharedState};
use crate::config::ServerConfig;

/// Plan requests are small JSON documents
const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn app(state: SharedState, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(state))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_seconds.into()),
        ))
        .layer(cors)
}

pub async fn run(state: SharedState, config: &ServerConfig) -> Result<()> {
    let app = app(state, config);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    #[cfg(feature = "tls")]
    if let (Some(cert), Some(key)) = (&config.tls_cert, &config.tls_key) {
        let tls = axum_server::tls_rustls::RustlsConfig::from_pem_file(cert, key)
            .await
            .with_context(|| format!("Failed to load TLS certificate '{cert}' and key '{key}'"))?;
        tracing::info!("Web server running at https://localhost:{}", config.port);
        axum_server::bind_rustls(addr, tls)
            .serve(app.into_make_service())
            .await
            .context("HTTPS server failed")?;
        return Ok(());
    }

    tracing::info!("Web server running at http://localhost:{}", config.port);
    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .with_context(|| format!("HTTP server on {addr} failed"))?;
    Ok(())
}
