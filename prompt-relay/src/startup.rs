//! Router assembly and server lifecycle.

use crate::config::RelaySettings;
use crate::handlers::{generate::generate, health::health_check, metrics::metrics};
use crate::services::{HttpTextUpstream, PromptRelay};
use crate::AppState;
use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// `/api/generate` plus health and metrics; every other path is served from
/// the frontend directory.
pub fn build_router(state: AppState, settings: &RelaySettings) -> Router {
    Router::new()
        .route("/api/generate", post(generate))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .fallback_service(ServeDir::new(&settings.frontend.static_dir))
        .layer(DefaultBodyLimit::max(settings.server.body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri().path(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .with_state(state)
}

pub struct Application {
    listener: TcpListener,
    router: Router,
    port: u16,
}

impl Application {
    pub async fn build(settings: RelaySettings) -> anyhow::Result<Self> {
        if !settings.upstream.has_api_key() {
            tracing::warn!("Warning: API_KEY not set. Please set API_KEY in environment.");
        }
        if settings.upstream.url.is_none() {
            tracing::warn!("PROVIDER_URL not set; generate requests will fail until it is configured");
        }

        let upstream = HttpTextUpstream::new(settings.upstream.clone())
            .context("Failed to create HTTP client")?;
        let relay = Arc::new(PromptRelay::new(Arc::new(upstream)));
        let router = build_router(AppState::new(relay), &settings);

        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind to address {}", address))?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            listener,
            router,
            port,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!(port = self.port, "Server listening");
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
