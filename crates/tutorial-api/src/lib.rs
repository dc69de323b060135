//! Tutorial API
//!
//! HTTP surface over the tutorial store and access gate.
//!
//! Endpoints:
//! - `POST /api/login`, `POST /api/logout`, `GET /api/me`
//! - `GET /api/flow/{id}` returns the raw editor graph
//! - `POST /api/flow/save/{id}` stores, compiles and publishes a graph
//! - `GET|POST /api/tutorials`, `GET /api/tutorials/{id}` for readers
//! - `GET /api/tutorials/{id}/revisions` and
//!   `POST /api/tutorials/{id}/revisions/{revision}/publish` for rollback
//!
//! Writes require a session carried in the `sessionid` cookie.

mod config;
mod cookie;
mod error;
mod handlers;
mod state;

pub use config::{ApiConfig, SESSION_COOKIE};
pub use error::ApiError;
pub use state::AppState;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;

use handlers::{auth, flow, tutorials};

/// Build the application router.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/api/login", post(auth::login))
    .route("/api/logout", post(auth::logout))
    .route("/api/me", get(auth::me))
    .route("/api/flow/{id}", get(flow::get_flow))
    .route("/api/flow/save/{id}", post(flow::save_flow))
    .route("/api/tutorials", get(tutorials::list).post(tutorials::create))
    .route("/api/tutorials/{id}", get(tutorials::detail))
    .route("/api/tutorials/{id}/revisions", get(tutorials::revisions))
    .route(
      "/api/tutorials/{id}/revisions/{revision}/publish",
      post(tutorials::publish),
    )
    .with_state(state)
}

/// Serve the API on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
  tracing::info!(addr = %listener.local_addr()?, "tutorial API listening");

  axum::serve(listener, router(state))
    .with_graceful_shutdown(shutdown_signal())
    .await
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}
