mod handlers;

use std::{net::SocketAddr, sync::Arc};

use async_trait::async_trait;
use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, patch, post},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  services::ServeDir,
  trace::TraceLayer,
};

use crate::{prelude::*, state::AppState, sv::upload::PUBLIC_PREFIX};

/// Routes without rate limiting, which needs the peer address.
pub fn router(app: Arc<AppState>) -> Router {
  let admin = Router::new()
    .route(
      "/releases/{id}",
      patch(handlers::update_release).delete(handlers::delete_release),
    )
    .route("/status", post(handlers::update_status))
    .route(
      "/upload",
      post(handlers::upload)
        .layer(DefaultBodyLimit::max(app.config.max_upload_bytes)),
    );

  Router::new()
    .route("/health", get(handlers::health))
    .route(
      "/api/releases",
      get(handlers::list_releases).post(handlers::create_release),
    )
    .route("/api/releases/latest", get(handlers::latest_release))
    .route("/api/releases/{id}/download", post(handlers::track_download))
    .route("/api/status", get(handlers::get_status))
    .nest("/api/admin", admin)
    .nest_service(PUBLIC_PREFIX, ServeDir::new(&app.config.uploads_directory))
    .with_state(app)
}

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let governor_conf = Arc::new(
      GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(100)
        .finish()
        .context("Failed to build rate limiter config")?,
    );

    let limiter = governor_conf.limiter().clone();
    let addr = SocketAddr::from(([0, 0, 0, 0], app.config.port));

    let router = router(app)
      .layer(
        ServiceBuilder::new()
          .layer(TraceLayer::new_for_http())
          .layer(GovernorLayer::new(governor_conf))
          .layer(
            CorsLayer::new()
              .allow_origin(Any)
              .allow_methods(Any)
              .allow_headers(Any),
          ),
      )
      .into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(addr)
      .await
      .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP Server listening on {addr}");

    let limiter = async {
      loop {
        tokio::time::sleep(Duration::from_secs(60)).await;
        limiter.retain_recent();
      }
    };

    let server = async {
      axum::serve(listener, router).await.context("Axum server error")
    };

    tokio::select! {
      result = server => {
        match &result {
          Ok(_) => info!("Server stopped gracefully"),
          Err(err) => error!("Server stopped with error: {err}"),
        }
        result
      }
      _ = limiter => {
        error!("Rate limiter cleaner stopped unexpectedly!");
        Ok(())
      }
    }
  }
}
