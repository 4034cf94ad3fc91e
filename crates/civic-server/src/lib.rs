//! HTTP front end for the civic service.
//!
//! Mounts the JSON API under `/api`, adds a liveness probe and request
//! tracing. The binary in `main.rs` handles configuration and the listener.

use std::sync::Arc;

use axum::{Router, routing::get};
use civic_core::store::CivicStore;
use civic_store_memory::MemoryStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CIVIC_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
  /// Load the sample records at start-up.
  pub seed: bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: "127.0.0.1".to_owned(),
      port: 3000,
      seed: true,
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// A fresh store according to [`ServerConfig::seed`].
  pub fn open_store(&self) -> MemoryStore {
    if self.seed {
      MemoryStore::seeded()
    } else {
      MemoryStore::empty()
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: CivicStore + 'static,
{
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", civic_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tower::ServiceExt as _;

  use super::*;

  async fn get_status(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    (status, bytes.to_vec())
  }

  #[tokio::test]
  async fn health_is_ok() {
    let app = router(Arc::new(MemoryStore::empty()));
    let (status, body) = get_status(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
  }

  #[tokio::test]
  async fn api_is_nested() {
    let store = Arc::new(ServerConfig::default().open_store());
    let (status, body) = get_status(router(store), "/api/complaints").await;
    assert_eq!(status, StatusCode::OK);
    let list: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(list.as_array().unwrap().len(), 3);

    let (status, _) = get_status(router(Arc::new(MemoryStore::empty())), "/complaints").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn unseeded_store_starts_empty() {
    let cfg = ServerConfig {
      seed: false,
      ..ServerConfig::default()
    };
    let (_, body) = get_status(router(Arc::new(cfg.open_store())), "/api/blood-requests").await;
    assert_eq!(body, b"[]");
  }

  #[test]
  fn config_layers_over_defaults() {
    let settings = config::Config::builder()
      .add_source(config::File::from_str(
        "port = 8080\nseed = false",
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap();
    let cfg: ServerConfig = settings.try_deserialize().unwrap();
    assert_eq!(cfg, ServerConfig {
      host: "127.0.0.1".into(),
      port: 8080,
      seed: false,
    });
    assert_eq!(cfg.address(), "127.0.0.1:8080");
  }
}
