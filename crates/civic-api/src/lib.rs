//! JSON REST API for the civic service.
//!
//! Exposes an axum [`Router`] backed by any [`civic_core::store::CivicStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", civic_api::api_router(store.clone()))
//! ```

pub mod alerts;
pub mod blood_requests;
pub mod chat;
pub mod complaints;
pub mod error;
pub mod events;
pub mod fundraisers;
pub mod query;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  extract::FromRef,
  routing::{get, post},
};
use civic_core::store::CivicStore;

pub use error::ApiError;
pub use events::EventHub;

// ─── State ───────────────────────────────────────────────────────────────────

/// Router state: the store plus the event hub its writers publish to.
///
/// Handlers extract either half with `State<Arc<S>>` or `State<EventHub>`.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub events: EventHub,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  self.store.clone(),
      events: self.events.clone(),
    }
  }
}

impl<S> FromRef<ApiState<S>> for Arc<S> {
  fn from_ref(state: &ApiState<S>) -> Self { state.store.clone() }
}

impl<S> FromRef<ApiState<S>> for EventHub {
  fn from_ref(state: &ApiState<S>) -> Self { state.events.clone() }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store` with its own
/// [`EventHub`].
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type. Clones of the router share the hub.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CivicStore + 'static,
{
  api_router_with_events(store, EventHub::default())
}

/// Like [`api_router`], publishing record changes to `events`.
pub fn api_router_with_events<S>(store: Arc<S>, events: EventHub) -> Router<()>
where
  S: CivicStore + 'static,
{
  Router::new()
    // Complaints
    .route(
      "/complaints",
      get(complaints::list::<S>).post(complaints::create::<S>),
    )
    .route("/complaints/{id}", get(complaints::get_one::<S>))
    .route("/complaints/{id}/status", post(complaints::set_status::<S>))
    // Blood requests
    .route(
      "/blood-requests",
      get(blood_requests::list::<S>).post(blood_requests::create::<S>),
    )
    // Fundraisers
    .route(
      "/fundraisers",
      get(fundraisers::list::<S>).post(fundraisers::create::<S>),
    )
    .route("/fundraisers/{id}/donate", post(fundraisers::donate::<S>))
    // Emergency alerts
    .route("/alerts", get(alerts::list::<S>).post(alerts::receive::<S>))
    // Assistant & dashboard
    .route("/chat", post(chat::handler))
    .route("/stats", get(stats::handler::<S>))
    // Live notifications
    .route("/events", get(events::stream))
    .with_state(ApiState { store, events })
}

#[cfg(test)]
mod tests;
