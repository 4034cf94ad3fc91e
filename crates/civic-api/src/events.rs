//! `GET /events`: server-sent notifications of new and changed records.
//!
//! Each SSE message carries the event name in `event:` and the tagged
//! [`CivicEvent`] JSON in `data:`. A client that falls too far behind skips
//! the events it missed and carries on.

use std::convert::Infallible;

use axum::{
  extract::State,
  response::sse::{Event, KeepAlive, Sse},
};
use civic_core::event::CivicEvent;
use futures::{Stream, stream};
use tokio::sync::broadcast::{self, error::RecvError};

/// How many undelivered events each subscriber may fall behind by.
pub const EVENT_CAPACITY: usize = 64;

/// Fan-out point for [`CivicEvent`]s. Clones share one channel.
#[derive(Clone)]
pub struct EventHub {
  sender: broadcast::Sender<CivicEvent>,
}

impl EventHub {
  pub fn new(capacity: usize) -> Self {
    let (sender, _) = broadcast::channel(capacity);
    Self { sender }
  }

  /// Send `event` to every current subscriber.
  pub fn publish(&self, event: CivicEvent) {
    let name = event.name();
    // No subscribers is the normal idle case.
    let delivered = self.sender.send(event).unwrap_or(0);
    tracing::debug!(event = name, delivered, "event published");
  }

  pub fn subscribe(&self) -> broadcast::Receiver<CivicEvent> { self.sender.subscribe() }
}

impl Default for EventHub {
  fn default() -> Self { Self::new(EVENT_CAPACITY) }
}

fn to_sse(event: &CivicEvent) -> Event {
  Event::default()
    .event(event.name())
    .json_data(event)
    .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()))
}

/// `GET /events`
pub async fn stream(
  State(hub): State<EventHub>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
  tracing::debug!("event subscriber connected");
  let events = stream::unfold(hub.subscribe(), |mut rx| async move {
    loop {
      match rx.recv().await {
        Ok(event) => return Some((Ok(to_sse(&event)), rx)),
        Err(RecvError::Lagged(skipped)) => {
          tracing::warn!(skipped, "event subscriber lagged");
        }
        Err(RecvError::Closed) => return None,
      }
    }
  });
  Sse::new(events).keep_alive(KeepAlive::default())
}
