//! `POST /chat`: the first-aid responder.

use axum::Json;
use civic_core::chat::{self, ChatReply, ChatRequest};

use crate::error::ApiError;

pub async fn handler(
  Json(body): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
  let reply =
    chat::respond(&body.message).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  Ok(Json(ChatReply {
    reply: reply.to_owned(),
  }))
}
