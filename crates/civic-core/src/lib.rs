//! Core types and trait definitions for the Civic engagement service.
//!
//! This crate has no HTTP or runtime dependencies. It holds
//! the record families, the listing pipeline shared by every request view,
//! form validation, the first-aid chat responder and the seed data.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod chat;
pub mod complaint;
pub mod donation;
pub mod emergency;
pub mod error;
pub mod event;
pub mod fundraiser;
pub mod listing;
pub mod seed;
pub mod stats;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
