//! Core domain + application logic for the Telegram chatroom relay.
//!
//! This crate is intentionally framework-agnostic. Telegram and the browser
//! socket server live in adapter crates; the relay only sees them through the
//! `MessagingPort` trait and per-session outboxes.

pub mod config;
pub mod domain;
pub mod errors;
pub mod fabric;
pub mod history;
pub mod logging;
pub mod messaging;
pub mod protocol;
pub mod registry;
pub mod relay;

pub use errors::{Error, Result};
