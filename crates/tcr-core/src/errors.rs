use crate::domain::ConnectionId;

/// Core error type for the relay.
///
/// Adapter crates should map their specific errors into this type so the relay
/// can handle failures consistently (logged and dropped vs surfaced to a session).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),

    #[error("session {0} has not joined the chat")]
    NotJoined(ConnectionId),

    #[error("unknown session {0}")]
    UnknownSession(ConnectionId),
}

pub type Result<T> = std::result::Result<T, Error>;
