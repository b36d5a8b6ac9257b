use async_trait::async_trait;

use crate::{domain::ChatId, Result};

/// Outbound side of the group channel.
///
/// Telegram is the only implementation; tests substitute a recording fake.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Post a plain-text line to a chat.
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;
}
