//! Telegram update handlers.
//!
//! Only text messages are relayed; everything else is dropped here so the core
//! never sees an update without text or sender.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};
use tracing::debug;

use tcr_core::relay::Relay;

mod text;

pub async fn handle_message(msg: Message, relay: Arc<Relay>) -> ResponseResult<()> {
    if msg.text().is_some() {
        return text::handle_text(msg, relay).await;
    }

    debug!(chat_id = msg.chat.id.0, "ignoring non-text update");
    Ok(())
}
