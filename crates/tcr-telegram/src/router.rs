use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::{info, warn};

use tcr_core::relay::Relay;

use crate::handlers;

/// Drive the long-polling dispatcher until the process exits.
pub async fn run_polling(bot: Bot, relay: Arc<Relay>) -> anyhow::Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(bot = %me.username(), group_id = %relay.group_id(), "telegram bot started"),
        Err(e) => warn!(error = %e, "could not fetch bot identity"),
    }

    let handler = Update::filter_message().endpoint(handlers::handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![relay])
        .default_handler(|_upd| async {})
        .build()
        .dispatch()
        .await;

    warn!("telegram dispatcher stopped");
    Ok(())
}
