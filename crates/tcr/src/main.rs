use std::sync::Arc;

use tracing::info;

use tcr_core::{config::Config, relay::Relay};
use tcr_telegram::TelegramMessenger;

#[tokio::main]
async fn main() -> Result<(), tcr_core::Error> {
    tcr_core::logging::init("tcr")?;

    let cfg = Arc::new(Config::load()?);
    info!(group_id = %cfg.group_id, public_dir = %cfg.public_dir.display(), "starting relay");

    let messenger = TelegramMessenger::from_token(cfg.bot_token.clone());
    let relay = Arc::new(Relay::new(cfg.group_id, Arc::new(messenger.clone())));
    let router = tcr_web::build_router(relay.clone(), &cfg.public_dir);

    tokio::select! {
        res = tcr_web::serve(cfg.listen_addr(), router) => {
            res.map_err(|e| tcr_core::Error::External(format!("web server failed: {e}")))?;
        }
        res = tcr_telegram::router::run_polling(messenger.bot(), relay) => {
            res.map_err(|e| tcr_core::Error::External(format!("telegram bot failed: {e}")))?;
        }
    }

    Ok(())
}
