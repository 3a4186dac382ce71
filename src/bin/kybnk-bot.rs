//! Telegram launcher for the KYBNK clicker.
//!
//! Env: `TELOXIDE_TOKEN` (required), `KYBNK_GAME_URL` (optional), `RUST_LOG`.

use kybnk_clicker::bot::{self, BotConfig};
use teloxide::Bot;

#[tokio::main]
async fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Bot configuration invalid: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = bot::run(Bot::from_env(), config).await {
        log::error!("Bot failed: {e}");
        std::process::exit(1);
    }
    log::info!("Bot session closed");
}
