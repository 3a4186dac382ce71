//! Telegram launcher bot: answers `/start` with a single web-app button that
//! opens the deployed game.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, ReplyParameters, WebAppInfo};
use teloxide::utils::command::BotCommands;
use url::Url;

use crate::error::BotError;

/// Where the button points when `KYBNK_GAME_URL` is not set.
pub const DEFAULT_GAME_URL: &str =
    "https://api.cloudflare.com/client/v4/accounts/cec8d068d1d126954dfc583292897621/tokens/verify";

pub const GAME_URL_ENV: &str = "KYBNK_GAME_URL";

pub const BUTTON_TEXT: &str = "🍊 Играть в KYBNK Clicker";

pub const GREETING: &str =
    "Добро пожаловать в KYBNK Clicker!\n\nНажмите кнопку ниже, чтобы начать игру:";

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "open the clicker")]
    Start,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotConfig {
    pub game_url: Url,
    pub button_text: String,
    pub greeting: String,
}

impl BotConfig {
    pub fn new(game_url: &str) -> Result<Self, BotError> {
        Ok(Self {
            game_url: Url::parse(game_url)?,
            button_text: BUTTON_TEXT.into(),
            greeting: GREETING.into(),
        })
    }

    /// Game URL from `KYBNK_GAME_URL`, falling back to [`DEFAULT_GAME_URL`].
    /// The bot token itself is read by teloxide from `TELOXIDE_TOKEN`.
    pub fn from_env() -> Result<Self, BotError> {
        match std::env::var(GAME_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::new(DEFAULT_GAME_URL),
        }
    }
}

/// The one message sent in response to `/start`.
#[derive(Clone, Debug, PartialEq)]
pub struct StartReply {
    pub text: String,
    pub markup: InlineKeyboardMarkup,
}

pub fn start_reply(config: &BotConfig) -> StartReply {
    let button = InlineKeyboardButton::web_app(
        config.button_text.clone(),
        WebAppInfo { url: config.game_url.clone() },
    );
    StartReply {
        text: config.greeting.clone(),
        markup: InlineKeyboardMarkup::new([[button]]),
    }
}

async fn answer(bot: Bot, msg: Message, cmd: Command, config: Arc<BotConfig>) -> ResponseResult<()> {
    match cmd {
        Command::Start => {
            let user = msg.from.as_ref().map(|u| u.id.0.to_string()).unwrap_or_else(|| "unknown".into());
            log::info!("User {user} started the bot");
            let reply = start_reply(&config);
            let sent = bot
                .send_message(msg.chat.id, reply.text)
                .parse_mode(ParseMode::Html)
                .reply_parameters(ReplyParameters::new(msg.id))
                .reply_markup(reply.markup)
                .await;
            match sent {
                Ok(_) => log::info!("Start message sent successfully"),
                Err(e) => log::error!("Error sending start message: {e}"),
            }
        }
    }
    Ok(())
}

/// Drop any webhook and long-poll until Ctrl-C.
pub async fn run(bot: Bot, config: BotConfig) -> Result<(), BotError> {
    log::info!("Starting bot...");
    bot.delete_webhook().drop_pending_updates(true).await?;
    log::info!("Webhook deleted");

    let handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(answer);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![Arc::new(config)])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    log::info!("Bot stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn test_start_command_parses() {
        assert_eq!(Command::parse("/start", "kybnk_bot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/start@kybnk_bot", "kybnk_bot").unwrap(), Command::Start);
        assert!(Command::parse("/play", "kybnk_bot").is_err());
    }

    #[test]
    fn test_start_reply_has_one_web_app_button() {
        let cfg = BotConfig::new("https://example.com/game").unwrap();
        let reply = start_reply(&cfg);
        assert_eq!(reply.text, GREETING);
        let buttons: Vec<_> = reply.markup.inline_keyboard.iter().flatten().collect();
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].text, BUTTON_TEXT);
        match &buttons[0].kind {
            InlineKeyboardButtonKind::WebApp(info) => {
                assert_eq!(info.url.as_str(), "https://example.com/game")
            }
            other => panic!("unexpected button kind {other:?}"),
        }
    }

    #[test]
    fn test_default_url_is_valid() {
        let cfg = BotConfig::new(DEFAULT_GAME_URL).unwrap();
        assert_eq!(cfg.game_url.scheme(), "https");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(matches!(BotConfig::new("not a url"), Err(BotError::Url(_))));
    }
}
