//! Telegram bot instance and command dispatch
//!
//! Long polling through a teloxide `Dispatcher`. `/login` runs one
//! `LoginFlow` per chat on its own task; everything the user sees is built
//! in `formatters`.

use crate::config::{get_config_clone, with_config, Config};
use crate::epic::{AuthenticatedUser, DeviceCodeChallenge};
use crate::logger::{self, LogTag};
use crate::login::{LoginFlow, LoginObserver, LoginReport};
use crate::telegram::formatters;
use crate::telegram::logins::ActiveLogins;
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};
use teloxide::utils::command::BotCommands;
use tokio_util::sync::CancellationToken;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Commands:")]
pub enum Command {
    #[command(description = "welcome message")]
    Start,
    #[command(description = "how the checker works")]
    Help,
    #[command(description = "check your Epic Games account")]
    Login,
    #[command(description = "stop a login that is still waiting")]
    Cancel,
}

/// Telegram bot wrapper owning the per-chat login registry
pub struct TelegramBot {
    bot: Bot,
    logins: ActiveLogins,
}

impl TelegramBot {
    /// Validates the configured token with getMe and registers the command list
    pub async fn initialize() -> Result<Arc<Self>, String> {
        let token = with_config(|c| c.telegram.bot_token.clone());
        if token.trim().is_empty() {
            return Err(format!(
                "No bot token configured (set telegram.bot_token or {})",
                crate::config::BOT_TOKEN_ENV
            ));
        }

        let bot = Bot::new(token.trim());
        match bot.get_me().await {
            Ok(me) => {
                logger::info(
                    LogTag::Telegram,
                    &format!(
                        "Bot initialized: @{} (ID: {})",
                        me.username.as_deref().unwrap_or("unknown"),
                        me.id
                    ),
                );
            }
            Err(e) => {
                logger::error(
                    LogTag::Telegram,
                    &format!("Failed to validate bot token: {}", e),
                );
                return Err(format!("Invalid bot token: {}", e));
            }
        }

        if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
            logger::warning(
                LogTag::Telegram,
                &format!("Failed to register command list: {}", e),
            );
        }

        Ok(Arc::new(Self {
            bot,
            logins: ActiveLogins::new(),
        }))
    }

    /// Dispatches updates until Ctrl+C, then cancels running logins
    pub async fn run(self: Arc<Self>) {
        let handler = Update::filter_message()
            .filter_command::<Command>()
            .endpoint(handle_command);

        logger::info(LogTag::Telegram, "Starting dispatcher with long polling");

        Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![self.clone()])
            .default_handler(|_update| async move {
                logger::verbose(LogTag::Telegram, "Ignoring non-command update");
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "Error in command handler",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        let running = self.logins.len();
        if running > 0 {
            logger::info(
                LogTag::Telegram,
                &format!("Cancelling {} running login(s)", running),
            );
        }
        self.logins.cancel_all();
        logger::info(LogTag::Telegram, "Dispatcher stopped");
    }

    /// Send an HTML message to a chat
    pub async fn send_message(&self, chat: ChatId, message: &str) -> Result<(), String> {
        self.bot
            .send_message(chat, message)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(|e| format!("Failed to send message: {}", e))?;
        Ok(())
    }

    /// Best-effort send; failures are logged
    async fn notify(&self, chat: ChatId, message: &str) {
        if let Err(e) = self.send_message(chat, message).await {
            logger::warning(LogTag::Telegram, &format!("Chat {}: {}", chat.0, e));
        }
    }

    fn start_login(self: &Arc<Self>, chat: ChatId) -> bool {
        let Some(slot) = self.logins.begin(chat) else {
            return false;
        };

        let state = self.clone();
        tokio::spawn(async move {
            state.run_login(chat, slot.token()).await;
            drop(slot);
        });
        true
    }

    async fn run_login(&self, chat: ChatId, cancel: &CancellationToken) {
        self.notify(chat, "⏳ Creating authorization login link...")
            .await;

        let config = get_config_clone();
        let flow = match LoginFlow::from_config(&config) {
            Ok(flow) => flow,
            Err(e) => {
                logger::error(LogTag::Telegram, &format!("Cannot start login: {}", e));
                self.notify(chat, "❌ The checker is temporarily unavailable, please try again later.")
                    .await;
                return;
            }
        };

        let observer = ChatObserver {
            bot: self.bot.clone(),
            chat,
        };
        let label = format!("chat-{}", chat.0);

        match flow.run(&label, &observer, cancel).await {
            Ok(report) => self.deliver_report(chat, &report, &config).await,
            Err(e) => self.notify(chat, &formatters::login_error_message(&e)).await,
        }
    }

    async fn deliver_report(&self, chat: ChatId, report: &LoginReport, config: &Config) {
        let messages = [
            formatters::account_message(&report.account),
            formatters::connections_message(&report.public_info),
            formatters::activity_message(&report.account, &report.public_info),
            formatters::purchases_message(&report.purchases),
            formatters::seasons_message(&report.seasons),
            formatters::locker_message(&report.locker),
            formatters::summary_line(
                &report.locker,
                &report.purchases,
                config.locker.summary_exclusive_limit,
            ),
            formatters::farewell_message(&config.branding),
        ];
        for message in &messages {
            self.notify(chat, message).await;
        }
    }
}

// ============================================================================
// COMMAND HANDLING
// ============================================================================

async fn handle_command(msg: Message, cmd: Command, state: Arc<TelegramBot>) -> ResponseResult<()> {
    let chat = msg.chat.id;
    if with_config(|c| c.telegram.private_chats_only) && !msg.chat.is_private() {
        logger::debug(
            LogTag::Telegram,
            &format!("Ignoring {:?} from non-private chat {}", cmd, chat.0),
        );
        return Ok(());
    }

    logger::debug(
        LogTag::Telegram,
        &format!("Command {:?} from chat {}", cmd, chat.0),
    );

    let branding = with_config(|c| c.branding.clone());
    let commands = Command::descriptions().to_string();

    match cmd {
        Command::Start => {
            state
                .notify(chat, &formatters::welcome_message(&branding, &commands))
                .await
        }
        Command::Help => {
            state
                .notify(chat, &formatters::help_message(&branding, &commands))
                .await
        }
        Command::Login => {
            if !state.start_login(chat) {
                state
                    .notify(chat, "⏳ A login is already running, finish it or use /cancel.")
                    .await;
            }
        }
        Command::Cancel => {
            let reply = if state.logins.cancel(chat) {
                "🛑 Cancelling the running login..."
            } else {
                "Nothing to cancel."
            };
            state.notify(chat, reply).await;
        }
    }
    Ok(())
}

/// Relays login progress to the chat that started it
struct ChatObserver {
    bot: Bot,
    chat: ChatId,
}

impl ChatObserver {
    async fn send(&self, message: &str) {
        if let Err(e) = self
            .bot
            .send_message(self.chat, message)
            .parse_mode(ParseMode::Html)
            .await
        {
            logger::warning(
                LogTag::Telegram,
                &format!("Chat {}: failed to send login progress: {}", self.chat.0, e),
            );
        }
    }
}

#[async_trait]
impl LoginObserver for ChatObserver {
    async fn on_challenge(&self, challenge: &DeviceCodeChallenge) {
        self.send(&formatters::login_link_message(challenge)).await;
    }

    async fn on_authenticated(&self, user: &AuthenticatedUser) {
        self.send(&formatters::logged_in_message(&user.display_name))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse("/login", "skincheck_bot").unwrap(), Command::Login);
        assert_eq!(
            Command::parse("/cancel@skincheck_bot", "skincheck_bot").unwrap(),
            Command::Cancel
        );
        assert!(Command::parse("/style", "skincheck_bot").is_err());
    }

    #[test]
    fn test_descriptions_list_every_command() {
        let descriptions = Command::descriptions().to_string();
        for command in ["/start", "/help", "/login", "/cancel"] {
            assert!(descriptions.contains(command), "missing {}", command);
        }
    }
}
