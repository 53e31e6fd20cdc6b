use anyhow::Context;
use skincheck::{
    arguments::{config_path_override, is_help_requested, print_help},
    config,
    logger::{self, LogTag},
    paths,
    telegram::TelegramBot,
};

/// Main entry point for the skincheck bot
///
/// Startup order matters: directories before the logger (it opens a log
/// file), `.env` before the config (it may carry the bot token).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = paths::ensure_all_directories() {
        eprintln!("❌ Failed to create required directories: {}", e);
        std::process::exit(1);
    }

    logger::init();

    if is_help_requested() {
        print_help();
        return Ok(());
    }

    if dotenv::dotenv().is_ok() {
        logger::debug(LogTag::Config, "Loaded environment from .env");
    }

    logger::info(LogTag::System, "🚀 skincheck starting up...");

    config::load_config()
        .map_err(anyhow::Error::msg)
        .context("Failed to load configuration")?;
    let config_path = config_path_override()
        .unwrap_or_else(|| paths::get_config_path().to_string_lossy().into_owned());
    logger::info(
        LogTag::Config,
        &format!("Configuration loaded from {}", config_path),
    );

    spawn_reload_on_sighup();

    let bot = TelegramBot::initialize()
        .await
        .map_err(anyhow::Error::msg)
        .context("Failed to start the Telegram bot")?;
    bot.run().await;

    logger::info(LogTag::System, "👋 skincheck stopped");
    logger::flush();
    Ok(())
}

/// `kill -HUP` reloads config.toml; running logins keep the config they started with
fn spawn_reload_on_sighup() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(hangup) => hangup,
            Err(e) => {
                logger::warning(
                    LogTag::Config,
                    &format!("Cannot install SIGHUP handler, reload disabled: {}", e),
                );
                return;
            }
        };

        tokio::spawn(async move {
            while hangup.recv().await.is_some() {
                match config::reload_config() {
                    Ok(()) => logger::info(LogTag::Config, "Configuration reloaded"),
                    Err(e) => logger::error(
                        LogTag::Config,
                        &format!("Configuration reload failed: {}", e),
                    ),
                }
            }
        });
    }
}
