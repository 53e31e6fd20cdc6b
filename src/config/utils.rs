//! Configuration utilities - loading, reloading, and access helpers
//!
//! - Loading configuration from disk
//! - Hot-reloading configuration at runtime
//! - Thread-safe access helpers

use super::schemas::Config;
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::RwLock;

/// Global configuration instance
///
/// Single source of truth for all configuration values. Read it through
/// `with_config` or `get_config_clone`.
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Environment variable that overrides `telegram.bot_token`
pub const BOT_TOKEN_ENV: &str = "SKINCHECK_BOT_TOKEN";

/// Load configuration from the default path (or `--config <path>`) and
/// initialize the global CONFIG
pub fn load_config() -> Result<(), String> {
    let path = crate::arguments::config_path_override()
        .unwrap_or_else(|| crate::paths::get_config_path().to_string_lossy().into_owned());
    load_config_from_path(&path)
}

/// Load configuration from a specific file path
///
/// A missing file is not an error: defaults are used and a warning printed.
pub fn load_config_from_path(path: &str) -> Result<(), String> {
    let mut config = if Path::new(path).exists() {
        read_config_file(path)?
    } else {
        eprintln!("⚠️  Config file '{}' not found, using default values", path);
        Config::default()
    };

    apply_env_overrides(&mut config, std::env::var(BOT_TOKEN_ENV).ok());

    CONFIG
        .set(RwLock::new(config))
        .map_err(|_| "Config already initialized".to_string())?;

    Ok(())
}

/// Reload configuration from the path `load_config()` used
pub fn reload_config() -> Result<(), String> {
    let path = crate::arguments::config_path_override()
        .unwrap_or_else(|| crate::paths::get_config_path().to_string_lossy().into_owned());
    reload_config_from_path(&path)
}

/// Reload configuration from disk, replacing the in-memory copy atomically
pub fn reload_config_from_path(path: &str) -> Result<(), String> {
    let mut new_config = read_config_file(path)?;
    apply_env_overrides(&mut new_config, std::env::var(BOT_TOKEN_ENV).ok());

    if let Some(config_lock) = CONFIG.get() {
        let mut config = config_lock
            .write()
            .map_err(|e| format!("Failed to acquire config write lock: {}", e))?;
        *config = new_config;
        Ok(())
    } else {
        Err("Config not initialized. Call load_config() first.".to_string())
    }
}

pub fn parse_config(contents: &str) -> Result<Config, String> {
    toml::from_str::<Config>(contents).map_err(|e| format!("Failed to parse config: {}", e))
}

fn read_config_file(path: &str) -> Result<Config, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path, e))?;

    parse_config(&contents).map_err(|e| format!("{} ('{}')", e, path))
}

fn apply_env_overrides(config: &mut Config, bot_token: Option<String>) {
    if let Some(token) = bot_token.filter(|t| !t.trim().is_empty()) {
        config.telegram.bot_token = token.trim().to_string();
    }
}

/// Execute a function with read access to the configuration
///
/// Falls back to defaults when `load_config()` has not run, so library code
/// stays usable from tests and embedding callers.
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    match CONFIG.get() {
        Some(lock) => match lock.read() {
            Ok(config) => f(&config),
            Err(poisoned) => f(&poisoned.into_inner()),
        },
        None => f(&Config::default()),
    }
}

/// Clone of the entire configuration, for use across await points
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse_config(
            r#"
            [epic]
            poll_interval_secs = 5

            [catalog]
            batch_size = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.epic.poll_interval_secs, 5);
        assert_eq!(config.epic.request_timeout_secs, 30);
        assert_eq!(config.catalog.batch_size, 25);
        assert_eq!(config.catalog.base_url, "https://fortnite-api.com");
        assert_eq!(config.locker.exclusive_list_path, "exclusive.txt");
        assert!(config.telegram.private_chats_only);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config.epic.poll_interval_secs, 10);
        assert_eq!(config.catalog.batch_size, 50);
    }

    #[test]
    fn test_invalid_types_are_rejected() {
        assert!(parse_config("[epic]\npoll_interval_secs = \"soon\"").is_err());
    }

    #[test]
    fn test_env_token_override() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, Some("  123:abc  ".to_string()));
        assert_eq!(config.telegram.bot_token, "123:abc");

        apply_env_overrides(&mut config, Some("   ".to_string()));
        assert_eq!(config.telegram.bot_token, "123:abc");
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let mut config = Config::default();
        config.branding.bot_name = "Rift Checker".to_string();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = parse_config(&text).unwrap();
        assert_eq!(parsed.branding.bot_name, "Rift Checker");
    }
}
