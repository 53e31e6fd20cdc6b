//! Centralized argument handling for the skincheck bot
//!
//! Arguments are captured once into a process-wide store so the logger, config
//! loader and binary all read the same view. Tests can override the store with
//! `set_cmd_args`; the pure `*_in` helpers take an explicit slice instead.
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => {
            // Fallback to env::args if mutex is poisoned
            env::args().collect()
        }
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    has_arg_in(&get_cmd_args(), arg)
}

/// Gets the value following a flag (`--config path`)
pub fn get_arg_value(flag: &str) -> Option<String> {
    get_arg_value_in(&get_cmd_args(), flag)
}

pub fn has_arg_in(args: &[String], arg: &str) -> bool {
    args.iter().any(|a| a == arg)
}

pub fn get_arg_value_in(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .filter(|value| !value.starts_with("--"))
        .cloned()
}

/// Collects the module keys of every `<prefix><module>` flag, e.g. `--debug-auth` -> `auth`
pub fn flag_suffixes_in(args: &[String], prefix: &str) -> Vec<String> {
    args.iter()
        .filter_map(|a| a.strip_prefix(prefix))
        .filter(|suffix| !suffix.is_empty())
        .map(|suffix| suffix.to_lowercase())
        .collect()
}

// =============================================================================
// FLAG HELPERS
// =============================================================================

pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

pub fn is_verbose_enabled() -> bool {
    has_arg("--verbose")
}

pub fn is_quiet_enabled() -> bool {
    has_arg("--quiet")
}

/// Config file override (`--config <path>`)
pub fn config_path_override() -> Option<String> {
    get_arg_value("--config")
}

/// Modules with `--debug-<module>` enabled
pub fn debug_modules() -> Vec<String> {
    flag_suffixes_in(&get_cmd_args(), "--debug-")
}

/// Modules with `--verbose-<module>` enabled
pub fn verbose_modules() -> Vec<String> {
    flag_suffixes_in(&get_cmd_args(), "--verbose-")
}

pub fn print_help() {
    println!("skincheck - Telegram locker checker for Epic Games accounts");
    println!();
    println!("USAGE:");
    println!("    skincheck [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --config <path>        Load configuration from <path> instead of data/config.toml");
    println!("    --verbose              Show verbose logs for every module");
    println!("    --quiet                Only show errors");
    println!("    --debug-<module>       Show debug logs for one module");
    println!("                           (auth, account, profile, catalog, locker, login, http, telegram, config)");
    println!("    --verbose-<module>     Show verbose logs for one module");
    println!("    -h, --help             Print this help");
    println!();
    println!("ENVIRONMENT:");
    println!("    SKINCHECK_BOT_TOKEN    Telegram bot token (overrides telegram.bot_token)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_has_arg_in() {
        let a = args(&["skincheck", "--debug-auth"]);
        assert!(has_arg_in(&a, "--debug-auth"));
        assert!(!has_arg_in(&a, "--debug-locker"));
    }

    #[test]
    fn test_get_arg_value_in() {
        let a = args(&["skincheck", "--config", "/tmp/bot.toml", "--verbose"]);
        assert_eq!(get_arg_value_in(&a, "--config"), Some("/tmp/bot.toml".to_string()));
        assert_eq!(get_arg_value_in(&a, "--verbose"), None);
        assert_eq!(get_arg_value_in(&a, "--missing"), None);
    }

    #[test]
    fn test_flag_value_must_not_be_another_flag() {
        let a = args(&["skincheck", "--config", "--verbose"]);
        assert_eq!(get_arg_value_in(&a, "--config"), None);
    }

    #[test]
    fn test_flag_suffixes() {
        let a = args(&["skincheck", "--debug-Auth", "--debug-locker", "--verbose-http", "--debug-"]);
        assert_eq!(flag_suffixes_in(&a, "--debug-"), vec!["auth", "locker"]);
        assert_eq!(flag_suffixes_in(&a, "--verbose-"), vec!["http"]);
    }
}
