//! Structured logging for skincheck
//!
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<module> flags
//! - Dual output: colored console + daily log file
//! - Bridge for the `log` facade so teloxide/reqwest records share the format
//!
//! ## Usage
//!
//! ```rust,ignore
//! use skincheck::logger::{self, LogTag};
//!
//! logger::error(LogTag::Auth, "Service token rejected");
//! logger::warning(LogTag::Catalog, "Chunk 2/3 failed, continuing");
//! logger::info(LogTag::Login, "Login completed");
//! logger::debug(LogTag::Http, "POST https://..."); // Only with --debug-http
//! logger::verbose(LogTag::Locker, "Raw variants: ..."); // Only with --verbose
//! ```
//!
//! Call `logger::init()` once at startup, after `paths::ensure_all_directories()`.

mod bridge;
mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, init_from_args, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// 1. Parse command-line arguments for debug flags
/// 2. Open the daily log file
/// 3. Install the `log` facade bridge
pub fn init() {
    config::init_from_args();
    file::init_file_logging();
    bridge::install();
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (shown unless --quiet)
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (normal operation)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level, only shown with --debug-<module> for the tag
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level, only shown with --verbose or --verbose-<module>
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush pending log file writes
pub fn flush() {
    file::flush_file_logging();
}

/// Shortens a secret for log output: first 6 characters followed by `…`
pub fn redact(secret: &str) -> String {
    let prefix: String = secret.chars().take(6).collect();
    if prefix.len() == secret.len() {
        "…".to_string()
    } else {
        format!("{}…", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_never_leaks_full_secret() {
        assert_eq!(redact("eg1~abcdefghijklmnop"), "eg1~ab…");
        assert_eq!(redact("short"), "…");
        assert_eq!(redact(""), "…");
    }
}
