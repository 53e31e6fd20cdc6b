//! Logger configuration derived from command-line flags

use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Messages above this level are dropped (Debug/Verbose have extra gates)
    pub min_level: LogLevel,
    /// Tags with `--debug-<key>`
    pub debug_tags: HashSet<String>,
    /// Tags with `--verbose-<key>`
    pub verbose_tags: HashSet<String>,
    /// Empty = every tag enabled
    pub enabled_tags: HashSet<String>,
    pub file_logging: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
            file_logging: true,
        }
    }
}

impl LoggerConfig {
    /// Builds the config from an argument list
    pub fn from_args(args: &[String]) -> Self {
        let debug_tags: HashSet<String> = arguments::flag_suffixes_in(args, "--debug-")
            .into_iter()
            .collect();
        let verbose_tags: HashSet<String> = arguments::flag_suffixes_in(args, "--verbose-")
            .into_iter()
            .collect();

        let min_level = if arguments::has_arg_in(args, "--quiet") {
            LogLevel::Error
        } else if arguments::has_arg_in(args, "--verbose") {
            LogLevel::Verbose
        } else if !debug_tags.is_empty() || !verbose_tags.is_empty() {
            // Per-tag gates decide; the threshold must let them through
            LogLevel::Verbose
        } else {
            LogLevel::Info
        };

        Self {
            min_level,
            debug_tags,
            verbose_tags,
            enabled_tags: HashSet::new(),
            file_logging: !arguments::has_arg_in(args, "--no-log-file"),
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn init_from_args() {
    set_logger_config(LoggerConfig::from_args(&arguments::get_cmd_args()));
}

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

pub fn is_debug_enabled_for_tag(config: &LoggerConfig, tag: &LogTag) -> bool {
    let global_verbose = config.min_level == LogLevel::Verbose
        && config.debug_tags.is_empty()
        && config.verbose_tags.is_empty();

    global_verbose || config.debug_tags.contains(&tag.to_debug_key())
}

pub fn is_verbose_enabled_for_tag(config: &LoggerConfig, tag: &LogTag) -> bool {
    config.verbose_tags.contains(&tag.to_debug_key())
}
