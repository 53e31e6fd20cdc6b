//! `log` facade bridge
//!
//! teloxide and reqwest log through the `log` crate. Their records are routed
//! into our formatter under `LogTag::Other(<crate>)`, so `--debug-teloxide`
//! works like any other module flag.

use super::config::get_logger_config;
use super::core::should_log;
use super::levels::LogLevel;
use super::tags::LogTag;

struct FacadeBridge;

static BRIDGE: FacadeBridge = FacadeBridge;

impl log::Log for FacadeBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        should_log(
            &get_logger_config(),
            &LogTag::from_target(metadata.target()),
            LogLevel::from_facade(metadata.level()),
        )
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        super::format::format_and_log(
            &LogTag::from_target(record.target()),
            LogLevel::from_facade(record.level()),
            &record.args().to_string(),
        );
    }

    fn flush(&self) {
        super::file::flush_file_logging();
    }
}

/// Installs the bridge once; later calls are no-ops
pub fn install() {
    if log::set_logger(&BRIDGE).is_ok() {
        log::set_max_level(log::LevelFilter::Trace);
    }
}
