//! Daily log file output
//!
//! File writes are best-effort: a log file that cannot be opened or written
//! never interrupts the bot.

use super::config::get_logger_config;
use chrono::Local;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

static LOG_FILE: Lazy<Mutex<Option<BufWriter<File>>>> = Lazy::new(|| Mutex::new(None));

pub fn log_file_name(date: &str) -> String {
    format!("skincheck_{}.log", date)
}

pub fn init_file_logging() {
    if !get_logger_config().file_logging {
        return;
    }

    let date = Local::now().format("%Y-%m-%d").to_string();
    let path = crate::paths::get_logs_directory().join(log_file_name(&date));

    match open_append(&path) {
        Ok(file) => *LOG_FILE.lock() = Some(BufWriter::new(file)),
        Err(e) => eprintln!("Failed to open log file {}: {}", path.display(), e),
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

pub fn write_to_file(line: &str) {
    let mut guard = LOG_FILE.lock();
    if let Some(writer) = guard.as_mut() {
        if writeln!(writer, "{}", line).is_err() {
            // Stop trying after the first failure (disk full, file removed)
            *guard = None;
        }
    }
}

pub fn flush_file_logging() {
    if let Some(writer) = LOG_FILE.lock().as_mut() {
        let _ = writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name() {
        assert_eq!(log_file_name("2026-10-19"), "skincheck_2026-10-19.log");
    }

    #[test]
    fn test_open_append_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("x.log");
        let mut file = open_append(&path).unwrap();
        writeln!(file, "line").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "line\n");
    }
}
