//! Append-only log of accepted messages.
//!
//! One line per message: `YYYY-MM-DD HH:MM:SS - <sender ip> - <message>`.

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Message history file.
#[derive(Debug)]
pub struct MessageHistory {
    path: PathBuf,
    /// Serializes appends from concurrent handlers.
    lock: Mutex<()>,
}

impl MessageHistory {
    /// Log to `path`, creating it on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry stamped with the local time.
    pub fn record(&self, sender: IpAddr, message: &str) -> io::Result<()> {
        let line = format_entry(&Local::now(), sender, message);
        let _guard = self
            .lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

/// Format one history line, newline included.
///
/// Line breaks inside the message are flattened so every entry stays on
/// one line.
pub fn format_entry<Tz>(at: &DateTime<Tz>, sender: IpAddr, message: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let message = message.trim().replace(['\r', '\n'], " ");
    format!("{} - {} - {}\n", at.format("%Y-%m-%d %H:%M:%S"), sender, message)
}
