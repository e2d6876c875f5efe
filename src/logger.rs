/*
 * This file is part of Jetfan.
 *
 * Copyright (C) 2025 Jetfan contributors
 *
 * Jetfan is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Jetfan is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Jetfan. If not, see <https://www.gnu.org/licenses/>.
 */

//! JSON-lines event log. Every call is a no-op until [`init_logging`] (or
//! [`init_logging_at`]) has opened a file, so library code can log
//! unconditionally.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use lazy_static::lazy_static;
use serde_json::{json, Value};

pub const DEFAULT_LOG_PATH: &str = "/var/log/jetfan/events.json";
const FALLBACK_LOG_PATH: &str = "/tmp/jetfan_events.json";

lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Open the default log file, falling back to /tmp when /var/log is not writable.
pub fn init_logging() {
    if init_logging_at(Path::new(DEFAULT_LOG_PATH)).is_err() {
        let _ = init_logging_at(Path::new(FALLBACK_LOG_PATH));
    }
}

pub fn init_logging_at(path: &Path) -> io::Result<()> {
    let f = open_append(path)?;
    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = Some(f);
    }
    Ok(())
}

pub fn is_enabled() -> bool {
    LOG_FILE.lock().map(|g| g.is_some()).unwrap_or(false)
}

pub fn shutdown_logging() {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(f) = guard.as_mut() {
            let _ = f.flush();
        }
        *guard = None;
    }
}

pub fn format_event(event: &str, data: Value) -> String {
    json!({
        "ts_ms": now_millis(),
        "event": event,
        "data": data,
    })
    .to_string()
}

pub fn log_event(event: &str, data: Value) {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(f) = guard.as_mut() {
            let _ = writeln!(f, "{}", format_event(event, data));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_format_event_shape() {
        let line = format_event("pwm_write", json!({ "duty": 127 }));
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "pwm_write");
        assert_eq!(parsed["data"]["duty"], 127);
        assert!(parsed["ts_ms"].as_u64().unwrap() > 0);
    }

    #[test]
    #[serial]
    fn test_log_event_appends_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs/events.json");
        init_logging_at(&path).unwrap();
        assert!(is_enabled());

        log_event("startup", json!({ "mode": "test" }));
        log_event("fatal_error", json!({ "error": "boom" }));
        shutdown_logging();
        assert!(!is_enabled());

        // Other tests may log concurrently; only look at our own events
        let contents = fs::read_to_string(&path).unwrap();
        let events: Vec<Value> = contents
            .lines()
            .map(|l| serde_json::from_str::<Value>(l).unwrap())
            .filter(|v| v["event"] == "startup" || v["event"] == "fatal_error")
            .collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["data"]["mode"], "test");
        assert_eq!(events[1]["data"]["error"], "boom");
    }

    #[test]
    #[serial]
    fn test_log_event_after_shutdown_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        init_logging_at(&path).unwrap();
        log_event("startup", json!({}));
        shutdown_logging();
        let before = fs::read_to_string(&path).unwrap();

        log_event("ignored", json!({ "after": "shutdown" }));
        assert!(!is_enabled());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert!(!before.contains("ignored"));
    }
}
