// Jetpack
// Copyright (C) 2023 - Michael DeHaan <michael@michaeldehaan.net> + contributors
// Copyright (C) 2025 - Riff.CC <https://riff.cc>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// long with this program.  If not, see <http://www.gnu.org/licenses/>.

//! JSON-lines run log. One record per event, appended to the file named by
//! `NETFACTS_LOG`. If the file cannot be opened the log is silently off.

use chrono::prelude::*;
use guid_create::GUID;
use serde_json::json;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

pub const LOG_ENV: &str = "NETFACTS_LOG";
pub const DEFAULT_LOG_PATH: &str = "/var/log/netfacts/netfacts.log";

pub struct RunLog {
    logfile: Option<Mutex<File>>,
    run_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct LogEntry {
    pub event: String,
    pub suite: Option<String>,
    pub case: Option<String>,
    pub subsets: Option<Vec<String>>,
    pub status: Option<String>,
    pub msg: Option<String>,
}

impl LogEntry {
    pub fn new(event: &str) -> Self {
        Self { event: event.to_string(), ..Self::default() }
    }

    pub fn suite(mut self, suite: &str) -> Self {
        self.suite = Some(suite.to_string());
        self
    }

    pub fn case(mut self, case: &str) -> Self {
        self.case = Some(case.to_string());
        self
    }

    pub fn subsets(mut self, subsets: &[String]) -> Self {
        self.subsets = Some(subsets.to_vec());
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl RunLog {

    pub fn from_env() -> Self {
        let logpath = match env::var(LOG_ENV) {
            Ok(x) => x,
            Err(_) => String::from(DEFAULT_LOG_PATH),
        };
        Self::open(Path::new(&logpath))
    }

    pub fn open(path: &Path) -> Self {
        let logfile = OpenOptions::new().create(true).append(true).open(path).ok();
        Self {
            logfile: logfile.map(Mutex::new),
            run_id: GUID::rand().to_string(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            logfile: None,
            run_id: GUID::rand().to_string(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn is_enabled(&self) -> bool {
        self.logfile.is_some()
    }

    pub fn record(&self, entry: LogEntry) {
        let logfile = match &self.logfile {
            Some(x) => x,
            None => return,
        };
        let record = json!({
            "utc": Utc::now().to_rfc3339(),
            "run_id": self.run_id,
            "event": entry.event,
            "suite": entry.suite,
            "case": entry.case,
            "subsets": entry.subsets,
            "status": entry.status,
            "msg": entry.msg,
        });
        if let Ok(mut file) = logfile.lock() {
            // a full disk should not fail the run
            let _ = writeln!(file, "{}", record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_records_are_json_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("netfacts.log");
        let log = RunLog::open(&path);
        assert!(log.is_enabled());

        log.record(LogEntry::new("run_start").suite("cli/facts.yaml"));
        log.record(LogEntry::new("case_ok").case("test getting config facts")
            .subsets(&[String::from("config")]).status("ok"));

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = contents.lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "run_start");
        assert_eq!(lines[1]["subsets"][0], "config");
        assert_eq!(lines[0]["run_id"], lines[1]["run_id"]);
    }

    #[test]
    fn test_unwritable_path_disables() {
        let log = RunLog::open(Path::new("/non/existent/dir/netfacts.log"));
        assert!(!log.is_enabled());
        log.record(LogEntry::new("run_start"));
    }

    #[test]
    fn test_run_ids_differ() {
        assert_ne!(RunLog::disabled().run_id(), RunLog::disabled().run_id());
    }
}
