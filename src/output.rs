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

use crate::error::NetfactsError;
use crate::facts::result::FactsResult;
use crate::harness::assertions::AssertionFailure;
use crate::harness::case::FactsCase;
use crate::util::terminal::{banner, captioned_display, two_column_table};
use std::sync::Arc;
use inline_colorization::{color_red, color_green, color_yellow, color_reset};

/// Trait for handling output from a facts run
pub trait OutputHandler: Send + Sync {
    /// `marker` is the rendered START message
    fn on_run_start(&self, marker: &str);
    /// `marker` is the rendered END message, present only when every case passed
    fn on_run_end(&self, marker: Option<&str>, success: bool);

    fn on_case_start(&self, case: &FactsCase);
    fn on_case_passed(&self, case: &FactsCase, result: &FactsResult, assertions: usize);
    fn on_case_failed(&self, failure: &AssertionFailure);
    fn on_case_error(&self, _case: &FactsCase, _error: &NetfactsError) {}

    fn on_recap(&self, recap_data: RecapData);

    fn log(&self, level: LogLevel, message: &str);
    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }
    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }
    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }
    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecapData {
    pub suite: String,
    pub passed: usize,
    pub failed: usize,
    /// cases never reached because an earlier one failed
    pub skipped: usize,
}

/// A no-op output handler for when output is not needed
pub struct NullOutputHandler;

impl OutputHandler for NullOutputHandler {
    fn on_run_start(&self, _marker: &str) {}
    fn on_run_end(&self, _marker: Option<&str>, _success: bool) {}
    fn on_case_start(&self, _case: &FactsCase) {}
    fn on_case_passed(&self, _case: &FactsCase, _result: &FactsResult, _assertions: usize) {}
    fn on_case_failed(&self, _failure: &AssertionFailure) {}
    fn on_recap(&self, _recap_data: RecapData) {}
    fn log(&self, _level: LogLevel, _message: &str) {}
}

/// Terminal output in the same banner style as playbook runs
pub struct TerminalOutputHandler {
    pub verbosity: u32,
}

impl TerminalOutputHandler {
    pub fn new(verbosity: u32) -> Self {
        Self { verbosity }
    }
}

impl OutputHandler for TerminalOutputHandler {
    fn on_run_start(&self, marker: &str) {
        banner(&format!("DEBUG: {}", marker));
    }

    fn on_run_end(&self, marker: Option<&str>, success: bool) {
        match marker {
            Some(m) => {
                println!();
                banner(&format!("DEBUG: {}", m));
            },
            None => {},
        }
        if !success {
            println!("\n{color_red}RUN FAILED{color_reset}");
        }
    }

    fn on_case_start(&self, case: &FactsCase) {
        println!();
        banner(&format!("CASE: {} [{}]", case.name, case.gather_subset.join(", ")));
    }

    fn on_case_passed(&self, case: &FactsCase, result: &FactsResult, assertions: usize) {
        println!("{color_green}OK{color_reset} => {} ({} assertions)", case.name, assertions);
        if self.verbosity > 0 {
            two_column_table("Fact", "Value", &result.summary_rows());
        }
    }

    fn on_case_failed(&self, failure: &AssertionFailure) {
        println!("{color_red}FAILED{color_reset} => {}", failure.case);
        captioned_display(&format!("{}", failure.kind), &failure.expr);
    }

    fn on_case_error(&self, case: &FactsCase, error: &NetfactsError) {
        println!("{color_red}ERROR{color_reset} => {}", case.name);
        println!("  {}", error);
    }

    fn on_recap(&self, recap_data: RecapData) {
        println!();
        banner("RECAP");
        let skipped = if recap_data.skipped > 0 {
            format!("{color_yellow}skipped={}{color_reset}", recap_data.skipped)
        } else {
            String::from("skipped=0")
        };
        println!("{} : passed={} failed={} {}",
            recap_data.suite,
            recap_data.passed,
            recap_data.failed,
            skipped
        );
    }

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug if self.verbosity >= 3 => println!("DEBUG: {}", message),
            LogLevel::Info if self.verbosity >= 1 => println!("INFO: {}", message),
            LogLevel::Warning => println!("WARNING: {}", message),
            LogLevel::Error => eprintln!("ERROR: {}", message),
            _ => {}
        }
    }
}

/// Thread-safe wrapper for output handlers
pub type OutputHandlerRef = Arc<dyn OutputHandler>;
