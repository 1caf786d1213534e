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

use crate::config::{HarnessConfig, DEFAULT_BINDING};
use crate::util::terminal::{markdown_print, two_column_table};
use std::env;
use std::iter::Peekable;
use std::path::PathBuf;
use std::slice::Iter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug)]
pub struct CliParser {
    pub provider_path: Option<PathBuf>,
    pub binding: String,
    pub module: Option<String>,
    pub mock: bool,
    pub fixture: Option<PathBuf>,
    pub suite_path: Option<PathBuf>,
    pub label: Option<String>,
    pub verbosity: u32,
    pub needs_help: bool,
    pub needs_version: bool,
}

impl Default for CliParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CliParser {

    pub fn new() -> Self {
        Self {
            provider_path: None,
            binding: String::from(DEFAULT_BINDING),
            module: None,
            mock: false,
            fixture: None,
            suite_path: None,
            label: None,
            verbosity: 0,
            needs_help: false,
            needs_version: false,
        }
    }

    pub fn parse(&mut self) -> Result<(), String> {
        let args: Vec<String> = env::args().skip(1).collect();
        self.parse_args(&args)
    }

    pub fn parse_args(&mut self, args: &[String]) -> Result<(), String> {
        if args.is_empty() {
            self.needs_help = true;
            return Ok(());
        }

        let mut iter = args.iter().peekable();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-h" | "--help" => self.needs_help = true,
                "--version" => self.needs_version = true,
                "-p" | "--provider" => self.provider_path = Some(PathBuf::from(take_value(&mut iter, arg)?)),
                "-b" | "--binding" => self.binding = take_value(&mut iter, arg)?,
                "-m" | "--module" => self.module = Some(take_value(&mut iter, arg)?),
                "--mock" => {
                    self.mock = true;
                    // optional fixture path
                    if let Some(path) = iter.next_if(|next| !next.starts_with('-')) {
                        self.fixture = Some(PathBuf::from(path));
                    }
                },
                "--fixture" => {
                    self.mock = true;
                    self.fixture = Some(PathBuf::from(take_value(&mut iter, arg)?));
                },
                "-s" | "--suite" => self.suite_path = Some(PathBuf::from(take_value(&mut iter, arg)?)),
                "-l" | "--label" => self.label = Some(take_value(&mut iter, arg)?),
                "-v" => self.verbosity += 1,
                "-vv" => self.verbosity += 2,
                "-vvv" => self.verbosity += 3,
                other => return Err(format!("unrecognized argument: {}", other)),
            }
        }

        if self.needs_help || self.needs_version {
            return Ok(());
        }
        if self.module.is_some() && self.mock {
            return Err(String::from("--module and --mock/--fixture are mutually exclusive"));
        }
        if self.module.is_none() && !self.mock {
            return Err(String::from("one of --module or --mock is required"));
        }
        if self.module.is_some() && self.provider_path.is_none() {
            return Err(String::from("--provider is required with --module"));
        }
        Ok(())
    }

    pub fn to_config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::new()
            .binding(self.binding.clone())
            .verbosity(self.verbosity);
        if let Some(path) = &self.provider_path {
            config = config.provider_file(path.clone());
        }
        config = match (&self.module, &self.fixture) {
            (Some(command), _) => config.module(command.clone()),
            (None, Some(fixture)) => config.mock_fixture(fixture.clone()),
            (None, None) => config.mock(),
        };
        if let Some(path) = &self.suite_path {
            config = config.suite(path.clone());
        }
        if let Some(label) = &self.label {
            config = config.label(label.clone());
        }
        config
    }

    pub fn show_help(&self) {
        markdown_print("|:-|\n|netfacts: check which fact subsets a facts module returns|\n|-");
        println!();
        let rows: Vec<(String, String)> = vec![
            ("--provider FILE", "YAML file holding provider bindings"),
            ("--binding NAME", "provider binding to use (default: cli)"),
            ("--module CMD", "facts module command line, receives JSON on stdin"),
            ("--mock [FIXTURE]", "answer from the built-in mock device, or from a fixture file"),
            ("--fixture FILE", "same as --mock FILE"),
            ("--suite FILE", "YAML suite of cases (default: hardware, config, both)"),
            ("--label TEXT", "label used in the START/END markers"),
            ("-v, -vv, -vvv", "more output"),
            ("--version", "show version"),
        ].into_iter().map(|(a, b)| (a.to_string(), b.to_string())).collect();
        two_column_table("Option", "Description", &rows);
    }

    pub fn show_version(&self) {
        println!("netfacts {}", VERSION);
    }
}

fn take_value(iter: &mut Peekable<Iter<String>>, flag: &str) -> Result<String, String> {
    iter.next().cloned().ok_or_else(|| format!("{} requires a value", flag))
}
