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

use netfacts::cli::CliParser;
use netfacts::harness::suite::FactsSuite;
use netfacts::util::io::quit;
use netfacts::{FactsTestRunner, NetfactsError, Result, TerminalOutputHandler};
use std::process;
use std::sync::Arc;

fn main() {
    if let Err(e) = liftoff() {
        quit(&e.to_string());
    }
}

fn liftoff() -> Result<()> {
    let mut cli_parser = CliParser::new();
    cli_parser.parse().map_err(NetfactsError::Config)?;

    // netfacts --help was given, or no arguments
    if cli_parser.needs_help {
        cli_parser.show_help();
        return Ok(());
    }
    if cli_parser.needs_version {
        cli_parser.show_version();
        return Ok(());
    }

    let config = cli_parser.to_config();
    let suite = match &config.suite_path {
        Some(path) => FactsSuite::load(path)?,
        None => FactsSuite::default(),
    };

    let runner = FactsTestRunner::from_config(&config)?
        .with_output_handler(Arc::new(TerminalOutputHandler::new(config.verbosity)));

    match runner.run_suite(&suite) {
        Ok(_) => Ok(()),
        Err(NetfactsError::Assertion(_)) => {
            // already reported by the output handler
            process::exit(1);
        }
        Err(e) => Err(e),
    }
}
