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

pub mod cli;
pub mod facts;
pub mod harness;
pub mod log;
pub mod util;

pub mod config;
pub mod error;
pub mod output;

// Re-export commonly used types for library users
pub use config::{HarnessConfig, ProviderConfig, Transport};
pub use error::{NetfactsError, Result};
pub use facts::gatherer::FactsGatherer;
pub use facts::result::{FactsRequest, FactsResult};
pub use facts::subset::GatherSubset;
pub use harness::assertions::{AssertionFailure, AssertionKind};
pub use harness::runner::{FactsTestRunner, SuiteReport};
pub use output::{OutputHandler, OutputHandlerRef, TerminalOutputHandler, NullOutputHandler, LogLevel, RecapData};
