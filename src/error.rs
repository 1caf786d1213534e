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

use std::fmt;
use std::error::Error as StdError;
use std::io;
use crate::harness::assertions::AssertionFailure;

/// Main error type for netfacts operations
#[derive(Debug)]
pub enum NetfactsError {
    /// Harness configuration errors
    Config(String),

    /// Provider (connection parameter) errors
    Provider(String),

    /// The facts module failed or returned something unusable
    Module(String),

    /// A gather request that cannot be resolved, such as an unknown subset
    InvalidArgument(String),

    /// Suite file errors
    Suite(String),

    /// Run marker template errors
    Template(String),

    /// A fact assertion did not hold
    Assertion(AssertionFailure),

    /// IO errors
    Io(io::Error),

    /// YAML parsing errors
    Yaml(serde_yaml::Error),

    /// JSON parsing errors
    Json(serde_json::Error),

    /// Other errors
    Other(String),
}

impl fmt::Display for NetfactsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetfactsError::Config(msg) => write!(f, "Configuration error: {}", msg),
            NetfactsError::Provider(msg) => write!(f, "Provider error: {}", msg),
            NetfactsError::Module(msg) => write!(f, "Module error: {}", msg),
            NetfactsError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            NetfactsError::Suite(msg) => write!(f, "Suite error: {}", msg),
            NetfactsError::Template(msg) => write!(f, "Template error: {}", msg),
            NetfactsError::Assertion(failure) => write!(f, "Assertion failed: {}", failure),
            NetfactsError::Io(err) => write!(f, "IO error: {}", err),
            NetfactsError::Yaml(err) => write!(f, "YAML error: {}", err),
            NetfactsError::Json(err) => write!(f, "JSON error: {}", err),
            NetfactsError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl StdError for NetfactsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            NetfactsError::Io(err) => Some(err),
            NetfactsError::Yaml(err) => Some(err),
            NetfactsError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for NetfactsError {
    fn from(err: io::Error) -> Self {
        NetfactsError::Io(err)
    }
}

impl From<serde_yaml::Error> for NetfactsError {
    fn from(err: serde_yaml::Error) -> Self {
        NetfactsError::Yaml(err)
    }
}

impl From<serde_json::Error> for NetfactsError {
    fn from(err: serde_json::Error) -> Self {
        NetfactsError::Json(err)
    }
}

impl From<AssertionFailure> for NetfactsError {
    fn from(failure: AssertionFailure) -> Self {
        NetfactsError::Assertion(failure)
    }
}

/// Result type alias for netfacts operations
pub type Result<T> = std::result::Result<T, NetfactsError>;

/// Helper trait to lift String errors from the util layer into NetfactsError
pub trait ErrorContext<T> {
    fn context(self, context: &str) -> Result<T>;
}

impl<T> ErrorContext<T> for std::result::Result<T, String> {
    fn context(self, context: &str) -> Result<T> {
        self.map_err(|e| NetfactsError::Other(format!("{}: {}", context, e)))
    }
}
