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

use crate::error::{ErrorContext, NetfactsError, Result};
use crate::util::io::read_local_file;
use crate::util::yaml::blend_variables;
use expanduser::expanduser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BINDING: &str = "cli";
pub const DEFAULT_START_MARKER: &str = "START {{test}} on connection={{to_upper_case transport}}";
pub const DEFAULT_END_MARKER: &str = "END {{test}} on connection={{to_upper_case transport}}";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Cli,
    Netconf,
}

impl Transport {
    pub fn label(&self) -> &'static str {
        match self {
            Transport::Cli => "cli",
            Transport::Netconf => "netconf",
        }
    }
}

/// Connection parameters handed through to the facts module untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default = "default_transport")]
    pub transport: Transport,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub ssh_keyfile: Option<String>,
    pub timeout: Option<u64>,
    #[serde(default)]
    pub authorize: bool,
    pub auth_pass: Option<String>,
}

fn default_transport() -> Transport {
    Transport::Cli
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Cli,
            host: None,
            port: None,
            username: None,
            password: None,
            ssh_keyfile: None,
            timeout: None,
            authorize: false,
            auth_pass: None,
        }
    }
}

impl ProviderConfig {

    /// Load the provider bound to `binding` (usually `cli`) from a YAML file.
    pub fn load(path: &Path, binding: &str) -> Result<Self> {
        let contents = read_local_file(path).context("loading provider")?;
        let document: serde_yaml::Value = serde_yaml::from_str(&contents)?;
        let section = match document.get(binding) {
            Some(x) => x.clone(),
            None => {
                return Err(NetfactsError::Provider(format!(
                    "no provider binding '{}' in {}", binding, path.display()
                )));
            }
        };
        Self::from_value(section)
    }

    pub fn from_value(value: serde_yaml::Value) -> Result<Self> {
        let mut provider: ProviderConfig = serde_yaml::from_value(value)
            .map_err(|e| NetfactsError::Provider(e.to_string()))?;
        provider.expand_paths()?;
        Ok(provider)
    }

    /// Returns a copy of this provider with `overrides` blended over it.
    pub fn merged(&self, overrides: &serde_yaml::Mapping) -> Result<Self> {
        let mut base = serde_yaml::to_value(self)?;
        blend_variables(&mut base, serde_yaml::Value::Mapping(overrides.clone()));
        Self::from_value(base)
    }

    fn expand_paths(&mut self) -> Result<()> {
        if let Some(keyfile) = &self.ssh_keyfile {
            let expanded = expanduser(keyfile).map_err(|e| {
                NetfactsError::Provider(format!("cannot expand ssh_keyfile {}: {}", keyfile, e))
            })?;
            self.ssh_keyfile = Some(expanded.display().to_string());
        }
        Ok(())
    }
}

/// Where facts come from during a run
#[derive(Clone, Debug, PartialEq)]
pub enum GathererMode {
    /// Invoke an external facts module by command line
    Module(String),
    /// Use the mock device, optionally loaded from a fixture file
    Mock(Option<PathBuf>),
}

/// Configuration for running fact-subset suites programmatically
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    pub provider: ProviderConfig,
    pub provider_path: Option<PathBuf>,
    pub binding: String,
    pub suite_path: Option<PathBuf>,
    pub gatherer: GathererMode,
    pub label: Option<String>,
    pub start_marker: String,
    pub end_marker: String,
    pub verbosity: u32,
    /// Run log destination; `NETFACTS_LOG` or the default path when unset
    pub log_path: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            provider_path: None,
            binding: String::from(DEFAULT_BINDING),
            suite_path: None,
            gatherer: GathererMode::Mock(None),
            label: None,
            start_marker: String::from(DEFAULT_START_MARKER),
            end_marker: String::from(DEFAULT_END_MARKER),
            verbosity: 0,
            log_path: None,
        }
    }
}

impl HarnessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: ProviderConfig) -> Self {
        self.provider = provider;
        self
    }

    pub fn provider_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.provider_path = Some(path.into());
        self
    }

    pub fn binding(mut self, binding: impl Into<String>) -> Self {
        self.binding = binding.into();
        self
    }

    pub fn suite<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.suite_path = Some(path.into());
        self
    }

    pub fn module(mut self, command: impl Into<String>) -> Self {
        self.gatherer = GathererMode::Module(command.into());
        self
    }

    pub fn mock(mut self) -> Self {
        self.gatherer = GathererMode::Mock(None);
        self
    }

    pub fn mock_fixture<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.gatherer = GathererMode::Mock(Some(path.into()));
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn markers(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_marker = start.into();
        self.end_marker = end.into();
        self
    }

    pub fn verbosity(mut self, verbosity: u32) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn verbose(mut self) -> Self {
        self.verbosity = 1;
        self
    }

    pub fn log_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// The provider to hand to the module: from file if one was given, else inline.
    pub fn resolve_provider(&self) -> Result<ProviderConfig> {
        match &self.provider_path {
            Some(path) => {
                let path = expanduser(path.display().to_string()).map_err(|e| {
                    NetfactsError::Config(format!("cannot expand {}: {}", path.display(), e))
                })?;
                ProviderConfig::load(&path, &self.binding)
            }
            None => Ok(self.provider.clone()),
        }
    }
}
