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

use crate::config::Transport;
use crate::error::{ErrorContext, NetfactsError, Result};
use crate::harness::case::{default_cases, FactsCase};
use crate::util::io::read_local_file;
use crate::util::yaml::show_yaml_error_in_context;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_SUITE_NAME: &str = "cli/facts.yaml";

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FactsSuite {
    pub name: String,
    /// Overrides the provider's transport for this suite
    pub transport: Option<Transport>,
    /// Blended over the base provider before the first case runs
    pub provider: Option<serde_yaml::Mapping>,
    pub cases: Vec<FactsCase>,
}

impl Default for FactsSuite {
    fn default() -> Self {
        Self {
            name: String::from(DEFAULT_SUITE_NAME),
            transport: None,
            provider: None,
            cases: default_cases(),
        }
    }
}

impl FactsSuite {

    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_local_file(path).context("loading suite")?;
        let suite: FactsSuite = match serde_yaml::from_str(&contents) {
            Ok(x) => x,
            Err(e) => {
                show_yaml_error_in_context(&e, path, &contents);
                return Err(NetfactsError::Suite(format!("{}: {}", path.display(), e)));
            }
        };
        suite.validate()?;
        Ok(suite)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let suite: FactsSuite = serde_yaml::from_str(contents)
            .map_err(|e| NetfactsError::Suite(e.to_string()))?;
        suite.validate()?;
        Ok(suite)
    }

    fn validate(&self) -> Result<()> {
        if self.cases.is_empty() {
            return Err(NetfactsError::Suite(format!("suite '{}' has no cases", self.name)));
        }
        if let Some(case) = self.cases.iter().find(|c| c.gather_subset.is_empty()) {
            return Err(NetfactsError::Suite(format!(
                "case '{}' in suite '{}' requests no subsets", case.name, self.name
            )));
        }
        Ok(())
    }
}
