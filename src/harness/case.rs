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

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FactsCase {
    pub name: String,
    pub gather_subset: Vec<String>,
    /// Gather a second time and require the same subsets back
    #[serde(default)]
    pub repeat: bool,
}

impl FactsCase {
    pub fn new(name: &str, gather_subset: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            gather_subset: gather_subset.iter().map(|s| s.to_string()).collect(),
            repeat: false,
        }
    }

    pub fn repeat(mut self) -> Self {
        self.repeat = true;
        self
    }
}

/// hardware, then config, then both
pub fn default_cases() -> Vec<FactsCase> {
    vec![
        FactsCase::new("test getting hardware facts", &["hardware"]),
        FactsCase::new("test getting config facts", &["config"]),
        FactsCase::new("test getting multiple subsets", &["hardware", "config"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cases() {
        let cases = default_cases();
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[0].gather_subset, vec!["hardware"]);
        assert_eq!(cases[1].gather_subset, vec!["config"]);
        assert_eq!(cases[2].gather_subset, vec!["hardware", "config"]);
        assert!(cases.iter().all(|c| !c.repeat));
    }

    #[test]
    fn test_case_deserialization() {
        let yaml = r#"
name: hardware twice
gather_subset: [hardware]
repeat: true
"#;
        let case: FactsCase = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(case, FactsCase::new("hardware twice", &["hardware"]).repeat());
    }

    #[test]
    fn test_case_rejects_unknown_fields() {
        let yaml = "name: x\ngather_subset: [config]\nretries: 3\n";
        assert!(serde_yaml::from_str::<FactsCase>(yaml).is_err());
    }
}
