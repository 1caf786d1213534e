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

use crate::config::ProviderConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const GATHER_SUBSET_KEY: &str = "ansible_net_gather_subset";

pub const HOSTNAME_KEY: &str = "ansible_net_hostname";
pub const VERSION_KEY: &str = "ansible_net_version";
pub const MODEL_KEY: &str = "ansible_net_model";
pub const SERIALNUM_KEY: &str = "ansible_net_serialnum";

pub const FILESYSTEMS_KEY: &str = "ansible_net_filesystems";
pub const MEMFREE_KEY: &str = "ansible_net_memfree_mb";
pub const MEMTOTAL_KEY: &str = "ansible_net_memtotal_mb";

pub const CONFIG_KEY: &str = "ansible_net_config";

pub const INTERFACES_KEY: &str = "ansible_net_interfaces";
pub const IPV4_ADDRESSES_KEY: &str = "ansible_net_all_ipv4_addresses";
pub const IPV6_ADDRESSES_KEY: &str = "ansible_net_all_ipv6_addresses";

/// What gets handed to the facts module.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactsRequest {
    pub gather_subset: Vec<String>,
    pub provider: ProviderConfig,
}

impl FactsRequest {
    pub fn new(gather_subset: Vec<String>, provider: &ProviderConfig) -> Self {
        Self {
            gather_subset,
            provider: provider.clone(),
        }
    }
}

/// What the facts module hands back.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FactsResult {
    #[serde(default)]
    pub changed: bool,
    #[serde(default)]
    pub ansible_facts: Map<String, Value>,
}

impl FactsResult {

    pub fn fact(&self, key: &str) -> Option<&Value> {
        self.ansible_facts.get(key)
    }

    // null counts as undefined
    pub fn is_defined(&self, key: &str) -> bool {
        matches!(self.fact(key), Some(x) if !x.is_null())
    }

    pub fn fact_i64(&self, key: &str) -> Option<i64> {
        self.fact(key).and_then(|x| x.as_i64())
    }

    /// Subset names the module says it gathered, in the order it reported them.
    pub fn gathered_subsets(&self) -> Vec<String> {
        match self.fact(GATHER_SUBSET_KEY) {
            Some(Value::Array(items)) => items.iter()
                .filter_map(|x| x.as_str())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn has_subset(&self, name: &str) -> bool {
        self.gathered_subsets().iter().any(|x| x == name)
    }

    /// One (fact, value) row per fact, collections summarized by size.
    pub fn summary_rows(&self) -> Vec<(String, String)> {
        self.ansible_facts.iter().map(|(k, v)| {
            let shown = match v {
                Value::String(s) if s.contains('\n') => format!("({} lines)", s.lines().count()),
                Value::String(s) => s.clone(),
                Value::Array(items) if k == GATHER_SUBSET_KEY => {
                    items.iter().filter_map(|x| x.as_str()).collect::<Vec<_>>().join(", ")
                },
                Value::Array(items) => format!("[{} items]", items.len()),
                Value::Object(map) => format!("{{{} keys}}", map.len()),
                other => other.to_string(),
            };
            (k.clone(), shown)
        }).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result_from(value: Value) -> FactsResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_deserialize_module_output() {
        let result = result_from(json!({
            "changed": false,
            "ansible_facts": {
                "ansible_net_gather_subset": ["hardware"],
                "ansible_net_memfree_mb": 1203,
                "ansible_net_filesystems": ["flash0:"]
            }
        }));
        assert!(!result.changed);
        assert_eq!(result.gathered_subsets(), vec!["hardware"]);
        assert_eq!(result.fact_i64(MEMFREE_KEY), Some(1203));
        assert!(result.is_defined(FILESYSTEMS_KEY));
        assert!(!result.is_defined(CONFIG_KEY));
    }

    #[test]
    fn test_missing_changed_defaults_false() {
        let result = result_from(json!({ "ansible_facts": {} }));
        assert!(!result.changed);
        assert!(result.gathered_subsets().is_empty());
    }

    #[test]
    fn test_null_is_undefined() {
        let result = result_from(json!({ "ansible_facts": { "ansible_net_config": null } }));
        assert!(!result.is_defined(CONFIG_KEY));
    }

    #[test]
    fn test_non_integer_memory() {
        let result = result_from(json!({ "ansible_facts": { "ansible_net_memfree_mb": "lots" } }));
        assert_eq!(result.fact_i64(MEMFREE_KEY), None);
    }

    #[test]
    fn test_summary_rows() {
        let result = result_from(json!({
            "ansible_facts": {
                "ansible_net_gather_subset": ["config", "hardware"],
                "ansible_net_config": "hostname r1\n!\nend",
                "ansible_net_filesystems": ["flash0:", "nvram:"],
                "ansible_net_memtotal_mb": 4096
            }
        }));
        let rows = result.summary_rows();
        assert_eq!(rows[0], (String::from(GATHER_SUBSET_KEY), String::from("config, hardware")));
        assert_eq!(rows[1].1, "(3 lines)");
        assert_eq!(rows[2].1, "[2 items]");
        assert_eq!(rows[3].1, "4096");
    }
}
