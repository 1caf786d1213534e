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

//! Gather subsets and how a list of requested names resolves to a set of them.
//!
//! A request may name subsets directly (`hardware`), use `all`, or exclude
//! with a leading `!` (`!config`, `!all`). A request made only of exclusions
//! starts from every subset.

use crate::error::{NetfactsError, Result};
use crate::facts::result::{
    CONFIG_KEY, FILESYSTEMS_KEY, INTERFACES_KEY, IPV4_ADDRESSES_KEY, IPV6_ADDRESSES_KEY,
    MEMFREE_KEY, MEMTOTAL_KEY,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

static SUBSET_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(!)?([a-z][a-z0-9_]*)$").expect("subset token regex")
});

// declared alphabetically so the derived Ord sorts by name
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatherSubset {
    Config,
    Hardware,
    Interfaces,
}

impl GatherSubset {

    pub const ALL: [GatherSubset; 3] = [
        GatherSubset::Config,
        GatherSubset::Hardware,
        GatherSubset::Interfaces,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GatherSubset::Config => "config",
            GatherSubset::Hardware => "hardware",
            GatherSubset::Interfaces => "interfaces",
        }
    }

    /// The fact whose presence shows this subset was gathered.
    pub fn marker_key(&self) -> &'static str {
        match self {
            GatherSubset::Config => CONFIG_KEY,
            GatherSubset::Hardware => FILESYSTEMS_KEY,
            GatherSubset::Interfaces => INTERFACES_KEY,
        }
    }

    pub fn fact_keys(&self) -> &'static [&'static str] {
        match self {
            GatherSubset::Config => &[CONFIG_KEY],
            GatherSubset::Hardware => &[FILESYSTEMS_KEY, MEMFREE_KEY, MEMTOTAL_KEY],
            GatherSubset::Interfaces => &[INTERFACES_KEY, IPV4_ADDRESSES_KEY, IPV6_ADDRESSES_KEY],
        }
    }

    pub fn valid_names() -> String {
        let names: Vec<&str> = GatherSubset::ALL.iter().map(|s| s.name()).collect();
        format!("all, {}", names.join(", "))
    }
}

impl fmt::Display for GatherSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for GatherSubset {
    type Err = NetfactsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "config" => Ok(GatherSubset::Config),
            "hardware" => Ok(GatherSubset::Hardware),
            "interfaces" => Ok(GatherSubset::Interfaces),
            _ => Err(NetfactsError::InvalidArgument(format!(
                "unknown gather subset '{}', expected one of: {}", s, GatherSubset::valid_names()
            ))),
        }
    }
}

pub fn resolve_subsets(names: &[String]) -> Result<BTreeSet<GatherSubset>> {
    if names.is_empty() {
        return Err(NetfactsError::InvalidArgument(String::from(
            "gather_subset must name at least one subset"
        )));
    }

    let mut include: BTreeSet<GatherSubset> = BTreeSet::new();
    let mut exclude: BTreeSet<GatherSubset> = BTreeSet::new();
    let mut has_include = false;

    for raw in names.iter() {
        let token = raw.trim();
        let caps = SUBSET_TOKEN.captures(token).ok_or_else(|| {
            NetfactsError::InvalidArgument(format!("malformed gather subset '{}'", raw))
        })?;
        let negate = caps.get(1).is_some();
        let targets: Vec<GatherSubset> = match &caps[2] {
            "all" => GatherSubset::ALL.to_vec(),
            name => vec![name.parse::<GatherSubset>()?],
        };
        if negate {
            exclude.extend(targets);
        } else {
            has_include = true;
            include.extend(targets);
        }
    }

    if !has_include {
        include = GatherSubset::ALL.iter().copied().collect();
    }

    let resolved: BTreeSet<GatherSubset> = include.difference(&exclude).copied().collect();
    if resolved.is_empty() {
        return Err(NetfactsError::InvalidArgument(format!(
            "gather_subset {:?} excludes every subset", names
        )));
    }
    Ok(resolved)
}

pub fn subset_names(subsets: &BTreeSet<GatherSubset>) -> Vec<String> {
    subsets.iter().map(|s| s.name().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_single() {
        let set = resolve_subsets(&req(&["hardware"])).unwrap();
        assert_eq!(subset_names(&set), vec!["hardware"]);
    }

    #[test]
    fn test_resolve_sorted_and_deduplicated() {
        let set = resolve_subsets(&req(&["hardware", "config", "hardware"])).unwrap();
        assert_eq!(subset_names(&set), vec!["config", "hardware"]);
    }

    #[test]
    fn test_resolve_all_and_negation() {
        let set = resolve_subsets(&req(&["all", "!interfaces"])).unwrap();
        assert_eq!(subset_names(&set), vec!["config", "hardware"]);
    }

    #[test]
    fn test_resolve_only_exclusions() {
        let set = resolve_subsets(&req(&["!config"])).unwrap();
        assert_eq!(subset_names(&set), vec!["hardware", "interfaces"]);
    }

    #[test]
    fn test_resolve_rejects_empty() {
        assert!(matches!(resolve_subsets(&[]), Err(NetfactsError::InvalidArgument(_))));
        assert!(matches!(resolve_subsets(&req(&["!all"])), Err(NetfactsError::InvalidArgument(_))));
    }

    #[test]
    fn test_resolve_rejects_unknown() {
        let err = resolve_subsets(&req(&["hardware", "routing"])).unwrap_err();
        assert!(err.to_string().contains("unknown gather subset 'routing'"));
        assert!(err.to_string().contains("all, config, hardware, interfaces"));
    }

    #[test]
    fn test_resolve_rejects_malformed() {
        let err = resolve_subsets(&req(&["!!config"])).unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn test_marker_keys() {
        assert_eq!(GatherSubset::Hardware.marker_key(), "ansible_net_filesystems");
        assert_eq!(GatherSubset::Config.marker_key(), "ansible_net_config");
        assert!(GatherSubset::Hardware.fact_keys().contains(&"ansible_net_memfree_mb"));
    }
}
