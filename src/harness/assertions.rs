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

//! Typed assertions over a facts result.
//!
//! Each assertion carries the expression it checks, written the way a
//! playbook `assert` would spell it, so a failure can be reported verbatim.
//! Assertions are evaluated in order and evaluation stops at the first one
//! that does not hold.

use crate::facts::result::{FactsResult, GATHER_SUBSET_KEY, MEMFREE_KEY, MEMTOTAL_KEY};
use crate::facts::subset::{subset_names, GatherSubset};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Memory facts must be strictly greater than this.
pub const MEMORY_FLOOR_MB: i64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssertionKind {
    NotIdempotent,
    MissingSubset,
    UnexpectedSubset,
    MissingKey,
    UnexpectedKey,
    InvalidValue,
}

impl fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssertionKind::NotIdempotent => "NotIdempotent",
            AssertionKind::MissingSubset => "MissingSubset",
            AssertionKind::UnexpectedSubset => "UnexpectedSubset",
            AssertionKind::MissingKey => "MissingKey",
            AssertionKind::UnexpectedKey => "UnexpectedKey",
            AssertionKind::InvalidValue => "InvalidValue",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssertionFailure {
    pub case: String,
    pub kind: AssertionKind,
    pub expr: String,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.case, self.kind, self.expr)
    }
}

pub type Predicate = Box<dyn Fn(&FactsResult) -> bool + Send + Sync>;

pub struct Assertion {
    pub kind: AssertionKind,
    pub expr: String,
    predicate: Predicate,
}

impl fmt::Debug for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assertion")
            .field("kind", &self.kind)
            .field("expr", &self.expr)
            .finish()
    }
}

impl Assertion {

    pub fn new<F>(kind: AssertionKind, expr: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&FactsResult) -> bool + Send + Sync + 'static,
    {
        Self {
            kind,
            expr: expr.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn holds(&self, result: &FactsResult) -> bool {
        (self.predicate)(result)
    }

    pub fn not_changed() -> Self {
        Self::new(AssertionKind::NotIdempotent, "result.changed == false", |r| !r.changed)
    }

    pub fn subset_present(subset: GatherSubset) -> Self {
        let name = subset.name();
        Self::new(
            AssertionKind::MissingSubset,
            format!("'{}' in result.ansible_facts.{}", name, GATHER_SUBSET_KEY),
            move |r| r.has_subset(name),
        )
    }

    pub fn subset_absent(subset: GatherSubset) -> Self {
        let name = subset.name();
        Self::new(
            AssertionKind::UnexpectedSubset,
            format!("'{}' not in result.ansible_facts.{}", name, GATHER_SUBSET_KEY),
            move |r| !r.has_subset(name),
        )
    }

    /// Gathered names must be exactly `requested`: no strangers, no repeats.
    pub fn exact_subsets(requested: &BTreeSet<GatherSubset>) -> Self {
        let expected = subset_names(requested);
        let shown: Vec<String> = expected.iter().map(|n| format!("'{}'", n)).collect();
        Self::new(
            AssertionKind::UnexpectedSubset,
            format!("result.ansible_facts.{} == [{}]", GATHER_SUBSET_KEY, shown.join(", ")),
            move |r| match r.fact(GATHER_SUBSET_KEY) {
                Some(Value::Array(items)) => {
                    let mut seen: BTreeSet<&str> = BTreeSet::new();
                    items.len() == expected.len()
                        && items.iter().all(|x| x.as_str().map_or(false, |n| seen.insert(n)))
                        && expected.iter().all(|n| seen.contains(n.as_str()))
                },
                _ => false,
            },
        )
    }

    pub fn key_defined(key: &'static str) -> Self {
        Self::new(
            AssertionKind::MissingKey,
            format!("result.ansible_facts.{} is defined", key),
            move |r| r.is_defined(key),
        )
    }

    pub fn key_undefined(key: &'static str) -> Self {
        Self::new(
            AssertionKind::UnexpectedKey,
            format!("result.ansible_facts.{} is not defined", key),
            move |r| !r.is_defined(key),
        )
    }

    // absent or non-integer values fail too
    pub fn greater_than(key: &'static str, bound: i64) -> Self {
        Self::new(
            AssertionKind::InvalidValue,
            format!("result.ansible_facts.{} > {}", key, bound),
            move |r| matches!(r.fact_i64(key), Some(x) if x > bound),
        )
    }
}

/// The checks every case runs after gathering `requested`.
pub fn protocol(requested: &BTreeSet<GatherSubset>) -> Vec<Assertion> {
    let unrequested: Vec<GatherSubset> = GatherSubset::ALL.iter()
        .copied()
        .filter(|s| !requested.contains(s))
        .collect();

    let mut assertions = vec![Assertion::not_changed()];
    assertions.extend(requested.iter().map(|s| Assertion::subset_present(*s)));
    assertions.extend(unrequested.iter().map(|s| Assertion::subset_absent(*s)));
    assertions.push(Assertion::exact_subsets(requested));
    assertions.extend(requested.iter().map(|s| Assertion::key_defined(s.marker_key())));
    if requested.contains(&GatherSubset::Hardware) {
        assertions.push(Assertion::greater_than(MEMFREE_KEY, MEMORY_FLOOR_MB));
        assertions.push(Assertion::greater_than(MEMTOTAL_KEY, MEMORY_FLOOR_MB));
    }
    assertions.extend(unrequested.iter()
        .flat_map(|s| s.fact_keys().iter())
        .map(|key| Assertion::key_undefined(*key)));
    assertions
}

/// Runs `assertions` in order, returning how many held or the first failure.
pub fn evaluate(case: &str, assertions: &[Assertion], result: &FactsResult) -> Result<usize, AssertionFailure> {
    for assertion in assertions.iter() {
        if !assertion.holds(result) {
            return Err(AssertionFailure {
                case: case.to_string(),
                kind: assertion.kind,
                expr: assertion.expr.clone(),
            });
        }
    }
    Ok(assertions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result_from(value: serde_json::Value) -> FactsResult {
        serde_json::from_value(value).unwrap()
    }

    fn hardware() -> BTreeSet<GatherSubset> {
        [GatherSubset::Hardware].into_iter().collect()
    }

    fn good_hardware() -> serde_json::Value {
        json!({
            "changed": false,
            "ansible_facts": {
                "ansible_net_gather_subset": ["hardware"],
                "ansible_net_filesystems": ["flash0:"],
                "ansible_net_memfree_mb": 900,
                "ansible_net_memtotal_mb": 2048
            }
        })
    }

    fn failure_kind(value: serde_json::Value) -> AssertionKind {
        evaluate("case", &protocol(&hardware()), &result_from(value)).unwrap_err().kind
    }

    #[test]
    fn test_protocol_passes() {
        let count = evaluate("case", &protocol(&hardware()), &result_from(good_hardware())).unwrap();
        // changed, 1 present, 2 absent, exact set, 1 key, 2 memory, 4 undefined keys
        assert_eq!(count, 12);
    }

    #[test]
    fn test_changed_fails_first() {
        let mut value = good_hardware();
        value["changed"] = json!(true);
        value["ansible_facts"]["ansible_net_gather_subset"] = json!([]);
        assert_eq!(failure_kind(value), AssertionKind::NotIdempotent);
    }

    #[test]
    fn test_missing_subset() {
        let mut value = good_hardware();
        value["ansible_facts"]["ansible_net_gather_subset"] = json!(["default"]);
        assert_eq!(failure_kind(value), AssertionKind::MissingSubset);
    }

    #[test]
    fn test_unexpected_subset() {
        let mut value = good_hardware();
        value["ansible_facts"]["ansible_net_gather_subset"] = json!(["hardware", "interfaces"]);
        let failure = evaluate("hw", &protocol(&hardware()), &result_from(value)).unwrap_err();
        assert_eq!(failure.kind, AssertionKind::UnexpectedSubset);
        assert_eq!(failure.expr, "'interfaces' not in result.ansible_facts.ansible_net_gather_subset");
    }

    #[test]
    fn test_stranger_in_gathered_subsets() {
        let mut value = good_hardware();
        value["ansible_facts"]["ansible_net_gather_subset"] = json!(["hardware", "bogus"]);
        let failure = evaluate("hw", &protocol(&hardware()), &result_from(value)).unwrap_err();
        assert_eq!(failure.kind, AssertionKind::UnexpectedSubset);
        assert_eq!(failure.expr, "result.ansible_facts.ansible_net_gather_subset == ['hardware']");
    }

    #[test]
    fn test_repeated_gathered_subset() {
        let mut value = good_hardware();
        value["ansible_facts"]["ansible_net_gather_subset"] = json!(["hardware", "hardware"]);
        assert_eq!(failure_kind(value), AssertionKind::UnexpectedSubset);

        let mut value = good_hardware();
        value["ansible_facts"]["ansible_net_gather_subset"] = json!(["hardware", 7]);
        assert_eq!(failure_kind(value), AssertionKind::UnexpectedSubset);
    }

    #[test]
    fn test_missing_key() {
        let mut value = good_hardware();
        value["ansible_facts"].as_object_mut().unwrap().remove("ansible_net_filesystems");
        assert_eq!(failure_kind(value), AssertionKind::MissingKey);
    }

    #[test]
    fn test_invalid_memory_values() {
        let mut value = good_hardware();
        value["ansible_facts"]["ansible_net_memfree_mb"] = json!(1);
        assert_eq!(failure_kind(value), AssertionKind::InvalidValue);

        let mut value = good_hardware();
        value["ansible_facts"].as_object_mut().unwrap().remove("ansible_net_memtotal_mb");
        assert_eq!(failure_kind(value), AssertionKind::InvalidValue);

        let mut value = good_hardware();
        value["ansible_facts"]["ansible_net_memtotal_mb"] = json!("2048");
        assert_eq!(failure_kind(value), AssertionKind::InvalidValue);
    }

    #[test]
    fn test_unexpected_key() {
        let mut value = good_hardware();
        value["ansible_facts"]["ansible_net_config"] = json!("hostname r1");
        assert_eq!(failure_kind(value), AssertionKind::UnexpectedKey);
    }

    #[test]
    fn test_leaked_interface_addresses() {
        let mut value = good_hardware();
        value["ansible_facts"]["ansible_net_all_ipv4_addresses"] = json!(["192.0.2.1"]);
        let failure = evaluate("hw", &protocol(&hardware()), &result_from(value)).unwrap_err();
        assert_eq!(failure.kind, AssertionKind::UnexpectedKey);
        assert_eq!(failure.expr, "result.ansible_facts.ansible_net_all_ipv4_addresses is not defined");
    }

    #[test]
    fn test_protocol_without_hardware_skips_memory() {
        let config: BTreeSet<GatherSubset> = [GatherSubset::Config].into_iter().collect();
        let exprs: Vec<String> = protocol(&config).into_iter().map(|a| a.expr).collect();
        assert!(exprs.iter().all(|e| !e.contains(" > ")));
        assert!(exprs.contains(&String::from("result.ansible_facts.ansible_net_memfree_mb is not defined")));
        assert!(exprs.contains(&String::from("result.ansible_facts.ansible_net_config is defined")));
        assert!(exprs.contains(&String::from("result.ansible_facts.ansible_net_filesystems is not defined")));
    }

    #[test]
    fn test_failure_display() {
        let failure = AssertionFailure {
            case: String::from("test getting config facts"),
            kind: AssertionKind::MissingKey,
            expr: String::from("result.ansible_facts.ansible_net_config is defined"),
        };
        assert_eq!(
            failure.to_string(),
            "test getting config facts: MissingKey (result.ansible_facts.ansible_net_config is defined)"
        );
    }
}
