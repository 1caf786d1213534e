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

use crate::config::{GathererMode, HarnessConfig, ProviderConfig, Transport};
use crate::error::{NetfactsError, Result};
use crate::facts::external::ExternalModule;
use crate::facts::gatherer::FactsGatherer;
use crate::facts::mock::MockDevice;
use crate::facts::result::{FactsRequest, FactsResult, GATHER_SUBSET_KEY};
use crate::facts::subset::{resolve_subsets, subset_names};
use crate::harness::assertions::{evaluate, protocol, AssertionFailure, AssertionKind};
use crate::harness::case::FactsCase;
use crate::harness::markers::RunMarkers;
use crate::harness::suite::FactsSuite;
use crate::log::{LogEntry, RunLog};
use crate::output::{NullOutputHandler, OutputHandler, OutputHandlerRef, RecapData};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Runs fact-subset cases against a gatherer, one at a time, stopping at the first failure.
pub struct FactsTestRunner {
    gatherer: Arc<dyn FactsGatherer>,
    provider: ProviderConfig,
    output_handler: OutputHandlerRef,
    run_log: Arc<RunLog>,
    markers: RunMarkers,
    label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseReport {
    pub name: String,
    pub requested: Vec<String>,
    pub gathered: Vec<String>,
    pub assertions: usize,
    pub repeated: bool,
}

#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub run_id: String,
    pub suite: String,
    pub label: String,
    pub transport: Transport,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn assertions(&self) -> usize {
        self.cases.iter().map(|c| c.assertions).sum()
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished - self.started
    }
}

impl FactsTestRunner {

    pub fn new(gatherer: Arc<dyn FactsGatherer>, provider: ProviderConfig) -> Self {
        Self {
            gatherer,
            provider,
            output_handler: Arc::new(NullOutputHandler),
            run_log: Arc::new(RunLog::disabled()),
            markers: RunMarkers::default(),
            label: None,
        }
    }

    /// Build the gatherer and provider described by `config`. Logging goes to
    /// the configured log file, else `NETFACTS_LOG`.
    pub fn from_config(config: &HarnessConfig) -> Result<Self> {
        let gatherer: Arc<dyn FactsGatherer> = match &config.gatherer {
            GathererMode::Module(command) => Arc::new(ExternalModule::new(command)?),
            GathererMode::Mock(None) => Arc::new(MockDevice::default()),
            GathererMode::Mock(Some(path)) => Arc::new(MockDevice::from_fixture(path)?),
        };
        let run_log = match &config.log_path {
            Some(path) => RunLog::open(path),
            None => RunLog::from_env(),
        };
        let mut runner = Self::new(gatherer, config.resolve_provider()?)
            .with_run_log(run_log)
            .with_markers(&config.start_marker, &config.end_marker);
        runner.label = config.label.clone();
        Ok(runner)
    }

    /// Set a custom output handler
    pub fn with_output_handler(mut self, handler: Arc<dyn OutputHandler>) -> Self {
        self.output_handler = handler;
        self
    }

    pub fn with_run_log(mut self, run_log: RunLog) -> Self {
        self.run_log = Arc::new(run_log);
        self
    }

    pub fn with_markers(mut self, start: &str, end: &str) -> Self {
        self.markers = RunMarkers::new(start, end);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    pub fn run_id(&self) -> &str {
        self.run_log.run_id()
    }

    /// Ask the gatherer for `requested_subsets` using the runner's provider.
    pub fn run_case(&self, requested_subsets: &[String]) -> Result<FactsResult> {
        self.gather(&self.provider, requested_subsets)
    }

    /// Gather for `case` and apply the assertion protocol to the result.
    pub fn verify_case(&self, case: &FactsCase) -> Result<CaseReport> {
        self.check_case(&self.provider, case).map(|(report, _)| report)
    }

    /// Gather twice and require the same subsets both times.
    pub fn check_determinism(&self, requested_subsets: &[String]) -> Result<()> {
        let first = self.run_case(requested_subsets)?;
        let second = self.run_case(requested_subsets)?;
        same_subsets("determinism check", &first, &second)?;
        Ok(())
    }

    pub fn run_default_suite(&self) -> Result<SuiteReport> {
        self.run_suite(&FactsSuite::default())
    }

    pub fn run_suite(&self, suite: &FactsSuite) -> Result<SuiteReport> {
        let started = Utc::now();

        let mut provider = match &suite.provider {
            Some(overrides) => self.provider.merged(overrides)?,
            None => self.provider.clone(),
        };
        if let Some(transport) = suite.transport {
            provider.transport = transport;
        }

        let label = self.label.clone().unwrap_or_else(|| suite.name.clone());
        let start_marker = self.markers.start(&label, provider.transport)?;
        self.output_handler.on_run_start(&start_marker);
        self.output_handler.debug(&format!("gathering with {}", self.gatherer.name()));
        self.run_log.record(LogEntry::new("run_start").suite(&suite.name).msg(start_marker.as_str()));

        let mut reports: Vec<CaseReport> = Vec::new();
        for (idx, case) in suite.cases.iter().enumerate() {
            self.output_handler.on_case_start(case);
            match self.check_case(&provider, case) {
                Ok((report, result)) => {
                    self.output_handler.on_case_passed(case, &result, report.assertions);
                    self.run_log.record(LogEntry::new("case_ok").suite(&suite.name).case(&case.name)
                        .subsets(&report.gathered).status("ok"));
                    reports.push(report);
                },
                Err(e) => {
                    match &e {
                        NetfactsError::Assertion(failure) => self.output_handler.on_case_failed(failure),
                        other => self.output_handler.on_case_error(case, other),
                    }
                    self.run_log.record(LogEntry::new("case_failed").suite(&suite.name).case(&case.name)
                        .subsets(&case.gather_subset).status("failed").msg(e.to_string()));
                    self.output_handler.on_run_end(None, false);
                    self.output_handler.on_recap(RecapData {
                        suite: label.clone(),
                        passed: reports.len(),
                        failed: 1,
                        skipped: suite.cases.len() - idx - 1,
                    });
                    self.run_log.record(LogEntry::new("run_end").suite(&suite.name).status("failed"));
                    return Err(e);
                }
            }
        }

        let end_marker = self.markers.end(&label, provider.transport)?;
        self.output_handler.on_run_end(Some(&end_marker), true);
        self.output_handler.on_recap(RecapData {
            suite: label.clone(),
            passed: reports.len(),
            failed: 0,
            skipped: 0,
        });
        self.run_log.record(LogEntry::new("run_end").suite(&suite.name).status("ok").msg(end_marker));

        Ok(SuiteReport {
            run_id: self.run_log.run_id().to_string(),
            suite: suite.name.clone(),
            label,
            transport: provider.transport,
            started,
            finished: Utc::now(),
            cases: reports,
        })
    }

    fn gather(&self, provider: &ProviderConfig, requested: &[String]) -> Result<FactsResult> {
        let subsets = resolve_subsets(requested)?;
        let request = FactsRequest::new(subset_names(&subsets), provider);
        self.gatherer.gather(&request)
    }

    fn check_case(&self, provider: &ProviderConfig, case: &FactsCase) -> Result<(CaseReport, FactsResult)> {
        let requested = resolve_subsets(&case.gather_subset)?;
        let result = self.gather(provider, &case.gather_subset)?;
        let mut passed = evaluate(&case.name, &protocol(&requested), &result)?;

        if case.repeat {
            let again = self.gather(provider, &case.gather_subset)?;
            same_subsets(&case.name, &result, &again)?;
            passed += 1;
        }

        let report = CaseReport {
            name: case.name.clone(),
            requested: subset_names(&requested),
            gathered: result.gathered_subsets(),
            assertions: passed,
            repeated: case.repeat,
        };
        Ok((report, result))
    }
}

// compared as sets, so reordering between calls is fine
fn same_subsets(case: &str, first: &FactsResult, second: &FactsResult) -> std::result::Result<(), AssertionFailure> {
    let a: BTreeSet<String> = first.gathered_subsets().into_iter().collect();
    let b: BTreeSet<String> = second.gathered_subsets().into_iter().collect();
    if a == b {
        return Ok(());
    }
    Err(AssertionFailure {
        case: case.to_string(),
        kind: AssertionKind::NotIdempotent,
        expr: format!("first.ansible_facts.{key} == second.ansible_facts.{key}", key = GATHER_SUBSET_KEY),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> FactsTestRunner {
        FactsTestRunner::new(Arc::new(MockDevice::default()), ProviderConfig::default())
    }

    #[test]
    fn test_default_suite_passes() {
        let report = runner().run_default_suite().unwrap();
        assert_eq!(report.suite, "cli/facts.yaml");
        assert_eq!(report.label, "cli/facts.yaml");
        assert_eq!(report.cases.len(), 3);
        assert_eq!(report.cases[2].gathered, vec!["config", "hardware"]);
        assert!(report.assertions() > 0);
    }

    #[test]
    fn test_run_case_rejects_empty() {
        assert!(matches!(runner().run_case(&[]), Err(NetfactsError::InvalidArgument(_))));
    }

    #[test]
    fn test_repeat_adds_an_assertion() {
        let plain = runner().verify_case(&FactsCase::new("hw", &["hardware"])).unwrap();
        let repeated = runner().verify_case(&FactsCase::new("hw", &["hardware"]).repeat()).unwrap();
        assert_eq!(repeated.assertions, plain.assertions + 1);
        assert!(repeated.repeated);
    }

    #[test]
    fn test_same_subsets_ignores_order() {
        let a: FactsResult = serde_json::from_str(r#"{"ansible_facts": {"ansible_net_gather_subset": ["config", "hardware"]}}"#).unwrap();
        let b: FactsResult = serde_json::from_str(r#"{"ansible_facts": {"ansible_net_gather_subset": ["hardware", "config"]}}"#).unwrap();
        let c: FactsResult = serde_json::from_str(r#"{"ansible_facts": {"ansible_net_gather_subset": ["hardware"]}}"#).unwrap();
        assert!(same_subsets("x", &a, &b).is_ok());
        assert_eq!(same_subsets("x", &a, &c).unwrap_err().kind, AssertionKind::NotIdempotent);
    }
}
