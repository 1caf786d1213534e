// Common test utilities

#![allow(dead_code)]

use netfacts::facts::mock::MockDevice;
use netfacts::harness::assertions::AssertionFailure;
use netfacts::harness::case::FactsCase;
use netfacts::{FactsGatherer, FactsRequest, FactsResult, LogLevel, OutputHandler, RecapData, Result};
use serde_json::Value;
use std::sync::Mutex;

/// Records every output event as a line of text, in order.
#[derive(Default)]
pub struct RecordingOutput {
    pub events: Mutex<Vec<String>>,
}

impl RecordingOutput {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl OutputHandler for RecordingOutput {
    fn on_run_start(&self, marker: &str) {
        self.push(format!("start:{}", marker));
    }
    fn on_run_end(&self, marker: Option<&str>, success: bool) {
        self.push(format!("end:{}:{}", marker.unwrap_or("-"), success));
    }
    fn on_case_start(&self, case: &FactsCase) {
        self.push(format!("case:{}", case.name));
    }
    fn on_case_passed(&self, case: &FactsCase, _result: &FactsResult, _assertions: usize) {
        self.push(format!("passed:{}", case.name));
    }
    fn on_case_failed(&self, failure: &AssertionFailure) {
        self.push(format!("failed:{}:{}", failure.case, failure.kind));
    }
    fn on_recap(&self, recap: RecapData) {
        self.push(format!("recap:{}/{}/{}", recap.passed, recap.failed, recap.skipped));
    }
    fn log(&self, _level: LogLevel, _message: &str) {}
}

/// Wraps the mock device and lets a test corrupt its answers.
pub struct TamperedDevice {
    inner: MockDevice,
    tamper: Box<dyn Fn(&mut FactsResult) + Send + Sync>,
    pub requests: Mutex<Vec<FactsRequest>>,
}

impl TamperedDevice {
    pub fn new<F>(tamper: F) -> Self
    where
        F: Fn(&mut FactsResult) + Send + Sync + 'static,
    {
        Self {
            inner: MockDevice::default(),
            tamper: Box::new(tamper),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn honest() -> Self {
        Self::new(|_| {})
    }

    pub fn requests(&self) -> Vec<FactsRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl FactsGatherer for TamperedDevice {
    fn name(&self) -> String {
        String::from("tampered")
    }

    fn gather(&self, request: &FactsRequest) -> Result<FactsResult> {
        self.requests.lock().unwrap().push(request.clone());
        let mut result = self.inner.gather(request)?;
        (self.tamper)(&mut result);
        Ok(result)
    }
}

pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn set_fact(result: &mut FactsResult, key: &str, value: Value) {
    result.ansible_facts.insert(key.to_string(), value);
}
