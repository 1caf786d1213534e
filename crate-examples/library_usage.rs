// Example of using netfacts as a library

use netfacts::facts::mock::MockDevice;
use netfacts::harness::case::FactsCase;
use netfacts::harness::suite::FactsSuite;
use netfacts::{
    FactsResult, FactsTestRunner, HarnessConfig, LogLevel, OutputHandler, ProviderConfig,
    RecapData, TerminalOutputHandler,
};
use netfacts::harness::assertions::AssertionFailure;
use std::sync::Arc;

fn main() -> netfacts::Result<()> {
    // Example 1: the default hardware / config / both cases against the mock device
    default_suite_example()?;

    // Example 2: a suite written inline
    inline_suite_example()?;

    // Example 3: custom output handler
    custom_output_example()?;

    Ok(())
}

fn default_suite_example() -> netfacts::Result<()> {
    println!("=== Default Suite ===");

    let config = HarnessConfig::new()
        .mock()
        .label("cli/facts.yaml")
        .verbose();

    let runner = FactsTestRunner::from_config(&config)?
        .with_output_handler(Arc::new(TerminalOutputHandler::new(1)));

    let report = runner.run_default_suite()?;
    println!("{} cases, {} assertions", report.cases.len(), report.assertions());
    Ok(())
}

fn inline_suite_example() -> netfacts::Result<()> {
    println!("\n=== Inline Suite ===");

    let suite = FactsSuite::parse(r#"
name: interfaces
cases:
  - name: interfaces only
    gather_subset: [interfaces]
    repeat: true
  - name: everything
    gather_subset: [all]
"#)?;

    let provider = ProviderConfig {
        host: Some(String::from("192.0.2.1")),
        username: Some(String::from("admin")),
        ..ProviderConfig::default()
    };

    let runner = FactsTestRunner::new(Arc::new(MockDevice::default()), provider)
        .with_output_handler(Arc::new(TerminalOutputHandler::new(0)));
    runner.run_suite(&suite)?;
    Ok(())
}

// Output handler that only prints failures
struct QuietOutput;

impl OutputHandler for QuietOutput {
    fn on_run_start(&self, _marker: &str) {}
    fn on_run_end(&self, _marker: Option<&str>, success: bool) {
        if !success {
            println!("run failed");
        }
    }
    fn on_case_start(&self, _case: &FactsCase) {}
    fn on_case_passed(&self, _case: &FactsCase, _result: &FactsResult, _assertions: usize) {}
    fn on_case_failed(&self, failure: &AssertionFailure) {
        println!("{}", failure);
    }
    fn on_recap(&self, recap: RecapData) {
        println!("{}: {} passed", recap.suite, recap.passed);
    }
    fn log(&self, level: LogLevel, message: &str) {
        if level == LogLevel::Error {
            eprintln!("{}", message);
        }
    }
}

fn custom_output_example() -> netfacts::Result<()> {
    println!("\n=== Custom Output ===");

    let runner = FactsTestRunner::new(Arc::new(MockDevice::default()), ProviderConfig::default())
        .with_output_handler(Arc::new(QuietOutput))
        .with_markers("begin {{test}}", "finish {{test}}");
    runner.verify_case(&FactsCase::new("hardware only", &["hardware"]))?;
    runner.run_default_suite()?;
    Ok(())
}
