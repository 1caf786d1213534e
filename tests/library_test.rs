use netfacts::config::GathererMode;
use netfacts::{FactsTestRunner, HarnessConfig, NetfactsError, NullOutputHandler, Transport};
use std::fs::{self, File};
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_config_builder() {
    let config = HarnessConfig::new()
        .provider_file("/tmp/provider.yml")
        .binding("cli")
        .suite("/tmp/suite.yml")
        .mock_fixture("/tmp/device.yml")
        .label("cli/facts.yaml")
        .verbose();

    assert_eq!(config.binding, "cli");
    assert_eq!(config.verbosity, 1);
    assert_eq!(config.gatherer, GathererMode::Mock(Some("/tmp/device.yml".into())));
    assert_eq!(config.label, Some(String::from("cli/facts.yaml")));
}

#[test]
fn test_runner_from_files() {
    let dir = TempDir::new().unwrap();

    let provider_path = dir.path().join("provider.yml");
    let mut provider = File::create(&provider_path).unwrap();
    writeln!(provider, "cli:\n  host: 192.0.2.20\n  username: admin\n  password: admin\n  authorize: true").unwrap();

    let fixture_path = dir.path().join("device.yml");
    let mut fixture = File::create(&fixture_path).unwrap();
    writeln!(fixture, r#"
hostname: nxos01
version: 9.3(8)
model: N9K-C93180YC-EX
filesystems: ["bootflash:", "logflash:"]
memtotal_mb: 24000
memfree_mb: 12000
config: |
  hostname nxos01
interfaces:
  Ethernet1/1:
    mtu: 9216
    ipv4: ["203.0.113.1/31"]
"#).unwrap();

    let log_path = dir.path().join("netfacts.log");
    let config = HarnessConfig::new()
        .provider_file(&provider_path)
        .mock_fixture(&fixture_path)
        .label("nxos cli facts")
        .log_file(&log_path);

    let runner = FactsTestRunner::from_config(&config)
        .unwrap()
        .with_output_handler(Arc::new(NullOutputHandler));

    assert_eq!(runner.provider().host, Some(String::from("192.0.2.20")));
    assert!(runner.provider().authorize);

    let report = runner.run_default_suite().unwrap();
    assert_eq!(report.label, "nxos cli facts");
    assert_eq!(report.transport, Transport::Cli);
    assert_eq!(report.run_id, runner.run_id());
    assert!(report.finished >= report.started);

    // run_start, three cases, run_end
    let log = fs::read_to_string(&log_path).unwrap();
    let records: Vec<serde_json::Value> = log.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r["run_id"] == report.run_id.as_str()));
    assert_eq!(records[0]["event"], "run_start");
}

#[test]
fn test_runner_from_config_with_bad_fixture() {
    let config = HarnessConfig::new().mock_fixture("/non/existent/device.yml");
    assert!(FactsTestRunner::from_config(&config).is_err());
}

#[test]
fn test_runner_from_config_with_missing_binding() {
    let dir = TempDir::new().unwrap();
    let provider_path = dir.path().join("provider.yml");
    let mut provider = File::create(&provider_path).unwrap();
    writeln!(provider, "netconf:\n  transport: netconf").unwrap();

    let config = HarnessConfig::new().provider_file(&provider_path).mock();
    match FactsTestRunner::from_config(&config) {
        Err(NetfactsError::Provider(msg)) => assert!(msg.contains("'cli'")),
        Err(other) => panic!("unexpected error {}", other),
        Ok(_) => panic!("expected a provider error"),
    }
}
