use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use clap::Parser;
use tracker_core::{HostIdentifier, DEFAULT_HOST_ID};
use tracker_engine::{ConfigArgs, TrackerConfig};

const VARS: [&str; 6] = [
    "TRACKER_REPORT_INTERVAL_MS",
    "TRACKER_STARTUP_DELAY_MS",
    "TRACKER_CONNECT_TIMEOUT_MS",
    "TRACKER_DEBUG",
    "TRACKER_STATE_DIR",
    "TRACKER_DEFAULT_HOST_ID",
];

/// Serializes the tests in this file; they all read the process environment.
static ENV: Mutex<()> = Mutex::new(());

fn clean_env() -> MutexGuard<'static, ()> {
    let guard = ENV.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    for var in VARS {
        std::env::remove_var(var);
    }
    guard
}

#[derive(Debug, Parser)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
}

fn parse(args: &[&str]) -> Result<TrackerConfig, clap::Error> {
    let argv = std::iter::once("tracker").chain(args.iter().copied());
    Cli::try_parse_from(argv).map(|cli| cli.config.into())
}

#[test]
fn defaults_match_the_reporting_contract() {
    let _env = clean_env();
    let config = TrackerConfig::default();
    assert_eq!(config.report_interval, Duration::from_millis(3000));
    assert_eq!(config.startup_delay, Duration::from_millis(1000));
    assert_eq!(config.timings.connect_timeout, Duration::from_secs(5));
    assert_eq!(config.timings.fatal_retry, Duration::from_secs(5));
    assert_eq!(config.timings.destroyed_retry, Duration::from_secs(2));
    assert_eq!(config.default_host_id.as_str(), DEFAULT_HOST_ID);
}

#[test]
fn parsing_nothing_yields_the_defaults() {
    let _env = clean_env();
    assert_eq!(parse(&[]).unwrap(), TrackerConfig::default());
}

#[test]
fn flags_override_defaults() {
    let _env = clean_env();
    let config = parse(&[
        "--report-interval-ms",
        "1500",
        "--connect-timeout-ms",
        "8000",
        "--debug",
        "off",
        "--state-dir",
        "/tmp/tracker",
        "--default-host-id",
        " my-dashboard ",
    ])
    .unwrap();

    assert_eq!(config.report_interval, Duration::from_millis(1500));
    assert_eq!(config.timings.connect_timeout, Duration::from_secs(8));
    assert_eq!(config.timings.fatal_retry, Duration::from_secs(5));
    assert!(!config.debug);
    assert_eq!(config.state_dir, PathBuf::from("/tmp/tracker"));
    assert_eq!(
        config.default_host_id,
        HostIdentifier::parse("my-dashboard").unwrap()
    );
}

#[test]
fn environment_overrides_are_applied() {
    let _env = clean_env();
    std::env::set_var("TRACKER_STARTUP_DELAY_MS", "250");
    std::env::set_var("TRACKER_DEBUG", "no");
    std::env::set_var("TRACKER_DEFAULT_HOST_ID", "env-dashboard");

    let result = parse(&[]);
    for var in VARS {
        std::env::remove_var(var);
    }

    let config = result.unwrap();
    assert_eq!(config.startup_delay, Duration::from_millis(250));
    assert!(!config.debug);
    assert_eq!(config.default_host_id.as_str(), "env-dashboard");
    assert_eq!(config.report_interval, Duration::from_millis(3000));
}

#[test]
fn flags_win_over_environment() {
    let _env = clean_env();
    std::env::set_var("TRACKER_REPORT_INTERVAL_MS", "9000");

    let result = parse(&["--report-interval-ms", "2000"]);
    std::env::remove_var("TRACKER_REPORT_INTERVAL_MS");

    assert_eq!(
        result.unwrap().report_interval,
        Duration::from_millis(2000)
    );
}

#[test]
fn invalid_values_are_rejected() {
    let _env = clean_env();
    assert!(parse(&["--report-interval-ms", "soon"]).is_err());
    assert!(parse(&["--startup-delay-ms", "0"]).is_err());
    assert!(parse(&["--debug", "maybe"]).is_err());
    assert!(parse(&["--default-host-id", "  "]).is_err());
}
