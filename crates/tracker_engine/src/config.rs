use std::path::PathBuf;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::Args;
use tracker_core::{HostIdentifier, Timings, DEFAULT_HOST_ID};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Period of the interval reporting tick.
    pub report_interval: Duration,
    /// Wait after launch before the first session is created.
    pub startup_delay: Duration,
    pub timings: Timings,
    /// Log every state transition.
    pub debug: bool,
    /// Directory holding the settings file.
    pub state_dir: PathBuf,
    /// Host used when the store has none.
    pub default_host_id: HostIdentifier,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            report_interval: Duration::from_millis(3000),
            startup_delay: Duration::from_millis(1000),
            timings: Timings::default(),
            debug: true,
            state_dir: PathBuf::from(".tracker"),
            default_host_id: HostIdentifier::default(),
        }
    }
}

/// Command line flags for [`TrackerConfig`], each backed by a `TRACKER_*`
/// environment variable. Meant to be flattened into the binary's parser.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Period of the interval reporting tick, in milliseconds
    #[arg(
        long,
        env = "TRACKER_REPORT_INTERVAL_MS",
        default_value_t = 3000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub report_interval_ms: u64,

    /// Wait after launch before the first session is created, in milliseconds
    #[arg(
        long,
        env = "TRACKER_STARTUP_DELAY_MS",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub startup_delay_ms: u64,

    /// How long a data channel may stay unopened, in milliseconds
    #[arg(
        long,
        env = "TRACKER_CONNECT_TIMEOUT_MS",
        default_value_t = 5000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub connect_timeout_ms: u64,

    /// Log every state transition (true/false, yes/no, on/off, 1/0)
    #[arg(
        long,
        env = "TRACKER_DEBUG",
        default_value = "true",
        action = clap::ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub debug: bool,

    /// Directory holding the settings file
    #[arg(long, env = "TRACKER_STATE_DIR", default_value = ".tracker")]
    pub state_dir: PathBuf,

    /// Host used when no host ID has been saved yet
    #[arg(
        long,
        env = "TRACKER_DEFAULT_HOST_ID",
        default_value = DEFAULT_HOST_ID,
        value_parser = parse_host_id
    )]
    pub default_host_id: HostIdentifier,
}

impl From<ConfigArgs> for TrackerConfig {
    fn from(args: ConfigArgs) -> Self {
        let timings = Timings {
            connect_timeout: Duration::from_millis(args.connect_timeout_ms),
            ..Timings::default()
        };
        Self {
            report_interval: Duration::from_millis(args.report_interval_ms),
            startup_delay: Duration::from_millis(args.startup_delay_ms),
            timings,
            debug: args.debug,
            state_dir: args.state_dir,
            default_host_id: args.default_host_id,
        }
    }
}

fn parse_host_id(raw: &str) -> Result<HostIdentifier, String> {
    HostIdentifier::parse(raw).ok_or_else(|| "host ID must not be blank".to_string())
}
