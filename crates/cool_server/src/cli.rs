//! Command-line interface for the simulated server.

use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "cool.toml";

/// Options that override the configuration file.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    pub log_level: Option<String>,
    /// Force JSON log output
    pub json_logs: bool,
    /// Override for the tick interval in milliseconds
    pub tick_ms: Option<u64>,
    /// Run console lines from a file instead of stdin
    pub script: Option<PathBuf>,
}

impl CliArgs {
    /// Parses the process arguments, exiting with usage on error.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    /// Parses an explicit argument list.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::from_matches(&command().try_get_matches_from(args)?))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            tick_ms: matches.get_one::<u64>("tick-ms").copied(),
            script: matches.get_one::<String>("script").map(PathBuf::from),
        }
    }
}

fn command() -> Command {
    Command::new("Cool Server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Simulated game server hosting the cool plugin, driven from the console")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value(DEFAULT_CONFIG_PATH),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Output logs in JSON format")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tick-ms")
                .short('t')
                .long("tick-ms")
                .value_name("MILLIS")
                .help("Milliseconds between server ticks")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("script")
                .short('s')
                .long("script")
                .value_name("FILE")
                .help("Run console commands from FILE; ticks only advance on `wait`"),
        )
}
