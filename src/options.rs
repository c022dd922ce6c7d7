use std::path::PathBuf;
use clap::Parser;

use crate::config::types::Config;

/// Air quality and biometrics companion for the AirSense Clip (simulated device).
#[derive(Debug, Clone, Default, Parser)]
#[command(version, about)]
pub struct Options {
    /// Config file to use instead of the portable or per-user one
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Start the session with the clip disconnected
    #[arg(long)]
    pub disconnected: bool,

    /// Battery level (percent) the clip reports
    #[arg(long, value_name = "PERCENT", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub battery: Option<u8>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Options {
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }

    /// Command line flags win over the config file.
    pub fn apply(&self, mut config: Config) -> Config {
        if self.disconnected {
            config.device.connected = false;
        }
        if let Some(battery) = self.battery {
            config.device.battery_level = battery;
        }
        config
    }
}
