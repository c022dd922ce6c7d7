use std::process::ExitCode;
use clap::Parser;
use log::{error, info};
use airsense::{init_logging, run};
use airsense::error::{AppRunError, ConfigError};
use airsense::options::Options;

fn main() -> ExitCode {
    let options = Options::parse();

    if let Err(err) = init_logging(options.log_level()) {
        eprintln!("{}", err);
        return ExitCode::FAILURE;
    }
    info!(concat!("AirSense ", env!("CARGO_PKG_VERSION")));

    match run(options) {
        Err(AppRunError::ConfigError { source: ConfigError::CanNotLock { .. } }) => {
            error!("This application has already been started");
            ExitCode::FAILURE
        },
        Err(err) => {
            error!("Unexpected error: {}", err);
            ExitCode::FAILURE
        },
        Ok(_) => ExitCode::SUCCESS,
    }
}
