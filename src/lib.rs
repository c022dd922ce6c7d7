use std::env;
use crate::error::{AppRunError, LoggingError};
use crate::gui::application::run_application;
use crate::options::Options;

pub mod config;
pub mod device;
pub mod error;
pub mod gui;
pub mod options;
pub mod sim;
pub mod view;

pub fn init_logging(level: log::LevelFilter) -> Result<(), LoggingError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339(std::time::SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        // iced and its renderer are chatty at debug level
        .level_for("iced_winit", log::LevelFilter::Warn)
        .level_for("wgpu_core", log::LevelFilter::Warn)
        .chain(std::io::stderr());

    if let Ok(log_file) = env::var("LOG_FILE") {
        dispatch = dispatch.chain(fern::log_file(log_file)?);
    }

    dispatch.apply()?;
    Ok(())
}

pub fn run(options: Options) -> Result<(), AppRunError> {
    run_application(options)?;
    Ok(())
}
