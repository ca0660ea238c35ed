/// File logging via log4rs.  The terminal is owned by the renderer, so every
/// log line goes to a file instead.

use std::path::Path;

use log::LevelFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

use crate::error::{GameError, Result};

pub fn init_log(level: LevelFilter, file_path: &Path) -> Result<()> {
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} {t} {m}{n}",
        )))
        .build(file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        )
        .build(Root::builder().appender("logfile").build(level))
        .map_err(|e| GameError::Logging(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| GameError::Logging(e.to_string()))?;
    Ok(())
}
