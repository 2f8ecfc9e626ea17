//! # Logger
//!
//! Records are sent to two outputs. The terminal gets coloured, filtered lines to follow the run
//! live. The session log file gets every record down to its own level in plain text, with the
//! target of each record, so the per-cycle traces can be inspected after a match.
//!
//! Every line is prefixed with the session clock in seconds.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{info, Level};
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Levels of the two log outputs.
#[derive(Debug, Clone)]
pub struct LogLevels {
    /// Records printed on the terminal
    pub console: LevelFilter,

    /// Records written to the session log file, must include `INFO`
    pub file: LevelFilter,

    /// Caps applied to individual targets on both outputs, for instance to quieten a module which
    /// traces every cycle
    pub targets: Vec<(&'static str, LevelFilter)>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("The log file must record at least `INFO`, found `{0}`")]
    FileLevelTooLow(LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// Can only succeed once per process, `log` accepts a single global logger.
pub fn logger_init(levels: &LogLevels, session: &Session) -> Result<(), LoggerInitError> {
    if levels.file < Level::Info {
        return Err(LoggerInitError::FileLevelTooLow(levels.file));
    }

    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:10.6} {}] {}",
                session::elapsed_seconds(),
                level_tag(record.level()),
                message
            ))
        })
        .level(levels.console)
        .chain(std::io::stdout());

    let log_file =
        fern::log_file(&session.log_file_path).map_err(LoggerInitError::LogFileInitError)?;

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:10.6} {:<5}] {}: {}",
                session::elapsed_seconds(),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(levels.file)
        .chain(log_file);

    levels
        .targets
        .iter()
        .fold(fern::Dispatch::new(), |d, (target, level)| d.level_for(*target, *level))
        .chain(console)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session started at: {}", session.started_at);
    info!("    Console level: {:?}", levels.console);
    info!("    File level: {:?}", levels.file);
    info!("    Log file path: {:?}", session.log_file_path);
    for (target, level) in levels.targets.iter() {
        info!("    {} capped at {:?}", target, level);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Short coloured tag of a log level for the terminal
fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Trace => "TRC".dimmed().italic(),
        Level::Debug => "DBG".dimmed(),
        Level::Info => "INF".normal(),
        Level::Warn => "WRN".yellow(),
        Level::Error => "ERR".red().bold(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_file_level_must_include_info() {
        let session =
            Session::in_dir(&std::env::temp_dir().join("bot_sw_logger_test"), "logger").unwrap();
        let levels = LogLevels {
            console: LevelFilter::Info,
            file: LevelFilter::Warn,
            targets: vec![],
        };

        match logger_init(&levels, &session) {
            Err(LoggerInitError::FileLevelTooLow(LevelFilter::Warn)) => (),
            r => panic!("Expected the file level to be rejected, got {:?}", r),
        }
    }
}
