//! # Session management
//!
//! A session is one run of an executable. It owns a timestamped directory holding the run's log
//! and telemetry files, and starts the clock the robot measures match time against.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

// Internal imports
use crate::host;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

/// Monotonic start of the session clock.
static CLOCK_START: OnceCell<Instant> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Directory under the software root in which sessions are created.
const SESSIONS_DIR: &str = "sessions";

/// Format of the timestamp in the session directory name.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name of the telemetry file within the session directory.
const TM_FILE_NAME: &str = "tm.jsonl";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Files and start time of the current run.
#[derive(Clone, Debug)]
pub struct Session {
    /// Wall clock time at which the session was created
    pub started_at: DateTime<Utc>,

    /// The root directory for this session, `{exec_name}_{timestamp}`
    pub session_root: PathBuf,

    /// `{exec_name}.log` in the session root
    pub log_file_path: PathBuf,

    /// JSON lines telemetry file in the session root
    pub tm_file_path: PathBuf,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("The software root environment variable (BOT_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot create the session directory {0:?}: {1}")]
    CannotCreateDir(PathBuf, std::io::Error),

    #[error("The session clock is already running, only one session can be started per process")]
    AlreadyStarted,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start the session of `exec_name` under `$BOT_SW_ROOT/sessions` and start the session clock.
    pub fn new(exec_name: &str) -> Result<Self, SessionError> {
        let root = host::get_sw_root().map_err(|_| SessionError::SwRootNotSet)?;

        CLOCK_START
            .try_init_once(Instant::now)
            .map_err(|_| SessionError::AlreadyStarted)?;

        Self::in_dir(&root.join(SESSIONS_DIR), exec_name)
    }

    /// Create the session directory of `exec_name` inside `sessions_dir`.
    ///
    /// The session clock is left alone, it is only started by [`Session::new`].
    pub fn in_dir(sessions_dir: &Path, exec_name: &str) -> Result<Self, SessionError> {
        let started_at = Utc::now();

        let session_root =
            sessions_dir.join(format!("{}_{}", exec_name, started_at.format(TIMESTAMP_FORMAT)));

        fs::create_dir_all(&session_root)
            .map_err(|e| SessionError::CannotCreateDir(session_root.clone(), e))?;

        Ok(Session {
            started_at,
            log_file_path: session_root.join(format!("{}.log", exec_name)),
            tm_file_path: session_root.join(TM_FILE_NAME),
            session_root,
        })
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Seconds elapsed on the session clock, `0.0` until a session has been started.
pub fn elapsed_seconds() -> f64 {
    match CLOCK_START.get() {
        Some(start) => start.elapsed().as_secs_f64(),
        None => 0.0,
    }
}
