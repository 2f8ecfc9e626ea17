//! # Telemetry
//!
//! Periodic snapshots of the robot state, written as one JSON object per line in the session
//! directory.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    fs::File,
    io::{BufWriter, Write},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use util::session::Session;

use crate::{
    data_store::{DataStore, Fault},
    motion::{Pose, Side, Twist},
    pos_ctrl::StatusReport,
    sequence::{SeqMgr, SequenceName},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Writes telemetry packets to the session's telemetry file.
pub struct TmWriter {
    writer: BufWriter<File>,
}

/// Telemetry packet.
#[derive(Debug, Serialize)]
pub struct TmPacket {
    pub timestamp: DateTime<Utc>,
    pub time_s: f64,
    pub num_cycles: u64,
    pub side: Side,

    pub ghost_pose: Pose,
    pub ghost_speed: f64,
    pub ghost_moving: bool,
    pub ghost_locked: bool,

    pub robot_pose: Option<Pose>,
    pub drive_demand: Twist,
    pub pos_ctrl_status_rpt: StatusReport,

    pub faults: Vec<Fault>,
    pub sequences: Vec<SequenceTm>,
}

/// Progress of a single sequence.
#[derive(Debug, Serialize)]
pub struct SequenceTm {
    pub name: SequenceName,
    pub index: usize,
    pub len: usize,
    pub paused: bool,
    pub current: Option<&'static str>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TmError {
    #[error("Could not access the telemetry file: {0}")]
    FileError(std::io::Error),

    #[error("Could not serialize the telemetry: {0}")]
    SerializationError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TmWriter {
    /// Create the telemetry file in the session directory.
    pub fn new(session: &Session) -> Result<Self, TmError> {
        let file = File::create(&session.tm_file_path).map_err(TmError::FileError)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub fn write(&mut self, ds: &DataStore, seq_mgr: &SeqMgr) -> Result<(), TmError> {
        let packet = TmPacket::from_datastore(ds, seq_mgr);

        let line = packet.to_json()?;

        writeln!(self.writer, "{}", line).map_err(TmError::FileError)?;
        self.writer.flush().map_err(TmError::FileError)
    }
}

impl TmPacket {
    pub fn from_datastore(ds: &DataStore, seq_mgr: &SeqMgr) -> Self {
        Self {
            timestamp: Utc::now(),
            time_s: ds.time_s,
            num_cycles: ds.num_cycles,
            side: ds.side,

            ghost_pose: ds.ghost.pose(),
            ghost_speed: ds.ghost.speed(),
            ghost_moving: ds.ghost.is_moving(),
            ghost_locked: ds.ghost.is_locked(),

            robot_pose: ds.loc_mgr.get_pose(),
            drive_demand: ds.drive_demand,
            pos_ctrl_status_rpt: *ds.pos_ctrl.report(),

            faults: ds.faults.to_vec(),
            sequences: SequenceName::ALL
                .iter()
                .filter_map(|n| seq_mgr.get(*n))
                .map(|s| SequenceTm {
                    name: s.name(),
                    index: s.index(),
                    len: s.len(),
                    paused: s.is_paused(),
                    current: s.current().map(|a| a.name()),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, TmError> {
        serde_json::to_string(self).map_err(TmError::SerializationError)
    }
}
