//! # Robot Executable Parameters
//!
//! This module provides parameters for the robot executable, gathered from the parameter files of
//! each module.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;
use util::params::{self, LoadError};

use crate::{
    ghost::GhostParams,
    loc::LocSource,
    motion::{MoveProfiles, Side, Target},
    pos_ctrl::PosCtrlParams,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ExecParams {
    /// Target period of one cycle
    pub cycle_period_s: f64,

    /// Time after which the executable stops, counted from the start of the session
    pub run_duration_s: f64,

    /// Side of the table the robot plays on
    pub side: Side,

    /// Length of the table along X, used to mirror targets
    pub field_length_m: f64,

    /// Starting pose, given for the primary side
    pub initial_pose: Target,

    pub loc_source: LocSource,

    /// Minimum time between two messages sent to the actuator board
    pub antispam_ms: u64,

    /// Time the simulated actuator board takes to complete an order
    pub sim_actuator_delay_s: f64,

    /// Time after which the simulated start cord is pulled
    pub sim_start_cord_pull_s: f64,

    /// Number of consecutive cycle overruns after which a fault is raised
    pub max_consec_cycle_overruns: u64,
}

/// All the parameters of the executable.
#[derive(Debug, Clone)]
pub struct BotParams {
    pub exec: ExecParams,
    pub ghost: GhostParams,
    pub pos_ctrl: PosCtrlParams,
    pub move_profiles: MoveProfiles,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl BotParams {
    /// Load all parameter files from `$BOT_SW_ROOT/params`.
    pub fn load() -> Result<Self, LoadError> {
        Ok(Self {
            exec: params::load("exec.toml")?,
            ghost: params::load("ghost.toml")?,
            pos_ctrl: params::load("pos_ctrl.toml")?,
            move_profiles: params::load("move_profiles.toml")?,
        })
    }
}

impl Default for ExecParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.01,
            run_duration_s: 100.0,
            side: Side::Primary,
            field_length_m: 3.0,
            initial_pose: Target::new(0.25, 1.0, 0.0),
            loc_source: LocSource::Sim,
            antispam_ms: comms_if::net::DEFAULT_ANTISPAM_MS,
            sim_actuator_delay_s: 0.5,
            sim_start_cord_pull_s: 1.0,
            max_consec_cycle_overruns: 50,
        }
    }
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            exec: ExecParams::default(),
            ghost: GhostParams::default(),
            pos_ctrl: PosCtrlParams::default(),
            move_profiles: MoveProfiles::default(),
        }
    }
}
