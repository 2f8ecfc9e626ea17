//! Position control parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for position control
#[derive(Deserialize, Debug, Clone)]
pub struct PosCtrlParams {
    /// Longitudinal controller proportional gain
    pub long_k_p: f64,

    /// Longitudinal controller integral gain
    pub long_k_i: f64,

    /// Longitudinal controller derivative gain
    pub long_k_d: f64,

    /// Angular controller proportional gain
    pub ang_k_p: f64,

    /// Angular controller integral gain
    pub ang_k_i: f64,

    /// Angular controller derivative gain
    pub ang_k_d: f64,

    /// Gain from the lateral error to the rotation rate demand
    pub lat_k: f64,

    /// Linear speed demand limit
    pub max_linear_ms: f64,

    /// Rotation rate demand limit
    pub max_angular_rads: f64,

    /// Distance to the ghost above which the tracking error is considered too large
    pub error_limit_m: f64,

    /// Heading difference to the ghost above which the tracking error is considered too large
    pub error_limit_rad: f64,

    /// Time the tracking error must stay too large before an error is reported
    pub error_persist_s: f64,

    /// Distance to the ghost under which the robot has arrived
    pub arrival_tolerance_m: f64,

    /// Heading difference to the ghost under which the robot has arrived
    pub arrival_tolerance_rad: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for PosCtrlParams {
    fn default() -> Self {
        Self {
            long_k_p: 4.0,
            long_k_i: 0.5,
            long_k_d: 0.0,
            ang_k_p: 6.0,
            ang_k_i: 0.5,
            ang_k_d: 0.0,
            lat_k: 8.0,
            max_linear_ms: 1.2,
            max_angular_rads: 6.0,
            error_limit_m: 0.05,
            error_limit_rad: 0.3,
            error_persist_s: 0.5,
            arrival_tolerance_m: 0.01,
            arrival_tolerance_rad: 0.02,
        }
    }
}
