//! # Move profiles
//!
//! Named presets of curvature, ramp and cruise speeds used by the move actions. The presets are
//! loaded from `move_profiles.toml`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Speed and shape parameters of a move.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct MoveProfile {
    /// Bézier curvature, i.e. the distance of the inner control points as a fraction of the
    /// start-target distance
    pub curvature: f64,

    /// Linear acceleration and deceleration in m/s^2
    pub linear_ramp_mss: f64,

    /// Linear cruise speed in m/s
    pub linear_cruise_ms: f64,

    /// Angular acceleration and deceleration in rad/s^2
    pub angular_ramp_radss: f64,

    /// Angular cruise speed in rad/s
    pub angular_cruise_rads: f64,
}

/// Parameters of an emergency stop of the ghost.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct BrakeProfile {
    pub linear_decel_mss: f64,

    pub angular_decel_radss: f64,

    /// Ghost speed below which the brake is considered complete
    pub speed_epsilon: f64,
}

/// All move profiles known to the robot.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct MoveProfiles {
    pub standard: MoveProfile,
    pub accurate: MoveProfile,
    pub fast: MoveProfile,
    pub recalibration: MoveProfile,
    pub brake: BrakeProfile,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub enum MoveProfileName {
    Standard,
    Accurate,
    Fast,
    Recalibration,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MoveProfiles {
    pub fn get(&self, name: MoveProfileName) -> &MoveProfile {
        match name {
            MoveProfileName::Standard => &self.standard,
            MoveProfileName::Accurate => &self.accurate,
            MoveProfileName::Fast => &self.fast,
            MoveProfileName::Recalibration => &self.recalibration,
        }
    }
}

impl Default for MoveProfiles {
    fn default() -> Self {
        Self {
            standard: MoveProfile {
                curvature: 0.3,
                linear_ramp_mss: 1.0,
                linear_cruise_ms: 0.5,
                angular_ramp_radss: 4.0,
                angular_cruise_rads: 3.0,
            },
            accurate: MoveProfile {
                curvature: 0.3,
                linear_ramp_mss: 0.5,
                linear_cruise_ms: 0.2,
                angular_ramp_radss: 2.0,
                angular_cruise_rads: 1.5,
            },
            fast: MoveProfile {
                curvature: 0.4,
                linear_ramp_mss: 1.5,
                linear_cruise_ms: 0.9,
                angular_ramp_radss: 6.0,
                angular_cruise_rads: 4.5,
            },
            recalibration: MoveProfile {
                curvature: 0.3,
                linear_ramp_mss: 0.3,
                linear_cruise_ms: 0.1,
                angular_ramp_radss: 2.0,
                angular_cruise_rads: 1.0,
            },
            brake: BrakeProfile {
                linear_decel_mss: 2.0,
                angular_decel_radss: 8.0,
                speed_epsilon: 0.001,
            },
        }
    }
}
