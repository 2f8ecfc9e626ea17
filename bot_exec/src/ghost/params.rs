//! Ghost parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of the [`Ghost`](super::Ghost).
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct GhostParams {
    /// Position difference under which a target is considered already reached
    pub epsilon_position_m: f64,

    /// Heading difference under which a rotation target is considered already reached
    pub epsilon_orientation_rad: f64,

    /// Maximum displacement of the ghost in a single cycle before the fail-safe trips
    pub delta_position_max_m: f64,

    /// Step of the numerical integration of the trajectory length, in units of `u`
    pub arc_length_step: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for GhostParams {
    fn default() -> Self {
        Self {
            epsilon_position_m: 0.005,
            epsilon_orientation_rad: 0.01,
            delta_position_max_m: 0.05,
            arc_length_step: 0.01,
        }
    }
}
