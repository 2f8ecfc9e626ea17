//! # Ghost module
//!
//! The ghost is a virtual robot which moves along the planned trajectory at the commanded speed,
//! the real robot is then servoed onto it by [`crate::pos_ctrl`].
//!
//! Translations follow a cubic Bézier curve whose inner control points are placed along the start
//! and target headings at a distance proportional to the `curvature` of the move. The curve's
//! parameter `u` is advanced each cycle so that the speed along the curve follows a trapezoidal
//! [`SpeedProfile`](crate::motion::SpeedProfile). Pure rotations keep the position fixed and
//! interpolate the heading along an angular speed profile.
//!
//! A fail-safe bounds the displacement of the ghost in a single cycle. If it is exceeded the ghost
//! is rolled back to its previous pose and locked.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
mod state;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use params::GhostParams;
pub use state::Ghost;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Result of a trajectory computation which did not fail.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrajectoryStatus {
    /// A new trajectory was computed and the ghost is moving along it.
    Committed = 0,

    /// The target is already reached, nothing was changed.
    NoOp = 1,
}

/// Errors which can occur in the ghost.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GhostError {
    #[error("The ghost is locked")]
    Locked,

    #[error("Invalid move profile, ramp ({ramp}) and cruise ({cruise}) must be positive")]
    InvalidProfile { ramp: f64, cruise: f64 },

    #[error("Could not build the arc length polynomial of the trajectory")]
    DegenerateTrajectory,

    #[error("The trajectory has a cusp at u = {u:.4}, the ghost cannot progress")]
    ParametricCusp { u: f64 },

    #[error("Ghost fail-safe tripped, moved {displacement_m:.4} m in a single cycle")]
    FailSafe { displacement_m: f64 },
}
