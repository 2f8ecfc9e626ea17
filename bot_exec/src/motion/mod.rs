//! # Motion module
//!
//! Geometric and kinematic building blocks shared by the ghost, the position controller and the
//! move actions:
//!
//! - [`Pose`] and [`Target`] - planar poses on the table, with colour mirroring of targets.
//! - [`Polynomial`] - fixed capacity real polynomials used to describe Bézier trajectories.
//! - [`SpeedProfile`] - trapezoidal speed profiles over time.
//! - [`MoveProfiles`] - the named speed/curvature presets used by the move actions.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod move_profile;
mod polynomial;
mod pose;
mod speed_profile;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use move_profile::{BrakeProfile, MoveProfile, MoveProfileName, MoveProfiles};
pub use polynomial::{bezier_cubic, Polynomial, MAX_COEFFS};
pub use pose::{Pose, Side, Target, Twist};
pub use speed_profile::SpeedProfile;
