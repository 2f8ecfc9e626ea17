//! # Position control module
//!
//! Position control servoes the real robot onto the [`Ghost`](crate::ghost::Ghost). The ghost's
//! velocity is used as a feedforward term, and a pair of PID controllers correct the remaining
//! error:
//!
//! - the longitudinal controller acts on the error along the robot's heading and outputs a forward
//!   speed correction,
//! - the angular controller acts on the heading error and outputs a rotation rate correction, to
//!   which a proportional lateral term is added to pull the robot back onto the ghost's path.
//!
//! The controller also monitors the tracking error. If the error stays above its limits for longer
//! than the persistence time the controller reports an error, which fails the current move.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod controllers;
mod params;
mod state;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use controllers::PidController;
pub use params::PosCtrlParams;
pub use state::{PosCtrl, StatusReport};
