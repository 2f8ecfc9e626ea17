//! # Robot library.
//!
//! This library allows other crates in the workspace, and the benchmarks, to access items defined
//! inside the robot crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Actions - the unit of behaviour run by the sequences
pub mod action;

/// Global data store - the context shared by every action
pub mod data_store;

/// Ghost - the virtual robot moving along the planned trajectory
pub mod ghost;

/// Digital inputs
pub mod io;

/// Localisation module - provides the robot with an idea of where it is on the table
pub mod loc;

/// Motion maths - poses, polynomials and speed profiles
pub mod motion;

/// Executable parameters
pub mod params;

/// Position control - servoes the robot onto the ghost
pub mod pos_ctrl;

/// Sequences of actions and their manager
pub mod sequence;

/// Simulated hardware
pub mod sim;

/// Match strategy
pub mod strategy;

/// Telemetry
pub mod tm;
