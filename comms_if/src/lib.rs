//! # Communications interface crate.
//!
//! Provides the inter-board communication interfaces of the robot: the message record exchanged
//! with the actuator board, the actuator order codes, and the throttled serial link.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Message record and identifiers
pub mod msg;

/// Command definitions for equipment (like the actuator board)
pub mod eqpt;

/// Link module - message boxes, transports and the throttled link
pub mod net;
