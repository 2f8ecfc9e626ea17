//! # Discrete inputs
//!
//! Abstraction over the digital inputs read by the executable, such as the start cord.

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A digital input line.
pub trait DigitalInput {
    /// Sample the line, `true` if it is high.
    fn is_high(&mut self) -> bool;
}
