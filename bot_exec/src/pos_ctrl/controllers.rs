//! # Position controllers
//!
//! The PID controller used by position control.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A PID controller
#[derive(Debug, Serialize, Clone)]
pub struct PidController {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Dervative gain
    k_d: f64,

    /// Previous error
    prev_error: Option<f64>,

    /// The integral accumulation
    integral: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PidController {
    /// Create a new controller with the given gains.
    pub fn new(k_p: f64, k_i: f64, k_d: f64) -> Self {
        Self {
            k_p,
            k_i,
            k_d,
            integral: 0f64,
            prev_error: None,
        }
    }

    /// Get the value of the controller for the given error, `dt` seconds after the previous call.
    pub fn get(&mut self, error: f64, dt: f64) -> f64 {
        // With no elapsed time neither the integral nor the derivative can be computed, so both
        // are left out for this call.
        let deriv = if dt > 0.0 {
            self.integral += error * dt;

            match self.prev_error {
                Some(e) => (error - e) / dt,
                None => 0f64,
            }
        } else {
            0f64
        };

        let out = self.k_p * error + self.k_i * self.integral + self.k_d * deriv;

        self.prev_error = Some(error);

        out
    }

    /// Clear the integral accumulation and the error history.
    pub fn reset(&mut self) {
        self.integral = 0f64;
        self.prev_error = None;
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pid_terms() {
        let mut p = PidController::new(2.0, 0.0, 0.0);
        assert_eq!(p.get(0.5, 0.1), 1.0);

        let mut i = PidController::new(0.0, 1.0, 0.0);
        i.get(1.0, 0.5);
        assert!((i.get(1.0, 0.5) - 1.0).abs() < 1e-12);
        assert!((i.integral() - 1.0).abs() < 1e-12);

        // No derivative kick on the first call
        let mut d = PidController::new(0.0, 0.0, 1.0);
        assert_eq!(d.get(1.0, 0.1), 0.0);
        assert!((d.get(1.5, 0.1) - 5.0).abs() < 1e-9);

        // Zero dt only gives the proportional term
        assert_eq!(d.get(2.0, 0.0), 0.0);
    }

    #[test]
    fn test_pid_reset() {
        let mut pid = PidController::new(1.0, 1.0, 1.0);
        pid.get(1.0, 0.1);
        pid.get(1.0, 0.1);
        assert!(pid.integral() > 0.0);

        pid.reset();
        assert_eq!(pid.integral(), 0.0);
        assert_eq!(pid.get(1.0, 0.1), 1.0 + 0.1);
    }
}
