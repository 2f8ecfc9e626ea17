//! # Speed profiles

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A trapezoidal speed profile over `[0, duration]`.
///
/// The speed at time `t` is `max(0, min(v0 + accel t, cruise, decel (duration - t)))`, so it ramps
/// up from the initial speed, holds the cruise speed, then ramps down to reach zero at the end of
/// the profile.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpeedProfile {
    initial: f64,
    accel: f64,
    cruise: f64,
    decel: f64,
    duration_s: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SpeedProfile {
    /// A profile which is always stopped.
    pub fn idle() -> Self {
        Self {
            initial: 0.0,
            accel: 0.0,
            cruise: 0.0,
            decel: 0.0,
            duration_s: 0.0,
        }
    }

    /// A profile starting from rest, with symmetric ramps of rate `ramp`.
    pub fn trapezoidal(ramp: f64, cruise: f64, duration_s: f64) -> Self {
        Self {
            initial: 0.0,
            accel: ramp,
            cruise,
            decel: ramp,
            duration_s,
        }
    }

    /// A profile slowing linearly from `initial` to rest at rate `decel`.
    pub fn braking(initial: f64, decel: f64) -> Self {
        let initial = initial.max(0.0);
        let duration_s = if decel > 0.0 { initial / decel } else { 0.0 };

        Self {
            initial,
            accel: 0.0,
            cruise: initial,
            decel,
            duration_s,
        }
    }

    /// Speed at time `t_s` since the start of the profile.
    pub fn f(&self, t_s: f64) -> f64 {
        if t_s >= self.duration_s {
            return 0.0;
        }

        (self.initial + self.accel * t_s)
            .min(self.cruise)
            .min(self.decel * (self.duration_s - t_s))
            .max(0.0)
    }

    pub fn duration(&self) -> f64 {
        self.duration_s
    }

    pub fn cruise(&self) -> f64 {
        self.cruise
    }

    pub fn decel(&self) -> f64 {
        self.decel
    }
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self::idle()
    }
}
