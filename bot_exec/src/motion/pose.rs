//! # Poses and targets
//!
//! All poses are expressed in the table frame: X along the long edge of the table, Y across it,
//! heading measured anticlockwise from +X.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt::Display;
use util::maths::normalise_angle;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A position and heading on the table.
///
/// The heading is always kept in (-pi, pi].
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Pose {
    position_m: Vector2<f64>,
    theta_rad: f64,
}

/// A pose to reach, as written in the strategy for the primary side of the table.
///
/// When `mirrored` is set the target is reflected across the table's centre line if the robot
/// plays on the [`Side::Mirrored`] side.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct Target {
    pub x_m: f64,
    pub y_m: f64,
    pub theta_rad: f64,
    pub mirrored: bool,
}

/// A velocity demand for a differential drive base.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct Twist {
    /// Forward speed, negative when driving backwards
    pub linear_ms: f64,

    /// Rotation rate, positive anticlockwise
    pub angular_rads: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The side of the table the robot starts on, also known as its colour.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Primary,
    Mirrored,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Pose {
    pub fn new(x_m: f64, y_m: f64, theta_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            theta_rad: normalise_angle(theta_rad),
        }
    }

    pub fn from_position(position_m: Vector2<f64>, theta_rad: f64) -> Self {
        Self::new(position_m[0], position_m[1], theta_rad)
    }

    pub fn position(&self) -> Vector2<f64> {
        self.position_m
    }

    pub fn x(&self) -> f64 {
        self.position_m[0]
    }

    pub fn y(&self) -> f64 {
        self.position_m[1]
    }

    pub fn theta(&self) -> f64 {
        self.theta_rad
    }

    pub fn set_position(&mut self, position_m: Vector2<f64>) {
        self.position_m = position_m;
    }

    pub fn set_theta(&mut self, theta_rad: f64) {
        self.theta_rad = normalise_angle(theta_rad);
    }

    /// Unit vector pointing along the heading.
    pub fn forward(&self) -> Vector2<f64> {
        Vector2::new(self.theta_rad.cos(), self.theta_rad.sin())
    }

    /// Euclidean distance between the positions of the two poses.
    pub fn distance_to(&self, other: &Pose) -> f64 {
        (other.position_m - self.position_m).norm()
    }

    /// Heading from this pose's position towards `point`.
    pub fn heading_to(&self, point: &Vector2<f64>) -> f64 {
        let delta = point - self.position_m;
        delta[1].atan2(delta[0])
    }

    /// The pose reached after driving `dist_m` along the current heading.
    pub fn translated(&self, dist_m: f64) -> Pose {
        Pose::from_position(self.position_m + self.forward() * dist_m, self.theta_rad)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.3} m, {:.3} m, {:.3} rad)",
            self.position_m[0], self.position_m[1], self.theta_rad
        )
    }
}

impl Target {
    /// A target which is mirrored with the robot's side.
    pub fn new(x_m: f64, y_m: f64, theta_rad: f64) -> Self {
        Self {
            x_m,
            y_m,
            theta_rad,
            mirrored: true,
        }
    }

    /// A target which is the same whatever side the robot plays on.
    pub fn fixed(x_m: f64, y_m: f64, theta_rad: f64) -> Self {
        Self {
            mirrored: false,
            ..Self::new(x_m, y_m, theta_rad)
        }
    }

    /// Get the actual pose to reach for the given side of a table of length `field_length_m`.
    ///
    /// Mirroring reflects across the line `x = field_length_m / 2`, so `x' = L - x` and
    /// `theta' = pi - theta`.
    pub fn resolve(&self, side: Side, field_length_m: f64) -> Pose {
        match (side, self.mirrored) {
            (Side::Mirrored, true) => {
                Pose::new(field_length_m - self.x_m, self.y_m, PI - self.theta_rad)
            }
            _ => Pose::new(self.x_m, self.y_m, self.theta_rad),
        }
    }
}

impl Twist {
    pub fn new(linear_ms: f64, angular_rads: f64) -> Self {
        Self {
            linear_ms,
            angular_rads,
        }
    }
}
