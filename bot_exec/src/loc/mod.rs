//! # Localisation module
//!
//! This module provides the robot with an estimate of its pose on the table. Odometry is not part
//! of this executable, the pose is either set externally or produced by a simulated drive base
//! integrating the position control demands.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use serde::Deserialize;

use crate::motion::{Pose, Twist};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Provides an interface for the localisation system of the robot.
#[derive(Debug, Clone)]
pub struct LocMgr {
    source: LocSource,

    pose: Option<Pose>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub enum LocSource {
    /// The pose is only changed by [`LocMgr::set_pose`].
    OnSet,

    /// The pose follows a perfect unicycle model driven by the drive demands.
    Sim,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LocMgr {
    pub fn new(source: LocSource) -> Self {
        Self { source, pose: None }
    }

    pub fn source(&self) -> LocSource {
        self.source
    }

    pub fn set_pose(&mut self, pose: Pose) {
        debug!("Localisation pose set to {}", pose);
        self.pose = Some(pose);
    }

    pub fn get_pose(&self) -> Option<Pose> {
        self.pose
    }

    /// Apply the drive demand for `dt` seconds.
    ///
    /// Only the simulated source moves, other sources ignore the demand.
    pub fn drive(&mut self, demand: &Twist, dt: f64) {
        if self.source != LocSource::Sim {
            return;
        }

        if let Some(pose) = self.pose.as_mut() {
            // Integrate with the mid-step heading
            let mid_theta = pose.theta() + 0.5 * demand.angular_rads * dt;
            let position = pose.position()
                + nalgebra::Vector2::new(mid_theta.cos(), mid_theta.sin()) * demand.linear_ms * dt;

            pose.set_position(position);
            pose.set_theta(pose.theta() + demand.angular_rads * dt);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_sim_drive() {
        let mut loc = LocMgr::new(LocSource::Sim);

        // Nothing to integrate without an initial pose
        loc.drive(&Twist::new(1.0, 0.0), 0.1);
        assert!(loc.get_pose().is_none());

        loc.set_pose(Pose::new(0.0, 0.0, PI / 2.0));
        for _ in 0..10 {
            loc.drive(&Twist::new(0.5, 0.0), 0.1);
        }
        let pose = loc.get_pose().unwrap();
        assert!(pose.x().abs() < 1e-9);
        assert!((pose.y() - 0.5).abs() < 1e-9);

        loc.drive(&Twist::new(0.0, PI), 0.5);
        assert!((loc.get_pose().unwrap().theta() - PI).abs() < 1e-9);
    }

    #[test]
    fn test_on_set_ignores_demands() {
        let mut loc = LocMgr::new(LocSource::OnSet);
        loc.set_pose(Pose::new(1.0, 1.0, 0.0));
        loc.drive(&Twist::new(1.0, 1.0), 1.0);
        assert_eq!(loc.get_pose(), Some(Pose::new(1.0, 1.0, 0.0)));
    }
}
