//! Position control module state

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::warn;
use nalgebra::Vector2;
use serde::Serialize;
use util::maths::{clamp, get_ang_dist};

use super::{PidController, PosCtrlParams};
use crate::{
    ghost::Ghost,
    motion::{Pose, Twist},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct PosCtrl {
    params: PosCtrlParams,

    long_ctrl: PidController,
    ang_ctrl: PidController,

    /// How long the tracking error has been above its limits
    error_time_s: f64,

    report: StatusReport,
}

/// The status report containing the tracking errors and error flags.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// Error to the ghost along the robot's heading
    pub long_error_m: f64,

    /// Error to the ghost perpendicular to the robot's heading, positive to the left
    pub lat_error_m: f64,

    /// Heading error to the ghost
    pub head_error_rad: f64,

    /// If true the tracking error is above its limits on this cycle
    pub error_limit_exceeded: bool,

    /// If true the tracking error has been above its limits for longer than the persistence time
    pub error_persisted: bool,

    /// The demand sent to the drive
    pub demand: Twist,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PosCtrl {
    pub fn new(params: PosCtrlParams) -> Self {
        Self {
            long_ctrl: PidController::new(params.long_k_p, params.long_k_i, params.long_k_d),
            ang_ctrl: PidController::new(params.ang_k_p, params.ang_k_i, params.ang_k_d),
            params,
            error_time_s: 0.0,
            report: StatusReport::default(),
        }
    }

    /// Compute the drive demand bringing the robot at `actual` onto the ghost.
    pub fn proc(&mut self, ghost: &Ghost, actual: &Pose, dt: f64) -> Twist {
        let target = ghost.pose();
        let feedforward = ghost.twist();

        // Errors in the robot frame
        let delta = target.position() - actual.position();
        let left = Vector2::new(-actual.theta().sin(), actual.theta().cos());
        let long_error_m = delta.dot(&actual.forward());
        let lat_error_m = delta.dot(&left);
        let head_error_rad = get_ang_dist(actual.theta(), target.theta());

        // Steering towards the path is reversed when driving backwards
        let direction = if feedforward.linear_ms < 0.0 { -1.0 } else { 1.0 };

        let linear_ms = feedforward.linear_ms + self.long_ctrl.get(long_error_m, dt);
        let angular_rads = feedforward.angular_rads
            + self.ang_ctrl.get(head_error_rad, dt)
            + self.params.lat_k * lat_error_m * direction;

        let demand = Twist::new(
            clamp(&linear_ms, &-self.params.max_linear_ms, &self.params.max_linear_ms),
            clamp(&angular_rads, &-self.params.max_angular_rads, &self.params.max_angular_rads),
        );

        // Error monitoring
        let exceeded = delta.norm() > self.params.error_limit_m
            || head_error_rad.abs() > self.params.error_limit_rad;

        if exceeded {
            self.error_time_s += dt;
        } else {
            self.error_time_s = 0.0;
        }

        let persisted = self.error_time_s > self.params.error_persist_s;
        if persisted && !self.report.error_persisted {
            warn!(
                "Position tracking error persisted for {:.2} s: {:.4} m, {:.4} rad",
                self.error_time_s,
                delta.norm(),
                head_error_rad
            );
        }

        self.report = StatusReport {
            long_error_m,
            lat_error_m,
            head_error_rad,
            error_limit_exceeded: exceeded,
            error_persisted: persisted,
            demand,
        };

        demand
    }

    /// True if the tracking error has stayed above its limits for too long.
    pub fn has_error(&self) -> bool {
        self.report.error_persisted
    }

    /// True if `actual` is within the arrival tolerances of `target`.
    pub fn is_converged(&self, target: &Pose, actual: &Pose) -> bool {
        target.distance_to(actual) <= self.params.arrival_tolerance_m
            && get_ang_dist(actual.theta(), target.theta()).abs()
                <= self.params.arrival_tolerance_rad
    }

    /// Clear the accumulated error terms of both controllers.
    pub fn reset_integrals(&mut self) {
        self.long_ctrl.reset();
        self.ang_ctrl.reset();
    }

    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    pub fn params(&self) -> &PosCtrlParams {
        &self.params
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ghost::GhostParams;

    #[test]
    fn test_demand_direction() {
        let mut pos_ctrl = PosCtrl::new(PosCtrlParams::default());
        let ghost = Ghost::new(GhostParams::default(), Pose::new(1.1, 1.0, 0.0));

        // Ghost ahead
        let cmd = pos_ctrl.proc(&ghost, &Pose::new(1.0, 1.0, 0.0), 0.01);
        assert!(cmd.linear_ms > 0.0);
        assert!(cmd.angular_rads.abs() < 1e-9);
        assert!((pos_ctrl.report().long_error_m - 0.1).abs() < 1e-9);

        // Ghost to the left and facing further left
        let ghost = Ghost::new(GhostParams::default(), Pose::new(1.0, 1.02, 0.1));
        pos_ctrl.reset_integrals();
        let cmd = pos_ctrl.proc(&ghost, &Pose::new(1.0, 1.0, 0.0), 0.01);
        assert!(cmd.angular_rads > 0.0);
        assert!((pos_ctrl.report().lat_error_m - 0.02).abs() < 1e-9);

        // Saturation
        let ghost = Ghost::new(GhostParams::default(), Pose::new(10.0, 1.0, 0.0));
        let cmd = pos_ctrl.proc(&ghost, &Pose::new(1.0, 1.0, 0.0), 0.01);
        assert_eq!(cmd.linear_ms, PosCtrlParams::default().max_linear_ms);
    }

    #[test]
    fn test_error_persistence() {
        let params = PosCtrlParams::default();
        let mut pos_ctrl = PosCtrl::new(params.clone());
        let far_ghost = Ghost::new(GhostParams::default(), Pose::new(0.5, 0.0, 0.0));
        let actual = Pose::new(0.0, 0.0, 0.0);

        // Under the persistence time
        for _ in 0..40 {
            pos_ctrl.proc(&far_ghost, &actual, 0.01);
        }
        assert!(pos_ctrl.report().error_limit_exceeded);
        assert!(!pos_ctrl.has_error());

        for _ in 0..20 {
            pos_ctrl.proc(&far_ghost, &actual, 0.01);
        }
        assert!(pos_ctrl.has_error());

        // Clears as soon as the error is back under its limits
        let near_ghost = Ghost::new(GhostParams::default(), Pose::new(0.001, 0.0, 0.0));
        pos_ctrl.proc(&near_ghost, &actual, 0.01);
        assert!(!pos_ctrl.has_error());
    }

    #[test]
    fn test_convergence() {
        let pos_ctrl = PosCtrl::new(PosCtrlParams::default());
        let target = Pose::new(1.0, 1.0, 0.5);

        assert!(pos_ctrl.is_converged(&target, &Pose::new(1.005, 1.0, 0.51)));
        assert!(!pos_ctrl.is_converged(&target, &Pose::new(1.05, 1.0, 0.5)));
        assert!(!pos_ctrl.is_converged(&target, &Pose::new(1.0, 1.0, 0.6)));
    }
}
