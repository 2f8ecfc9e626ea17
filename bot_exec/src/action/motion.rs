//! # Motion actions
//!
//! Moves drive the ghost along a new trajectory and finish once the robot has followed it. All
//! targets are given for the primary side and resolved when the move starts.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, warn};
use std::f64::consts::PI;

use super::{Action, ActionKind, DoubleAction};
use crate::{
    data_store::DataStore,
    ghost::TrajectoryStatus,
    motion::{MoveProfileName, Pose, Target},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct MoveAction {
    target: MoveTarget,
    profile: MoveProfileName,
    backward: bool,
    finish: MoveFinish,

    /// Set if the trajectory could not be computed
    error: bool,
}

/// Stops the ghost along its current trajectory.
pub struct BrakeAction;

/// A wall of the table used as a recalibration reference.
///
/// When the robot is pressed against the wall its coordinate along `axis` and its heading are
/// known exactly, they are read from the corresponding fields of `reference`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Wall {
    pub axis: Axis,
    pub reference: Target,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Where a move goes, computed from the ghost's pose when the move starts.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MoveTarget {
    /// Go to the pose
    Pose(Target),

    /// Turn on the spot to the target's heading
    Heading(Target),

    /// Turn on the spot to face the target's position
    FacePoint(Target),

    /// Turn on the spot by the given angle
    Rotation(f64),

    /// Drive straight along the current heading, negative distances drive backwards
    Straight(f64),

    /// Drive to the target's position, keeping the heading towards it
    StraightToPoint(Target),
}

/// Completion criterion of a move.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveFinish {
    /// The ghost has arrived and the robot is within tolerance of it
    Converged,

    /// The ghost has arrived, the robot may not be able to follow, for example against a wall
    GhostArrived,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MoveAction {
    pub fn new(target: MoveTarget, profile: MoveProfileName, backward: bool) -> Self {
        Self {
            target,
            profile,
            backward,
            finish: MoveFinish::Converged,
            error: false,
        }
    }

    pub fn with_finish(mut self, finish: MoveFinish) -> Self {
        self.finish = finish;
        self
    }

    /// The pose to reach, and whether it is a pure rotation.
    fn resolve(&self, ds: &DataStore) -> (Pose, bool) {
        let current = ds.ghost.pose();
        let flip = if self.backward { PI } else { 0.0 };

        match self.target {
            MoveTarget::Pose(t) => (ds.resolve(&t), false),
            MoveTarget::Heading(t) => (
                Pose::from_position(current.position(), ds.resolve(&t).theta()),
                true,
            ),
            MoveTarget::FacePoint(t) => {
                let heading = current.heading_to(&ds.resolve(&t).position()) + flip;
                (Pose::from_position(current.position(), heading), true)
            }
            MoveTarget::Rotation(delta_rad) => (
                Pose::from_position(current.position(), current.theta() + delta_rad),
                true,
            ),
            MoveTarget::Straight(dist_m) => (current.translated(dist_m), false),
            MoveTarget::StraightToPoint(t) => {
                let point = ds.resolve(&t).position();
                let heading = current.heading_to(&point) + flip;
                (Pose::from_position(point, heading), false)
            }
        }
    }

    pub fn start(&mut self, ds: &mut DataStore) {
        let profile = *ds.move_profiles.get(self.profile);
        let (target, pure_rotation) = self.resolve(ds);

        let (ramp, cruise) = if pure_rotation {
            (profile.angular_ramp_radss, profile.angular_cruise_rads)
        } else {
            (profile.linear_ramp_mss, profile.linear_cruise_ms)
        };

        self.error = false;
        ds.ghost.lock(false);

        match ds.ghost.compute_trajectory(
            &target,
            profile.curvature,
            ramp,
            cruise,
            pure_rotation,
            self.backward,
        ) {
            Ok(TrajectoryStatus::Committed) => (),
            Ok(TrajectoryStatus::NoOp) => info!("Move to {} needs no trajectory", target),
            Err(e) => {
                warn!("Could not compute trajectory to {}: {}", target, e);
                self.error = true;
            }
        }
    }

    pub fn is_finished(&mut self, ds: &mut DataStore) -> bool {
        if self.error || ds.ghost.is_moving() || ds.ghost.is_locked() {
            return false;
        }

        match self.finish {
            MoveFinish::GhostArrived => true,
            MoveFinish::Converged => match ds.loc_mgr.get_pose() {
                Some(pose) => ds.pos_ctrl.is_converged(&ds.ghost.pose(), &pose),
                None => false,
            },
        }
    }

    pub fn has_failed(&mut self, ds: &mut DataStore) -> bool {
        self.error || (self.finish == MoveFinish::Converged && ds.pos_ctrl.has_error())
    }
}

impl BrakeAction {
    pub fn start(&mut self, ds: &mut DataStore) {
        let brake = ds.move_profiles.brake;
        ds.ghost.brake(&brake);
    }

    pub fn is_finished(&mut self, ds: &mut DataStore) -> bool {
        ds.ghost.speed() < ds.move_profiles.brake.speed_epsilon
    }

    pub fn has_failed(&mut self, ds: &mut DataStore) -> bool {
        ds.pos_ctrl.has_error()
    }
}

impl Wall {
    /// Snap the localisation and the ghost onto the wall.
    pub fn apply(&self, ds: &mut DataStore) {
        let reference = ds.resolve(&self.reference);
        let mut pose = match ds.loc_mgr.get_pose() {
            Some(p) => p,
            None => {
                warn!("No pose to recalibrate");
                return;
            }
        };

        let mut position = pose.position();
        match self.axis {
            Axis::X => position[0] = reference.x(),
            Axis::Y => position[1] = reference.y(),
        }
        pose.set_position(position);
        pose.set_theta(reference.theta());

        info!("Recalibrated on {:?} wall to {}", self.axis, pose);

        ds.loc_mgr.set_pose(pose);
        ds.ghost.set_pose(pose);
    }
}

impl Action {
    fn motion(name: &'static str, action: MoveAction, timeout_s: f64) -> Self {
        Self::new(name, ActionKind::Move(action)).with_timeout(timeout_s)
    }

    /// Go to the pose along a curve.
    pub fn goto(target: Target, profile: MoveProfileName, timeout_s: f64) -> Self {
        Self::motion(
            "Goto",
            MoveAction::new(MoveTarget::Pose(target), profile, false),
            timeout_s,
        )
    }

    /// Go to the pose along a curve, driving backwards.
    pub fn goto_backward(target: Target, profile: MoveProfileName, timeout_s: f64) -> Self {
        Self::motion(
            "GotoBackward",
            MoveAction::new(MoveTarget::Pose(target), profile, true),
            timeout_s,
        )
    }

    /// Turn on the spot to the target's heading.
    pub fn spin(target: Target, profile: MoveProfileName, timeout_s: f64) -> Self {
        Self::motion(
            "Spin",
            MoveAction::new(MoveTarget::Heading(target), profile, false),
            timeout_s,
        )
    }

    /// Turn on the spot to face the target's position.
    pub fn face(target: Target, profile: MoveProfileName, timeout_s: f64) -> Self {
        Self::motion(
            "Face",
            MoveAction::new(MoveTarget::FacePoint(target), profile, false),
            timeout_s,
        )
    }

    /// Turn on the spot by `delta_rad`, taking the shortest way round.
    pub fn rotate(delta_rad: f64, profile: MoveProfileName, timeout_s: f64) -> Self {
        Self::motion(
            "Rotate",
            MoveAction::new(MoveTarget::Rotation(delta_rad), profile, false),
            timeout_s,
        )
    }

    pub fn forward(dist_m: f64, profile: MoveProfileName, timeout_s: f64) -> Self {
        Self::motion(
            "Forward",
            MoveAction::new(MoveTarget::Straight(dist_m.abs()), profile, false),
            timeout_s,
        )
    }

    pub fn backward(dist_m: f64, profile: MoveProfileName, timeout_s: f64) -> Self {
        Self::motion(
            "Backward",
            MoveAction::new(MoveTarget::Straight(-dist_m.abs()), profile, true),
            timeout_s,
        )
    }

    /// Face the target's position then drive straight to it.
    pub fn straight_to(target: Target, profile: MoveProfileName, timeout_s: f64) -> Self {
        let drive = Self::motion(
            "StraightToPoint",
            MoveAction::new(MoveTarget::StraightToPoint(target), profile, false),
            timeout_s,
        );

        Self::new(
            "StraightTo",
            ActionKind::Double(Box::new(DoubleAction::chained(
                Self::face(target, profile, timeout_s),
                drive,
            ))),
        )
    }

    /// Drive `dist_m` into a wall, then snap the pose onto it.
    pub fn recalibrate(backward: bool, dist_m: f64, wall: Wall, timeout_s: f64) -> Self {
        let dist_m = if backward { -dist_m.abs() } else { dist_m.abs() };
        let contact = Self::motion(
            "RecalibrationContact",
            MoveAction::new(
                MoveTarget::Straight(dist_m),
                MoveProfileName::Recalibration,
                backward,
            )
            .with_finish(MoveFinish::GhostArrived),
            timeout_s,
        );
        let snap = Self::run("RecalibrationSnap", move |ds| wall.apply(ds));

        Self::new(
            "Recalibrate",
            ActionKind::Double(Box::new(DoubleAction::chained(contact, snap))),
        )
    }

    /// Bring the ghost to a stop.
    pub fn brake(timeout_s: f64) -> Self {
        Self::new("Brake", ActionKind::Brake(BrakeAction)).with_timeout(timeout_s)
    }
}
