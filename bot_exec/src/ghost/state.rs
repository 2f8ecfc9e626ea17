//! Ghost state

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, error, info, trace};
use nalgebra::Vector2;
use std::f64::consts::PI;
use util::maths::{get_ang_dist, trapz_integrate};

use super::{GhostError, GhostParams, TrajectoryStatus};
use crate::motion::{bezier_cubic, BrakeProfile, Polynomial, Pose, SpeedProfile, Twist};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The virtual robot followed by the position controller.
#[derive(Debug, Clone)]
pub struct Ghost {
    params: GhostParams,

    pos_current: Pose,
    pos_previous: Pose,

    /// The pose at the end of the current trajectory
    pos_aim: Pose,

    locked: bool,
    moving: bool,

    /// A trajectory was interrupted by a lock and resumes on unlock
    suspended: bool,
    rotating: bool,
    backward: bool,
    braking: bool,

    /// Time since the start of the trajectory
    t_s: f64,

    /// Curve parameter of the trajectory, in [0, 1]
    t_e: f64,

    trajectory_x: Polynomial,
    trajectory_y: Polynomial,

    /// `x'(u)^2 + y'(u)^2`, the square of the speed along the curve with respect to `u`
    speed_square_e: Polynomial,

    speed_profile: SpeedProfile,

    rotation_start_rad: f64,
    rotation_delta_rad: f64,
    rotation_travelled_rad: f64,

    /// Speed commanded by the profile on the last step
    speed: f64,

    /// Last non-zero speed of the profile, used to finish the curve if the profile runs out early
    tail_speed_ms: f64,

    twist: Twist,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Ghost {
    pub fn new(params: GhostParams, initial_pose: Pose) -> Self {
        Self {
            params,
            pos_current: initial_pose,
            pos_previous: initial_pose,
            pos_aim: initial_pose,
            locked: false,
            moving: false,
            suspended: false,
            rotating: false,
            backward: false,
            braking: false,
            t_s: 0.0,
            t_e: 0.0,
            trajectory_x: Polynomial::zero(),
            trajectory_y: Polynomial::zero(),
            speed_square_e: Polynomial::zero(),
            speed_profile: SpeedProfile::idle(),
            rotation_start_rad: initial_pose.theta(),
            rotation_delta_rad: 0.0,
            rotation_travelled_rad: 0.0,
            speed: 0.0,
            tail_speed_ms: 0.0,
            twist: Twist::default(),
        }
    }

    /// Plan a new trajectory from the current ghost pose to `target`.
    ///
    /// If `pure_rotation` is set only the heading changes, and the target's position must already
    /// match the ghost's. `backward` makes the robot drive the curve in reverse, so its heading is
    /// opposite to the curve's tangent.
    ///
    /// Targets which are already reached, and rotations which would require a translation, are
    /// rejected with [`TrajectoryStatus::NoOp`] and leave the ghost untouched.
    pub fn compute_trajectory(
        &mut self,
        target: &Pose,
        curvature: f64,
        ramp: f64,
        cruise: f64,
        pure_rotation: bool,
        backward: bool,
    ) -> Result<TrajectoryStatus, GhostError> {
        if self.locked {
            return Err(GhostError::Locked);
        }

        if !(ramp > 0.0) || !(cruise > 0.0) {
            return Err(GhostError::InvalidProfile { ramp, cruise });
        }

        let start = self.pos_current;
        let delta_position_m = start.distance_to(target);

        if pure_rotation {
            let delta_theta_rad = get_ang_dist(start.theta(), target.theta());

            if delta_theta_rad.abs() < self.params.epsilon_orientation_rad {
                debug!("Rotation to {:.4} rad already reached", target.theta());
                return Ok(TrajectoryStatus::NoOp);
            }
            if delta_position_m > self.params.epsilon_position_m {
                debug!(
                    "Rotation rejected, target is {:.4} m away from the ghost",
                    delta_position_m
                );
                return Ok(TrajectoryStatus::NoOp);
            }

            let duration_s = delta_theta_rad.abs() / cruise + cruise / ramp;

            self.rotation_start_rad = start.theta();
            self.rotation_delta_rad = delta_theta_rad;
            self.rotation_travelled_rad = 0.0;
            self.speed_profile = SpeedProfile::trapezoidal(ramp, cruise, duration_s);
            self.pos_aim = Pose::from_position(start.position(), target.theta());
            self.begin(true, false);

            info!(
                "Ghost rotating by {:.4} rad to {:.4} rad in {:.3} s",
                delta_theta_rad,
                target.theta(),
                duration_s
            );
        } else {
            if delta_position_m < self.params.epsilon_position_m {
                debug!("Target {} already reached", target);
                return Ok(TrajectoryStatus::NoOp);
            }

            // Inner control points lie along the start and end headings, flipped when reversing
            let flip = if backward { PI } else { 0.0 };
            let handle_m = curvature * delta_position_m;
            let h0 = start.theta() + flip;
            let h3 = target.theta() + flip;

            let p0 = start.position();
            let p1 = p0 + Vector2::new(h0.cos(), h0.sin()) * handle_m;
            let p3 = target.position();
            let p2 = p3 - Vector2::new(h3.cos(), h3.sin()) * handle_m;

            let trajectory_x = bezier_cubic(p0[0], p1[0], p2[0], p3[0]);
            let trajectory_y = bezier_cubic(p0[1], p1[1], p2[1], p3[1]);

            let speed_square_e = match (
                trajectory_x.derivative().square(),
                trajectory_y.derivative().square(),
            ) {
                (Some(dx2), Some(dy2)) => dx2 + dy2,
                _ => return Err(GhostError::DegenerateTrajectory),
            };

            let length_m = trapz_integrate(
                |u| speed_square_e.f(u).max(0.0).sqrt(),
                0.0,
                1.0,
                self.params.arc_length_step,
            );
            let duration_s = length_m / cruise + cruise / ramp;

            self.trajectory_x = trajectory_x;
            self.trajectory_y = trajectory_y;
            self.speed_square_e = speed_square_e;
            self.speed_profile = SpeedProfile::trapezoidal(ramp, cruise, duration_s);
            self.pos_aim = *target;
            self.begin(false, backward);

            info!(
                "Ghost trajectory to {} computed: {:.3} m in {:.3} s{}",
                target,
                length_m,
                duration_s,
                if backward { " (backward)" } else { "" }
            );
        }

        Ok(TrajectoryStatus::Committed)
    }

    fn begin(&mut self, rotating: bool, backward: bool) {
        self.t_s = 0.0;
        self.t_e = 0.0;
        self.rotating = rotating;
        self.backward = backward;
        self.braking = false;
        self.moving = true;
        self.suspended = false;
        self.tail_speed_ms = 0.0;
    }

    /// Advance the ghost by one cycle of `dt` seconds.
    ///
    /// The fail-safe is checked on every call, whatever the state of the ghost. A tripped fail-safe
    /// takes precedence over any other error.
    pub fn actuate_position(&mut self, dt: f64) -> Result<(), GhostError> {
        self.pos_previous = self.pos_current;

        let status = if self.locked {
            self.stop();
            Err(GhostError::Locked)
        } else if !self.moving {
            self.twist = Twist::default();
            Ok(())
        } else {
            self.t_s += dt;
            if self.rotating {
                self.step_rotation(dt);
                Ok(())
            } else {
                self.step_translation(dt)
            }
        };

        match self.check_fail_safe() {
            Some(e) => Err(e),
            None => status,
        }
    }

    fn step_translation(&mut self, dt: f64) -> Result<(), GhostError> {
        let profile_over = self.t_s >= self.speed_profile.duration();

        // Once the profile has run out the rest of the curve is driven at the tail speed
        let speed = if profile_over && !self.braking {
            self.tail_speed_ms
                .max(self.speed_profile.decel() * dt)
                .max(self.params.epsilon_position_m)
        } else {
            self.speed_profile.f(self.t_s)
        };
        if !profile_over && speed > 0.0 {
            self.tail_speed_ms = speed;
        }

        let speed_e = self.speed_square_e.f(self.t_e).max(0.0).sqrt();

        let mut status = Ok(());

        // du/dt = (ds/dt) / (ds/du)
        if speed_e > 0.0 {
            self.t_e = (self.t_e + speed / speed_e * dt).min(1.0);
        } else {
            status = Err(GhostError::ParametricCusp { u: self.t_e });
        }

        if self.t_e >= 1.0 {
            self.pos_current = self.pos_aim;
        } else {
            let position = Vector2::new(self.trajectory_x.f(self.t_e), self.trajectory_y.f(self.t_e));
            let dx = self.trajectory_x.df(self.t_e);
            let dy = self.trajectory_y.df(self.t_e);

            self.pos_current.set_position(position);
            if dx != 0.0 || dy != 0.0 {
                let flip = if self.backward { PI } else { 0.0 };
                self.pos_current.set_theta(dy.atan2(dx) + flip);
            }
        }

        self.speed = speed;
        self.twist = Twist::new(
            if self.backward { -speed } else { speed },
            if dt > 0.0 {
                get_ang_dist(self.pos_previous.theta(), self.pos_current.theta()) / dt
            } else {
                0.0
            },
        );

        trace!("Ghost at u = {:.4}, {}", self.t_e, self.pos_current);

        if self.t_e >= 1.0 || (profile_over && self.braking) {
            debug!("Ghost trajectory complete at {}", self.pos_current);
            self.stop();
        }

        status
    }

    fn step_rotation(&mut self, dt: f64) {
        let speed = self.speed_profile.f(self.t_s);
        let total_rad = self.rotation_delta_rad.abs();

        self.rotation_travelled_rad += speed * dt;

        let profile_over = self.t_s >= self.speed_profile.duration();
        if self.rotation_travelled_rad >= total_rad || (profile_over && !self.braking) {
            self.rotation_travelled_rad = total_rad;
        }

        self.t_e = if total_rad > 0.0 {
            (self.rotation_travelled_rad / total_rad).min(1.0)
        } else {
            1.0
        };

        self.pos_current.set_theta(
            self.rotation_start_rad + self.rotation_delta_rad.signum() * self.rotation_travelled_rad,
        );

        self.speed = speed;
        self.twist = Twist::new(0.0, self.rotation_delta_rad.signum() * speed);

        if self.t_e >= 1.0 || profile_over {
            debug!("Ghost rotation complete at {}", self.pos_current);
            self.stop();
        }
    }

    /// Roll back and lock the ghost if it moved too far in the last cycle.
    fn check_fail_safe(&mut self) -> Option<GhostError> {
        let displacement_m = self.pos_current.distance_to(&self.pos_previous);

        if displacement_m > self.params.delta_position_max_m {
            error!(
                "Ghost fail-safe tripped: {:.4} m in one cycle (max {:.4} m), locking at {}",
                displacement_m, self.params.delta_position_max_m, self.pos_previous
            );
            self.pos_current = self.pos_previous;
            self.locked = true;
            self.suspended = false;
            self.stop();
            Some(GhostError::FailSafe { displacement_m })
        } else {
            None
        }
    }

    fn stop(&mut self) {
        self.moving = false;
        self.speed = 0.0;
        self.twist = Twist::default();
    }

    /// Start decelerating from the current speed down to rest.
    ///
    /// The ghost stays on its current path and stops wherever the deceleration ends.
    pub fn brake(&mut self, profile: &BrakeProfile) {
        if !self.moving {
            return;
        }

        let decel = if self.rotating {
            profile.angular_decel_radss
        } else {
            profile.linear_decel_mss
        };

        self.speed_profile = SpeedProfile::braking(self.speed, decel);
        self.t_s = 0.0;
        self.braking = true;

        info!("Ghost braking from {:.3} over {:.3} s", self.speed, self.speed_profile.duration());
    }

    /// Lock or unlock the ghost. A locked ghost never moves.
    ///
    /// A trajectory in progress is suspended by the lock and resumes from the same point once the
    /// ghost is unlocked. A ghost locked by the fail-safe has dropped its trajectory.
    pub fn lock(&mut self, locked: bool) {
        if locked && !self.locked {
            info!("Ghost locked at {}", self.pos_current);
            self.suspended = self.moving;
            self.stop();
        } else if !locked && self.locked && self.suspended {
            info!("Ghost unlocked, resuming trajectory at t = {:.3} s", self.t_s);
            self.moving = true;
            self.suspended = false;
        }
        self.locked = locked;
    }

    /// Teleport the ghost, stopping any trajectory in progress.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pos_current = pose;
        self.pos_previous = pose;
        self.pos_aim = pose;
        self.suspended = false;
        self.stop();
    }

    pub fn pose(&self) -> Pose {
        self.pos_current
    }

    pub fn previous_pose(&self) -> Pose {
        self.pos_previous
    }

    /// The pose at the end of the current, or last, trajectory.
    pub fn aim(&self) -> Pose {
        self.pos_aim
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn is_backward(&self) -> bool {
        self.backward
    }

    /// Speed along the path, or rotation rate for pure rotations, always positive.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Velocity of the ghost over the last cycle.
    pub fn twist(&self) -> Twist {
        self.twist
    }

    pub fn t(&self) -> f64 {
        self.t_s
    }

    pub fn t_e(&self) -> f64 {
        self.t_e
    }

    pub fn duration(&self) -> f64 {
        self.speed_profile.duration()
    }

    pub fn trajectory(&self) -> (&Polynomial, &Polynomial) {
        (&self.trajectory_x, &self.trajectory_y)
    }

    pub fn params(&self) -> &GhostParams {
        &self.params
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const DT: f64 = 0.01;

    fn run_to_rest(ghost: &mut Ghost) -> Vec<Pose> {
        let mut poses = vec![];
        for _ in 0..10_000 {
            if !ghost.is_moving() {
                break;
            }
            ghost.actuate_position(DT).unwrap();
            poses.push(ghost.pose());
        }
        poses
    }

    #[test]
    fn test_straight_metre() {
        let mut ghost = Ghost::new(GhostParams::default(), Pose::new(0.0, 0.0, 0.0));
        let target = Pose::new(1.0, 0.0, 0.0);

        let status = ghost.compute_trajectory(&target, 0.3, 1.0, 0.5, false, false);
        assert_eq!(status, Ok(TrajectoryStatus::Committed));
        assert!(ghost.is_moving());
        assert!(ghost.duration() > 2.4 && ghost.duration() < 2.6);

        let mut last_u = 0.0;
        for _ in 0..10_000 {
            if !ghost.is_moving() {
                break;
            }
            ghost.actuate_position(DT).unwrap();

            assert!(ghost.t_e() >= last_u);
            assert!(ghost.t_e() <= 1.0);
            assert!(ghost.pose().distance_to(&ghost.previous_pose()) <= 0.5 * DT * 1.2);
            last_u = ghost.t_e();
        }

        assert!(!ghost.is_moving());
        assert!(!ghost.is_locked());
        assert_eq!(ghost.t_e(), 1.0);
        assert!(ghost.pose().distance_to(&target) < 1e-9);
        assert!(ghost.pose().theta().abs() < 1e-9);
        assert_eq!(ghost.speed(), 0.0);
    }

    #[test]
    fn test_bezier_matches_endpoints() {
        let mut ghost = Ghost::new(GhostParams::default(), Pose::new(0.2, 0.3, 0.0));
        let target = Pose::new(1.0, 0.8, PI / 2.0);

        ghost
            .compute_trajectory(&target, 0.3, 1.0, 0.5, false, false)
            .unwrap();

        let (x, y) = ghost.trajectory();
        assert!((x.f(0.0) - 0.2).abs() < 1e-12);
        assert!((y.f(0.0) - 0.3).abs() < 1e-12);
        assert!((x.f(1.0) - 1.0).abs() < 1e-9);
        assert!((y.f(1.0) - 0.8).abs() < 1e-9);

        // Leaves along the start heading, arrives along the target heading
        assert!(x.df(0.0) > 0.0);
        assert!(y.df(0.0).abs() < 1e-12);
        assert!(x.df(1.0).abs() < 1e-9);
        assert!(y.df(1.0) > 0.0);

        let poses = run_to_rest(&mut ghost);
        assert!(poses.len() > 10);
        assert!(ghost.pose().distance_to(&target) < 1e-9);
        assert!((ghost.pose().theta() - PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_noop_leaves_trajectory_untouched() {
        let mut ghost = Ghost::new(GhostParams::default(), Pose::new(0.0, 0.0, 0.0));

        // At rest, target within epsilon
        assert_eq!(
            ghost.compute_trajectory(&Pose::new(0.001, 0.0, 0.0), 0.3, 1.0, 0.5, false, false),
            Ok(TrajectoryStatus::NoOp)
        );
        assert!(!ghost.is_moving());

        // Part way through a trajectory
        ghost
            .compute_trajectory(&Pose::new(1.0, 0.0, 0.0), 0.3, 1.0, 0.5, false, false)
            .unwrap();
        for _ in 0..50 {
            ghost.actuate_position(DT).unwrap();
        }

        let u = ghost.t_e();
        let t = ghost.t();
        let (x, y) = ghost.trajectory();
        let (x, y) = (*x, *y);
        let aim = ghost.aim();

        let near = ghost.pose().translated(0.001);
        assert_eq!(
            ghost.compute_trajectory(&near, 0.3, 1.0, 0.5, false, false),
            Ok(TrajectoryStatus::NoOp)
        );

        assert_eq!(ghost.t_e(), u);
        assert_eq!(ghost.t(), t);
        assert_eq!(ghost.trajectory(), (&x, &y));
        assert_eq!(ghost.aim(), aim);
        assert!(ghost.is_moving());
    }

    #[test]
    fn test_rotation() {
        let mut ghost = Ghost::new(GhostParams::default(), Pose::new(0.5, 0.5, 0.0));
        let target = Pose::new(0.5, 0.5, PI / 2.0);

        assert_eq!(
            ghost.compute_trajectory(&target, 0.0, 4.0, 3.0, true, false),
            Ok(TrajectoryStatus::Committed)
        );
        assert!(ghost.is_rotating());

        let mut last_theta = 0.0;
        for pose in run_to_rest(&mut ghost) {
            assert!(pose.theta() >= last_theta);
            assert!((pose.x() - 0.5).abs() < 1e-12);
            assert!((pose.y() - 0.5).abs() < 1e-12);
            last_theta = pose.theta();
        }

        assert!((ghost.pose().theta() - PI / 2.0).abs() < 1e-9);
        assert!(!ghost.is_moving());
    }

    #[test]
    fn test_rotation_noop() {
        let mut ghost = Ghost::new(GhostParams::default(), Pose::new(0.5, 0.5, 0.0));

        // Already facing the target heading
        assert_eq!(
            ghost.compute_trajectory(&Pose::new(0.5, 0.5, 0.005), 0.0, 4.0, 3.0, true, false),
            Ok(TrajectoryStatus::NoOp)
        );

        // Would need a translation
        assert_eq!(
            ghost.compute_trajectory(&Pose::new(0.6, 0.5, 1.0), 0.0, 4.0, 3.0, true, false),
            Ok(TrajectoryStatus::NoOp)
        );
        assert!(!ghost.is_moving());
        assert!(!ghost.is_rotating());
    }

    #[test]
    fn test_backward() {
        let mut ghost = Ghost::new(GhostParams::default(), Pose::new(1.0, 0.0, 0.0));
        let target = Pose::new(0.5, 0.0, 0.0);

        ghost
            .compute_trajectory(&target, 0.3, 1.0, 0.5, false, true)
            .unwrap();
        assert!(ghost.is_backward());

        let mut last_x = 1.0;
        for _ in 0..10_000 {
            if !ghost.is_moving() {
                break;
            }
            ghost.actuate_position(DT).unwrap();

            // Reversing keeps the robot facing forwards
            assert!(ghost.pose().theta().abs() < 1e-9);
            assert!(ghost.pose().x() <= last_x);
            assert!(ghost.twist().linear_ms <= 0.0);
            last_x = ghost.pose().x();
        }

        assert!(ghost.pose().distance_to(&target) < 1e-9);
    }

    #[test]
    fn test_fail_safe() {
        let params = GhostParams {
            delta_position_max_m: 1e-6,
            ..GhostParams::default()
        };
        let start = Pose::new(0.0, 0.0, 0.0);
        let mut ghost = Ghost::new(params, start);

        ghost
            .compute_trajectory(&Pose::new(1.0, 0.0, 0.0), 0.3, 1.0, 0.5, false, false)
            .unwrap();

        match ghost.actuate_position(DT) {
            Err(GhostError::FailSafe { displacement_m }) => assert!(displacement_m > 1e-6),
            r => panic!("Expected the fail-safe to trip, got {:?}", r),
        }

        assert_eq!(ghost.pose(), start);
        assert!(ghost.is_locked());
        assert!(!ghost.is_moving());

        // Stays locked
        assert_eq!(ghost.actuate_position(DT), Err(GhostError::Locked));
        assert_eq!(ghost.pose(), start);
        assert_eq!(
            ghost.compute_trajectory(&Pose::new(1.0, 0.0, 0.0), 0.3, 1.0, 0.5, false, false),
            Err(GhostError::Locked)
        );
    }

    #[test]
    fn test_lock_suspends_motion() {
        let mut ghost = Ghost::new(GhostParams::default(), Pose::new(0.0, 0.0, 0.0));
        let target = Pose::new(1.0, 0.0, 0.0);
        ghost
            .compute_trajectory(&target, 0.3, 1.0, 0.5, false, false)
            .unwrap();
        for _ in 0..80 {
            ghost.actuate_position(DT).unwrap();
        }

        ghost.lock(true);
        let locked_at = ghost.pose();
        let (t, u) = (ghost.t(), ghost.t_e());
        assert!(!ghost.is_moving());
        assert_eq!(ghost.speed(), 0.0);

        for _ in 0..20 {
            assert_eq!(ghost.actuate_position(DT), Err(GhostError::Locked));
            assert_eq!(ghost.twist(), Twist::default());
        }
        assert_eq!(ghost.pose(), locked_at);
        assert_eq!(ghost.t(), t);
        assert_eq!(ghost.t_e(), u);

        // Resumes from where it was frozen and still reaches the target
        ghost.lock(false);
        assert!(ghost.is_moving());
        assert_eq!(ghost.actuate_position(DT), Ok(()));
        assert!(ghost.pose().x() > locked_at.x());
        assert!(ghost.pose().distance_to(&locked_at) < 0.05);

        run_to_rest(&mut ghost);
        assert!(!ghost.is_moving());
        assert!(ghost.pose().distance_to(&target) < 1e-9);
    }

    #[test]
    fn test_no_snap_when_profile_runs_out() {
        // Doubling back on itself, the numerical reparametrisation lags behind the profile
        let mut ghost = Ghost::new(GhostParams::default(), Pose::new(0.0, 0.0, 0.0));
        let target = Pose::new(-0.5, 0.0, 0.0);
        ghost
            .compute_trajectory(&target, 0.4, 1.5, 0.9, false, false)
            .unwrap();

        let mut last_step = 0.0;
        for _ in 0..10_000 {
            if !ghost.is_moving() {
                break;
            }
            ghost.actuate_position(DT).ok();
            last_step = ghost.pose().distance_to(&ghost.previous_pose());
        }

        // Arrives along the curve at no more than the cruise speed
        assert!(last_step <= 0.9 * DT * 1.2, "final step of {} m", last_step);
        assert!(!ghost.is_moving());
        assert!(!ghost.is_locked());
        assert!(ghost.pose().distance_to(&target) < 1e-9);
    }

    #[test]
    fn test_cusp_reported() {
        // Without curvature the curve starts with a null derivative
        let start = Pose::new(0.0, 0.0, 0.0);
        let mut ghost = Ghost::new(GhostParams::default(), start);
        ghost
            .compute_trajectory(&Pose::new(0.5, 0.0, 0.0), 0.0, 1.0, 0.5, false, false)
            .unwrap();

        for _ in 0..3 {
            assert_eq!(
                ghost.actuate_position(DT),
                Err(GhostError::ParametricCusp { u: 0.0 })
            );
        }
        assert_eq!(ghost.t_e(), 0.0);
        assert_eq!(ghost.pose(), start);
        assert!(ghost.is_moving());
        assert!(!ghost.is_locked());
    }

    #[test]
    fn test_fail_safe_overrides_cusp() {
        // A bound below zero rejects every update, even a stationary one
        let params = GhostParams {
            delta_position_max_m: -1.0,
            ..GhostParams::default()
        };
        let start = Pose::new(0.0, 0.0, 0.0);
        let mut ghost = Ghost::new(params, start);
        ghost
            .compute_trajectory(&Pose::new(0.5, 0.0, 0.0), 0.0, 1.0, 0.5, false, false)
            .unwrap();

        match ghost.actuate_position(DT) {
            Err(GhostError::FailSafe { displacement_m }) => assert_eq!(displacement_m, 0.0),
            r => panic!("Expected the fail-safe to take precedence, got {:?}", r),
        }
        assert_eq!(ghost.pose(), start);
        assert!(ghost.is_locked());
        assert!(!ghost.is_moving());
    }

    #[test]
    fn test_brake() {
        let mut ghost = Ghost::new(GhostParams::default(), Pose::new(0.0, 0.0, 0.0));
        ghost
            .compute_trajectory(&Pose::new(1.0, 0.0, 0.0), 0.3, 1.0, 0.5, false, false)
            .unwrap();
        for _ in 0..100 {
            ghost.actuate_position(DT).unwrap();
        }
        assert!(ghost.speed() > 0.4);

        ghost.brake(&crate::motion::MoveProfiles::default().brake);

        let mut last_speed = ghost.speed();
        for _ in 0..10_000 {
            if !ghost.is_moving() {
                break;
            }
            ghost.actuate_position(DT).unwrap();
            assert!(ghost.speed() <= last_speed);
            last_speed = ghost.speed();
        }

        assert!(!ghost.is_moving());
        assert_eq!(ghost.speed(), 0.0);
        assert!(ghost.pose().x() > 0.3 && ghost.pose().x() < 0.6);
    }

    #[test]
    fn test_invalid_profile() {
        let mut ghost = Ghost::new(GhostParams::default(), Pose::default());
        assert_eq!(
            ghost.compute_trajectory(&Pose::new(1.0, 0.0, 0.0), 0.3, 1.0, 0.0, false, false),
            Err(GhostError::InvalidProfile {
                ramp: 1.0,
                cruise: 0.0
            })
        );
        assert!(!ghost.is_moving());
    }
}
