//! Trajectory recording and the Bezier curve fit used to visualise a shot.
//!
//! A [`TrajectoryTracker`] snapshots position and velocity at launch, then
//! refreshes an end snapshot every airborne tick until the ball lands, at
//! which point the trajectory is frozen.  The visualised curve is a quadratic
//! Bezier whose control point is the intersection of two rays: one along the
//! launch velocity from the start point, one along the *reversed* landing
//! velocity from the end point.  For a drag-free parabola this fit is exact.
//!
//! Air time is accumulated simulation time (the sum of `dt` passed to
//! [`TrajectoryTracker::refresh`]), so replays and tests are deterministic
//! regardless of wall-clock behaviour.

use bevy::prelude::*;

use crate::error::{SimError, SimResult};
use crate::kinematics::Kinematics;

/// Two ray directions closer to parallel than this have no usable
/// intersection.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Intersection of two infinite lines given as point + direction.
///
/// Returns `None` when the directions are parallel (including collinear).
pub fn ray_intersection(p1: Vec2, d1: Vec2, p2: Vec2, d2: Vec2) -> Option<Vec2> {
    let det = d1.perp_dot(d2);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = (p2 - p1).perp_dot(d2) / det;
    Some(p1 + d1 * t)
}

/// Angle (radians) of a direction vector, for orienting the end marker.
pub fn direction_angle(v: Vec2) -> SimResult<f32> {
    if v.length_squared() < PARALLEL_EPSILON {
        return Err(SimError::ZeroLengthDirection);
    }
    Ok(v.y.atan2(v.x))
}

// ── Bezier curve ──────────────────────────────────────────────────────────────

/// A quadratic Bezier curve: start, single control point, end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    pub start: Vec2,
    pub control: Vec2,
    pub end: Vec2,
}

impl QuadraticBezier {
    /// Evaluate the curve at `t ∈ [0, 1]`.
    pub fn eval(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        u * u * self.start + 2.0 * u * t * self.control + t * t * self.end
    }

    /// Sample `segments + 1` evenly-spaced points for polyline rendering.
    pub fn sample(&self, segments: usize) -> Vec<Vec2> {
        let n = segments.max(1);
        (0..=n)
            .map(|i| self.eval(i as f32 / n as f32))
            .collect()
    }
}

// ── Tracker ───────────────────────────────────────────────────────────────────

/// Start/end trajectory samples for one shot.
///
/// The end snapshot tracks the latest airborne state until [`freeze`] is
/// called at first ground contact; after that every mutator is a no-op, so a
/// landed ball's trajectory never changes again.
///
/// [`freeze`]: TrajectoryTracker::freeze
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryTracker {
    start_position: Vec2,
    start_velocity: Vec2,
    end_position: Vec2,
    end_velocity: Vec2,
    air_time: f32,
    frozen: bool,
}

impl TrajectoryTracker {
    /// Snapshot the launch state.  End samples start equal to the start
    /// samples so the curve degenerates gracefully on the first frame.
    pub fn new(kin: &Kinematics) -> Self {
        Self {
            start_position: kin.position,
            start_velocity: kin.velocity,
            end_position: kin.position,
            end_velocity: kin.velocity,
            air_time: 0.0,
            frozen: false,
        }
    }

    /// Refresh the end snapshot with the current airborne state and
    /// accumulate `dt` into the air time.  No-op once frozen.
    pub fn refresh(&mut self, kin: &Kinematics, dt: f32) {
        if self.frozen {
            return;
        }
        self.end_position = kin.position;
        self.end_velocity = kin.velocity;
        self.air_time += dt;
    }

    /// Take a final snapshot at ground contact and freeze the trajectory.
    pub fn freeze(&mut self, kin: &Kinematics, dt: f32) {
        self.refresh(kin, dt);
        self.frozen = true;
    }

    /// True once the trajectory has been finalised by [`freeze`].
    ///
    /// [`freeze`]: TrajectoryTracker::freeze
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Total airborne time in accumulated simulation seconds.
    pub fn air_time(&self) -> f32 {
        self.air_time
    }

    pub fn start_position(&self) -> Vec2 {
        self.start_position
    }

    pub fn end_position(&self) -> Vec2 {
        self.end_position
    }

    /// Velocity at the end snapshot; orients the trajectory end marker.
    pub fn end_velocity(&self) -> Vec2 {
        self.end_velocity
    }

    /// Fit the quadratic Bezier through the recorded samples.
    ///
    /// The control point sits where the launch-velocity ray from the start
    /// meets the reversed end-velocity ray from the end.  Fails with
    /// [`SimError::DegenerateTrajectory`] when the rays are parallel (e.g. a
    /// perfectly vertical shot).
    pub fn bezier(&self) -> SimResult<QuadraticBezier> {
        let control = ray_intersection(
            self.start_position,
            self.start_velocity,
            self.end_position,
            -self.end_velocity,
        )
        .ok_or(SimError::DegenerateTrajectory)?;
        Ok(QuadraticBezier {
            start: self.start_position,
            control,
            end: self.end_position,
        })
    }
}
