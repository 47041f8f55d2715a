//! Point-mass kinematic state and the ballistic force model.
//!
//! [`Kinematics`] owns a cannonball's position, velocity, and acceleration and
//! advances them with semi-implicit Euler integration.  The drag model is the
//! standard quadratic law for a sphere:
//!
//! `F_drag = ½ · ρ · C_d · π · r² · |v|²`, directed against the velocity.
//!
//! Everything here is pure data and pure functions — no ECS access — so the
//! whole module is unit-testable with explicit time steps.

use bevy::prelude::*;

use crate::config::SimConfig;

/// Position, velocity, and acceleration of a point mass (world units, y-up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
}

impl Kinematics {
    /// Launch state: initial position and velocity, gravity-only acceleration.
    pub fn launched(position: Vec2, velocity: Vec2, gravity: f32) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::new(0.0, gravity),
        }
    }

    /// Advance one time step with semi-implicit Euler: velocity first, then
    /// position with the updated velocity.  Noticeably more stable than
    /// explicit Euler for bouncing bodies at game frame rates.
    pub fn integrate(&mut self, dt: f32) {
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Quadratic drag force (N) opposing the current velocity.
    ///
    /// `radius` is in metres.  Pure function of current state; returns zero
    /// for a stationary body.
    pub fn drag_force(&self, radius: f32, config: &SimConfig) -> Vec2 {
        let coeff = 0.5
            * config.air_density
            * config.sphere_drag_coeff
            * std::f32::consts::PI
            * radius
            * radius;
        // F = -c · |v| · v  (magnitude c·|v|², direction -v̂)
        -coeff * self.velocity.length() * self.velocity
    }

    /// Set acceleration to gravity plus drag for the coming step.
    ///
    /// Drag is folded into acceleration *before* integration so both forces
    /// act over the same interval.
    pub fn apply_ballistic_forces(&mut self, radius: f32, mass: f32, config: &SimConfig) {
        let drag = self.drag_force(radius, config);
        self.acceleration = Vec2::new(0.0, config.gravity) + drag / mass;
    }

    /// Current speed (u/s).
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Rescale the velocity to `length`, preserving direction.
    /// A zero velocity stays zero.
    pub fn set_speed(&mut self, length: f32) {
        if let Some(dir) = self.velocity.try_normalize() {
            self.velocity = dir * length;
        }
    }

    /// Zero both velocity and acceleration (a settled body).
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimConfig {
        SimConfig::default()
    }

    #[test]
    fn integrate_advances_velocity_then_position() {
        let mut kin = Kinematics {
            position: Vec2::ZERO,
            velocity: Vec2::new(10.0, 0.0),
            acceleration: Vec2::new(0.0, -100.0),
        };
        kin.integrate(0.1);
        assert_eq!(kin.velocity, Vec2::new(10.0, -10.0));
        // Semi-implicit: position moves with the *updated* velocity.
        assert_eq!(kin.position, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn integrate_with_zero_dt_is_identity() {
        let mut kin = Kinematics::launched(Vec2::new(3.0, 4.0), Vec2::new(5.0, 6.0), -981.0);
        let before = kin;
        kin.integrate(0.0);
        assert_eq!(kin, before);
    }

    #[test]
    fn drag_magnitude_matches_quadratic_law() {
        let config = config();
        let kin = Kinematics {
            position: Vec2::ZERO,
            velocity: Vec2::new(100.0, 0.0),
            acceleration: Vec2::ZERO,
        };
        let radius = 0.2;
        let expected = 0.5
            * config.air_density
            * config.sphere_drag_coeff
            * std::f32::consts::PI
            * radius
            * radius
            * 100.0
            * 100.0;
        let drag = kin.drag_force(radius, &config);
        assert!((drag.length() - expected).abs() < 1e-3);
    }

    #[test]
    fn drag_opposes_velocity() {
        let config = config();
        let kin = Kinematics {
            position: Vec2::ZERO,
            velocity: Vec2::new(30.0, 40.0),
            acceleration: Vec2::ZERO,
        };
        let drag = kin.drag_force(0.2, &config);
        let dot = drag.normalize().dot(kin.velocity.normalize());
        assert!((dot + 1.0).abs() < 1e-5, "drag must point against velocity");
    }

    #[test]
    fn drag_is_zero_when_stationary() {
        let config = config();
        let kin = Kinematics::launched(Vec2::ZERO, Vec2::ZERO, config.gravity);
        assert_eq!(kin.drag_force(0.2, &config), Vec2::ZERO);
    }

    #[test]
    fn ballistic_forces_reduce_to_gravity_in_vacuum() {
        let mut config = config();
        config.air_density = 0.0;
        let mut kin = Kinematics::launched(Vec2::ZERO, Vec2::new(500.0, 500.0), config.gravity);
        kin.apply_ballistic_forces(0.2, 20.0, &config);
        assert_eq!(kin.acceleration, Vec2::new(0.0, config.gravity));
    }

    #[test]
    fn set_speed_preserves_direction() {
        let mut kin = Kinematics {
            position: Vec2::ZERO,
            velocity: Vec2::new(3.0, 4.0),
            acceleration: Vec2::ZERO,
        };
        kin.set_speed(10.0);
        assert!((kin.speed() - 10.0).abs() < 1e-5);
        assert!((kin.velocity.normalize() - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }

    #[test]
    fn set_speed_on_zero_velocity_stays_zero() {
        let mut kin = Kinematics::launched(Vec2::ZERO, Vec2::ZERO, -981.0);
        kin.set_speed(10.0);
        assert_eq!(kin.velocity, Vec2::ZERO);
    }

    #[test]
    fn halt_zeroes_velocity_and_acceleration() {
        let mut kin = Kinematics::launched(Vec2::ZERO, Vec2::new(50.0, 20.0), -981.0);
        kin.halt();
        assert_eq!(kin.velocity, Vec2::ZERO);
        assert_eq!(kin.acceleration, Vec2::ZERO);
    }
}
