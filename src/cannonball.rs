//! The cannonball entity: ballistic flight, ground bounces, trajectory
//! recording, and the fade-out destroy sequence.
//!
//! ## Design
//!
//! All gameplay state lives in the [`Cannonball`] component and is advanced by
//! the pure [`Cannonball::tick`] method, which returns a [`TickOutcome`]
//! describing side effects the caller should perform (impact burst, despawn).
//! The ECS layer is a thin shell: [`cannonball_update_system`] ticks every
//! ball, translates outcomes into particle spawns and despawns, and mirrors
//! the physics position into the Bevy `Transform`.  Tests drive `tick`
//! directly with explicit time steps.
//!
//! ## Ground state machine
//!
//! * **Airborne** (centre above ground + radius): gravity and drag are folded
//!   into acceleration, the integrator advances the state, and the trajectory
//!   end snapshot is refreshed.
//! * **First contact**: the trajectory is frozen and `landed` flips true —
//!   exactly once per ball.
//! * **Contact, speed above the stop threshold**: the ball is clamped just
//!   above the ground, its vertical velocity inverts, and its speed is scaled
//!   by the elasticity.  Each such contact reports one impact, so every
//!   bounce kicks up its own dust burst.
//! * **Contact, speed at or below the threshold**: the ball is clamped onto
//!   the ground line and halted for good.

use bevy::prelude::*;

use crate::config::SimConfig;
use crate::kinematics::Kinematics;
use crate::particles::{circle_mesh, spawn_landing_dust, spawn_launch_smoke};
use crate::rendering::TrajectoryDisplay;
use crate::trajectory::TrajectoryTracker;

// ── Resources ────────────────────────────────────────────────────────────────

/// Shared circle mesh for cannonball body fills (created once at startup).
#[derive(Resource)]
pub struct CannonballMesh(pub Handle<Mesh>);

// ── Components ───────────────────────────────────────────────────────────────

/// Destroy-sequence state.  Arming starts a countdown that drives the alpha
/// fade; the owning system despawns the ball once the countdown expires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fade {
    Idle,
    Armed { remaining: f32, duration: f32 },
}

/// Reported by [`Cannonball::tick`] when the ball strikes the ground this
/// step — first contact and every subsequent bounce alike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    /// Contact point on the ground surface.
    pub position: Vec2,
    /// Speed at the moment of contact, before bounce damping.
    pub speed: f32,
}

/// Side effects of one tick, to be performed by the caller.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub impact: Option<Impact>,
    /// The fade countdown ran out; the entity should be despawned.
    pub expired: bool,
}

/// A fired cannonball.
#[derive(Component)]
pub struct Cannonball {
    pub kinematics: Kinematics,
    pub tracker: TrajectoryTracker,
    /// Radius in metres (world size is `radius × pixel_scale`).
    pub radius: f32,
    pub mass: f32,
    /// Fraction of speed retained per bounce.
    pub elasticity: f32,
    /// Flips false→true exactly once, at first ground contact.
    pub landed: bool,
    pub fade: Fade,
    /// Visibility of the trajectory overlay, eased toward 0 or 1 each tick.
    pub trajectory_alpha: f32,
    /// Handle to the body-fill material; `None` until the mesh-attach system
    /// runs.  Its alpha follows the fade countdown.
    pub body_material: Option<Handle<ColorMaterial>>,
}

impl Cannonball {
    /// Build a freshly-launched ball from the given start state.
    pub fn launched(position: Vec2, velocity: Vec2, config: &SimConfig) -> Self {
        let kinematics = Kinematics::launched(position, velocity, config.gravity);
        let tracker = TrajectoryTracker::new(&kinematics);
        Self {
            kinematics,
            tracker,
            radius: config.cannonball_radius,
            mass: config.cannonball_mass,
            elasticity: config.elasticity,
            landed: false,
            fade: Fade::Idle,
            trajectory_alpha: 0.0,
            body_material: None,
        }
    }

    /// Arm the destroy sequence.  Idempotent: re-arming restarts the fade.
    pub fn destroy(&mut self, duration: f32) {
        self.fade = Fade::Armed {
            remaining: duration,
            duration,
        };
    }

    /// Overall opacity of the ball: 1.0 while alive, `remaining / duration`
    /// while the destroy fade runs.
    pub fn fade_alpha(&self) -> f32 {
        match self.fade {
            Fade::Idle => 1.0,
            Fade::Armed {
                remaining,
                duration,
            } => (remaining / duration).clamp(0.0, 1.0),
        }
    }

    /// Opacity of the trajectory overlay: the eased show/hide alpha, capped by
    /// the destroy fade so a disappearing ball takes its curve with it.
    pub fn trajectory_display_alpha(&self) -> f32 {
        self.trajectory_alpha.min(self.fade_alpha())
    }

    /// Ball radius in world units.
    pub fn radius_world(&self, config: &SimConfig) -> f32 {
        self.radius * config.pixel_scale
    }

    /// Advance one simulation step.  Pure with respect to the ECS: all side
    /// effects are reported through the returned [`TickOutcome`].
    pub fn tick(&mut self, dt: f32, config: &SimConfig, show_trajectory: bool) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        // Ease the trajectory overlay toward shown/hidden.
        let step = config.trajectory_fade_rate * dt;
        if show_trajectory && self.trajectory_alpha < 1.0 {
            self.trajectory_alpha = (self.trajectory_alpha + step).clamp(0.0, 1.0);
        } else if !show_trajectory && self.trajectory_alpha > 0.0 {
            self.trajectory_alpha = (self.trajectory_alpha - step).clamp(0.0, 1.0);
        }

        let ground_top = config.ground_height + self.radius_world(config);

        if self.kinematics.position.y > ground_top {
            // Airborne: forces, integration, trajectory refresh.  Position is
            // only ever moved by the integrator on this path.
            self.kinematics
                .apply_ballistic_forces(self.radius, self.mass, config);
            self.kinematics.integrate(dt);
            self.tracker.refresh(&self.kinematics, dt);
        } else {
            let just_landed = !self.landed;
            if just_landed {
                // First contact: finalize the trajectory.
                self.tracker.freeze(&self.kinematics, dt);
                self.landed = true;
            }

            let contact_speed = self.kinematics.speed();
            let contact_point = Vec2::new(self.kinematics.position.x, config.ground_height);

            if contact_speed > config.bounce_stop_speed {
                // Bounce: reflect vertically, damp the speed.
                self.kinematics.position.y = ground_top + 0.01;
                self.kinematics.velocity.y = -self.kinematics.velocity.y;
                self.kinematics.set_speed(contact_speed * self.elasticity);
                outcome.impact = Some(Impact {
                    position: contact_point,
                    speed: contact_speed,
                });
            } else {
                // Settle: pin to the ground line and stop all movement.
                self.kinematics.position.y = ground_top;
                self.kinematics.halt();
                if just_landed {
                    outcome.impact = Some(Impact {
                        position: contact_point,
                        speed: contact_speed,
                    });
                }
            }
        }

        // Run the destroy countdown if it has been armed.
        if let Fade::Armed { remaining, .. } = &mut self.fade {
            *remaining -= dt;
            if *remaining <= 0.0 {
                outcome.expired = true;
            }
        }

        outcome
    }
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// Spawn a cannonball entity and its launch smoke plume.
///
/// `predicted_air_time` only sizes the plume; actual flight time is measured
/// by the trajectory tracker.
pub fn spawn_cannonball(
    commands: &mut Commands,
    config: &SimConfig,
    position: Vec2,
    velocity: Vec2,
    predicted_air_time: f32,
) -> Entity {
    let dir = velocity.try_normalize().unwrap_or(Vec2::X);
    spawn_launch_smoke(commands, config, position, dir, predicted_air_time);

    commands
        .spawn((
            Cannonball::launched(position, velocity, config),
            Transform::from_translation(position.extend(1.0)),
            Visibility::default(),
        ))
        .id()
}

// ── Plugin / systems ─────────────────────────────────────────────────────────

pub struct CannonballPlugin;

impl Plugin for CannonballPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_cannonball_mesh).add_systems(
            Update,
            (attach_cannonball_mesh_system, cannonball_update_system).chain(),
        );
    }
}

/// Create the shared body-fill mesh sized from the configured ball radius.
///
/// Runs in `Startup`, after the `PreStartup` config load, so the final radius
/// is used.
fn init_cannonball_mesh(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    config: Res<SimConfig>,
) {
    let handle = meshes.add(circle_mesh(config.ball_radius_world(), 32));
    commands.insert_resource(CannonballMesh(handle));
}

/// Attach `Mesh2d` + `MeshMaterial2d` to every newly-spawned [`Cannonball`].
///
/// Each ball gets its own dark-fill material so the destroy fade can dim it
/// individually, mirroring the particle pipeline.
pub fn attach_cannonball_mesh_system(
    mut commands: Commands,
    ball_mesh: Res<CannonballMesh>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Cannonball), Added<Cannonball>>,
) {
    for (entity, mut ball) in query.iter_mut() {
        let mat_handle =
            materials.add(ColorMaterial::from_color(Color::srgba(0.08, 0.08, 0.10, 1.0)));
        ball.body_material = Some(mat_handle.clone());
        commands
            .entity(entity)
            .insert((Mesh2d(ball_mesh.0.clone()), MeshMaterial2d(mat_handle)));
    }
}

/// Advance every cannonball one frame: tick the state machine, spawn dust for
/// impacts, mirror physics position into the `Transform`, fade the body
/// material, and despawn expired balls.
pub fn cannonball_update_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<SimConfig>,
    display: Res<TrajectoryDisplay>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Cannonball, &mut Transform)>,
) {
    let dt = time.delta_secs();

    for (entity, mut ball, mut transform) in query.iter_mut() {
        let outcome = ball.tick(dt, &config, display.show);

        if let Some(impact) = outcome.impact {
            spawn_landing_dust(&mut commands, &config, impact.position, impact.speed);
        }

        if outcome.expired {
            commands.entity(entity).despawn();
            continue;
        }

        transform.translation.x = ball.kinematics.position.x;
        transform.translation.y = ball.kinematics.position.y;

        let alpha = ball.fade_alpha();
        if let Some(ref handle) = ball.body_material {
            if let Some(mat) = materials.get_mut(handle) {
                mat.color = Color::srgba(0.08, 0.08, 0.10, alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimConfig {
        SimConfig::default()
    }

    /// A ball resting just above the ground, moving straight down at `speed`.
    fn ball_at_contact(config: &SimConfig, speed: f32) -> Cannonball {
        let ground_top = config.ground_height + config.ball_radius_world();
        let mut ball = Cannonball::launched(
            Vec2::new(0.0, ground_top + 200.0),
            Vec2::new(0.0, -speed),
            config,
        );
        // Move it into contact without integrating through the air.
        ball.kinematics.position.y = ground_top - 0.5;
        ball
    }

    #[test]
    fn airborne_position_changes_only_by_integration() {
        let mut config = config();
        config.air_density = 0.0; // vacuum: closed-form check
        let mut ball = Cannonball::launched(Vec2::new(0.0, 500.0), Vec2::new(100.0, 0.0), &config);

        let dt = 0.01;
        let before = ball.kinematics;
        ball.tick(dt, &config, false);

        // Semi-implicit Euler, gravity only.
        let vy = before.velocity.y + config.gravity * dt;
        assert!((ball.kinematics.velocity.y - vy).abs() < 1e-4);
        assert!((ball.kinematics.position.y - (before.position.y + vy * dt)).abs() < 1e-4);
        assert!((ball.kinematics.position.x - (before.position.x + 100.0 * dt)).abs() < 1e-4);
        assert!(!ball.landed);
    }

    #[test]
    fn drag_slows_horizontal_flight() {
        let start_vel = Vec2::new(400.0, 0.0);
        let mut vacuum = config();
        vacuum.air_density = 0.0;
        let mut with_air = config();
        with_air.air_density = 1.204;

        let mut a = Cannonball::launched(Vec2::new(0.0, 500.0), start_vel, &vacuum);
        let mut b = Cannonball::launched(Vec2::new(0.0, 500.0), start_vel, &with_air);
        for _ in 0..30 {
            a.tick(0.016, &vacuum, false);
            b.tick(0.016, &with_air, false);
        }
        assert!(
            b.kinematics.velocity.x < a.kinematics.velocity.x,
            "drag must bleed horizontal speed"
        );
    }

    #[test]
    fn fast_contact_bounces_with_elasticity() {
        let config = config();
        let mut ball = ball_at_contact(&config, 20.0);
        let outcome = ball.tick(0.016, &config, false);

        assert!(ball.landed);
        assert!(ball.tracker.is_frozen());
        // Vertical velocity sign flips; speed scales by elasticity (0.5).
        assert!(ball.kinematics.velocity.y > 0.0);
        assert!((ball.kinematics.speed() - 10.0).abs() < 1e-3);
        assert!((ball.kinematics.velocity.y - 10.0).abs() < 1e-3);

        let impact = outcome.impact.expect("bounce must report an impact");
        assert!((impact.speed - 20.0).abs() < 1e-3);
        assert!((impact.position.y - config.ground_height).abs() < 1e-3);
    }

    #[test]
    fn threshold_speed_settles_instead_of_bouncing() {
        // Exactly the stop-speed boundary: ≤ threshold means stop dead.
        let config = config();
        let mut ball = ball_at_contact(&config, config.bounce_stop_speed);
        let outcome = ball.tick(0.016, &config, false);

        assert_eq!(ball.kinematics.velocity, Vec2::ZERO);
        assert_eq!(ball.kinematics.acceleration, Vec2::ZERO);
        let ground_top = config.ground_height + config.ball_radius_world();
        assert!((ball.kinematics.position.y - ground_top).abs() < 1e-5);
        // First contact still kicks up dust even when settling immediately.
        assert!(outcome.impact.is_some());
    }

    #[test]
    fn settled_ball_reports_no_further_impacts() {
        let config = config();
        let mut ball = ball_at_contact(&config, 5.0);
        ball.tick(0.016, &config, false);

        for _ in 0..10 {
            let outcome = ball.tick(0.016, &config, false);
            assert!(outcome.impact.is_none());
            assert_eq!(ball.kinematics.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn each_bounce_reports_one_impact() {
        let mut config = config();
        config.air_density = 0.0;
        let ground_top = config.ground_height + config.ball_radius_world();
        let mut ball = Cannonball::launched(
            Vec2::new(0.0, ground_top + 120.0),
            Vec2::new(60.0, 0.0),
            &config,
        );

        let mut impacts = 0;
        for _ in 0..4000 {
            if ball.tick(0.004, &config, false).impact.is_some() {
                impacts += 1;
            }
            if ball.kinematics.velocity == Vec2::ZERO && ball.landed {
                break;
            }
        }
        assert!(
            impacts >= 2,
            "a dropped ball above the stop speed must bounce more than once (got {impacts})"
        );
        assert_eq!(ball.kinematics.velocity, Vec2::ZERO, "ball must settle");
    }

    #[test]
    fn trajectory_freezes_at_first_landing() {
        let mut config = config();
        config.air_density = 0.0;
        let ground_top = config.ground_height + config.ball_radius_world();
        let mut ball = Cannonball::launched(
            Vec2::new(0.0, ground_top + 100.0),
            Vec2::new(200.0, 50.0),
            &config,
        );

        while !ball.landed {
            ball.tick(0.004, &config, false);
        }
        let end_pos = ball.tracker.end_position();
        let end_vel = ball.tracker.end_velocity();
        let air_time = ball.tracker.air_time();

        // Keep ticking through bounces: the snapshots never move again.
        for _ in 0..500 {
            ball.tick(0.004, &config, false);
        }
        assert_eq!(ball.tracker.end_position(), end_pos);
        assert_eq!(ball.tracker.end_velocity(), end_vel);
        assert_eq!(ball.tracker.air_time(), air_time);
        assert!(ball.landed);
    }

    #[test]
    fn destroy_fade_ramps_alpha_to_zero() {
        let config = config();
        let mut ball = ball_at_contact(&config, 0.0);
        ball.destroy(config.destroy_duration);

        // Half way through the fade, alpha is half (within a step of rounding).
        let dt = 0.05;
        let steps_half = (config.destroy_duration / 2.0 / dt) as usize;
        let mut expired = false;
        for _ in 0..steps_half {
            expired |= ball.tick(dt, &config, false).expired;
        }
        assert!(!expired);
        assert!((ball.fade_alpha() - 0.5).abs() < dt / config.destroy_duration + 1e-4);

        // Finish the fade: alpha hits zero and the outcome reports expiry.
        for _ in 0..steps_half + 2 {
            expired |= ball.tick(dt, &config, false).expired;
        }
        assert!(expired);
        assert_eq!(ball.fade_alpha(), 0.0);
    }

    #[test]
    fn trajectory_alpha_eases_within_one_second() {
        let config = config();
        let mut ball = ball_at_contact(&config, 0.0);
        assert_eq!(ball.trajectory_alpha, 0.0);

        // 1 second of shown at 60 Hz reaches full opacity.
        let mut last = 0.0;
        for _ in 0..63 {
            ball.tick(1.0 / 60.0, &config, true);
            assert!(ball.trajectory_alpha >= last, "fade-in must be monotonic");
            last = ball.trajectory_alpha;
        }
        assert_eq!(ball.trajectory_alpha, 1.0);

        // And back down within another second.
        for _ in 0..63 {
            ball.tick(1.0 / 60.0, &config, false);
        }
        assert_eq!(ball.trajectory_alpha, 0.0);
    }

    #[test]
    fn trajectory_display_alpha_capped_by_fade() {
        let config = config();
        let mut ball = ball_at_contact(&config, 0.0);
        ball.trajectory_alpha = 1.0;
        ball.destroy(1.0);
        // Burn 0.75 s of the fade.
        for _ in 0..15 {
            ball.tick(0.05, &config, true);
        }
        assert!((ball.fade_alpha() - 0.25).abs() < 1e-4);
        assert!((ball.trajectory_display_alpha() - 0.25).abs() < 1e-4);
    }
}
