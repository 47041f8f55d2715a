//! The cannon: aim controls, firing, and the vacuum flight-time prediction
//! used to size the launch smoke plume.
//!
//! Controls:
//! * **Up/Down** — raise/lower the barrel.
//! * **Left/Right** — decrease/increase muzzle power.
//! * **Space** — fire (fades out all previous balls).
//! * **T** — toggle the trajectory overlay.
//! * **R** — fade out every ball without firing.

use bevy::prelude::*;

use crate::cannonball::{spawn_cannonball, Cannonball};
use crate::config::SimConfig;
use crate::rendering::TrajectoryDisplay;

// ── Resources ────────────────────────────────────────────────────────────────

/// Aim state of the cannon.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Cannon {
    /// Pivot position (world units).
    pub position: Vec2,
    /// Barrel angle above horizontal (radians).
    pub angle: f32,
    /// Muzzle speed (u/s).
    pub power: f32,
}

impl Cannon {
    /// Build a cannon from the configured defaults.
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            position: Vec2::new(config.cannon_position_x, config.cannon_position_y),
            angle: config.cannon_default_angle,
            power: config.cannon_default_power,
        }
    }

    /// Normalised barrel direction.
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), self.angle.sin())
    }

    /// World position of the muzzle tip.
    pub fn muzzle(&self, config: &SimConfig) -> Vec2 {
        self.position + self.direction() * config.cannon_barrel_length
    }

    /// Initial velocity of a shot fired right now.
    pub fn muzzle_velocity(&self) -> Vec2 {
        self.direction() * self.power
    }
}

/// Tracks when the cannon last fired so we can enforce the cooldown.
#[derive(Resource, Default)]
pub struct FireCooldown {
    pub timer: f32,
}

// ── Prediction ───────────────────────────────────────────────────────────────

/// Closed-form vacuum flight time from `start` to the ground contact height.
///
/// Solves `y₀ + v_y·t + ½·g·t² = ground_y` and takes the positive root.
/// Drag is ignored — this only sizes the launch plume, where an
/// over-estimate of a few percent is invisible.  Returns 0 when the shot
/// starts below the target height and is moving away from it.
pub fn predicted_air_time(start_y: f32, vel_y: f32, ground_y: f32, gravity: f32) -> f32 {
    let a = 0.5 * gravity;
    let b = vel_y;
    let c = start_y - ground_y;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 || a == 0.0 {
        return 0.0;
    }
    let sqrt = disc.sqrt();
    let t1 = (-b + sqrt) / (2.0 * a);
    let t2 = (-b - sqrt) / (2.0 * a);
    t1.max(t2).max(0.0)
}

// ── Plugin / systems ─────────────────────────────────────────────────────────

pub struct CannonPlugin;

impl Plugin for CannonPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FireCooldown>()
            .add_systems(Startup, init_cannon)
            .add_systems(Update, (cannon_control_system, cannon_fire_system).chain());
    }
}

/// Insert the [`Cannon`] resource from the loaded config.
///
/// Runs in `Startup`, after the `PreStartup` config load, so TOML overrides
/// of the default aim are honoured.
fn init_cannon(mut commands: Commands, config: Res<SimConfig>) {
    commands.insert_resource(Cannon::from_config(&config));
}

/// Arrow-key aiming, trajectory toggle, and manual destroy-all.
pub fn cannon_control_system(
    time: Res<Time>,
    config: Res<SimConfig>,
    keys: Res<ButtonInput<KeyCode>>,
    mut cannon: ResMut<Cannon>,
    mut display: ResMut<TrajectoryDisplay>,
    mut balls: Query<&mut Cannonball>,
) {
    let dt = time.delta_secs();

    if keys.pressed(KeyCode::ArrowUp) {
        cannon.angle += config.cannon_aim_speed * dt;
    }
    if keys.pressed(KeyCode::ArrowDown) {
        cannon.angle -= config.cannon_aim_speed * dt;
    }
    cannon.angle = cannon
        .angle
        .clamp(config.cannon_min_angle, config.cannon_max_angle);

    if keys.pressed(KeyCode::ArrowRight) {
        cannon.power += config.cannon_power_speed * dt;
    }
    if keys.pressed(KeyCode::ArrowLeft) {
        cannon.power -= config.cannon_power_speed * dt;
    }
    cannon.power = cannon
        .power
        .clamp(config.cannon_min_power, config.cannon_max_power);

    if keys.just_pressed(KeyCode::KeyT) {
        display.show = !display.show;
    }

    if keys.just_pressed(KeyCode::KeyR) {
        for mut ball in balls.iter_mut() {
            ball.destroy(config.destroy_duration);
        }
    }
}

/// Fire on Space: fade out every existing ball, then spawn the new shot with
/// a launch plume sized by the predicted flight time.
pub fn cannon_fire_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<SimConfig>,
    keys: Res<ButtonInput<KeyCode>>,
    cannon: Res<Cannon>,
    mut cooldown: ResMut<FireCooldown>,
    mut balls: Query<&mut Cannonball>,
) {
    cooldown.timer = (cooldown.timer - time.delta_secs()).max(0.0);

    if !keys.just_pressed(KeyCode::Space) || cooldown.timer > 0.0 {
        return;
    }
    cooldown.timer = config.fire_cooldown;

    // A new shot retires the previous ones.
    for mut ball in balls.iter_mut() {
        ball.destroy(config.destroy_duration);
    }

    let muzzle = cannon.muzzle(&config);
    let velocity = cannon.muzzle_velocity();
    let contact_height = config.ground_height + config.ball_radius_world();
    let air_time = predicted_air_time(muzzle.y, velocity.y, contact_height, config.gravity);

    spawn_cannonball(&mut commands, &config, muzzle, velocity, air_time);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicted_air_time_matches_symmetric_arc() {
        // Launch and land at the same height: t = 2·v_y / |g|.
        let g = -981.0;
        let vy = 300.0;
        let t = predicted_air_time(0.0, vy, 0.0, g);
        assert!((t - 2.0 * vy / 981.0).abs() < 1e-4);
    }

    #[test]
    fn predicted_air_time_for_pure_drop() {
        // Free fall from height h: t = sqrt(2h / |g|).
        let g = -981.0;
        let h = 200.0;
        let t = predicted_air_time(h, 0.0, 0.0, g);
        assert!((t - (2.0 * h / 981.0).sqrt()).abs() < 1e-4);
    }

    #[test]
    fn predicted_air_time_is_zero_for_unreachable_target() {
        // Shot starting below the target height, fired downward.
        let t = predicted_air_time(-10.0, -50.0, 0.0, -981.0);
        assert_eq!(t, 0.0);
    }

    #[test]
    fn prediction_close_to_simulated_vacuum_flight() {
        use crate::cannonball::Cannonball;

        let mut config = SimConfig::default();
        config.air_density = 0.0;
        let ground_top = config.ground_height + config.ball_radius_world();

        let start = Vec2::new(0.0, ground_top + 50.0);
        let velocity = Vec2::new(350.0, 350.0);
        let predicted = predicted_air_time(start.y, velocity.y, ground_top, config.gravity);

        let mut ball = Cannonball::launched(start, velocity, &config);
        let dt = 0.001;
        let mut simulated = 0.0;
        while !ball.landed {
            ball.tick(dt, &config, false);
            simulated += dt;
        }
        assert!(
            (simulated - predicted).abs() < 0.05,
            "vacuum prediction {predicted:.3}s vs simulated {simulated:.3}s"
        );
    }

    #[test]
    fn muzzle_geometry_follows_angle() {
        let config = SimConfig::default();
        let mut cannon = Cannon::from_config(&config);
        cannon.angle = 0.0;
        let muzzle = cannon.muzzle(&config);
        assert!(
            (muzzle - (cannon.position + Vec2::X * config.cannon_barrel_length)).length() < 1e-4
        );

        cannon.angle = std::f32::consts::FRAC_PI_2;
        let muzzle = cannon.muzzle(&config);
        assert!(
            (muzzle - (cannon.position + Vec2::Y * config.cannon_barrel_length)).length() < 1e-4
        );
    }

    #[test]
    fn muzzle_velocity_has_configured_power() {
        let config = SimConfig::default();
        let cannon = Cannon::from_config(&config);
        assert!((cannon.muzzle_velocity().length() - config.cannon_default_power).abs() < 1e-3);
    }
}
