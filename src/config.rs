//! Runtime ballistics configuration loaded from `assets/ballistics.toml`.
//!
//! [`SimConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_sim_config`] reads
//! `assets/ballistics.toml` and overwrites the defaults with any values present
//! in the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the constants you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<SimConfig>` to any system parameter list and read values
//! with `config.gravity`, `config.elasticity`, etc.
//!
//! ## Tuning workflow
//!
//! 1. Edit `assets/ballistics.toml`.
//! 2. Restart the game — no recompilation required.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `SimConfig::default()`.

use crate::constants::*;
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable physics and gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/ballistics.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // ── Environment ──────────────────────────────────────────────────────────
    pub gravity: f32,
    pub air_density: f32,
    pub sphere_drag_coeff: f32,
    pub pixel_scale: f32,
    pub ground_height: f32,

    // ── Cannonball ───────────────────────────────────────────────────────────
    pub cannonball_radius: f32,
    pub cannonball_mass: f32,
    pub elasticity: f32,
    pub bounce_stop_speed: f32,
    pub destroy_duration: f32,
    pub trajectory_fade_rate: f32,

    // ── Cannon ───────────────────────────────────────────────────────────────
    pub cannon_position_x: f32,
    pub cannon_position_y: f32,
    pub cannon_barrel_length: f32,
    pub cannon_default_angle: f32,
    pub cannon_min_angle: f32,
    pub cannon_max_angle: f32,
    pub cannon_aim_speed: f32,
    pub cannon_min_power: f32,
    pub cannon_max_power: f32,
    pub cannon_default_power: f32,
    pub cannon_power_speed: f32,
    pub fire_cooldown: f32,

    // ── Particles ────────────────────────────────────────────────────────────
    pub launch_smoke_per_airtime_sec: f32,
    pub launch_smoke_min: u32,
    pub launch_smoke_max: u32,
    pub landing_dust_per_speed: f32,
    pub landing_dust_min: u32,
    pub landing_dust_max: u32,
    pub particle_gravity: f32,

    // ── Rendering ────────────────────────────────────────────────────────────
    pub hud_font_size: f32,
    pub trajectory_segments: usize,
    pub trajectory_marker_size: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Environment
            gravity: GRAVITY,
            air_density: AIR_DENSITY,
            sphere_drag_coeff: SPHERE_DRAG_COEFF,
            pixel_scale: PIXEL_SCALE,
            ground_height: GROUND_HEIGHT,
            // Cannonball
            cannonball_radius: CANNONBALL_RADIUS,
            cannonball_mass: CANNONBALL_MASS,
            elasticity: ELASTICITY,
            bounce_stop_speed: BOUNCE_STOP_SPEED,
            destroy_duration: DESTROY_DURATION,
            trajectory_fade_rate: TRAJECTORY_FADE_RATE,
            // Cannon
            cannon_position_x: CANNON_POSITION_X,
            cannon_position_y: CANNON_POSITION_Y,
            cannon_barrel_length: CANNON_BARREL_LENGTH,
            cannon_default_angle: CANNON_DEFAULT_ANGLE,
            cannon_min_angle: CANNON_MIN_ANGLE,
            cannon_max_angle: CANNON_MAX_ANGLE,
            cannon_aim_speed: CANNON_AIM_SPEED,
            cannon_min_power: CANNON_MIN_POWER,
            cannon_max_power: CANNON_MAX_POWER,
            cannon_default_power: CANNON_DEFAULT_POWER,
            cannon_power_speed: CANNON_POWER_SPEED,
            fire_cooldown: FIRE_COOLDOWN,
            // Particles
            launch_smoke_per_airtime_sec: LAUNCH_SMOKE_PER_AIRTIME_SEC,
            launch_smoke_min: LAUNCH_SMOKE_MIN,
            launch_smoke_max: LAUNCH_SMOKE_MAX,
            landing_dust_per_speed: LANDING_DUST_PER_SPEED,
            landing_dust_min: LANDING_DUST_MIN,
            landing_dust_max: LANDING_DUST_MAX,
            particle_gravity: PARTICLE_GRAVITY,
            // Rendering
            hud_font_size: HUD_FONT_SIZE,
            trajectory_segments: TRAJECTORY_SEGMENTS,
            trajectory_marker_size: TRAJECTORY_MARKER_SIZE,
        }
    }
}

impl SimConfig {
    /// Cannonball radius in world units (pixels).
    pub fn ball_radius_world(&self) -> f32 {
        self.cannonball_radius * self.pixel_scale
    }
}

/// Startup system: attempt to load `assets/ballistics.toml` and overwrite the
/// `SimConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors are printed
/// to stderr but do not abort the game.  A missing file is silently ignored
/// (defaults are already in place from `insert_resource`).
pub fn load_sim_config(mut config: ResMut<SimConfig>) {
    let path = "assets/ballistics.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<SimConfig>(&contents) {
            Ok(loaded) => {
                *config = loaded;
                println!("✓ Loaded ballistics config from {path}");
            }
            Err(e) => {
                eprintln!("⚠ Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present — defaults are already in place; not an error.
            println!("ℹ No {path} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = SimConfig::default();
        assert_eq!(config.elasticity, ELASTICITY);
        assert_eq!(config.bounce_stop_speed, BOUNCE_STOP_SPEED);
        assert_eq!(config.ground_height, GROUND_HEIGHT);
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let config: SimConfig = toml::from_str("elasticity = 0.9").unwrap();
        assert_eq!(config.elasticity, 0.9);
        assert_eq!(config.gravity, GRAVITY, "unnamed keys keep defaults");
    }

    #[test]
    fn ball_radius_world_applies_pixel_scale() {
        let config = SimConfig::default();
        assert_eq!(
            config.ball_radius_world(),
            CANNONBALL_RADIUS * PIXEL_SCALE
        );
    }
}
