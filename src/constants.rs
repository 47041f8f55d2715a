//! Centralised physics and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! ## Tuning guidance
//!
//! Each constant includes the observable consequence of changing it.  Runtime
//! overrides go in `assets/ballistics.toml` (see [`crate::config`]); this file
//! remains the authoritative default source.

// ── Physics: Environment ──────────────────────────────────────────────────────

/// Vertical gravitational acceleration (world units/s², negative = downward).
///
/// World units are pixels, so this is 9.81 m/s² scaled by [`PIXEL_SCALE`].
/// Weaker gravity produces floatier, longer arcs.
pub const GRAVITY: f32 = -9.81 * PIXEL_SCALE;

/// Air density (kg/m³) used by the quadratic drag model.  Sea-level value.
///
/// Set to 0.0 to fly in a vacuum — arcs become perfect parabolas and the
/// fitted trajectory curve matches the flight path exactly.
pub const AIR_DENSITY: f32 = 1.204;

/// Drag coefficient of a smooth sphere.
pub const SPHERE_DRAG_COEFF: f32 = 0.47;

/// World units per metre.  Converts physical sizes (metres) to pixels.
pub const PIXEL_SCALE: f32 = 100.0;

/// World-space y coordinate of the ground surface.
///
/// Cannonballs collide with, bounce on, and settle at this line.
pub const GROUND_HEIGHT: f32 = -250.0;

// ── Physics: Cannonball ───────────────────────────────────────────────────────

/// Cannonball radius in metres (rendered at `radius × PIXEL_SCALE` pixels).
pub const CANNONBALL_RADIUS: f32 = 0.2;

/// Cannonball mass (kg).  Only drag cares: heavier balls decelerate less.
///
/// At 20 kg a 500 u/s shot loses roughly a third of its speed to drag over a
/// full arc, which reads as "heavy iron ball" without killing range.
pub const CANNONBALL_MASS: f32 = 20.0;

/// Fraction of speed retained after each ground bounce.
/// 0.0 = fully inelastic (thud); 1.0 = perfectly elastic (bounces forever).
pub const ELASTICITY: f32 = 0.5;

/// Speed (u/s) at or below which a grounded cannonball stops dead.
///
/// Strictly above this threshold the ball bounces; at or below it, velocity
/// and acceleration are zeroed and the ball settles on the ground line.
pub const BOUNCE_STOP_SPEED: f32 = 10.0;

// ── Cannonball: Lifecycle ─────────────────────────────────────────────────────

/// Seconds over which a destroyed cannonball fades to fully transparent.
/// The owning system despawns the entity once the fade completes.
pub const DESTROY_DURATION: f32 = 1.0;

/// Rate (alpha/s) at which the trajectory overlay fades in or out when the
/// display toggle changes.  At 1.0 the transition completes within one second.
pub const TRAJECTORY_FADE_RATE: f32 = 1.0;

// ── Cannon ────────────────────────────────────────────────────────────────────

/// World-space x/y of the cannon pivot.
pub const CANNON_POSITION_X: f32 = -450.0;
pub const CANNON_POSITION_Y: f32 = GROUND_HEIGHT + 30.0;

/// Barrel length (world units) from pivot to muzzle.
pub const CANNON_BARREL_LENGTH: f32 = 50.0;

/// Default firing angle (radians above horizontal).
pub const CANNON_DEFAULT_ANGLE: f32 = 0.785;

/// Angle limits (radians).  The barrel cannot aim below horizontal or past
/// vertical.
pub const CANNON_MIN_ANGLE: f32 = 0.05;
pub const CANNON_MAX_ANGLE: f32 = 1.52;

/// Angular aim speed (rad/s) while up/down arrow is held.
pub const CANNON_AIM_SPEED: f32 = 1.2;

/// Muzzle speed limits and default (u/s).
pub const CANNON_MIN_POWER: f32 = 200.0;
pub const CANNON_MAX_POWER: f32 = 900.0;
pub const CANNON_DEFAULT_POWER: f32 = 600.0;

/// Rate of power change (u/s per second) while left/right arrow is held.
pub const CANNON_POWER_SPEED: f32 = 300.0;

/// Seconds between two consecutive shots.
pub const FIRE_COOLDOWN: f32 = 0.3;

// ── Particles ─────────────────────────────────────────────────────────────────

/// Launch smoke particles emitted per second of predicted flight time.
///
/// Longer predicted arcs produce a denser muzzle plume.
pub const LAUNCH_SMOKE_PER_AIRTIME_SEC: f32 = 30.0;

/// Bounds on the launch smoke particle count regardless of predicted air time.
pub const LAUNCH_SMOKE_MIN: u32 = 10;
pub const LAUNCH_SMOKE_MAX: u32 = 60;

/// Landing dust particles per u/s of impact speed (clamped below).
pub const LANDING_DUST_PER_SPEED: f32 = 0.06;
pub const LANDING_DUST_MIN: u32 = 6;
pub const LANDING_DUST_MAX: u32 = 24;

/// Downward pull (u/s²) applied to smoke and dust particles so they arc back
/// toward the ground instead of drifting off screen.
pub const PARTICLE_GRAVITY: f32 = -180.0;

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Font size of the per-ball air-time label and the HUD readout.
pub const HUD_FONT_SIZE: f32 = 16.0;

/// Number of line segments used to draw the fitted trajectory curve.
pub const TRAJECTORY_SEGMENTS: usize = 48;

/// Side length (world units) of the triangle marker at the trajectory's end.
pub const TRAJECTORY_MARKER_SIZE: f32 = 12.0;
